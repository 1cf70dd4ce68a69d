//! Token records and the tokenizers that produce them.
//!
//! The matcher only ever looks a token up by attribute name, so anything that
//! can answer [`TokenRecord::attr`] can be matched against: a tagger's output,
//! a map, or the plain [`Token`] defined here.

use std::collections::{BTreeMap, HashMap};

use crate::config::DEFAULT_ATTRIBUTE;

pub trait TokenRecord {
    /// Returns the value of `name`, or `None` when the record has no such
    /// attribute.
    fn attr(&self, name: &str) -> Option<&str>;
}

impl<T: TokenRecord + ?Sized> TokenRecord for &T {
    fn attr(&self, name: &str) -> Option<&str> {
        (**self).attr(name)
    }
}

impl TokenRecord for HashMap<String, String> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl TokenRecord for BTreeMap<String, String> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// An owned token with an arbitrary set of string attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    attrs: BTreeMap<String, String>,
}

impl Token {
    pub fn new() -> Token {
        Token::default()
    }

    /// A token carrying only the default `word` attribute.
    pub fn word(word: &str) -> Token {
        Token::new().with_attr(DEFAULT_ATTRIBUTE, word)
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Token {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl TokenRecord for Token {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Turns raw input text into token records.
pub trait Tokenizer {
    type Record: TokenRecord;

    fn tokenize(&self, text: &str) -> Vec<Self::Record>;
}

/// Splits on every single space; each piece becomes a token whose only
/// attribute is its text. Consecutive spaces yield empty tokens.
#[derive(Debug, Clone)]
pub struct WhitespaceTokenizer {
    attribute: String,
}

impl WhitespaceTokenizer {
    pub fn new(attribute: &str) -> WhitespaceTokenizer {
        WhitespaceTokenizer {
            attribute: attribute.to_string(),
        }
    }
}

impl Default for WhitespaceTokenizer {
    fn default() -> Self {
        WhitespaceTokenizer::new(DEFAULT_ATTRIBUTE)
    }
}

impl Tokenizer for WhitespaceTokenizer {
    type Record = Token;

    fn tokenize(&self, text: &str) -> Vec<Token> {
        text.split(' ')
            .map(|piece| Token::new().with_attr(&self.attribute, piece))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenRecord, Tokenizer, WhitespaceTokenizer};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn words(tokens: &[Token]) -> Vec<Option<&str>> {
        tokens.iter().map(|t| t.attr("word")).collect()
    }

    #[test]
    fn whitespace_tokenizer() {
        let t = WhitespaceTokenizer::default();
        assert_eq!(words(&t.tokenize("a b c")), vec![Some("a"), Some("b"), Some("c")]);
        assert_eq!(words(&t.tokenize("a  b")), vec![Some("a"), Some(""), Some("b")]);
        assert_eq!(words(&t.tokenize("")), vec![Some("")]);

        let t = WhitespaceTokenizer::new("text");
        let tokens = t.tokenize("x");
        assert_eq!(tokens[0].attr("text"), Some("x"));
        assert_eq!(tokens[0].attr("word"), None);
    }

    #[test]
    fn records() {
        let token = Token::word("run").with_attr("tag", "VB");
        assert_eq!(token.attr("word"), Some("run"));
        assert_eq!(token.attr("tag"), Some("VB"));
        assert_eq!(token.attr("lemma"), None);
        assert_eq!(token.attrs().count(), 2);

        let mut map = HashMap::new();
        map.insert("tag".to_string(), "NN".to_string());
        assert_eq!(map.attr("tag"), Some("NN"));
        assert_eq!((&map).attr("word"), None);
    }
}
