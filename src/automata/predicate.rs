use std::fmt;

use crate::errors::{Error, Result};
use crate::syntax::{Pattern, Value};
use crate::token::TokenRecord;

/// Result of testing one state against one token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The token is consumed and the successors run on the next position.
    Match,
    Fail,
    /// The successors run on the same position.
    Epsilon,
}

/// The test a state applies to a token record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// The default attribute equals the literal.
    Literal(String),
    /// The pattern occurs in the default attribute.
    Pattern(Pattern),
    Attribute { name: String, value: Value },
    /// Every predicate holds for the same token.
    Conjunction(Vec<Predicate>),
    AlwaysTrue,
    Epsilon,
}

impl Predicate {
    /// Tests `record`. Absent attributes fail; an absent record is a contract
    /// violation by whoever produced the records.
    pub fn test<R: TokenRecord + ?Sized>(
        &self,
        record: Option<&R>,
        default_attribute: &str,
    ) -> Result<Outcome> {
        let record = record.ok_or(Error::MissingRecord)?;
        Ok(self.eval(record, default_attribute))
    }

    fn eval<R: TokenRecord + ?Sized>(&self, record: &R, default_attribute: &str) -> Outcome {
        let matched = match *self {
            Predicate::Literal(ref literal) => record.attr(default_attribute) == Some(literal.as_str()),
            Predicate::Pattern(ref re) => record.attr(default_attribute).map_or(false, |v| re.is_match(v)),
            Predicate::Attribute {
                ref name,
                ref value,
            } => match (record.attr(name), value) {
                (None, _) => false,
                (Some(v), Value::Literal(literal)) => v == literal,
                (Some(v), Value::Pattern(re)) => re.is_match(v),
            },
            Predicate::Conjunction(ref all) => all
                .iter()
                .all(|p| p.eval(record, default_attribute) == Outcome::Match),
            Predicate::AlwaysTrue => true,
            Predicate::Epsilon => return Outcome::Epsilon,
        };
        if matched {
            Outcome::Match
        } else {
            Outcome::Fail
        }
    }

    pub fn is_epsilon(&self) -> bool {
        *self == Predicate::Epsilon
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Predicate::Literal(ref literal) => f.write_str(literal),
            Predicate::Pattern(ref re) => fmt::Display::fmt(re, f),
            Predicate::Attribute {
                ref name,
                ref value,
            } => write!(f, "{{{}:{}}}", name, value),
            Predicate::Conjunction(ref all) => {
                f.write_str("[")?;
                for (i, p) in all.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    write!(f, "{}", p)?;
                }
                f.write_str("]")
            }
            Predicate::AlwaysTrue => f.write_str("true"),
            Predicate::Epsilon => f.write_str("ε"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, Predicate};
    use crate::errors::Error;
    use crate::syntax::{Pattern, Value};
    use crate::token::Token;
    use pretty_assertions::assert_eq;

    fn lit(s: &str) -> Predicate {
        Predicate::Literal(s.to_string())
    }

    fn pat(s: &str) -> Predicate {
        Predicate::Pattern(Pattern::new(s).unwrap())
    }

    fn attr(name: &str, value: Value) -> Predicate {
        Predicate::Attribute {
            name: name.to_string(),
            value,
        }
    }

    fn test(p: &Predicate, token: &Token) -> Outcome {
        p.test(Some(token), "word").expect("record present")
    }

    fn word(w: &str) -> Token {
        Token::word(w)
    }

    #[test]
    fn literal() {
        use Outcome::{Fail, Match};
        let cases = [
            ("a", word("a"), Match),
            ("a", word("apple"), Fail),
            ("a", word("fooa"), Fail),
            ("a", word(""), Fail),
            ("a", Token::new(), Fail),
            ("apple", word("apple"), Match),
        ];
        for (l, token, expected) in cases {
            assert_eq!(test(&lit(l), &token), expected, "{} =~ {:?}", l, token);
        }
    }

    #[test]
    fn pattern() {
        use Outcome::{Fail, Match};
        let cases = [
            ("a", word("a"), Match),
            ("a", word("apple"), Match),
            ("a", word("fooa"), Match),
            ("a", Token::new(), Fail),
            ("a", word(""), Fail),
            ("apple", word("apple"), Match),
            ("apple", word("a"), Fail),
            ("^a$", word("abc"), Fail),
            ("^a$", word("a"), Match),
            ("a+b", word("b"), Fail),
            ("a+b", word("ab"), Match),
            ("a+b", word("aaaaab"), Match),
            ("a+b", word("aaaaac"), Fail),
        ];
        for (p, token, expected) in cases {
            assert_eq!(test(&pat(p), &token), expected, "/{}/ =~ {:?}", p, token);
        }
    }

    #[test]
    fn attribute() {
        let yes = attr("word", Value::Literal("yes".to_string()));
        assert_eq!(
            test(&attr("a", Value::Literal("b".to_string())), &Token::new().with_attr("a", "b")),
            Outcome::Match
        );
        assert_eq!(test(&yes, &word("yes")), Outcome::Match);
        assert_eq!(test(&yes, &Token::new().with_attr("a", "b")), Outcome::Fail);
        assert_eq!(test(&yes, &word("no")), Outcome::Fail);
        assert_eq!(test(&yes, &word("yess")), Outcome::Fail);

        let a = attr("word", Value::Pattern(Pattern::new("a").unwrap()));
        assert_eq!(test(&a, &word("abc")), Outcome::Match);
        assert_eq!(test(&a, &word("bcd")), Outcome::Fail);

        let tag = attr("tag", Value::Pattern(Pattern::new("^NN").unwrap()));
        assert_eq!(test(&tag, &word("dog").with_attr("tag", "NNS")), Outcome::Match);
        assert_eq!(test(&tag, &word("dog")), Outcome::Fail);
    }

    #[test]
    fn missing_record() {
        for p in [lit("a"), pat("a"), Predicate::Epsilon, Predicate::AlwaysTrue] {
            assert_eq!(p.test(None::<&Token>, "word"), Err(Error::MissingRecord));
        }
    }

    #[test]
    fn conjunction() {
        let and = |a: &str, b: &str| Predicate::Conjunction(vec![pat(a), pat(b)]);
        assert_eq!(test(&and("^ab[cde]$", "de"), &word("abcd")), Outcome::Fail);
        assert_eq!(test(&and("^ab[cde]$", "de"), &word("abcde")), Outcome::Fail);
        assert_eq!(test(&and("^ab[cde]+$", "de"), &word("abcde")), Outcome::Match);

        let many = Predicate::Conjunction(vec![lit("abc"), pat("^a"), pat("c$")]);
        assert_eq!(test(&many, &word("abc")), Outcome::Match);
        assert_eq!(test(&many, &word("abd")), Outcome::Fail);
        assert_eq!(many.to_string(), "[abc & /^a/ & /c$/]");
    }

    #[test]
    fn constant_predicates() {
        assert_eq!(test(&Predicate::Epsilon, &word("a")), Outcome::Epsilon);
        assert_eq!(test(&Predicate::AlwaysTrue, &Token::new()), Outcome::Match);
        assert!(Predicate::Epsilon.is_epsilon());
        assert!(!Predicate::AlwaysTrue.is_epsilon());
    }
}
