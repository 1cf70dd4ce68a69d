use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::automata::compiler::Compiler;
use crate::automata::nfa::Nfa;
use crate::config::Config;
use crate::errors::Result;
use crate::executor::Executor;
use crate::syntax;
use crate::token::{TokenRecord, Tokenizer, WhitespaceTokenizer};

/// Source used by [`TokensRegex::default`]; it matches any input.
pub const DEFAULT_SOURCE: &str = "/.*/*";

/// A compiled token pattern with a `RegExp`-like surface.
///
/// The automaton is shared behind an [`Arc`]: recompiling swaps in a new one
/// and leaves any simulation still holding the old automaton untouched.
pub struct TokensRegex<T: Tokenizer = WhitespaceTokenizer> {
    source: String,
    flags: String,
    nfa: Arc<Nfa>,
    config: Config,
    tokenizer: T,
}

impl TokensRegex {
    pub fn new(source: &str, flags: &str) -> Result<TokensRegex> {
        TokensRegex::with_config(source, flags, Config::default())
    }

    pub fn with_config(source: &str, flags: &str, config: Config) -> Result<TokensRegex> {
        let tokenizer = WhitespaceTokenizer::new(config.default_attribute());
        Ok(TokensRegex {
            source: source.to_string(),
            flags: flags.to_string(),
            nfa: Arc::new(build(source, &config)?),
            config,
            tokenizer,
        })
    }
}

impl<T: Tokenizer> TokensRegex<T> {
    /// Replaces the tokenizer `exec` uses to split its input.
    pub fn with_tokenizer<U: Tokenizer>(self, tokenizer: U) -> TokensRegex<U> {
        TokensRegex {
            source: self.source,
            flags: self.flags,
            nfa: self.nfa,
            config: self.config,
            tokenizer,
        }
    }

    pub fn source(&self) -> String {
        self.source.clone()
    }

    /// Stored verbatim; flags do not affect matching.
    pub fn flags(&self) -> String {
        self.flags.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn nfa(&self) -> Arc<Nfa> {
        Arc::clone(&self.nfa)
    }

    /// Re-parses and recompiles in place. On error the previous pattern is
    /// kept.
    pub fn compile(&mut self, source: &str, flags: &str) -> Result<&mut Self> {
        self.nfa = Arc::new(build(source, &self.config)?);
        self.source = source.to_string();
        self.flags = flags.to_string();
        Ok(self)
    }

    /// Tokenizes `text` and reports whether the pattern matches it.
    pub fn exec(&self, text: &str) -> Result<bool> {
        let tokens = self.tokenizer.tokenize(text);
        self.exec_records(&tokens)
    }

    /// Matches against records produced elsewhere, e.g. by a tagger.
    pub fn exec_records<R: TokenRecord>(&self, tokens: &[R]) -> Result<bool> {
        Executor::new(&self.config).matches(&self.nfa, tokens)
    }
}

impl Default for TokensRegex {
    fn default() -> Self {
        TokensRegex::new(DEFAULT_SOURCE, "").expect("default source must compile")
    }
}

impl<T: Tokenizer> fmt::Display for TokensRegex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl<T: Tokenizer> fmt::Debug for TokensRegex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokensRegex")
            .field("source", &self.source)
            .field("flags", &self.flags)
            .field("states", &self.nfa.len())
            .finish()
    }
}

fn build(source: &str, config: &Config) -> Result<Nfa> {
    let insts = syntax::parse(source)?;
    debug!("parsed {:?} into {} instructions", source, insts.len());
    Compiler::with_config(config).compile(&insts)
}
