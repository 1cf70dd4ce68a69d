//! Regular expressions over sequences of attributed tokens.
//!
//! A pattern such as `{tag:DT} {tag:/^JJ/}* [dog | cat]` is parsed into a
//! postfix instruction sequence ([`syntax`]), compiled into an NFA whose
//! transitions are predicates over token records ([`automata`]), and run
//! against a token sequence by simulating all threads in lockstep
//! ([`executor`]). [`TokensRegex`] ties the three together.
//!
//! ```
//! use tokensregex::TokensRegex;
//!
//! let re = TokensRegex::new("the [big | small]? dog+", "").unwrap();
//! assert_eq!(re.exec("the dog"), Ok(true));
//! assert_eq!(re.exec("the small dog dog"), Ok(true));
//! assert_eq!(re.exec("a dog"), Ok(false));
//! ```

pub mod automata;
pub mod config;
pub mod errors;
pub mod executor;
pub mod matcher;
pub mod syntax;
pub mod token;

pub use crate::config::Config;
pub use crate::errors::{Error, Result};
pub use crate::matcher::TokensRegex;
pub use crate::token::{Token, TokenRecord, Tokenizer, WhitespaceTokenizer};
