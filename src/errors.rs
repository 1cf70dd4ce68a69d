use crate::syntax;
use std::result;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] syntax::Error),
    /// The instruction sequence does not evaluate to exactly one fragment.
    #[error("malformed instruction sequence at {index}: {reason}")]
    MalformedProgram { index: usize, reason: &'static str },
    #[error("conjunction at instruction {index} needs two single-token operands")]
    ConjunctionOperand { index: usize },
    #[error("predicate evaluated against a missing token record")]
    MissingRecord,
    #[error("simulation exceeded the step limit of {0}")]
    StepLimitExceeded(usize),
}
