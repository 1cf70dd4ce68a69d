//! Compilation of postfix instructions into a predicate-labelled NFA.

pub mod compiler;
pub mod nfa;
pub mod predicate;

pub use self::compiler::Compiler;
pub use self::nfa::{Nfa, State, StateId};
pub use self::predicate::{Outcome, Predicate};
