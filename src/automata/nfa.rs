use std::fmt;

use crate::automata::predicate::Predicate;

/// Index of a state in its automaton's arena.
pub type StateId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub(crate) pred: Predicate,
    pub(crate) out: Vec<StateId>,
    pub(crate) accepting: bool,
    /// Source text the state was built from, for dumps only.
    pub(crate) tag: Option<String>,
}

impl State {
    pub(crate) fn new(pred: Predicate, tag: &str) -> State {
        State {
            pred,
            out: vec![],
            accepting: false,
            tag: Some(tag.to_string()),
        }
    }

    pub(crate) fn accepting() -> State {
        State {
            pred: Predicate::AlwaysTrue,
            out: vec![],
            accepting: true,
            tag: Some("$".to_string()),
        }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.pred
    }

    /// Successors in the order they were attached.
    pub fn out(&self) -> &[StateId] {
        &self.out
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// A compiled automaton. Holds exactly the states reachable from `start`,
/// exactly one of which is accepting. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) states: Vec<State>,
    pub(crate) start: StateId,
    pub(crate) accept: StateId,
    pub(crate) default_attribute: String,
}

impl Nfa {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn accept(&self) -> StateId {
        self.accept
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The attribute `Literal` and `Pattern` predicates read.
    pub fn default_attribute(&self) -> &str {
        &self.default_attribute
    }

    /// Follows the `out` edge at each index of `path`, starting from `start`.
    pub fn follow(&self, path: &[usize]) -> Option<StateId> {
        path.iter()
            .try_fold(self.start, |id, &i| self.states.get(id)?.out.get(i).copied())
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            let marker = if id == self.start { ">" } else { " " };
            write!(f, "{}{:>3} {:<12}", marker, id, state.tag().unwrap_or("-"))?;
            if state.accepting {
                write!(f, " (match)")?;
            }
            writeln!(f, " -> {:?}", state.out)?;
        }
        Ok(())
    }
}
