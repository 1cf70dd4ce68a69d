use std::collections::HashSet;

use log::{debug, trace};

use crate::automata::nfa::{Nfa, StateId};
use crate::automata::predicate::Outcome;
use crate::config::Config;
use crate::errors::{Error, Result};
use crate::token::TokenRecord;

/// Runs every thread of an automaton in lockstep over a token sequence.
///
/// A match is existential: the input need not be consumed completely, it is
/// enough for some thread to reach the accepting state.
pub struct Executor {
    step_limit: Option<usize>,
}

impl Executor {
    pub fn new(config: &Config) -> Executor {
        Executor {
            step_limit: config.step_limit(),
        }
    }

    pub fn matches<R: TokenRecord>(&self, nfa: &Nfa, tokens: &[R]) -> Result<bool> {
        let mut frontier = Frontier::new();
        let mut clist = vec![];
        frontier.add(&mut clist, Thread::new(0, nfa.start()));

        let mut rounds = 0;
        loop {
            if clist.iter().any(|t| nfa.state(t.state).is_accepting()) {
                debug!("matched after {} rounds", rounds);
                return Ok(true);
            }
            if clist.is_empty() {
                debug!("no match after {} rounds", rounds);
                return Ok(false);
            }
            if let Some(limit) = self.step_limit {
                if rounds >= limit {
                    return Err(Error::StepLimitExceeded(limit));
                }
            }
            rounds += 1;

            let mut nlist = vec![];
            for t in clist.drain(..) {
                let state = nfa.state(t.state);
                let pos = match tokens.get(t.pos) {
                    // Out of input: only epsilon moves remain possible.
                    None if state.predicate().is_epsilon() => t.pos,
                    None => continue,
                    Some(record) => match state
                        .predicate()
                        .test(Some(record), nfa.default_attribute())?
                    {
                        Outcome::Match => t.pos + 1,
                        Outcome::Epsilon => t.pos,
                        Outcome::Fail => continue,
                    },
                };
                for &next in state.out() {
                    frontier.add(&mut nlist, Thread::new(pos, next));
                }
            }
            trace!("round {}: {} live threads", rounds, nlist.len());
            clist = nlist;
        }
    }
}

#[derive(PartialEq, Eq, Debug, Hash, Clone, Copy)]
struct Thread {
    pos: usize,
    state: StateId,
}

impl Thread {
    fn new(pos: usize, state: StateId) -> Thread {
        Thread { pos, state }
    }
}

/// Every `(position, state)` pair ever scheduled. A thread that was already
/// run yields the same successors again, so it is never rescheduled; this
/// bounds a simulation by `states * (tokens + 1)` thread evaluations.
struct Frontier {
    seen: HashSet<Thread>,
}

impl Frontier {
    fn new() -> Frontier {
        Frontier {
            seen: HashSet::new(),
        }
    }

    fn add(&mut self, list: &mut Vec<Thread>, t: Thread) {
        if self.seen.insert(t) {
            list.push(t);
        }
    }
}

#[cfg(test)]
mod test {
    use super::Executor;
    use crate::automata::compiler::Compiler;
    use crate::automata::nfa::Nfa;
    use crate::config::Config;
    use crate::errors::Error;
    use crate::syntax;
    use crate::token::Token;

    fn c(s: &str) -> Nfa {
        let insts = syntax::parse(s).expect("should be valid pattern");
        Compiler::new().compile(&insts).expect("should compile")
    }

    fn toks(s: &str) -> Vec<Token> {
        if s.is_empty() {
            return vec![];
        }
        s.split(' ').map(Token::word).collect()
    }

    fn ex() -> Executor {
        Executor::new(&Config::default())
    }

    fn m(p: &Nfa, s: &str) -> bool {
        ex().matches(p, &toks(s)).expect("should run")
    }

    #[test]
    fn concat() {
        let p = &c("a b");
        assert_eq!(true, m(p, "a b"));
        assert_eq!(false, m(p, "a"));
        assert_eq!(false, m(p, "b a"));
        assert_eq!(false, m(p, ""));
        assert_eq!(true, m(p, "a b c"));
    }

    #[test]
    fn alternation() {
        let p = &c("[a | b]");
        assert_eq!(true, m(p, "a"));
        assert_eq!(true, m(p, "b"));
        assert_eq!(false, m(p, "c"));
        assert_eq!(false, m(p, ""));
    }

    #[test]
    fn maybe() {
        let p = &c("a?b");
        assert_eq!(true, m(p, "b"));
        assert_eq!(true, m(p, "a b"));
        assert_eq!(false, m(p, "a"));
        assert_eq!(false, m(p, "a a b"));

        assert_eq!(true, m(&c("a b?"), "a"));
    }

    #[test]
    fn plus() {
        let p = &c("a+");
        assert_eq!(false, m(p, ""));
        assert_eq!(true, m(p, "a"));
        assert_eq!(true, m(p, "a a"));
        assert_eq!(true, m(p, "a a a"));
        assert_eq!(false, m(p, "b a"));

        let p = &c("a+ b");
        assert_eq!(false, m(p, "b"));
        assert_eq!(true, m(p, "a b"));
        assert_eq!(true, m(p, "a a a a b"));
        assert_eq!(false, m(p, "a a c"));
    }

    #[test]
    fn star() {
        let p = &c("a* b");
        assert_eq!(true, m(p, "b"));
        assert_eq!(true, m(p, "a b"));
        assert_eq!(true, m(p, "a a a a b"));
        assert_eq!(false, m(p, "a a"));

        assert_eq!(true, m(&c("a*"), ""));
        assert_eq!(true, m(&c("a b*"), "a"));
    }

    #[test]
    fn complex() {
        let p = &c("a ([b c | c d])* e");
        assert_eq!(true, m(p, "a e"));
        assert_eq!(true, m(p, "a b c e"));
        assert_eq!(true, m(p, "a c d e"));
        assert_eq!(true, m(p, "a b c c d b c e"));
        assert_eq!(false, m(p, "a b c c d"));
        assert_eq!(false, m(p, "a b e"));
    }

    #[test]
    fn epsilon_cycles_terminate() {
        assert_eq!(false, m(&c("(a?)* b"), "c c"));
        assert_eq!(true, m(&c("(a?)* b"), "a a b"));
        assert_eq!(false, m(&c("(a*)+ b"), ""));
        assert_eq!(false, m(&c("[a? | b*]* c"), "a b a"));
    }

    #[test]
    fn attributes() {
        let p = &c("{tag:/^DT$/} {tag:/^JJ/}* {tag:NN}");
        let t = |w: &str, tag: &str| Token::word(w).with_attr("tag", tag);
        let sentence = vec![t("the", "DT"), t("big", "JJ"), t("red", "JJR"), t("dog", "NN")];
        assert_eq!(true, ex().matches(p, &sentence).unwrap());
        assert_eq!(false, ex().matches(p, &sentence[1..]).unwrap());
    }

    #[test]
    fn step_limit() {
        let p = &c("a b c");
        let limited = Executor::new(&Config::builder().step_limit(Some(2)).build());
        assert_eq!(
            limited.matches(p, &toks("a b c")),
            Err(Error::StepLimitExceeded(2))
        );
        let enough = Executor::new(&Config::builder().step_limit(Some(3)).build());
        assert_eq!(enough.matches(p, &toks("a b c")), Ok(true));
    }
}
