use std::collections::VecDeque;
use std::{mem, result};

use log::debug;

use crate::{
    automata::nfa::{Nfa, State, StateId},
    automata::predicate::Predicate,
    config::{Config, DEFAULT_ATTRIBUTE},
    errors::Error,
    syntax::Inst,
};

/// A fragment under construction: its entry state plus the states whose
/// successor lists are still waiting for the next state.
struct Patch {
    hole: Hole,
    entry: StateId,
}

#[derive(Debug, PartialEq, Eq)]
enum Hole {
    None,
    One(StateId),
    Many(Vec<StateId>),
}
impl Hole {
    /// Merges `holes` into a single flat list, so a long alternation never
    /// nests.
    fn new(holes: Vec<Hole>) -> Hole {
        let mut ids = vec![];
        for hole in holes {
            match hole {
                Hole::None => {}
                Hole::One(id) => ids.push(id),
                Hole::Many(more) if ids.is_empty() => ids = more,
                Hole::Many(more) => ids.extend(more),
            }
        }
        match ids.len() {
            0 => Hole::None,
            1 => Hole::One(ids[0]),
            _ => Hole::Many(ids),
        }
    }
}

type ResultPatch = result::Result<Patch, Error>;

/// Thompson construction over postfix instructions.
pub struct Compiler {
    states: Vec<State>,
    default_attribute: String,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            states: vec![],
            default_attribute: DEFAULT_ATTRIBUTE.to_string(),
        }
    }

    pub fn with_config(config: &Config) -> Compiler {
        Compiler {
            states: vec![],
            default_attribute: config.default_attribute().to_string(),
        }
    }

    pub fn compile(mut self, insts: &[Inst]) -> result::Result<Nfa, Error> {
        let mut stack: Vec<Patch> = vec![];
        for (index, inst) in insts.iter().enumerate() {
            let patch = match *inst {
                Inst::Word(ref w) => self.c_atom(Predicate::Literal(w.clone()), inst),
                Inst::Regexp(ref re) => self.c_atom(Predicate::Pattern(re.clone()), inst),
                Inst::Attr(ref name, ref value) => self.c_atom(
                    Predicate::Attribute {
                        name: name.clone(),
                        value: value.clone(),
                    },
                    inst,
                ),
                Inst::Concat => {
                    let (e1, e2) = pop2(&mut stack, index)?;
                    self.c_concat(e1, e2)
                }
                Inst::Or => {
                    let (e1, e2) = pop2(&mut stack, index)?;
                    self.c_or(e1, e2)
                }
                Inst::And => {
                    let (e1, e2) = pop2(&mut stack, index)?;
                    self.c_and(e1, e2, index)?
                }
                Inst::Maybe => {
                    let e = pop1(&mut stack, index)?;
                    self.c_maybe(e)
                }
                Inst::Star => {
                    let e = pop1(&mut stack, index)?;
                    self.c_star(e)
                }
                Inst::Plus => {
                    let e = pop1(&mut stack, index)?;
                    self.c_plus(e)
                }
            };
            stack.push(patch);
        }

        let Patch { hole, entry } = match (stack.pop(), stack.is_empty()) {
            (Some(patch), true) => patch,
            _ => {
                return Err(Error::MalformedProgram {
                    index: insts.len(),
                    reason: "expected exactly one fragment",
                })
            }
        };
        let accept = self.push_state(State::accepting());
        self.fill(hole, accept);

        let nfa = self.into_nfa(entry)?;
        debug!(
            "compiled {} instructions into {} states",
            insts.len(),
            nfa.len()
        );
        Ok(nfa)
    }

    fn push_state(&mut self, state: State) -> StateId {
        let id = self.states.len();
        self.states.push(state);
        id
    }

    /// Attaches `goto` as the next successor of every state in `hole`.
    fn fill(&mut self, hole: Hole, goto: StateId) {
        match hole {
            Hole::None => {}
            Hole::One(id) => self.states[id].out.push(goto),
            Hole::Many(ids) => {
                for id in ids {
                    self.states[id].out.push(goto)
                }
            }
        }
    }

    fn c_atom(&mut self, pred: Predicate, inst: &Inst) -> Patch {
        let id = self.push_state(State::new(pred, &inst.to_string()));
        Patch {
            hole: Hole::One(id),
            entry: id,
        }
    }

    fn c_concat(&mut self, e1: Patch, e2: Patch) -> Patch {
        self.fill(e1.hole, e2.entry);
        Patch {
            hole: e2.hole,
            entry: e1.entry,
        }
    }

    fn c_or(&mut self, e1: Patch, e2: Patch) -> Patch {
        let mut split = State::new(Predicate::Epsilon, "|");
        split.out = vec![e1.entry, e2.entry];
        let id = self.push_state(split);
        Patch {
            hole: Hole::new(vec![e1.hole, e2.hole]),
            entry: id,
        }
    }

    /// Folds two single-token fragments into one state testing every
    /// predicate against the same token. Nested conjunctions are flattened.
    /// The operand states are left unreachable and dropped when the arena is
    /// compacted.
    fn c_and(&mut self, e1: Patch, e2: Patch, index: usize) -> ResultPatch {
        if !self.is_single_token(&e1) || !self.is_single_token(&e2) {
            return Err(Error::ConjunctionOperand { index });
        }
        let mut all = vec![];
        for entry in [e1.entry, e2.entry] {
            match mem::replace(&mut self.states[entry].pred, Predicate::Epsilon) {
                Predicate::Conjunction(preds) => all.extend(preds),
                pred => all.push(pred),
            }
        }
        let pred = Predicate::Conjunction(all);
        let id = self.push_state(State::new(pred, "&"));
        Ok(Patch {
            hole: Hole::One(id),
            entry: id,
        })
    }

    fn is_single_token(&self, patch: &Patch) -> bool {
        let state = &self.states[patch.entry];
        patch.hole == Hole::One(patch.entry) && state.out.is_empty() && !state.pred.is_epsilon()
    }

    fn c_maybe(&mut self, e: Patch) -> Patch {
        let mut split = State::new(Predicate::Epsilon, "?");
        split.out = vec![e.entry];
        let id = self.push_state(split);
        Patch {
            hole: Hole::new(vec![e.hole, Hole::One(id)]),
            entry: id,
        }
    }

    fn c_star(&mut self, e: Patch) -> Patch {
        let mut split = State::new(Predicate::Epsilon, "*");
        split.out = vec![e.entry];
        let id = self.push_state(split);
        self.fill(e.hole, id);
        Patch {
            hole: Hole::One(id),
            entry: id,
        }
    }

    fn c_plus(&mut self, e: Patch) -> Patch {
        let mut split = State::new(Predicate::Epsilon, "+");
        split.out = vec![e.entry];
        let id = self.push_state(split);
        self.fill(e.hole, id);
        Patch {
            hole: Hole::One(id),
            entry: e.entry,
        }
    }

    /// Renumbers the states reachable from `entry` in breadth-first order,
    /// so the entry becomes state 0 and nothing unreachable is kept.
    fn into_nfa(mut self, entry: StateId) -> result::Result<Nfa, Error> {
        let mut remap: Vec<Option<StateId>> = vec![None; self.states.len()];
        let mut order = vec![entry];
        let mut queue = VecDeque::from([entry]);
        remap[entry] = Some(0);
        while let Some(id) = queue.pop_front() {
            for &next in &self.states[id].out {
                if remap[next].is_none() {
                    remap[next] = Some(order.len());
                    order.push(next);
                    queue.push_back(next);
                }
            }
        }

        let mut states = Vec::with_capacity(order.len());
        let mut accept = None;
        for old in order {
            let mut state = mem::replace(&mut self.states[old], State::accepting());
            state.out = state.out.iter().filter_map(|&id| remap[id]).collect();
            if state.accepting {
                accept = Some(states.len());
            }
            states.push(state);
        }

        let accept = accept.ok_or(Error::MalformedProgram {
            index: 0,
            reason: "accepting state is unreachable",
        })?;
        Ok(Nfa {
            states,
            start: 0,
            accept,
            default_attribute: self.default_attribute,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

fn pop1(stack: &mut Vec<Patch>, index: usize) -> ResultPatch {
    stack.pop().ok_or(Error::MalformedProgram {
        index,
        reason: "missing operand",
    })
}

fn pop2(stack: &mut Vec<Patch>, index: usize) -> result::Result<(Patch, Patch), Error> {
    let e2 = pop1(stack, index)?;
    let e1 = pop1(stack, index)?;
    Ok((e1, e2))
}
