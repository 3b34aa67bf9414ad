use std::collections::{BTreeMap, VecDeque};
use std::collections::btree_map::Entry;
use std::str;
use bit_set::BitSet;
use log::{debug, trace};
use crate::followpos::Followpos;
use crate::regex::{ParseError, Symbol};
use crate::tree::{Positions, Tree};

pub type StateId = u32;

/// A DFA state: a set of leaf positions and its outgoing transitions.
/// A symbol missing from `by_char` has no transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub positions: BitSet,
    pub by_char: BTreeMap<char, StateId>,
    pub accepting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    /// Input symbols in ascending order.
    pub alphabet: Vec<char>,
    /// Indexed by state id; state 0 is the start state.
    pub states: Vec<State>,
}

impl Dfa {
    /// Subset construction over followpos, starting from `start`. States
    /// are numbered in discovery order.
    pub fn from_followpos(start: &BitSet, followpos: &Followpos, positions: &Positions) -> Dfa {
        fn index(worklist: &mut (BTreeMap<BitSet, StateId>, VecDeque<BitSet>), set: BitSet) -> StateId {
            let next_index = worklist.0.len() as StateId;
            match worklist.0.entry(set.clone()) {
                Entry::Vacant(view) => {
                    view.insert(next_index);
                    worklist.1.push_back(set);
                    next_index
                }
                Entry::Occupied(view) => *view.get(),
            }
        }

        let alphabet = positions.alphabet();
        let end = positions.end();
        let mut states = Vec::new();
        let mut worklist = (BTreeMap::new(), VecDeque::new());

        index(&mut worklist, start.clone());

        while let Some(current) = worklist.1.pop_front() {
            let mut by_char = BTreeMap::new();
            for &c in alphabet.iter() {
                let mut next = BitSet::new();
                for p in current.iter() {
                    let symbol = match positions.symbol(p) {
                        Some(symbol) => symbol,
                        None => panic!("position {} has no leaf", p),
                    };
                    if symbol == Symbol::Char(c) {
                        if let Some(follow) = followpos.get(p) {
                            next.union_with(follow);
                        }
                    }
                }
                if !next.is_empty() {
                    by_char.insert(c, index(&mut worklist, next));
                }
            }
            let accepting = end.map_or(false, |end| current.contains(end));
            trace!("state {}: {:?}{}", states.len(), current, if accepting { " (accepting)" } else { "" });
            states.push(State {
                positions: current,
                by_char: by_char,
                accepting: accepting,
            });
        }

        debug!("constructed DFA with {} states over {} symbols", states.len(), alphabet.len());
        Dfa { alphabet: alphabet, states: states }
    }

    pub fn from_tree(tree: &Tree, followpos: &Followpos) -> Dfa {
        Dfa::from_followpos(tree.root().firstpos(), followpos, tree.positions())
    }

    pub fn start(&self) -> StateId {
        0
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.states.get(state as usize).map_or(false, |s| s.accepting)
    }

    pub fn transition(&self, state: StateId, c: char) -> Option<StateId> {
        self.states.get(state as usize).and_then(|s| s.by_char.get(&c).cloned())
    }

    /// Runs `input` from the start state.
    pub fn matches(&self, input: &str) -> bool {
        let mut state = self.start();
        for c in input.chars() {
            match self.transition(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_accepting(state)
    }
}

impl str::FromStr for Dfa {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Dfa, ParseError> {
        crate::construct(s).map(|construction| construction.dfa)
    }
}
