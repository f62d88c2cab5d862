use crate::{
    math::OrderedSet,
    prelude::*,
    transition_system::reachable::{separate, ProductStep},
};

use super::mealy::joint_symbols;

/// A deterministic finite automaton (DFA) is a deterministic automaton with a simple acceptance
/// condition. It accepts a finite word if it reaches a final state, which are the states colored
/// `true`. The transition function may be partial, a word whose run gets stuck is rejected.
///
/// A DFA that is obtained through [`crate::determinization::determinize`] remembers for each of
/// its states the set of states of the nondeterministic automaton it was built from. This
/// correspondence can be queried with [`Dfa::subset`] and dropped with [`Dfa::forget_subsets`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa<S = char> {
    ts: StateTable<S, bool, Void>,
    initial: StateIndex,
    subsets: Vec<OrderedSet<StateIndex>>,
}

impl<S: Symbol> Dfa<S> {
    /// Combines the given table with the designated initial state, checking that the initial
    /// state exists and that all transitions point to existing states.
    pub fn from_parts(ts: StateTable<S, bool, Void>, initial: StateIndex) -> Result<Self, Error> {
        ts.validate()?;
        if initial >= ts.size() && !ts.is_empty() {
            return Err(MalformedInput::UnknownState {
                state: initial,
                declared: ts.size(),
            }
            .into());
        }
        Ok(Self {
            ts,
            initial,
            subsets: vec![],
        })
    }

    /// Builds a DFA that remembers which set of states of some NFA each of its states
    /// corresponds to.
    pub(crate) fn with_subsets(
        ts: StateTable<S, bool, Void>,
        initial: StateIndex,
        subsets: Vec<OrderedSet<StateIndex>>,
    ) -> Self {
        debug_assert_eq!(ts.size(), subsets.len());
        Self {
            ts,
            initial,
            subsets,
        }
    }

    /// Returns a builder for DFAs.
    pub fn builder() -> TSBuilder<S, bool, Void> {
        TSBuilder::without_edge_colors()
    }

    /// Gives a reference to the underlying table.
    pub fn ts(&self) -> &StateTable<S, bool, Void> {
        &self.ts
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.ts.size()
    }

    /// Gives a reference to the alphabet.
    pub fn alphabet(&self) -> &Alphabet<S> {
        self.ts.alphabet()
    }

    /// Returns true if `q` is a final state.
    pub fn is_final(&self, q: StateIndex) -> bool {
        self.ts.state_color(q).copied().unwrap_or(false)
    }

    /// Returns the indices of all final states in ascending order.
    pub fn final_states(&self) -> Vec<StateIndex> {
        self.ts.state_indices().filter(|&q| self.is_final(q)).collect()
    }

    /// Returns the target of the transition from `q` on `symbol`.
    pub fn successor(&self, q: StateIndex, symbol: &S) -> Option<StateIndex> {
        self.ts.successor(q, symbol)
    }

    /// Returns true if every state has a transition on every symbol.
    pub fn is_total(&self) -> bool {
        self.ts.is_complete()
    }

    /// Returns the set of NFA states that the state `q` corresponds to, if this DFA
    /// was obtained through determinization and the correspondence was not dropped.
    pub fn subset(&self, q: StateIndex) -> Option<&OrderedSet<StateIndex>> {
        self.subsets.get(q)
    }

    /// Returns the subsets of all states, indexed by state. This is empty if the DFA was not
    /// produced by determinization.
    pub fn subsets(&self) -> &[OrderedSet<StateIndex>] {
        &self.subsets
    }

    /// Drops the correspondence between states and sets of NFA states.
    pub fn forget_subsets(mut self) -> Self {
        self.subsets = vec![];
        self
    }

    /// Decides whether `word` is accepted. A word whose run gets stuck is rejected.
    pub fn accepts<'a, W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        if self.ts.is_empty() {
            return false;
        }
        self.ts
            .run_from(self.initial, word)
            .map(|run| run.last().map_or(self.initial, |(q, _)| *q))
            .is_some_and(|q| self.is_final(q))
    }

    /// Views `self` as a Moore machine with outputs of type `bool`.
    pub fn as_moore(&self) -> MooreMachine<S, bool> {
        MooreMachine::from_parts(self.ts.clone(), self.initial)
            .expect("a dfa is always a well formed moore machine")
    }

    /// Interprets a Moore machine with `bool` outputs as a DFA.
    pub fn from_moore(moore: MooreMachine<S, bool>) -> Self {
        let (ts, initial) = moore.into_parts();
        Self {
            ts,
            initial,
            subsets: vec![],
        }
    }

    /// Tries to find a word in the symmetric difference of the languages of `self` and `other`.
    /// The word that is returned is a shortest one.
    pub fn separating_word(&self, other: &Dfa<S>) -> Option<Vec<S>> {
        let start = (
            (!self.ts.is_empty()).then_some(self.initial),
            (!other.ts.is_empty()).then_some(other.initial),
        );
        let accepting =
            |(l, r): (Option<StateIndex>, Option<StateIndex>)| -> (bool, bool) {
                (
                    l.is_some_and(|q| self.is_final(q)),
                    r.is_some_and(|q| other.is_final(q)),
                )
            };
        let (left, right) = accepting(start);
        if left != right {
            return Some(vec![]);
        }
        let symbols = joint_symbols(self.alphabet(), other.alphabet());
        separate(&symbols, start, |&(l, r), sym| {
            let next = (
                l.and_then(|q| self.successor(q, sym)),
                r.and_then(|q| other.successor(q, sym)),
            );
            match next {
                (None, None) => ProductStep::Blocked,
                _ => {
                    let (left, right) = accepting(next);
                    if left == right {
                        ProductStep::Continue(next)
                    } else {
                        ProductStep::Separated
                    }
                }
            }
        })
    }

    /// Checks whether `self` is equivalent to `other`, i.e. whether the two DFAs accept
    /// the same language.
    pub fn equivalent(&self, other: &Dfa<S>) -> bool {
        self.separating_word(other).is_none()
    }
}

impl<S: Symbol> std::fmt::Display for Dfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.ts.build_transition_table(
                |q, accepting| {
                    let mut name = if q == self.initial {
                        format!("→ {q}")
                    } else {
                        q.to_string()
                    };
                    if let Some(subset) = self.subset(q) {
                        name.push(' ');
                        name.push_str(&StateIndex::show_collection(subset.iter()));
                    }
                    if *accepting {
                        name.push_str(" *");
                    }
                    name
                },
                |p, _| p.to_string()
            )
        )
    }
}
