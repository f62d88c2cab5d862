use itertools::Itertools;

use crate::{
    prelude::*,
    transition_system::reachable::{separate, ProductStep},
};

use super::mealy::joint_symbols;

/// A Moore machine is a transition system where each state has an output. Thus, the output
/// of running a Moore machine on a word produces a sequence of outputs, one for each state
/// that is visited. For a word of length `n`, there are `n+1` outputs, note in particular
/// that the empty word produces an output, which is in contrast to [`MealyMachine`]s, where
/// the empty word produces no output.
///
/// A [`crate::automaton::Dfa`] is essentially a Moore machine whose outputs are `bool`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MooreMachine<S = char, O = usize> {
    ts: StateTable<S, O, Void>,
    initial: StateIndex,
}

impl<S: Symbol, O: Color> MooreMachine<S, O> {
    /// Combines the given table with the designated initial state. This fails if the
    /// initial state does not exist or if some transition leads to a state that does not exist.
    pub fn from_parts(ts: StateTable<S, O, Void>, initial: StateIndex) -> Result<Self, Error> {
        ts.validate()?;
        if initial >= ts.size() && !ts.is_empty() {
            return Err(MalformedInput::UnknownState {
                state: initial,
                declared: ts.size(),
            }
            .into());
        }
        Ok(Self { ts, initial })
    }

    /// Returns a builder for Moore machines.
    pub fn builder() -> TSBuilder<S, O, Void> {
        TSBuilder::without_edge_colors()
    }

    /// Decomposes `self` into the underlying table and the initial state.
    pub fn into_parts(self) -> (StateTable<S, O, Void>, StateIndex) {
        (self.ts, self.initial)
    }

    /// Gives a reference to the underlying table.
    pub fn ts(&self) -> &StateTable<S, O, Void> {
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

    /// Returns the output of state `q`.
    pub fn output(&self, q: StateIndex) -> Option<&O> {
        self.ts.state_color(q)
    }

    /// Returns the target of the transition from `q` on `symbol`.
    pub fn successor(&self, q: StateIndex, symbol: &S) -> Option<StateIndex> {
        self.ts.successor(q, symbol)
    }

    /// Runs `word` from the initial state and returns the outputs of all visited states, starting
    /// with the output of the initial state. If some transition is missing, `None` is returned.
    pub fn map<'a, W>(&self, word: W) -> Option<Vec<O>>
    where
        W: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        let initial = self.output(self.initial)?.clone();
        let run = self.ts.run_from(self.initial, word)?;
        Some(
            std::iter::once(initial)
                .chain(
                    run.into_iter()
                        .filter_map(|(q, _)| self.ts.state_color(q).cloned()),
                )
                .collect(),
        )
    }

    /// Returns the output of the state that is reached by `word`, if it exists.
    pub fn reached_output<'a, W>(&self, word: W) -> Option<O>
    where
        W: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        self.map(word).and_then(|outputs| outputs.last().cloned())
    }

    /// Obtains the outputs of all reachable states, without duplicates and in their natural order.
    pub fn color_range(&self) -> Vec<O> {
        self.ts
            .reachable_state_indices(self.initial)
            .into_iter()
            .filter_map(|q| self.output(q).cloned())
            .unique()
            .sorted()
            .collect()
    }

    /// Returns a witness for the non-bisimilarity of `self` and `other`, i.e. a finite word
    /// that produces different outputs in the two moore machines. A word on which only one
    /// of the machines has a run is also a witness. If the two machines are
    /// bisimilar, `None` is returned.
    pub fn witness_non_bisimilarity(&self, other: &MooreMachine<S, O>) -> Option<Vec<S>> {
        if self.ts.is_empty() || other.ts.is_empty() {
            return (self.ts.is_empty() != other.ts.is_empty()).then(Vec::new);
        }
        if self.output(self.initial) != other.output(other.initial) {
            return Some(vec![]);
        }
        let symbols = joint_symbols(self.alphabet(), other.alphabet());
        separate(&symbols, (self.initial, other.initial), |&(l, r), sym| {
            match (self.successor(l, sym), other.successor(r, sym)) {
                (None, None) => ProductStep::Blocked,
                (Some(p), Some(q)) if self.output(p) == other.output(q) => {
                    ProductStep::Continue((p, q))
                }
                _ => ProductStep::Separated,
            }
        })
    }

    /// Returns true if `self` is bisimilar to `other`, i.e. if the two moore machines
    /// produce the same output for each finite word.
    pub fn bisimilar(&self, other: &MooreMachine<S, O>) -> bool {
        self.witness_non_bisimilarity(other).is_none()
    }
}

impl<S: Symbol, O: Color> std::fmt::Display for MooreMachine<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.ts.build_transition_table(
                |q, o| if q == self.initial {
                    format!("→ {q}|{}", o.show())
                } else {
                    format!("{q}|{}", o.show())
                },
                |p, _| p.to_string()
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::textbook_moore};

    #[test]
    fn moore_map() {
        let moore = textbook_moore();
        assert_eq!(moore.map(&[]), Some(vec!['a']));
        assert_eq!(moore.map(&['1', '0', '1']), Some(vec!['a', 'a', 'b', 'b']));
        assert_eq!(moore.reached_output(&['0']), Some('b'));
        assert_eq!(moore.map(&['2']), None);
        assert_eq!(moore.color_range(), vec!['a', 'b']);
    }

    #[test]
    fn moore_bisimilarity() {
        let moore = textbook_moore();
        let other = MooreMachine::builder()
            .with_state_colors(['a', 'b'])
            .with_edges([(0, '0', 1), (0, '1', 0), (1, '0', 1), (1, '1', 1)])
            .into_moore(0)
            .unwrap();
        assert!(moore.bisimilar(&other));

        let different = MooreMachine::builder()
            .with_state_colors(['a', 'b', 'c'])
            .with_edges([
                (0, '0', 1),
                (0, '1', 0),
                (1, '0', 1),
                (1, '1', 2),
                (2, '0', 2),
                (2, '1', 2),
            ])
            .into_moore(0)
            .unwrap();
        assert_eq!(
            moore.witness_non_bisimilarity(&different),
            Some(vec!['0', '1'])
        );
    }
}
