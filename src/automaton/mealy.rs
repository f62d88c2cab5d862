use itertools::Itertools;

use crate::{
    prelude::*,
    transition_system::reachable::{separate, ProductStep},
};

/// A Mealy machine is a transition system where each transition has an output. Thus, the output
/// of running a Mealy machine on a word produces a sequence of outputs, one for each transition
/// that is taken. Note that since the empty word does not take any transitions, it does not
/// produce any output. For a word of length `n`, there are `n` outputs.
///
/// The transition function may be partial, running a word for which some transition is
/// missing produces no output at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealyMachine<S = char, O = usize> {
    ts: StateTable<S, Void, O>,
    initial: StateIndex,
}

impl<S: Symbol, O: Color> MealyMachine<S, O> {
    /// Combines the given table with the designated initial state. This fails if the
    /// initial state does not exist or if some transition leads to a state that does not exist.
    /// A table without any states is accepted, the algorithms report it as empty.
    pub fn from_parts(ts: StateTable<S, Void, O>, initial: StateIndex) -> Result<Self, Error> {
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

    /// Returns a builder for Mealy machines.
    pub fn builder() -> TSBuilder<S, Void, O> {
        TSBuilder::without_state_colors()
    }

    /// Decomposes `self` into the underlying table and the initial state.
    pub fn into_parts(self) -> (StateTable<S, Void, O>, StateIndex) {
        (self.ts, self.initial)
    }

    /// Gives a reference to the underlying table.
    pub fn ts(&self) -> &StateTable<S, Void, O> {
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

    /// Returns the target and output of the transition from `q` on `symbol`.
    pub fn transition(&self, q: StateIndex, symbol: &S) -> Option<(StateIndex, &O)> {
        self.ts.edge(q, symbol).map(|(p, o)| (*p, o))
    }

    /// Runs `word` from the initial state and returns the produced outputs, one per symbol. If
    /// some transition is missing, `None` is returned.
    pub fn map<'a, W>(&self, word: W) -> Option<Vec<O>>
    where
        W: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        self.map_from(self.initial, word)
    }

    /// Works like [`Self::map`], but starts in `from`.
    pub fn map_from<'a, W>(&self, from: StateIndex, word: W) -> Option<Vec<O>>
    where
        W: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        self.ts
            .run_from(from, word)
            .map(|run| run.into_iter().map(|(_, o)| o.clone()).collect())
    }

    /// Returns all outputs that can be emitted by a transition reachable from the initial state,
    /// without duplicates and in their natural order.
    pub fn color_range(&self) -> Vec<O> {
        self.ts
            .reachable_state_indices(self.initial)
            .into_iter()
            .flat_map(|q| self.ts.edges_from(q).map(|(_, _, o)| o.clone()))
            .unique()
            .sorted()
            .collect()
    }

    /// Attempts to construct a word that separates the two machines, meaning
    /// it produces different outputs when run in both machines. A word on which one machine
    /// has a transition and the other does not also separates them.
    /// If no such word exists, the function returns `None`. The returned witness is
    /// a shortest one.
    pub fn witness_inequivalence(&self, other: &MealyMachine<S, O>) -> Option<Vec<S>> {
        if self.ts.is_empty() || other.ts.is_empty() {
            return (self.ts.is_empty() != other.ts.is_empty()).then(Vec::new);
        }
        let symbols = joint_symbols(self.alphabet(), other.alphabet());
        separate(&symbols, (self.initial, other.initial), |&(l, r), sym| {
            match (self.transition(l, sym), other.transition(r, sym)) {
                (None, None) => ProductStep::Blocked,
                (Some((p, o)), Some((q, d))) if o == d => ProductStep::Continue((p, q)),
                _ => ProductStep::Separated,
            }
        })
    }

    /// Returns true if and only if both machines are bisimilar, meaning for all possible
    /// inputs, they will produce the same output.
    pub fn bisimilar(&self, other: &MealyMachine<S, O>) -> bool {
        self.witness_inequivalence(other).is_none()
    }
}

/// The symbols of `left` in order followed by those symbols of `right` that `left` lacks.
pub(crate) fn joint_symbols<S: Symbol>(left: &Alphabet<S>, right: &Alphabet<S>) -> Vec<S> {
    left.universe()
        .chain(right.universe().filter(|sym| !left.contains(sym)))
        .collect()
}

impl<S: Symbol, O: Color> std::fmt::Display for MealyMachine<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.ts.build_transition_table(
                |q, _| if q == self.initial {
                    format!("→ {q}")
                } else {
                    q.to_string()
                },
                |p, o| format!("{p}|{}", o.show())
            )
        )
    }
}
