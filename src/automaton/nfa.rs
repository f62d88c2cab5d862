use itertools::Itertools;

use crate::{
    determinization::{epsilon_closure, moves},
    math::{OrderedMap, OrderedSet},
    prelude::*,
};

/// A nondeterministic finite automaton, possibly with epsilon transitions. Every state may
/// have any number of transitions on a [`Label`], which is either a symbol of the alphabet or
/// epsilon. A word is accepted if some run on it, which may take epsilon transitions at any
/// point, ends in a final state.
///
/// Use an [`NfaBuilder`] to construct one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa<S = char> {
    alphabet: Alphabet<S>,
    finals: Vec<bool>,
    transitions: Vec<OrderedMap<Label<S>, OrderedSet<StateIndex>>>,
    initial: StateIndex,
}

impl<S: Symbol> Nfa<S> {
    /// Returns a builder for an [`Nfa`].
    pub fn builder() -> NfaBuilder<S> {
        NfaBuilder::default()
    }

    /// Gives a reference to the alphabet, which does not contain epsilon.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.finals.len()
    }

    /// Returns true if there is no state.
    pub fn is_empty(&self) -> bool {
        self.finals.is_empty()
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateIndex {
        self.initial
    }

    /// Returns true if `q` is a final state.
    pub fn is_final(&self, q: StateIndex) -> bool {
        self.finals.get(q).copied().unwrap_or(false)
    }

    /// Iterates over the final states in ascending order.
    pub fn final_states(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.finals
            .iter()
            .enumerate()
            .filter_map(|(q, f)| f.then_some(q))
    }

    /// Iterates over the targets of the transitions from `q` on `label` in ascending order.
    pub fn successors<'a>(
        &'a self,
        q: StateIndex,
        label: &Label<S>,
    ) -> impl Iterator<Item = StateIndex> + 'a {
        self.transitions
            .get(q)
            .and_then(|map| map.get(label))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Iterates over all transitions leaving `q` as pairs of label and target.
    pub fn transitions_from(
        &self,
        q: StateIndex,
    ) -> impl Iterator<Item = (&Label<S>, StateIndex)> + '_ {
        self.transitions
            .get(q)
            .into_iter()
            .flatten()
            .flat_map(|(label, targets)| targets.iter().map(move |p| (label, *p)))
    }

    /// Returns true if some state has an epsilon transition.
    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions
            .iter()
            .any(|map| map.contains_key(&Label::Epsilon))
    }

    /// Decides whether `word` is accepted by simulating all runs at once.
    pub fn accepts<'a, W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        if self.is_empty() {
            return false;
        }
        let mut current = epsilon_closure(self, [self.initial]);
        for symbol in word {
            if current.is_empty() {
                return false;
            }
            current = epsilon_closure(self, moves(self, &current, symbol));
        }
        current.into_iter().any(|q| self.is_final(q))
    }
}

impl<S: Symbol> std::fmt::Display for Nfa<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels = std::iter::once(Label::Epsilon)
            .chain(self.alphabet.universe().map(Label::Symbol))
            .collect_vec();
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(labels.iter().map(|l| l.show())),
        );
        for q in 0..self.size() {
            let mut name = if q == self.initial {
                format!("→ {q}")
            } else {
                q.to_string()
            };
            if self.is_final(q) {
                name.push_str(" *");
            }
            let row = std::iter::once(name).chain(labels.iter().map(|label| {
                let targets = self.successors(q, label).collect_vec();
                if targets.is_empty() {
                    "-".to_string()
                } else {
                    targets.show()
                }
            }));
            builder.push_record(row);
        }
        write!(
            f,
            "{}",
            builder.build().with(tabled::settings::Style::rounded())
        )
    }
}

/// Collects the transitions and final states of an [`Nfa`] and validates them upon
/// conversion. Just like a [`TSBuilder`], the alphabet and the number of states are
/// inferred unless they are declared.
///
/// # Example
/// ```
/// use automata_algebra::prelude::*;
///
/// let nfa = Nfa::builder()
///     .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'a', 1)])
///     .with_epsilon_transitions([(1, 2)])
///     .with_final_states([2])
///     .into_nfa(0)
///     .unwrap();
/// assert!(nfa.accepts(&['b', 'a']));
/// assert!(!nfa.accepts(&['a', 'b']));
/// ```
#[derive(Debug, Clone)]
pub struct NfaBuilder<S = char> {
    symbols: Option<Vec<S>>,
    declared_states: Option<usize>,
    transitions: Vec<(StateIndex, Label<S>, StateIndex)>,
    finals: Vec<StateIndex>,
}

impl<S> Default for NfaBuilder<S> {
    fn default() -> Self {
        Self {
            symbols: None,
            declared_states: None,
            transitions: vec![],
            finals: vec![],
        }
    }
}

impl<S> NfaBuilder<S> {
    /// Declares the alphabet, the symbols are kept in the given order.
    pub fn with_alphabet<I: IntoIterator<Item = S>>(mut self, symbols: I) -> Self {
        self.symbols = Some(symbols.into_iter().collect());
        self
    }

    /// Declares the number of states.
    pub fn with_states(mut self, count: usize) -> Self {
        self.declared_states = Some(count);
        self
    }

    /// Adds transitions that consume a symbol, each given as source, symbol and target.
    pub fn with_transitions<I: IntoIterator<Item = (StateIndex, S, StateIndex)>>(
        mut self,
        iter: I,
    ) -> Self {
        self.transitions
            .extend(iter.into_iter().map(|(q, a, p)| (q, Label::Symbol(a), p)));
        self
    }

    /// Adds epsilon transitions, each given as source and target.
    pub fn with_epsilon_transitions<I: IntoIterator<Item = (StateIndex, StateIndex)>>(
        mut self,
        iter: I,
    ) -> Self {
        self.transitions
            .extend(iter.into_iter().map(|(q, p)| (q, Label::Epsilon, p)));
        self
    }

    /// Marks the given states as final.
    pub fn with_final_states<I: IntoIterator<Item = StateIndex>>(mut self, iter: I) -> Self {
        self.finals.extend(iter);
        self
    }
}

impl<S: Symbol> NfaBuilder<S> {
    /// Validates the collected data and builds an [`Nfa`] with the given initial state.
    pub fn into_nfa(self, initial: StateIndex) -> Result<Nfa<S>, Error> {
        let size = self.declared_states.unwrap_or_else(|| {
            self.transitions
                .iter()
                .flat_map(|(q, _, p)| [*q, *p])
                .chain(self.finals.iter().copied())
                .max()
                .map_or(0, |max| max + 1)
        });
        let alphabet: Alphabet<S> = match self.symbols {
            Some(symbols) => Alphabet::new(symbols),
            None => self
                .transitions
                .iter()
                .filter_map(|(_, label, _)| label.symbol().cloned())
                .collect(),
        };

        let unknown = |state| MalformedInput::UnknownState {
            state,
            declared: size,
        };
        if size > 0 && initial >= size {
            return Err(unknown(initial).into());
        }

        let mut finals = vec![false; size];
        for q in self.finals {
            *finals.get_mut(q).ok_or_else(|| unknown(q))? = true;
        }

        let mut transitions = vec![OrderedMap::<Label<S>, OrderedSet<StateIndex>>::new(); size];
        for (q, label, p) in self.transitions {
            if let Some(state) = [q, p].into_iter().find(|&x| x >= size) {
                return Err(unknown(state).into());
            }
            if let Label::Symbol(sym) = &label {
                if !alphabet.contains(sym) {
                    return Err(MalformedInput::UnknownSymbol {
                        state: q,
                        symbol: sym.show(),
                    }
                    .into());
                }
            }
            transitions[q].entry(label).or_default().insert(p);
        }

        Ok(Nfa {
            alphabet,
            finals,
            transitions,
            initial,
        })
    }
}
