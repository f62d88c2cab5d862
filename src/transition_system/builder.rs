use itertools::Itertools;

use crate::{math::Set, prelude::*};

/// Helper struct for the construction of automata. It stores a list of transitions, a list of
/// state colors and optionally a default color, a declared alphabet and a declared number of states.
/// Upon conversion into a concrete automaton, the collected data is validated.
///
/// If no alphabet is declared, the alphabet consists of the symbols that appear on at least one
/// transition in their natural order. If no number of states is declared, it is one more than
/// the largest state index that appears anywhere.
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over the alphabet `['a', 'b']`. We want to add the following transitions:
/// - From state 0 to state 0 on symbol 'a'
/// - From state 0 to state 1 on symbol 'b'
/// - From state 1 to state 1 on symbol 'a'
/// - From state 1 to state 0 on symbol 'b'
///
/// Further, state 0 should be initial and colored `true` and state 1 should be colored `false`. This can be done as follows
/// ```
/// use automata_algebra::prelude::*;
///
/// let dfa = TSBuilder::without_edge_colors()
///     .with_state_colors([true, false]) // colors given in the order of the states
///     .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
///     .into_dfa(0) // 0 is the initial state
///     .unwrap();
/// assert!(dfa.accepts(&['b', 'b']));
/// ```
#[derive(Debug, Clone)]
pub struct TSBuilder<S = char, Q = Void, C = Void> {
    symbols: Option<Vec<S>>,
    declared_states: Option<usize>,
    edges: Vec<(StateIndex, S, C, StateIndex)>,
    default: Option<Q>,
    colors: Vec<(StateIndex, Q)>,
}

impl<S, C> TSBuilder<S, Void, C> {
    /// Creates an empty instance of `Self`, where states are uncolored (have color [`Void`]).
    /// This is what is needed for building a [`MealyMachine`].
    pub fn without_state_colors() -> Self {
        TSBuilder {
            symbols: None,
            declared_states: None,
            edges: vec![],
            default: Some(Void),
            colors: vec![],
        }
    }
}

impl<S, Q> TSBuilder<S, Q, Void> {
    /// Creates an empty instance of `Self`, where edges are uncolored (have color [`Void`]).
    /// This is what is needed for building a [`MooreMachine`] or a [`Dfa`].
    pub fn without_edge_colors() -> Self {
        TSBuilder {
            symbols: None,
            declared_states: None,
            edges: vec![],
            default: None,
            colors: vec![],
        }
    }

    /// Adds a list of uncolored transitions, each given as source, symbol and target.
    pub fn with_edges<I: IntoIterator<Item = (StateIndex, S, StateIndex)>>(
        mut self,
        iter: I,
    ) -> Self {
        self.edges
            .extend(iter.into_iter().map(|(q, a, p)| (q, a, Void, p)));
        self
    }
}

impl<S, Q, C> Default for TSBuilder<S, Q, C> {
    fn default() -> Self {
        Self {
            symbols: None,
            declared_states: None,
            edges: vec![],
            default: None,
            colors: vec![],
        }
    }
}

impl<S, Q, C> TSBuilder<S, Q, C> {
    /// Sets the default color for states that have no color specified.
    pub fn default_color(mut self, color: Q) -> Self {
        self.default = Some(color);
        self
    }

    /// Declares the alphabet. The symbols are kept in the given order, and every transition
    /// must use one of them.
    pub fn with_alphabet<I: IntoIterator<Item = S>>(mut self, symbols: I) -> Self {
        self.symbols = Some(symbols.into_iter().collect());
        self
    }

    /// Declares the number of states, every state that is referenced must be smaller than `count`.
    pub fn with_states(mut self, count: usize) -> Self {
        self.declared_states = Some(count);
        self
    }

    /// Assigns `color` to the state `q`.
    pub fn color(mut self, q: StateIndex, color: Q) -> Self {
        self.colors.push((q, color));
        self
    }

    /// Adds a list of colors to `self`. The colors are assigned to the states in the order in which they are given.
    /// This means if we give the colors `[true, false]` and then add a transition from state `0` to state `1`, then state
    /// `0` will have color `true` and state `1` will have color `false`.
    pub fn with_state_colors<I: IntoIterator<Item = Q>>(self, iter: I) -> Self {
        iter.into_iter()
            .enumerate()
            .fold(self, |acc, (i, x)| acc.color(i, x))
    }

    /// Adds a list of colored transitions, each given as source, symbol, color and target.
    pub fn with_transitions<I: IntoIterator<Item = (StateIndex, S, C, StateIndex)>>(
        mut self,
        iter: I,
    ) -> Self {
        self.edges.extend(iter);
        self
    }
}

impl<S: Symbol, Q: Clone, C: Clone> TSBuilder<S, Q, C> {
    fn state_count(&self) -> usize {
        self.declared_states.unwrap_or_else(|| {
            self.edges
                .iter()
                .flat_map(|(q, _, _, p)| [*q, *p])
                .chain(self.colors.iter().map(|(q, _)| *q))
                .max()
                .map_or(0, |max| max + 1)
        })
    }

    /// Validates the collected data and turns it into a [`StateTable`].
    pub fn into_table(self) -> Result<StateTable<S, Q, C>, MalformedInput> {
        let size = self.state_count();
        let alphabet = match self.symbols {
            Some(symbols) => Alphabet::new(symbols),
            None => self.edges.iter().map(|(_, a, _, _)| a.clone()).collect(),
        };

        if let Some((q, _)) = self.colors.iter().find(|(q, _)| *q >= size) {
            return Err(MalformedInput::UnknownState {
                state: *q,
                declared: size,
            });
        }

        let mut ts = StateTable::for_alphabet_size_hint(alphabet, size);
        for q in 0..size {
            // later colors overwrite earlier ones
            let color = self
                .colors
                .iter()
                .rev()
                .find_map(|(p, c)| (*p == q).then(|| c.clone()))
                .or_else(|| self.default.clone())
                .ok_or(MalformedInput::MissingOutput(q))?;
            ts.add_state(color);
        }

        let mut defined: Set<(StateIndex, usize)> = Set::default();
        for (q, a, c, p) in self.edges {
            if let Some(state) = [q, p].into_iter().find(|&x| x >= size) {
                return Err(MalformedInput::UnknownState {
                    state,
                    declared: size,
                });
            }
            let Some(pos) = ts.alphabet().position(&a) else {
                return Err(MalformedInput::UnknownSymbol {
                    state: q,
                    symbol: a.show(),
                });
            };
            if !defined.insert((q, pos)) {
                return Err(MalformedInput::Nondeterministic {
                    state: q,
                    symbol: a.show(),
                });
            }
            ts.set_edge(q, pos, p, c);
        }

        tracing::trace!(
            "built table with {} states over {}",
            ts.size(),
            ts.alphabet().universe().map(|s| s.show()).join(", ")
        );
        Ok(ts)
    }
}

impl<S: Symbol, C: Color> TSBuilder<S, Void, C> {
    /// Builds a [`MealyMachine`] with the given initial state.
    pub fn into_mealy(mut self, initial: StateIndex) -> Result<MealyMachine<S, C>, Error> {
        self.default = Some(Void);
        MealyMachine::from_parts(self.into_table()?, initial)
    }
}

impl<S: Symbol, Q: Color> TSBuilder<S, Q, Void> {
    /// Builds a [`MooreMachine`] with the given initial state.
    pub fn into_moore(self, initial: StateIndex) -> Result<MooreMachine<S, Q>, Error> {
        MooreMachine::from_parts(self.into_table()?, initial)
    }
}

impl<S: Symbol> TSBuilder<S, bool, Void> {
    /// Builds a [`Dfa`] with the given initial state, the states colored `true` are final.
    pub fn into_dfa(self, initial: StateIndex) -> Result<Dfa<S>, Error> {
        Dfa::from_parts(self.into_table()?, initial)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn inferred_alphabet_and_states() {
        let mm = TSBuilder::without_state_colors()
            .with_transitions([(0, 'b', 1, 1), (1, 'a', 0, 0)])
            .into_mealy(0)
            .unwrap();
        assert_eq!(mm.size(), 2);
        assert_eq!(mm.alphabet().symbols(), &['a', 'b']);
    }

    #[test]
    fn declared_alphabet_is_kept() {
        let moore = TSBuilder::without_edge_colors()
            .with_alphabet(['y', 'x', 'z'])
            .with_states(3)
            .default_color(0usize)
            .color(1, 7)
            .with_edges([(0, 'x', 1)])
            .into_moore(0)
            .unwrap();
        assert_eq!(moore.alphabet().symbols(), &['y', 'x', 'z']);
        assert_eq!(moore.size(), 3);
        assert_eq!(moore.output(1), Some(&7));
        assert_eq!(moore.output(2), Some(&0));
    }

    #[test]
    fn malformed_input_is_rejected() {
        let unknown_state = TSBuilder::without_edge_colors()
            .with_states(2)
            .with_state_colors(['a', 'b'])
            .with_edges([(0, 'x', 2)])
            .into_moore(0);
        assert_eq!(
            unknown_state,
            Err(Error::Malformed(MalformedInput::UnknownState {
                state: 2,
                declared: 2
            }))
        );

        let unknown_symbol = TSBuilder::without_state_colors()
            .with_alphabet(['a'])
            .with_transitions([(0, 'b', 0, 0)])
            .into_mealy(0);
        assert!(matches!(
            unknown_symbol,
            Err(Error::Malformed(MalformedInput::UnknownSymbol { state: 0, .. }))
        ));

        let nondeterministic = TSBuilder::without_state_colors()
            .with_transitions([(0, 'a', 0, 0), (0, 'a', 1, 0)])
            .into_mealy(0);
        assert!(matches!(
            nondeterministic,
            Err(Error::Malformed(MalformedInput::Nondeterministic { .. }))
        ));

        let missing_output = TSBuilder::without_edge_colors()
            .with_state_colors([true])
            .with_edges([(0, 'a', 1)])
            .into_dfa(0);
        assert_eq!(
            missing_output.unwrap_err(),
            Error::Malformed(MalformedInput::MissingOutput(1))
        );

        let bad_initial = Dfa::<char>::builder()
            .with_state_colors([true])
            .into_dfa(3);
        assert!(bad_initial.unwrap_err().is_malformed());
    }
}
