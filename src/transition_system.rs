use itertools::Itertools;

use crate::{error::MalformedInput, Alphabet, Show, Symbol, Void};

mod builder;
pub use builder::TSBuilder;

/// Computes reachable states and minimal representatives.
pub mod reachable;
pub use reachable::{MinimalRepresentative, MinimalRepresentatives};

/// The type that is used to index states. States of a [`StateTable`] are always numbered
/// consecutively starting at `0`.
pub type StateIndex = usize;

/// A dense representation of a deterministic transition system. For every state it stores a color
/// of type `Q` and for every symbol of the [`Alphabet`] at most one outgoing transition, which
/// consists of a target state and a color of type `C`. Transitions may be missing, in which case
/// the transition function is partial.
///
/// The table is the common representation underlying [`crate::MealyMachine`]s (which color
/// their transitions with outputs and use [`Void`] as state color), [`crate::MooreMachine`]s
/// (which color their states and use [`Void`] as edge color) and [`crate::automaton::Dfa`]s
/// (whose states are colored with `bool`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StateTable<S = char, Q = Void, C = Void> {
    alphabet: Alphabet<S>,
    colors: Vec<Q>,
    edges: Vec<Vec<Option<(StateIndex, C)>>>,
}

impl<S: Symbol, Q: Clone, C: Clone> StateTable<S, Q, C> {
    /// Creates an empty table over the given alphabet.
    pub fn for_alphabet(alphabet: Alphabet<S>) -> Self {
        Self {
            alphabet,
            colors: vec![],
            edges: vec![],
        }
    }

    /// Creates an empty table over the given alphabet with space for `size` states.
    pub fn for_alphabet_size_hint(alphabet: Alphabet<S>, size: usize) -> Self {
        Self {
            alphabet,
            colors: Vec::with_capacity(size),
            edges: Vec::with_capacity(size),
        }
    }

    /// Gives a reference to the alphabet.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if there is no state at all.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Iterates over all state indices in order.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.size()
    }

    /// Adds a new state with the given color and no outgoing transitions, returning its index.
    pub fn add_state(&mut self, color: Q) -> StateIndex {
        let id = self.colors.len();
        self.colors.push(color);
        self.edges.push(vec![None; self.alphabet.size()]);
        id
    }

    /// Returns the color of state `q` if it exists.
    pub fn state_color(&self, q: StateIndex) -> Option<&Q> {
        self.colors.get(q)
    }

    /// Sets the color of the existing state `q`.
    pub fn set_state_color(&mut self, q: StateIndex, color: Q) {
        assert!(q < self.size(), "state {q} does not exist");
        self.colors[q] = color;
    }

    /// Sets the transition from `from` on the symbol at position `pos` of the alphabet,
    /// returning the transition that was replaced.
    pub fn set_edge(
        &mut self,
        from: StateIndex,
        pos: usize,
        to: StateIndex,
        color: C,
    ) -> Option<(StateIndex, C)> {
        assert!(from < self.size(), "state {from} does not exist");
        assert!(pos < self.alphabet.size(), "no symbol at position {pos}");
        self.edges[from][pos].replace((to, color))
    }

    /// Returns the transition from `q` on the symbol at position `pos` of the alphabet.
    pub fn edge_at(&self, q: StateIndex, pos: usize) -> Option<&(StateIndex, C)> {
        self.edges.get(q)?.get(pos)?.as_ref()
    }

    /// Returns the transition from `q` on `symbol`.
    pub fn edge(&self, q: StateIndex, symbol: &S) -> Option<&(StateIndex, C)> {
        self.edge_at(q, self.alphabet.position(symbol)?)
    }

    /// Returns the target of the transition from `q` on the symbol at position `pos`.
    pub fn successor_at(&self, q: StateIndex, pos: usize) -> Option<StateIndex> {
        self.edge_at(q, pos).map(|(p, _)| *p)
    }

    /// Returns the target of the transition from `q` on `symbol`.
    pub fn successor(&self, q: StateIndex, symbol: &S) -> Option<StateIndex> {
        self.edge(q, symbol).map(|(p, _)| *p)
    }

    /// Iterates over the outgoing transitions of `q` as triples of symbol, target and color.
    /// The transitions are given in the order of the alphabet.
    pub fn edges_from(&self, q: StateIndex) -> impl Iterator<Item = (&S, StateIndex, &C)> + '_ {
        self.edges
            .get(q)
            .into_iter()
            .flat_map(|row| row.iter().enumerate())
            .filter_map(|(pos, cell)| {
                cell.as_ref()
                    .map(|(target, color)| (&self.alphabet[pos], *target, color))
            })
    }

    /// Returns true if every state has a transition for every symbol.
    pub fn is_complete(&self) -> bool {
        self.edges.iter().flatten().all(Option::is_some)
    }

    /// Checks referential integrity, i.e. that every transition points to an existing state.
    pub fn validate(&self) -> Result<(), MalformedInput> {
        for (q, row) in self.edges.iter().enumerate() {
            for (target, _) in row.iter().flatten() {
                if *target >= self.size() {
                    return Err(MalformedInput::UnknownState {
                        state: *target,
                        declared: self.size(),
                    });
                }
            }
            debug_assert_eq!(row.len(), self.alphabet.size(), "row of state {q} is malformed");
        }
        Ok(())
    }

    /// Runs `word` from the state `from`, returning the sequence of transitions that are taken as
    /// pairs of reached state and transition color. If at some point there is no transition,
    /// `None` is returned.
    pub fn run_from<'a, W>(&self, from: StateIndex, word: W) -> Option<Vec<(StateIndex, &C)>>
    where
        W: IntoIterator<Item = &'a S>,
        S: 'a,
    {
        let mut current = from;
        let mut out = vec![];
        for symbol in word {
            let (target, color) = self.edge(current, symbol)?;
            current = *target;
            out.push((current, color));
        }
        Some(out)
    }

    /// Consumes `self` and applies `f` to every state color.
    pub fn map_state_colors<D: Clone, F: Fn(StateIndex, Q) -> D>(
        self,
        f: F,
    ) -> StateTable<S, D, C> {
        StateTable {
            alphabet: self.alphabet,
            colors: self
                .colors
                .into_iter()
                .enumerate()
                .map(|(q, c)| f(q, c))
                .collect(),
            edges: self.edges,
        }
    }

    /// Consumes `self` and applies `f` to every transition, which is given as source, symbol
    /// position, target and color.
    pub fn map_edge_colors<D: Clone, F: Fn(StateIndex, usize, StateIndex, C) -> D>(
        self,
        f: F,
    ) -> StateTable<S, Q, D> {
        StateTable {
            alphabet: self.alphabet,
            colors: self.colors,
            edges: self
                .edges
                .into_iter()
                .enumerate()
                .map(|(q, row)| {
                    row.into_iter()
                        .enumerate()
                        .map(|(pos, cell)| cell.map(|(p, c)| (p, f(q, pos, p, c))))
                        .collect()
                })
                .collect(),
        }
    }

    /// Builds a new table which only contains the states in `keep`, they are renumbered in
    /// the order in which they are given. Transitions leading to states that are not kept
    /// are dropped. Returns the table and the mapping from old to new indices.
    pub fn restrict_to(&self, keep: &[StateIndex]) -> (Self, Vec<Option<StateIndex>>) {
        let mut renaming = vec![None; self.size()];
        for (new, &old) in keep.iter().enumerate() {
            renaming[old] = Some(new);
        }
        let mut out = Self::for_alphabet_size_hint(self.alphabet.clone(), keep.len());
        for &old in keep {
            out.add_state(self.colors[old].clone());
        }
        for (new, &old) in keep.iter().enumerate() {
            for (pos, cell) in self.edges[old].iter().enumerate() {
                if let Some((target, color)) = cell {
                    if let Some(target) = renaming[*target] {
                        out.set_edge(new, pos, target, color.clone());
                    }
                }
            }
        }
        (out, renaming)
    }

    /// Returns a string representation of the transition table, which has one row per state
    /// and one column per symbol.
    pub fn build_transition_table<SD, ED>(&self, state_decorator: SD, edge_decorator: ED) -> String
    where
        SD: Fn(StateIndex, &Q) -> String,
        ED: Fn(StateIndex, &C) -> String,
    {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string()).chain(self.alphabet.universe().map(|s| s.show())),
        );
        for q in self.state_indices() {
            let mut row = vec![state_decorator(q, &self.colors[q])];
            row.extend(self.edges[q].iter().map(|cell| match cell {
                Some((target, color)) => edge_decorator(*target, color),
                None => "-".to_string(),
            }));
            builder.push_record(row);
        }
        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<S: Symbol, Q: Show + Clone, C: Show + Clone> Show for StateTable<S, Q, C> {
    fn show(&self) -> String {
        self.state_indices()
            .map(|q| {
                format!(
                    "{}|{}: {}",
                    q,
                    self.colors[q].show(),
                    self.edges[q]
                        .iter()
                        .enumerate()
                        .filter_map(|(pos, cell)| cell.as_ref().map(|(p, c)| format!(
                            "{}->{}|{}",
                            self.alphabet[pos].show(),
                            p,
                            c.show()
                        )))
                        .join(" ")
                )
            })
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn table() -> StateTable<char, bool, usize> {
        let mut ts = StateTable::for_alphabet(CharAlphabet::of_size(2));
        let q0 = ts.add_state(false);
        let q1 = ts.add_state(true);
        let q2 = ts.add_state(false);
        ts.set_edge(q0, 0, q1, 0);
        ts.set_edge(q0, 1, q0, 1);
        ts.set_edge(q1, 0, q1, 2);
        ts.set_edge(q2, 1, q0, 3);
        ts
    }

    #[test]
    fn table_access() {
        let ts = table();
        assert_eq!(ts.size(), 3);
        assert_eq!(ts.successor(0, &'a'), Some(1));
        assert_eq!(ts.successor(1, &'b'), None);
        assert_eq!(ts.edge(0, &'c'), None);
        assert_eq!(ts.edge(1, &'a'), Some(&(1, 2)));
        assert_eq!(
            ts.edges_from(0).collect::<Vec<_>>(),
            vec![(&'a', 1, &0), (&'b', 0, &1)]
        );
        assert!(!ts.is_complete());
        assert!(ts.validate().is_ok());
        assert_eq!(
            ts.run_from(0, &['b', 'a', 'a']),
            Some(vec![(0, &1), (1, &0), (1, &2)])
        );
        assert_eq!(ts.run_from(0, &['a', 'b']), None);
    }

    #[test]
    fn restriction_renames() {
        let (restricted, renaming) = table().restrict_to(&[2, 0]);
        assert_eq!(renaming, vec![Some(1), None, Some(0)]);
        assert_eq!(restricted.size(), 2);
        assert_eq!(restricted.successor(0, &'b'), Some(1));
        assert_eq!(restricted.successor(1, &'b'), Some(1));
        // the edge into the dropped state is gone
        assert_eq!(restricted.successor(1, &'a'), None);
    }

    #[test]
    fn rendering() {
        let ts = table().map_edge_colors(|_, _, _, c| c * 10);
        assert_eq!(ts.edge(2, &'b'), Some(&(0, 30)));
        let rendered = ts.build_transition_table(|q, c| format!("{q}|{}", c.show()), |p, c| {
            format!("{p}|{c}")
        });
        assert!(rendered.contains("1|+"));
        assert!(rendered.contains("0|10"));
        assert_eq!(ts.show().lines().count(), 3);
        assert_eq!(ts.show().lines().nth(2), Some("2|-: b->0|30"));
    }
}
