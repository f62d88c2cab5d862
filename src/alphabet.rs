use itertools::Itertools;

use crate::{Show, Symbol};

/// An alphabet is a finite collection of [`Symbol`]s in a fixed order. The order determines in
/// which order algorithms iterate over the symbols, which in turn determines the numbering of
/// states that are discovered during a construction (see for example
/// [`crate::determinization::determinize`]). The position of a symbol in this order is used to
/// index the transitions of a [`crate::transition_system::StateTable`].
///
/// # Example
/// ```
/// use automata_algebra::prelude::*;
///
/// let alphabet = Alphabet::new(['b', 'a', 'b']);
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.position(&'a'), Some(1));
/// assert_eq!(alphabet.universe().collect::<String>(), "ba");
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct Alphabet<S = char>(Vec<S>);

/// The most commonly used alphabet, where every symbol is a single `char`.
pub type CharAlphabet = Alphabet<char>;

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] alphabet of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }
}

impl<S: Symbol> Alphabet<S> {
    /// Creates an alphabet whose symbols are ordered as given. Duplicates are dropped, only the
    /// first occurrence of a symbol determines its position.
    pub fn new<I: IntoIterator<Item = S>>(symbols: I) -> Self {
        Self(symbols.into_iter().unique().collect())
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet contains no symbol at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all symbols in order.
    pub fn universe(&self) -> impl Iterator<Item = S> + '_ {
        self.0.iter().cloned()
    }

    /// Returns a slice of all symbols in order.
    pub fn symbols(&self) -> &[S] {
        &self.0
    }

    /// Returns the position of `symbol`, or `None` if it is not part of the alphabet.
    pub fn position(&self, symbol: &S) -> Option<usize> {
        self.0.iter().position(|s| s == symbol)
    }

    /// Returns the symbol at position `pos` if it exists.
    pub fn nth(&self, pos: usize) -> Option<&S> {
        self.0.get(pos)
    }

    /// Checks whether `symbol` is part of the alphabet.
    pub fn contains(&self, symbol: &S) -> bool {
        self.0.contains(symbol)
    }
}

impl<S> std::ops::Index<usize> for Alphabet<S> {
    type Output = S;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<S: Symbol> From<Vec<S>> for Alphabet<S> {
    fn from(value: Vec<S>) -> Self {
        Self::new(value)
    }
}

/// Collecting into an alphabet sorts the symbols, which is what we want when an alphabet is
/// inferred from the symbols appearing on some transitions.
impl<S: Symbol> FromIterator<S> for Alphabet<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

impl<S: Symbol> Show for Alphabet<S> {
    fn show(&self) -> String {
        S::show_collection(self.0.iter())
    }
}

/// The label of a transition in an [`crate::automaton::Nfa`]. Next to the symbols of the alphabet,
/// such a transition may also be labeled with epsilon, meaning it can be taken without consuming
/// any input. `Epsilon` sorts before every symbol.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub enum Label<S> {
    /// A silent move.
    Epsilon,
    /// A move which consumes the given symbol.
    Symbol(S),
}

impl<S> Label<S> {
    /// Returns the symbol if this is not an epsilon label.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(s) => Some(s),
        }
    }

    /// Returns `true` if this label is epsilon.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }
}

impl<S> From<Option<S>> for Label<S> {
    fn from(value: Option<S>) -> Self {
        match value {
            None => Label::Epsilon,
            Some(s) => Label::Symbol(s),
        }
    }
}

impl<S: Show> Show for Label<S> {
    fn show(&self) -> String {
        match self {
            Label::Epsilon => "ε".to_string(),
            Label::Symbol(s) => s.show(),
        }
    }
}
