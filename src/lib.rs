//! Library implementing the classical algorithms on finite automata that formal-language tooling
//! keeps reaching for: minimization of Mealy and Moore machines by partition refinement, the
//! structural conversion between Mealy and Moore machines and the determinization of a
//! nondeterministic finite automaton (possibly with epsilon transitions) via subset construction.
//!
//! All automata are built on top of a [`transition_system::StateTable`], a dense table which stores
//! for every state its color (the output of a Moore machine, the acceptance flag of a DFA) and for
//! each symbol of the [`Alphabet`] at most one outgoing transition together with its color (the
//! output of a Mealy machine). States are indexed by consecutive integers starting at `0`. A
//! nondeterministic automaton can not be represented like this, it is stored as an
//! [`automaton::Nfa`] instead.
//!
//! Automata are never constructed directly, instead a [`transition_system::TSBuilder`] (or an
//! [`automaton::NfaBuilder`]) collects the states and transitions and validates them upon
//! conversion into a concrete automaton. Every algorithm in this crate may therefore assume that
//! transitions only ever point to states that exist.
//!
//! The algorithms are pure, they take a reference to an automaton and return a fresh one:
//! - [`automaton::Machine::minimize`] (and the methods of the same name on [`MealyMachine`] and
//!   [`MooreMachine`]) computes the unique minimal machine with the same input/output behavior,
//! - [`transducer::to_moore`] and [`transducer::to_mealy`] switch between the two kinds of machines,
//! - [`determinization::determinize`] turns an [`automaton::Nfa`] into a [`automaton::Dfa`].
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_algebra::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "minimize")]
    pub use super::minimization::partition_refinement;
    pub use super::{
        alphabet::{Alphabet, CharAlphabet, Label},
        automaton::{Dfa, Machine, MealyMachine, MooreMachine, Nfa, NfaBuilder},
        determinization::{determinize, determinize_with, DeterminizationOptions, Totality},
        error::{Error, MalformedInput},
        math,
        math::Partition,
        transducer::{to_mealy, to_moore},
        transition_system::{StateIndex, StateTable, TSBuilder},
        Color, Show, Symbol, Void,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;
pub use alphabet::Alphabet;

/// Errors which can occur when constructing automata or running the algorithms on them.
pub mod error;
pub use error::Error;

/// This module defines the state table on which all deterministic automata are built, together
/// with a builder and reachability computations.
pub mod transition_system;

/// Defines automata, i.e. Mealy and Moore machines, as well as nondeterministic and deterministic
/// finite automata.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::{Machine, MealyMachine, MooreMachine};

/// Contains the partition refinement algorithm and the minimization of Mealy and Moore machines
/// built on top of it. This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Conversion between Mealy and Moore machines.
pub mod transducer;

/// Determinization of nondeterministic finite automata through subset construction.
pub mod determinization;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

use std::{fmt::Debug, hash::Hash};

/// A color is simply a type that can be used to color states or transitions. For Mealy machines
/// the transitions are colored with the output, Moore machines color their states.
pub trait Color: Clone + Eq + Ord + Hash + Debug + Show {}

impl<T: Eq + Ord + Clone + Hash + Debug + Show> Color for T {}

/// A symbol is an element of an [`Alphabet`]. The only requirement is that symbols can be compared,
/// as the alphabet keeps them in a fixed order.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug + Show {}

impl<T: Eq + Ord + Clone + Hash + Debug + Show> Symbol for T {}

/// Represents the absence of a color. Mealy machines do not color their states and Moore
/// machines do not color their transitions, in both cases [`Void`] fills the gap.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Void;

impl Debug for Void {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#")
    }
}

impl Show for Void {
    fn show(&self) -> String {
        "-".to_string()
    }
}

/// Helper trait which can be used to display states, symbols and outputs.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that should be
    /// for example 0, 1, 2, ... and for a symbol just the symbol itself.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be {0, 1, 2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!(
            "{{{}}}",
            itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ")
        )
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

macro_rules! impl_show_for_integers {
    ($($t:ty),*) => {
        $(
            impl Show for $t {
                fn show(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_show_for_integers!(u8, u16, u32, u64, i8, i16, i32, i64);

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
    {
        format!(
            "\"{}\"",
            iter.into_iter().map(|sym| sym.to_string()).collect::<String>()
        )
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for &str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// The Moore machine from the textbook example in which states `0` and `2` are equivalent.
    pub fn textbook_moore() -> MooreMachine<char, char> {
        TSBuilder::without_edge_colors()
            .with_state_colors(['a', 'b', 'a', 'b'])
            .with_edges([
                (0, '0', 1),
                (0, '1', 2),
                (1, '0', 1),
                (1, '1', 3),
                (2, '0', 1),
                (2, '1', 2),
                (3, '0', 3),
                (3, '1', 3),
            ])
            .into_moore(0)
            .expect("textbook machine is well formed")
    }

    #[test]
    fn show_things() {
        assert_eq!(vec![1usize, 2, 3].show(), "{1, 2, 3}");
        assert_eq!(vec!['a', 'b'].show(), "\"ab\"");
        assert_eq!(Some('x').show(), "x");
        assert_eq!(None::<char>.show(), "-");
        assert_eq!(true.show(), "+");
        assert_eq!(Void.show(), "-");
    }
}
