use crate::prelude::*;

mod mealy;
pub use mealy::MealyMachine;

mod moore;
pub use moore::MooreMachine;

mod dfa;
pub use dfa::Dfa;

mod nfa;
pub use nfa::{Nfa, NfaBuilder};

/// Either a [`MealyMachine`] or a [`MooreMachine`] over the same alphabet and output type. This is
/// what callers hand to the minimization and conversion routines when they do not statically know
/// which kind of machine they are dealing with, for example because it was read from a file.
///
/// # Example
/// ```
/// use automata_algebra::prelude::*;
///
/// let machine: Machine<char, char> = MooreMachine::builder()
///     .with_state_colors(['x', 'y', 'x'])
///     .with_edges([(0, 'a', 1), (1, 'a', 2), (2, 'a', 1)])
///     .into_moore(0)
///     .unwrap()
///     .into();
/// assert!(machine.is_moore());
/// let mealy = machine.to_mealy();
/// assert!(mealy.is_mealy());
/// assert_eq!(mealy.size(), 3);
/// // the initial state is never entered, so it is kept as a fresh state
/// assert_eq!(mealy.to_moore().unwrap().size(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Machine<S = char, O = usize> {
    /// A machine that produces outputs on its transitions.
    Mealy(MealyMachine<S, O>),
    /// A machine that produces outputs in its states.
    Moore(MooreMachine<S, O>),
}

impl<S: Symbol, O: Color> Machine<S, O> {
    /// Returns true if this is a Mealy machine.
    pub fn is_mealy(&self) -> bool {
        matches!(self, Machine::Mealy(_))
    }

    /// Returns true if this is a Moore machine.
    pub fn is_moore(&self) -> bool {
        matches!(self, Machine::Moore(_))
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        match self {
            Machine::Mealy(mm) => mm.size(),
            Machine::Moore(mm) => mm.size(),
        }
    }

    /// Returns the initial state.
    pub fn initial(&self) -> StateIndex {
        match self {
            Machine::Mealy(mm) => mm.initial(),
            Machine::Moore(mm) => mm.initial(),
        }
    }

    /// Gives a reference to the alphabet.
    pub fn alphabet(&self) -> &Alphabet<S> {
        match self {
            Machine::Mealy(mm) => mm.alphabet(),
            Machine::Moore(mm) => mm.alphabet(),
        }
    }

    /// Returns the Mealy machine if this is one.
    pub fn as_mealy(&self) -> Option<&MealyMachine<S, O>> {
        match self {
            Machine::Mealy(mm) => Some(mm),
            Machine::Moore(_) => None,
        }
    }

    /// Returns the Moore machine if this is one.
    pub fn as_moore(&self) -> Option<&MooreMachine<S, O>> {
        match self {
            Machine::Moore(mm) => Some(mm),
            Machine::Mealy(_) => None,
        }
    }

    /// Converts into a Mealy machine, a Mealy machine is returned unchanged.
    pub fn to_mealy(&self) -> Machine<S, O> {
        match self {
            Machine::Mealy(mm) => Machine::Mealy(mm.clone()),
            Machine::Moore(mm) => Machine::Mealy(to_mealy(mm)),
        }
    }

    /// Converts into a Moore machine, a Moore machine is returned unchanged. See
    /// [`crate::transducer::to_moore`] for when this fails.
    pub fn to_moore(&self) -> Result<Machine<S, O>, Error> {
        Ok(match self {
            Machine::Mealy(mm) => Machine::Moore(to_moore(mm)?),
            Machine::Moore(mm) => Machine::Moore(mm.clone()),
        })
    }
}

impl<S, O> From<MealyMachine<S, O>> for Machine<S, O> {
    fn from(value: MealyMachine<S, O>) -> Self {
        Machine::Mealy(value)
    }
}

impl<S, O> From<MooreMachine<S, O>> for Machine<S, O> {
    fn from(value: MooreMachine<S, O>) -> Self {
        Machine::Moore(value)
    }
}

impl<S: Symbol, O: Color> std::fmt::Display for Machine<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Machine::Mealy(mm) => write!(f, "Mealy machine\n{mm}"),
            Machine::Moore(mm) => write!(f, "Moore machine\n{mm}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::textbook_moore};

    #[test]
    fn machine_variants() {
        let machine = Machine::from(textbook_moore());
        assert!(machine.is_moore());
        assert_eq!(machine.size(), 4);
        assert_eq!(machine.initial(), 0);
        assert_eq!(machine.alphabet().symbols(), &['0', '1']);
        assert!(machine.as_mealy().is_none());

        let mealy = machine.to_mealy();
        assert!(mealy.is_mealy());
        assert_eq!(mealy.size(), 4);
        assert_eq!(mealy.to_mealy(), mealy);

        let back = mealy.to_moore().unwrap();
        assert!(back.is_moore());
        assert!(back.to_string().starts_with("Moore machine"));
    }
}
