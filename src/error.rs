use thiserror::Error;

use crate::transition_system::StateIndex;

/// Describes in which way the description of an automaton is malformed. These are detected
/// when a [`crate::transition_system::TSBuilder`] or [`crate::automaton::NfaBuilder`] is turned
/// into an automaton, before any algorithm runs on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInput {
    /// A transition, the initial state or a final state refers to a state that is not declared.
    #[error("state {state} is referenced but only {declared} states are declared")]
    UnknownState {
        /// The offending state.
        state: StateIndex,
        /// The number of declared states.
        declared: usize,
    },
    /// A transition is labeled with a symbol that is not part of the declared alphabet.
    #[error("transition from state {state} uses symbol `{symbol}` which is not in the alphabet")]
    UnknownSymbol {
        /// The source state of the transition.
        state: StateIndex,
        /// The offending symbol.
        symbol: String,
    },
    /// There are two transitions for the same state and symbol in a deterministic automaton.
    #[error("state {state} has more than one transition on symbol `{symbol}`")]
    Nondeterministic {
        /// The state with conflicting transitions.
        state: StateIndex,
        /// The symbol on which the conflict occurs.
        symbol: String,
    },
    /// A state of a Moore machine or DFA has not been assigned an output.
    #[error("state {0} has no output")]
    MissingOutput(StateIndex),
}

/// The error type of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The automaton description is malformed, no result was computed.
    #[error("malformed automaton: {0}")]
    Malformed(#[from] MalformedInput),
    /// The automaton has no states at all.
    #[error("automaton has no states")]
    EmptyAutomaton,
    /// A Mealy machine without any transition can not be turned into a Moore machine, as there
    /// is no output that could be assigned to its initial state.
    #[error("mealy machine emits no output, its initial state can not be given a moore output")]
    NoOutput,
}

impl Error {
    /// Returns `true` if the error stems from malformed input.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed(_))
    }
}
