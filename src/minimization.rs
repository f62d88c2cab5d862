use tracing::debug;

use crate::{math::Partition, prelude::*};

/// Partition refinement, computing the classes of equivalent states in Mealy and Moore machines.
pub mod partition_refinement;
use partition_refinement::{mealy_partition, moore_partition};

/// Collapses every class of `partition` into a single state, numbered by the position of the class.
/// The color of a class and its outgoing transitions are those of its smallest member, which is
/// only meaningful if `partition` is a congruence that respects colors.
fn quotient<S: Symbol, Q: Clone, C: Clone>(
    ts: &StateTable<S, Q, C>,
    partition: &Partition<StateIndex>,
) -> StateTable<S, Q, C> {
    let lookup = partition.class_lookup(ts.size());
    let mut out = StateTable::for_alphabet_size_hint(ts.alphabet().clone(), partition.size());
    let representatives: Vec<StateIndex> = partition
        .iter()
        .map(|class| *class.first().expect("classes of a partition are never empty"))
        .collect();

    for &rep in &representatives {
        out.add_state(ts.state_color(rep).expect("representative is a state").clone());
    }
    for (class, &rep) in representatives.iter().enumerate() {
        for pos in 0..ts.alphabet().size() {
            if let Some((target, color)) = ts.edge_at(rep, pos) {
                let target = lookup[*target].expect("partition covers every state");
                out.set_edge(class, pos, target, color.clone());
            }
        }
    }
    out
}

/// Removes all states that are not reachable from `initial`, the remaining states keep their
/// relative order. Returns the pruned table and the new index of `initial`.
fn prune<S: Symbol, Q: Clone, C: Clone>(
    ts: StateTable<S, Q, C>,
    initial: StateIndex,
) -> (StateTable<S, Q, C>, StateIndex) {
    let mut reachable = ts.reachable_state_indices(initial);
    if reachable.len() == ts.size() {
        return (ts, initial);
    }
    reachable.sort_unstable();
    let (pruned, renaming) = ts.restrict_to(&reachable);
    debug!("pruned {} unreachable states", ts.size() - pruned.size());
    (pruned, renaming[initial].expect("initial state is reachable"))
}

/// Builds the minimal table from `ts` and the final `partition`. The classes are numbered by
/// their smallest member.
fn collapse<S: Symbol, Q: Clone, C: Clone>(
    ts: &StateTable<S, Q, C>,
    initial: StateIndex,
    partition: Partition<StateIndex>,
) -> (StateTable<S, Q, C>, StateIndex, Partition<StateIndex>) {
    let partition = partition.sorted_by_minimum();
    let quotient = quotient(ts, &partition);
    let initial_class = partition
        .class_of(&initial)
        .expect("partition covers the initial state");
    let (minimal, initial) = prune(quotient, initial_class);
    (minimal, initial, partition)
}

impl<S: Symbol, O: Color> MooreMachine<S, O> {
    /// Returns the unique minimal moore machine that is bisimilar to `self`. This means
    /// for every finite word, the output of `self` and the output of the returned moore
    /// machine is the same. Equivalent states are merged using partition refinement and
    /// states which can not be reached from the initial state are removed afterwards.
    ///
    /// Fails with [`Error::EmptyAutomaton`] if `self` has no states.
    pub fn minimize(&self) -> Result<MooreMachine<S, O>, Error> {
        self.minimize_with_partition().map(|(minimal, _)| minimal)
    }

    /// Works like [`Self::minimize`], but additionally returns the partition of the states of
    /// `self` into classes of equivalent states. The `i`-th class of the partition corresponds to
    /// the `i`-th state of the quotient before unreachable states were removed.
    pub fn minimize_with_partition(
        &self,
    ) -> Result<(MooreMachine<S, O>, Partition<StateIndex>), Error> {
        if self.size() == 0 {
            return Err(Error::EmptyAutomaton);
        }
        debug_assert!(self.ts().validate().is_ok());
        let (ts, initial, partition) =
            collapse(self.ts(), self.initial(), moore_partition(self));
        debug!(
            "minimized moore machine from {} to {} states",
            self.size(),
            ts.size()
        );
        Ok((MooreMachine::from_parts(ts, initial)?, partition))
    }
}

impl<S: Symbol, O: Color> MealyMachine<S, O> {
    /// Returns the unique minimal mealy machine that is bisimilar to `self`, i.e. that produces
    /// the same outputs on every input. Equivalent states are merged using partition refinement
    /// and states which can not be reached from the initial state are removed afterwards.
    ///
    /// Fails with [`Error::EmptyAutomaton`] if `self` has no states.
    pub fn minimize(&self) -> Result<MealyMachine<S, O>, Error> {
        self.minimize_with_partition().map(|(minimal, _)| minimal)
    }

    /// Works like [`Self::minimize`], but additionally returns the partition of the states of
    /// `self` into classes of equivalent states.
    pub fn minimize_with_partition(
        &self,
    ) -> Result<(MealyMachine<S, O>, Partition<StateIndex>), Error> {
        if self.size() == 0 {
            return Err(Error::EmptyAutomaton);
        }
        debug_assert!(self.ts().validate().is_ok());
        let (ts, initial, partition) =
            collapse(self.ts(), self.initial(), mealy_partition(self));
        debug!(
            "minimized mealy machine from {} to {} states",
            self.size(),
            ts.size()
        );
        Ok((MealyMachine::from_parts(ts, initial)?, partition))
    }
}

impl<S: Symbol, O: Color> Machine<S, O> {
    /// Minimizes the machine, keeping its kind.
    pub fn minimize(&self) -> Result<Machine<S, O>, Error> {
        Ok(match self {
            Machine::Mealy(mm) => Machine::Mealy(mm.minimize()?),
            Machine::Moore(mm) => Machine::Moore(mm.minimize()?),
        })
    }

    /// Minimizes the machine and also returns the partition that was used.
    pub fn minimize_with_partition(&self) -> Result<(Machine<S, O>, Partition<StateIndex>), Error> {
        Ok(match self {
            Machine::Mealy(mm) => {
                let (minimal, partition) = mm.minimize_with_partition()?;
                (Machine::Mealy(minimal), partition)
            }
            Machine::Moore(mm) => {
                let (minimal, partition) = mm.minimize_with_partition()?;
                (Machine::Moore(minimal), partition)
            }
        })
    }
}

/// Minimizes the given machine, see [`Machine::minimize`].
pub fn minimize<S: Symbol, O: Color>(machine: &Machine<S, O>) -> Result<Machine<S, O>, Error> {
    machine.minimize()
}

impl<S: Symbol> Dfa<S> {
    /// Computes the minimal DFA accepting the same language as `self`. The result has a partial
    /// transition function: states from which no final state can be reached are removed first,
    /// so a run that would enter them gets stuck instead. The remaining table is minimized as a
    /// Moore machine with `bool` outputs. If `self` accepts no word at all, the result is a
    /// single non-final state without transitions.
    ///
    /// The correspondence to sets of NFA states is not kept. Fails with
    /// [`Error::EmptyAutomaton`] if `self` has no states.
    pub fn minimize(&self) -> Result<Dfa<S>, Error> {
        if self.size() == 0 {
            return Err(Error::EmptyAutomaton);
        }
        let live = self.ts().coreachable_state_indices(self.final_states());
        if live.binary_search(&self.initial()).is_err() {
            debug!("dfa accepts no word, minimizing to a single rejecting state");
            let mut ts = StateTable::for_alphabet(self.alphabet().clone());
            ts.add_state(false);
            return Dfa::from_parts(ts, 0);
        }
        let (trimmed, renaming) = self.ts().restrict_to(&live);
        if trimmed.size() < self.size() {
            debug!("removed {} dead states", self.size() - trimmed.size());
        }
        let initial = renaming[self.initial()].expect("initial state is live");
        Ok(Dfa::from_moore(
            MooreMachine::from_parts(trimmed, initial)?.minimize()?,
        ))
    }
}
