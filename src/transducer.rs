use tracing::{debug, trace};

use crate::{
    math::{Map, OrderedSet},
    prelude::*,
};

/// Converts a Mealy machine into a Moore machine with the same input/output behavior.
///
/// As the output of a Mealy machine depends on the transition that is taken, a state of the Mealy
/// machine may need to be split into several Moore states, one for each output with which it is
/// entered. The states of the resulting Moore machine are thus the distinct pairs `(p, o)` such
/// that some transition of `mealy` that starts in a state reachable from the initial state leads
/// into `p` while emitting `o`. Transitions out of unreachable states are ignored. The pairs are
/// numbered in ascending order, except that the initial state always receives the index `0`.
///
/// The output of the initial state is not observable through the Mealy machine. If the initial
/// state of `mealy` is entered by some transition, the pair with the smallest such output becomes
/// initial. Otherwise a fresh state is created which behaves like the initial state of `mealy`
/// and is tagged with the smallest output that `mealy` emits on a reachable transition.
///
/// Fails with [`Error::NoOutput`] if no transition can be taken from the initial state of
/// `mealy`, since then there is no output that could be assigned to the initial state. An empty
/// Mealy machine is converted into an empty Moore machine.
///
/// # Example
/// ```
/// use automata_algebra::prelude::*;
///
/// let mealy = MealyMachine::builder()
///     .with_transitions([(0, 'a', 'x', 1), (0, 'b', 'y', 1), (1, 'a', 'x', 0), (1, 'b', 'x', 1)])
///     .into_mealy(0)
///     .unwrap();
/// let moore = to_moore(&mealy).unwrap();
/// // state 1 is entered with outputs x and y, so it is split
/// assert_eq!(moore.size(), 3);
/// assert!(to_mealy(&moore).bisimilar(&mealy));
/// ```
pub fn to_moore<S: Symbol, O: Color>(
    mealy: &MealyMachine<S, O>,
) -> Result<MooreMachine<S, O>, Error> {
    let ts = mealy.ts();
    debug_assert!(ts.validate().is_ok());
    if ts.is_empty() {
        return MooreMachine::from_parts(StateTable::for_alphabet(ts.alphabet().clone()), 0);
    }

    let entered: OrderedSet<(StateIndex, O)> = ts
        .reachable_state_indices(mealy.initial())
        .into_iter()
        .flat_map(|q| ts.edges_from(q).map(|(_, p, o)| (p, o.clone())))
        .collect();
    let Some(smallest) = entered.iter().map(|(_, o)| o).min().cloned() else {
        return Err(Error::NoOutput);
    };

    let initial_pair = entered
        .iter()
        .find(|(p, _)| *p == mealy.initial())
        .cloned();
    // the initial state comes first, it is either one of the pairs or a fresh state that is
    // not the target of any transition
    let mut states: Vec<(StateIndex, O)> = Vec::with_capacity(entered.len() + 1);
    match &initial_pair {
        Some(pair) => states.push(pair.clone()),
        None => {
            trace!(
                "initial state {} is never entered, adding a fresh moore state",
                mealy.initial()
            );
            states.push((mealy.initial(), smallest));
        }
    }
    states.extend(
        entered
            .into_iter()
            .filter(|pair| Some(pair) != initial_pair.as_ref()),
    );

    let index: Map<(StateIndex, O), StateIndex> = states
        .iter()
        .enumerate()
        .skip(usize::from(initial_pair.is_none()))
        .map(|(id, pair)| (pair.clone(), id))
        .collect();

    let mut out = StateTable::for_alphabet_size_hint(ts.alphabet().clone(), states.len());
    for (_, o) in &states {
        out.add_state(o.clone());
    }
    for (id, (q, _)) in states.iter().enumerate() {
        for pos in 0..ts.alphabet().size() {
            if let Some((p, o)) = ts.edge_at(*q, pos) {
                let target = index[&(*p, o.clone())];
                out.set_edge(id, pos, target, Void);
            }
        }
    }

    debug!(
        "converted mealy machine with {} states into moore machine with {} states",
        ts.size(),
        out.size()
    );
    MooreMachine::from_parts(out, 0)
}

/// Converts a Moore machine into a Mealy machine with the same input/output behavior, except
/// for the output of the initial state which a Mealy machine can not produce. Every transition
/// emits the output of the state it leads into. The states and their indices are kept.
pub fn to_mealy<S: Symbol, O: Color>(moore: &MooreMachine<S, O>) -> MealyMachine<S, O> {
    let outputs: Vec<O> = moore
        .ts()
        .state_indices()
        .filter_map(|q| moore.output(q).cloned())
        .collect();
    let ts = moore
        .ts()
        .clone()
        .map_edge_colors(|_, _, p, _| outputs[p].clone())
        .map_state_colors(|_, _| Void);
    MealyMachine::from_parts(ts, moore.initial())
        .expect("the table of a moore machine is well formed")
}

impl<S: Symbol, O: Color> MealyMachine<S, O> {
    /// Converts `self` into a Moore machine, see [`to_moore`].
    pub fn to_moore(&self) -> Result<MooreMachine<S, O>, Error> {
        to_moore(self)
    }
}

impl<S: Symbol, O: Color> MooreMachine<S, O> {
    /// Converts `self` into a Mealy machine, see [`to_mealy`].
    pub fn to_mealy(&self) -> MealyMachine<S, O> {
        to_mealy(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, tests::textbook_moore};

    #[test_log::test]
    fn moore_to_mealy_keeps_states() {
        let moore = textbook_moore();
        let mealy = to_mealy(&moore);
        assert_eq!(mealy.size(), 4);
        assert_eq!(mealy.initial(), 0);
        assert_eq!(mealy.transition(0, &'0'), Some((1, &'b')));
        assert_eq!(mealy.transition(0, &'1'), Some((2, &'a')));
        assert_eq!(mealy.transition(3, &'1'), Some((3, &'b')));
        assert_eq!(mealy.map(&['1', '0', '1']), Some(vec!['a', 'b', 'b']));
        assert_eq!(
            moore.map(&['1', '0', '1']).map(|outputs| outputs[1..].to_vec()),
            mealy.map(&['1', '0', '1'])
        );
    }

    #[test_log::test]
    fn mealy_to_moore_splits_states() {
        let mealy = MealyMachine::builder()
            .with_transitions([
                (0, 'a', 0, 1),
                (0, 'b', 1, 1),
                (1, 'a', 0, 0),
                (1, 'b', 1, 1),
            ])
            .into_mealy(0)
            .unwrap();
        let moore = to_moore(&mealy).unwrap();
        // pairs (0, 0), (1, 0) and (1, 1), the initial state is entered as (0, 0)
        assert_eq!(moore.size(), 3);
        assert_eq!(moore.initial(), 0);
        assert_eq!(moore.output(0), Some(&0));
        assert_eq!(moore.output(1), Some(&0));
        assert_eq!(moore.output(2), Some(&1));
        assert_eq!(moore.successor(0, &'a'), Some(1));
        assert_eq!(moore.successor(0, &'b'), Some(2));
        assert_eq!(moore.successor(1, &'a'), Some(0));
        assert_eq!(moore.successor(2, &'b'), Some(2));

        let back = to_mealy(&moore);
        assert!(back.bisimilar(&mealy));
        assert_eq!(
            back.map(&['a', 'b', 'a', 'a']),
            mealy.map(&['a', 'b', 'a', 'a'])
        );
    }

    #[test]
    fn fresh_initial_state() {
        let mealy = MealyMachine::builder()
            .with_transitions([(0, 'a', 'y', 1), (0, 'b', 'x', 1), (1, 'a', 'z', 1)])
            .into_mealy(0)
            .unwrap();
        let moore = mealy.to_moore().unwrap();
        // the initial state is never entered, it becomes a fresh state tagged with the
        // smallest output followed by the pairs (1, x), (1, y) and (1, z)
        assert_eq!(moore.size(), 4);
        assert_eq!(moore.output(0), Some(&'x'));
        assert_eq!(moore.successor(0, &'a'), Some(2));
        assert_eq!(moore.successor(0, &'b'), Some(1));
        assert_eq!(moore.successor(1, &'b'), None);
        assert!(moore.to_mealy().bisimilar(&mealy));
    }

    #[test]
    fn conversion_failures() {
        let silent = MealyMachine::<char, u8>::builder()
            .with_states(2)
            .with_alphabet(['a'])
            .into_mealy(0)
            .unwrap();
        assert_eq!(to_moore(&silent), Err(Error::NoOutput));

        let empty = MealyMachine::<char, u8>::builder().into_mealy(0).unwrap();
        assert_eq!(to_moore(&empty).unwrap().size(), 0);
    }

    #[test]
    fn mealy_to_moore_skips_unreachable_transitions() {
        let mealy = MealyMachine::builder()
            .with_transitions([(0, 'a', 'x', 0), (1, 'a', 'y', 0), (1, 'b', 'z', 1)])
            .into_mealy(0)
            .unwrap();
        let moore = to_moore(&mealy).unwrap();
        // (0, y) and (1, z) are only entered from the unreachable state 1
        assert_eq!(moore.size(), 1);
        assert_eq!(moore.output(0), Some(&'x'));
        assert_eq!(moore.successor(0, &'a'), Some(0));
        assert_eq!(moore.successor(0, &'b'), None);
        assert!(moore.to_mealy().bisimilar(&mealy));

        let stuck = MealyMachine::builder()
            .with_transitions([(1, 'a', 'y', 0)])
            .into_mealy(0)
            .unwrap();
        assert_eq!(to_moore(&stuck), Err(Error::NoOutput));
    }

    #[test]
    fn mealy_to_moore_ignores_initial_output_choice() {
        let mealy = MealyMachine::builder()
            .with_transitions([(0, 'a', 2, 0), (0, 'b', 1, 0)])
            .into_mealy(0)
            .unwrap();
        let moore = to_moore(&mealy).unwrap();
        assert_eq!(moore.size(), 2);
        // the pair with the smallest output is initial
        assert_eq!(moore.output(moore.initial()), Some(&1));
        assert_eq!(moore.map(&['a', 'b']), Some(vec![1, 2, 1]));
    }
}
