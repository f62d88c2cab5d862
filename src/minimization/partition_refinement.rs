//! Moore-style partition refinement. Starting from a partition of the states by what can be
//! observed in them directly, classes are split until every class is a congruence class, i.e.
//! all states of a class move into the same classes on every symbol.
//!
//! This is the simple quadratic algorithm, each round looks at every state once and a round
//! that does not split any class ends the computation. As every round that continues splits at
//! least one class, there are at most `n - 1` rounds for `n` states.

use tracing::trace;

use crate::{
    math::{OrderedMap, OrderedSet, Partition},
    prelude::*,
};

/// The signature of a state in one round of refinement. For every symbol of the alphabet it
/// records the index of the class that the transition on that symbol leads into, or `None`
/// if there is no such transition. `None` is distinct from (and smaller than) every class index.
pub type Signature = Vec<Option<usize>>;

/// Computes the coarsest partition of the states `0..size` which refines the partition induced
/// by `observation` and is a congruence with respect to `successor`. Here `successor(q, pos)`
/// gives the target of the transition from `q` on the symbol at position `pos`, for every
/// `pos` in `0..alphabet_size`.
///
/// The classes of the initial partition are ordered by their observation. In every round, each
/// class is replaced by the classes obtained from splitting it by [`Signature`], in the order of
/// the signatures. The result is thus fully determined by the input.
pub fn refine<K, O, F>(
    size: usize,
    alphabet_size: usize,
    observation: O,
    successor: F,
) -> Partition<StateIndex>
where
    K: Ord,
    O: Fn(StateIndex) -> K,
    F: Fn(StateIndex, usize) -> Option<StateIndex>,
{
    let mut initial: OrderedMap<K, OrderedSet<StateIndex>> = OrderedMap::new();
    for q in 0..size {
        initial.entry(observation(q)).or_default().insert(q);
    }
    let mut classes: Vec<OrderedSet<StateIndex>> = initial.into_values().collect();
    trace!("initial split produced {} classes", classes.len());

    let mut round = 0;
    loop {
        round += 1;
        let lookup = class_lookup(&classes, size);
        let mut changed = false;
        let mut refined = Vec::with_capacity(classes.len());

        for class in &classes {
            let mut buckets: OrderedMap<Signature, OrderedSet<StateIndex>> = OrderedMap::new();
            for &q in class {
                let signature: Signature = (0..alphabet_size)
                    .map(|pos| successor(q, pos).map(|p| lookup[p]))
                    .collect();
                buckets.entry(signature).or_default().insert(q);
            }
            changed |= buckets.len() > 1;
            refined.extend(buckets.into_values());
        }

        trace!(
            "refinement round {round} went from {} to {} classes",
            classes.len(),
            refined.len()
        );
        classes = refined;
        if !changed {
            break;
        }
    }

    Partition::from(classes)
}

fn class_lookup(classes: &[OrderedSet<StateIndex>], size: usize) -> Vec<usize> {
    let mut lookup = vec![0; size];
    for (index, class) in classes.iter().enumerate() {
        for &q in class {
            lookup[q] = index;
        }
    }
    lookup
}

/// Computes the partition of a Moore machine into classes of equivalent states. The initial
/// split groups states by their output.
pub fn moore_partition<S: Symbol, O: Color>(moore: &MooreMachine<S, O>) -> Partition<StateIndex> {
    let ts = moore.ts();
    refine(
        ts.size(),
        ts.alphabet().size(),
        |q| {
            ts.state_color(q)
                .expect("every state of a moore machine has an output")
                .clone()
        },
        |q, pos| ts.successor_at(q, pos),
    )
}

/// Computes the partition of a Mealy machine into classes of equivalent states. Here, the initial
/// split groups states by the vector of outputs they produce on each symbol of the alphabet, as a
/// Mealy machine has no output in the states themselves. A missing transition is observed as
/// `None`.
pub fn mealy_partition<S: Symbol, O: Color>(mealy: &MealyMachine<S, O>) -> Partition<StateIndex> {
    let ts = mealy.ts();
    refine(
        ts.size(),
        ts.alphabet().size(),
        |q| {
            (0..ts.alphabet().size())
                .map(|pos| ts.edge_at(q, pos).map(|(_, o)| o.clone()))
                .collect::<Vec<_>>()
        },
        |q, pos| ts.successor_at(q, pos),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{math::Partition, tests::textbook_moore};

    #[test_log::test]
    fn textbook_partition() {
        let partition = moore_partition(&textbook_moore());
        assert_eq!(partition, Partition::new([vec![0, 2], vec![1, 3]]));
    }

    #[test_log::test]
    fn refinement_takes_several_rounds() {
        // a chain 0 -> 1 -> 2 -> 3 where only the last state has a different output,
        // every round separates one more state
        let partition = refine(4, 1, |q| q == 3, |q, _| (q < 3).then_some(q + 1));
        assert_eq!(
            partition,
            Partition::new([vec![0], vec![1], vec![2], vec![3]])
        );
    }

    #[test]
    fn missing_transitions_are_observed() {
        // state 1 has no transition, so it is not equivalent to 0 even though both
        // produce the same output
        let partition = refine(3, 1, |_| 0, |q, _| (q != 1).then_some(2));
        assert_eq!(partition, Partition::new([vec![0, 2], vec![1]]));
    }

    #[test]
    fn mealy_initial_split_uses_all_outputs() {
        let mealy = MealyMachine::builder()
            .with_transitions([
                (0, 'a', 0, 1),
                (0, 'b', 1, 1),
                (1, 'a', 0, 0),
                (1, 'b', 0, 0),
            ])
            .into_mealy(0)
            .unwrap();
        assert_eq!(mealy_partition(&mealy), Partition::new([vec![0], vec![1]]));
    }

    #[test]
    fn deterministic_order() {
        let partition = moore_partition(&textbook_moore());
        // classes are ordered by output, then by signature
        assert_eq!(partition[0].iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(partition[1].iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }
}
