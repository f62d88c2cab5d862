#![cfg(all(feature = "random", feature = "minimize"))]

use automata_algebra::{prelude::*, random};

const ROUNDS: u64 = 64;

fn all_reachable<S: Symbol, Q: Clone, C: Clone>(
    ts: &StateTable<S, Q, C>,
    initial: StateIndex,
) -> bool {
    ts.reachable_state_indices(initial).len() == ts.size()
}

#[test_log::test]
fn minimization_is_idempotent() {
    for seed in 0..ROUNDS {
        fastrand::seed(seed);
        let moore = random::generate_random_partial_moore(2, 8, 3, 0.8);
        let once = moore.minimize().unwrap();
        assert_eq!(once.minimize().unwrap(), once, "seed {seed}");

        let mealy = random::generate_random_mealy(3, 8, 2);
        let once = mealy.minimize().unwrap();
        assert_eq!(once.minimize().unwrap(), once, "seed {seed}");
    }
}

#[test_log::test]
fn minimization_preserves_behavior() {
    for seed in 0..ROUNDS {
        fastrand::seed(seed);
        let moore = random::generate_random_partial_moore(2, 10, 2, 0.9);
        let minimal = moore.minimize().unwrap();
        assert!(minimal.size() <= moore.size());
        assert!(minimal.bisimilar(&moore), "seed {seed}\n{moore}\n{minimal}");
        assert!(all_reachable(minimal.ts(), minimal.initial()));

        let mealy = random::generate_random_partial_mealy(2, 10, 2, 0.9);
        let minimal = mealy.minimize().unwrap();
        assert!(minimal.bisimilar(&mealy), "seed {seed}\n{mealy}\n{minimal}");
        assert!(all_reachable(minimal.ts(), minimal.initial()));
    }
}

#[test_log::test]
fn minimization_refines_the_output_split() {
    for seed in 0..ROUNDS {
        fastrand::seed(seed);
        let moore = random::generate_random_partial_moore(2, 10, 3, 0.8);
        let (minimal, partition) = moore.minimize_with_partition().unwrap();
        let by_output = Partition::new((0..3).filter_map(|o| {
            let class: Vec<_> = (0..moore.size())
                .filter(|&q| moore.output(q) == Some(&o))
                .collect();
            (!class.is_empty()).then_some(class)
        }));
        assert!(by_output.is_coarser_than(&partition), "seed {seed}");
        assert!(partition.size() >= minimal.size());

        let representatives: Vec<_> = minimal
            .ts()
            .minimal_representatives(minimal.initial())
            .collect();
        assert_eq!(representatives.len(), minimal.size(), "seed {seed}");
        for (word, q) in representatives {
            let reached = word
                .iter()
                .try_fold(minimal.initial(), |p, sym| minimal.successor(p, sym));
            assert_eq!(reached, Some(q), "seed {seed}");
            assert_eq!(
                moore.reached_output(&word).as_ref(),
                minimal.output(q),
                "seed {seed} on {word:?}"
            );
        }
    }
}

#[test_log::test]
fn minimal_states_are_distinguishable() {
    for seed in 0..ROUNDS {
        fastrand::seed(seed);
        let minimal = random::generate_random_moore(2, 9, 2).minimize().unwrap();
        for p in 0..minimal.size() {
            for q in (p + 1)..minimal.size() {
                let left = MooreMachine::from_parts(minimal.ts().clone(), p).unwrap();
                let right = MooreMachine::from_parts(minimal.ts().clone(), q).unwrap();
                assert!(
                    left.witness_non_bisimilarity(&right).is_some(),
                    "seed {seed}: states {p} and {q} are equivalent in\n{minimal}"
                );
            }
        }

        let minimal = random::generate_random_mealy(2, 9, 2).minimize().unwrap();
        for p in 0..minimal.size() {
            for q in (p + 1)..minimal.size() {
                let left = MealyMachine::from_parts(minimal.ts().clone(), p).unwrap();
                let right = MealyMachine::from_parts(minimal.ts().clone(), q).unwrap();
                assert!(
                    left.witness_inequivalence(&right).is_some(),
                    "seed {seed}: states {p} and {q} are equivalent in\n{minimal}"
                );
            }
        }
    }
}

#[test_log::test]
fn mealy_moore_round_trip() {
    for seed in 0..ROUNDS {
        fastrand::seed(seed);
        let mealy = random::generate_random_mealy(3, 6, 3);
        let moore = to_moore(&mealy).unwrap();
        // every reachable state is entered by some transition, or is the initial state
        assert!(moore.size() >= mealy.ts().reachable_state_indices(mealy.initial()).len());
        let back = to_mealy(&moore);
        assert!(back.bisimilar(&mealy), "seed {seed}\n{mealy}\n{moore}");

        // the conversions commute with minimization up to behavior
        let minimal = Machine::from(mealy.clone()).minimize().unwrap();
        let via_moore = Machine::from(moore).minimize().unwrap().to_mealy();
        let (Machine::Mealy(minimal), Machine::Mealy(via_moore)) = (minimal, via_moore) else {
            unreachable!("minimization keeps the kind of machine");
        };
        assert!(minimal.bisimilar(&via_moore), "seed {seed}");
    }
}

#[test_log::test]
fn determinization_agrees_with_nfa() {
    for seed in 0..ROUNDS {
        fastrand::seed(seed);
        let nfa = random::generate_random_nfa(2, 5, 0.2, 0.1);
        let dfa = determinize(&nfa).unwrap();
        let total = determinize_with(&nfa, DeterminizationOptions::default().total()).unwrap();
        assert!(all_reachable(dfa.ts(), dfa.initial()), "seed {seed}\n{dfa}");
        assert!(total.is_total());
        assert!(dfa.equivalent(&total));

        for word in random::words_up_to(nfa.alphabet(), 6) {
            let expected = nfa.accepts(&word);
            assert_eq!(dfa.accepts(&word), expected, "seed {seed} on {word:?}\n{nfa}\n{dfa}");
            assert_eq!(total.accepts(&word), expected, "seed {seed} on {word:?}");
        }

        for q in 0..dfa.size() {
            let subset = dfa.subset(q).unwrap();
            assert_eq!(
                dfa.is_final(q),
                subset.iter().any(|&p| nfa.is_final(p)),
                "seed {seed}"
            );
        }

        let minimal = dfa.minimize().unwrap();
        assert!(minimal.size() <= dfa.size());
        assert!(minimal.equivalent(&dfa), "seed {seed}");
    }
}
