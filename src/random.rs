use tracing::trace;

use crate::prelude::*;

/// Draws the edges of a transition system with `size` states over a [`CharAlphabet`] with
/// `symbols` symbols. For each state and symbol, an edge is inserted with probability
/// `density` and its target is drawn uniformly. The color of the edge is computed by `color`
/// from the source, the symbol position and the target.
fn random_table<Q: Clone, C: Clone, F: FnMut(StateIndex, usize, StateIndex) -> C>(
    symbols: usize,
    size: usize,
    density: f64,
    state_colors: Vec<Q>,
    mut color: F,
) -> StateTable<char, Q, C> {
    assert_eq!(state_colors.len(), size);
    let mut ts = StateTable::for_alphabet_size_hint(CharAlphabet::of_size(symbols), size);
    for q in state_colors {
        ts.add_state(q);
    }
    for q in 0..size {
        for pos in 0..symbols {
            if fastrand::f64() < density {
                let target = fastrand::usize(..size);
                let c = color(q, pos, target);
                ts.set_edge(q, pos, target, c);
            }
        }
    }
    ts
}

/// Generates a Mealy machine with `size` states over a [`CharAlphabet`] with `symbols` symbols,
/// emitting outputs in the range `0..outputs`. Every state has a transition on every symbol, its
/// target and output are drawn uniformly. Depending on the draw, some states may not be
/// reachable from the initial state `0`.
///
/// # Panics
/// If `size` or `outputs` is zero, or if there are more than 26 symbols.
pub fn generate_random_mealy(
    symbols: usize,
    size: usize,
    outputs: usize,
) -> MealyMachine<char, usize> {
    generate_random_partial_mealy(symbols, size, outputs, 1.0)
}

/// Works like [`generate_random_mealy`], but each transition is only present with probability
/// `density`.
pub fn generate_random_partial_mealy(
    symbols: usize,
    size: usize,
    outputs: usize,
    density: f64,
) -> MealyMachine<char, usize> {
    assert!(size > 0 && outputs > 0, "size and number of outputs must be positive");
    let ts = random_table(symbols, size, density, vec![Void; size], |_, _, _| {
        fastrand::usize(..outputs)
    });
    trace!("generated random mealy machine with {size} states");
    MealyMachine::from_parts(ts, 0).expect("generated table is well formed")
}

/// Generates a Moore machine with `size` states over a [`CharAlphabet`] with `symbols` symbols,
/// whose states have outputs in the range `0..outputs`. The transition function is total and
/// the initial state is `0`.
///
/// # Panics
/// If `size` or `outputs` is zero, or if there are more than 26 symbols.
pub fn generate_random_moore(
    symbols: usize,
    size: usize,
    outputs: usize,
) -> MooreMachine<char, usize> {
    generate_random_partial_moore(symbols, size, outputs, 1.0)
}

/// Works like [`generate_random_moore`], but each transition is only present with probability
/// `density`.
pub fn generate_random_partial_moore(
    symbols: usize,
    size: usize,
    outputs: usize,
    density: f64,
) -> MooreMachine<char, usize> {
    assert!(size > 0 && outputs > 0, "size and number of outputs must be positive");
    let colors = (0..size).map(|_| fastrand::usize(..outputs)).collect();
    let ts = random_table(symbols, size, density, colors, |_, _, _| Void);
    trace!("generated random moore machine with {size} states");
    MooreMachine::from_parts(ts, 0).expect("generated table is well formed")
}

/// Generates an NFA with `size` states over a [`CharAlphabet`] with `symbols` symbols. For
/// each pair of states and each symbol, a transition is inserted with probability `density`,
/// an epsilon transition between two states is inserted with probability `epsilon_density`.
/// Each state is final with probability one half, the initial state is `0`.
///
/// # Panics
/// If `size` is zero or if there are more than 26 symbols.
pub fn generate_random_nfa(symbols: usize, size: usize, density: f64, epsilon_density: f64) -> Nfa {
    assert!(size > 0, "an nfa needs at least one state");
    let alphabet = CharAlphabet::of_size(symbols);
    let mut transitions = vec![];
    let mut epsilon = vec![];
    for q in 0..size {
        for p in 0..size {
            for sym in alphabet.universe() {
                if fastrand::f64() < density {
                    transitions.push((q, sym, p));
                }
            }
            if q != p && fastrand::f64() < epsilon_density {
                epsilon.push((q, p));
            }
        }
    }
    let finals = (0..size).filter(|_| fastrand::bool()).collect::<Vec<_>>();
    trace!(
        "generated random nfa with {size} states, {} transitions and {} epsilon transitions",
        transitions.len(),
        epsilon.len()
    );
    Nfa::builder()
        .with_alphabet(alphabet.universe())
        .with_states(size)
        .with_transitions(transitions)
        .with_epsilon_transitions(epsilon)
        .with_final_states(finals)
        .into_nfa(0)
        .expect("generated nfa is well formed")
}

/// Generate a random word over the symbols of `alphabet`. The length of the word is drawn
/// uniformly from the range `min_len..=max_len`.
pub fn generate_random_word<S: Symbol>(
    alphabet: &Alphabet<S>,
    min_len: usize,
    max_len: usize,
) -> Vec<S> {
    if alphabet.is_empty() {
        return vec![];
    }
    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .map(|_| alphabet[fastrand::usize(..alphabet.size())].clone())
        .collect()
}

/// Enumerates all words over `alphabet` of length at most `max_len` in length-lexicographic
/// order, starting with the empty word.
pub fn words_up_to<S: Symbol>(alphabet: &Alphabet<S>, max_len: usize) -> Vec<Vec<S>> {
    let mut out = vec![vec![]];
    let mut layer: Vec<Vec<S>> = vec![vec![]];
    for _ in 0..max_len {
        layer = layer
            .iter()
            .flat_map(|word| {
                alphabet.universe().map(move |sym| {
                    let mut next = word.clone();
                    next.push(sym);
                    next
                })
            })
            .collect();
        out.extend(layer.iter().cloned());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_machines() {
        for _ in 0..20 {
            let mealy = generate_random_mealy(2, 5, 3);
            assert_eq!(mealy.size(), 5);
            assert!(mealy.ts().is_complete());
            assert!(mealy.color_range().iter().all(|&o| o < 3));

            let moore = generate_random_partial_moore(3, 4, 2, 0.5);
            assert_eq!(moore.size(), 4);
            assert_eq!(moore.alphabet().size(), 3);

            let nfa = generate_random_nfa(2, 4, 0.3, 0.1);
            assert_eq!(nfa.size(), 4);
            assert_eq!(nfa.alphabet().symbols(), &['a', 'b']);
        }
    }

    #[test]
    fn word_enumeration() {
        let alphabet = CharAlphabet::of_size(2);
        let words = words_up_to(&alphabet, 2);
        assert_eq!(words.len(), 7);
        assert_eq!(words[0], Vec::<char>::new());
        assert_eq!(words[1], vec!['a']);
        assert_eq!(words[6], vec!['b', 'b']);

        let word = generate_random_word(&alphabet, 3, 5);
        assert!((3..=5).contains(&word.len()));
    }
}
