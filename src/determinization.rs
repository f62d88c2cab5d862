use std::collections::VecDeque;

use bit_set::BitSet;
use tracing::{debug, trace};

use crate::{
    math::{Bijection, OrderedSet},
    prelude::*,
};

/// Determines how undefined moves are represented in the result of a determinization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Totality {
    /// If the set of states reachable on some symbol is empty, there is no transition.
    #[default]
    Partial,
    /// All undefined moves lead into a single non-accepting sink state which loops on every
    /// symbol. The sink is only added if some move is undefined, it corresponds to the empty
    /// set of NFA states.
    Total,
}

/// Options for [`determinize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeterminizationOptions {
    /// How undefined moves are represented.
    pub totality: Totality,
}

impl DeterminizationOptions {
    /// Requests a DFA with a total transition function.
    pub fn total(mut self) -> Self {
        self.totality = Totality::Total;
        self
    }

    /// Requests a DFA in which undefined moves have no transition, which is the default.
    pub fn partial(mut self) -> Self {
        self.totality = Totality::Partial;
        self
    }
}

/// Computes the epsilon closure of the given set of states, which is the smallest set that
/// contains `states` and is closed under taking epsilon transitions. The closure is returned as
/// a sorted sequence of state indices without duplicates.
///
/// # Example
/// ```
/// use automata_algebra::{determinization::epsilon_closure, prelude::*};
///
/// let nfa = Nfa::<char>::builder()
///     .with_epsilon_transitions([(0, 1), (1, 2), (2, 0), (3, 1)])
///     .into_nfa(0)
///     .unwrap();
/// assert_eq!(epsilon_closure(&nfa, [0]), vec![0, 1, 2]);
/// assert_eq!(epsilon_closure(&nfa, [3]), vec![0, 1, 2, 3]);
/// ```
pub fn epsilon_closure<S: Symbol, I: IntoIterator<Item = StateIndex>>(
    nfa: &Nfa<S>,
    states: I,
) -> Vec<StateIndex> {
    let mut seen = BitSet::with_capacity(nfa.size());
    let mut stack: Vec<StateIndex> = states
        .into_iter()
        .filter(|&q| seen.insert(q))
        .collect();

    while let Some(q) = stack.pop() {
        for p in nfa.successors(q, &Label::Epsilon) {
            if seen.insert(p) {
                stack.push(p);
            }
        }
    }
    seen.iter().collect()
}

/// Collects all states that can be reached from some state in `states` through a single
/// transition on `symbol`. Epsilon transitions are not taken.
pub fn moves<S: Symbol>(nfa: &Nfa<S>, states: &[StateIndex], symbol: &S) -> OrderedSet<StateIndex> {
    let label = Label::Symbol(symbol.clone());
    states
        .iter()
        .flat_map(|&q| nfa.successors(q, &label))
        .collect()
}

/// Turns `nfa` into an equivalent [`Dfa`] using the subset construction, where undefined moves
/// have no transition. This is a shorthand for calling [`determinize_with`] with the default
/// options.
///
/// # Example
/// ```
/// use automata_algebra::prelude::*;
///
/// // all words over {a, b} that end in ab
/// let nfa = Nfa::builder()
///     .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'a', 1), (1, 'b', 2)])
///     .with_final_states([2])
///     .into_nfa(0)
///     .unwrap();
/// let dfa = determinize(&nfa).unwrap();
/// assert_eq!(dfa.size(), 3);
/// assert!(dfa.accepts(&['b', 'a', 'b']));
/// assert!(!dfa.accepts(&['a', 'b', 'a']));
/// ```
pub fn determinize<S: Symbol>(nfa: &Nfa<S>) -> Result<Dfa<S>, Error> {
    determinize_with(nfa, DeterminizationOptions::default())
}

/// Turns `nfa` into an equivalent [`Dfa`] using the subset construction.
///
/// Every state of the DFA corresponds to an epsilon closed set of states of `nfa`, which can be
/// obtained through [`Dfa::subset`]. The initial state is the closure of the initial state of
/// `nfa` and always has index `0`. The remaining sets are explored in a breadth-first manner,
/// going through the alphabet in order, and each one receives the next free index when it is
/// discovered for the first time. A state of the DFA is final if its set contains a final state
/// of `nfa`.
///
/// Fails with [`Error::EmptyAutomaton`] if `nfa` has no states.
pub fn determinize_with<S: Symbol>(
    nfa: &Nfa<S>,
    options: DeterminizationOptions,
) -> Result<Dfa<S>, Error> {
    if nfa.is_empty() {
        return Err(Error::EmptyAutomaton);
    }
    let alphabet = nfa.alphabet();
    let is_final = |subset: &[StateIndex]| subset.iter().any(|&q| nfa.is_final(q));

    let mut ts: StateTable<S, bool, Void> = StateTable::for_alphabet(alphabet.clone());
    let mut ids: Bijection<Vec<StateIndex>, StateIndex> = Bijection::new();
    let mut queue = VecDeque::new();
    let mut undefined = false;

    let initial = epsilon_closure(nfa, [nfa.initial()]);
    let id = ts.add_state(is_final(&initial));
    ids.insert(initial, id);
    queue.push_back(id);

    while let Some(source) = queue.pop_front() {
        let subset = ids
            .get_by_right(&source)
            .expect("every discovered state has a subset")
            .clone();
        for (pos, symbol) in alphabet.symbols().iter().enumerate() {
            let reached = epsilon_closure(nfa, moves(nfa, &subset, symbol));
            if reached.is_empty() {
                undefined = true;
                continue;
            }
            let target = match ids.get_by_left(&reached) {
                Some(&target) => target,
                None => {
                    let target = ts.add_state(is_final(&reached));
                    trace!(
                        "discovered {} as state {target}",
                        StateIndex::show_collection(reached.iter())
                    );
                    ids.insert(reached, target);
                    queue.push_back(target);
                    target
                }
            };
            ts.set_edge(source, pos, target, Void);
        }
    }

    let mut subsets = vec![OrderedSet::new(); ts.size()];
    for (subset, &id) in ids.iter() {
        subsets[id] = subset.iter().copied().collect();
    }

    if options.totality == Totality::Total && undefined {
        let sink = ts.add_state(false);
        subsets.push(OrderedSet::new());
        for q in ts.state_indices() {
            for pos in 0..alphabet.size() {
                if ts.edge_at(q, pos).is_none() {
                    ts.set_edge(q, pos, sink, Void);
                }
            }
        }
        debug!("added sink state {sink} to make the dfa total");
    }

    debug!(
        "determinized nfa with {} states into dfa with {} states",
        nfa.size(),
        ts.size()
    );
    Ok(Dfa::with_subsets(ts, 0, subsets))
}

impl<S: Symbol> Nfa<S> {
    /// Determinizes `self`, see [`determinize`].
    pub fn determinize(&self) -> Result<Dfa<S>, Error> {
        determinize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{epsilon_closure, moves};
    use crate::prelude::*;

    fn epsilon_nfa() -> Nfa {
        Nfa::builder()
            .with_alphabet(['0', '1'])
            .with_transitions([(0, '0', 1), (0, '1', 0), (2, '1', 2)])
            .with_epsilon_transitions([(1, 2)])
            .with_final_states([2])
            .into_nfa(0)
            .unwrap()
    }

    #[test]
    fn closures() {
        let nfa = Nfa::builder()
            .with_alphabet(['a'])
            .with_transitions([(3, 'a', 0)])
            .with_epsilon_transitions([(0, 1), (1, 2), (2, 0), (2, 3)])
            .into_nfa(0)
            .unwrap();
        assert_eq!(epsilon_closure(&nfa, [0]), vec![0, 1, 2, 3]);
        assert_eq!(epsilon_closure(&nfa, [3]), vec![3]);
        assert_eq!(epsilon_closure(&nfa, [3, 3]), vec![3]);
        assert_eq!(epsilon_closure(&nfa, []), Vec::<StateIndex>::new());
        assert_eq!(moves(&nfa, &[0, 1, 3], &'a').into_iter().collect::<Vec<_>>(), vec![0]);
        assert!(moves(&nfa, &[0, 1, 2], &'a').is_empty());
    }

    #[test_log::test]
    fn epsilon_transitions_are_followed() {
        let nfa = epsilon_nfa();
        let dfa = determinize(&nfa).unwrap();
        assert_eq!(dfa.size(), 3);
        assert_eq!(dfa.initial(), 0);
        // wherever 1 occurs, 2 occurs as well
        for q in 0..dfa.size() {
            let subset = dfa.subset(q).unwrap();
            assert!(!subset.contains(&1) || subset.contains(&2));
        }
        assert_eq!(dfa.subset(1).unwrap().iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(dfa.successor(0, &'0'), Some(1));
        assert_eq!(dfa.successor(0, &'1'), Some(0));
        assert_eq!(dfa.successor(1, &'0'), None);
        assert_eq!(dfa.successor(1, &'1'), Some(2));
        assert_eq!(dfa.final_states(), vec![1, 2]);
        assert!(!dfa.is_total());
    }

    #[test_log::test]
    fn total_determinization_adds_sink() {
        let nfa = epsilon_nfa();
        let dfa = determinize_with(&nfa, DeterminizationOptions::default().total()).unwrap();
        assert_eq!(dfa.size(), 4);
        assert!(dfa.is_total());
        assert!(dfa.subset(3).unwrap().is_empty());
        assert!(!dfa.is_final(3));
        assert_eq!(dfa.successor(1, &'0'), Some(3));
        assert_eq!(dfa.successor(3, &'0'), Some(3));
        assert_eq!(dfa.successor(3, &'1'), Some(3));

        let partial = determinize(&nfa).unwrap();
        assert!(dfa.equivalent(&partial));
        assert_eq!(dfa.forget_subsets().subsets().len(), 0);
    }

    #[test]
    fn no_sink_when_already_total() {
        let nfa = Nfa::builder()
            .with_transitions([(0, 'a', 0), (0, 'b', 0), (0, 'a', 1), (1, 'b', 2)])
            .with_final_states([2])
            .into_nfa(0)
            .unwrap();
        let dfa = nfa.determinize().unwrap();
        let total = determinize_with(&nfa, DeterminizationOptions::default().total()).unwrap();
        assert_eq!(dfa, total);
        assert_eq!(dfa.size(), 3);
        assert_eq!(dfa.final_states(), vec![2]);
        assert_eq!(
            dfa.subsets()
                .iter()
                .map(|subset| subset.iter().copied().collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            vec![vec![0], vec![0, 1], vec![0, 2]]
        );
    }

    #[test]
    fn agrees_with_nfa() {
        let nfa = epsilon_nfa();
        let dfa = determinize(&nfa).unwrap();
        for word in [
            vec![],
            vec!['0'],
            vec!['1', '0'],
            vec!['0', '1', '1'],
            vec!['0', '0'],
            vec!['1', '1', '0', '1'],
        ] {
            assert_eq!(dfa.accepts(&word), nfa.accepts(&word), "{word:?}");
        }
    }

    #[test]
    fn empty_nfa() {
        let nfa = Nfa::<char>::builder().into_nfa(0).unwrap();
        assert_eq!(determinize(&nfa), Err(Error::EmptyAutomaton));
    }
}
