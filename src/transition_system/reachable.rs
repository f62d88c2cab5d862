use std::{collections::VecDeque, hash::Hash};

use bit_set::BitSet;

use crate::{math::Set, Symbol};

use super::{StateIndex, StateTable};

/// Type alias for a minimal representative of a state which is its length-lexicographically minimal
/// access sequence and its state index.
pub type MinimalRepresentative<S> = (Vec<S>, StateIndex);

/// Iterator that returns the minimal representatives of the states in a [`StateTable`] that are
/// reachable from a given origin. A minimal representative for a state `q` is the
/// length-lexicographically minimal word (with respect to the order of the alphabet) with which
/// `q` can be reached from the origin. States are produced in breadth-first order.
#[derive(Debug, Clone)]
pub struct MinimalRepresentatives<'a, S, Q, C> {
    ts: &'a StateTable<S, Q, C>,
    seen: BitSet,
    queue: VecDeque<MinimalRepresentative<S>>,
}

impl<'a, S: Symbol, Q: Clone, C: Clone> MinimalRepresentatives<'a, S, Q, C> {
    /// Starts the search in `origin`.
    pub fn new(ts: &'a StateTable<S, Q, C>, origin: StateIndex) -> Self {
        let mut seen = BitSet::with_capacity(ts.size());
        let mut queue = VecDeque::new();
        if origin < ts.size() {
            seen.insert(origin);
            queue.push_back((vec![], origin));
        }
        Self { ts, seen, queue }
    }
}

impl<'a, S: Symbol, Q: Clone, C: Clone> Iterator for MinimalRepresentatives<'a, S, Q, C> {
    type Item = MinimalRepresentative<S>;

    fn next(&mut self) -> Option<Self::Item> {
        let (access, q) = self.queue.pop_front()?;
        for (sym, p, _) in self.ts.edges_from(q) {
            if self.seen.insert(p) {
                let mut new_access = access.clone();
                new_access.push(sym.clone());
                self.queue.push_back((new_access, p));
            }
        }
        Some((access, q))
    }
}

impl<S: Symbol, Q: Clone, C: Clone> StateTable<S, Q, C> {
    /// Returns an iterator over the minimal representatives of all states reachable from `origin`.
    pub fn minimal_representatives(
        &self,
        origin: StateIndex,
    ) -> MinimalRepresentatives<'_, S, Q, C> {
        MinimalRepresentatives::new(self, origin)
    }

    /// Returns the indices of all states that are reachable from `origin` in breadth-first order,
    /// where successors are visited in the order of the alphabet.
    pub fn reachable_state_indices(&self, origin: StateIndex) -> Vec<StateIndex> {
        let mut seen = BitSet::with_capacity(self.size());
        let mut queue = VecDeque::new();
        let mut out = vec![];
        if origin >= self.size() {
            return out;
        }
        seen.insert(origin);
        queue.push_back(origin);
        while let Some(q) = queue.pop_front() {
            out.push(q);
            for (_, p, _) in self.edges_from(q) {
                if seen.insert(p) {
                    queue.push_back(p);
                }
            }
        }
        out
    }

    /// Returns the indices of all states from which some state in `targets` can be reached,
    /// in ascending order. Every target is included.
    pub fn coreachable_state_indices<I: IntoIterator<Item = StateIndex>>(
        &self,
        targets: I,
    ) -> Vec<StateIndex> {
        let mut predecessors = vec![vec![]; self.size()];
        for q in self.state_indices() {
            for (_, p, _) in self.edges_from(q) {
                predecessors[p].push(q);
            }
        }

        let mut seen = BitSet::with_capacity(self.size());
        let mut stack: Vec<StateIndex> = targets
            .into_iter()
            .filter(|&q| q < self.size() && seen.insert(q))
            .collect();
        while let Some(p) = stack.pop() {
            for &q in &predecessors[p] {
                if seen.insert(q) {
                    stack.push(q);
                }
            }
        }
        seen.iter().collect()
    }
}

/// The outcome of taking one step in a product of two automata, see [`separate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProductStep<P> {
    /// Both components can move and the pair is not yet separated.
    Continue(P),
    /// The step separates the two components.
    Separated,
    /// Neither component can move, there is nothing to explore.
    Blocked,
}

/// Explores the product of two automata breadth-first from `start`, where `step` determines the
/// outcome of reading a symbol in a product state. Returns the shortest word (minimal in the
/// length-lexicographic order induced by `symbols`) that leads to a separating step.
pub(crate) fn separate<S, P, F>(symbols: &[S], start: P, step: F) -> Option<Vec<S>>
where
    S: Clone,
    P: Hash + Eq + Clone,
    F: Fn(&P, &S) -> ProductStep<P>,
{
    let mut seen: Set<P> = Set::default();
    seen.insert(start.clone());
    let mut queue = VecDeque::from([(vec![], start)]);

    while let Some((access, p)) = queue.pop_front() {
        for sym in symbols {
            match step(&p, sym) {
                ProductStep::Blocked => {}
                ProductStep::Separated => {
                    let mut witness = access.clone();
                    witness.push(sym.clone());
                    return Some(witness);
                }
                ProductStep::Continue(next) => {
                    if seen.insert(next.clone()) {
                        let mut new_access = access.clone();
                        new_access.push(sym.clone());
                        queue.push_back((new_access, next));
                    }
                }
            }
        }
    }
    None
}
