use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::Show;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Type alias for sets whose iteration order is the natural order of the elements.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for maps whose iteration order is the natural order of the keys.
pub type OrderedMap<K, V> = BTreeMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition is a different view on a congruence relation, by grouping elements of
/// type `I` into their respective classes under the relation. The classes are kept in
/// a fixed order, the position of a class in this order is called its index.
#[derive(Debug, Clone)]
pub struct Partition<I: Ord>(Vec<OrderedSet<I>>);

impl<I: Ord> std::ops::Deref for Partition<I> {
    type Target = Vec<OrderedSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Ord> IntoIterator for &'a Partition<I> {
    type Item = &'a OrderedSet<I>;
    type IntoIter = std::slice::Iter<'a, OrderedSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Ord> IntoIterator for Partition<I> {
    type Item = OrderedSet<I>;
    type IntoIter = std::vec::IntoIter<OrderedSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Two partitions are equal if they consist of the same classes, the order of the classes
/// is irrelevant.
impl<I: Ord> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Ord> Eq for Partition<I> {}

impl<I: Ord> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators
    /// which yield elements of type `I`. Empty classes are skipped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<OrderedSet<_>>())
                .filter(|class| !class.is_empty())
                .collect(),
        )
    }

    /// Returns the index of the class containing `element`. This scans all classes, if the
    /// lookup is done repeatedly, use [`Partition::class_lookup`] instead.
    pub fn class_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }

    /// Reorders the classes such that they are sorted by their smallest element.
    pub fn sorted_by_minimum(mut self) -> Self {
        self.0.sort_by(|left, right| left.first().cmp(&right.first()));
        self
    }

    /// Returns `true` if and only if every element of `other` is in the same class as
    /// some element of `self`, i.e. `self` is at most as fine as `other`.
    pub fn is_coarser_than(&self, other: &Self) -> bool {
        other
            .iter()
            .all(|class| self.iter().any(|mine| class.is_subset(mine)))
    }
}

impl Partition<usize> {
    /// Builds a lookup table that maps every element of `0..size` to the index of the class
    /// containing it. Elements that do not occur in any class are mapped to `None`.
    pub fn class_lookup(&self, size: usize) -> Vec<Option<usize>> {
        let mut lookup = vec![None; size];
        for (index, class) in self.0.iter().enumerate() {
            for &element in class {
                if element < size {
                    lookup[element] = Some(index);
                }
            }
        }
        lookup
    }
}

impl<I: Ord> From<Vec<OrderedSet<I>>> for Partition<I> {
    fn from(value: Vec<OrderedSet<I>>) -> Self {
        Self(value)
    }
}

impl<I: Ord + Show> Show for Partition<I> {
    fn show(&self) -> String {
        format!(
            "[{}]",
            self.0
                .iter()
                .map(|class| I::show_collection(class.iter()))
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;
    use crate::Show;

    #[test]
    fn partition_equality_ignores_order() {
        let left = Partition::new([vec![0, 1], vec![5], vec![2, 3, 4]]);
        let right = Partition::new([vec![2, 4, 3], vec![1, 0], vec![5]]);
        assert_eq!(left, right);
        assert_ne!(left, Partition::new([vec![0], vec![1], vec![5], vec![2, 3, 4]]));
    }

    #[test]
    fn partition_lookup() {
        let p = Partition::new([vec![3, 1], vec![0], vec![2]]).sorted_by_minimum();
        assert_eq!(p.show(), "[{0}, {1, 3}, {2}]");
        assert_eq!(p.class_lookup(5), vec![Some(0), Some(1), Some(2), Some(1), None]);
        assert_eq!(p.class_of(&3), Some(1));
        assert_eq!(p.class_of(&7), None);
    }

    #[test]
    fn partition_coarseness() {
        let coarse = Partition::new([vec![0, 1, 2], vec![3]]);
        let fine = Partition::new([vec![0], vec![1, 2], vec![3]]);
        assert!(coarse.is_coarser_than(&fine));
        assert!(!fine.is_coarser_than(&coarse));
    }
}
