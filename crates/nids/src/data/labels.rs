//! Sorted label universe.

/// Sorted, de-duplicated set of labels observed in a training set.
///
/// Fixes the mapping between a label and its class index: class `i` is the
/// `i`-th smallest label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<u32>,
}

impl LabelSet {
    pub fn from_labels(labels: impl IntoIterator<Item = u32>) -> Self {
        let mut labels: Vec<u32> = labels.into_iter().collect();
        labels.sort_unstable();
        labels.dedup();
        Self { labels }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Class index of `label`, or `None` if it was never observed.
    #[inline]
    pub fn index_of(&self, label: u32) -> Option<usize> {
        self.labels.binary_search(&label).ok()
    }

    /// Label of class `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`. Class indices produced by this set are
    /// always in range.
    #[inline]
    pub fn label(&self, index: usize) -> u32 {
        self.labels[index]
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.labels.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_dedups() {
        let set = LabelSet::from_labels([3, 0, 3, 7, 0]);
        assert_eq!(set.labels(), &[0, 3, 7]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn index_mapping_round_trips() {
        let set = LabelSet::from_labels([10, 2, 4]);
        assert_eq!(set.index_of(4), Some(1));
        assert_eq!(set.label(1), 4);
        assert_eq!(set.index_of(5), None);
        assert_eq!(set.get(3), None);
    }
}
