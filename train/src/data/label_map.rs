use crate::common::*;

/// The bijection from a set of original labels to `0..len`, ordered by
/// ascending original label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    labels: IndexSet<usize>,
}

impl LabelMap {
    pub fn new<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let labels: IndexSet<_> = labels.into_iter().sorted_unstable().dedup().collect();
        Self { labels }
    }

    /// The dense label of an original label.
    pub fn get(&self, label: usize) -> Option<usize> {
        self.labels.get_index_of(&label)
    }

    /// The original label of a dense label.
    pub fn original(&self, index: usize) -> Option<usize> {
        self.labels.get_index(index).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The original labels in ascending order.
    pub fn labels(&self) -> impl Iterator<Item = usize> + '_ {
        self.labels.iter().copied()
    }
}
