//! Dirty cell tracking.
//!
//! [`DirtySet`] is an insertion-ordered list of cell indices backed by a
//! membership bitmap, so marking is O(1) and never records an index twice.

/// Set of cell indices awaiting re-emission.
#[derive(Clone, Debug, Default)]
pub struct DirtySet {
    /// Indices in the order they were first marked.
    indices: Vec<usize>,
    /// Membership flag per cell.
    marked: Vec<bool>,
}

impl DirtySet {
    /// Creates an empty set able to track `len` cells.
    pub fn with_len(len: usize) -> Self {
        Self {
            indices: Vec::with_capacity(len),
            marked: vec![false; len],
        }
    }

    /// Returns the number of cells this set can track.
    #[inline]
    pub fn capacity_cells(&self) -> usize {
        self.marked.len()
    }

    /// Returns the number of marked cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no cell is marked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Marks a cell.
    ///
    /// Returns `true` if the cell was newly marked. Already-marked and
    /// out-of-range indices are ignored.
    #[inline]
    pub fn mark(&mut self, index: usize) -> bool {
        match self.marked.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                self.indices.push(index);
                true
            }
            _ => false,
        }
    }

    /// Returns true if the cell is marked.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Iterates over marked indices in marking order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Removes every marked index, yielding them in marking order.
    ///
    /// Membership flags are reset before the iterator is handed out, so the
    /// cost is proportional to the number of marked cells.
    pub fn drain(&mut self) -> std::vec::Drain<'_, usize> {
        for &index in &self.indices {
            self.marked[index] = false;
        }
        self.indices.drain(..)
    }

    /// Unmarks everything.
    pub fn clear(&mut self) {
        for &index in &self.indices {
            self.marked[index] = false;
        }
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mark_is_idempotent() {
        let mut set = DirtySet::with_len(10);
        assert!(set.mark(3));
        assert!(!set.mark(3));
        assert_eq!(set.len(), 1);
        assert!(set.contains(3));
    }

    #[test]
    fn test_mark_out_of_range_is_ignored() {
        let mut set = DirtySet::with_len(4);
        assert!(!set.mark(4));
        assert!(set.is_empty());
        assert!(!set.contains(99));
    }

    #[test]
    fn test_drain_preserves_order_and_resets() {
        let mut set = DirtySet::with_len(10);
        set.mark(7);
        set.mark(2);
        set.mark(7);
        set.mark(5);

        let drained: Vec<usize> = set.drain().collect();
        assert_eq!(drained, vec![7, 2, 5]);
        assert!(set.is_empty());
        assert!(!set.contains(7));

        // Cells can be marked again after a drain
        assert!(set.mark(7));
    }

    #[test]
    fn test_clear() {
        let mut set = DirtySet::with_len(3);
        set.mark(0);
        set.mark(2);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
        assert!(!set.contains(0));
        assert_eq!(set.capacity_cells(), 3);
    }
}
