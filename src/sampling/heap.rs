//! Binary min-heap of weighted values backing the exponentially-decaying
//! reservoir.

/// A sampled value and its forward-decay priority.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct WeightedValue {
    pub priority: f64,
    pub value: i64,
}

/// Min-heap keyed on priority, stored as an implicit tree in a `Vec`.
///
/// The root (index 0) always holds the lowest priority, which is the entry
/// evicted when the reservoir is full.
#[derive(Clone, Debug, Default)]
pub(crate) struct PriorityHeap {
    entries: Vec<WeightedValue>,
}

impl PriorityHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest-priority entry.
    #[inline]
    pub fn peek(&self) -> Option<&WeightedValue> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedValue> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn push(&mut self, entry: WeightedValue) {
        self.entries.push(entry);
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the lowest-priority entry.
    pub fn pop(&mut self) -> Option<WeightedValue> {
        let last = self.entries.len().checked_sub(1)?;
        self.entries.swap(0, last);
        let min = self.entries.pop();
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        min
    }

    /// Multiply every priority by `factor`.
    ///
    /// A non-negative common factor keeps the heap order, so no sifting is
    /// needed. A factor that underflowed to zero flattens every priority to
    /// zero, which any later entry outranks.
    pub fn rescale(&mut self, factor: f64) {
        debug_assert!(factor.is_finite() && factor >= 0.0);
        for entry in &mut self.entries {
            entry.priority *= factor;
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.entries[i].priority >= self.entries[parent].priority {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;

            if left < n && self.entries[left].priority < self.entries[smallest].priority {
                smallest = left;
            }
            if right < n && self.entries[right].priority < self.entries[smallest].priority {
                smallest = right;
            }
            if smallest == i {
                return;
            }
            self.entries.swap(i, smallest);
            i = smallest;
        }
    }
}
