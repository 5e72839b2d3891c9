use std::ops::Index;

/// Fixed-length FIFO window backed by a ring buffer.
///
/// The window is always full: it starts with `size` copies of a fill value and
/// every push evicts the oldest entry. Index 0 is the oldest entry, index
/// `len() - 1` the newest.
#[derive(Clone, Debug)]
pub struct SlidingWindow<T> {
    items: Vec<T>,
    /// Position of the oldest entry in `items`
    head: usize,
}

impl<T: Clone> SlidingWindow<T> {
    pub fn new(size: usize, fill: T) -> Self {
        assert!(size > 0, "sliding window size must be positive");
        SlidingWindow {
            items: vec![fill; size],
            head: 0,
        }
    }
}

impl<T> SlidingWindow<T> {
    /// Append `item` as the newest entry and return the evicted oldest one.
    pub fn push(&mut self, item: T) -> T {
        let evicted = std::mem::replace(&mut self.items[self.head], item);
        self.head = (self.head + 1) % self.items.len();
        evicted
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.items.len() {
            Some(&self.items[(self.head + index) % self.items.len()])
        } else {
            None
        }
    }

    pub fn newest(&self) -> &T {
        &self[self.items.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.items.len()).map(move |i| &self[i])
    }
}

impl<T> Index<usize> for SlidingWindow<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        let len = self.items.len();
        assert!(index < len, "index {} out of bounds for window of {}", index, len);
        &self.items[(self.head + index) % len]
    }
}
