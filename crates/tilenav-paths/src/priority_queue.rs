//! Binary min-heap used as the search frontier.

#[derive(Clone, Copy, Debug)]
struct HeapItem<T> {
    priority: i32,
    value: T,
}

/// A reusable binary min-heap of `(priority, value)` pairs.
///
/// The sift rules are fixed so the pop order depends only on the push
/// sequence. Equal priorities carry no extra tie-break key.
#[derive(Clone, Debug)]
pub struct PriorityQueue<T> {
    data: Vec<HeapItem<T>>,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop every element, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Priority of the element [`pop`](Self::pop) would return.
    #[inline]
    pub fn peek_priority(&self) -> Option<i32> {
        self.data.first().map(|item| item.priority)
    }

    pub fn push(&mut self, priority: i32, value: T) {
        self.data.push(HeapItem { priority, value });
        self.sift_up(self.data.len() - 1);
    }

    /// Remove and return the value with the smallest priority.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.data.len().checked_sub(1)?;
        self.data.swap(0, last);
        let item = self.data.pop()?;
        self.sift_down(0);
        Some(item.value)
    }

    fn sift_up(&mut self, mut j: usize) {
        while j > 0 {
            let parent = (j - 1) / 2;
            if self.data[j].priority >= self.data[parent].priority {
                break;
            }
            self.data.swap(parent, j);
            j = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let mut j = left;
            let right = left + 1;
            if right < n && self.data[right].priority < self.data[left].priority {
                j = right;
            }
            if self.data[j].priority >= self.data[i].priority {
                break;
            }
            self.data.swap(i, j);
            i = j;
        }
    }
}
