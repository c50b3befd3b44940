use std::collections::VecDeque;

pub const MAX_HISTORY: usize = 50;

/// Bounded undo log. The oldest snapshot is dropped once the cap is reached.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    cap: usize,
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap),
            cap: cap.max(1),
        }
    }

    pub fn push(&mut self, snapshot: T) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
