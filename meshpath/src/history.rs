use std::collections::VecDeque;

/// Undo/redo stacks of whole-state snapshots with a capacity fixed at construction.
/// Pushing past capacity drops the oldest entry.
#[derive(Clone, Debug)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    pub fn new(capacity: usize) -> Self {
        History { undo: VecDeque::new(), redo: VecDeque::new(), capacity }
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    fn push_bounded(stack: &mut VecDeque<T>, capacity: usize, item: T) {
        if capacity == 0 {
            return;
        }
        while stack.len() >= capacity {
            stack.pop_front();
        }
        stack.push_back(item);
    }

    /// Record the state before a mutation. Invalidates redo.
    pub fn push(&mut self, snapshot: T) {
        Self::push_bounded(&mut self.undo, self.capacity, snapshot);
        self.redo.clear();
    }

    /// Step back: `current` goes to redo, the previous snapshot is returned.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let prev = self.undo.pop_back()?;
        Self::push_bounded(&mut self.redo, self.capacity, current);
        Some(prev)
    }

    /// Step forward: `current` goes back to undo, the next snapshot is returned.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop_back()?;
        Self::push_bounded(&mut self.undo, self.capacity, current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
