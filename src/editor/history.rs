use std::collections::VecDeque;

use crate::markup::RichText;

use super::surface::Selection;

/// Number of undo steps kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Content and selection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub content: RichText,
    pub selection: Option<Selection>,
}

/// Bounded undo/redo stacks of surface snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    capacity: usize,
    /// The last recorded step was a typing step that later typing may join.
    coalescing: bool,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity: capacity.max(1),
            coalescing: false,
        }
    }

    /// Record the state *before* a mutation.
    ///
    /// With `coalesce`, consecutive typing steps collapse into the first
    /// one, so a typed word undoes in one step.
    pub fn record(&mut self, before: Snapshot, coalesce: bool) {
        self.redo.clear();
        if coalesce && self.coalescing {
            return;
        }
        self.coalescing = coalesce;
        if self.undo.len() == self.capacity {
            self.undo.pop_front();
        }
        self.undo.push_back(before);
    }

    /// Stop the current typing step from absorbing the next one.
    pub const fn break_coalescing(&mut self) {
        self.coalescing = false;
    }

    /// Swap `current` for the previous snapshot.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        self.coalescing = false;
        Some(previous)
    }

    /// Swap `current` for the next snapshot.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo.pop()?;
        self.undo.push_back(current);
        self.coalescing = false;
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.coalescing = false;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
