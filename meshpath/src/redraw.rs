use crate::model::PathId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Render batches invalidated since the host last drained them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RedrawState {
    /// Control element batch per path
    pub controls: BTreeSet<PathId>,
    /// Fill batch per (path, slot)
    pub fills: BTreeSet<(PathId, usize)>,
    /// Paths whose slot layout shifted; every fill batch must be rebuilt
    pub rebuilt: BTreeSet<PathId>,
    pub removed: BTreeSet<PathId>,
    /// Everything, e.g. after undo
    pub full: bool,
}

impl RedrawState {
    pub fn is_empty(&self) -> bool {
        !self.full
            && self.controls.is_empty()
            && self.fills.is_empty()
            && self.rebuilt.is_empty()
            && self.removed.is_empty()
    }

    pub fn mark_controls(&mut self, path: PathId) {
        self.controls.insert(path);
    }

    pub fn mark_fill(&mut self, path: PathId, slot: usize) {
        self.fills.insert((path, slot));
    }

    pub fn mark_rebuilt(&mut self, path: PathId) {
        self.controls.insert(path);
        self.rebuilt.insert(path);
    }

    pub fn mark_removed(&mut self, path: PathId) {
        self.controls.remove(&path);
        self.rebuilt.remove(&path);
        self.fills.retain(|(p, _)| *p != path);
        self.removed.insert(path);
    }

    pub fn mark_full(&mut self) {
        self.full = true;
    }

    /// Whether the fill batch at `slot` must be regenerated.
    pub fn fill_stale(&self, path: PathId, slot: usize) -> bool {
        self.full || self.rebuilt.contains(&path) || self.fills.contains(&(path, slot))
    }
}
