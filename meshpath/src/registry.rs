use crate::model::{Elem, PathId};
use crate::path::Path;
use crate::topology::MeshTopology;
use serde::{Deserialize, Serialize};

/// All paths of a session plus the one the next event targets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathRegistry {
    paths: Vec<Path>,
    active: Option<usize>,
    next_id: PathId,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub(crate) fn next_id(&mut self) -> PathId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn get(&self, id: PathId) -> Option<&Path> {
        self.paths.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PathId) -> Option<&mut Path> {
        self.paths.iter_mut().find(|p| p.id == id)
    }

    fn position(&self, id: PathId) -> Option<usize> {
        self.paths.iter().position(|p| p.id == id)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.filter(|i| *i < self.paths.len())
    }

    pub fn active(&self) -> Option<&Path> {
        self.active_index().map(|i| &self.paths[i])
    }

    pub fn active_mut(&mut self) -> Option<&mut Path> {
        match self.active_index() {
            Some(i) => Some(&mut self.paths[i]),
            None => None,
        }
    }

    pub fn active_id(&self) -> Option<PathId> {
        self.active().map(|p| p.id)
    }

    /// Activate `path`, appending it first when it is not registered yet. An already registered
    /// id is replaced in place.
    pub fn set_active(&mut self, path: Path) -> PathId {
        let id = path.id;
        match self.position(id) {
            Some(i) => {
                self.paths[i] = path;
                self.active = Some(i);
            }
            None => {
                self.paths.push(path);
                self.active = Some(self.paths.len() - 1);
            }
        }
        id
    }

    /// Switch the active path. Returns false for unknown ids.
    pub fn activate(&mut self, id: PathId) -> bool {
        match self.position(id) {
            Some(i) => {
                self.active = Some(i);
                true
            }
            None => false,
        }
    }

    /// First path holding `anchor` as a control element, else first whose fills pass through it.
    pub fn find_containing<M: MeshTopology + ?Sized>(&self, anchor: Elem, mesh: &M) -> Option<PathId> {
        self.paths
            .iter()
            .find(|p| p.locate_anchor(anchor).is_some())
            .or_else(|| self.paths.iter().find(|p| p.locate_segment(anchor, mesh).is_some()))
            .map(|p| p.id)
    }

    /// First path holding `anchor` as a control element.
    pub fn find_anchor_owner(&self, anchor: Elem) -> Option<PathId> {
        self.paths.iter().find(|p| p.locate_anchor(anchor).is_some()).map(|p| p.id)
    }

    /// Remove a path. Activation keeps pointing at the same path when another one is removed,
    /// and falls back to the last path when the active one goes.
    pub fn remove(&mut self, id: PathId) -> Option<Path> {
        let idx = self.position(id)?;
        let active_id = self.active_id();
        let removed = self.paths.remove(idx);
        self.active = match active_id {
            Some(a) if a != id => self.position(a),
            _ => self.paths.len().checked_sub(1),
        };
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.active = None;
    }
}
