//! Interactive path session: turns classified input into path mutations.

use crate::apply::apply_final;
use crate::config::ToolConfig;
use crate::error::{PathError, Result};
use crate::finalize::{finalize, FinalElements};
use crate::history::History;
use crate::model::{Elem, InteractEvent, IslandId, Notice, PathId, SurfaceMode};
use crate::path::Path;
use crate::redraw::RedrawState;
use crate::registry::PathRegistry;
use crate::topology::{AttributeWriter, MeshTopology};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashMap;

/// Pointer/keyboard input after keymap resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Select button pressed
    Press,
    /// Select button pressed with the new-path modifier
    PressNew,
    /// Select button pressed with the remove modifier
    PressRemove,
    Move,
    Release,
    Action(Action),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Close,
    SwitchDirection,
    Undo,
    Redo,
    Apply,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Status {
    Running,
    Finished(FinalElements),
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interaction {
    Idle,
    /// A control element is pinned under the held select button.
    Dragging { path: PathId, index: usize },
    /// The path was just closed; the next new element starts another path.
    JustClosed { path: PathId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Ready,
    Running,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Duplicate {
    /// First and last control elements coincide
    CloseLoop,
    /// Later occurrence sits next to the first one
    DropAdjacent(usize),
    /// Coincident endpoints of two open paths
    Join(PathId),
    /// Internal duplicate left alone
    Keep,
}

/// Maps surface elements to the connected island they belong to, querying the mesh once
/// per island.
#[derive(Clone, Debug, Default)]
struct IslandCache {
    members: HashMap<Elem, IslandId>,
    count: IslandId,
}

impl IslandCache {
    fn island_of<M: MeshTopology + ?Sized>(&mut self, mesh: &M, elem: Elem) -> IslandId {
        if let Some(id) = self.members.get(&elem) {
            return *id;
        }
        let id = self.count;
        self.count += 1;
        for e in mesh.linked_elements(elem) {
            self.members.entry(e).or_insert(id);
        }
        self.members.insert(elem, id);
        id
    }
}

pub struct Session<M: MeshTopology> {
    mesh: M,
    mode: SurfaceMode,
    config: ToolConfig,
    registry: PathRegistry,
    islands: IslandCache,
    state: Interaction,
    phase: Phase,
    button_held: bool,
    baseline: Vec<Elem>,
    history: History<PathRegistry>,
    redraw: RedrawState,
    notices: Vec<Notice>,
    navigation_element: Option<Elem>,
}

impl<M: MeshTopology> Session<M> {
    /// Record the selection baseline and size the history. Nothing is picked yet.
    pub fn new(mesh: M, mode: SurfaceMode, config: ToolConfig) -> Result<Self> {
        config.validate()?;
        let baseline = mesh.selected(mode.select_kind());
        let history = History::new(config.undo_steps);
        Ok(Session {
            mesh,
            mode,
            config,
            registry: PathRegistry::new(),
            islands: IslandCache::default(),
            state: Interaction::Idle,
            phase: Phase::Ready,
            button_held: false,
            baseline,
            history,
            redraw: RedrawState::default(),
            notices: Vec::new(),
            navigation_element: None,
        })
    }

    /// Process one event to completion, following re-dispatches up to the configured limit.
    fn dispatch(&mut self, event: InteractEvent, pick: Option<Elem>) -> Result<()> {
        if let Some(elem) = pick {
            self.navigation_element = Some(elem);
        }
        let limit = self.config.max_redispatch;
        let mut pending = Some(event);
        let mut steps = 0;
        while let Some(ev) = pending.take() {
            steps += 1;
            if steps > limit {
                return Err(PathError::RedispatchLimit(limit));
            }
            debug!("{:?} on {:?} (state {:?})", ev, pick, self.state);
            pending = self.step(ev, pick)?;
        }
        self.restore_selection();
        Ok(())
    }

    fn step(&mut self, event: InteractEvent, pick: Option<Elem>) -> Result<Option<InteractEvent>> {
        match (event, pick) {
            (InteractEvent::Close, _) => self.on_close(),
            (InteractEvent::SwitchDirection, _) => self.on_switch_direction(),
            (InteractEvent::Release, _) => self.on_release(),
            (_, None) => Ok(None),
            (InteractEvent::Add, Some(elem)) => self.on_add(elem),
            (InteractEvent::AddNewPath, Some(elem)) => self.on_add_new_path(elem),
            (InteractEvent::Remove, Some(elem)) => self.on_remove(elem),
            (InteractEvent::Drag, Some(elem)) => self.on_drag(elem),
        }
    }

    fn on_add(&mut self, elem: Elem) -> Result<Option<InteractEvent>> {
        let (active_id, len, anchor_index, fill_slot) = match self.registry.active() {
            None => return Ok(Some(InteractEvent::AddNewPath)),
            Some(p) => {
                let anchor_index = p.locate_anchor(elem);
                let fill_slot = match anchor_index {
                    Some(_) => None,
                    None => p.locate_segment(elem, &self.mesh),
                };
                (p.id, p.len(), anchor_index, fill_slot)
            }
        };

        if let Some(index) = anchor_index {
            if len == 1 {
                // nothing visible yet besides the single control element
                self.redraw.mark_controls(active_id);
            }
            self.state = Interaction::Dragging { path: active_id, index };
            return Ok(None);
        }

        let new_index = match fill_slot {
            Some(slot) => {
                self.clear_just_closed();
                slot + 1
            }
            None => {
                if let Some(other) = self.registry.find_containing(elem, &self.mesh) {
                    self.registry.activate(other);
                    self.clear_just_closed();
                    return Ok(Some(InteractEvent::Add));
                }
                len
            }
        };

        if let Interaction::JustClosed { .. } = self.state {
            return Ok(Some(InteractEvent::AddNewPath));
        }

        let island = self.islands.island_of(&self.mesh, elem);
        let path = self.registry.active_mut().ok_or(PathError::NoActivePath)?;
        if path.island != island {
            return Ok(Some(InteractEvent::AddNewPath));
        }
        path.insert_anchor(new_index, elem)?;
        self.state = Interaction::Dragging { path: active_id, index: new_index };
        self.update_fills(active_id, new_index)?;
        self.redraw.mark_rebuilt(active_id);
        Ok(None)
    }

    fn on_add_new_path(&mut self, elem: Elem) -> Result<Option<InteractEvent>> {
        let island = self.islands.island_of(&self.mesh, elem);
        let id = self.registry.next_id();
        let path = Path::new(id, elem, island, elem.object, self.mesh.transform(elem.object));
        self.registry.set_active(path);
        self.redraw.mark_rebuilt(id);
        self.state = Interaction::Idle;
        self.notify(Notice::CreatedPath);
        Ok(Some(InteractEvent::Add))
    }

    fn on_remove(&mut self, elem: Elem) -> Result<Option<InteractEvent>> {
        self.state = Interaction::Idle;
        let (active_id, index) = match self.registry.active() {
            None => return Ok(None),
            Some(p) => (p.id, p.locate_anchor(elem)),
        };
        let index = match index {
            Some(i) => i,
            None => {
                if let Some(owner) = self.registry.find_anchor_owner(elem) {
                    self.registry.activate(owner);
                    return Ok(Some(InteractEvent::Remove));
                }
                return Ok(None);
            }
        };

        let path = self.registry.active_mut().ok_or(PathError::NoActivePath)?;
        path.pop_anchor(index)?;
        if path.is_empty() {
            self.registry.remove(active_id);
            self.redraw.mark_removed(active_id);
            debug!("removed path {}, {} left", active_id, self.registry.len());
        } else {
            self.update_fills(active_id, index)?;
            self.redraw.mark_rebuilt(active_id);
        }
        Ok(None)
    }

    fn on_drag(&mut self, elem: Elem) -> Result<Option<InteractEvent>> {
        let (path_id, index) = match self.state {
            Interaction::Dragging { path, index } => (path, index),
            _ => return Ok(None),
        };
        let island = self.islands.island_of(&self.mesh, elem);
        let path = match self.registry.get_mut(path_id) {
            Some(p) => p,
            None => {
                self.state = Interaction::Idle;
                return Ok(None);
            }
        };
        if path.island != island {
            warn!("drag onto another mesh island ignored");
            return Ok(None);
        }
        match path.anchors().get(index) {
            None => {
                self.state = Interaction::Idle;
                return Ok(None);
            }
            Some(current) if *current == elem => return Ok(None),
            Some(_) => {}
        }
        path.replace_anchor(index, elem)?;
        self.update_fills(path_id, index)?;
        self.redraw.mark_controls(path_id);
        Ok(None)
    }

    fn on_close(&mut self) -> Result<Option<InteractEvent>> {
        let path = match self.registry.active_mut() {
            Some(p) => p,
            None => return Ok(None),
        };
        let id = path.id;
        path.closed = !path.closed;
        if path.closed {
            let len = path.len();
            self.update_fills(id, 0)?;
            if len > 2 {
                self.state = Interaction::JustClosed { path: id };
            }
        } else {
            path.clear_closing_fill();
            if let Some(slot) = path.closing_slot() {
                self.redraw.mark_fill(id, slot);
            }
            self.clear_just_closed();
        }
        self.redraw.mark_controls(id);
        Ok(None)
    }

    fn on_switch_direction(&mut self) -> Result<Option<InteractEvent>> {
        let path = match self.registry.active_mut() {
            Some(p) => p,
            None => return Ok(None),
        };
        path.reverse();
        let (id, len) = (path.id, path.len());
        // keep a held pin on the same control element
        if let Interaction::Dragging { path: pinned, index } = self.state {
            if pinned == id && index < len {
                self.state = Interaction::Dragging { path: id, index: len - 1 - index };
            }
        }
        self.clear_just_closed();
        self.redraw.mark_rebuilt(id);
        Ok(None)
    }

    fn on_release(&mut self) -> Result<Option<InteractEvent>> {
        if let Interaction::Dragging { .. } = self.state {
            self.state = Interaction::Idle;
        }
        let active_id = match self.registry.active_id() {
            Some(id) => id,
            None => return Ok(None),
        };
        let found = match self.find_duplicate() {
            Some(d) => d,
            None => return Ok(None),
        };
        let path = self.registry.active_mut().ok_or(PathError::NoActivePath)?;
        match found {
            Duplicate::CloseLoop => {
                path.pop_last()?;
                self.redraw.mark_rebuilt(active_id);
                self.notify(Notice::ClosedPath);
                return Ok(Some(InteractEvent::Close));
            }
            Duplicate::DropAdjacent(j) => {
                path.pop_anchor(j)?;
                self.redraw.mark_rebuilt(active_id);
                self.notify(Notice::MergedAdjacent);
            }
            Duplicate::Join(other_id) => {
                let other = self.registry.get(other_id).cloned().ok_or(PathError::NoActivePath)?;
                let path = self.registry.active_mut().ok_or(PathError::NoActivePath)?;
                if path.merge(other)? {
                    self.registry.remove(other_id);
                    self.registry.activate(active_id);
                    self.redraw.mark_removed(other_id);
                    self.redraw.mark_rebuilt(active_id);
                    self.notify(Notice::JoinedPaths);
                }
            }
            Duplicate::Keep => {}
        }
        Ok(None)
    }

    /// First coincidence found scanning the active path's control elements in order, checking
    /// the active path itself before the others.
    fn find_duplicate(&self) -> Option<Duplicate> {
        let active = self.registry.active()?;
        let anchors = active.anchors();
        let last = active.last_index()?;
        for (i, &anchor) in anchors.iter().enumerate() {
            if active.count_anchor(anchor) > 1 {
                let j = anchors.iter().enumerate().position(|(j, a)| j != i && *a == anchor)?;
                return Some(if i == 0 && j == last {
                    Duplicate::CloseLoop
                } else if j == i + 1 || i == j + 1 {
                    Duplicate::DropAdjacent(j)
                } else {
                    Duplicate::Keep
                });
            }
            for other in self.registry.paths().iter().filter(|p| p.id != active.id) {
                let joinable = other.anchors().iter().enumerate().any(|(j, a)| {
                    *a == anchor && !active.closed && !other.closed && active.is_endpoint(i) && other.is_endpoint(j)
                });
                if joinable {
                    return Some(Duplicate::Join(other.id));
                }
            }
        }
        None
    }

    /// Recompute the fills touching the control element at `index` of path `id`.
    fn update_fills(&mut self, id: PathId, index: usize) -> Result<()> {
        let pairs = match self.registry.get(id) {
            Some(p) => p.adjacent_pairs(index),
            None => return Ok(()),
        };
        for pair in pairs {
            let fill = self.fill_between(pair.from, pair.to);
            if let Some(p) = self.registry.get_mut(id) {
                p.set_fill(pair.slot, fill)?;
            }
            self.redraw.mark_fill(id, pair.slot);
        }
        Ok(())
    }

    fn fill_between(&self, from: Elem, to: Elem) -> Vec<Elem> {
        let mut fill = self.mesh.shortest_path(from, to);
        // neighbours joined by a single edge
        if fill.is_empty() && self.mode == SurfaceMode::Edge {
            fill.extend(self.mesh.edge_between(from, to));
        }
        fill
    }

    fn clear_just_closed(&mut self) {
        if let Interaction::JustClosed { .. } = self.state {
            self.state = Interaction::Idle;
        }
    }

    fn notify(&mut self, notice: Notice) {
        info!("{}", notice.message());
        self.notices.push(notice);
    }

    fn restore_selection(&mut self) {
        self.mesh.set_selected(&self.baseline, true);
    }

    fn restore(&mut self, snapshot: PathRegistry) -> Status {
        self.registry = snapshot;
        self.state = Interaction::Idle;
        self.button_held = false;
        self.redraw.mark_full();
        self.restore_selection();
        if self.registry.is_empty() {
            self.cancel();
            return Status::Cancelled;
        }
        Status::Running
    }

    /// Step back one interaction. With nothing left to undo the session is cancelled.
    pub fn undo(&mut self) -> Status {
        match self.history.undo(self.registry.clone()) {
            Some(prev) => self.restore(prev),
            None => {
                self.cancel();
                Status::Cancelled
            }
        }
    }

    pub fn redo(&mut self) -> Status {
        match self.history.redo(self.registry.clone()) {
            Some(next) => self.restore(next),
            None => Status::Running,
        }
    }

    /// Restore the selection baseline and drop every path without committing.
    pub fn cancel(&mut self) {
        self.restore_selection();
        self.registry.clear();
        self.history.clear();
        self.state = Interaction::Idle;
        self.redraw.mark_full();
        self.phase = Phase::Done;
    }

    /// Flatten all paths for the attribute writer and end the session.
    pub fn finish(&mut self) -> FinalElements {
        let fin = finalize(&self.registry, self.mode, &self.mesh);
        self.phase = Phase::Done;
        self.redraw.mark_full();
        fin
    }

    pub fn final_elements(&self) -> FinalElements {
        finalize(&self.registry, self.mode, &self.mesh)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.registry.active()
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    pub fn baseline(&self) -> &[Elem] {
        &self.baseline
    }

    /// Last element picked, used by the host as the navigation pivot.
    pub fn navigation_element(&self) -> Option<Elem> {
        self.navigation_element
    }

    pub fn undo_len(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.redo_len()
    }

    pub fn take_redraw(&mut self) -> RedrawState {
        std::mem::take(&mut self.redraw)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl<M: MeshTopology + AttributeWriter> Session<M> {
    /// Begin with the press that invoked the tool. A press on empty space ends the session
    /// right away.
    pub fn start(&mut self, pick: Option<Elem>) -> Result<Status> {
        if self.phase != Phase::Ready {
            return Err(PathError::NotRunning);
        }
        match pick {
            None => {
                self.cancel();
                Ok(Status::Cancelled)
            }
            Some(elem) => {
                self.phase = Phase::Running;
                self.handle(Input::Press, Some(elem))
            }
        }
    }

    pub fn handle(&mut self, input: Input, pick: Option<Elem>) -> Result<Status> {
        if self.phase != Phase::Running {
            return Err(PathError::NotRunning);
        }
        let event = match input {
            Input::Press => {
                self.button_held = true;
                Some(InteractEvent::Add)
            }
            Input::PressNew => {
                self.button_held = true;
                Some(InteractEvent::AddNewPath)
            }
            Input::PressRemove => {
                self.button_held = false;
                Some(InteractEvent::Remove)
            }
            Input::Release => {
                self.button_held = false;
                Some(InteractEvent::Release)
            }
            Input::Move if self.button_held => Some(InteractEvent::Drag),
            Input::Move => None,
            Input::Action(Action::Close) => Some(InteractEvent::Close),
            Input::Action(Action::SwitchDirection) => Some(InteractEvent::SwitchDirection),
            Input::Action(Action::Undo) => return Ok(self.undo()),
            Input::Action(Action::Redo) => return Ok(self.redo()),
            Input::Action(Action::Apply) => return Ok(Status::Finished(self.commit())),
            Input::Action(Action::Cancel) => {
                self.cancel();
                return Ok(Status::Cancelled);
            }
        };

        if let Some(event) = event {
            let mutates = match event {
                InteractEvent::Drag | InteractEvent::Release => false,
                e if e.needs_pick() => pick.is_some(),
                _ => !self.registry.is_empty(),
            };
            if mutates {
                self.history.push(self.registry.clone());
            }
            self.dispatch(event, pick)?;
        }

        if self.registry.is_empty() {
            debug!("no paths left, ending session");
            self.cancel();
            return Ok(Status::Cancelled);
        }
        Ok(Status::Running)
    }

    /// Write finalized elements with the configured select/seam/sharp modes.
    pub fn apply(&mut self, fin: &FinalElements) {
        let opts = self.config.markup();
        apply_final(&mut self.mesh, fin, &opts);
    }

    /// `finish` followed by `apply`.
    pub fn commit(&mut self) -> FinalElements {
        let fin = self.finish();
        self.apply(&fin);
        fin
    }
}
