use serde::{Deserialize, Serialize};

pub type ObjectId = u32;
pub type PathId = u32;
pub type IslandId = u32;

/// Column-major 4x4 object matrix, carried through untouched for the renderer.
pub type Transform = [f32; 16];

pub const IDENTITY: Transform = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElemKind {
    Vert,
    Edge,
    Face,
}

/// Handle to one element of one mesh object. Paths never own mesh data, only these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Elem {
    pub object: ObjectId,
    pub kind: ElemKind,
    pub index: u32,
}

impl Elem {
    pub fn vert(object: ObjectId, index: u32) -> Self {
        Elem { object, kind: ElemKind::Vert, index }
    }
    pub fn edge(object: ObjectId, index: u32) -> Self {
        Elem { object, kind: ElemKind::Edge, index }
    }
    pub fn face(object: ObjectId, index: u32) -> Self {
        Elem { object, kind: ElemKind::Face, index }
    }
}

/// Surface granularity of a session.
///
/// `Edge` paths are anchored on vertices and filled with edges; `Face` paths are anchored on
/// faces and filled with faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceMode {
    Edge,
    Face,
}

impl SurfaceMode {
    pub fn anchor_kind(self) -> ElemKind {
        match self {
            SurfaceMode::Edge => ElemKind::Vert,
            SurfaceMode::Face => ElemKind::Face,
        }
    }

    pub fn fill_kind(self) -> ElemKind {
        match self {
            SurfaceMode::Edge => ElemKind::Edge,
            SurfaceMode::Face => ElemKind::Face,
        }
    }

    /// Kind of element whose selection is restored after every event.
    pub fn select_kind(self) -> ElemKind {
        self.fill_kind()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractEvent {
    Add,
    AddNewPath,
    Remove,
    Drag,
    Close,
    SwitchDirection,
    Release,
}

impl InteractEvent {
    /// Events that do nothing without an element under the cursor.
    pub fn needs_pick(self) -> bool {
        matches!(
            self,
            InteractEvent::Add | InteractEvent::AddNewPath | InteractEvent::Remove | InteractEvent::Drag
        )
    }
}

/// Outcome messages surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    CreatedPath,
    ClosedPath,
    MergedAdjacent,
    JoinedPaths,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::CreatedPath => "Created new path",
            Notice::ClosedPath => "Closed active path",
            Notice::MergedAdjacent => "Merged adjacent control elements",
            Notice::JoinedPaths => "Joined two paths",
        }
    }
}
