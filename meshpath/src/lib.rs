//! Interactive shortest-path tracing over polygon mesh surfaces.
//!
//! A [`Session`] turns a stream of classified pointer/keyboard input into edits of one or more
//! [`Path`]s. Each path is a chain of control elements (vertices or faces) whose consecutive pairs
//! are joined by shortest paths queried from a [`MeshTopology`] provider. Committing flattens the
//! paths into the element sets an [`AttributeWriter`] uses for selection, seams and sharp edges.

pub mod apply;
pub mod config;
pub mod error;
pub mod finalize;
pub mod history;
pub mod mesh;
pub mod model;
pub mod path;
pub mod redraw;
pub mod registry;
pub mod session;
pub mod topology;

pub use config::{MarkMode, MarkupOptions, SelectMode, ToolConfig};
pub use error::{PathError, Result};
pub use finalize::{finalize, FinalElements};
pub use mesh::{MeshObject, MeshSet};
pub use model::{Elem, ElemKind, InteractEvent, Notice, PathId, SurfaceMode};
pub use path::{AnchorPair, Fill, Path};
pub use redraw::RedrawState;
pub use registry::PathRegistry;
pub use session::{Action, Input, Interaction, Session, Status};
pub use topology::{AttributeWriter, MeshTopology};
