use crate::model::{IslandId, PathId};
use thiserror::Error;

/// Precondition violations raised by path and session operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    #[error("cannot merge paths on different mesh islands ({0} and {1})")]
    IslandMismatch(IslandId, IslandId),

    #[error("path {0} has no control elements")]
    EmptyPath(PathId),

    #[error("index {index} out of range for path of {len} control elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no active path")]
    NoActivePath,

    #[error("event re-dispatch exceeded {0} steps")]
    RedispatchLimit(usize),

    #[error("session is not running")]
    NotRunning,

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PathError>;
