use crate::model::{Elem, SurfaceMode};
use crate::registry::PathRegistry;
use crate::topology::MeshTopology;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Element sets handed to the attribute writer on commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalElements {
    /// Receives the selection mode
    pub select_only: Vec<Elem>,
    /// Edges receiving seam/sharp marks
    pub markup: Vec<Elem>,
}

fn dedup_in_order(seq: Vec<Elem>) -> Vec<Elem> {
    let mut seen = HashSet::with_capacity(seq.len());
    seq.into_iter().filter(|e| seen.insert(*e)).collect()
}

/// Flatten every path into the two output sets. Face markup is the boundary edges of every
/// selected face.
pub fn finalize<M: MeshTopology + ?Sized>(reg: &PathRegistry, mode: SurfaceMode, mesh: &M) -> FinalElements {
    let mut select_only = Vec::new();
    let mut markup = Vec::new();
    for path in reg.paths() {
        match mode {
            SurfaceMode::Edge => {
                select_only.extend(path.fill_elements());
                markup.extend(path.fill_elements());
            }
            SurfaceMode::Face => {
                select_only.extend(path.fill_elements());
                select_only.extend(path.anchors().iter().copied());
            }
        }
    }
    let select_only = dedup_in_order(select_only);
    if mode == SurfaceMode::Face {
        for face in &select_only {
            markup.extend(mesh.face_edges(*face));
        }
    }
    FinalElements { select_only, markup: dedup_in_order(markup) }
}
