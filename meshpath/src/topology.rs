use crate::model::{Elem, ElemKind, ObjectId, Transform};

/// Queries the path engine makes against the edited mesh.
///
/// Element picking under the cursor stays with the host; the engine only receives the picked
/// handle. All queries are synchronous and the mesh must not change underneath an open session.
pub trait MeshTopology {
    /// Shortest connection between two anchors of the same kind.
    ///
    /// Vertices yield the ordered edges from `from` to `to`. Faces yield the ordered faces
    /// strictly between the two. Empty when no connection exists.
    fn shortest_path(&self, from: Elem, to: Elem) -> Vec<Elem>;

    /// Edge joining two vertices directly, if any.
    fn edge_between(&self, a: Elem, b: Elem) -> Option<Elem>;

    fn edge_verts(&self, edge: Elem) -> Option<[Elem; 2]>;

    fn face_edges(&self, face: Elem) -> Vec<Elem>;

    /// Every element of the same kind reachable from `elem` over the surface.
    fn linked_elements(&self, elem: Elem) -> Vec<Elem>;

    fn selected(&self, kind: ElemKind) -> Vec<Elem>;

    fn set_selected(&mut self, elems: &[Elem], state: bool);

    fn transform(&self, object: ObjectId) -> Transform;
}

/// Bulk attribute writes applied when a session is committed.
pub trait AttributeWriter {
    fn is_selected(&self, elem: Elem) -> bool;
    fn set_select(&mut self, elem: Elem, state: bool);
    fn is_seam(&self, edge: Elem) -> bool;
    fn set_seam(&mut self, edge: Elem, state: bool);
    fn is_smooth(&self, edge: Elem) -> bool;
    fn set_smooth(&mut self, edge: Elem, state: bool);
}
