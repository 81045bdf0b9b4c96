//! Indexed polygon meshes implementing the topology queries, used by the wasm facade and tests.

use crate::error::{PathError, Result};
use crate::model::{Elem, ElemKind, ObjectId, Transform, IDENTITY};
use crate::topology::{AttributeWriter, MeshTopology};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

// Ingestion caps for untrusted JSON
pub const MAX_VERTS: usize = 1_000_000;
pub const MAX_FACES: usize = 1_000_000;
pub const MAX_FACE_SIDES: usize = 1_024;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub positions: Vec<[f32; 3]>,
    pub faces: Vec<Vec<u32>>,
    #[serde(default = "identity")]
    pub transform: Transform,
}

fn identity() -> Transform {
    IDENTITY
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDesc {
    pub objects: Vec<ObjectDesc>,
}

#[derive(Clone, Debug)]
pub struct MeshObject {
    positions: Vec<[f32; 3]>,
    faces: Vec<Vec<u32>>,
    edges: Vec<[u32; 2]>,
    edge_lookup: HashMap<(u32, u32), u32>,
    vert_edges: Vec<Vec<u32>>,
    face_edges: Vec<Vec<u32>>,
    edge_faces: Vec<Vec<u32>>,
    centroids: Vec<[f32; 3]>,
    vert_select: Vec<bool>,
    edge_select: Vec<bool>,
    face_select: Vec<bool>,
    seam: Vec<bool>,
    smooth: Vec<bool>,
    transform: Transform,
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn dist(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

#[derive(Clone, Copy, PartialEq)]
struct Visit {
    cost: f32,
    node: u32,
}

impl Eq for Visit {}

// Reversed for a min-heap; ties settle on the lower index.
impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost).then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl MeshObject {
    pub fn new(positions: Vec<[f32; 3]>, faces: Vec<Vec<u32>>) -> Result<Self> {
        if positions.len() > MAX_VERTS || faces.len() > MAX_FACES {
            return Err(PathError::InvalidMesh("mesh exceeds ingestion limits".into()));
        }
        if positions.iter().flatten().any(|c| !c.is_finite()) {
            return Err(PathError::InvalidMesh("non-finite vertex position".into()));
        }
        let nv = positions.len() as u32;
        let mut edges: Vec<[u32; 2]> = Vec::new();
        let mut edge_lookup: HashMap<(u32, u32), u32> = HashMap::new();
        let mut vert_edges: Vec<Vec<u32>> = vec![Vec::new(); positions.len()];
        let mut face_edges: Vec<Vec<u32>> = Vec::with_capacity(faces.len());
        let mut edge_faces: Vec<Vec<u32>> = Vec::new();
        let mut centroids = Vec::with_capacity(faces.len());

        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 || face.len() > MAX_FACE_SIDES {
                return Err(PathError::InvalidMesh(format!("face {} has {} sides", fi, face.len())));
            }
            if let Some(bad) = face.iter().find(|v| **v >= nv) {
                return Err(PathError::InvalidMesh(format!("face {} references vertex {}", fi, bad)));
            }
            let mut fe = Vec::with_capacity(face.len());
            let mut c = [0.0f32; 3];
            for (k, &a) in face.iter().enumerate() {
                let b = face[(k + 1) % face.len()];
                if a == b {
                    return Err(PathError::InvalidMesh(format!("face {} repeats vertex {}", fi, a)));
                }
                let key = edge_key(a, b);
                let eid = *edge_lookup.entry(key).or_insert_with(|| {
                    let id = edges.len() as u32;
                    edges.push([key.0, key.1]);
                    edge_faces.push(Vec::new());
                    vert_edges[key.0 as usize].push(id);
                    vert_edges[key.1 as usize].push(id);
                    id
                });
                edge_faces[eid as usize].push(fi as u32);
                fe.push(eid);
                let p = positions[a as usize];
                c = [c[0] + p[0], c[1] + p[1], c[2] + p[2]];
            }
            let n = face.len() as f32;
            centroids.push([c[0] / n, c[1] / n, c[2] / n]);
            face_edges.push(fe);
        }

        let (nv, ne, nf) = (positions.len(), edges.len(), faces.len());
        Ok(MeshObject {
            positions,
            faces,
            edges,
            edge_lookup,
            vert_edges,
            face_edges,
            edge_faces,
            centroids,
            vert_select: vec![false; nv],
            edge_select: vec![false; ne],
            face_select: vec![false; nf],
            seam: vec![false; ne],
            smooth: vec![true; ne],
            transform: IDENTITY,
        })
    }

    /// Flat `w` x `h` grid of unit quads in the XY plane.
    /// Vertex `(x, y)` is `y * (w + 1) + x`, face `(x, y)` is `y * w + x`.
    pub fn grid(w: u32, h: u32) -> Result<Self> {
        let mut positions = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
        for y in 0..=h {
            for x in 0..=w {
                positions.push([x as f32, y as f32, 0.0]);
            }
        }
        let mut faces = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let v0 = y * (w + 1) + x;
                faces.push(vec![v0, v0 + 1, v0 + w + 2, v0 + w + 1]);
            }
        }
        MeshObject::new(positions, faces)
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn vert_count(&self) -> usize {
        self.positions.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn edge_index(&self, a: u32, b: u32) -> Option<u32> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    pub fn edge_vert_indices(&self, e: u32) -> Option<[u32; 2]> {
        self.edges.get(e as usize).copied()
    }

    pub fn face_edge_indices(&self, f: u32) -> &[u32] {
        self.face_edges.get(f as usize).map_or(&[], |v| v.as_slice())
    }

    fn contains(&self, kind: ElemKind, index: u32) -> bool {
        let i = index as usize;
        match kind {
            ElemKind::Vert => i < self.positions.len(),
            ElemKind::Edge => i < self.edges.len(),
            ElemKind::Face => i < self.faces.len(),
        }
    }

    // (next node, element crossed, weight)
    fn neighbors(&self, kind: ElemKind, node: u32, out: &mut Vec<(u32, u32, f32)>) {
        out.clear();
        match kind {
            ElemKind::Vert => {
                for &e in &self.vert_edges[node as usize] {
                    let [a, b] = self.edges[e as usize];
                    let other = if a == node { b } else { a };
                    let w = dist(self.positions[node as usize], self.positions[other as usize]);
                    out.push((other, e, w));
                }
            }
            ElemKind::Face => {
                for &e in &self.face_edges[node as usize] {
                    for &g in &self.edge_faces[e as usize] {
                        if g != node {
                            let w = dist(self.centroids[node as usize], self.centroids[g as usize]);
                            out.push((g, e, w));
                        }
                    }
                }
            }
            ElemKind::Edge => {}
        }
    }

    fn node_count(&self, kind: ElemKind) -> usize {
        match kind {
            ElemKind::Vert => self.positions.len(),
            ElemKind::Edge => self.edges.len(),
            ElemKind::Face => self.faces.len(),
        }
    }

    /// Dijkstra from `start` to `goal`; returns `(crossed element, reached node)` steps.
    fn route(&self, kind: ElemKind, start: u32, goal: u32) -> Option<Vec<(u32, u32)>> {
        let n = self.node_count(kind);
        let mut best = vec![f32::INFINITY; n];
        let mut prev: Vec<Option<(u32, u32)>> = vec![None; n];
        let mut heap = BinaryHeap::new();
        let mut scratch = Vec::new();
        best[start as usize] = 0.0;
        heap.push(Visit { cost: 0.0, node: start });
        while let Some(Visit { cost, node }) = heap.pop() {
            if node == goal {
                break;
            }
            if cost > best[node as usize] {
                continue;
            }
            self.neighbors(kind, node, &mut scratch);
            for &(next, via, w) in &scratch {
                let c = cost + w;
                if c < best[next as usize] {
                    best[next as usize] = c;
                    prev[next as usize] = Some((node, via));
                    heap.push(Visit { cost: c, node: next });
                }
            }
        }
        if !best[goal as usize].is_finite() {
            return None;
        }
        let mut steps = Vec::new();
        let mut at = goal;
        while at != start {
            let (from, via) = prev[at as usize]?;
            steps.push((via, at));
            at = from;
        }
        steps.reverse();
        Some(steps)
    }

    fn linked(&self, kind: ElemKind, start: u32) -> Vec<u32> {
        let mut seen = vec![false; self.node_count(kind)];
        let mut queue = VecDeque::new();
        let mut out = Vec::new();
        let mut scratch = Vec::new();
        seen[start as usize] = true;
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            out.push(node);
            self.neighbors(kind, node, &mut scratch);
            for &(next, _, _) in &scratch {
                if !seen[next as usize] {
                    seen[next as usize] = true;
                    queue.push_back(next);
                }
            }
        }
        out
    }

    fn select_flags(&self, kind: ElemKind) -> &[bool] {
        match kind {
            ElemKind::Vert => &self.vert_select,
            ElemKind::Edge => &self.edge_select,
            ElemKind::Face => &self.face_select,
        }
    }

    fn select_flags_mut(&mut self, kind: ElemKind) -> &mut Vec<bool> {
        match kind {
            ElemKind::Vert => &mut self.vert_select,
            ElemKind::Edge => &mut self.edge_select,
            ElemKind::Face => &mut self.face_select,
        }
    }
}

/// Every object in edit mode, addressed by `Elem::object`.
#[derive(Clone, Debug, Default)]
pub struct MeshSet {
    objects: Vec<MeshObject>,
}

impl MeshSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: MeshObject) -> ObjectId {
        self.objects.push(object);
        (self.objects.len() - 1) as ObjectId
    }

    pub fn object(&self, id: ObjectId) -> Option<&MeshObject> {
        self.objects.get(id as usize)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn from_desc(desc: SceneDesc) -> Result<Self> {
        let mut set = MeshSet::new();
        for o in desc.objects {
            let obj = MeshObject::new(o.positions, o.faces)?.with_transform(o.transform);
            set.add_object(obj);
        }
        Ok(set)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let desc: SceneDesc = serde_json::from_str(s).map_err(|e| PathError::InvalidMesh(e.to_string()))?;
        Self::from_desc(desc)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Self> {
        let desc: SceneDesc = serde_json::from_value(v).map_err(|e| PathError::InvalidMesh(e.to_string()))?;
        Self::from_desc(desc)
    }

    /// Whether `elem` addresses an existing element.
    pub fn contains(&self, elem: Elem) -> bool {
        self.object(elem.object).map_or(false, |o| o.contains(elem.kind, elem.index))
    }

    fn resolve(&self, elem: Elem) -> Option<&MeshObject> {
        self.object(elem.object).filter(|o| o.contains(elem.kind, elem.index))
    }

    pub fn deselect_all(&mut self) {
        for o in &mut self.objects {
            for flags in [&mut o.vert_select, &mut o.edge_select, &mut o.face_select] {
                flags.iter_mut().for_each(|f| *f = false);
            }
        }
    }

    pub fn seams(&self) -> Vec<Elem> {
        self.edge_flagged(|o, e| o.seam[e])
    }

    /// Edges marked sharp (not smooth).
    pub fn sharp_edges(&self) -> Vec<Elem> {
        self.edge_flagged(|o, e| !o.smooth[e])
    }

    fn edge_flagged(&self, pred: impl Fn(&MeshObject, usize) -> bool) -> Vec<Elem> {
        let mut out = Vec::new();
        for (oi, o) in self.objects.iter().enumerate() {
            for e in 0..o.edges.len() {
                if pred(o, e) {
                    out.push(Elem::edge(oi as ObjectId, e as u32));
                }
            }
        }
        out
    }

    fn edge_flag_mut(&mut self, edge: Elem, pick: fn(&mut MeshObject) -> &mut Vec<bool>) -> Option<&mut bool> {
        if edge.kind != ElemKind::Edge {
            return None;
        }
        let o = self.objects.get_mut(edge.object as usize)?;
        pick(o).get_mut(edge.index as usize)
    }
}

impl MeshTopology for MeshSet {
    fn shortest_path(&self, from: Elem, to: Elem) -> Vec<Elem> {
        if from.object != to.object || from.kind != to.kind || from == to {
            return Vec::new();
        }
        let o = match (self.resolve(from), self.resolve(to)) {
            (Some(o), Some(_)) => o,
            _ => return Vec::new(),
        };
        let steps = match o.route(from.kind, from.index, to.index) {
            Some(s) => s,
            None => return Vec::new(),
        };
        match from.kind {
            ElemKind::Vert => steps.into_iter().map(|(via, _)| Elem::edge(from.object, via)).collect(),
            ElemKind::Face => steps
                .into_iter()
                .filter(|(_, node)| *node != to.index)
                .map(|(_, node)| Elem::face(from.object, node))
                .collect(),
            ElemKind::Edge => Vec::new(),
        }
    }

    fn edge_between(&self, a: Elem, b: Elem) -> Option<Elem> {
        if a.kind != ElemKind::Vert || b.kind != ElemKind::Vert || a.object != b.object {
            return None;
        }
        let o = self.resolve(a)?;
        o.edge_index(a.index, b.index).map(|e| Elem::edge(a.object, e))
    }

    fn edge_verts(&self, edge: Elem) -> Option<[Elem; 2]> {
        if edge.kind != ElemKind::Edge {
            return None;
        }
        let [a, b] = self.resolve(edge)?.edge_vert_indices(edge.index)?;
        Some([Elem::vert(edge.object, a), Elem::vert(edge.object, b)])
    }

    fn face_edges(&self, face: Elem) -> Vec<Elem> {
        if face.kind != ElemKind::Face {
            return Vec::new();
        }
        match self.resolve(face) {
            Some(o) => o.face_edge_indices(face.index).iter().map(|e| Elem::edge(face.object, *e)).collect(),
            None => Vec::new(),
        }
    }

    fn linked_elements(&self, elem: Elem) -> Vec<Elem> {
        match self.resolve(elem) {
            Some(o) if elem.kind != ElemKind::Edge => o
                .linked(elem.kind, elem.index)
                .into_iter()
                .map(|i| Elem { object: elem.object, kind: elem.kind, index: i })
                .collect(),
            Some(_) => vec![elem],
            None => Vec::new(),
        }
    }

    fn selected(&self, kind: ElemKind) -> Vec<Elem> {
        let mut out = Vec::new();
        for (oi, o) in self.objects.iter().enumerate() {
            for (i, s) in o.select_flags(kind).iter().enumerate() {
                if *s {
                    out.push(Elem { object: oi as ObjectId, kind, index: i as u32 });
                }
            }
        }
        out
    }

    fn set_selected(&mut self, elems: &[Elem], state: bool) {
        for e in elems {
            self.set_select(*e, state);
        }
    }

    fn transform(&self, object: ObjectId) -> Transform {
        self.object(object).map_or(IDENTITY, |o| o.transform)
    }
}

impl AttributeWriter for MeshSet {
    fn is_selected(&self, elem: Elem) -> bool {
        self.resolve(elem).map_or(false, |o| o.select_flags(elem.kind)[elem.index as usize])
    }

    fn set_select(&mut self, elem: Elem, state: bool) {
        if let Some(o) = self.objects.get_mut(elem.object as usize) {
            if let Some(f) = o.select_flags_mut(elem.kind).get_mut(elem.index as usize) {
                *f = state;
            }
        }
    }

    fn is_seam(&self, edge: Elem) -> bool {
        edge.kind == ElemKind::Edge && self.resolve(edge).map_or(false, |o| o.seam[edge.index as usize])
    }

    fn set_seam(&mut self, edge: Elem, state: bool) {
        if let Some(f) = self.edge_flag_mut(edge, |o| &mut o.seam) {
            *f = state;
        }
    }

    fn is_smooth(&self, edge: Elem) -> bool {
        edge.kind == ElemKind::Edge && self.resolve(edge).map_or(true, |o| o.smooth[edge.index as usize])
    }

    fn set_smooth(&mut self, edge: Elem, state: bool) {
        if let Some(f) = self.edge_flag_mut(edge, |o| &mut o.smooth) {
            *f = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_set(w: u32, h: u32) -> MeshSet {
        let mut set = MeshSet::new();
        set.add_object(MeshObject::grid(w, h).unwrap());
        set
    }

    #[test]
    fn grid_counts() {
        let g = MeshObject::grid(3, 2).unwrap();
        assert_eq!(g.vert_count(), 12);
        assert_eq!(g.face_count(), 6);
        // 3*3 horizontal + 4*2 vertical
        assert_eq!(g.edge_count(), 17);
    }

    #[test]
    fn straight_vertex_path() {
        let set = grid_set(4, 1);
        let path = set.shortest_path(Elem::vert(0, 0), Elem::vert(0, 3));
        assert_eq!(path.len(), 3);
        let o = set.object(0).unwrap();
        assert_eq!(path[0], Elem::edge(0, o.edge_index(0, 1).unwrap()));
        assert_eq!(path[2], Elem::edge(0, o.edge_index(2, 3).unwrap()));
    }

    #[test]
    fn face_path_excludes_endpoints() {
        let set = grid_set(4, 1);
        let path = set.shortest_path(Elem::face(0, 0), Elem::face(0, 3));
        assert_eq!(path, vec![Elem::face(0, 1), Elem::face(0, 2)]);
        assert!(set.shortest_path(Elem::face(0, 0), Elem::face(0, 1)).is_empty());
    }

    #[test]
    fn disconnected_objects_have_no_path() {
        let mut set = grid_set(1, 1);
        set.add_object(MeshObject::grid(1, 1).unwrap());
        assert!(set.shortest_path(Elem::vert(0, 0), Elem::vert(1, 3)).is_empty());
    }

    #[test]
    fn loose_parts_form_separate_islands() {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [5.0, 0.0, 0.0],
            [6.0, 0.0, 0.0],
            [5.0, 1.0, 0.0],
        ];
        let obj = MeshObject::new(positions, vec![vec![0, 1, 2], vec![3, 4, 5]]).unwrap();
        let mut set = MeshSet::new();
        set.add_object(obj);
        let island = set.linked_elements(Elem::vert(0, 0));
        assert_eq!(island.len(), 3);
        assert!(!island.contains(&Elem::vert(0, 3)));
        assert!(set.shortest_path(Elem::vert(0, 0), Elem::vert(0, 4)).is_empty());
        assert_eq!(set.linked_elements(Elem::face(0, 1)), vec![Elem::face(0, 1)]);
    }

    #[test]
    fn invalid_faces_are_rejected() {
        let pos = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert!(MeshObject::new(pos.clone(), vec![vec![0, 1]]).is_err());
        assert!(MeshObject::new(pos.clone(), vec![vec![0, 1, 7]]).is_err());
        assert!(MeshObject::new(pos, vec![vec![0, 1, 1]]).is_err());
    }

    #[test]
    fn json_scene() {
        let set = MeshSet::from_json_str(
            r#"{"objects":[{"positions":[[0,0,0],[1,0,0],[1,1,0],[0,1,0]],"faces":[[0,1,2,3]]}]}"#,
        )
        .unwrap();
        assert_eq!(set.object_count(), 1);
        assert_eq!(set.face_edges(Elem::face(0, 0)).len(), 4);
        assert_eq!(set.transform(0), IDENTITY);
        assert!(MeshSet::from_json_str(r#"{"objects":[{"positions":[],"faces":[[0,1,2]]}]}"#).is_err());
    }

    #[test]
    fn selection_and_marks() {
        let mut set = grid_set(1, 1);
        set.set_selected(&[Elem::edge(0, 0), Elem::edge(0, 2)], true);
        assert_eq!(set.selected(ElemKind::Edge), vec![Elem::edge(0, 0), Elem::edge(0, 2)]);
        set.deselect_all();
        assert!(set.selected(ElemKind::Edge).is_empty());
        set.set_seam(Elem::edge(0, 1), true);
        set.set_smooth(Elem::edge(0, 3), false);
        assert_eq!(set.seams(), vec![Elem::edge(0, 1)]);
        assert_eq!(set.sharp_edges(), vec![Elem::edge(0, 3)]);
        // non-edge handles are ignored
        set.set_seam(Elem::face(0, 0), true);
        assert_eq!(set.seams().len(), 1);
    }
}
