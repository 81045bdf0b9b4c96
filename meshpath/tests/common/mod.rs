#![allow(dead_code)]

use meshpath::{Elem, Input, MeshObject, MeshSet, Session, Status, SurfaceMode, ToolConfig};

pub const W: u32 = 4;

/// Vertex `(x, y)` of the `W` x `W` grid in object 0.
pub fn v(x: u32, y: u32) -> Elem {
    Elem::vert(0, y * (W + 1) + x)
}

pub fn grid_mesh() -> MeshSet {
    let mut set = MeshSet::new();
    set.add_object(MeshObject::grid(W, W).unwrap());
    set
}

/// One object made of two loose triangles: verts 0..3 and 3..6.
pub fn two_islands() -> MeshSet {
    let positions = vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [5.0, 0.0, 0.0],
        [6.0, 0.0, 0.0],
        [5.0, 1.0, 0.0],
    ];
    let mut set = MeshSet::new();
    set.add_object(MeshObject::new(positions, vec![vec![0, 1, 2], vec![3, 4, 5]]).unwrap());
    set
}

pub fn session_on(mesh: MeshSet, mode: SurfaceMode) -> Session<MeshSet> {
    Session::new(mesh, mode, ToolConfig::default()).unwrap()
}

/// Start on `first`, then click-release every element of `rest`.
pub fn clicked(mesh: MeshSet, mode: SurfaceMode, first: Elem, rest: &[Elem]) -> Session<MeshSet> {
    let mut s = session_on(mesh, mode);
    assert_eq!(s.start(Some(first)).unwrap(), Status::Running);
    release(&mut s);
    for e in rest {
        click(&mut s, *e);
    }
    s
}

pub fn click(s: &mut Session<MeshSet>, e: Elem) -> Status {
    let st = s.handle(Input::Press, Some(e)).unwrap();
    assert_eq!(st, Status::Running);
    release(s)
}

pub fn release(s: &mut Session<MeshSet>) -> Status {
    s.handle(Input::Release, None).unwrap()
}

/// Press on `from`, drag to `to`, release.
pub fn drag(s: &mut Session<MeshSet>, from: Elem, to: Elem) -> Status {
    s.handle(Input::Press, Some(from)).unwrap();
    s.handle(Input::Move, Some(to)).unwrap();
    release(s)
}

pub fn anchors(s: &Session<MeshSet>) -> Vec<Elem> {
    s.active_path().map(|p| p.anchors().to_vec()).unwrap_or_default()
}
