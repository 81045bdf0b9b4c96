use meshpath::{
    Action, Elem, Input, MeshObject, MeshSet, MeshTopology, Path, Session, Status, SurfaceMode,
    ToolConfig,
};
use std::collections::HashMap;
use proptest::prelude::*;

const VERTS: u32 = 16;

#[derive(Clone, Debug)]
enum Op {
    Press(Option<(u8, u8)>),
    PressNew(Option<(u8, u8)>),
    PressRemove(Option<(u8, u8)>),
    Move(Option<(u8, u8)>),
    Release,
    Close,
    SwitchDirection,
    Undo,
    Redo,
}

fn pick_strategy() -> impl Strategy<Value = Option<(u8, u8)>> {
    prop::option::weighted(0.9, (0u8..2, 0u8..VERTS as u8))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => pick_strategy().prop_map(Op::Press),
        1 => pick_strategy().prop_map(Op::PressNew),
        1 => pick_strategy().prop_map(Op::PressRemove),
        3 => pick_strategy().prop_map(Op::Move),
        4 => Just(Op::Release),
        1 => Just(Op::Close),
        1 => Just(Op::SwitchDirection),
        1 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}

fn to_elem(pick: Option<(u8, u8)>) -> Option<Elem> {
    pick.map(|(o, i)| Elem::vert(o as u32, i as u32))
}

fn to_input(op: &Op) -> (Input, Option<Elem>) {
    match *op {
        Op::Press(p) => (Input::Press, to_elem(p)),
        Op::PressNew(p) => (Input::PressNew, to_elem(p)),
        Op::PressRemove(p) => (Input::PressRemove, to_elem(p)),
        Op::Move(p) => (Input::Move, to_elem(p)),
        Op::Release => (Input::Release, None),
        Op::Close => (Input::Action(Action::Close), None),
        Op::SwitchDirection => (Input::Action(Action::SwitchDirection), None),
        Op::Undo => (Input::Action(Action::Undo), None),
        Op::Redo => (Input::Action(Action::Redo), None),
    }
}

fn two_grids() -> MeshSet {
    let mut set = MeshSet::new();
    set.add_object(MeshObject::grid(3, 3).unwrap());
    set.add_object(MeshObject::grid(3, 3).unwrap());
    set
}

fn assert_invariants(s: &Session<MeshSet>) {
    let reg = s.registry();
    assert!(reg.active().is_some(), "running session without an active path");
    for path in reg.paths() {
        assert!(!path.is_empty(), "path {} is empty", path.id);
        assert_eq!(path.fills().len(), path.anchors().len(), "path {} slot mismatch", path.id);
        assert!(
            path.anchors().iter().all(|a| a.object == path.object),
            "path {} spans objects",
            path.id
        );
        if !path.closed {
            assert!(path.fills().last().map_or(true, |f| f.is_empty()), "open path {} has a closing fill", path.id);
        }
        assert_fill_routes(path, s.mesh());
    }
}

/// Every segment fill is an edge route from one of its anchors to the other. The closing slot
/// is only used by closed paths with more than two anchors.
fn assert_fill_routes(path: &Path, mesh: &MeshSet) {
    let a = path.anchors();
    let n = a.len();
    for (k, fill) in path.fills().iter().enumerate() {
        let closing = k == n - 1;
        let (from, to) = if closing { (a[n - 1], a[0]) } else { (a[k], a[k + 1]) };
        if closing && (!path.closed || n <= 2) {
            assert!(fill.is_empty(), "path {} has a stray closing fill", path.id);
            continue;
        }
        if from == to {
            assert!(fill.is_empty(), "path {} slot {} fills a zero-length segment", path.id, k);
            continue;
        }
        assert!(!fill.is_empty(), "path {} slot {} is unfilled", path.id, k);
        let mut degree: HashMap<Elem, usize> = HashMap::new();
        for e in &fill.elements {
            let ends = mesh.edge_verts(*e).expect("fill holds edges");
            for end in ends {
                *degree.entry(end).or_default() += 1;
            }
        }
        for (vert, d) in &degree {
            let want = if *vert == from || *vert == to { 1 } else { 2 };
            assert_eq!(*d, want, "path {} slot {} is not a route at {:?}", path.id, k, vert);
        }
        assert!(degree.contains_key(&from) && degree.contains_key(&to), "path {} slot {} misses an anchor", path.id, k);
    }
}

fn sequence_strategy() -> impl Strategy<Value = (u8, Vec<Op>)> {
    (0u8..VERTS as u8, prop::collection::vec(op_strategy(), 1..40))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, .. ProptestConfig::default() })]
    #[test]
    fn session_edit_invariants((first, seq) in sequence_strategy()) {
        let mut s = Session::new(two_grids(), SurfaceMode::Edge, ToolConfig::default()).unwrap();
        let st = s.start(Some(Elem::vert(0, first as u32))).unwrap();
        prop_assert_eq!(st, Status::Running);
        for op in seq {
            let (input, pick) = to_input(&op);
            match s.handle(input, pick).unwrap() {
                Status::Running => assert_invariants(&s),
                _ => break,
            }
        }
    }
}
