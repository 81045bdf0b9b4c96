mod common;

use common::*;
use meshpath::{finalize, Action, Elem, Input, MeshObject, MeshSet, MeshTopology, PathRegistry, SurfaceMode};
use std::collections::HashSet;

fn no_repeats(elems: &[Elem]) -> bool {
    let set: HashSet<_> = elems.iter().collect();
    set.len() == elems.len()
}

#[test]
fn empty_registry_yields_nothing() {
    let mesh = grid_mesh();
    let fin = finalize(&PathRegistry::new(), SurfaceMode::Edge, &mesh);
    assert!(fin.select_only.is_empty());
    assert!(fin.markup.is_empty());
}

#[test]
fn edge_mode_dedups_overlapping_paths() {
    let mut s = clicked(grid_mesh(), SurfaceMode::Edge, v(0, 0), &[v(4, 0)]);
    s.handle(Input::PressNew, Some(v(1, 0))).unwrap();
    release(&mut s);
    click(&mut s, v(1, 1));
    drag(&mut s, v(1, 1), v(3, 0));
    assert_eq!(s.registry().len(), 2);
    assert_eq!(anchors(&s), vec![v(1, 0), v(3, 0)]);

    let fin = s.final_elements();
    assert_eq!(fin.select_only.len(), 4);
    assert_eq!(fin.select_only, fin.markup);
    assert!(no_repeats(&fin.select_only));
}

#[test]
fn edge_mode_includes_closing_fill() {
    let mut s = clicked(grid_mesh(), SurfaceMode::Edge, v(0, 0), &[v(2, 0), v(2, 2)]);
    s.handle(Input::Action(Action::Close), None).unwrap();
    let fin = s.final_elements();
    let path = s.active_path().unwrap();
    for e in path.fill_elements() {
        assert!(fin.select_only.contains(&e));
    }
    assert!(path.fills()[2].elements.iter().all(|e| fin.markup.contains(e)));
    assert!(no_repeats(&fin.select_only));
}

#[test]
fn face_mode_selects_anchors_and_marks_boundaries() {
    let mut mesh = MeshSet::new();
    mesh.add_object(MeshObject::grid(4, 1).unwrap());
    let s = clicked(mesh, SurfaceMode::Face, Elem::face(0, 0), &[Elem::face(0, 3)]);
    let fin = s.final_elements();

    let faces: HashSet<_> = fin.select_only.iter().copied().collect();
    let expected: HashSet<_> = (0..4).map(|f| Elem::face(0, f)).collect();
    assert_eq!(faces, expected);
    assert_eq!(fin.select_only.len(), 4);

    let mut edges = HashSet::new();
    for f in 0..4 {
        edges.extend(s.mesh().face_edges(Elem::face(0, f)));
    }
    assert_eq!(edges.len(), 13);
    assert_eq!(fin.markup.len(), 13);
    assert_eq!(fin.markup.iter().copied().collect::<HashSet<_>>(), edges);
}

#[test]
fn face_mode_single_anchor_path() {
    let mut mesh = MeshSet::new();
    mesh.add_object(MeshObject::grid(2, 2).unwrap());
    let s = clicked(mesh, SurfaceMode::Face, Elem::face(0, 3), &[]);
    let fin = s.final_elements();
    assert_eq!(fin.select_only, vec![Elem::face(0, 3)]);
    assert_eq!(fin.markup.len(), 4);
}

#[test]
fn commit_in_face_mode_selects_faces() {
    let mut mesh = MeshSet::new();
    mesh.add_object(MeshObject::grid(4, 1).unwrap());
    let mut s = clicked(mesh, SurfaceMode::Face, Elem::face(0, 0), &[Elem::face(0, 2)]);
    let fin = s.commit();
    let mut selected = s.mesh().selected(meshpath::ElemKind::Face);
    selected.sort();
    let mut expected = fin.select_only.clone();
    expected.sort();
    assert_eq!(selected, expected);
    assert!(s.mesh().seams().is_empty());
}
