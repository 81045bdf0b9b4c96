//! Ordered chain of control elements with interleaved fill slots.
//!
//! ```text
//!  [0]        [1]        [2]             [n]
//!   |  \       |  \       |  \            |  \
//!  ce_0 fill_0 ce_1 fill_1 ce_2 fill_2 .. ce_n fill_close
//! ```
//!
//! `fills[i]` joins `anchors[i]` to `anchors[i + 1]`; the trailing slot joins the last anchor back
//! to the first and is only populated while the path is closed.

use crate::error::{PathError, Result};
use crate::model::{Elem, ElemKind, IslandId, ObjectId, PathId, Transform};
use crate::topology::MeshTopology;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub elements: Vec<Elem>,
    /// Bumped whenever the elements are recomputed; render batches key off it.
    pub revision: u32,
}

impl Fill {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Two anchors whose connecting fill must be recomputed, and the slot it lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnchorPair {
    pub from: Elem,
    pub to: Elem,
    pub slot: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub id: PathId,
    pub island: IslandId,
    pub object: ObjectId,
    pub transform: Transform,
    pub closed: bool,
    pub direction: bool,
    pub(crate) anchors: Vec<Elem>,
    pub(crate) fills: Vec<Fill>,
    pub(crate) control_revision: u32,
}

impl Path {
    /// A new open path holding a single control element and its placeholder fill.
    pub fn new(id: PathId, anchor: Elem, island: IslandId, object: ObjectId, transform: Transform) -> Self {
        Path {
            id,
            island,
            object,
            transform,
            closed: false,
            direction: true,
            anchors: vec![anchor],
            fills: vec![Fill::default()],
            control_revision: 0,
        }
    }

    pub fn anchors(&self) -> &[Elem] {
        &self.anchors
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    pub fn fill(&self, slot: usize) -> Option<&Fill> {
        self.fills.get(slot)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn first(&self) -> Option<Elem> {
        self.anchors.first().copied()
    }

    pub fn last(&self) -> Option<Elem> {
        self.anchors.last().copied()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.anchors.len().checked_sub(1)
    }

    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || Some(index) == self.last_index()
    }

    pub fn closing_slot(&self) -> Option<usize> {
        self.fills.len().checked_sub(1)
    }

    pub fn control_revision(&self) -> u32 {
        self.control_revision
    }

    pub(crate) fn touch_controls(&mut self) {
        self.control_revision = self.control_revision.wrapping_add(1);
    }

    /// Insert a control element and an empty fill slot at `index`.
    pub fn insert_anchor(&mut self, index: usize, anchor: Elem) -> Result<()> {
        if index > self.anchors.len() {
            return Err(PathError::IndexOutOfRange { index, len: self.anchors.len() });
        }
        self.anchors.insert(index, anchor);
        self.fills.insert(index, Fill::default());
        self.touch_controls();
        Ok(())
    }

    /// Remove the control element at `index` together with the fill slot leading into it.
    /// A closed path left with two or fewer control elements loses its closing fill.
    pub fn pop_anchor(&mut self, index: usize) -> Result<Elem> {
        if self.anchors.is_empty() {
            return Err(PathError::EmptyPath(self.id));
        }
        if index >= self.anchors.len() {
            return Err(PathError::IndexOutOfRange { index, len: self.anchors.len() });
        }
        let elem = self.anchors.remove(index);
        self.fills.remove(index.saturating_sub(1));
        if self.closed && self.anchors.len() <= 2 {
            self.clear_closing_fill();
        }
        self.touch_controls();
        Ok(elem)
    }

    pub fn pop_last(&mut self) -> Result<Elem> {
        let index = self.last_index().ok_or(PathError::EmptyPath(self.id))?;
        self.pop_anchor(index)
    }

    /// Swap the control element at `index`, returning the previous one.
    pub fn replace_anchor(&mut self, index: usize, anchor: Elem) -> Result<Elem> {
        let len = self.anchors.len();
        let slot = self.anchors.get_mut(index).ok_or(PathError::IndexOutOfRange { index, len })?;
        let prev = std::mem::replace(slot, anchor);
        self.touch_controls();
        Ok(prev)
    }

    /// Reverse control element order. The closing slot stays last.
    pub fn reverse(&mut self) -> &mut Self {
        self.anchors.reverse();
        let closing = self.fills.pop();
        self.fills.reverse();
        if let Some(closing) = closing {
            self.fills.push(closing);
        }
        self.direction = !self.direction;
        self.touch_controls();
        self
    }

    /// Splice `other` onto this path at the first coinciding endpoint pair, checked as
    /// last-first, first-last, first-first, last-last. Only one junction is resolved per call.
    /// Returns whether a junction was found.
    pub fn merge(&mut self, mut other: Path) -> Result<bool> {
        if self.island != other.island {
            return Err(PathError::IslandMismatch(self.island, other.island));
        }
        let (first, last) = match (self.first(), self.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(PathError::EmptyPath(self.id)),
        };
        let (other_first, other_last) = match (other.first(), other.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(PathError::EmptyPath(other.id)),
        };

        if last == other_first {
            self.append_path(other);
        } else if first == other_last {
            self.prepend_path(other);
        } else if first == other_first {
            other.reverse();
            self.prepend_path(other);
        } else if last == other_last {
            other.reverse();
            self.append_path(other);
        } else {
            return Ok(false);
        }
        self.touch_controls();
        Ok(true)
    }

    // self.last == other.first
    fn append_path(&mut self, mut other: Path) {
        self.anchors.pop();
        self.fills.pop();
        self.anchors.append(&mut other.anchors);
        self.fills.append(&mut other.fills);
    }

    // self.first == other.last
    fn prepend_path(&mut self, mut other: Path) {
        self.anchors.remove(0);
        other.fills.pop();
        other.anchors.append(&mut self.anchors);
        other.fills.append(&mut self.fills);
        self.anchors = other.anchors;
        self.fills = other.fills;
    }

    pub fn locate_anchor(&self, anchor: Elem) -> Option<usize> {
        self.anchors.iter().position(|a| *a == anchor)
    }

    pub fn count_anchor(&self, anchor: Elem) -> usize {
        self.anchors.iter().filter(|a| **a == anchor).count()
    }

    /// Slot of the first fill passing through `anchor`. Vertices match any incident fill edge.
    pub fn locate_segment<M: MeshTopology + ?Sized>(&self, anchor: Elem, mesh: &M) -> Option<usize> {
        self.fills.iter().position(|fill| match anchor.kind {
            ElemKind::Vert => fill
                .elements
                .iter()
                .any(|e| mesh.edge_verts(*e).map_or(false, |vs| vs.contains(&anchor))),
            ElemKind::Edge | ElemKind::Face => fill.elements.contains(&anchor),
        })
    }

    /// Fills touching the control element at `index` (clamped to the last one).
    pub fn adjacent_pairs(&self, index: usize) -> Vec<AnchorPair> {
        let n = self.anchors.len();
        if n < 2 {
            return Vec::new();
        }
        let i = index.min(n - 1);
        let a = &self.anchors;
        let mut pairs = Vec::with_capacity(2);
        if i == 0 {
            pairs.push(AnchorPair { from: a[0], to: a[1], slot: 0 });
        } else if i == n - 1 {
            pairs.push(AnchorPair { from: a[i - 1], to: a[i], slot: i - 1 });
        } else {
            pairs.push(AnchorPair { from: a[i - 1], to: a[i], slot: i - 1 });
            pairs.push(AnchorPair { from: a[i], to: a[i + 1], slot: i });
        }
        if self.closed && n > 2 && (i == 0 || i == n - 1) {
            pairs.push(AnchorPair { from: a[n - 1], to: a[0], slot: n - 1 });
        }
        pairs
    }

    pub fn set_fill(&mut self, slot: usize, elements: Vec<Elem>) -> Result<()> {
        let len = self.fills.len();
        let fill = self.fills.get_mut(slot).ok_or(PathError::IndexOutOfRange { index: slot, len })?;
        fill.elements = elements;
        fill.revision = fill.revision.wrapping_add(1);
        Ok(())
    }

    pub fn clear_closing_fill(&mut self) {
        if let Some(slot) = self.closing_slot() {
            let fill = &mut self.fills[slot];
            fill.elements.clear();
            fill.revision = fill.revision.wrapping_add(1);
        }
    }

    /// Every fill element, in slot order.
    pub fn fill_elements(&self) -> impl Iterator<Item = Elem> + '_ {
        self.fills.iter().flat_map(|f| f.elements.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IDENTITY;

    fn v(i: u32) -> Elem {
        Elem::vert(0, i)
    }

    fn path_of(id: PathId, ids: &[u32]) -> Path {
        let mut p = Path::new(id, v(ids[0]), 0, 0, IDENTITY);
        for (k, i) in ids.iter().enumerate().skip(1) {
            p.insert_anchor(k, v(*i)).unwrap();
        }
        p
    }

    fn ids(p: &Path) -> Vec<u32> {
        p.anchors().iter().map(|a| a.index).collect()
    }

    #[test]
    fn insert_keeps_fills_aligned() {
        let mut p = path_of(1, &[0]);
        assert_eq!(p.fills().len(), 1);
        p.insert_anchor(1, v(5)).unwrap();
        p.insert_anchor(1, v(3)).unwrap();
        assert_eq!(ids(&p), vec![0, 3, 5]);
        assert_eq!(p.fills().len(), 3);
        assert!(p.insert_anchor(9, v(7)).is_err());
    }

    #[test]
    fn pop_removes_leading_slot() {
        let mut p = path_of(1, &[0, 1, 2]);
        p.set_fill(0, vec![Elem::edge(0, 10)]).unwrap();
        p.set_fill(1, vec![Elem::edge(0, 11)]).unwrap();
        let e = p.pop_anchor(1).unwrap();
        assert_eq!(e, v(1));
        assert_eq!(ids(&p), vec![0, 2]);
        // slot 0 (0->1) is gone, old slot 1 now sits at 0
        assert_eq!(p.fills()[0].elements, vec![Elem::edge(0, 11)]);
        assert_eq!(p.fills().len(), 2);

        let e0 = p.pop_anchor(0).unwrap();
        assert_eq!(e0, v(0));
        assert_eq!(p.fills().len(), 1);
        p.pop_anchor(0).unwrap();
        assert!(p.is_empty());
        assert_eq!(p.pop_anchor(0), Err(PathError::EmptyPath(1)));
    }

    #[test]
    fn closed_path_popped_to_two_drops_closing_fill() {
        let mut p = path_of(1, &[0, 1, 2]);
        p.closed = true;
        p.set_fill(0, vec![Elem::edge(0, 10)]).unwrap();
        p.set_fill(1, vec![Elem::edge(0, 11)]).unwrap();
        p.set_fill(2, vec![Elem::edge(0, 12)]).unwrap();
        let rev = p.control_revision();
        p.pop_anchor(0).unwrap();
        assert_eq!(ids(&p), vec![1, 2]);
        assert_eq!(p.fills()[0].elements, vec![Elem::edge(0, 11)]);
        assert!(p.fills()[1].is_empty());
        assert_ne!(p.control_revision(), rev);
    }

    #[test]
    fn reverse_keeps_closing_slot_last() {
        let mut p = path_of(1, &[0, 1, 2]);
        p.set_fill(0, vec![Elem::edge(0, 10)]).unwrap();
        p.set_fill(1, vec![Elem::edge(0, 11)]).unwrap();
        p.set_fill(2, vec![Elem::edge(0, 12)]).unwrap();
        p.reverse();
        assert_eq!(ids(&p), vec![2, 1, 0]);
        assert_eq!(p.fills()[0].elements, vec![Elem::edge(0, 11)]);
        assert_eq!(p.fills()[1].elements, vec![Elem::edge(0, 10)]);
        assert_eq!(p.fills()[2].elements, vec![Elem::edge(0, 12)]);
        assert!(!p.direction);
    }

    #[test]
    fn reverse_twice_is_identity() {
        let mut p = path_of(1, &[4, 2, 9, 7]);
        let before = p.clone();
        p.reverse().reverse();
        assert_eq!(p.anchors(), before.anchors());
        assert_eq!(p.fills(), before.fills());
        assert_eq!(p.direction, before.direction);
    }

    #[test]
    fn merge_end_first() {
        let mut a = path_of(1, &[0, 1, 2]);
        let b = path_of(2, &[2, 3, 4]);
        assert!(a.merge(b).unwrap());
        assert_eq!(ids(&a), vec![0, 1, 2, 3, 4]);
        assert_eq!(a.fills().len(), 5);
        assert_eq!(a.id, 1);
    }

    #[test]
    fn merge_first_end() {
        let mut a = path_of(1, &[2, 3, 4]);
        let b = path_of(2, &[0, 1, 2]);
        assert!(a.merge(b).unwrap());
        assert_eq!(ids(&a), vec![0, 1, 2, 3, 4]);
        assert_eq!(a.fills().len(), 5);
    }

    #[test]
    fn merge_first_first_and_end_end() {
        let mut a = path_of(1, &[2, 3, 4]);
        let b = path_of(2, &[2, 1, 0]);
        assert!(a.merge(b).unwrap());
        assert_eq!(ids(&a), vec![0, 1, 2, 3, 4]);
        assert_eq!(a.fills().len(), 5);

        let mut c = path_of(3, &[0, 1, 2]);
        let d = path_of(4, &[4, 3, 2]);
        assert!(c.merge(d).unwrap());
        assert_eq!(ids(&c), vec![0, 1, 2, 3, 4]);
        assert_eq!(c.fills().len(), 5);
    }

    #[test]
    fn merge_without_junction_is_noop() {
        let mut a = path_of(1, &[0, 1]);
        let b = path_of(2, &[5, 6]);
        assert!(!a.merge(b).unwrap());
        assert_eq!(ids(&a), vec![0, 1]);
    }

    #[test]
    fn merge_across_islands_fails() {
        let mut a = path_of(1, &[0, 1]);
        let mut b = path_of(2, &[1, 2]);
        b.island = 7;
        assert_eq!(a.merge(b), Err(PathError::IslandMismatch(0, 7)));
    }

    #[test]
    fn adjacent_pairs_by_position() {
        let mut p = path_of(1, &[0, 1, 2, 3]);
        assert_eq!(p.adjacent_pairs(0), vec![AnchorPair { from: v(0), to: v(1), slot: 0 }]);
        assert_eq!(p.adjacent_pairs(3), vec![AnchorPair { from: v(2), to: v(3), slot: 2 }]);
        assert_eq!(p.adjacent_pairs(9), p.adjacent_pairs(3));
        assert_eq!(
            p.adjacent_pairs(1),
            vec![
                AnchorPair { from: v(0), to: v(1), slot: 0 },
                AnchorPair { from: v(1), to: v(2), slot: 1 },
            ]
        );
        p.closed = true;
        assert_eq!(p.adjacent_pairs(0).len(), 2);
        assert_eq!(p.adjacent_pairs(0)[1], AnchorPair { from: v(3), to: v(0), slot: 3 });
        assert_eq!(p.adjacent_pairs(1).len(), 2);
        assert!(path_of(2, &[0]).adjacent_pairs(0).is_empty());
    }

    #[test]
    fn closed_pair_needs_three_anchors() {
        let mut p = path_of(1, &[0, 1]);
        p.closed = true;
        assert_eq!(p.adjacent_pairs(0).len(), 1);
    }
}
