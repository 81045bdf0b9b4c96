use crate::config::{MarkMode, MarkupOptions, SelectMode};
use crate::finalize::FinalElements;
use crate::topology::AttributeWriter;

/// Write the finalized sets to the mesh. Sharp marking clears the smooth flag.
pub fn apply_final<W: AttributeWriter + ?Sized>(writer: &mut W, fin: &FinalElements, opts: &MarkupOptions) {
    for &elem in &fin.select_only {
        match opts.select {
            SelectMode::None => {}
            SelectMode::Extend => writer.set_select(elem, true),
            SelectMode::Subtract => writer.set_select(elem, false),
            SelectMode::Invert => {
                let s = writer.is_selected(elem);
                writer.set_select(elem, !s);
            }
        }
    }

    for &edge in &fin.markup {
        match opts.seam {
            MarkMode::None => {}
            MarkMode::Mark => writer.set_seam(edge, true),
            MarkMode::Clear => writer.set_seam(edge, false),
            MarkMode::Toggle => {
                let s = writer.is_seam(edge);
                writer.set_seam(edge, !s);
            }
        }
        match opts.sharp {
            MarkMode::None => {}
            MarkMode::Mark => writer.set_smooth(edge, false),
            MarkMode::Clear => writer.set_smooth(edge, true),
            MarkMode::Toggle => {
                let s = writer.is_smooth(edge);
                writer.set_smooth(edge, !s);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshObject, MeshSet};
    use crate::model::Elem;

    fn fixture() -> (MeshSet, FinalElements) {
        let mut set = MeshSet::new();
        set.add_object(MeshObject::grid(2, 1).unwrap());
        let fin = FinalElements {
            select_only: vec![Elem::edge(0, 0), Elem::edge(0, 1)],
            markup: vec![Elem::edge(0, 0), Elem::edge(0, 1)],
        };
        (set, fin)
    }

    #[test]
    fn extend_and_mark() {
        let (mut set, fin) = fixture();
        let opts = MarkupOptions { select: SelectMode::Extend, seam: MarkMode::Mark, sharp: MarkMode::Mark };
        apply_final(&mut set, &fin, &opts);
        assert!(set.is_selected(Elem::edge(0, 0)));
        assert_eq!(set.seams(), fin.markup);
        assert_eq!(set.sharp_edges(), fin.markup);

        let clear = MarkupOptions { select: SelectMode::Subtract, seam: MarkMode::Clear, sharp: MarkMode::Clear };
        apply_final(&mut set, &fin, &clear);
        assert!(!set.is_selected(Elem::edge(0, 0)));
        assert!(set.seams().is_empty());
        assert!(set.sharp_edges().is_empty());
    }

    #[test]
    fn invert_and_toggle() {
        let (mut set, fin) = fixture();
        set.set_select(Elem::edge(0, 0), true);
        set.set_seam(Elem::edge(0, 1), true);
        let opts = MarkupOptions { select: SelectMode::Invert, seam: MarkMode::Toggle, sharp: MarkMode::Toggle };
        apply_final(&mut set, &fin, &opts);
        assert!(!set.is_selected(Elem::edge(0, 0)));
        assert!(set.is_selected(Elem::edge(0, 1)));
        assert_eq!(set.seams(), vec![Elem::edge(0, 0)]);
        assert_eq!(set.sharp_edges().len(), 2);
    }
}
