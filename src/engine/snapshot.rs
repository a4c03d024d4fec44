use glam::DVec3;
use serde::Serialize;

use crate::annotations::AnnotationSnapshot;
use crate::mesh::Mesh;

/// A node marker (selection or fixed-node glyph).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeMarker {
    /// Node index.
    pub index: usize,
    /// Node coordinates.
    pub position: DVec3,
}

/// A force arrow: anchor, unit direction and magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForceMarker {
    /// Node index.
    pub index: usize,
    /// Node coordinates (arrow anchor).
    pub position: DVec3,
    /// Unit direction of the force.
    pub direction: DVec3,
    /// Force magnitude.
    pub magnitude: f64,
}

/// Everything a renderer needs to redraw the annotation overlay.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderSnapshot {
    /// Whether pick events should be forwarded.
    pub picking_enabled: bool,
    /// Active selection, if any.
    pub selection: Option<NodeMarker>,
    /// Fixed nodes, ascending by index.
    pub fixed: Vec<NodeMarker>,
    /// Applied forces, ascending by index.
    pub forces: Vec<ForceMarker>,
}

impl RenderSnapshot {
    /// Resolve indices in `annotations` and `selection` to coordinates on
    /// `mesh`.
    pub(crate) fn build(
        mesh: Option<&Mesh>,
        annotations: &AnnotationSnapshot,
        selection: Option<usize>,
        picking_enabled: bool,
    ) -> Self {
        let Some(mesh) = mesh else {
            return Self::default();
        };

        let marker = |index: usize| {
            mesh.point(index).map(|position| NodeMarker { index, position })
        };

        Self {
            picking_enabled,
            selection: selection.and_then(marker),
            fixed: annotations.fixed.iter().filter_map(|&i| marker(i)).collect(),
            forces: annotations
                .forces
                .iter()
                .filter_map(|&(index, force)| {
                    let position = mesh.point(index)?;
                    Some(ForceMarker {
                        index,
                        position,
                        direction: force.normalize_or_zero(),
                        magnitude: force.length(),
                    })
                })
                .collect(),
        }
    }
}
