//! Read-only mesh data consumed by the annotation engine.
//!
//! A [`Mesh`] is an ordered point set with optional connectivity. Point
//! indices are the node identities used everywhere else in the crate and stay
//! stable for as long as the mesh is loaded. File formats live behind the
//! [`MeshSource`] trait.

mod json;

use std::path::Path;

use glam::DVec3;
pub use json::JsonMeshSource;

use crate::error::PrepError;

/// Anything that can turn a path into a [`Mesh`].
pub trait MeshSource {
    /// Read and validate the mesh at `path`.
    fn load(&self, path: &Path) -> Result<Mesh, PrepError>;
}

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Component-wise minimum.
    pub min: DVec3,
    /// Component-wise maximum.
    pub max: DVec3,
}

impl Bounds {
    /// Bounds of `points`, or `None` for an empty slice.
    #[must_use]
    pub fn of(points: &[DVec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for p in rest {
            bounds.min = bounds.min.min(*p);
            bounds.max = bounds.max.max(*p);
        }
        Some(bounds)
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).length()
    }
}

/// Bounds of a point set that is non-empty and entirely finite, or
/// [`PrepError::InvalidMesh`].
pub(crate) fn validate_points(points: &[DVec3]) -> Result<Bounds, PrepError> {
    if let Some(i) = points.iter().position(|p| !p.is_finite()) {
        return Err(PrepError::InvalidMesh(format!(
            "point {i} has a non-finite coordinate"
        )));
    }
    Bounds::of(points).ok_or_else(|| {
        PrepError::InvalidMesh("point set is empty".to_owned())
    })
}

/// A loaded, validated mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    points: Vec<DVec3>,
    cells: Vec<Vec<usize>>,
    characteristic_length: f64,
}

impl Mesh {
    /// Build a mesh from points only.
    pub fn new(points: Vec<DVec3>) -> Result<Self, PrepError> {
        Self::with_cells(points, Vec::new())
    }

    /// Build a mesh from points and connectivity.
    ///
    /// Fails with [`PrepError::InvalidMesh`] for an empty point set, a
    /// non-finite coordinate, or a cell that references a missing point.
    pub fn with_cells(
        points: Vec<DVec3>,
        cells: Vec<Vec<usize>>,
    ) -> Result<Self, PrepError> {
        let bounds = validate_points(&points)?;

        for (c, cell) in cells.iter().enumerate() {
            if let Some(&bad) = cell.iter().find(|&&i| i >= points.len()) {
                return Err(PrepError::InvalidMesh(format!(
                    "cell {c} references point {bad}, but the mesh has {} \
                     points",
                    points.len()
                )));
            }
        }

        Ok(Self {
            characteristic_length: bounds.diagonal(),
            points,
            cells,
        })
    }

    /// Point positions, indexed by node.
    #[must_use]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Connectivity, if the source provided any.
    #[must_use]
    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Number of nodes (`N`).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.points.len()
    }

    /// Position of node `index`, if it exists.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<DVec3> {
        self.points.get(index).copied()
    }

    /// Bounding-box diagonal, used to scale pick tolerances.
    #[must_use]
    pub fn characteristic_length(&self) -> f64 {
        self.characteristic_length
    }
}
