//! Nearest-vertex picking.
//!
//! Turns a raw 3-D point reported by a rendering surface into a mesh node
//! index. Picks are never pixel-exact, so a hit is accepted when the nearest
//! vertex lies within a tolerance scaled by the mesh's characteristic length;
//! anything farther is a [`PickResult::NoMatch`].

use glam::DVec3;

use crate::error::PrepError;
use crate::mesh::{validate_points, Mesh};
use crate::options::PickingOptions;

/// Default fraction of the characteristic length accepted as a hit.
pub const DEFAULT_TOLERANCE_FRACTION: f64 = 0.1;

/// Absolute tolerance used when the mesh has no usable length scale (a single
/// point, or all points coincident).
pub const DEFAULT_FALLBACK_TOLERANCE: f64 = 1e-6;

/// Outcome of resolving a query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickResult {
    /// The nearest node, within tolerance.
    Node(usize),
    /// No node close enough to the query point.
    NoMatch,
}

/// A resolved pick with the data needed to report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Node index.
    pub index: usize,
    /// Node position.
    pub position: DVec3,
    /// Distance from the query point to the node.
    pub distance: f64,
}

/// Resolve `query` against `points` with the default fallback tolerance.
///
/// The characteristic length is the bounding diagonal of `points`. Fails with
/// [`PrepError::InvalidMesh`] if `points` is empty or has a non-finite
/// coordinate.
pub fn resolve(
    points: &[DVec3],
    query: DVec3,
    tolerance_fraction: f64,
) -> Result<PickResult, PrepError> {
    let bounds = validate_points(points)?;
    let tolerance = scaled_tolerance(
        bounds.diagonal(),
        tolerance_fraction,
        DEFAULT_FALLBACK_TOLERANCE,
    );
    Ok(nearest_within(points, query, tolerance)
        .map_or(PickResult::NoMatch, |hit| PickResult::Node(hit.index)))
}

/// `fraction * length`, or `fallback` when `length` is zero or non-finite.
#[must_use]
pub fn scaled_tolerance(length: f64, fraction: f64, fallback: f64) -> f64 {
    if length.is_finite() && length > 0.0 {
        fraction * length
    } else {
        fallback
    }
}

/// Closest point to `query`, ties broken toward the lowest index, if it lies
/// within `tolerance`.
fn nearest_within(
    points: &[DVec3],
    query: DVec3,
    tolerance: f64,
) -> Option<PickHit> {
    if !query.is_finite() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d2 = p.distance_squared(query);
        if best.map_or(true, |(_, b)| d2 < b) {
            best = Some((i, d2));
        }
    }

    let (index, d2) = best?;
    let distance = d2.sqrt();
    (distance <= tolerance).then(|| PickHit {
        index,
        position: points[index],
        distance,
    })
}

/// Picker configured with the session's tolerance settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialPicker {
    tolerance_fraction: f64,
    fallback_tolerance: f64,
}

impl Default for SpatialPicker {
    fn default() -> Self {
        Self {
            tolerance_fraction: DEFAULT_TOLERANCE_FRACTION,
            fallback_tolerance: DEFAULT_FALLBACK_TOLERANCE,
        }
    }
}

impl SpatialPicker {
    /// Create a picker from options.
    #[must_use]
    pub fn new(options: &PickingOptions) -> Self {
        Self {
            tolerance_fraction: options.tolerance_fraction,
            fallback_tolerance: options.fallback_tolerance,
        }
    }

    /// Fraction of the characteristic length accepted as a hit.
    #[must_use]
    pub fn tolerance_fraction(&self) -> f64 {
        self.tolerance_fraction
    }

    /// Absolute pick tolerance for `mesh`.
    #[must_use]
    pub fn tolerance(&self, mesh: &Mesh) -> f64 {
        scaled_tolerance(
            mesh.characteristic_length(),
            self.tolerance_fraction,
            self.fallback_tolerance,
        )
    }

    /// Resolve `query` against `mesh`, returning the hit if one is within
    /// tolerance.
    #[must_use]
    pub fn pick(&self, mesh: &Mesh, query: DVec3) -> Option<PickHit> {
        let hit = nearest_within(mesh.points(), query, self.tolerance(mesh));
        log::debug!(
            "pick at {query:?} -> {:?}",
            hit.map(|h| (h.index, h.distance))
        );
        hit
    }
}
