//! Fixed-node and point-load bookkeeping.
//!
//! [`AnnotationStore`] is bound to the vertex count of the mesh in force and
//! rejects any index outside it, so every stored key is always valid for the
//! current mesh. Both collections are ordered for deterministic enumeration.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec3;
use serde::Serialize;

use crate::error::PrepError;
use crate::options::AnnotationOptions;

/// Forces whose magnitude is below this are pruned instead of stored.
pub const DEFAULT_FORCE_EPSILON: f64 = 1e-9;

/// Result of [`AnnotationStore::fix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// The node was added to the fixed set.
    Fixed,
    /// The node was already fixed; nothing changed.
    AlreadyFixed,
}

/// Result of [`AnnotationStore::unfix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnfixOutcome {
    /// The node was removed from the fixed set.
    Unfixed,
    /// The node was not fixed; nothing changed.
    NotFixed,
}

/// Result of [`AnnotationStore::set_force`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceOutcome {
    /// A force was attached to a node that had none.
    Applied,
    /// An existing force was overwritten; carries the old vector.
    Replaced(DVec3),
    /// A near-zero force removed the existing entry.
    Removed(DVec3),
    /// A near-zero force on a node without a force; nothing changed.
    Unchanged,
}

impl FixOutcome {
    /// Whether the store was mutated.
    #[must_use]
    pub fn changed(self) -> bool {
        self == Self::Fixed
    }
}

impl UnfixOutcome {
    /// Whether the store was mutated.
    #[must_use]
    pub fn changed(self) -> bool {
        self == Self::Unfixed
    }
}

impl ForceOutcome {
    /// Whether the store was mutated.
    #[must_use]
    pub fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Immutable copy of the store's contents, sorted by node index.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnnotationSnapshot {
    /// Fixed node indices, ascending.
    pub fixed: Vec<usize>,
    /// `(node, force)` pairs, ascending by node.
    pub forces: Vec<(usize, DVec3)>,
}

/// Owns the fixed-node set and the node → force map.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    fixed: BTreeSet<usize>,
    forces: BTreeMap<usize, DVec3>,
    node_count: usize,
    force_epsilon: f64,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new(&AnnotationOptions::default())
    }
}

impl AnnotationStore {
    /// Create an empty store. Until [`reset`](Self::reset) binds it to a mesh
    /// every index is out of range.
    #[must_use]
    pub fn new(options: &AnnotationOptions) -> Self {
        Self {
            fixed: BTreeSet::new(),
            forces: BTreeMap::new(),
            node_count: 0,
            force_epsilon: options.force_epsilon,
        }
    }

    /// Clear everything and bind the store to a mesh with `node_count`
    /// vertices.
    pub fn reset(&mut self, node_count: usize) {
        let _ = self.clear_all();
        self.node_count = node_count;
    }

    /// Vertex count the store validates against.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    fn check(&self, index: usize) -> Result<(), PrepError> {
        if index < self.node_count {
            Ok(())
        } else {
            Err(PrepError::OutOfRange {
                index,
                node_count: self.node_count,
            })
        }
    }

    /// Add `index` to the fixed set.
    pub fn fix(&mut self, index: usize) -> Result<FixOutcome, PrepError> {
        self.check(index)?;
        if self.fixed.insert(index) {
            log::debug!("fixed node {index}");
            Ok(FixOutcome::Fixed)
        } else {
            Ok(FixOutcome::AlreadyFixed)
        }
    }

    /// Remove `index` from the fixed set.
    pub fn unfix(&mut self, index: usize) -> Result<UnfixOutcome, PrepError> {
        self.check(index)?;
        if self.fixed.remove(&index) {
            log::debug!("unfixed node {index}");
            Ok(UnfixOutcome::Unfixed)
        } else {
            Ok(UnfixOutcome::NotFixed)
        }
    }

    /// Attach `force` to `index`, replacing any previous force.
    ///
    /// A force with magnitude below the epsilon means "no force": it removes
    /// the entry instead of storing a zero vector.
    pub fn set_force(
        &mut self,
        index: usize,
        force: DVec3,
    ) -> Result<ForceOutcome, PrepError> {
        self.check(index)?;
        let magnitude = force.length();
        if !magnitude.is_finite() {
            return Err(PrepError::InvalidForce);
        }

        let outcome = if magnitude < self.force_epsilon {
            self.forces
                .remove(&index)
                .map_or(ForceOutcome::Unchanged, ForceOutcome::Removed)
        } else {
            self.forces
                .insert(index, force)
                .map_or(ForceOutcome::Applied, ForceOutcome::Replaced)
        };
        log::debug!("force on node {index}: {outcome:?}");
        Ok(outcome)
    }

    /// Whether `index` is fixed.
    #[must_use]
    pub fn is_fixed(&self, index: usize) -> bool {
        self.fixed.contains(&index)
    }

    /// Force applied to `index`, if any.
    #[must_use]
    pub fn force(&self, index: usize) -> Option<DVec3> {
        self.forces.get(&index).copied()
    }

    /// Whether both collections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.forces.is_empty()
    }

    /// Empty both collections. Returns `true` if anything was removed.
    pub fn clear_all(&mut self) -> bool {
        let had_any = !self.is_empty();
        self.fixed.clear();
        self.forces.clear();
        had_any
    }

    /// Copy out the current contents.
    #[must_use]
    pub fn snapshot(&self) -> AnnotationSnapshot {
        AnnotationSnapshot {
            fixed: self.fixed.iter().copied().collect(),
            forces: self.forces.iter().map(|(&i, &f)| (i, f)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(n: usize) -> AnnotationStore {
        let mut s = AnnotationStore::default();
        s.reset(n);
        s
    }

    #[test]
    fn fix_twice_reports_already_fixed() {
        let mut s = store(3);
        assert_eq!(s.fix(1).unwrap(), FixOutcome::Fixed);
        assert_eq!(s.fix(1).unwrap(), FixOutcome::AlreadyFixed);
        assert_eq!(s.snapshot().fixed, vec![1]);
    }

    #[test]
    fn fix_then_unfix_round_trips() {
        let mut s = store(5);
        assert!(s.fix(0).unwrap().changed());
        assert!(s.fix(4).unwrap().changed());
        let before = s.snapshot();

        assert_eq!(s.fix(2).unwrap(), FixOutcome::Fixed);
        assert_eq!(s.unfix(2).unwrap(), UnfixOutcome::Unfixed);
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn unfix_absent_reports_not_fixed() {
        let mut s = store(3);
        assert_eq!(s.unfix(0).unwrap(), UnfixOutcome::NotFixed);
        assert!(!UnfixOutcome::NotFixed.changed());
    }

    #[test]
    fn out_of_range_is_rejected_without_mutation() {
        let mut s = store(3);
        assert!(s.fix(0).unwrap().changed());
        let before = s.snapshot();

        assert!(matches!(
            s.fix(3),
            Err(PrepError::OutOfRange {
                index: 3,
                node_count: 3
            })
        ));
        assert!(s.unfix(7).is_err());
        assert!(s.set_force(3, DVec3::X).is_err());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn unbound_store_rejects_everything() {
        let mut s = AnnotationStore::default();
        assert!(matches!(s.fix(0), Err(PrepError::OutOfRange { .. })));
    }

    #[test]
    fn zero_force_removes_existing_entry() {
        let mut s = store(3);
        assert_eq!(
            s.set_force(2, DVec3::new(3.0, 4.0, 0.0)).unwrap(),
            ForceOutcome::Applied
        );
        assert_eq!(s.snapshot().forces, vec![(2, DVec3::new(3.0, 4.0, 0.0))]);

        assert_eq!(
            s.set_force(2, DVec3::ZERO).unwrap(),
            ForceOutcome::Removed(DVec3::new(3.0, 4.0, 0.0))
        );
        assert!(s.snapshot().forces.is_empty());
    }

    #[test]
    fn zero_force_without_entry_is_unchanged() {
        let mut s = store(3);
        assert!(s.set_force(0, DVec3::X).unwrap().changed());
        let before = s.snapshot();

        let outcome = s.set_force(1, DVec3::splat(1e-12)).unwrap();
        assert_eq!(outcome, ForceOutcome::Unchanged);
        assert!(!outcome.changed());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn force_overwrite_reports_previous() {
        let mut s = store(3);
        assert!(s.set_force(1, DVec3::X).unwrap().changed());
        assert_eq!(
            s.set_force(1, DVec3::Y).unwrap(),
            ForceOutcome::Replaced(DVec3::X)
        );
        assert_eq!(s.force(1), Some(DVec3::Y));
    }

    #[test]
    fn non_finite_force_is_rejected() {
        let mut s = store(3);
        assert!(matches!(
            s.set_force(0, DVec3::new(f64::NAN, 0.0, 0.0)),
            Err(PrepError::InvalidForce)
        ));
        assert_eq!(s.force(0), None);
    }

    #[test]
    fn overflowing_magnitude_is_rejected() {
        let mut s = store(3);
        assert!(s.set_force(0, DVec3::X).unwrap().changed());
        assert!(matches!(
            s.set_force(0, DVec3::splat(1e200)),
            Err(PrepError::InvalidForce)
        ));
        assert_eq!(s.force(0), Some(DVec3::X));
    }

    #[test]
    fn configured_epsilon_prunes_small_forces() {
        let mut s = AnnotationStore::new(&AnnotationOptions {
            force_epsilon: 0.5,
        });
        s.reset(2);
        assert_eq!(
            s.set_force(0, DVec3::splat(0.1)).unwrap(),
            ForceOutcome::Unchanged
        );
        assert_eq!(
            s.set_force(0, DVec3::new(0.5, 0.0, 0.0)).unwrap(),
            ForceOutcome::Applied
        );
    }

    #[test]
    fn clear_all_empties_both() {
        let mut s = store(4);
        assert!(!s.clear_all());
        assert!(s.fix(3).unwrap().changed());
        assert!(s.set_force(0, DVec3::Z).unwrap().changed());
        assert!(s.clear_all());
        assert!(s.is_empty());
        assert_eq!(s.snapshot(), AnnotationSnapshot::default());
    }

    #[test]
    fn reset_rebinds_node_count() {
        let mut s = store(10);
        assert!(s.fix(9).unwrap().changed());
        s.reset(2);
        assert!(s.is_empty());
        assert_eq!(s.node_count(), 2);
        assert!(s.fix(9).is_err());
        assert!(s.fix(1).is_ok());
    }

    #[test]
    fn snapshot_is_sorted() {
        let mut s = store(10);
        for i in [7, 2, 5] {
            assert!(s.fix(i).unwrap().changed());
            assert!(s.set_force(i, DVec3::Z * i as f64).unwrap().changed());
        }
        let snap = s.snapshot();
        assert_eq!(snap.fixed, vec![2, 5, 7]);
        let keys: Vec<usize> = snap.forces.iter().map(|(i, _)| *i).collect();
        assert_eq!(keys, vec![2, 5, 7]);
        assert!(s.is_fixed(5));
        assert!(!s.is_fixed(6));
    }
}
