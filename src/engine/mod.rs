//! The annotation engine: one owner for the mesh and everything indexed by
//! it.

pub mod command;
mod snapshot;

use std::path::Path;

use glam::DVec3;

pub use self::command::{Command, Status};
pub use self::snapshot::{ForceMarker, NodeMarker, RenderSnapshot};
use crate::annotations::{
    AnnotationStore, FixOutcome, ForceOutcome, UnfixOutcome,
};
use crate::error::PrepError;
use crate::mesh::{JsonMeshSource, Mesh, MeshSource};
use crate::options::Options;
use crate::picking::SpatialPicker;
use crate::session::{PickReport, SelectionSession};

/// Owns the mesh source, the current mesh, the picker, the annotation store
/// and the selection session, and applies [`Command`]s to them.
///
/// Failing commands leave all state untouched. Every state change bumps a
/// generation counter; a renderer polls [`is_dirty`](Self::is_dirty), pulls a
/// [`RenderSnapshot`], then calls [`mark_rendered`](Self::mark_rendered).
pub struct Preprocessor {
    source: Box<dyn MeshSource>,
    mesh: Option<Mesh>,
    picker: SpatialPicker,
    annotations: AnnotationStore,
    session: SelectionSession,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
    /// Generation that was last consumed by the renderer.
    rendered_generation: u64,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(&Options::default())
    }
}

impl Preprocessor {
    /// Create an engine with no mesh loaded that opens JSON meshes.
    #[must_use]
    pub fn new(options: &Options) -> Self {
        Self::with_source(options, Box::new(JsonMeshSource))
    }

    /// Create an engine with no mesh loaded that opens meshes through
    /// `source`.
    #[must_use]
    pub fn with_source(options: &Options, source: Box<dyn MeshSource>) -> Self {
        Self {
            source,
            mesh: None,
            picker: SpatialPicker::new(&options.picking),
            annotations: AnnotationStore::new(&options.annotations),
            session: SelectionSession::new(),
            generation: 0,
            rendered_generation: 0,
        }
    }

    // -- Accessors --

    /// The mesh in force, if any.
    #[must_use]
    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// Fixed nodes and forces.
    #[must_use]
    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// Picking mode and selection.
    #[must_use]
    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    /// Configured picker.
    #[must_use]
    pub fn picker(&self) -> &SpatialPicker {
        &self.picker
    }

    // -- Change tracking --

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether anything changed since the last
    /// [`mark_rendered`](Self::mark_rendered).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Mark the current generation as drawn.
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }

    /// Marker data for the current state.
    #[must_use]
    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::build(
            self.mesh.as_ref(),
            &self.annotations.snapshot(),
            self.session.selected(),
            self.session.is_picking_enabled(),
        )
    }

    // -- Operations --

    /// Apply a command.
    pub fn execute(&mut self, command: Command) -> Result<Status, PrepError> {
        match command {
            Command::OpenMesh(path) => self.open_mesh(&path),
            Command::TogglePicking(on) => self.set_picking(on),
            Command::Pick(point) => self.pick(point),
            Command::Deselect => Ok(self.deselect()),
            Command::FixSelected => self.fix_selected(),
            Command::UnfixSelected => self.unfix_selected(),
            Command::ApplyForce(force) => self.apply_force(force),
            Command::ClearAll => Ok(self.clear_all()),
        }
    }

    /// Read a mesh through the engine's source and make it current. On
    /// failure the previous mesh and its annotations stay in force.
    pub fn open_mesh(&mut self, path: &Path) -> Result<Status, PrepError> {
        let mesh = self.source.load(path)?;
        log::info!("loaded {}", path.display());
        Ok(self.load_mesh(mesh))
    }

    /// Make `mesh` current, dropping every annotation and the selection.
    pub fn load_mesh(&mut self, mesh: Mesh) -> Status {
        self.annotations.reset(mesh.node_count());
        self.session.mesh_reloaded();
        let status = Status::MeshLoaded {
            nodes: mesh.node_count(),
            characteristic_length: mesh.characteristic_length(),
        };
        log::info!("{status}");
        self.mesh = Some(mesh);
        self.invalidate();
        status
    }

    /// Turn picking on or off.
    pub fn set_picking(&mut self, enabled: bool) -> Result<Status, PrepError> {
        let was = self.session.state();
        if enabled {
            self.session.enable_picking(self.mesh.as_ref())?;
        } else {
            self.session.disable_picking();
        }
        if self.session.state() != was {
            self.invalidate();
        }
        Ok(if enabled {
            Status::PickingEnabled
        } else {
            Status::PickingDisabled
        })
    }

    /// Forward a raw pick point to the session.
    pub fn pick(&mut self, point: DVec3) -> Result<Status, PrepError> {
        let was = self.session.state();
        let report =
            self.session
                .on_pick(&self.picker, self.mesh.as_ref(), point)?;
        if self.session.state() != was {
            self.invalidate();
        }
        Ok(match report {
            PickReport::Selected(hit) => Status::NodeSelected {
                index: hit.index,
                position: hit.position,
            },
            PickReport::NoNodeNearClick => Status::NoNodeNearClick,
        })
    }

    /// Drop the selection.
    pub fn deselect(&mut self) -> Status {
        if self.session.selected().is_some() {
            self.session.deselect();
            self.invalidate();
        }
        Status::Deselected
    }

    /// Fix the selected node.
    pub fn fix_selected(&mut self) -> Result<Status, PrepError> {
        let index = self.session.require_selection()?;
        let outcome = self.annotations.fix(index)?;
        if outcome.changed() {
            self.invalidate();
        }
        Ok(match outcome {
            FixOutcome::Fixed => Status::Fixed(index),
            FixOutcome::AlreadyFixed => Status::AlreadyFixed(index),
        })
    }

    /// Release the selected node.
    pub fn unfix_selected(&mut self) -> Result<Status, PrepError> {
        let index = self.session.require_selection()?;
        let outcome = self.annotations.unfix(index)?;
        if outcome.changed() {
            self.invalidate();
        }
        Ok(match outcome {
            UnfixOutcome::Unfixed => Status::Unfixed(index),
            UnfixOutcome::NotFixed => Status::NotFixed(index),
        })
    }

    /// Set the force on the selected node.
    pub fn apply_force(&mut self, force: DVec3) -> Result<Status, PrepError> {
        let index = self.session.require_selection()?;
        let outcome = self.annotations.set_force(index, force)?;
        if outcome.changed() {
            self.invalidate();
        }
        Ok(match outcome {
            ForceOutcome::Applied | ForceOutcome::Replaced(_) => {
                Status::ForceApplied { index, force }
            }
            ForceOutcome::Removed(_) => Status::ForceRemoved(index),
            ForceOutcome::Unchanged => Status::NoForce(index),
        })
    }

    /// Remove every fixed node and force. Always succeeds.
    pub fn clear_all(&mut self) -> Status {
        if self.annotations.clear_all() {
            self.invalidate();
        }
        Status::Cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SelectionState;

    fn triangle() -> Mesh {
        Mesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y]).unwrap()
    }

    fn loaded() -> Preprocessor {
        let mut engine = Preprocessor::default();
        let _ = engine.load_mesh(triangle());
        engine
    }

    fn loaded_with(source: FakeSource) -> Preprocessor {
        let mut engine =
            Preprocessor::with_source(&Options::default(), Box::new(source));
        let _ = engine.load_mesh(triangle());
        engine
    }

    fn select(engine: &mut Preprocessor, point: DVec3) {
        let _ = engine.set_picking(true).unwrap();
        let _ = engine.pick(point).unwrap();
    }

    /// Source that hands out a fixed mesh or fails.
    struct FakeSource(Option<Mesh>);

    impl MeshSource for FakeSource {
        fn load(&self, path: &Path) -> Result<Mesh, PrepError> {
            self.0.clone().ok_or_else(|| {
                PrepError::MeshLoad(format!("{} unreadable", path.display()))
            })
        }
    }

    #[test]
    fn commands_need_a_selection() {
        let mut engine = loaded();
        assert!(matches!(
            engine.fix_selected(),
            Err(PrepError::NoActiveSelection)
        ));
        assert!(matches!(
            engine.apply_force(DVec3::X),
            Err(PrepError::NoActiveSelection)
        ));
        assert!(engine.annotations().is_empty());
    }

    #[test]
    fn picking_needs_a_mesh() {
        let mut engine = Preprocessor::default();
        assert!(matches!(
            engine.set_picking(true),
            Err(PrepError::NoMeshLoaded)
        ));
        assert!(matches!(
            engine.pick(DVec3::ZERO),
            Err(PrepError::PickingDisabled)
        ));
    }

    #[test]
    fn pick_fix_force_flow() {
        let mut engine = loaded();
        select(&mut engine, DVec3::new(0.95, 0.0, 0.0));
        assert_eq!(engine.session().selected(), Some(1));

        assert_eq!(engine.fix_selected().unwrap(), Status::Fixed(1));
        assert_eq!(engine.fix_selected().unwrap(), Status::AlreadyFixed(1));
        assert_eq!(
            engine.apply_force(DVec3::new(3.0, 4.0, 0.0)).unwrap(),
            Status::ForceApplied {
                index: 1,
                force: DVec3::new(3.0, 4.0, 0.0)
            }
        );

        let snap = engine.render_snapshot();
        assert!(snap.picking_enabled);
        assert_eq!(
            snap.selection,
            Some(NodeMarker {
                index: 1,
                position: DVec3::X
            })
        );
        assert_eq!(snap.fixed.len(), 1);
        let arrow = snap.forces[0];
        assert!((arrow.magnitude - 5.0).abs() < 1e-12);
        assert!((arrow.direction - DVec3::new(0.6, 0.8, 0.0)).length() < 1e-12);

        assert_eq!(
            engine.apply_force(DVec3::ZERO).unwrap(),
            Status::ForceRemoved(1)
        );
        assert_eq!(engine.apply_force(DVec3::ZERO).unwrap(), Status::NoForce(1));
        assert_eq!(engine.unfix_selected().unwrap(), Status::Unfixed(1));
        assert_eq!(engine.unfix_selected().unwrap(), Status::NotFixed(1));
        assert!(engine.annotations().is_empty());
    }

    #[test]
    fn missed_pick_drops_selection() {
        let mut engine = loaded();
        select(&mut engine, DVec3::Y);
        assert_eq!(
            engine.pick(DVec3::new(0.5, 0.5, 0.5)).unwrap(),
            Status::NoNodeNearClick
        );
        assert_eq!(engine.session().state(), SelectionState::NoSelection);
        assert!(engine.fix_selected().is_err());
    }

    #[test]
    fn reload_resets_annotations_and_session() {
        let bigger = Mesh::new(vec![DVec3::ZERO; 10]).unwrap();
        let mut engine = loaded_with(FakeSource(Some(bigger)));
        select(&mut engine, DVec3::X);
        let _ = engine.fix_selected().unwrap();
        let _ = engine.apply_force(DVec3::Z).unwrap();

        let status =
            engine.execute(Command::OpenMesh("big.json".into())).unwrap();
        assert!(matches!(status, Status::MeshLoaded { nodes: 10, .. }));
        assert!(engine.annotations().is_empty());
        assert_eq!(engine.annotations().node_count(), 10);
        assert_eq!(engine.session().state(), SelectionState::PickingDisabled);
    }

    #[test]
    fn failed_open_keeps_previous_mesh() {
        let mut engine = loaded_with(FakeSource(None));
        select(&mut engine, DVec3::X);
        let _ = engine.fix_selected().unwrap();

        let err =
            engine.execute(Command::OpenMesh("x.stl".into())).unwrap_err();
        assert!(matches!(err, PrepError::MeshLoad(_)));
        assert_eq!(engine.mesh().map(Mesh::node_count), Some(3));
        assert!(engine.annotations().is_fixed(1));
        assert_eq!(engine.session().selected(), Some(1));
    }

    #[test]
    fn clear_all_always_succeeds() {
        let mut engine = Preprocessor::default();
        assert_eq!(engine.clear_all(), Status::Cleared);

        let mut engine = loaded();
        select(&mut engine, DVec3::ZERO);
        let _ = engine.fix_selected().unwrap();
        let _ = engine.apply_force(DVec3::X).unwrap();
        assert_eq!(
            engine.execute(Command::ClearAll).unwrap(),
            Status::Cleared
        );
        assert!(engine.annotations().is_empty());
        // Selection survives a clear.
        assert_eq!(engine.session().selected(), Some(0));
    }

    #[test]
    fn disable_picking_clears_selection() {
        let mut engine = loaded();
        select(&mut engine, DVec3::X);
        assert_eq!(
            engine.execute(Command::TogglePicking(false)).unwrap(),
            Status::PickingDisabled
        );
        assert_eq!(engine.render_snapshot().selection, None);
        assert!(matches!(
            engine.execute(Command::UnfixSelected),
            Err(PrepError::NoActiveSelection)
        ));
    }

    #[test]
    fn default_engine_opens_json_meshes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.json");
        std::fs::write(&path, r#"{"points": [[0, 0, 0], [1, 0, 0]]}"#)
            .unwrap();

        let mut engine = Preprocessor::default();
        let status = engine.execute(Command::OpenMesh(path)).unwrap();
        assert!(matches!(status, Status::MeshLoaded { nodes: 2, .. }));
        assert_eq!(
            engine.execute(Command::TogglePicking(true)).unwrap(),
            Status::PickingEnabled
        );
    }

    #[test]
    fn dirty_tracking_follows_mutations() {
        let mut engine = Preprocessor::default();
        assert!(!engine.is_dirty());

        let _ = engine.load_mesh(triangle());
        assert!(engine.is_dirty());
        engine.mark_rendered();

        // No-op commands leave the generation alone.
        let _ = engine.clear_all();
        let _ = engine.deselect();
        assert!(!engine.is_dirty());

        select(&mut engine, DVec3::X);
        assert!(engine.is_dirty());
        engine.mark_rendered();

        let _ = engine.fix_selected().unwrap();
        assert!(engine.is_dirty());
        engine.mark_rendered();
        let _ = engine.fix_selected().unwrap();
        assert!(!engine.is_dirty());
    }

    #[test]
    fn snapshot_without_mesh_is_empty() {
        let engine = Preprocessor::default();
        assert_eq!(engine.render_snapshot(), RenderSnapshot::default());
    }
}
