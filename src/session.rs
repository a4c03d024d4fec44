//! Picking mode and active selection as a single state machine.
//!
//! ```text
//!                 enable_picking               on_pick(hit)
//! PickingDisabled ─────────────► NoSelection ◄─────────────► Selected(i)
//!        ▲                          │   on_pick(miss) / deselect   │
//!        └──────────────────────────┴──────────────────────────────┘
//!                 disable_picking / mesh_reloaded
//! ```
//!
//! Selection only exists while picking is enabled, so turning picking off or
//! loading a new mesh can never leave a stale index behind.

use glam::DVec3;

use crate::error::PrepError;
use crate::mesh::Mesh;
use crate::picking::{PickHit, SpatialPicker};

/// Combined picking mode and active selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    /// Pick events are not expected.
    #[default]
    PickingDisabled,
    /// Picking is on, nothing selected.
    NoSelection,
    /// Picking is on and this node is the target of fix/unfix/force.
    Selected(usize),
}

/// What a pick event did to the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickReport {
    /// A node was selected.
    Selected(PickHit),
    /// Nothing near the click; any previous selection was dropped.
    NoNodeNearClick,
}

/// Owns [`SelectionState`] and applies its transitions.
#[derive(Debug, Clone, Default)]
pub struct SelectionSession {
    state: SelectionState,
}

impl SelectionSession {
    /// New session in [`SelectionState::PickingDisabled`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Whether pick events should be forwarded.
    #[must_use]
    pub fn is_picking_enabled(&self) -> bool {
        self.state != SelectionState::PickingDisabled
    }

    /// The selected node, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        match self.state {
            SelectionState::Selected(i) => Some(i),
            _ => None,
        }
    }

    /// The selected node, or [`PrepError::NoActiveSelection`].
    pub fn require_selection(&self) -> Result<usize, PrepError> {
        self.selected().ok_or(PrepError::NoActiveSelection)
    }

    /// Turn picking on. An already-enabled session keeps its selection.
    pub fn enable_picking(
        &mut self,
        mesh: Option<&Mesh>,
    ) -> Result<(), PrepError> {
        if mesh.is_none() {
            return Err(PrepError::NoMeshLoaded);
        }
        if self.state == SelectionState::PickingDisabled {
            self.transition(SelectionState::NoSelection);
        }
        Ok(())
    }

    /// Turn picking off, dropping any selection.
    pub fn disable_picking(&mut self) {
        self.transition(SelectionState::PickingDisabled);
    }

    /// Drop the selection but keep picking on.
    pub fn deselect(&mut self) {
        if let SelectionState::Selected(_) = self.state {
            self.transition(SelectionState::NoSelection);
        }
    }

    /// Resolve a raw pick and update the selection.
    pub fn on_pick(
        &mut self,
        picker: &SpatialPicker,
        mesh: Option<&Mesh>,
        raw_point: DVec3,
    ) -> Result<PickReport, PrepError> {
        if !self.is_picking_enabled() {
            return Err(PrepError::PickingDisabled);
        }
        let mesh = mesh.ok_or(PrepError::NoMeshLoaded)?;

        Ok(match picker.pick(mesh, raw_point) {
            Some(hit) => {
                self.transition(SelectionState::Selected(hit.index));
                PickReport::Selected(hit)
            }
            None => {
                self.transition(SelectionState::NoSelection);
                PickReport::NoNodeNearClick
            }
        })
    }

    /// A new mesh invalidates every index: back to the initial state.
    pub fn mesh_reloaded(&mut self) {
        self.transition(SelectionState::PickingDisabled);
    }

    fn transition(&mut self, next: SelectionState) {
        if self.state != next {
            log::debug!("selection: {:?} -> {next:?}", self.state);
            self.state = next;
        }
    }
}
