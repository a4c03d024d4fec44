//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether it comes from a menu, a toolbar
//! button, a script line or a rendering surface's pick callback, is a
//! [`Command`]. Consumers construct commands and pass them to
//! [`Preprocessor::execute`](super::Preprocessor::execute), which answers
//! with a [`Status`] to show the user.

use std::fmt;
use std::path::PathBuf;

use glam::DVec3;

/// A discrete operation the engine can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Load a mesh through the host's mesh source. Clears all annotations.
    OpenMesh(PathBuf),
    /// Turn node picking on (`true`) or off (`false`).
    TogglePicking(bool),
    /// A raw scene point reported by the rendering surface.
    Pick(DVec3),
    /// Drop the active selection.
    Deselect,
    /// Fix the selected node.
    FixSelected,
    /// Release the selected node.
    UnfixSelected,
    /// Apply a force to the selected node; a zero vector removes it.
    ApplyForce(DVec3),
    /// Remove every fixed node and force.
    ClearAll,
}

/// Successful result of a command, rendered as status-bar text.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// A new mesh is in force.
    MeshLoaded {
        /// Vertex count.
        nodes: usize,
        /// Bounding-box diagonal.
        characteristic_length: f64,
    },
    /// Picking was turned on.
    PickingEnabled,
    /// Picking was turned off.
    PickingDisabled,
    /// A pick selected a node.
    NodeSelected {
        /// Node index.
        index: usize,
        /// Node coordinates.
        position: DVec3,
    },
    /// A pick landed too far from every node.
    NoNodeNearClick,
    /// Selection dropped.
    Deselected,
    /// Node added to the fixed set.
    Fixed(usize),
    /// Node was already fixed.
    AlreadyFixed(usize),
    /// Node removed from the fixed set.
    Unfixed(usize),
    /// Node was not fixed.
    NotFixed(usize),
    /// Force stored on a node (new or replacing an older one).
    ForceApplied {
        /// Node index.
        index: usize,
        /// Stored force.
        force: DVec3,
    },
    /// A zero force removed the node's load.
    ForceRemoved(usize),
    /// A zero force on a node that carried no load.
    NoForce(usize),
    /// Annotations cleared.
    Cleared,
}

fn fmt_vec(v: DVec3) -> String {
    format!("({:.4}, {:.4}, {:.4})", v.x, v.y, v.z)
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MeshLoaded {
                nodes,
                characteristic_length,
            } => write!(
                f,
                "mesh loaded: {nodes} nodes, characteristic length \
                 {characteristic_length:.4}"
            ),
            Self::PickingEnabled => write!(f, "node picking enabled"),
            Self::PickingDisabled => write!(f, "node picking disabled"),
            Self::NodeSelected { index, position } => {
                write!(f, "selected node {index} at {}", fmt_vec(*position))
            }
            Self::NoNodeNearClick => write!(f, "no node near click"),
            Self::Deselected => write!(f, "selection cleared"),
            Self::Fixed(i) => write!(f, "node {i} fixed"),
            Self::AlreadyFixed(i) => write!(f, "node {i} is already fixed"),
            Self::Unfixed(i) => write!(f, "node {i} released"),
            Self::NotFixed(i) => write!(f, "node {i} is not fixed"),
            Self::ForceApplied { index, force } => write!(
                f,
                "force {} (|F| = {:.4}) applied to node {index}",
                fmt_vec(*force),
                force.length()
            ),
            Self::ForceRemoved(i) => write!(f, "force removed from node {i}"),
            Self::NoForce(i) => write!(f, "node {i} has no force"),
            Self::Cleared => write!(f, "all fixed nodes and forces cleared"),
        }
    }
}
