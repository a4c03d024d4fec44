//! Crate-level error types.

use std::fmt;

/// Errors produced by the feaprep crate.
///
/// Every variant is recoverable: the command that produced it fails and the
/// annotation state is left exactly as it was.
#[derive(Debug)]
pub enum PrepError {
    /// Empty or malformed point set (or connectivity referencing missing
    /// points).
    InvalidMesh(String),
    /// Node index not valid for the mesh currently loaded.
    OutOfRange {
        /// The rejected index.
        index: usize,
        /// Vertex count of the current mesh.
        node_count: usize,
    },
    /// The command needs a mesh but none has been loaded.
    NoMeshLoaded,
    /// The command acts on the active selection but nothing is selected.
    NoActiveSelection,
    /// A pick event arrived while picking mode was off.
    PickingDisabled,
    /// Force vector whose components or magnitude are not finite.
    InvalidForce,
    /// The mesh source failed to produce a mesh.
    MeshLoad(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Malformed command line or vector text.
    CommandParse(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMesh(msg) => write!(f, "invalid mesh: {msg}"),
            Self::OutOfRange { index, node_count } => write!(
                f,
                "node {index} is out of range (mesh has {node_count} nodes)"
            ),
            Self::NoMeshLoaded => write!(f, "no mesh loaded"),
            Self::NoActiveSelection => {
                write!(f, "no node selected; pick a node first")
            }
            Self::PickingDisabled => write!(f, "node picking is disabled"),
            Self::InvalidForce => {
                write!(f, "force magnitude must be a finite number")
            }
            Self::MeshLoad(msg) => write!(f, "mesh load error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::CommandParse(msg) => write!(f, "command error: {msg}"),
        }
    }
}

impl std::error::Error for PrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PrepError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
