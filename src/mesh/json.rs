use std::path::Path;

use glam::DVec3;
use serde::Deserialize;

use super::{Mesh, MeshSource};
use crate::error::PrepError;

/// On-disk layout: `{"points": [[x, y, z], ...], "cells": [[i, j, k], ...]}`.
#[derive(Debug, Deserialize)]
struct MeshFile {
    points: Vec<[f64; 3]>,
    #[serde(default)]
    cells: Vec<Vec<usize>>,
}

/// Reads meshes stored as a JSON point list with optional connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMeshSource;

impl JsonMeshSource {
    /// Parse a mesh from JSON text.
    pub fn parse(text: &str) -> Result<Mesh, PrepError> {
        let file: MeshFile = serde_json::from_str(text)
            .map_err(|e| PrepError::MeshLoad(e.to_string()))?;
        let points = file.points.into_iter().map(DVec3::from_array).collect();
        Mesh::with_cells(points, file.cells)
    }
}

impl MeshSource for JsonMeshSource {
    fn load(&self, path: &Path) -> Result<Mesh, PrepError> {
        let text = std::fs::read_to_string(path)?;
        let mesh = Self::parse(&text)?;
        log::debug!(
            "read {} points, {} cells from {}",
            mesh.node_count(),
            mesh.cells().len(),
            path.display()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_and_cells() {
        let mesh = JsonMeshSource::parse(
            r#"{"points": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
                "cells": [[0, 1, 2]]}"#,
        )
        .unwrap();
        assert_eq!(mesh.node_count(), 3);
        assert_eq!(mesh.cells(), &[vec![0, 1, 2]]);
        assert_eq!(mesh.point(1), Some(DVec3::X));
    }

    #[test]
    fn cells_are_optional() {
        let mesh = JsonMeshSource::parse(r#"{"points": [[1, 2, 3]]}"#).unwrap();
        assert!(mesh.cells().is_empty());
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let err = JsonMeshSource::parse(r#"{"points": [[1, 2]]}"#).unwrap_err();
        assert!(matches!(err, PrepError::MeshLoad(_)));
    }

    #[test]
    fn empty_point_list_is_invalid() {
        let err = JsonMeshSource::parse(r#"{"points": []}"#).unwrap_err();
        assert!(matches!(err, PrepError::InvalidMesh(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.json");
        std::fs::write(&path, r#"{"points": [[0, 0, 0], [2, 0, 0]]}"#)
            .unwrap();
        let mesh = JsonMeshSource.load(&path).unwrap();
        assert_eq!(mesh.node_count(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonMeshSource.load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PrepError::Io(_)));
    }
}
