// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The fixed repair sequence

use super::RepairConfig;
use crate::engine::MeshEngine;
use crate::error::EngineResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single named repair operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStep {
    RemoveDuplicateFaces,
    RemoveDuplicateVertices,
    RemoveUnreferencedVertices,
    RepairNonManifoldEdges,
    RepairNonManifoldVertices,
    CloseHoles,
    ReorientFaces,
    SnapBorders,
}

impl RepairStep {
    /// Every step, in the order the pipeline applies them.
    ///
    /// Duplicates go before manifold repair, manifold repair before hole
    /// closing, orientation after hole closing, and snapping last.
    pub const SEQUENCE: [RepairStep; 8] = [
        RepairStep::RemoveDuplicateFaces,
        RepairStep::RemoveDuplicateVertices,
        RepairStep::RemoveUnreferencedVertices,
        RepairStep::RepairNonManifoldEdges,
        RepairStep::RepairNonManifoldVertices,
        RepairStep::CloseHoles,
        RepairStep::ReorientFaces,
        RepairStep::SnapBorders,
    ];

    /// Stable identifier, as it appears in `repairSteps`
    pub fn name(&self) -> &'static str {
        match self {
            Self::RemoveDuplicateFaces => "remove_duplicate_faces",
            Self::RemoveDuplicateVertices => "remove_duplicate_vertices",
            Self::RemoveUnreferencedVertices => "remove_unreferenced_vertices",
            Self::RepairNonManifoldEdges => "repair_non_manifold_edges",
            Self::RepairNonManifoldVertices => "repair_non_manifold_vertices",
            Self::CloseHoles => "close_holes",
            Self::ReorientFaces => "reorient_faces",
            Self::SnapBorders => "snap_borders",
        }
    }

    /// Human-readable progress text
    pub fn description(&self) -> &'static str {
        match self {
            Self::RemoveDuplicateFaces => "Removing duplicate faces",
            Self::RemoveDuplicateVertices => "Removing duplicate vertices",
            Self::RemoveUnreferencedVertices => "Removing unreferenced vertices",
            Self::RepairNonManifoldEdges => "Repairing non-manifold edges",
            Self::RepairNonManifoldVertices => "Repairing non-manifold vertices",
            Self::CloseHoles => "Closing holes",
            Self::ReorientFaces => "Re-orienting faces",
            Self::SnapBorders => "Snapping border vertices",
        }
    }

    /// Run this step against `handle` with parameters from `config`
    pub fn apply<E: MeshEngine>(
        &self,
        engine: &mut E,
        handle: &mut E::Handle,
        config: &RepairConfig,
    ) -> EngineResult<()> {
        match self {
            Self::RemoveDuplicateFaces => engine.remove_duplicate_faces(handle),
            Self::RemoveDuplicateVertices => engine.remove_duplicate_vertices(handle),
            Self::RemoveUnreferencedVertices => engine.remove_unreferenced_vertices(handle),
            Self::RepairNonManifoldEdges => {
                engine.repair_non_manifold_edges(handle, config.non_manifold_edge_method)
            }
            Self::RepairNonManifoldVertices => engine
                .repair_non_manifold_vertices(handle, config.non_manifold_vertex_displacement_ratio),
            Self::CloseHoles => engine.close_holes(handle, config.max_hole_size),
            Self::ReorientFaces => engine.reorient_faces(handle),
            Self::SnapBorders => engine.snap_borders(handle, config.snap_threshold_percent),
        }
    }
}

impl fmt::Display for RepairStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_order() {
        let names: Vec<&str> = RepairStep::SEQUENCE.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "remove_duplicate_faces",
                "remove_duplicate_vertices",
                "remove_unreferenced_vertices",
                "repair_non_manifold_edges",
                "repair_non_manifold_vertices",
                "close_holes",
                "reorient_faces",
                "snap_borders",
            ]
        );
    }

    #[test]
    fn test_serde_name_matches_display() {
        for step in RepairStep::SEQUENCE {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, format!("\"{}\"", step));
        }
    }
}
