// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Outcome of a repair run

use super::RepairStep;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Vertex and face counts at one point in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeshStats {
    #[serde(rename = "vertices")]
    pub vertex_count: usize,
    #[serde(rename = "faces")]
    pub face_count: usize,
}

impl MeshStats {
    pub fn new(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertex_count,
            face_count,
        }
    }
}

impl fmt::Display for MeshStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vertices, {} faces", self.vertex_count, self.face_count)
    }
}

/// Record of a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    pub output_path: String,
    pub original_size: u64,
    pub repaired_size: u64,
    pub size_difference: i64,
    pub initial_stats: MeshStats,
    pub final_stats: MeshStats,
    pub repair_steps: Vec<RepairStep>,
    pub vertices_changed: i64,
    pub faces_changed: i64,
}

impl RepairReport {
    /// Build a report, deriving every difference from the recorded values
    pub fn new(
        output_path: impl Into<String>,
        original_size: u64,
        repaired_size: u64,
        initial_stats: MeshStats,
        final_stats: MeshStats,
        repair_steps: Vec<RepairStep>,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            original_size,
            repaired_size,
            size_difference: signed_delta(original_size as i128, repaired_size as i128),
            initial_stats,
            final_stats,
            repair_steps,
            vertices_changed: signed_delta(
                initial_stats.vertex_count as i128,
                final_stats.vertex_count as i128,
            ),
            faces_changed: signed_delta(
                initial_stats.face_count as i128,
                final_stats.face_count as i128,
            ),
        }
    }
}

fn signed_delta(before: i128, after: i128) -> i64 {
    (after - before).clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Category of a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Input path missing or not a readable file
    InputNotFound,
    /// Engine could not load the input as a mesh
    LoadFailure,
    /// A repair step raised an error
    RepairStepFailure,
    /// Output could not be written
    SaveFailure,
    Unclassified,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputNotFound => "InputNotFound",
            Self::LoadFailure => "LoadFailure",
            Self::RepairStepFailure => "RepairStepFailure",
            Self::SaveFailure => "SaveFailure",
            Self::Unclassified => "Unclassified",
        };
        f.write_str(name)
    }
}

/// Record of a failed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairFailure {
    #[serde(rename = "errorType")]
    pub kind: ErrorKind,
    #[serde(rename = "error")]
    pub message: String,
}

impl RepairFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Terminal result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum RepairResult {
    Success(RepairReport),
    Failure(RepairFailure),
}

impl RepairResult {
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure(RepairFailure::new(kind, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn report(&self) -> Option<&RepairReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }

    /// Process exit code: 0 on success, 1 on failure
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// JSON document with two-space indentation
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for RepairResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a, T> {
            success: bool,
            #[serde(flatten)]
            body: &'a T,
        }

        match self {
            Self::Success(report) => Tagged {
                success: true,
                body: report,
            }
            .serialize(serializer),
            Self::Failure(failure) => Tagged {
                success: false,
                body: failure,
            }
            .serialize(serializer),
        }
    }
}

impl From<RepairReport> for RepairResult {
    fn from(report: RepairReport) -> Self {
        Self::Success(report)
    }
}

impl From<RepairFailure> for RepairResult {
    fn from(failure: RepairFailure) -> Self {
        Self::Failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_report() -> RepairReport {
        RepairReport::new(
            "out.stl",
            1_000,
            684,
            MeshStats::new(10, 20),
            MeshStats::new(8, 12),
            RepairStep::SEQUENCE.to_vec(),
        )
    }

    #[test]
    fn test_differences_are_signed() {
        let report = sample_report();
        assert_eq!(report.size_difference, -316);
        assert_eq!(report.vertices_changed, -2);
        assert_eq!(report.faces_changed, -8);

        let grown = RepairReport::new("o", 10, 30, MeshStats::new(4, 2), MeshStats::new(4, 6), vec![]);
        assert_eq!(grown.size_difference, 20);
        assert_eq!(grown.faces_changed, 4);
    }

    #[test]
    fn test_success_json_shape() -> anyhow::Result<()> {
        let value: Value = serde_json::from_str(&RepairResult::from(sample_report()).to_json_pretty()?)?;

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["outputPath"], json!("out.stl"));
        assert_eq!(value["sizeDifference"], json!(-316));
        assert_eq!(value["initialStats"], json!({"vertices": 10, "faces": 20}));
        assert_eq!(value["repairSteps"][0], json!("remove_duplicate_faces"));
        assert_eq!(value["repairSteps"][7], json!("snap_borders"));
        Ok(())
    }

    #[test]
    fn test_failure_json_shape() -> anyhow::Result<()> {
        let result = RepairResult::failure(ErrorKind::InputNotFound, "Input file not found: x.stl");
        let value: Value = serde_json::from_str(&result.to_json_pretty()?)?;

        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "Input file not found: x.stl",
                "errorType": "InputNotFound",
            })
        );
        Ok(())
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RepairResult::from(sample_report()).exit_code(), 0);
        for kind in [
            ErrorKind::InputNotFound,
            ErrorKind::LoadFailure,
            ErrorKind::RepairStepFailure,
            ErrorKind::SaveFailure,
            ErrorKind::Unclassified,
        ] {
            assert_eq!(RepairResult::failure(kind, "boom").exit_code(), 1);
        }
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() -> anyhow::Result<()> {
        let text = RepairResult::failure(ErrorKind::SaveFailure, "x").to_json_pretty()?;
        assert!(text.starts_with("{\n  \"success\": false"));
        Ok(())
    }
}
