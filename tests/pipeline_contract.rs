// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pipeline orchestration tests against an instrumented engine

use meshmend::engine::MeshEngine;
use meshmend::io::SaveOptions;
use meshmend::pipeline::{
    ErrorKind, MeshRepairPipeline, MeshStats, Progress, RepairConfig, RepairResult, RepairStep,
};
use meshmend::repair::NonManifoldEdgeMethod;
use meshmend::{EngineError, EngineResult};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
struct FakeMesh {
    vertices: usize,
    faces: usize,
}

/// Records every call and reshapes counts the way a real repair might
#[derive(Default)]
struct RecordingEngine {
    calls: Vec<String>,
    fail_on: Option<&'static str>,
    initial: Option<(usize, usize)>,
}

impl RecordingEngine {
    fn failing_on(op: &'static str) -> Self {
        Self {
            fail_on: Some(op),
            ..Default::default()
        }
    }

    fn record(&mut self, op: &'static str, detail: String) -> EngineResult<()> {
        self.calls.push(if detail.is_empty() {
            op.to_string()
        } else {
            format!("{op}({detail})")
        });
        if self.fail_on == Some(op) {
            return Err(EngineError::Topology {
                details: format!("injected failure in {op}"),
            });
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.calls
            .iter()
            .map(|c| c.split('(').next().unwrap_or_default().to_string())
            .collect()
    }
}

impl MeshEngine for RecordingEngine {
    type Handle = FakeMesh;

    fn load(&mut self, _path: &Path) -> EngineResult<FakeMesh> {
        self.record("load", String::new())?;
        let (vertices, faces) = self.initial.unwrap_or((120, 200));
        Ok(FakeMesh { vertices, faces })
    }

    fn vertex_count(&self, handle: &FakeMesh) -> usize {
        handle.vertices
    }

    fn face_count(&self, handle: &FakeMesh) -> usize {
        handle.faces
    }

    fn remove_duplicate_faces(&mut self, handle: &mut FakeMesh) -> EngineResult<()> {
        self.record("remove_duplicate_faces", String::new())?;
        handle.faces -= 4;
        Ok(())
    }

    fn remove_duplicate_vertices(&mut self, handle: &mut FakeMesh) -> EngineResult<()> {
        self.record("remove_duplicate_vertices", String::new())?;
        handle.vertices -= 10;
        Ok(())
    }

    fn remove_unreferenced_vertices(&mut self, handle: &mut FakeMesh) -> EngineResult<()> {
        self.record("remove_unreferenced_vertices", String::new())?;
        handle.vertices -= 2;
        Ok(())
    }

    fn repair_non_manifold_edges(
        &mut self,
        _handle: &mut FakeMesh,
        method: NonManifoldEdgeMethod,
    ) -> EngineResult<()> {
        self.record("repair_non_manifold_edges", format!("{method:?}"))
    }

    fn repair_non_manifold_vertices(&mut self, _handle: &mut FakeMesh, ratio: f64) -> EngineResult<()> {
        self.record("repair_non_manifold_vertices", format!("{ratio}"))
    }

    fn close_holes(&mut self, handle: &mut FakeMesh, max_hole_size: usize) -> EngineResult<()> {
        self.record("close_holes", format!("{max_hole_size}"))?;
        handle.faces += 9;
        Ok(())
    }

    fn reorient_faces(&mut self, _handle: &mut FakeMesh) -> EngineResult<()> {
        self.record("reorient_faces", String::new())
    }

    fn snap_borders(&mut self, _handle: &mut FakeMesh, threshold_percent: f64) -> EngineResult<()> {
        self.record("snap_borders", format!("{threshold_percent}"))
    }

    fn save(&mut self, handle: &FakeMesh, path: &Path, options: SaveOptions) -> EngineResult<()> {
        self.record("save", format!("{}/{}", options.binary, options.include_normals))?;
        std::fs::write(path, vec![0u8; 84 + 50 * handle.faces]).map_err(|e| EngineError::io(path, e))
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

struct Workspace {
    _dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

fn workspace(input_bytes: usize) -> Workspace {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.stl");
    let output = dir.path().join("out.stl");
    std::fs::write(&input, vec![7u8; input_bytes]).unwrap();
    Workspace {
        _dir: dir,
        input,
        output,
    }
}

fn quiet(engine: RecordingEngine) -> MeshRepairPipeline<RecordingEngine> {
    MeshRepairPipeline::new(engine).with_progress(Progress::to_writer(io::sink()))
}

#[test]
fn test_steps_run_in_fixed_order() {
    let ws = workspace(500);
    let mut pipeline = quiet(RecordingEngine::default());

    let result = pipeline.repair(&ws.input, &ws.output, false);
    assert!(result.is_success());

    let mut expected = vec!["load".to_string()];
    expected.extend(RepairStep::SEQUENCE.iter().map(|s| s.name().to_string()));
    expected.push("save".to_string());
    assert_eq!(pipeline.engine().names(), expected);
}

#[test]
fn test_config_reaches_engine() {
    let ws = workspace(500);
    let config = RepairConfig {
        max_hole_size: 64,
        snap_threshold_percent: 0.5,
        non_manifold_vertex_displacement_ratio: 0.25,
        non_manifold_edge_method: NonManifoldEdgeMethod::SplitVertices,
        binary_output: false,
        save_vertex_normals: true,
    };
    let mut pipeline = MeshRepairPipeline::with_config(RecordingEngine::default(), config)
        .with_progress(Progress::to_writer(io::sink()));

    assert!(pipeline.repair(&ws.input, &ws.output, false).is_success());

    let calls = &pipeline.engine().calls;
    assert!(calls.contains(&"repair_non_manifold_edges(SplitVertices)".to_string()));
    assert!(calls.contains(&"repair_non_manifold_vertices(0.25)".to_string()));
    assert!(calls.contains(&"close_holes(64)".to_string()));
    assert!(calls.contains(&"snap_borders(0.5)".to_string()));
    assert!(calls.contains(&"save(false/true)".to_string()));
}

#[test]
fn test_default_constants_and_save_options() {
    let ws = workspace(500);
    let mut pipeline = quiet(RecordingEngine::default());

    pipeline.repair(&ws.input, &ws.output, false);

    let calls = &pipeline.engine().calls;
    assert!(calls.contains(&"repair_non_manifold_edges(RemoveFaces)".to_string()));
    assert!(calls.contains(&"repair_non_manifold_vertices(0)".to_string()));
    assert!(calls.contains(&"close_holes(30)".to_string()));
    assert!(calls.contains(&"snap_borders(1)".to_string()));
    assert!(calls.contains(&"save(true/false)".to_string()));
}

#[test]
fn test_stats_arithmetic() {
    for (input_bytes, initial) in [(500, (120, 200)), (100_000, (40, 30)), (84, (12, 20))] {
        let ws = workspace(input_bytes);
        let engine = RecordingEngine {
            initial: Some(initial),
            ..Default::default()
        };
        let mut pipeline = quiet(engine);

        let result = pipeline.repair(&ws.input, &ws.output, false);
        let report = result.report().expect("success");

        let final_faces = initial.1 - 4 + 9;
        assert_eq!(report.initial_stats, MeshStats::new(initial.0, initial.1));
        assert_eq!(report.final_stats, MeshStats::new(initial.0 - 12, final_faces));
        assert_eq!(report.original_size, input_bytes as u64);
        assert_eq!(report.repaired_size, (84 + 50 * final_faces) as u64);
        assert_eq!(
            report.size_difference,
            report.repaired_size as i64 - report.original_size as i64
        );
        assert_eq!(
            report.vertices_changed,
            report.final_stats.vertex_count as i64 - report.initial_stats.vertex_count as i64
        );
        assert_eq!(
            report.faces_changed,
            report.final_stats.face_count as i64 - report.initial_stats.face_count as i64
        );
        assert_eq!(report.output_path, ws.output.display().to_string());
        assert_eq!(report.repair_steps, RepairStep::SEQUENCE.to_vec());
    }
}

#[test]
fn test_missing_input_never_reaches_engine() {
    let ws = workspace(10);
    let missing = ws.input.with_file_name("nope.stl");
    let mut pipeline = quiet(RecordingEngine::default());

    let result = pipeline.repair(&missing, &ws.output, false);

    assert_eq!(result.error_kind(), Some(ErrorKind::InputNotFound));
    assert!(pipeline.engine().calls.is_empty());
    assert!(!ws.output.exists());
}

#[test]
fn test_load_failure() {
    let ws = workspace(10);
    let mut pipeline = quiet(RecordingEngine::failing_on("load"));

    let result = pipeline.repair(&ws.input, &ws.output, false);

    assert_eq!(result.error_kind(), Some(ErrorKind::LoadFailure));
    assert_eq!(pipeline.engine().names(), ["load"]);
    assert!(!ws.output.exists());
}

#[test]
fn test_step_failure_aborts_remaining_steps() {
    let ws = workspace(10);
    let mut pipeline = quiet(RecordingEngine::failing_on("close_holes"));

    let result = pipeline.repair(&ws.input, &ws.output, false);

    match &result {
        RepairResult::Failure(failure) => {
            assert_eq!(failure.kind, ErrorKind::RepairStepFailure);
            assert!(failure.message.contains("close_holes"));
            assert!(failure.message.contains("injected failure"));
        }
        other => panic!("expected failure, got {other:?}"),
    }

    let names = pipeline.engine().names();
    assert_eq!(names.last().map(String::as_str), Some("close_holes"));
    assert!(!names.iter().any(|n| n == "reorient_faces" || n == "save"));
    assert!(!ws.output.exists());
}

#[test]
fn test_every_step_failure_is_classified() {
    for step in RepairStep::SEQUENCE {
        let ws = workspace(10);
        let mut pipeline = quiet(RecordingEngine::failing_on(step.name()));

        let result = pipeline.repair(&ws.input, &ws.output, false);

        assert_eq!(result.error_kind(), Some(ErrorKind::RepairStepFailure), "{step}");
        assert_eq!(result.exit_code(), 1);
    }
}

#[test]
fn test_save_failure() {
    let ws = workspace(10);
    let mut pipeline = quiet(RecordingEngine::failing_on("save"));

    let result = pipeline.repair(&ws.input, &ws.output, false);

    assert_eq!(result.error_kind(), Some(ErrorKind::SaveFailure));
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_exit_code_mapping() {
    let ws = workspace(10);
    let ok = quiet(RecordingEngine::default()).repair(&ws.input, &ws.output, false);
    assert_eq!(ok.exit_code(), 0);

    let failed = quiet(RecordingEngine::failing_on("load")).repair(&ws.input, &ws.output, false);
    assert_eq!(failed.exit_code(), 1);
}

#[test]
fn test_verbose_narrates_to_progress_only() {
    let ws = workspace(10);
    let buf = SharedBuf::default();
    let mut pipeline =
        MeshRepairPipeline::new(RecordingEngine::default()).with_progress(Progress::to_writer(buf.clone()));

    let verbose = pipeline.repair(&ws.input, &ws.output, true);
    let narration = buf.text();
    assert!(narration.contains("Loading mesh from"));
    assert_eq!(narration.lines().filter(|l| l.contains("Step ")).count(), 8);
    assert!(narration.contains("Final mesh: 108 vertices, 205 faces"));

    let quiet_buf = SharedBuf::default();
    let mut pipeline = MeshRepairPipeline::new(RecordingEngine::default())
        .with_progress(Progress::to_writer(quiet_buf.clone()));
    let silent = pipeline.repair(&ws.input, &ws.output, false);

    assert!(quiet_buf.text().is_empty());
    assert_eq!(verbose.to_json_pretty().unwrap(), silent.to_json_pretty().unwrap());
}
