// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh repair pipeline
//!
//! Loads a mesh, applies [`RepairStep::SEQUENCE`] through a [`MeshEngine`],
//! saves the result and reports what changed. Every run ends in a
//! [`RepairResult`]; errors never escape as `Err` or panics.

mod config;
mod progress;
mod result;
mod step;

pub use config::{RepairConfig, CONFIG_FILE};
pub use progress::Progress;
pub use result::{ErrorKind, MeshStats, RepairFailure, RepairReport, RepairResult};
pub use step::RepairStep;

use crate::engine::{MeshEngine, NativeEngine};
use crate::error::EngineError;
use log::{debug, info};
use std::path::Path;

/// Orchestrates one repair run at a time over an engine
pub struct MeshRepairPipeline<E: MeshEngine> {
    engine: E,
    config: RepairConfig,
    progress: Progress,
}

impl<E: MeshEngine> MeshRepairPipeline<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, RepairConfig::default())
    }

    pub fn with_config(engine: E, config: RepairConfig) -> Self {
        Self {
            engine,
            config,
            progress: Progress::stderr(),
        }
    }

    /// Replace the narration sink used for verbose runs
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Repair `input` into `output`. With `verbose`, narrates each phase to
    /// the progress sink.
    pub fn repair(
        &mut self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        verbose: bool,
    ) -> RepairResult {
        let (input, output) = (input.as_ref(), output.as_ref());
        self.progress.set_enabled(verbose);

        match self.run(input, output) {
            Ok(report) => {
                info!(
                    "Repaired {} -> {}: {} vertices, {} faces",
                    input.display(),
                    output.display(),
                    report.vertices_changed,
                    report.faces_changed
                );
                RepairResult::Success(report)
            }
            Err(failure) => {
                self.progress.failed(&failure.message);
                info!("Repair of {} failed ({})", input.display(), failure.kind);
                RepairResult::Failure(failure)
            }
        }
    }

    fn run(&mut self, input: &Path, output: &Path) -> Result<RepairReport, RepairFailure> {
        if !input.is_file() {
            return Err(RepairFailure::new(
                ErrorKind::InputNotFound,
                format!("Input file not found: {}", input.display()),
            ));
        }
        let original_size = file_size(input)?;

        self.progress.loading(input);
        let mut handle = self
            .engine
            .load(input)
            .map_err(|e| classify(ErrorKind::LoadFailure, e, None))?;

        let initial_stats = self.stats(&handle);
        self.progress.initial_stats(&initial_stats);

        for (index, step) in RepairStep::SEQUENCE.iter().enumerate() {
            self.progress.step(index, *step);
            step.apply(&mut self.engine, &mut handle, &self.config)
                .map_err(|e| classify(ErrorKind::RepairStepFailure, e, Some(*step)))?;
        }

        let final_stats = self.stats(&handle);
        self.progress.final_stats(&final_stats);

        self.progress.saving(output);
        self.engine
            .save(&handle, output, self.config.save_options())
            .map_err(|e| classify(ErrorKind::SaveFailure, e, None))?;
        drop(handle);

        let repaired_size = file_size(output)?;

        Ok(RepairReport::new(
            output.display().to_string(),
            original_size,
            repaired_size,
            initial_stats,
            final_stats,
            RepairStep::SEQUENCE.to_vec(),
        ))
    }

    fn stats(&self, handle: &E::Handle) -> MeshStats {
        MeshStats::new(self.engine.vertex_count(handle), self.engine.face_count(handle))
    }
}

impl Default for MeshRepairPipeline<NativeEngine> {
    fn default() -> Self {
        Self::new(NativeEngine::new())
    }
}

fn classify(kind: ErrorKind, error: EngineError, step: Option<RepairStep>) -> RepairFailure {
    debug!("{} error during {:?}: {}", error.category(), kind, error);
    let message = match step {
        Some(step) => format!("{} failed: {}", step, error),
        None => error.to_string(),
    };
    RepairFailure::new(kind, message)
}

fn file_size(path: &Path) -> Result<u64, RepairFailure> {
    std::fs::metadata(path).map(|m| m.len()).map_err(|e| {
        RepairFailure::new(
            ErrorKind::Unclassified,
            format!("Failed to stat {}: {}", path.display(), e),
        )
    })
}

/// Repair a file with the native engine and default configuration
pub fn repair_file(input: impl AsRef<Path>, output: impl AsRef<Path>, verbose: bool) -> RepairResult {
    MeshRepairPipeline::default().repair(input, output, verbose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::io::{save_mesh, SaveOptions};
    use tempfile::TempDir;

    #[test]
    fn test_clean_cube_is_unchanged() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let input = dir.path().join("cube.stl");
        let output = dir.path().join("fixed.stl");
        save_mesh(&Primitive::cube(2.0).to_mesh(), &input, SaveOptions::default())?;

        let result = repair_file(&input, &output, false);
        let report = result.report().expect("success");

        assert_eq!(report.initial_stats, MeshStats::new(8, 12));
        assert_eq!(report.final_stats, MeshStats::new(8, 12));
        assert_eq!(report.size_difference, 0);
        assert_eq!(report.repair_steps.len(), 8);
        assert!(output.exists());
        Ok(())
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.stl");

        let result = repair_file("/nonexistent.stl", &output, false);

        assert_eq!(result.error_kind(), Some(ErrorKind::InputNotFound));
        assert!(!output.exists());
    }

    #[test]
    fn test_directory_as_input_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = repair_file(dir.path(), dir.path().join("out.stl"), false);
        assert_eq!(result.error_kind(), Some(ErrorKind::InputNotFound));
    }
}
