// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Step-by-step narration for verbose runs

use super::{MeshStats, RepairStep};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

const PREFIX: &str = "[meshmend]";

/// Diagnostic narration sink. Defaults to stderr; never stdout.
pub struct Progress {
    sink: Box<dyn Write + Send>,
    enabled: bool,
}

impl Progress {
    /// Narration to stderr
    pub fn stderr() -> Self {
        Self::to_writer(io::stderr())
    }

    /// Narration to an arbitrary writer
    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Box::new(writer),
            enabled: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn loading(&mut self, path: &Path) {
        self.line(format_args!("Loading mesh from: {}", path.display()));
    }

    pub fn initial_stats(&mut self, stats: &MeshStats) {
        self.line(format_args!("Initial mesh: {}", stats));
    }

    /// `index` is zero-based
    pub fn step(&mut self, index: usize, step: RepairStep) {
        self.line(format_args!(
            "Step {}/{}: {}...",
            index + 1,
            RepairStep::SEQUENCE.len(),
            step.description()
        ));
    }

    pub fn final_stats(&mut self, stats: &MeshStats) {
        self.line(format_args!("Final mesh: {}", stats));
    }

    pub fn saving(&mut self, path: &Path) {
        self.line(format_args!("Saving repaired mesh to: {}", path.display()));
    }

    pub fn failed(&mut self, message: &str) {
        self.line(format_args!("Repair failed: {}", message));
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if !self.enabled {
            return;
        }
        // Narration is best effort; a closed stderr must not fail the run.
        let _ = writeln!(self.sink, "{} {}", PREFIX, args);
        let _ = self.sink.flush();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
