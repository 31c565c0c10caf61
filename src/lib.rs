// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! meshmend
//!
//! Repairs malformed triangle meshes with a fixed sequence of structural
//! fixes and reports before/after statistics as a structured result.

pub mod cli;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod io;
pub mod pipeline;
pub mod repair;

pub use engine::{MeshEngine, NativeEngine};
pub use error::{EngineError, EngineResult};
pub use geometry::{Mesh, Primitive};
pub use io::{load_mesh, save_mesh, SaveOptions};
pub use pipeline::{
    repair_file, ErrorKind, MeshRepairPipeline, MeshStats, RepairConfig, RepairResult, RepairStep,
};

/// Repair an in-memory mesh with the native steps, without touching disk.
///
/// Returns the repaired mesh; the input is left untouched.
pub fn repair_mesh(mesh: &Mesh, config: &RepairConfig) -> EngineResult<Mesh> {
    let mut engine = NativeEngine::new();
    let mut handle = mesh.clone();
    for step in RepairStep::SEQUENCE {
        step.apply(&mut engine, &mut handle, config)?;
    }
    Ok(handle)
}
