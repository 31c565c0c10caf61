// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry engine capability interface
//!
//! The repair pipeline only talks to meshes through [`MeshEngine`]. Any
//! geometry library can back it; [`NativeEngine`] is the in-crate
//! implementation built on [`crate::repair`] and [`crate::io`].

use crate::error::EngineResult;
use crate::geometry::Mesh;
use crate::io::{self, SaveOptions};
use crate::repair::{self, NonManifoldEdgeMethod};
use log::trace;
use std::path::Path;

/// Capability set consumed by the repair pipeline.
///
/// Handles are owned by the caller for the duration of one run and passed
/// back into every operation.
pub trait MeshEngine {
    /// Loaded mesh owned by a single pipeline run
    type Handle;

    fn load(&mut self, path: &Path) -> EngineResult<Self::Handle>;

    fn vertex_count(&self, handle: &Self::Handle) -> usize;

    fn face_count(&self, handle: &Self::Handle) -> usize;

    fn remove_duplicate_faces(&mut self, handle: &mut Self::Handle) -> EngineResult<()>;

    fn remove_duplicate_vertices(&mut self, handle: &mut Self::Handle) -> EngineResult<()>;

    fn remove_unreferenced_vertices(&mut self, handle: &mut Self::Handle) -> EngineResult<()>;

    fn repair_non_manifold_edges(
        &mut self,
        handle: &mut Self::Handle,
        method: NonManifoldEdgeMethod,
    ) -> EngineResult<()>;

    fn repair_non_manifold_vertices(
        &mut self,
        handle: &mut Self::Handle,
        displacement_ratio: f64,
    ) -> EngineResult<()>;

    fn close_holes(&mut self, handle: &mut Self::Handle, max_hole_size: usize) -> EngineResult<()>;

    fn reorient_faces(&mut self, handle: &mut Self::Handle) -> EngineResult<()>;

    fn snap_borders(&mut self, handle: &mut Self::Handle, threshold_percent: f64) -> EngineResult<()>;

    fn save(&mut self, handle: &Self::Handle, path: &Path, options: SaveOptions) -> EngineResult<()>;
}

/// In-crate engine operating on [`Mesh`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEngine;

impl NativeEngine {
    pub fn new() -> Self {
        Self
    }
}

impl MeshEngine for NativeEngine {
    type Handle = Mesh;

    fn load(&mut self, path: &Path) -> EngineResult<Mesh> {
        io::load_mesh(path)
    }

    fn vertex_count(&self, handle: &Mesh) -> usize {
        handle.vertex_count()
    }

    fn face_count(&self, handle: &Mesh) -> usize {
        handle.triangle_count()
    }

    fn remove_duplicate_faces(&mut self, handle: &mut Mesh) -> EngineResult<()> {
        let removed = repair::remove_duplicate_faces(handle);
        trace!("remove_duplicate_faces: {}", removed);
        Ok(())
    }

    fn remove_duplicate_vertices(&mut self, handle: &mut Mesh) -> EngineResult<()> {
        let merged = repair::remove_duplicate_vertices(handle);
        trace!("remove_duplicate_vertices: {}", merged);
        Ok(())
    }

    fn remove_unreferenced_vertices(&mut self, handle: &mut Mesh) -> EngineResult<()> {
        let removed = repair::remove_unreferenced_vertices(handle);
        trace!("remove_unreferenced_vertices: {}", removed);
        Ok(())
    }

    fn repair_non_manifold_edges(
        &mut self,
        handle: &mut Mesh,
        method: NonManifoldEdgeMethod,
    ) -> EngineResult<()> {
        let fixed = repair::repair_non_manifold_edges(handle, method);
        trace!("repair_non_manifold_edges: {}", fixed);
        Ok(())
    }

    fn repair_non_manifold_vertices(
        &mut self,
        handle: &mut Mesh,
        displacement_ratio: f64,
    ) -> EngineResult<()> {
        let split = repair::repair_non_manifold_vertices(handle, displacement_ratio);
        trace!("repair_non_manifold_vertices: {}", split);
        Ok(())
    }

    fn close_holes(&mut self, handle: &mut Mesh, max_hole_size: usize) -> EngineResult<()> {
        let filled = repair::close_holes(handle, max_hole_size);
        trace!("close_holes: {}", filled);
        Ok(())
    }

    fn reorient_faces(&mut self, handle: &mut Mesh) -> EngineResult<()> {
        let flipped = repair::reorient_faces(handle);
        trace!("reorient_faces: {}", flipped);
        Ok(())
    }

    fn snap_borders(&mut self, handle: &mut Mesh, threshold_percent: f64) -> EngineResult<()> {
        let snapped = repair::snap_borders(handle, threshold_percent);
        trace!("snap_borders: {}", snapped);
        Ok(())
    }

    fn save(&mut self, handle: &Mesh, path: &Path, options: SaveOptions) -> EngineResult<()> {
        io::save_mesh(handle, path, options)
    }
}
