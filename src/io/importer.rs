// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh importers

use super::MeshFormat;
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Mesh, Triangle, Vertex};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a mesh, choosing the reader from the file extension.
///
/// Faces with repeated vertex indices are dropped; out-of-range indices and
/// meshes without faces are rejected.
pub fn load_mesh(path: &Path) -> EngineResult<Mesh> {
    let format = MeshFormat::from_path_or_stl(path);
    let mut mesh = match format {
        MeshFormat::Stl => load_stl(path)?,
        MeshFormat::Obj => load_obj(path)?,
    };

    if let Some(index) = mesh.first_invalid_index() {
        return Err(EngineError::InvalidIndex {
            index,
            vertex_count: mesh.vertex_count(),
        });
    }

    let dropped = mesh.remove_degenerate_triangles();
    if dropped > 0 {
        debug!("Dropped {} faces with repeated vertex indices", dropped);
    }

    if mesh.is_empty() {
        return Err(EngineError::EmptyMesh {
            details: format!("{} contains no faces", path.display()),
        });
    }

    debug!(
        "Loaded {} as {}: {} vertices, {} faces",
        path.display(),
        format.extension(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an STL file (binary or ASCII). Identical corner positions are shared.
fn load_stl(path: &Path) -> EngineResult<Mesh> {
    let file = File::open(path).map_err(|e| EngineError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| EngineError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());
    for v in &stl.vertices {
        mesh.add_vertex(Vertex::from_coords(v[0] as f64, v[1] as f64, v[2] as f64));
    }
    for face in &stl.faces {
        mesh.add_triangle(Triangle::new(face.vertices));
    }

    Ok(mesh)
}

/// Load a Wavefront OBJ file, merging all of its objects into one mesh.
fn load_obj(path: &Path) -> EngineResult<Mesh> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        },
    )
    .map_err(|e| match e {
        tobj::LoadError::OpenFileFailed => EngineError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "failed to open OBJ file"),
        ),
        other => EngineError::Parse {
            path: path.to_path_buf(),
            details: other.to_string(),
        },
    })?;

    let mut mesh = Mesh::new();
    for model in &models {
        let offset = mesh.vertex_count();
        for p in model.mesh.positions.chunks_exact(3) {
            mesh.add_vertex(Vertex::from_coords(p[0] as f64, p[1] as f64, p[2] as f64));
        }
        for f in model.mesh.indices.chunks_exact(3) {
            mesh.add_triangle(Triangle::new([
                f[0] as usize + offset,
                f[1] as usize + offset,
                f[2] as usize + offset,
            ]));
        }
    }

    Ok(mesh)
}
