// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh exporters

use super::MeshFormat;
use crate::error::{EngineError, EngineResult};
use crate::geometry::Mesh;
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialization options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Binary encoding where the format has one (STL)
    pub binary: bool,
    /// Write per-vertex normals where the format can carry them (OBJ)
    pub include_normals: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            binary: true,
            include_normals: false,
        }
    }
}

/// Save a mesh, choosing the writer from the file extension (STL when unknown).
///
/// The data is written to a temporary file next to `path` and renamed into
/// place, so a failed save leaves no partial output behind.
pub fn save_mesh(mesh: &Mesh, path: &Path, options: SaveOptions) -> EngineResult<()> {
    let format = MeshFormat::from_path_or_stl(path);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| EngineError::io(path, e))?;
    {
        let mut writer = BufWriter::new(&mut tmp);
        match (format, options.binary) {
            (MeshFormat::Stl, true) => write_stl_binary(mesh, &mut writer),
            (MeshFormat::Stl, false) => write_stl_ascii(mesh, &mut writer),
            (MeshFormat::Obj, _) => write_obj(mesh, options.include_normals, &mut writer),
        }
        .and_then(|_| writer.flush())
        .map_err(|e| EngineError::io(path, e))?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| EngineError::io(path, e))?;
    }

    tmp.persist(path).map_err(|e| EngineError::io(path, e.error))?;

    debug!(
        "Saved {} faces to {} ({}{})",
        mesh.triangle_count(),
        path.display(),
        format.extension(),
        if format == MeshFormat::Stl && options.binary { ", binary" } else { "" }
    );
    Ok(())
}

/// Facet normal for STL output; zero for degenerate faces
fn facet_normal(mesh: &Mesh, face: usize) -> Vector3<f32> {
    mesh.face_normal(face)
        .map(|n| n.cast::<f32>())
        .unwrap_or_else(Vector3::zeros)
}

fn write_stl_binary<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let vertex = |idx: usize| {
        let p = mesh.vertices[idx].position;
        StlVertex::new([p.x as f32, p.y as f32, p.z as f32])
    };

    let triangles: Vec<StlTriangle> = mesh
        .triangles
        .iter()
        .enumerate()
        .map(|(face, tri)| {
            let n = facet_normal(mesh, face);
            StlTriangle {
                normal: Normal::new([n.x, n.y, n.z]),
                vertices: [vertex(tri.indices[0]), vertex(tri.indices[1]), vertex(tri.indices[2])],
            }
        })
        .collect();

    stl_io::write_stl(writer, triangles.iter())
}

fn write_stl_ascii<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "solid meshmend")?;

    for (face, tri) in mesh.triangles.iter().enumerate() {
        let n = facet_normal(mesh, face);
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for &idx in &tri.indices {
            let p = mesh.vertices[idx].position;
            writeln!(
                writer,
                "      vertex {:e} {:e} {:e}",
                p.x as f32, p.y as f32, p.z as f32
            )?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid meshmend")
}

fn write_obj<W: Write>(mesh: &Mesh, include_normals: bool, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# meshmend")?;
    writeln!(writer, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# Faces: {}", mesh.triangle_count())?;

    for vertex in &mesh.vertices {
        let p = vertex.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    if include_normals {
        for n in mesh.vertex_normals() {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for tri in &mesh.triangles {
            let [a, b, c] = tri.indices.map(|i| i + 1);
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
    } else {
        for tri in &mesh.triangles {
            let [a, b, c] = tri.indices.map(|i| i + 1);
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }

    Ok(())
}
