// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed triangle mesh representation

use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Mesh vertex. Normals are derived on export, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// True if two corners reference the same vertex
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.indices;
        a == b || b == c || a == c
    }

    /// The three directed edges in winding order
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }

    /// Reverse the winding in place
    pub fn flip(&mut self) {
        self.indices.swap(1, 2);
    }

    /// Vertex indices sorted ascending, independent of winding
    pub fn sorted_indices(&self) -> [usize; 3] {
        let mut key = self.indices;
        key.sort_unstable();
        key
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    fn corners(&self, triangle: &Triangle) -> [Point3<f64>; 3] {
        let [a, b, c] = triangle.indices;
        [
            self.vertices[a].position,
            self.vertices[b].position,
            self.vertices[c].position,
        ]
    }

    /// Unnormalized face normal; its length is twice the face area
    pub fn face_cross(&self, face: usize) -> Vector3<f64> {
        let [p0, p1, p2] = self.corners(&self.triangles[face]);
        (p1 - p0).cross(&(p2 - p0))
    }

    pub fn face_area(&self, face: usize) -> f64 {
        self.face_cross(face).norm() * 0.5
    }

    /// Unit face normal, or `None` for zero-area faces
    pub fn face_normal(&self, face: usize) -> Option<Vector3<f64>> {
        let cross = self.face_cross(face);
        let len = cross.norm();
        if len > 1e-12 {
            Some(cross / len)
        } else {
            None
        }
    }

    pub fn face_centroid(&self, face: usize) -> Point3<f64> {
        let [p0, p1, p2] = self.corners(&self.triangles[face]);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Area-weighted vertex normals. Unreferenced vertices get +Z.
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];

        for (face, triangle) in self.triangles.iter().enumerate() {
            let cross = self.face_cross(face);
            for &idx in &triangle.indices {
                sums[idx] += cross;
            }
        }

        sums.into_iter()
            .map(|sum| {
                let len = sum.norm();
                if len > 1e-12 {
                    sum / len
                } else {
                    Vector3::new(0.0, 0.0, 1.0)
                }
            })
            .collect()
    }

    /// Rewrite every triangle index through `map`
    pub fn remap_indices(&mut self, map: &[usize]) {
        for triangle in &mut self.triangles {
            for idx in &mut triangle.indices {
                *idx = map[*idx];
            }
        }
    }

    /// Remove triangles with repeated vertex indices.
    /// Returns the number of triangles removed
    pub fn remove_degenerate_triangles(&mut self) -> usize {
        let original_count = self.triangles.len();
        self.triangles.retain(|triangle| !triangle.is_degenerate());
        original_count - self.triangles.len()
    }

    /// Keep only the vertices flagged in `keep`, compacting triangle indices.
    /// Every referenced vertex must be kept.
    pub fn retain_vertices(&mut self, keep: &[bool]) -> usize {
        let mut new_indices = vec![usize::MAX; self.vertices.len()];
        let mut new_vertices = Vec::with_capacity(self.vertices.len());

        for (old_idx, &kept) in keep.iter().enumerate() {
            if kept {
                new_indices[old_idx] = new_vertices.len();
                new_vertices.push(self.vertices[old_idx]);
            }
        }

        self.remap_indices(&new_indices);

        let removed = self.vertices.len() - new_vertices.len();
        self.vertices = new_vertices;
        removed
    }

    /// Index of the first triangle corner that points past the vertex list
    pub fn first_invalid_index(&self) -> Option<usize> {
        self.triangles
            .iter()
            .flat_map(|triangle| triangle.indices)
            .find(|&idx| idx >= self.vertices.len())
    }

    /// Signed volume enclosed by the surface; positive when faces point outward
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|triangle| {
                let [p0, p1, p2] = self.corners(triangle);
                p0.coords.dot(&p1.coords.cross(&p2.coords)) / 6.0
            })
            .sum()
    }
}
