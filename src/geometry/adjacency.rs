// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edge connectivity queries

use super::Mesh;
use hashbrown::HashMap;

/// Undirected edge, stored with the smaller index first for consistent hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
}

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        if a < b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.v0 == vertex || self.v1 == vertex
    }
}

/// Edge to incident-face map for a mesh snapshot.
///
/// The map is not updated when the mesh changes; rebuild it after any
/// topological edit.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    faces: HashMap<Edge, Vec<usize>>,
}

impl EdgeMap {
    pub fn build(mesh: &Mesh) -> Self {
        let mut faces: HashMap<Edge, Vec<usize>> = HashMap::with_capacity(mesh.triangle_count() * 2);

        for (face, triangle) in mesh.triangles.iter().enumerate() {
            for (a, b) in triangle.edges() {
                faces.entry(Edge::new(a, b)).or_default().push(face);
            }
        }

        Self { faces }
    }

    /// Faces incident to an edge, in face-index order
    pub fn faces(&self, a: usize, b: usize) -> &[usize] {
        self.faces
            .get(&Edge::new(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.faces.len()
    }

    /// Edges with exactly one incident face
    pub fn boundary_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(edge, _)| *edge)
    }

    /// Edges with more than two incident faces, sorted for deterministic processing
    pub fn non_manifold_edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .faces
            .iter()
            .filter(|(_, faces)| faces.len() > 2)
            .map(|(edge, _)| *edge)
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn is_boundary(&self, a: usize, b: usize) -> bool {
        self.faces(a, b).len() == 1
    }

    /// Each edge shared by at most two faces
    pub fn is_manifold(&self) -> bool {
        self.faces.values().all(|faces| faces.len() <= 2)
    }

    /// Each edge shared by exactly two faces
    pub fn is_closed(&self) -> bool {
        self.faces.values().all(|faces| faces.len() == 2)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.faces.values().filter(|faces| faces.len() == 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Triangle, Vertex};

    #[test]
    fn test_edge_is_canonical() {
        assert_eq!(Edge::new(3, 1), Edge::new(1, 3));
        assert!(Edge::new(3, 1).contains(3));
    }

    #[test]
    fn test_open_cube_has_boundary() {
        let mut mesh = Primitive::cube(1.0).to_mesh();
        mesh.triangles.truncate(10);

        let edges = EdgeMap::build(&mesh);
        assert!(!edges.is_closed());
        assert!(edges.is_manifold());
        assert_eq!(edges.boundary_edge_count(), 4);
    }

    #[test]
    fn test_fin_is_non_manifold() {
        let mut mesh = Mesh::new();
        for (x, y, z) in [(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, -1.0, 0.0), (0.0, 0.0, 1.0)] {
            mesh.add_vertex(Vertex::from_coords(x, y, z));
        }
        mesh.add_triangle(Triangle::new([0, 1, 2]));
        mesh.add_triangle(Triangle::new([1, 0, 3]));
        mesh.add_triangle(Triangle::new([0, 1, 4]));

        let edges = EdgeMap::build(&mesh);
        assert_eq!(edges.non_manifold_edges(), vec![Edge::new(0, 1)]);
        assert!(!edges.is_manifold());
    }
}
