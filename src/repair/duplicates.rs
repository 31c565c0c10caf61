// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Duplicate and unreferenced element removal

use crate::geometry::Mesh;
use hashbrown::{HashMap, HashSet};
use log::debug;

/// Remove faces that reference the same vertex set as an earlier face,
/// regardless of corner order or winding.
/// Returns the number of faces removed
pub fn remove_duplicate_faces(mesh: &mut Mesh) -> usize {
    let original_count = mesh.triangles.len();
    let mut seen: HashSet<[usize; 3]> = HashSet::with_capacity(original_count);

    mesh.triangles
        .retain(|triangle| seen.insert(triangle.sorted_indices()));

    let removed = original_count - mesh.triangles.len();
    if removed > 0 {
        debug!("Removed {} duplicate faces", removed);
    }
    removed
}

/// Hash key for exact coordinate equality; folds -0.0 into 0.0
fn position_key(coords: [f64; 3]) -> [u64; 3] {
    coords.map(|c| if c == 0.0 { 0.0f64.to_bits() } else { c.to_bits() })
}

/// Merge vertices with identical coordinates into their first occurrence.
/// Faces that collapse as a result are removed.
/// Returns the number of vertices merged away
pub fn remove_duplicate_vertices(mesh: &mut Mesh) -> usize {
    if mesh.vertices.is_empty() {
        return 0;
    }

    let original_count = mesh.vertices.len();
    let mut first_at: HashMap<[u64; 3], usize> = HashMap::with_capacity(original_count);
    let mut new_indices = Vec::with_capacity(original_count);
    let mut new_vertices = Vec::with_capacity(original_count);

    for vertex in &mesh.vertices {
        let p = vertex.position;
        let index = *first_at.entry(position_key([p.x, p.y, p.z])).or_insert_with(|| {
            new_vertices.push(*vertex);
            new_vertices.len() - 1
        });
        new_indices.push(index);
    }

    mesh.remap_indices(&new_indices);
    mesh.vertices = new_vertices;

    let merged = original_count - mesh.vertices.len();
    let collapsed = mesh.remove_degenerate_triangles();
    if merged > 0 {
        debug!(
            "Merged {} duplicate vertices ({} faces collapsed)",
            merged, collapsed
        );
    }
    merged
}

/// Remove vertices not referenced by any face.
/// Returns the number of vertices removed
pub fn remove_unreferenced_vertices(mesh: &mut Mesh) -> usize {
    let mut used = vec![false; mesh.vertices.len()];
    for triangle in &mesh.triangles {
        for &idx in &triangle.indices {
            used[idx] = true;
        }
    }

    let removed = mesh.retain_vertices(&used);
    if removed > 0 {
        debug!("Removed {} unreferenced vertices", removed);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Triangle, Vertex};

    #[test]
    fn test_duplicate_faces_any_winding() {
        let mut mesh = Primitive::cube(1.0).to_mesh();
        let first = mesh.triangles[0];
        let mut flipped = first;
        flipped.flip();
        mesh.add_triangle(first);
        mesh.add_triangle(flipped);

        assert_eq!(remove_duplicate_faces(&mut mesh), 2);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.triangles[0], first);
    }

    #[test]
    fn test_duplicate_vertices_are_merged() {
        // Triangle soup: two faces sharing an edge but not indices
        let mut mesh = Mesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.add_vertex(Vertex::from_coords(x, y, 0.0));
        }
        mesh.add_triangle(Triangle::new([0, 1, 2]));
        mesh.add_triangle(Triangle::new([3, 4, 5]));

        assert_eq!(remove_duplicate_vertices(&mut mesh), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangles[1].indices, [1, 3, 2]);
    }

    #[test]
    fn test_negative_zero_is_a_duplicate() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.add_vertex(Vertex::from_coords(-0.0, 1.0, 0.0));
        mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.add_triangle(Triangle::new([0, 2, 3]));
        mesh.add_triangle(Triangle::new([1, 3, 2]));

        assert_eq!(remove_duplicate_vertices(&mut mesh), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_collapsed_faces_are_dropped() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.add_vertex(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.add_vertex(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.add_triangle(Triangle::new([0, 1, 2]));

        remove_duplicate_vertices(&mut mesh);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_unreferenced_vertices_removed() {
        let mut mesh = Primitive::cube(1.0).to_mesh();
        mesh.vertices.push(Vertex::from_coords(5.0, 5.0, 5.0));

        assert_eq!(remove_unreferenced_vertices(&mut mesh), 1);
        assert_eq!(mesh.vertex_count(), 8);
    }

    #[test]
    fn test_clean_mesh_untouched() {
        let mut mesh = Primitive::sphere(3.0, 10).to_mesh();
        assert_eq!(remove_duplicate_faces(&mut mesh), 0);
        assert_eq!(remove_duplicate_vertices(&mut mesh), 0);
        assert_eq!(remove_unreferenced_vertices(&mut mesh), 0);
    }
}
