// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Non-manifold edge and vertex repair

use crate::geometry::{Edge, EdgeMap, Mesh, Vertex};
use hashbrown::HashMap;
use log::debug;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Strategy for edges shared by more than two faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonManifoldEdgeMethod {
    /// Delete the smallest extra faces until two remain on the edge
    #[default]
    RemoveFaces,
    /// Give the extra faces private copies of the edge endpoints
    SplitVertices,
}

/// Faces beyond the two largest on every non-manifold edge, in edge order,
/// paired with the edge that condemned them. A face is reported at most once.
fn excess_faces(mesh: &Mesh, edges: &EdgeMap) -> Vec<(usize, Edge)> {
    let mut taken = vec![false; mesh.triangle_count()];
    let mut excess = Vec::new();

    for edge in edges.non_manifold_edges() {
        let mut live: Vec<usize> = edges
            .faces(edge.v0, edge.v1)
            .iter()
            .copied()
            .filter(|&face| !taken[face])
            .collect();
        if live.len() <= 2 {
            continue;
        }

        live.sort_by(|&a, &b| {
            mesh.face_area(b)
                .total_cmp(&mesh.face_area(a))
                .then(a.cmp(&b))
        });

        for &face in &live[2..] {
            taken[face] = true;
            excess.push((face, edge));
        }
    }

    excess
}

/// Make every edge border at most two faces.
/// Returns the number of faces removed or detached
pub fn repair_non_manifold_edges(mesh: &mut Mesh, method: NonManifoldEdgeMethod) -> usize {
    let edges = EdgeMap::build(mesh);
    let excess = excess_faces(mesh, &edges);
    if excess.is_empty() {
        return 0;
    }

    match method {
        NonManifoldEdgeMethod::RemoveFaces => {
            let mut drop = vec![false; mesh.triangle_count()];
            for &(face, _) in &excess {
                drop[face] = true;
            }
            let mut face = 0;
            mesh.triangles.retain(|_| {
                let keep = !drop[face];
                face += 1;
                keep
            });
        }
        NonManifoldEdgeMethod::SplitVertices => {
            for &(face, edge) in &excess {
                for corner in [edge.v0, edge.v1] {
                    let original = mesh.vertices[corner];
                    let copy = mesh.add_vertex(original);
                    for idx in mesh.triangles[face].indices.iter_mut() {
                        if *idx == corner {
                            *idx = copy;
                        }
                    }
                }
            }
        }
    }

    debug!(
        "Repaired non-manifold edges: {} faces {}",
        excess.len(),
        match method {
            NonManifoldEdgeMethod::RemoveFaces => "removed",
            NonManifoldEdgeMethod::SplitVertices => "detached",
        }
    );
    excess.len()
}

/// Group the faces around `vertex` into fans connected through edges that
/// contain the vertex. Fans are ordered by their lowest face index.
fn fans_around(mesh: &Mesh, vertex: usize, faces: &[usize]) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..faces.len()).collect();

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    // Faces keyed by the opposite end of each spoke edge
    let mut spokes: HashMap<usize, usize> = HashMap::new();
    for (local, &face) in faces.iter().enumerate() {
        for &other in &mesh.triangles[face].indices {
            if other == vertex {
                continue;
            }
            match spokes.get(&other) {
                Some(&first) => {
                    let (ra, rb) = (find(&mut parent, first), find(&mut parent, local));
                    if ra != rb {
                        parent[ra.max(rb)] = ra.min(rb);
                    }
                }
                None => {
                    spokes.insert(other, local);
                }
            }
        }
    }

    let mut fans: Vec<Vec<usize>> = Vec::new();
    let mut fan_of_root: HashMap<usize, usize> = HashMap::new();
    for local in 0..faces.len() {
        let root = find(&mut parent, local);
        let slot = *fan_of_root.entry(root).or_insert_with(|| {
            fans.push(Vec::new());
            fans.len() - 1
        });
        fans[slot].push(faces[local]);
    }
    fans
}

/// Split vertices whose incident faces form more than one fan. Each extra fan
/// gets its own copy of the vertex, moved `displacement_ratio` of the way
/// toward the fan centroid.
/// Returns the number of vertex copies created
pub fn repair_non_manifold_vertices(mesh: &mut Mesh, displacement_ratio: f64) -> usize {
    let vertex_count = mesh.vertex_count();
    let mut vertex_faces: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for (face, triangle) in mesh.triangles.iter().enumerate() {
        for &idx in &triangle.indices {
            vertex_faces[idx].push(face);
        }
    }

    let mut created = 0;
    for vertex in 0..vertex_count {
        if vertex_faces[vertex].len() < 2 {
            continue;
        }

        let fans = fans_around(mesh, vertex, &vertex_faces[vertex]);
        for fan in fans.iter().skip(1) {
            let position = mesh.vertices[vertex].position;
            let centroid = fan
                .iter()
                .fold(Point3::origin(), |acc, &face| acc + mesh.face_centroid(face).coords)
                / fan.len() as f64;
            let moved = position + (centroid - position) * displacement_ratio;

            let copy = mesh.add_vertex(Vertex::new(moved));
            for &face in fan {
                for idx in mesh.triangles[face].indices.iter_mut() {
                    if *idx == vertex {
                        *idx = copy;
                    }
                }
            }
            created += 1;
        }
    }

    if created > 0 {
        debug!("Split non-manifold vertices: {} copies created", created);
    }
    created
}
