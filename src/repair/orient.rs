// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Coherent face orientation

use crate::geometry::{EdgeMap, Mesh};
use log::{debug, info};
use std::collections::VecDeque;

/// True if `face` walks the edge a->b in that direction
fn walks(face: &[usize; 3], a: usize, b: usize) -> bool {
    (0..3).any(|i| face[i] == a && face[(i + 1) % 3] == b)
}

/// Orient faces coherently within each connected component.
///
/// Breadth-first flood fill across manifold edges: a neighbour that walks a
/// shared edge in the same direction as an already-oriented face is flipped.
/// The lowest-index face of each component keeps its winding.
/// Returns the number of faces flipped
pub fn reorient_faces(mesh: &mut Mesh) -> usize {
    let face_count = mesh.triangle_count();
    if face_count == 0 {
        return 0;
    }

    let edges = EdgeMap::build(mesh);
    let mut visited = vec![false; face_count];
    let mut flipped = 0;
    let mut components = 0;
    let mut queue: VecDeque<usize> = VecDeque::new();

    for seed in 0..face_count {
        if visited[seed] {
            continue;
        }
        components += 1;
        visited[seed] = true;
        queue.push_back(seed);

        while let Some(face) = queue.pop_front() {
            // Flips are applied eagerly, so this reads the settled winding
            for (a, b) in mesh.triangles[face].edges() {
                let shared = edges.faces(a, b);
                if shared.len() != 2 {
                    continue;
                }
                let neighbour = if shared[0] == face { shared[1] } else { shared[0] };
                if visited[neighbour] {
                    continue;
                }
                visited[neighbour] = true;

                if walks(&mesh.triangles[neighbour].indices, a, b) {
                    mesh.triangles[neighbour].flip();
                    flipped += 1;
                }
                queue.push_back(neighbour);
            }
        }
    }

    if flipped > 0 {
        info!(
            "Re-oriented {} faces across {} components",
            flipped, components
        );
    } else {
        debug!("Orientation already coherent ({} components)", components);
    }
    flipped
}
