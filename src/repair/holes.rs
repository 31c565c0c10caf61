// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Hole detection and filling
//!
//! A hole is a closed loop of boundary edges (edges with a single adjacent
//! face). Loops are traced against the winding of the faces that border them,
//! so triangles emitted in loop order are oriented consistently with their
//! neighbours.

use crate::geometry::{EdgeMap, Mesh, Triangle};
use hashbrown::{HashMap, HashSet};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};

/// Ordered boundary loop. Filling triangles should follow this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    pub vertices: Vec<usize>,
}

impl BoundaryLoop {
    /// Number of edges (and vertices) in the loop
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_valid(&self) -> bool {
        self.vertices.len() >= 3
    }
}

/// Trace every closed boundary loop in the mesh.
///
/// Open boundary chains (which only occur around non-manifold vertices) are
/// reported in the log and skipped.
pub fn detect_holes(mesh: &Mesh) -> Vec<BoundaryLoop> {
    let edges = EdgeMap::build(mesh);

    // A face edge a->b on the boundary becomes hole edge b->a
    let mut next: HashMap<usize, Vec<usize>> = HashMap::new();
    for triangle in &mesh.triangles {
        for (a, b) in triangle.edges() {
            if edges.is_boundary(a, b) {
                next.entry(b).or_default().push(a);
            }
        }
    }

    if next.is_empty() {
        return Vec::new();
    }

    let mut starts: Vec<usize> = next.keys().copied().collect();
    starts.sort_unstable();

    let mut used: HashSet<(usize, usize)> = HashSet::new();
    let mut loops = Vec::new();

    for start in starts {
        let mut vertices = Vec::new();
        let mut current = start;
        let closed = loop {
            let step = next
                .get(&current)
                .and_then(|targets| targets.iter().find(|&&t| !used.contains(&(current, t))));

            let Some(&target) = step else {
                break false;
            };

            used.insert((current, target));
            vertices.push(current);
            current = target;

            if current == start {
                break true;
            }
        };

        if vertices.is_empty() {
            continue;
        }
        if !closed {
            warn!("Boundary chain starting at vertex {} is not closed", start);
            continue;
        }

        let hole = BoundaryLoop { vertices };
        if hole.is_valid() {
            loops.push(hole);
        }
    }

    debug!(
        "Detected {} holes, sizes: {:?}",
        loops.len(),
        loops.iter().map(BoundaryLoop::edge_count).collect::<Vec<_>>()
    );

    loops
}

/// Newell normal of the loop; +Z when the loop is degenerate
fn loop_normal(positions: &[Point3<f64>]) -> Vector3<f64> {
    let n = positions.len();
    let centroid = positions
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / n as f64;

    let mut normal = Vector3::zeros();
    for i in 0..n {
        let v0 = positions[i].coords - centroid;
        let v1 = positions[(i + 1) % n].coords - centroid;
        normal += v0.cross(&v1);
    }

    let len = normal.norm();
    if len > f64::EPSILON {
        normal / len
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    }
}

/// Triangulate a boundary loop by ear clipping, falling back to a fan when no
/// ear can be found.
pub fn triangulate_loop(mesh: &Mesh, hole: &BoundaryLoop) -> Vec<Triangle> {
    let n = hole.vertices.len();
    if n < 3 {
        return Vec::new();
    }

    let positions: Vec<Point3<f64>> = hole
        .vertices
        .iter()
        .map(|&idx| mesh.vertices[idx].position)
        .collect();
    let normal = loop_normal(&positions);

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            let prev = remaining[(i + len - 1) % len];
            let next = remaining[(i + 1) % len];
            is_ear(&positions, &remaining, prev, remaining[i], next, &normal)
        });

        let Some(i) = ear else {
            warn!(
                "Ear clipping stuck with {} vertices remaining, using fan triangulation",
                len
            );
            break;
        };

        let prev = remaining[(i + len - 1) % len];
        let next = remaining[(i + 1) % len];
        triangles.push(Triangle::new([
            hole.vertices[prev],
            hole.vertices[remaining[i]],
            hole.vertices[next],
        ]));
        remaining.remove(i);
    }

    let anchor = remaining[0];
    for pair in remaining[1..].windows(2) {
        triangles.push(Triangle::new([
            hole.vertices[anchor],
            hole.vertices[pair[0]],
            hole.vertices[pair[1]],
        ]));
    }

    triangles
}

fn is_ear(
    positions: &[Point3<f64>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    normal: &Vector3<f64>,
) -> bool {
    let (a, b, c) = (positions[prev], positions[curr], positions[next]);
    let cross = (b - a).cross(&(c - a));
    if cross.norm() <= f64::EPSILON {
        return false;
    }
    // Reflex corner
    if cross.dot(normal) <= 0.0 {
        return false;
    }

    remaining
        .iter()
        .filter(|&&idx| idx != prev && idx != curr && idx != next)
        .all(|&idx| !point_in_triangle(&positions[idx], &a, &b, &c, normal))
}

/// Point-in-triangle test after dropping the axis most aligned with `normal`
fn point_in_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    normal: &Vector3<f64>,
) -> bool {
    let abs = normal.abs();
    let project = |q: &Point3<f64>| -> (f64, f64) {
        if abs.z >= abs.x && abs.z >= abs.y {
            (q.x, q.y)
        } else if abs.y >= abs.x {
            (q.x, q.z)
        } else {
            (q.y, q.z)
        }
    };

    let (p, a, b, c) = (project(p), project(a), project(b), project(c));
    let sign = |p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)| {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    };

    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Fill every hole with at most `max_hole_size` boundary edges.
/// Returns the number of holes filled
pub fn close_holes(mesh: &mut Mesh, max_hole_size: usize) -> usize {
    let holes = detect_holes(mesh);

    let (fillable, skipped): (Vec<_>, Vec<_>) = holes
        .into_iter()
        .partition(|hole| hole.edge_count() <= max_hole_size);

    for hole in &skipped {
        warn!(
            "Skipping hole with {} edges (max: {})",
            hole.edge_count(),
            max_hole_size
        );
    }

    let mut existing: HashSet<[usize; 3]> =
        mesh.triangles.iter().map(Triangle::sorted_indices).collect();

    let mut filled = 0;
    for hole in &fillable {
        let triangles = triangulate_loop(mesh, hole);
        if triangles.is_empty() {
            continue;
        }
        // A loop bounding a lone face would be capped with that face's twin
        if triangles
            .iter()
            .any(|t| existing.contains(&t.sorted_indices()))
        {
            debug!(
                "Skipping hole with {} edges: fill would duplicate an existing face",
                hole.edge_count()
            );
            continue;
        }
        existing.extend(triangles.iter().map(Triangle::sorted_indices));
        mesh.triangles.extend(triangles);
        filled += 1;
    }

    if filled > 0 {
        info!("Closed {} holes", filled);
    }
    filled
}
