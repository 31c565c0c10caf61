// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Border snapping: merge near-coincident boundary vertices

use crate::geometry::{EdgeMap, Mesh};
use hashbrown::{HashMap, HashSet};
use log::debug;

type Cell = (i64, i64, i64);

fn cell_of(p: &nalgebra::Point3<f64>, size: f64) -> Cell {
    (
        (p.x / size).floor() as i64,
        (p.y / size).floor() as i64,
        (p.z / size).floor() as i64,
    )
}

/// Merge boundary vertices lying within `threshold_percent` percent of the
/// bounding-box diagonal of each other. Vertices joined by an edge are never
/// merged. Each vertex collapses onto the lowest-index boundary vertex in
/// reach; faces that degenerate are removed and freed vertices compacted.
/// Returns the number of vertices snapped away
pub fn snap_borders(mesh: &mut Mesh, threshold_percent: f64) -> usize {
    let threshold = mesh.bounding_box().diagonal() * threshold_percent / 100.0;
    if !(threshold > 0.0) {
        return 0;
    }

    let edges = EdgeMap::build(mesh);
    let mut on_border = vec![false; mesh.vertex_count()];
    for edge in edges.boundary_edges() {
        on_border[edge.v0] = true;
        on_border[edge.v1] = true;
    }

    let border: Vec<usize> = (0..mesh.vertex_count()).filter(|&v| on_border[v]).collect();
    if border.len() < 2 {
        return 0;
    }

    let mut linked: HashMap<usize, HashSet<usize>> = HashMap::new();
    for triangle in &mesh.triangles {
        for (a, b) in triangle.edges() {
            if on_border[a] && on_border[b] {
                linked.entry(a).or_default().insert(b);
                linked.entry(b).or_default().insert(a);
            }
        }
    }

    let mut grid: HashMap<Cell, Vec<usize>> = HashMap::new();
    for &v in &border {
        grid.entry(cell_of(&mesh.vertices[v].position, threshold))
            .or_default()
            .push(v);
    }

    let mut target: Vec<usize> = (0..mesh.vertex_count()).collect();
    let mut settled = vec![false; mesh.vertex_count()];
    let mut keep = vec![true; mesh.vertex_count()];
    let mut snapped = 0;

    for &v in &border {
        if settled[v] {
            continue;
        }
        settled[v] = true;

        let p = mesh.vertices[v].position;
        let (cx, cy, cz) = cell_of(&p, threshold);
        let mut reach: Vec<usize> = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(cell) = grid.get(&(cx + dx, cy + dy, cz + dz)) {
                        reach.extend(cell.iter().copied());
                    }
                }
            }
        }
        reach.sort_unstable();

        for w in reach {
            if settled[w] || (mesh.vertices[w].position - p).norm() > threshold {
                continue;
            }
            if linked.get(&v).is_some_and(|n| n.contains(&w)) {
                continue;
            }
            settled[w] = true;
            target[w] = v;
            keep[w] = false;
            snapped += 1;
        }
    }

    if snapped == 0 {
        return 0;
    }

    mesh.remap_indices(&target);
    let collapsed = mesh.remove_degenerate_triangles();
    mesh.retain_vertices(&keep);

    debug!(
        "Snapped {} border vertices within {:.6} ({} faces collapsed)",
        snapped, threshold, collapsed
    );
    snapped
}
