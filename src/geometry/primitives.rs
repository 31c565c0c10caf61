// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closed reference solids used by tests and benchmarks

use super::{Mesh, Triangle, Vertex};
use nalgebra::Point3;
use std::f64::consts::PI;

/// Geometric primitives. Generated meshes are welded, closed and
/// oriented outward.
pub enum Primitive {
    Cube { size: f64 },
    Sphere { r: f64, segments: u32 },
}

impl Primitive {
    /// Axis-aligned cube centered on the origin
    pub fn cube(size: f64) -> Self {
        Self::Cube { size }
    }

    /// UV sphere with `segments` stacks and slices (minimum 3)
    pub fn sphere(r: f64, segments: u32) -> Self {
        Self::Sphere {
            r,
            segments: segments.max(3),
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cube { size } => generate_cube_mesh(*size),
            Self::Sphere { r, segments } => generate_sphere_mesh(*r, *segments),
        }
    }
}

fn generate_cube_mesh(size: f64) -> Mesh {
    let h = size / 2.0;
    let mut mesh = Mesh::with_capacity(8, 12);

    for (x, y, z) in [
        (-h, -h, -h),
        (h, -h, -h),
        (h, h, -h),
        (-h, h, -h),
        (-h, -h, h),
        (h, -h, h),
        (h, h, h),
        (-h, h, h),
    ] {
        mesh.add_vertex(Vertex::new(Point3::new(x, y, z)));
    }

    for indices in [
        // z+
        [4, 5, 6],
        [4, 6, 7],
        // z-
        [1, 0, 3],
        [1, 3, 2],
        // x+
        [5, 1, 2],
        [5, 2, 6],
        // x-
        [0, 4, 7],
        [0, 7, 3],
        // y+
        [7, 6, 2],
        [7, 2, 3],
        // y-
        [0, 1, 5],
        [0, 5, 4],
    ] {
        mesh.add_triangle(Triangle::new(indices));
    }

    mesh
}

fn generate_sphere_mesh(radius: f64, segments: u32) -> Mesh {
    let stacks = segments as usize;
    let slices = segments as usize;
    let mut mesh = Mesh::new();

    let north = mesh.add_vertex(Vertex::from_coords(0.0, radius, 0.0));

    // Rings 1..stacks, without a duplicated seam column
    for i in 1..stacks {
        let phi = PI * i as f64 / stacks as f64;
        let y = radius * phi.cos();
        let r = radius * phi.sin();

        for j in 0..slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            mesh.add_vertex(Vertex::from_coords(r * theta.cos(), y, r * theta.sin()));
        }
    }

    let south = mesh.add_vertex(Vertex::from_coords(0.0, -radius, 0.0));
    let ring = |i: usize, j: usize| 1 + (i - 1) * slices + j % slices;

    for j in 0..slices {
        mesh.add_triangle(Triangle::new([north, ring(1, j + 1), ring(1, j)]));
    }

    for i in 1..stacks - 1 {
        for j in 0..slices {
            let u0 = ring(i, j);
            let u1 = ring(i, j + 1);
            let l0 = ring(i + 1, j);
            let l1 = ring(i + 1, j + 1);
            mesh.add_triangle(Triangle::new([u0, u1, l1]));
            mesh.add_triangle(Triangle::new([u0, l1, l0]));
        }
    }

    for j in 0..slices {
        mesh.add_triangle(Triangle::new([ring(stacks - 1, j), ring(stacks - 1, j + 1), south]));
    }

    mesh
}
