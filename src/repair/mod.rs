// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structural mesh repair operations.
//!
//! Every operation mutates the mesh in place, reports how many elements it
//! touched, and is a no-op on a closed, manifold, coherently oriented mesh
//! without duplicates.

mod duplicates;
mod holes;
mod manifold;
mod orient;
mod snap;

pub use duplicates::{remove_duplicate_faces, remove_duplicate_vertices, remove_unreferenced_vertices};
pub use holes::{close_holes, detect_holes, triangulate_loop, BoundaryLoop};
pub use manifold::{repair_non_manifold_edges, repair_non_manifold_vertices, NonManifoldEdgeMethod};
pub use orient::reorient_faces;
pub use snap::snap_borders;
