// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and connectivity

mod adjacency;
mod bbox;
mod mesh;
mod primitives;

pub use adjacency::{Edge, EdgeMap};
pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle, Vertex};
pub use primitives::Primitive;
