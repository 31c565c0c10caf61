// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh importing and exporting

mod exporter;
mod format;
mod importer;

pub use exporter::{save_mesh, SaveOptions};
pub use format::MeshFormat;
pub use importer::load_mesh;
