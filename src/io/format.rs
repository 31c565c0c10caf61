// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh file format detection

use std::path::Path;

/// Supported mesh file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// Stereolithography, binary or ASCII
    Stl,
    /// Wavefront OBJ
    Obj,
}

impl MeshFormat {
    /// Detect format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }

    /// Detect format from the extension, treating anything unknown as STL
    pub fn from_path_or_stl(path: &Path) -> Self {
        Self::from_path(path).unwrap_or(Self::Stl)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
        }
    }
}
