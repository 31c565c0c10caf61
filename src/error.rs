// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types raised by the geometry engine and mesh I/O

use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while loading, repairing or saving a mesh.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem failure on a specific path.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but could not be decoded as a mesh.
    #[error("failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },

    /// The file extension names a format this engine cannot write.
    #[error("unsupported mesh format: {}", extension.as_deref().unwrap_or("<none>"))]
    UnsupportedFormat { extension: Option<String> },

    /// The mesh has no vertices or no faces.
    #[error("mesh is empty: {details}")]
    EmptyMesh { details: String },

    /// A face references a vertex that does not exist.
    #[error("invalid vertex index {index} (mesh has {vertex_count} vertices)")]
    InvalidIndex { index: usize, vertex_count: usize },

    /// A repair step found topology it cannot process.
    #[error("topology error: {details}")]
    Topology { details: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short category name, used in diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Parse { .. } => "parse",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::EmptyMesh { .. } => "empty_mesh",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::Topology { .. } => "topology",
            Self::Other(_) => "other",
        }
    }
}
