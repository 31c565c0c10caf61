// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Repair configuration

use crate::io::SaveOptions;
use crate::repair::NonManifoldEdgeMethod;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up by [`RepairConfig::load`]
pub const CONFIG_FILE: &str = "meshmend.toml";

/// Parameters for the repair steps and the final save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Largest hole (in boundary edges) that `close_holes` fills
    pub max_hole_size: usize,
    /// How far split copies of a non-manifold vertex move toward their fan
    pub non_manifold_vertex_displacement_ratio: f64,
    /// Border snap distance as a percentage of the bounding-box diagonal
    pub snap_threshold_percent: f64,
    pub non_manifold_edge_method: NonManifoldEdgeMethod,
    /// Write binary STL
    pub binary_output: bool,
    /// Write per-vertex normals (OBJ only)
    pub save_vertex_normals: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_hole_size: 30,
            non_manifold_vertex_displacement_ratio: 0.0,
            snap_threshold_percent: 1.0,
            non_manifold_edge_method: NonManifoldEdgeMethod::RemoveFaces,
            binary_output: true,
            save_vertex_normals: false,
        }
    }
}

impl RepairConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: RepairConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `meshmend.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MESHMEND_*` environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("MESHMEND_MAX_HOLE_SIZE") {
            self.max_hole_size = value
                .parse()
                .with_context(|| format!("Invalid MESHMEND_MAX_HOLE_SIZE: {value:?}"))?;
        }

        if let Ok(value) = std::env::var("MESHMEND_SNAP_THRESHOLD_PERCENT") {
            self.snap_threshold_percent = value
                .parse()
                .with_context(|| format!("Invalid MESHMEND_SNAP_THRESHOLD_PERCENT: {value:?}"))?;
        }

        if let Ok(value) = std::env::var("MESHMEND_VERTEX_DISPLACEMENT_RATIO") {
            self.non_manifold_vertex_displacement_ratio = value
                .parse()
                .with_context(|| format!("Invalid MESHMEND_VERTEX_DISPLACEMENT_RATIO: {value:?}"))?;
        }

        Ok(())
    }

    /// Reject values the repair steps cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_hole_size < 3 {
            bail!("max_hole_size must be at least 3, got {}", self.max_hole_size);
        }
        if !self.snap_threshold_percent.is_finite() || self.snap_threshold_percent < 0.0 {
            bail!(
                "snap_threshold_percent must be a non-negative number, got {}",
                self.snap_threshold_percent
            );
        }
        if !(0.0..=1.0).contains(&self.non_manifold_vertex_displacement_ratio) {
            bail!(
                "non_manifold_vertex_displacement_ratio must be within [0, 1], got {}",
                self.non_manifold_vertex_displacement_ratio
            );
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            binary: self.binary_output,
            include_normals: self.save_vertex_normals,
        }
    }
}
