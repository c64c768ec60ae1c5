#![forbid(unsafe_code)]

//! Workspace configuration loaded from TOML or JSON.
//!
//! Every field has a default, so a partial file (or none at all) is fine:
//!
//! ```toml
//! # dockyard.toml
//! drag_threshold = 8.0
//! splitter_thickness = 6.0
//!
//! [drop_zones]
//! center_fraction = 0.5
//! ```
//!
//! ```rust,ignore
//! let config = WorkspaceConfig::from_toml_file("dockyard.toml")?;
//! let config = WorkspaceConfig::from_json_str(json)?;
//! ```

use std::path::Path;

use dockyard_layout::solve::{DEFAULT_AREA_HANDLE_THICKNESS, DEFAULT_SPLITTER_THICKNESS};
use dockyard_layout::{DropZoneGeometry, LayoutMetrics};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pointer travel, in pixels on either axis, before a pressed tab starts dragging.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;

/// Layout file written into the project directory.
pub const DEFAULT_LAYOUT_FILE_NAME: &str = ".dockyard-layout.json";

/// Tunables for the workspace shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Movement a tab press must exceed before it becomes a drag.
    pub drag_threshold: f64,
    /// Drop-zone proportions shared by hover preview and drop commit.
    pub drop_zones: DropZoneGeometry,
    /// Gap between the two children of a split.
    pub splitter_thickness: f64,
    /// Gap between an outer area and the center.
    pub area_handle_thickness: f64,
    /// File name of the saved layout inside the project directory.
    pub layout_file_name: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            drop_zones: DropZoneGeometry::default(),
            splitter_thickness: DEFAULT_SPLITTER_THICKNESS,
            area_handle_thickness: DEFAULT_AREA_HANDLE_THICKNESS,
            layout_file_name: DEFAULT_LAYOUT_FILE_NAME.to_owned(),
        }
    }
}

impl WorkspaceConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.drag_threshold.is_finite() || self.drag_threshold <= 0.0 {
            errors.push(format!(
                "drag_threshold must be finite and > 0, got {}",
                self.drag_threshold
            ));
        }

        if let Err(message) = self.drop_zones.validate() {
            errors.push(message);
        }

        for (name, value) in [
            ("splitter_thickness", self.splitter_thickness),
            ("area_handle_thickness", self.area_handle_thickness),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        let name = self.layout_file_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            errors.push(format!(
                "layout_file_name must be a plain file name, got {name:?}"
            ));
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Strip thicknesses for the layout solver.
    #[must_use]
    pub fn metrics(&self) -> LayoutMetrics {
        LayoutMetrics {
            splitter: self.splitter_thickness,
            area_handle: self.area_handle_thickness,
        }
    }
}

/// Errors from loading a [`WorkspaceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
