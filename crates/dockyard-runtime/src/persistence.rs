//! Layout files in the project directory.
//!
//! The layout is stored as a pretty-printed [`WorkspaceLayout`] JSON document
//! (default name `.dockyard-layout.json`) next to the project it belongs to.
//!
//! - **Missing file** is "no saved layout" (`Ok(None)`), not an error.
//! - **Unknown newer version** is reported before the body is parsed, so a
//!   future schema fails as a version problem rather than a parse problem.
//! - **Writes** go to a temp file that is then renamed over the target, so a
//!   crash never leaves a half-written layout behind.

use std::io;
use std::path::{Path, PathBuf};

use dockyard_layout::{
    DockLayout, LayoutMigrationError, LayoutValidationError, WORKSPACE_LAYOUT_VERSION,
    WorkspaceLayout, migrate_layout, needs_migration,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read layout file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write layout file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse layout file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize layout: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Migration(#[from] LayoutMigrationError),
    #[error(transparent)]
    Invalid(#[from] LayoutValidationError),
    #[error("no project directory is open")]
    NoProjectDirectory,
}

/// Where the layout for `project_dir` lives.
#[must_use]
pub fn layout_path(project_dir: &Path, file_name: &str) -> PathBuf {
    project_dir.join(file_name)
}

/// Write `layout` to `path`. The parent directory must already exist.
pub fn save_layout(layout: &DockLayout, path: &Path) -> Result<(), PersistenceError> {
    let json =
        serde_json::to_string_pretty(&layout.to_snapshot()).map_err(PersistenceError::Serialize)?;

    let temp = path.with_extension("json.tmp");
    let write_error = |source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&temp, &json).map_err(write_error)?;
    if let Err(source) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(write_error(source));
    }

    tracing::debug!(
        target: "dockyard.persistence",
        path = %path.display(),
        bytes = json.len(),
        "layout written"
    );
    Ok(())
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u16,
}

/// Read the layout at `path`; `Ok(None)` when there is none.
pub fn load_layout(path: &Path) -> Result<Option<DockLayout>, PersistenceError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PersistenceError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let parse_error = |source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let header: VersionHeader = serde_json::from_str(&contents).map_err(parse_error)?;
    if header.version > WORKSPACE_LAYOUT_VERSION {
        return Err(LayoutMigrationError::UnsupportedVersion {
            version: header.version,
        }
        .into());
    }

    let mut snapshot: WorkspaceLayout = serde_json::from_str(&contents).map_err(parse_error)?;
    if needs_migration(&snapshot) {
        let migrated = migrate_layout(snapshot)?;
        for warning in &migrated.warnings {
            tracing::warn!(
                target: "dockyard.persistence",
                from = migrated.from_version,
                to = migrated.to_version,
                warning = %warning,
                "layout migration warning"
            );
        }
        snapshot = migrated.snapshot;
    }

    Ok(Some(DockLayout::from_snapshot(snapshot)?))
}
