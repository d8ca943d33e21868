//! Error types for the description model and settings loading.

use std::path::PathBuf;

use thiserror::Error;

/// Structural problems in a description model handed to the generator.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Two operations in one group share a declared name.
    #[error(
        "Duplicate operation '{operation}' in group '{group}'. Each operation must have a unique name."
    )]
    DuplicateOperation {
        /// Group name (empty for the client-level group).
        group: String,
        /// The offending operation name.
        operation: String,
    },
}

/// Failures while reading generator settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for [`crate::Settings`].
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}
