//! Generator settings.
//!
//! Settings are usually loaded from an `opgen.toml` file:
//! ```toml
//! package = "com.contoso.widgets"
//! required-parameter-client-methods = true
//!
//! [conventions]
//! fluent = true
//! ```
//! Every key is optional; missing keys take the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Which service conventions the generator honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Conventions {
    /// Honour pageable and next-link markers, and simulate paging for
    /// well-known list operations.
    pub paging: bool,
    /// Honour long-running and resumable markers.
    pub long_running: bool,
    /// Map the generic `CloudError` body to the canonical cloud exception.
    pub cloud_error: bool,
    /// Fluent conventions: inner models, implementation-package page types.
    pub fluent: bool,
}

impl Conventions {
    /// No service conventions at all.
    pub fn vanilla() -> Self {
        Self {
            paging: false,
            long_running: false,
            cloud_error: false,
            fluent: false,
        }
    }

    /// Cloud resource-manager conventions.
    pub fn azure() -> Self {
        Self {
            paging: true,
            long_running: true,
            cloud_error: true,
            fluent: false,
        }
    }

    /// Cloud conventions plus the fluent surface.
    pub fn fluent() -> Self {
        Self {
            fluent: true,
            ..Self::azure()
        }
    }
}

impl Default for Conventions {
    fn default() -> Self {
        Self::azure()
    }
}

/// Configuration consumed by the lowering pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Base package of the generated client.
    pub package: String,
    /// Subpackage for implementation types.
    pub implementation_subpackage: String,
    /// Subpackage for model types.
    pub models_subpackage: String,
    /// Service conventions.
    pub conventions: Conventions,
    /// Emit required-only overloads when optional parameters exist.
    pub required_parameter_client_methods: bool,
    /// Generate XML serialization wrappers for sequence bodies.
    pub generate_xml_serialization: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package: "com.example.client".to_string(),
            implementation_subpackage: "implementation".to_string(),
            models_subpackage: "models".to_string(),
            conventions: Conventions::default(),
            required_parameter_client_methods: false,
            generate_xml_serialization: false,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Fully qualified implementation package.
    pub fn implementation_package(&self) -> String {
        self.subpackage(&self.implementation_subpackage)
    }

    /// Fully qualified models package.
    pub fn models_package(&self) -> String {
        self.subpackage(&self.models_subpackage)
    }

    fn subpackage(&self, sub: &str) -> String {
        if sub.is_empty() {
            self.package.clone()
        } else {
            format!("{}.{sub}", self.package)
        }
    }
}
