//! User settings for FairShare
//!
//! Display preferences and the defaults applied when recording claims.

use serde::{Deserialize, Serialize};

use super::paths::FairsharePaths;
use crate::error::FairshareError;
use crate::models::DEFAULT_CLAIM_SOURCE;

/// User settings for FairShare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Provenance tag stamped on claims made from the CLI
    #[serde(default = "default_claim_source")]
    pub default_claim_source: String,

    /// Whether create/delete operations are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_claim_source() -> String {
    DEFAULT_CLAIM_SOURCE.to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_claim_source: default_claim_source(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &FairsharePaths) -> Result<Self, FairshareError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| FairshareError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| FairshareError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FairsharePaths) -> Result<(), FairshareError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FairshareError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FairshareError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
