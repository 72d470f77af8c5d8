//! Path management for FairShare
//!
//! ## Path Resolution Order
//!
//! 1. `FAIRSHARE_DATA_DIR` environment variable (if set)
//! 2. The platform data directory from `directories` (for example
//!    `~/.local/share/fairshare` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FairshareError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "FAIRSHARE_DATA_DIR";

/// Manages all paths used by FairShare
#[derive(Debug, Clone)]
pub struct FairsharePaths {
    base_dir: PathBuf,
}

impl FairsharePaths {
    /// Resolve the base directory from the environment or platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FairshareError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create FairsharePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the JSON documents
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn members_file(&self) -> PathBuf {
        self.data_dir().join("members.json")
    }

    /// Receipts and their line items
    pub fn receipts_file(&self) -> PathBuf {
        self.data_dir().join("receipts.json")
    }

    pub fn claims_file(&self) -> PathBuf {
        self.data_dir().join("claims.json")
    }

    /// Expenses and settlements
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), FairshareError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FairshareError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FairshareError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if FairShare has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, FairshareError> {
    ProjectDirs::from("", "", "fairshare")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FairshareError::Config("Could not determine home directory".into()))
}
