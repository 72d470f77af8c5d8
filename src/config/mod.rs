//! Configuration module for FairShare
//!
//! - Path resolution for the data directory
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FairsharePaths;
pub use settings::Settings;
