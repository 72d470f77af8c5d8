//! FairShare - shared-expense splitting and receipt settlement
//!
//! The core is a set of pure calculations: dividing an amount among members
//! (equal, exact, percent or shares), tracking fractional claims on receipt
//! lines, and turning claims into per-member totals with tax and tip spread
//! proportionally. Around it sit a JSON file store, an audit log and a CLI.
//!
//! # Architecture
//!
//! - `models`: records (members, receipts, items, claims, expenses)
//! - `services`: the calculation engine and the services applying it to
//!   stored data
//! - `storage`: JSON file storage layer
//! - `audit`: append-only audit log
//! - `config`: path resolution and user settings
//! - `display` / `export`: terminal tables and CSV/JSON/YAML output
//! - `cli`: command handlers for the `fairshare` binary
//!
//! # Example
//!
//! ```rust
//! use fairshare::models::MemberId;
//! use fairshare::services::split::equal_split;
//!
//! let members = vec![MemberId::new(), MemberId::new(), MemberId::new()];
//! let splits = equal_split(100.0, &members);
//! let amounts: Vec<f64> = splits.iter().map(|s| s.amount).collect();
//! assert_eq!(amounts, vec![33.33, 33.33, 33.34]);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{FairshareError, FairshareResult};
