//! Audit logging for FairShare
//!
//! Records create and delete operations on members, receipts, claims,
//! expenses and settlements in an append-only JSONL log. Claims are never
//! edited in place, so there is no update operation.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
