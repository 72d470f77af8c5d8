//! Storage layer for FairShare
//!
//! JSON file storage with atomic writes. Each repository guards its data
//! with an `RwLock` and is loaded and saved independently.

pub mod claims;
pub mod expenses;
pub mod file_io;
pub mod members;
pub mod receipts;

pub use claims::ClaimRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};
pub use members::MemberRepository;
pub use receipts::ReceiptRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FairsharePaths;
use crate::error::FairshareError;

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, FairshareError> {
    lock.read()
        .map_err(|e| FairshareError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, FairshareError> {
    lock.write()
        .map_err(|e| FairshareError::Storage(format!("Failed to acquire write lock: {}", e)))
}

fn record_entry(logger: &AuditLogger, entry: &AuditEntry) {
    if let Err(e) = logger.log(entry) {
        warn!(
            error = %e,
            operation = %entry.operation,
            entity = %entry.entity_type,
            id = %entry.entity_id,
            "failed to write audit entry"
        );
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: FairsharePaths,
    audit: Option<AuditLogger>,
    pub members: MemberRepository,
    pub receipts: ReceiptRepository,
    pub claims: ClaimRepository,
    pub expenses: ExpenseRepository,
}

impl Storage {
    /// Create a new Storage instance with audit logging enabled
    pub fn new(paths: FairsharePaths) -> Result<Self, FairshareError> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: Some(AuditLogger::new(paths.audit_log())),
            members: MemberRepository::new(paths.members_file()),
            receipts: ReceiptRepository::new(paths.receipts_file()),
            claims: ClaimRepository::new(paths.claims_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            paths,
        })
    }

    /// Turn audit logging off
    pub fn without_audit(mut self) -> Self {
        self.audit = None;
        self
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &FairsharePaths {
        &self.paths
    }

    /// The audit logger, if auditing is enabled
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), FairshareError> {
        self.members.load()?;
        self.receipts.load()?;
        self.claims.load()?;
        self.expenses.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), FairshareError> {
        self.members.save()?;
        self.receipts.save()?;
        self.claims.save()?;
        self.expenses.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create in the audit log
    ///
    /// Called after the change is saved, so a failed write is reported as a
    /// warning and does not fail the operation.
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if let Some(logger) = &self.audit {
            let entry = AuditEntry::create(entity_type, entity_id, entity_name, entity);
            record_entry(logger, &entry);
        }
    }

    /// Record a delete in the audit log
    ///
    /// Called after the change is saved, so a failed write is reported as a
    /// warning and does not fail the operation.
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if let Some(logger) = &self.audit {
            let entry = AuditEntry::delete(entity_type, entity_id, entity_name, entity);
            record_entry(logger, &entry);
        }
    }
}
