//! Receipt repository for JSON storage
//!
//! Receipts and their line items live together in receipts.json. Items are
//! stored without claims; claims have their own file and are attached when a
//! snapshot is assembled.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FairshareError;
use crate::models::{ItemId, Receipt, ReceiptId, ReceiptItem};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ReceiptData {
    receipts: Vec<Receipt>,
    items: Vec<ReceiptItem>,
}

/// Repository for receipt and line item persistence
pub struct ReceiptRepository {
    path: PathBuf,
    data: RwLock<ReceiptData>,
}

impl ReceiptRepository {
    /// Create a new receipt repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(ReceiptData::default()),
        }
    }

    /// Load receipts from disk
    pub fn load(&self) -> Result<(), FairshareError> {
        let file_data: ReceiptData = read_json(&self.path)?;
        *write_lock(&self.data)? = file_data;
        Ok(())
    }

    /// Save receipts to disk
    pub fn save(&self) -> Result<(), FairshareError> {
        let data = read_lock(&self.data)?;
        write_json_atomic(&self.path, &*data)
    }

    /// Get a receipt by ID
    pub fn get(&self, id: ReceiptId) -> Result<Option<Receipt>, FairshareError> {
        Ok(read_lock(&self.data)?
            .receipts
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    /// Get all receipts, newest first
    pub fn get_all(&self) -> Result<Vec<Receipt>, FairshareError> {
        let mut receipts = read_lock(&self.data)?.receipts.clone();
        receipts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(receipts)
    }

    /// Find a receipt by ID or merchant name (case-insensitive)
    ///
    /// When several receipts share a merchant name the most recent wins.
    pub fn find(&self, reference: &str) -> Result<Option<Receipt>, FairshareError> {
        let lowered = reference.trim().to_lowercase();
        Ok(self.get_all()?.into_iter().find(|r| {
            r.id.matches_reference(reference)
                || r.merchant_name.to_lowercase() == lowered
        }))
    }

    /// Insert or replace a receipt
    pub fn upsert(&self, receipt: Receipt) -> Result<(), FairshareError> {
        let mut data = write_lock(&self.data)?;
        match data.receipts.iter_mut().find(|r| r.id == receipt.id) {
            Some(existing) => *existing = receipt,
            None => data.receipts.push(receipt),
        }
        Ok(())
    }

    /// Append line items, stripping any embedded claims
    pub fn add_items(&self, items: Vec<ReceiptItem>) -> Result<(), FairshareError> {
        let mut data = write_lock(&self.data)?;
        for item in items {
            if !data.receipts.iter().any(|r| r.id == item.receipt_id) {
                return Err(FairshareError::receipt_not_found(item.receipt_id.to_string()));
            }
            if data.items.iter().any(|i| i.id == item.id) {
                return Err(FairshareError::Duplicate {
                    entity_type: "Receipt item",
                    identifier: item.id.to_string(),
                });
            }
            data.items.push(item.with_claims(Vec::new()));
        }
        Ok(())
    }

    /// Line items of a receipt in the order they were added
    pub fn items_for(&self, receipt_id: ReceiptId) -> Result<Vec<ReceiptItem>, FairshareError> {
        Ok(read_lock(&self.data)?
            .items
            .iter()
            .filter(|i| i.receipt_id == receipt_id)
            .cloned()
            .collect())
    }

    /// Get a line item by ID
    pub fn get_item(&self, id: ItemId) -> Result<Option<ReceiptItem>, FairshareError> {
        Ok(read_lock(&self.data)?
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    /// Find a line item on a receipt by 1-based line number, ID or description
    pub fn find_item(
        &self,
        receipt_id: ReceiptId,
        reference: &str,
    ) -> Result<Option<ReceiptItem>, FairshareError> {
        let items = self.items_for(receipt_id)?;

        if let Ok(line) = reference.trim().parse::<usize>() {
            return Ok(line.checked_sub(1).and_then(|idx| items.get(idx).cloned()));
        }

        let lowered = reference.trim().to_lowercase();
        Ok(items.into_iter().find(|i| {
            i.id.matches_reference(reference)
                || i.description.to_lowercase() == lowered
        }))
    }

    /// Count receipts
    pub fn count(&self) -> Result<usize, FairshareError> {
        Ok(read_lock(&self.data)?.receipts.len())
    }
}
