//! Claim repository for JSON storage
//!
//! This is the component that serializes claim writes, so it is where the
//! "one claim per member per item" rule is enforced.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FairshareError;
use crate::models::{ClaimId, ItemClaim, ItemId, MemberId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ClaimData {
    claims: Vec<ItemClaim>,
}

/// Repository for claim persistence
pub struct ClaimRepository {
    path: PathBuf,
    data: RwLock<Vec<ItemClaim>>,
}

impl ClaimRepository {
    /// Create a new claim repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load claims from disk
    pub fn load(&self) -> Result<(), FairshareError> {
        let file_data: ClaimData = read_json(&self.path)?;
        *write_lock(&self.data)? = file_data.claims;
        Ok(())
    }

    /// Save claims to disk
    pub fn save(&self) -> Result<(), FairshareError> {
        let claims = read_lock(&self.data)?.clone();
        write_json_atomic(&self.path, &ClaimData { claims })
    }

    pub fn get_all(&self) -> Result<Vec<ItemClaim>, FairshareError> {
        Ok(read_lock(&self.data)?.clone())
    }

    /// Claims on a single item, oldest first
    pub fn for_item(&self, item_id: ItemId) -> Result<Vec<ItemClaim>, FairshareError> {
        self.for_items(&[item_id])
    }

    /// Claims on any of the given items, oldest first
    pub fn for_items(&self, item_ids: &[ItemId]) -> Result<Vec<ItemClaim>, FairshareError> {
        Ok(read_lock(&self.data)?
            .iter()
            .filter(|c| item_ids.contains(&c.receipt_item_id))
            .cloned()
            .collect())
    }

    /// The member's claim on an item, if any
    pub fn find_member_claim(
        &self,
        item_id: ItemId,
        member_id: MemberId,
    ) -> Result<Option<ItemClaim>, FairshareError> {
        Ok(read_lock(&self.data)?
            .iter()
            .find(|c| c.receipt_item_id == item_id && c.member_id == member_id)
            .cloned())
    }

    /// Insert a claim, rejecting a second claim by the same member on an item
    pub fn insert(&self, claim: ItemClaim) -> Result<(), FairshareError> {
        let mut data = write_lock(&self.data)?;
        if data
            .iter()
            .any(|c| c.receipt_item_id == claim.receipt_item_id && c.member_id == claim.member_id)
        {
            return Err(FairshareError::Duplicate {
                entity_type: "Claim",
                identifier: format!("{} on {}", claim.member_id, claim.receipt_item_id),
            });
        }
        data.push(claim);
        Ok(())
    }

    /// Delete a claim, returning it
    pub fn delete(&self, id: ClaimId) -> Result<ItemClaim, FairshareError> {
        let mut data = write_lock(&self.data)?;
        let idx = data
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| FairshareError::claim_not_found(id.to_string()))?;
        Ok(data.remove(idx))
    }

    /// Count claims
    pub fn count(&self) -> Result<usize, FairshareError> {
        Ok(read_lock(&self.data)?.len())
    }
}
