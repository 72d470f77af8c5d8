//! Member repository for JSON storage
//!
//! Manages loading and saving group members to members.json. Members keep
//! the order they were added in.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::FairshareError;
use crate::models::{Member, MemberId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

/// Serializable member data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MemberData {
    members: Vec<Member>,
}

/// Repository for member persistence
pub struct MemberRepository {
    path: PathBuf,
    data: RwLock<Vec<Member>>,
}

impl MemberRepository {
    /// Create a new member repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load members from disk
    pub fn load(&self) -> Result<(), FairshareError> {
        let file_data: MemberData = read_json(&self.path)?;
        *write_lock(&self.data)? = file_data.members;
        Ok(())
    }

    /// Save members to disk
    pub fn save(&self) -> Result<(), FairshareError> {
        let members = read_lock(&self.data)?.clone();
        write_json_atomic(&self.path, &MemberData { members })
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> Result<Option<Member>, FairshareError> {
        Ok(read_lock(&self.data)?.iter().find(|m| m.id == id).cloned())
    }

    /// Get all members in the order they were added
    pub fn get_all(&self) -> Result<Vec<Member>, FairshareError> {
        Ok(read_lock(&self.data)?.clone())
    }

    /// Find a member by display name (case-insensitive) or ID
    pub fn find(&self, reference: &str) -> Result<Option<Member>, FairshareError> {
        Ok(read_lock(&self.data)?
            .iter()
            .find(|m| m.matches(reference))
            .cloned())
    }

    /// Add a member, rejecting duplicate display names
    pub fn insert(&self, member: Member) -> Result<(), FairshareError> {
        let mut data = write_lock(&self.data)?;
        let normalized = Member::normalize_name(&member.display_name);
        if data
            .iter()
            .any(|m| Member::normalize_name(&m.display_name) == normalized)
        {
            return Err(FairshareError::Duplicate {
                entity_type: "Member",
                identifier: member.display_name,
            });
        }
        data.push(member);
        Ok(())
    }

    /// Count members
    pub fn count(&self) -> Result<usize, FairshareError> {
        Ok(read_lock(&self.data)?.len())
    }
}
