//! Member model
//!
//! A participant in a group. Members are owned by the group and never
//! mutated by the calculation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId};

/// A participant in a shared-expense group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,

    /// The group this member belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Name shown in summaries and balances
    pub display_name: String,
}

impl Member {
    /// Create a new member with a fresh ID
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            group_id: None,
            display_name: display_name.into(),
        }
    }

    /// Create a member belonging to a group
    pub fn in_group(display_name: impl Into<String>, group_id: GroupId) -> Self {
        let mut member = Self::new(display_name);
        member.group_id = Some(group_id);
        member
    }

    /// Normalize a display name for case-insensitive lookup
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check whether this member matches a name or ID reference
    pub fn matches(&self, reference: &str) -> bool {
        let reference = reference.trim();
        Self::normalize_name(&self.display_name) == Self::normalize_name(reference)
            || self.id.matches_reference(reference)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
