//! Item claim model
//!
//! A claim is a member's assertion of ownership over a fraction of one
//! receipt line item. Claims are never edited in place: a changed claim is
//! deleted and recreated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ClaimId, ItemId, MemberId};

/// Provenance tag used when the caller does not supply one
pub const DEFAULT_CLAIM_SOURCE: &str = "app";

/// Whether a claim covers the whole item or a portion of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    /// The claim covers 100% of the item
    Full,
    /// The claim covers less than 100% of the item
    Split,
}

impl ClaimType {
    /// Derive the claim type from a share fraction
    pub fn from_fraction(share_fraction: f64) -> Self {
        if share_fraction == 1.0 {
            Self::Full
        } else {
            Self::Split
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Split => write!(f, "split"),
        }
    }
}

/// A member's claim on a receipt line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemClaim {
    /// Unique identifier
    pub id: ClaimId,

    /// The receipt item being claimed
    pub receipt_item_id: ItemId,

    /// The claiming member
    pub member_id: MemberId,

    /// Full or split claim, derived from `share_fraction`
    pub claim_type: ClaimType,

    /// Portion of the item's price this claim covers, in (0, 1]
    pub share_fraction: f64,

    /// Number of ways the item was split, when claimed as "1 of N"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_count: Option<u32>,

    /// When the claim was made
    pub claimed_at: DateTime<Utc>,

    /// Where the claim came from (e.g. "app", "web")
    #[serde(default = "default_claim_source")]
    pub claimed_via: String,
}

fn default_claim_source() -> String {
    DEFAULT_CLAIM_SOURCE.to_string()
}

impl ItemClaim {
    /// Check whether this claim covers the whole item
    pub fn is_full(&self) -> bool {
        self.share_fraction == 1.0
    }
}

impl fmt::Display for ItemClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.1}% of {}",
            self.member_id,
            self.claim_type,
            self.share_fraction * 100.0,
            self.receipt_item_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claim(share_fraction: f64) -> ItemClaim {
        ItemClaim {
            id: ClaimId::new(),
            receipt_item_id: ItemId::new(),
            member_id: MemberId::new(),
            claim_type: ClaimType::from_fraction(share_fraction),
            share_fraction,
            split_count: None,
            claimed_at: Utc::now(),
            claimed_via: DEFAULT_CLAIM_SOURCE.to_string(),
        }
    }

    #[test]
    fn test_claim_type_from_fraction() {
        assert_eq!(ClaimType::from_fraction(1.0), ClaimType::Full);
        assert_eq!(ClaimType::from_fraction(0.5), ClaimType::Split);
        assert_eq!(ClaimType::from_fraction(0.9999), ClaimType::Split);
    }

    #[test]
    fn test_claim_type_serialization() {
        assert_eq!(serde_json::to_string(&ClaimType::Full).unwrap(), "\"full\"");
        assert_eq!(serde_json::to_string(&ClaimType::Split).unwrap(), "\"split\"");
    }

    #[test]
    fn test_missing_claimed_via_defaults_to_app() {
        let claim = sample_claim(0.5);
        let mut value = serde_json::to_value(&claim).unwrap();
        value.as_object_mut().unwrap().remove("claimed_via");

        let back: ItemClaim = serde_json::from_value(value).unwrap();
        assert_eq!(back.claimed_via, "app");
        assert!(!back.is_full());
    }

    #[test]
    fn test_display() {
        let claim = sample_claim(0.25);
        assert!(claim.to_string().contains("split 25.0%"));
    }
}
