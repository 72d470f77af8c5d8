//! Typed ids for members, receipts, lines, claims and ledger records
//!
//! Every id is a random v4 UUID stored bare on disk. On screen an id is shown
//! as a three-letter kind prefix plus the first eight hex digits of the UUID,
//! e.g. `rcp-550e8400` for a receipt or `clm-1b2c3d4e` for a claim. Users can
//! type either that short form or the full UUID wherever the CLI asks for a
//! receipt, line or member.
//!
//! | Prefix | Id |
//! |---|---|
//! | `mem-` | [`MemberId`] |
//! | `grp-` | [`GroupId`] |
//! | `rcp-` | [`ReceiptId`] |
//! | `itm-` | [`ItemId`] |
//! | `clm-` | [`ClaimId`] |
//! | `exp-` | [`ExpenseId`] |
//! | `stl-` | [`SettlementId`] |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Hex digits of the UUID shown after the prefix
const SHORT_LEN: usize = 8;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident => $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Fresh random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Whether user input names this id, in short or full form
            pub fn matches_reference(&self, reference: &str) -> bool {
                let reference = reference.trim();
                reference.eq_ignore_ascii_case(&self.to_string())
                    || Uuid::parse_str(reference).is_ok_and(|uuid| uuid == self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let hex = self.0.simple().to_string();
                write!(f, "{}{}", $prefix, &hex[..SHORT_LEN])
            }
        }

        /// Parses a full UUID, with or without the kind prefix
        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let bare = s.strip_prefix($prefix).unwrap_or(s);
                Uuid::parse_str(bare).map(Self)
            }
        }
    };
}

entity_id!(
    /// A person in the group
    MemberId => "mem-"
);
entity_id!(
    /// The group a member, expense or receipt belongs to
    GroupId => "grp-"
);
entity_id!(ReceiptId => "rcp-");
entity_id!(
    /// One line of a receipt
    ItemId => "itm-"
);
entity_id!(
    /// A member's share of one receipt line
    ClaimId => "clm-"
);
entity_id!(ExpenseId => "exp-");
entity_id!(
    /// A repayment between two members
    SettlementId => "stl-"
);
