//! Expense and settlement models
//!
//! An expense records who paid for something and how it was split. A
//! settlement records a repayment between two members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, GroupId, MemberId, ReceiptId, SettlementId};
use super::split::{Split, SplitMethod};

/// A shared expense paid by one member and split among several
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// The group the expense belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// What the money was spent on
    #[serde(default)]
    pub description: String,

    /// Total amount paid
    pub amount: f64,

    /// Member who paid
    pub paid_by: MemberId,

    /// Strategy that produced the splits
    #[serde(default)]
    pub split_method: SplitMethod,

    /// Each member's portion
    #[serde(default)]
    pub splits: Vec<Split>,

    /// Receipt this expense was created from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<ReceiptId>,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        paid_by: MemberId,
        split_method: SplitMethod,
        splits: Vec<Split>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            group_id: None,
            description: description.into(),
            amount,
            paid_by,
            split_method,
            splits,
            receipt_id: None,
            created_at: Utc::now(),
        }
    }

    /// Sum of all split amounts
    pub fn splits_total(&self) -> f64 {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Amount a member owes for this expense
    pub fn share_of(&self, member_id: MemberId) -> f64 {
        self.splits
            .iter()
            .filter(|s| s.member_id == member_id)
            .map(|s| s.amount)
            .sum()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} ({})",
            self.description, self.amount, self.split_method
        )
    }
}

/// A repayment from one member to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,

    /// The group the settlement belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Member paying back
    pub from_member: MemberId,

    /// Member being paid
    pub to_member: MemberId,

    /// Amount repaid
    pub amount: f64,

    /// When the repayment was recorded
    pub settled_at: DateTime<Utc>,
}

impl Settlement {
    /// Create a new settlement
    pub fn new(from_member: MemberId, to_member: MemberId, amount: f64) -> Self {
        Self {
            id: SettlementId::new(),
            group_id: None,
            from_member,
            to_member,
            amount,
            settled_at: Utc::now(),
        }
    }
}
