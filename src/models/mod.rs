//! Core data models for FairShare
//!
//! Plain records exchanged with the data-access layer: members, receipts and
//! their line items, item claims, splits, expenses and settlements.

pub mod claim;
pub mod expense;
pub mod ids;
pub mod member;
pub mod money;
pub mod receipt;
pub mod split;

pub use claim::{ClaimType, ItemClaim, DEFAULT_CLAIM_SOURCE};
pub use expense::{Expense, Settlement};
pub use ids::{ClaimId, ExpenseId, GroupId, ItemId, MemberId, ReceiptId, SettlementId};
pub use member::Member;
pub use money::{round_to_cents, Money};
pub use receipt::{Receipt, ReceiptItem, ReceiptStatus};
pub use split::{Split, SplitMethod};
