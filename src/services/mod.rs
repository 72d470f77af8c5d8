//! Service layer for FairShare
//!
//! The calculation modules (`split`, `claims`, `totals`, `summary`,
//! `balance`) are pure functions over plain records. The remaining services
//! apply them to stored data, validating input and writing the audit log.

pub mod balance;
pub mod claims;
pub mod expense;
pub mod member;
pub mod receipt;
pub mod split;
pub mod summary;
pub mod totals;

pub use balance::{calculate_group_balances, MemberBalance};
pub use claims::{
    can_claim_item, claimable_fraction, create_claim, get_item_claimed_amount,
    get_item_remaining_fraction, is_item_fully_claimed, ClaimDenial, ClaimEligibility,
    ClaimOptions,
};
pub use expense::ExpenseService;
pub use member::MemberService;
pub use receipt::{ImportedLine, ReceiptImport, ReceiptService, ReceiptSnapshot};
pub use split::{
    calculate_split, calculate_split_by_name, validate_split_data, SplitParams, SplitValidation,
};
pub use summary::{
    generate_receipt_summary, settlement_splits, validate_all_items_claimed, ClaimValidation,
    ReceiptSummary,
};
pub use totals::{calculate_member_totals, MemberTotal};
