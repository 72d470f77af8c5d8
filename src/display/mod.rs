//! Display formatting for terminal output

pub mod ledger;
pub mod receipt;
pub mod report;

pub use ledger::{format_balances, format_expense_list, format_member_list, format_splits};
pub use receipt::{
    format_member_totals, format_receipt_details, format_receipt_list, format_summary,
    format_validation,
};
