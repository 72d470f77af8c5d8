//! Receipt display formatting
//!
//! Line-by-line claim views are laid out by hand; per-member totals use a
//! `tabled` table.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::report::{format_amount, format_fraction, separator, truncate};
use crate::models::{Member, MemberId, Receipt};
use crate::services::claims::{claimed_fraction, is_item_fully_claimed};
use crate::services::receipt::ReceiptSnapshot;
use crate::services::summary::{ClaimValidation, ReceiptSummary};
use crate::services::totals::MemberTotal;

fn member_name(members: &[Member], id: MemberId) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.display_name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Format a list of receipts
pub fn format_receipt_list(receipts: &[Receipt], symbol: &str) -> String {
    if receipts.is_empty() {
        return "No receipts found.".to_string();
    }

    let name_width = receipts
        .iter()
        .map(|r| r.to_string().chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = format!(
        "{:<12}  {:<name_width$}  {:>10}  {}\n",
        "ID",
        "Receipt",
        "Total",
        "Status",
        name_width = name_width
    );
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:->10}  {:-<10}\n",
        "",
        "",
        "",
        "",
        name_width = name_width
    ));

    for receipt in receipts {
        let total = receipt
            .total_amount
            .map(|t| format_amount(t, symbol))
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:>10}  {}\n",
            receipt.id.to_string(),
            receipt.to_string(),
            total,
            receipt.status,
            name_width = name_width
        ));
    }

    output
}

/// Format a receipt with every line and who has claimed it
pub fn format_receipt_details(
    snapshot: &ReceiptSnapshot,
    members: &[Member],
    symbol: &str,
) -> String {
    let receipt = &snapshot.receipt;
    let mut output = String::new();

    output.push_str(&format!("Receipt: {}\n", receipt));
    output.push_str(&format!("  ID:       {}\n", receipt.id));
    output.push_str(&format!("  Status:   {}\n", receipt.status));
    output.push_str(&format!("  Currency: {}\n", receipt.currency));
    output.push('\n');

    if snapshot.items.is_empty() {
        output.push_str("  No line items.\n");
    }

    for (idx, item) in snapshot.items.iter().enumerate() {
        let state = if !item.is_claimable() {
            item.kind_label().to_string()
        } else if is_item_fully_claimed(item) {
            "claimed".to_string()
        } else {
            format!("{} claimed", format_fraction(claimed_fraction(item)))
        };

        output.push_str(&format!(
            "  {:>2}. {:<28} {:>10}  [{}]\n",
            idx + 1,
            truncate(&item.description, 28),
            format_amount(item.total_price, symbol),
            state
        ));

        for claim in &item.claims {
            output.push_str(&format!(
                "        {} {}\n",
                member_name(members, claim.member_id),
                format_fraction(claim.share_fraction)
            ));
        }
    }

    output.push('\n');
    for (label, amount) in [
        ("Subtotal", receipt.subtotal),
        ("Tax", receipt.tax_amount),
        ("Tip", receipt.tip_amount),
        ("Total", receipt.total_amount),
    ] {
        if let Some(amount) = amount {
            output.push_str(&format!(
                "  {:<10}{:>10}\n",
                format!("{}:", label),
                format_amount(amount, symbol)
            ));
        }
    }

    output
}

#[derive(Tabled)]
struct MemberTotalRow {
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Tax")]
    tax: String,
    #[tabled(rename = "Tip")]
    tip: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// Format member totals as a table
pub fn format_member_totals(totals: &[MemberTotal], symbol: &str) -> String {
    if totals.is_empty() {
        return "Nothing has been claimed yet.".to_string();
    }

    let rows = totals.iter().map(|t| MemberTotalRow {
        member: t.display_name.clone(),
        items: format_amount(t.items_total, symbol),
        tax: format_amount(t.tax_share, symbol),
        tip: format_amount(t.tip_share, symbol),
        total: format_amount(t.grand_total, symbol),
    });

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Format the settlement summary of a receipt
pub fn format_summary(summary: &ReceiptSummary, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Summary: {}\n", summary.merchant_name));
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!(
        "Items claimed: {} of {}\n",
        summary.claimed_items, summary.total_items
    ));
    if !summary.is_fully_claimed() {
        output.push_str(&format!("Unclaimed:     {}\n", summary.unclaimed_items));
    }
    output.push('\n');
    output.push_str(&format_member_totals(&summary.member_totals, symbol));
    output.push('\n');

    if let Some(total) = summary.total_amount {
        output.push('\n');
        output.push_str(&format!(
            "Receipt total: {}  (claimed {})\n",
            format_amount(total, symbol),
            format_amount(summary.claimed_grand_total(), symbol)
        ));
    }

    output
}

/// Format the outcome of the all-items-claimed check
pub fn format_validation(validation: &ClaimValidation, symbol: &str) -> String {
    if validation.is_valid {
        return "All items are claimed. Ready to settle.".to_string();
    }

    let mut output = format!(
        "{} item(s) still need to be claimed:\n",
        validation.unclaimed_items.len()
    );
    for item in &validation.unclaimed_items {
        output.push_str(&format!(
            "  - {} ({}, {} claimed)\n",
            item.description,
            format_amount(item.total_price, symbol),
            format_fraction(claimed_fraction(item))
        ));
    }
    output
}
