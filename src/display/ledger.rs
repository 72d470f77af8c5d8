//! Group ledger display: members, splits, expenses and balances

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::report::{format_amount, format_balance_colored};
use crate::models::{Expense, Member, MemberId, Split};
use crate::services::balance::MemberBalance;

fn member_name(members: &[Member], id: MemberId) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.display_name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Format the member list
pub fn format_member_list(members: &[Member]) -> String {
    if members.is_empty() {
        return "No members yet. Add one with 'fairshare member add <name>'.".to_string();
    }

    let mut output = String::new();
    for member in members {
        output.push_str(&format!("  {}  {}\n", member.id, member.display_name));
    }
    output
}

#[derive(Tabled)]
struct SplitRow {
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format calculated splits as a table
pub fn format_splits(splits: &[Split], members: &[Member], symbol: &str) -> String {
    if splits.is_empty() {
        return "No splits.".to_string();
    }

    let rows = splits.iter().map(|s| SplitRow {
        member: member_name(members, s.member_id),
        amount: format_amount(s.amount, symbol),
    });

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}

/// Format recorded expenses, oldest first
pub fn format_expense_list(expenses: &[Expense], members: &[Member], symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.".to_string();
    }

    let mut output = String::new();
    for expense in expenses {
        output.push_str(&format!(
            "{}  {:<24} {:>10}  paid by {} ({})\n",
            expense.created_at.format("%Y-%m-%d"),
            expense.description,
            format_amount(expense.amount, symbol),
            member_name(members, expense.paid_by),
            expense.split_method
        ));
    }
    output
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Owed")]
    owed: String,
    #[tabled(rename = "Repaid")]
    settled_out: String,
    #[tabled(rename = "Received")]
    settled_in: String,
    #[tabled(rename = "Net")]
    net: String,
}

/// Format member balances as a table
///
/// `colored` wraps the net column in terminal color codes.
pub fn format_balances(balances: &[MemberBalance], symbol: &str, colored: bool) -> String {
    if balances.is_empty() {
        return "No members yet.".to_string();
    }

    let rows = balances.iter().map(|b| BalanceRow {
        member: b.display_name.clone(),
        paid: format_amount(b.paid, symbol),
        owed: format_amount(b.owed, symbol),
        settled_out: format_amount(b.settled_out, symbol),
        settled_in: format_amount(b.settled_in, symbol),
        net: if colored {
            format_balance_colored(b.net, symbol)
        } else {
            format_amount(b.net, symbol)
        },
    });

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string()
}
