//! Group balance netting
//!
//! Nets each member's position across a group's expenses and recorded
//! settlements. This only reports who is up or down; it does not work out a
//! minimal set of transfers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{round_to_cents, Expense, Member, MemberId, Settlement};

/// A member's net position in a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub display_name: String,
    /// Total of expenses this member paid for
    pub paid: f64,
    /// Total of this member's splits
    pub owed: f64,
    /// Repayments this member has made
    pub settled_out: f64,
    /// Repayments this member has received
    pub settled_in: f64,
    /// Positive: the group owes this member. Negative: this member owes.
    pub net: f64,
}

impl MemberBalance {
    /// Whether the member is square to within a cent
    pub fn is_settled(&self) -> bool {
        self.net.abs() < 0.005
    }
}

#[derive(Default)]
struct Tally {
    paid: f64,
    owed: f64,
    settled_out: f64,
    settled_in: f64,
}

/// Net every member's paid, owed and settled amounts
///
/// Members are reported in the order given, including members with no
/// activity. `net = paid - owed + settled_out - settled_in`, rounded to the
/// cent.
pub fn calculate_group_balances(
    expenses: &[Expense],
    settlements: &[Settlement],
    members: &[Member],
) -> Vec<MemberBalance> {
    let mut tallies: HashMap<MemberId, Tally> = HashMap::new();

    for expense in expenses {
        tallies.entry(expense.paid_by).or_default().paid += expense.amount;
        for split in &expense.splits {
            tallies.entry(split.member_id).or_default().owed += split.amount;
        }
    }

    for settlement in settlements {
        tallies.entry(settlement.from_member).or_default().settled_out += settlement.amount;
        tallies.entry(settlement.to_member).or_default().settled_in += settlement.amount;
    }

    members
        .iter()
        .map(|member| {
            let tally = tallies.remove(&member.id).unwrap_or_default();
            MemberBalance {
                member_id: member.id,
                display_name: member.display_name.clone(),
                paid: round_to_cents(tally.paid),
                owed: round_to_cents(tally.owed),
                settled_out: round_to_cents(tally.settled_out),
                settled_in: round_to_cents(tally.settled_in),
                net: round_to_cents(
                    tally.paid - tally.owed + tally.settled_out - tally.settled_in,
                ),
            }
        })
        .collect()
}
