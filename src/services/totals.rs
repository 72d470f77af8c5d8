//! Balance aggregator
//!
//! Combines a receipt's items and claims into per-member totals, spreading
//! tax and tip over the members in proportion to what they claimed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{ItemClaim, ItemId, Member, MemberId, Receipt, ReceiptItem};

/// What one member owes for a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberTotal {
    pub member_id: MemberId,
    pub display_name: String,
    /// Sum of price × fraction over the member's claims
    pub items_total: f64,
    /// Member's proportional part of the receipt tax
    pub tax_share: f64,
    /// Member's proportional part of the receipt tip
    pub tip_share: f64,
    /// items_total + tax_share + tip_share
    pub grand_total: f64,
}

/// Sum each member's claimed amount over the claimable items
///
/// Claims on tax/tip/subtotal/total/discount lines, or on items not in
/// `items`, are ignored.
pub fn claimed_items_by_member(items: &[ReceiptItem], claims: &[ItemClaim]) -> HashMap<MemberId, f64> {
    let prices: HashMap<ItemId, f64> = items
        .iter()
        .filter(|item| item.is_claimable())
        .map(|item| (item.id, item.total_price))
        .collect();

    let mut totals: HashMap<MemberId, f64> = HashMap::new();
    for claim in claims {
        if let Some(price) = prices.get(&claim.receipt_item_id) {
            *totals.entry(claim.member_id).or_insert(0.0) += price * claim.share_fraction;
        }
    }
    totals
}

/// Compute what each member owes for a receipt
///
/// Tax and tip are distributed over the *claimed* subtotal, so when some
/// items are never claimed the claimers absorb all of the tax and tip.
/// Members are emitted in the order given; members with nothing claimed are
/// omitted. Missing tax or tip counts as zero.
pub fn calculate_member_totals(
    receipt: &Receipt,
    items: &[ReceiptItem],
    claims: &[ItemClaim],
    members: &[Member],
) -> Vec<MemberTotal> {
    let items_by_member = claimed_items_by_member(items, claims);
    let claimed_subtotal: f64 = items_by_member.values().sum();
    let tax = receipt.tax();
    let tip = receipt.tip();

    debug!(
        receipt = %receipt.id,
        claimed_subtotal,
        tax,
        tip,
        "calculating member totals"
    );

    members
        .iter()
        .filter_map(|member| {
            let items_total = items_by_member.get(&member.id).copied().unwrap_or(0.0);
            if items_total <= 0.0 {
                return None;
            }

            let proportion = items_total / claimed_subtotal;
            let tax_share = tax * proportion;
            let tip_share = tip * proportion;

            Some(MemberTotal {
                member_id: member.id,
                display_name: member.display_name.clone(),
                items_total,
                tax_share,
                tip_share,
                grand_total: items_total + tax_share + tip_share,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReceiptId;
    use crate::services::claims::{create_claim, ClaimOptions};

    struct Fixture {
        receipt: Receipt,
        items: Vec<ReceiptItem>,
        alice: Member,
        bob: Member,
    }

    fn fixture() -> Fixture {
        let receipt =
            Receipt::new("Bistro").with_amounts(Some(100.0), Some(10.0), Some(20.0), Some(130.0));
        let items = vec![
            ReceiptItem::new(receipt.id, "Steak", 75.0),
            ReceiptItem::new(receipt.id, "Salad", 25.0),
            ReceiptItem::tax(receipt.id, 10.0),
            ReceiptItem::tip(receipt.id, 20.0),
        ];
        Fixture {
            receipt,
            items,
            alice: Member::new("Alice"),
            bob: Member::new("Bob"),
        }
    }

    fn full(item: &ReceiptItem, member: &Member) -> ItemClaim {
        create_claim(item.id, member.id, &ClaimOptions::default())
    }

    #[test]
    fn test_proportional_tax_and_tip() {
        let f = fixture();
        let claims = vec![full(&f.items[0], &f.alice), full(&f.items[1], &f.bob)];
        let members = vec![f.alice.clone(), f.bob.clone()];

        let totals = calculate_member_totals(&f.receipt, &f.items, &claims, &members);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].member_id, f.alice.id);
        assert_eq!(totals[0].items_total, 75.0);
        assert_eq!(totals[0].tax_share, 7.5);
        assert_eq!(totals[0].tip_share, 15.0);
        assert_eq!(totals[0].grand_total, 97.5);

        assert_eq!(totals[1].display_name, "Bob");
        assert_eq!(totals[1].items_total, 25.0);
        assert_eq!(totals[1].tax_share, 2.5);
        assert_eq!(totals[1].tip_share, 5.0);
        assert_eq!(totals[1].grand_total, 32.5);

        let grand: f64 = totals.iter().map(|t| t.grand_total).sum();
        assert_eq!(grand, 130.0);
    }

    #[test]
    fn test_unclaimed_item_excluded_and_claimers_absorb_charges() {
        let f = fixture();
        let claims = vec![full(&f.items[1], &f.bob)];
        let members = vec![f.alice.clone(), f.bob.clone()];

        let totals = calculate_member_totals(&f.receipt, &f.items, &claims, &members);

        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].member_id, f.bob.id);
        assert_eq!(totals[0].items_total, 25.0);
        assert_eq!(totals[0].tax_share, 10.0);
        assert_eq!(totals[0].tip_share, 20.0);
        assert_eq!(totals[0].grand_total, 55.0);
    }

    #[test]
    fn test_split_claims_accumulate() {
        let f = fixture();
        let half = ClaimOptions::fraction(0.5);
        let claims = vec![
            create_claim(f.items[0].id, f.alice.id, &half),
            create_claim(f.items[0].id, f.bob.id, &half),
            full(&f.items[1], &f.alice),
        ];
        let members = vec![f.alice.clone(), f.bob.clone()];

        let totals = calculate_member_totals(&f.receipt, &f.items, &claims, &members);
        assert_eq!(totals[0].items_total, 62.5);
        assert_eq!(totals[1].items_total, 37.5);
    }

    #[test]
    fn test_claims_on_derived_lines_ignored() {
        let f = fixture();
        let claims = vec![full(&f.items[2], &f.alice), full(&f.items[1], &f.bob)];
        let members = vec![f.alice.clone(), f.bob.clone()];

        let totals = calculate_member_totals(&f.receipt, &f.items, &claims, &members);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].member_id, f.bob.id);
    }

    #[test]
    fn test_missing_tax_and_tip_are_zero() {
        let receipt = Receipt::new("Cafe");
        let item = ReceiptItem::new(receipt.id, "Latte", 4.5);
        let alice = Member::new("Alice");
        let claims = vec![full(&item, &alice)];

        let totals = calculate_member_totals(&receipt, &[item], &claims, &[alice]);
        assert_eq!(totals[0].tax_share, 0.0);
        assert_eq!(totals[0].tip_share, 0.0);
        assert_eq!(totals[0].grand_total, 4.5);
    }

    #[test]
    fn test_no_claims_no_totals() {
        let f = fixture();
        let totals = calculate_member_totals(&f.receipt, &f.items, &[], &[f.alice, f.bob]);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_claimed_items_by_member_ignores_unknown_items() {
        let f = fixture();
        let stray = ReceiptItem::new(ReceiptId::new(), "Elsewhere", 9.0);
        let claims = vec![full(&stray, &f.alice)];
        assert!(claimed_items_by_member(&f.items, &claims).is_empty());
    }
}
