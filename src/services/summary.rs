//! Receipt validation and summary
//!
//! Whole-receipt checks used to decide whether a group can move on to
//! settling, and the read-only summary shown on the settlement screen.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::split::exact_split;
use super::totals::{calculate_member_totals, MemberTotal};
use crate::models::{
    round_to_cents, ItemClaim, ItemId, Member, Receipt, ReceiptId, ReceiptItem, Split,
};

/// An item counts as claimed for settlement once this fraction is covered
///
/// Looser than the per-item full-claim tolerance so that many-way splits
/// with rounding error still let the group proceed.
pub const SETTLEMENT_CLAIM_THRESHOLD: f64 = 0.99;

/// Result of checking that every claimable item has been claimed
#[derive(Debug, Clone)]
pub struct ClaimValidation {
    pub is_valid: bool,
    /// Claimable items below the settlement threshold, in receipt order
    pub unclaimed_items: Vec<ReceiptItem>,
}

/// Settlement-ready view of a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub receipt_id: ReceiptId,
    pub merchant_name: String,
    pub currency: String,
    /// Number of claimable items
    pub total_items: usize,
    pub claimed_items: usize,
    pub unclaimed_items: usize,
    pub subtotal: Option<f64>,
    pub tax_amount: Option<f64>,
    pub tip_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub member_totals: Vec<MemberTotal>,
}

impl ReceiptSummary {
    /// Whether every claimable item has been claimed
    pub fn is_fully_claimed(&self) -> bool {
        self.unclaimed_items == 0
    }

    /// Sum of the members' grand totals
    pub fn claimed_grand_total(&self) -> f64 {
        self.member_totals.iter().map(|t| t.grand_total).sum()
    }
}

fn fractions_by_item(claims: &[ItemClaim]) -> HashMap<ItemId, f64> {
    let mut fractions: HashMap<ItemId, f64> = HashMap::new();
    for claim in claims {
        *fractions.entry(claim.receipt_item_id).or_insert(0.0) += claim.share_fraction;
    }
    fractions
}

fn counts_as_claimed(item: &ReceiptItem, fractions: &HashMap<ItemId, f64>) -> bool {
    if item.total_price == 0.0 {
        return true;
    }
    fractions.get(&item.id).copied().unwrap_or(0.0) >= SETTLEMENT_CLAIM_THRESHOLD
}

/// Check that every claimable item is at least 99% claimed
pub fn validate_all_items_claimed(items: &[ReceiptItem], claims: &[ItemClaim]) -> ClaimValidation {
    let fractions = fractions_by_item(claims);
    let unclaimed_items: Vec<ReceiptItem> = items
        .iter()
        .filter(|item| item.is_claimable() && !counts_as_claimed(item, &fractions))
        .cloned()
        .collect();

    ClaimValidation {
        is_valid: unclaimed_items.is_empty(),
        unclaimed_items,
    }
}

/// Build the settlement summary for a receipt
pub fn generate_receipt_summary(
    receipt: &Receipt,
    items: &[ReceiptItem],
    claims: &[ItemClaim],
    members: &[Member],
) -> ReceiptSummary {
    let fractions = fractions_by_item(claims);
    let claimable: Vec<&ReceiptItem> = items.iter().filter(|item| item.is_claimable()).collect();
    let claimed_items = claimable
        .iter()
        .filter(|item| counts_as_claimed(item, &fractions))
        .count();

    ReceiptSummary {
        receipt_id: receipt.id,
        merchant_name: receipt.merchant_name.clone(),
        currency: receipt.currency.clone(),
        total_items: claimable.len(),
        claimed_items,
        unclaimed_items: claimable.len() - claimed_items,
        subtotal: receipt.subtotal,
        tax_amount: receipt.tax_amount,
        tip_amount: receipt.tip_amount,
        total_amount: receipt.total_amount,
        member_totals: calculate_member_totals(receipt, items, claims, members),
    }
}

/// Turn member grand totals into exact splits for recording an expense
///
/// Each grand total is rounded to the cent; the resulting splits may differ
/// from the receipt total by the accumulated rounding.
pub fn settlement_splits(member_totals: &[MemberTotal]) -> Vec<Split> {
    let amounts: Vec<_> = member_totals
        .iter()
        .map(|t| (t.member_id, round_to_cents(t.grand_total)))
        .collect();
    exact_split(&amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberId;
    use crate::services::claims::{create_claim, ClaimOptions};

    fn claim(item: &ReceiptItem, fraction: f64) -> ItemClaim {
        create_claim(item.id, MemberId::new(), &ClaimOptions::fraction(fraction))
    }

    #[test]
    fn test_validate_tolerates_three_way_split() {
        let receipt = Receipt::new("Deli");
        let platter = ReceiptItem::new(receipt.id, "Platter", 30.0);
        let claims = vec![
            claim(&platter, 0.33),
            claim(&platter, 0.33),
            claim(&platter, 0.34),
        ];

        let result = validate_all_items_claimed(&[platter], &claims);
        assert!(result.is_valid);
        assert!(result.unclaimed_items.is_empty());
    }

    #[test]
    fn test_validate_lists_unclaimed_item() {
        let receipt = Receipt::new("Deli");
        let soup = ReceiptItem::new(receipt.id, "Soup", 8.0);
        let bread = ReceiptItem::new(receipt.id, "Bread", 3.0);
        let claims = vec![claim(&soup, 0.5), claim(&soup, 0.5)];

        let result = validate_all_items_claimed(&[soup, bread.clone()], &claims);
        assert!(!result.is_valid);
        assert_eq!(result.unclaimed_items.len(), 1);
        assert_eq!(result.unclaimed_items[0].id, bread.id);
    }

    #[test]
    fn test_validate_threshold_is_looser_than_full_claim() {
        let receipt = Receipt::new("Deli");
        let soup = ReceiptItem::new(receipt.id, "Soup", 8.0);
        let claims = vec![claim(&soup, 0.992)];
        assert!(validate_all_items_claimed(&[soup.clone()], &claims).is_valid);

        let claims = vec![claim(&soup, 0.98)];
        assert!(!validate_all_items_claimed(&[soup], &claims).is_valid);
    }

    #[test]
    fn test_validate_skips_derived_and_zero_price_lines() {
        let receipt = Receipt::new("Deli");
        let items = vec![
            ReceiptItem::tax(receipt.id, 2.0),
            ReceiptItem::tip(receipt.id, 3.0),
            ReceiptItem::new(receipt.id, "Free refill", 0.0),
        ];
        assert!(validate_all_items_claimed(&items, &[]).is_valid);
    }

    #[test]
    fn test_generate_summary() {
        let receipt =
            Receipt::new("Bistro").with_amounts(Some(100.0), Some(10.0), Some(20.0), Some(130.0));
        let steak = ReceiptItem::new(receipt.id, "Steak", 75.0);
        let salad = ReceiptItem::new(receipt.id, "Salad", 25.0);
        let tax = ReceiptItem::tax(receipt.id, 10.0);
        let alice = Member::new("Alice");
        let bob = Member::new("Bob");

        let claims = vec![create_claim(steak.id, alice.id, &ClaimOptions::default())];
        let items = vec![steak, salad, tax];
        let members = vec![alice.clone(), bob];

        let summary = generate_receipt_summary(&receipt, &items, &claims, &members);

        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.claimed_items, 1);
        assert_eq!(summary.unclaimed_items, 1);
        assert!(!summary.is_fully_claimed());
        assert_eq!(summary.subtotal, Some(100.0));
        assert_eq!(summary.tax_amount, Some(10.0));
        assert_eq!(summary.tip_amount, Some(20.0));
        assert_eq!(summary.total_amount, Some(130.0));
        assert_eq!(summary.member_totals.len(), 1);
        assert_eq!(summary.member_totals[0].member_id, alice.id);
        assert_eq!(summary.member_totals[0].grand_total, 105.0);
        assert_eq!(summary.claimed_grand_total(), 105.0);
    }

    #[test]
    fn test_settlement_splits_round_grand_totals() {
        let alice = MemberId::new();
        let bob = MemberId::new();
        let totals = vec![
            MemberTotal {
                member_id: alice,
                display_name: "Alice".into(),
                items_total: 10.0,
                tax_share: 1.0 / 3.0,
                tip_share: 0.0,
                grand_total: 10.0 + 1.0 / 3.0,
            },
            MemberTotal {
                member_id: bob,
                display_name: "Bob".into(),
                items_total: 20.0,
                tax_share: 2.0 / 3.0,
                tip_share: 0.0,
                grand_total: 20.0 + 2.0 / 3.0,
            },
        ];

        let splits = settlement_splits(&totals);
        assert_eq!(splits, vec![Split::new(alice, 10.33), Split::new(bob, 20.67)]);
    }
}
