//! Claim model
//!
//! Pure functions deciding whether a member may claim a receipt line,
//! building claim records, and deriving per-item claim state.
//!
//! Nothing here sees more than one item snapshot at a time, so the
//! "at most one claim per member per item" and "claims never exceed 100%"
//! rules are left to whatever serializes writes. `create_claim` only clamps
//! to the `max_fraction` the caller supplies.

use chrono::Utc;
use std::fmt;

use crate::models::{ClaimId, ClaimType, ItemClaim, ItemId, MemberId, ReceiptItem, DEFAULT_CLAIM_SOURCE};

/// An item is fully claimed once less than this fraction remains
pub const FULL_CLAIM_TOLERANCE: f64 = 0.002;

/// Why a member may not claim an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDenial {
    /// Tax, tip, subtotal, total and discount lines
    NotClaimable,
    /// The member already holds a full claim
    AlreadyClaimed,
    /// Other members have claimed the whole item
    FullyClaimed,
}

impl fmt::Display for ClaimDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotClaimable => write!(f, "This item cannot be claimed"),
            Self::AlreadyClaimed => write!(f, "You already claimed this item"),
            Self::FullyClaimed => write!(f, "Item is fully claimed"),
        }
    }
}

/// Result of asking whether a member may claim an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimEligibility {
    pub can_claim: bool,
    pub reason: Option<ClaimDenial>,
}

impl ClaimEligibility {
    fn allowed() -> Self {
        Self {
            can_claim: true,
            reason: None,
        }
    }

    fn denied(reason: ClaimDenial) -> Self {
        Self {
            can_claim: false,
            reason: Some(reason),
        }
    }
}

/// Options for building a claim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimOptions {
    /// Portion of the item to claim (defaults to 1)
    pub share_fraction: Option<f64>,
    /// Claim "1 of N"; overrides `share_fraction` when set
    pub split_count: Option<u32>,
    /// Provenance tag (defaults to "app")
    pub claimed_via: Option<String>,
    /// Upper bound for the resulting fraction
    pub max_fraction: Option<f64>,
}

impl ClaimOptions {
    /// Claim a specific fraction
    pub fn fraction(share_fraction: f64) -> Self {
        Self {
            share_fraction: Some(share_fraction),
            ..Self::default()
        }
    }

    /// Claim one of `split_count` equal parts
    pub fn split_between(split_count: u32) -> Self {
        Self {
            split_count: Some(split_count),
            ..Self::default()
        }
    }

    /// Cap the resulting fraction
    pub fn with_max_fraction(mut self, max_fraction: f64) -> Self {
        self.max_fraction = Some(max_fraction);
        self
    }

    /// Tag where the claim came from
    pub fn via(mut self, source: impl Into<String>) -> Self {
        self.claimed_via = Some(source.into());
        self
    }
}

/// Sum of share fractions over all claims on the item
pub fn claimed_fraction(item: &ReceiptItem) -> f64 {
    item.claims.iter().map(|c| c.share_fraction).sum()
}

/// The member's existing claim on the item, if any
pub fn member_claim(item: &ReceiptItem, member_id: MemberId) -> Option<&ItemClaim> {
    item.claims.iter().find(|c| c.member_id == member_id)
}

/// Decide whether a member may claim the item at all
///
/// An allowed result does not bound how much may be claimed; query
/// [`get_item_remaining_fraction`] (or [`claimable_fraction`]) and pass it as
/// `max_fraction` to [`create_claim`].
pub fn can_claim_item(item: &ReceiptItem, member_id: MemberId) -> ClaimEligibility {
    if !item.is_claimable() {
        return ClaimEligibility::denied(ClaimDenial::NotClaimable);
    }

    let existing = member_claim(item, member_id);
    if existing.is_some_and(|c| c.share_fraction == 1.0) {
        return ClaimEligibility::denied(ClaimDenial::AlreadyClaimed);
    }

    if existing.is_none() && is_item_fully_claimed(item) {
        return ClaimEligibility::denied(ClaimDenial::FullyClaimed);
    }

    ClaimEligibility::allowed()
}

/// Build a claim record
///
/// `split_count` wins over `share_fraction`; the fraction is then clamped to
/// `max_fraction` and the claim type derived from the final value. No check
/// against other claims is made.
pub fn create_claim(item_id: ItemId, member_id: MemberId, options: &ClaimOptions) -> ItemClaim {
    let split_count = options.split_count.filter(|&count| count > 0);

    let mut share_fraction = match split_count {
        Some(count) => 1.0 / f64::from(count),
        None => options.share_fraction.unwrap_or(1.0),
    };

    if let Some(max_fraction) = options.max_fraction {
        if share_fraction > max_fraction {
            share_fraction = max_fraction;
        }
    }

    ItemClaim {
        id: ClaimId::new(),
        receipt_item_id: item_id,
        member_id,
        claim_type: ClaimType::from_fraction(share_fraction),
        share_fraction,
        split_count,
        claimed_at: Utc::now(),
        claimed_via: options
            .claimed_via
            .clone()
            .unwrap_or_else(|| DEFAULT_CLAIM_SOURCE.to_string()),
    }
}

/// Monetary amount covered by all claims on the item
///
/// Over-claimed items report more than their price.
pub fn get_item_claimed_amount(item: &ReceiptItem) -> f64 {
    item.total_price * claimed_fraction(item)
}

/// Fraction of the item nobody has claimed yet, never below zero
pub fn get_item_remaining_fraction(item: &ReceiptItem) -> f64 {
    (1.0 - claimed_fraction(item)).max(0.0)
}

/// Whether the claims cover the whole item, within rounding tolerance
///
/// Zero-price items have nothing to claim and always count as fully claimed.
pub fn is_item_fully_claimed(item: &ReceiptItem) -> bool {
    if item.total_price == 0.0 {
        return true;
    }
    1.0 - claimed_fraction(item) < FULL_CLAIM_TOLERANCE
}

/// Largest fraction the member could hold after replacing their own claim
///
/// Because claims are deleted and recreated rather than edited, the member's
/// existing fraction is available to them again.
pub fn claimable_fraction(item: &ReceiptItem, member_id: MemberId) -> f64 {
    let own = member_claim(item, member_id).map_or(0.0, |c| c.share_fraction);
    (get_item_remaining_fraction(item) + own).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReceiptId;

    fn item(price: f64) -> ReceiptItem {
        ReceiptItem::new(ReceiptId::new(), "Pizza", price)
    }

    fn claim_on(item: &ReceiptItem, member_id: MemberId, fraction: f64) -> ItemClaim {
        create_claim(item.id, member_id, &ClaimOptions::fraction(fraction))
    }

    fn with_fractions(price: f64, fractions: &[f64]) -> ReceiptItem {
        let base = item(price);
        let claims = fractions
            .iter()
            .map(|&f| claim_on(&base, MemberId::new(), f))
            .collect();
        base.with_claims(claims)
    }

    #[test]
    fn test_cannot_claim_derived_lines() {
        let receipt_id = ReceiptId::new();
        let member = MemberId::new();
        for line in [ReceiptItem::tax(receipt_id, 5.0), ReceiptItem::tip(receipt_id, 5.0)] {
            let result = can_claim_item(&line, member);
            assert!(!result.can_claim);
            assert_eq!(result.reason, Some(ClaimDenial::NotClaimable));
            assert_eq!(
                result.reason.unwrap().to_string(),
                "This item cannot be claimed"
            );
        }
    }

    #[test]
    fn test_cannot_claim_twice_in_full() {
        let member = MemberId::new();
        let base = item(10.0);
        let claim = claim_on(&base, member, 1.0);
        let pizza = base.with_claims(vec![claim]);

        let result = can_claim_item(&pizza, member);
        assert_eq!(result.reason, Some(ClaimDenial::AlreadyClaimed));
        assert_eq!(
            result.reason.unwrap().to_string(),
            "You already claimed this item"
        );
    }

    #[test]
    fn test_cannot_claim_fully_claimed_item() {
        let pizza = with_fractions(10.0, &[0.5, 0.5]);
        let result = can_claim_item(&pizza, MemberId::new());
        assert!(!result.can_claim);
        assert_eq!(result.reason, Some(ClaimDenial::FullyClaimed));
    }

    #[test]
    fn test_partial_holder_may_claim_fully_claimed_item() {
        let member = MemberId::new();
        let base = item(10.0);
        let claims = vec![claim_on(&base, member, 0.5), claim_on(&base, MemberId::new(), 0.5)];
        let pizza = base.with_claims(claims);

        assert!(can_claim_item(&pizza, member).can_claim);
    }

    #[test]
    fn test_can_claim_open_item() {
        let pizza = with_fractions(10.0, &[0.25]);
        let result = can_claim_item(&pizza, MemberId::new());
        assert!(result.can_claim);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_create_claim_defaults() {
        let claim = create_claim(ItemId::new(), MemberId::new(), &ClaimOptions::default());
        assert_eq!(claim.share_fraction, 1.0);
        assert_eq!(claim.claim_type, ClaimType::Full);
        assert_eq!(claim.claimed_via, "app");
        assert!(claim.split_count.is_none());
    }

    #[test]
    fn test_create_claim_split_count_overrides_fraction() {
        let options = ClaimOptions {
            share_fraction: Some(0.9),
            split_count: Some(4),
            ..ClaimOptions::default()
        };
        let claim = create_claim(ItemId::new(), MemberId::new(), &options);
        assert_eq!(claim.share_fraction, 0.25);
        assert_eq!(claim.split_count, Some(4));
        assert_eq!(claim.claim_type, ClaimType::Split);
    }

    #[test]
    fn test_create_claim_zero_split_count_ignored() {
        let claim = create_claim(
            ItemId::new(),
            MemberId::new(),
            &ClaimOptions::split_between(0),
        );
        assert_eq!(claim.share_fraction, 1.0);
        assert!(claim.split_count.is_none());
    }

    #[test]
    fn test_create_claim_clamps_then_derives_type() {
        let options = ClaimOptions::default().with_max_fraction(0.4).via("web");
        let claim = create_claim(ItemId::new(), MemberId::new(), &options);
        assert_eq!(claim.share_fraction, 0.4);
        assert_eq!(claim.claim_type, ClaimType::Split);
        assert_eq!(claim.claimed_via, "web");

        let options = ClaimOptions::fraction(0.3).with_max_fraction(0.4);
        let claim = create_claim(ItemId::new(), MemberId::new(), &options);
        assert_eq!(claim.share_fraction, 0.3);
    }

    #[test]
    fn test_claimed_amount_and_remaining() {
        let pizza = with_fractions(40.0, &[0.25, 0.5]);
        assert_eq!(get_item_claimed_amount(&pizza), 30.0);
        assert_eq!(get_item_remaining_fraction(&pizza), 0.25);
        assert_eq!(
            get_item_remaining_fraction(&pizza),
            1.0 - get_item_claimed_amount(&pizza) / pizza.total_price
        );
    }

    #[test]
    fn test_no_claims() {
        let pizza = item(12.0);
        assert_eq!(get_item_claimed_amount(&pizza), 0.0);
        assert_eq!(get_item_remaining_fraction(&pizza), 1.0);
        assert!(!is_item_fully_claimed(&pizza));
    }

    #[test]
    fn test_full_claim_tolerance_boundary() {
        assert!(!is_item_fully_claimed(&with_fractions(10.0, &[0.997])));
        assert!(is_item_fully_claimed(&with_fractions(10.0, &[0.999])));
        assert!(is_item_fully_claimed(&with_fractions(10.0, &[0.9995])));
        assert!(is_item_fully_claimed(&with_fractions(10.0, &[0.333, 0.333, 0.334])));
    }

    #[test]
    fn test_over_claim_floors_remaining() {
        let pizza = with_fractions(10.0, &[0.6, 0.6]);
        assert_eq!(get_item_remaining_fraction(&pizza), 0.0);
        assert!((get_item_claimed_amount(&pizza) - 12.0).abs() < 1e-9);
        assert!(is_item_fully_claimed(&pizza));
    }

    #[test]
    fn test_zero_price_item_is_fully_claimed() {
        let free = item(0.0);
        assert!(is_item_fully_claimed(&free));
        assert_eq!(get_item_claimed_amount(&free), 0.0);
    }

    #[test]
    fn test_claimable_fraction_includes_own_claim() {
        let member = MemberId::new();
        let base = item(10.0);
        let claims = vec![claim_on(&base, member, 0.25), claim_on(&base, MemberId::new(), 0.5)];
        let pizza = base.with_claims(claims);

        assert_eq!(claimable_fraction(&pizza, member), 0.5);
        assert_eq!(claimable_fraction(&pizza, MemberId::new()), 0.25);
    }
}
