//! Split calculators
//!
//! Pure functions that divide an expense total among members under one of
//! four strategies, plus a dispatcher and a pre-submit validator.
//!
//! Only the equal split corrects its own rounding drift (the last member
//! absorbs the residual). Exact and percent splits round each share
//! independently and leave reconciliation to [`validate_split_data`], which
//! accepts up to two cents of drift.

use tracing::{debug, warn};

use crate::error::{FairshareError, FairshareResult};
use crate::models::{round_to_cents, MemberId, Money, Split, SplitMethod};

/// Maximum drift accepted between split sums and their target
pub const SPLIT_SUM_TOLERANCE: f64 = 0.02;

/// Strategy inputs for the dispatcher
///
/// Only the field matching the chosen method is read; the others may be
/// left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitParams {
    /// Members sharing an equal split, in order (last absorbs rounding)
    pub member_ids: Vec<MemberId>,
    /// Explicit amount per member
    pub amounts: Vec<(MemberId, f64)>,
    /// Percentage (0-100) per member
    pub percents: Vec<(MemberId, f64)>,
    /// Share count per member
    pub shares: Vec<(MemberId, f64)>,
}

impl SplitParams {
    /// Params for an equal split
    pub fn equal(member_ids: Vec<MemberId>) -> Self {
        Self {
            member_ids,
            ..Self::default()
        }
    }

    /// Params for an exact split
    pub fn exact(amounts: Vec<(MemberId, f64)>) -> Self {
        Self {
            amounts,
            ..Self::default()
        }
    }

    /// Params for a percent split
    pub fn percent(percents: Vec<(MemberId, f64)>) -> Self {
        Self {
            percents,
            ..Self::default()
        }
    }

    /// Params for a shares split
    pub fn shares(shares: Vec<(MemberId, f64)>) -> Self {
        Self {
            shares,
            ..Self::default()
        }
    }
}

/// Divide `total` evenly among `member_ids`
///
/// All but the last member receive `round(total / n, 2)`; the last member
/// receives whatever is left so the splits add back up to the total.
pub fn equal_split(total: f64, member_ids: &[MemberId]) -> Vec<Split> {
    let n = member_ids.len();
    if n == 0 {
        return Vec::new();
    }

    let total = Money::from_amount(total);
    let per_member = Money::from_amount(total.as_amount() / n as f64);
    let mut assigned = Money::zero();

    member_ids
        .iter()
        .enumerate()
        .map(|(i, &member_id)| {
            let amount = if i == n - 1 {
                total - assigned
            } else {
                assigned += per_member;
                per_member
            };
            Split::new(member_id, amount.as_amount())
        })
        .collect()
}

/// One split per member with an explicit amount
///
/// Zero amounts are dropped. No normalization against a total is performed.
pub fn exact_split(amounts: &[(MemberId, f64)]) -> Vec<Split> {
    amounts
        .iter()
        .filter(|(_, amount)| *amount != 0.0)
        .map(|&(member_id, amount)| Split::new(member_id, round_to_cents(amount)))
        .collect()
}

/// Each member pays `percent` of `total`
///
/// Zero-percent entries are dropped. Rounding drift is left in place.
pub fn percent_split(total: f64, percents: &[(MemberId, f64)]) -> Vec<Split> {
    percents
        .iter()
        .filter(|(_, percent)| *percent != 0.0)
        .map(|&(member_id, percent)| {
            Split::new(member_id, round_to_cents(total * percent / 100.0))
        })
        .collect()
}

/// Each member pays in proportion to their share count
///
/// A configuration whose shares add up to zero assigns nobody and returns an
/// empty list.
pub fn shares_split(total: f64, shares: &[(MemberId, f64)]) -> Vec<Split> {
    let assigned: Vec<_> = shares.iter().filter(|(_, share)| *share != 0.0).collect();
    let total_shares: f64 = assigned.iter().map(|(_, share)| share).sum();
    if total_shares == 0.0 {
        return Vec::new();
    }

    assigned
        .into_iter()
        .map(|&(member_id, share)| {
            Split::new(member_id, round_to_cents(total * share / total_shares))
        })
        .collect()
}

/// Route a split request to the matching calculator
pub fn calculate_split(method: SplitMethod, total: f64, params: &SplitParams) -> Vec<Split> {
    debug!(%method, total, "calculating split");
    match method {
        SplitMethod::Equal => equal_split(total, &params.member_ids),
        SplitMethod::Exact => exact_split(&params.amounts),
        SplitMethod::Percent => percent_split(total, &params.percents),
        SplitMethod::Shares => shares_split(total, &params.shares),
    }
}

/// Route a split request by method name
///
/// An unrecognized name yields an empty split list instead of an error.
/// Callers that need to report the bad name should parse a [`SplitMethod`]
/// themselves and call [`calculate_split`].
pub fn calculate_split_by_name(method: &str, total: f64, params: &SplitParams) -> Vec<Split> {
    match method.parse::<SplitMethod>() {
        Ok(method) => calculate_split(method, total, params),
        Err(_) => {
            warn!(method, "unknown split method; returning no splits");
            Vec::new()
        }
    }
}

/// Outcome of a pre-submit split check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitValidation {
    /// Whether the split data can be submitted
    pub is_valid: bool,
    /// User-facing explanation when invalid
    pub error: Option<String>,
}

impl SplitValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    /// Convert into a result carrying the message as a validation error
    pub fn into_result(self) -> FairshareResult<()> {
        match self.error {
            Some(message) if !self.is_valid => Err(FairshareError::Validation(message)),
            _ => Ok(()),
        }
    }
}

/// Check strategy-specific split data before calculating
pub fn validate_split_data(method: SplitMethod, total: f64, params: &SplitParams) -> SplitValidation {
    match method {
        SplitMethod::Equal => {
            if params.member_ids.is_empty() {
                SplitValidation::invalid("Select at least one member to split with")
            } else {
                SplitValidation::valid()
            }
        }
        SplitMethod::Exact => {
            let sum: f64 = params.amounts.iter().map(|(_, amount)| amount).sum();
            if within_tolerance(sum, total) {
                SplitValidation::valid()
            } else {
                SplitValidation::invalid(format!(
                    "Amounts must add up to {:.2} (currently {:.2})",
                    total, sum
                ))
            }
        }
        SplitMethod::Percent => {
            let sum: f64 = params.percents.iter().map(|(_, percent)| percent).sum();
            if within_tolerance(sum, 100.0) {
                SplitValidation::valid()
            } else {
                SplitValidation::invalid(format!(
                    "Percentages must add up to 100% (currently {:.2}%)",
                    sum
                ))
            }
        }
        SplitMethod::Shares => {
            let sum: f64 = params.shares.iter().map(|(_, share)| share).sum();
            if sum > 0.0 {
                SplitValidation::valid()
            } else {
                SplitValidation::invalid("Total shares must be greater than zero")
            }
        }
    }
}

/// Float noise allowance so a difference of exactly the tolerance still passes
const TOLERANCE_EPSILON: f64 = 1e-9;

fn within_tolerance(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= SPLIT_SUM_TOLERANCE + TOLERANCE_EPSILON
}
