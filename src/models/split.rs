//! Split model
//!
//! A split assigns one member's portion of an expense. The split method
//! records which strategy produced the portions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::MemberId;
use crate::error::FairshareError;

/// One member's portion of an expense
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// The member who owes this portion
    pub member_id: MemberId,

    /// Amount, rounded to two decimals
    pub amount: f64,
}

impl Split {
    /// Create a new split
    pub fn new(member_id: MemberId, amount: f64) -> Self {
        Self { member_id, amount }
    }
}

/// Strategy used to divide an expense among members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Everyone pays the same
    #[default]
    Equal,
    /// Each member pays an explicit amount
    Exact,
    /// Each member pays a percentage of the total
    Percent,
    /// Each member pays in proportion to a share count
    Shares,
}

impl SplitMethod {
    /// All split methods, in display order
    pub fn all() -> &'static [SplitMethod] {
        &[Self::Equal, Self::Exact, Self::Percent, Self::Shares]
    }

    /// Lowercase name used on the wire and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percent => "percent",
            Self::Shares => "shares",
        }
    }
}

impl fmt::Display for SplitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SplitMethod {
    type Err = FairshareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percent" | "percentage" => Ok(Self::Percent),
            "shares" => Ok(Self::Shares),
            other => Err(FairshareError::UnknownSplitMethod(other.to_string())),
        }
    }
}
