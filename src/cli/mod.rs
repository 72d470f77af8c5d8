//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod expense;
pub mod member;
pub mod receipt;
pub mod split;

pub use expense::{handle_balance_command, handle_expense_command, ExpenseCommands};
pub use member::{handle_member_command, MemberCommands};
pub use receipt::{handle_receipt_command, ReceiptCommands};
pub use split::{handle_split_command, SplitArgs};

use clap::Args;

use crate::error::{FairshareError, FairshareResult};
use crate::models::{MemberId, Money, SplitMethod};
use crate::services::{MemberService, SplitParams};

/// Parse a user-entered amount such as "12", "12.5" or "12.50"
pub(crate) fn parse_amount(input: &str) -> FairshareResult<f64> {
    Money::parse(input)
        .map(|money| money.as_amount())
        .map_err(|e| {
            FairshareError::Validation(format!(
                "Invalid amount '{}'. Use a format like '12.50'. Error: {}",
                input, e
            ))
        })
}

/// Split a "member=value" argument
pub(crate) fn parse_assignment(input: &str) -> FairshareResult<(&str, &str)> {
    input
        .split_once('=')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .ok_or_else(|| {
            FairshareError::Validation(format!(
                "Expected member=value, got '{}'",
                input
            ))
        })
}

fn parse_number(input: &str) -> FairshareResult<f64> {
    input
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FairshareError::Validation(format!("Invalid number '{}'", input)))
}

/// How to split an amount, shared by `split` and `expense add`
#[derive(Args, Debug, Clone)]
pub struct SplitSpec {
    /// Split method (equal, exact, percent, shares)
    #[arg(short, long, default_value = "equal")]
    pub method: String,

    /// Members sharing an equal split (defaults to everyone)
    #[arg(long = "member", value_name = "MEMBER")]
    pub members: Vec<String>,

    /// Per-member amount, percentage or share count, as member=value
    #[arg(long = "value", value_name = "MEMBER=VALUE")]
    pub values: Vec<String>,
}

impl SplitSpec {
    /// Parse the method and resolve member names into split parameters
    pub(crate) fn resolve(
        &self,
        members: &MemberService,
    ) -> FairshareResult<(SplitMethod, SplitParams)> {
        let method: SplitMethod = self.method.parse()?;

        let params = match method {
            SplitMethod::Equal => {
                let ids: Vec<MemberId> = if self.members.is_empty() {
                    members.list()?.into_iter().map(|m| m.id).collect()
                } else {
                    members
                        .resolve_all(&self.members)?
                        .into_iter()
                        .map(|m| m.id)
                        .collect()
                };
                SplitParams::equal(ids)
            }
            SplitMethod::Exact => SplitParams::exact(self.assignments(members, parse_amount)?),
            SplitMethod::Percent => SplitParams::percent(self.assignments(members, parse_number)?),
            SplitMethod::Shares => SplitParams::shares(self.assignments(members, parse_number)?),
        };

        Ok((method, params))
    }

    fn assignments(
        &self,
        members: &MemberService,
        parse_value: fn(&str) -> FairshareResult<f64>,
    ) -> FairshareResult<Vec<(MemberId, f64)>> {
        self.values
            .iter()
            .map(|raw| {
                let (name, value) = parse_assignment(raw)?;
                let member = members.resolve(name)?;
                Ok((member.id, parse_value(value)?))
            })
            .collect()
    }
}
