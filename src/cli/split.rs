//! `fairshare split`: calculate a split without recording anything

use clap::Args;

use super::{parse_amount, SplitSpec};
use crate::config::settings::Settings;
use crate::display::format_splits;
use crate::error::FairshareResult;
use crate::services::{calculate_split, validate_split_data, MemberService};
use crate::storage::Storage;

/// Arguments for the split calculator
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Amount to split (e.g., "100" or "100.00")
    pub amount: String,

    #[command(flatten)]
    pub spec: SplitSpec,
}

/// Handle the split command
pub fn handle_split_command(
    storage: &Storage,
    settings: &Settings,
    args: SplitArgs,
) -> FairshareResult<()> {
    let members = MemberService::new(storage);
    let total = parse_amount(&args.amount)?;
    let (method, params) = args.spec.resolve(&members)?;

    validate_split_data(method, total, &params).into_result()?;
    let splits = calculate_split(method, total, &params);

    println!("{} split of {}", method, args.amount);
    println!(
        "{}",
        format_splits(&splits, &members.list()?, &settings.currency_symbol)
    );
    Ok(())
}
