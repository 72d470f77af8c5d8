//! Expense, settlement and balance CLI commands

use clap::Subcommand;

use super::{parse_amount, SplitSpec};
use crate::config::settings::Settings;
use crate::display::{format_balances, format_expense_list, format_splits};
use crate::display::report::format_amount;
use crate::error::FairshareResult;
use crate::services::{ExpenseService, MemberService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// What the expense was for
        description: String,
        /// Amount paid (e.g., "45.00")
        amount: String,
        /// Member who paid
        #[arg(short, long)]
        paid_by: String,
        #[command(flatten)]
        spec: SplitSpec,
    },
    /// List recorded expenses
    List,
    /// Record a repayment from one member to another
    Settle {
        /// Member paying back
        from: String,
        /// Member being paid
        to: String,
        /// Amount repaid
        amount: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> FairshareResult<()> {
    let members = MemberService::new(storage);
    let service = ExpenseService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            paid_by,
            spec,
        } => {
            let payer = members.resolve(&paid_by)?;
            let (method, params) = spec.resolve(&members)?;
            let expense = service.add(&description, parse_amount(&amount)?, payer.id, method, &params)?;

            println!(
                "Recorded {} ({}) paid by {}",
                expense.description,
                format_amount(expense.amount, symbol),
                payer.display_name
            );
            println!("{}", format_splits(&expense.splits, &members.list()?, symbol));
        }
        ExpenseCommands::List => {
            print!(
                "{}",
                format_expense_list(&service.list()?, &members.list()?, symbol)
            );
        }
        ExpenseCommands::Settle { from, to, amount } => {
            let from = members.resolve(&from)?;
            let to = members.resolve(&to)?;
            let settlement = service.settle(from.id, to.id, parse_amount(&amount)?)?;
            println!(
                "Recorded {} from {} to {}",
                format_amount(settlement.amount, symbol),
                from.display_name,
                to.display_name
            );
        }
    }

    Ok(())
}

/// Handle the balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    colored: bool,
) -> FairshareResult<()> {
    let balances = ExpenseService::new(storage).balances()?;
    println!(
        "{}",
        format_balances(&balances, &settings.currency_symbol, colored)
    );
    Ok(())
}
