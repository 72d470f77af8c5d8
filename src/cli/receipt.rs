//! Receipt CLI commands
//!
//! Recording receipts, claiming lines, and turning a fully claimed receipt
//! into a group expense.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};

use super::parse_amount;
use crate::config::settings::Settings;
use crate::display::report::{format_amount, format_fraction};
use crate::display::{
    format_receipt_details, format_receipt_list, format_splits, format_summary, format_validation,
};
use crate::error::{FairshareError, FairshareResult};
use crate::export::{export_member_totals_csv, export_summary_json, export_summary_yaml, SummaryExport};
use crate::models::{Receipt, ReceiptItem};
use crate::services::{ClaimOptions, MemberService, ReceiptImport, ReceiptService};
use crate::storage::Storage;

/// Kind of receipt line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LineKind {
    /// A claimable item
    Item,
    Tax,
    Tip,
    Subtotal,
    Total,
    Discount,
}

impl LineKind {
    fn apply(self, item: &mut ReceiptItem) {
        match self {
            LineKind::Item => {}
            LineKind::Tax => item.is_tax = true,
            LineKind::Tip => item.is_tip = true,
            LineKind::Subtotal => item.is_subtotal = true,
            LineKind::Total => item.is_total = true,
            LineKind::Discount => item.is_discount = true,
        }
    }
}

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Member totals only
    Csv,
    /// Full summary with lines and claims
    Json,
    /// Full summary, human-readable
    Yaml,
}

/// Receipt subcommands
#[derive(Subcommand, Debug)]
pub enum ReceiptCommands {
    /// Record a new receipt
    Add {
        /// Merchant name
        merchant: String,
        #[arg(long)]
        subtotal: Option<String>,
        #[arg(long)]
        tax: Option<String>,
        #[arg(long)]
        tip: Option<String>,
        #[arg(long)]
        total: Option<String>,
        /// Receipt date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Currency code
        #[arg(long)]
        currency: Option<String>,
    },
    /// Add a line to a receipt
    Item {
        /// Receipt ID or merchant name
        receipt: String,
        /// Line description
        description: String,
        /// Line total (negative for discounts)
        #[arg(allow_hyphen_values = true)]
        price: String,
        #[arg(short, long)]
        quantity: Option<f64>,
        #[arg(short, long, value_enum, default_value = "item")]
        kind: LineKind,
    },
    /// Import a receipt and its lines from a JSON file
    Import {
        file: PathBuf,
    },
    /// List receipts
    List,
    /// Show a receipt's lines and claims
    Show {
        /// Receipt ID or merchant name
        receipt: String,
    },
    /// Claim a line for a member
    Claim {
        /// Receipt ID or merchant name
        receipt: String,
        /// Line number, ID or description
        item: String,
        /// Member name or ID
        member: String,
        /// Portion to claim, between 0 and 1
        #[arg(short, long, conflicts_with = "split")]
        fraction: Option<f64>,
        /// Claim one of N equal parts
        #[arg(short, long)]
        split: Option<u32>,
    },
    /// Remove a member's claim on a line
    Unclaim {
        receipt: String,
        item: String,
        member: String,
    },
    /// Show what each member owes
    Summary {
        receipt: String,
    },
    /// Check that every line has been claimed
    Validate {
        receipt: String,
    },
    /// Export the summary to a file
    Export {
        receipt: String,
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Record a fully claimed receipt as an expense
    Settle {
        receipt: String,
        /// Member who paid the bill
        #[arg(short, long)]
        paid_by: String,
    },
}

fn optional_amount(input: Option<String>) -> FairshareResult<Option<f64>> {
    input.as_deref().map(parse_amount).transpose()
}

fn parse_date(input: &str) -> FairshareResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        FairshareError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", input))
    })
}

fn find_receipt(storage: &Storage, reference: &str) -> FairshareResult<Receipt> {
    storage
        .receipts
        .find(reference)?
        .ok_or_else(|| FairshareError::receipt_not_found(reference))
}

fn find_item(storage: &Storage, receipt: &Receipt, reference: &str) -> FairshareResult<ReceiptItem> {
    storage
        .receipts
        .find_item(receipt.id, reference)?
        .ok_or_else(|| FairshareError::item_not_found(reference))
}

/// Handle a receipt command
pub fn handle_receipt_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReceiptCommands,
) -> FairshareResult<()> {
    let service = ReceiptService::new(storage);
    let members = MemberService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ReceiptCommands::Add {
            merchant,
            subtotal,
            tax,
            tip,
            total,
            date,
            currency,
        } => {
            let mut receipt = Receipt::new(merchant.trim()).with_amounts(
                optional_amount(subtotal)?,
                optional_amount(tax)?,
                optional_amount(tip)?,
                optional_amount(total)?,
            );
            receipt.receipt_date = date.as_deref().map(parse_date).transpose()?;
            if let Some(currency) = currency {
                receipt.currency = currency.to_uppercase();
            }

            let receipt = service.create(receipt)?;
            println!("Recorded receipt: {}", receipt);
            println!("  ID: {}", receipt.id);
        }

        ReceiptCommands::Item {
            receipt,
            description,
            price,
            quantity,
            kind,
        } => {
            let receipt = find_receipt(storage, &receipt)?;
            let mut item = ReceiptItem::new(receipt.id, description.trim(), parse_amount(&price)?);
            if let Some(quantity) = quantity {
                item.quantity = quantity;
            }
            kind.apply(&mut item);

            service.add_items(vec![item.clone()])?;
            println!(
                "Added {} line to {}: {} {}",
                item.kind_label(),
                receipt.merchant_name,
                item.description,
                format_amount(item.total_price, symbol)
            );
        }

        ReceiptCommands::Import { file } => {
            let reader = File::open(&file).map_err(|e| {
                FairshareError::Io(format!("Failed to open {}: {}", file.display(), e))
            })?;
            let doc: ReceiptImport = serde_json::from_reader(BufReader::new(reader))?;
            let snapshot = service.import(doc)?;
            println!(
                "Imported {} with {} line(s)",
                snapshot.receipt,
                snapshot.items.len()
            );
            println!("  ID: {}", snapshot.receipt.id);
        }

        ReceiptCommands::List => {
            print!("{}", format_receipt_list(&storage.receipts.get_all()?, symbol));
        }

        ReceiptCommands::Show { receipt } => {
            let receipt = find_receipt(storage, &receipt)?;
            let snapshot = service.snapshot(receipt.id)?;
            print!(
                "{}",
                format_receipt_details(&snapshot, &members.list()?, symbol)
            );
        }

        ReceiptCommands::Claim {
            receipt,
            item,
            member,
            fraction,
            split,
        } => {
            let receipt = find_receipt(storage, &receipt)?;
            let item = find_item(storage, &receipt, &item)?;
            let member = members.resolve(&member)?;

            let options = ClaimOptions {
                share_fraction: fraction,
                split_count: split,
                ..ClaimOptions::default()
            }
            .via(settings.default_claim_source.clone());

            let claim = service.claim(receipt.id, item.id, member.id, options)?;
            println!(
                "{} claimed {} of {} ({})",
                member.display_name,
                format_fraction(claim.share_fraction),
                item.description,
                format_amount(item.total_price * claim.share_fraction, symbol)
            );
        }

        ReceiptCommands::Unclaim {
            receipt,
            item,
            member,
        } => {
            let receipt = find_receipt(storage, &receipt)?;
            let item = find_item(storage, &receipt, &item)?;
            let member = members.resolve(&member)?;

            service.unclaim(item.id, member.id)?;
            println!("{} no longer claims {}", member.display_name, item.description);
        }

        ReceiptCommands::Summary { receipt } => {
            let receipt = find_receipt(storage, &receipt)?;
            print!("{}", format_summary(&service.summary(receipt.id)?, symbol));
        }

        ReceiptCommands::Validate { receipt } => {
            let receipt = find_receipt(storage, &receipt)?;
            println!("{}", format_validation(&service.validate(receipt.id)?, symbol));
        }

        ReceiptCommands::Export {
            receipt,
            output,
            format,
            pretty,
        } => {
            let receipt = find_receipt(storage, &receipt)?;
            let summary = service.summary(receipt.id)?;

            let file = File::create(&output).map_err(|e| {
                FairshareError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            let writer = BufWriter::new(file);

            match format {
                ExportFormat::Csv => export_member_totals_csv(&summary, writer)?,
                ExportFormat::Json | ExportFormat::Yaml => {
                    let snapshot = service.snapshot(receipt.id)?;
                    let export = SummaryExport::new(&snapshot, summary);
                    if matches!(format, ExportFormat::Json) {
                        export_summary_json(&export, writer, pretty)?;
                    } else {
                        export_summary_yaml(&export, writer)?;
                    }
                }
            }
            println!("Summary exported to: {}", output.display());
        }

        ReceiptCommands::Settle { receipt, paid_by } => {
            let receipt = find_receipt(storage, &receipt)?;
            let payer = members.resolve(&paid_by)?;
            let expense = service.settle(receipt.id, payer.id)?;

            println!(
                "Recorded {} ({}) paid by {}",
                expense.description,
                format_amount(expense.amount, symbol),
                payer.display_name
            );
            println!("{}", format_splits(&expense.splits, &members.list()?, symbol));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_kind_sets_flag() {
        let receipt = Receipt::new("Deli");
        let mut item = ReceiptItem::new(receipt.id, "Service", 4.0);
        LineKind::Tip.apply(&mut item);
        assert!(item.is_tip);
        assert!(!item.is_claimable());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-09").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
        );
        assert!(parse_date("09/03/2024").unwrap_err().is_validation());
    }
}
