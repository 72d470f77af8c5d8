//! CSV export of member totals

use std::io::Write;

use serde::Serialize;

use crate::error::FairshareResult;
use crate::models::round_to_cents;
use crate::services::summary::ReceiptSummary;

#[derive(Serialize)]
struct MemberTotalRecord<'a> {
    member_id: String,
    member: &'a str,
    items_total: f64,
    tax_share: f64,
    tip_share: f64,
    grand_total: f64,
}

/// Write one row per member with a claimed amount, rounded to the cent
pub fn export_member_totals_csv<W: Write>(
    summary: &ReceiptSummary,
    writer: W,
) -> FairshareResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for total in &summary.member_totals {
        csv_writer.serialize(MemberTotalRecord {
            member_id: total.member_id.as_uuid().to_string(),
            member: &total.display_name,
            items_total: round_to_cents(total.items_total),
            tax_share: round_to_cents(total.tax_share),
            tip_share: round_to_cents(total.tip_share),
            grand_total: round_to_cents(total.grand_total),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
