//! YAML export of a receipt summary

use std::io::Write;

use crate::error::{FairshareError, FairshareResult};
use crate::export::json::SummaryExport;

fn export_err(e: impl std::fmt::Display) -> FairshareError {
    FairshareError::Export(e.to_string())
}

/// Write the export as YAML with a short header comment
pub fn export_summary_yaml<W: Write>(export: &SummaryExport, mut writer: W) -> FairshareResult<()> {
    writeln!(writer, "# FairShare receipt summary").map_err(export_err)?;
    writeln!(writer, "# Receipt: {}", export.summary.merchant_name).map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, export).map_err(export_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Receipt, ReceiptItem};
    use crate::services::claims::{create_claim, ClaimOptions};
    use crate::services::receipt::ReceiptSnapshot;
    use crate::services::summary::generate_receipt_summary;

    #[test]
    fn test_yaml_export() {
        let receipt = Receipt::new("Cafe");
        let alice = Member::new("Alice");
        let latte = ReceiptItem::new(receipt.id, "Latte", 4.5);
        let claim = create_claim(latte.id, alice.id, &ClaimOptions::default());
        let items = vec![latte.with_claims(vec![claim.clone()])];
        let claims = vec![claim];
        let summary = generate_receipt_summary(&receipt, &items, &claims, &[alice]);
        let export = SummaryExport::new(
            &ReceiptSnapshot {
                receipt,
                items,
                claims,
            },
            summary,
        );

        let mut buffer = Vec::new();
        export_summary_yaml(&export, &mut buffer).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.starts_with("# FairShare receipt summary\n# Receipt: Cafe"));
        let body: String = output
            .lines()
            .filter(|l| !l.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");
        let back: SummaryExport = serde_yaml::from_str(&body).unwrap();
        assert_eq!(back.summary.merchant_name, "Cafe");
        assert_eq!(back.summary.member_totals[0].display_name, "Alice");
    }
}
