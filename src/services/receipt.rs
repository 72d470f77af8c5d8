//! Receipt service
//!
//! Ties the claim model and the aggregator to stored receipts: recording
//! receipts and their lines, claiming and unclaiming items, summarising,
//! and settling a fully claimed receipt as a group expense.
//!
//! Claim writes go through here one at a time, which is what makes the
//! "at most one claim per member per item" and "at most 100% claimed" rules
//! hold for stored data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::claims::{
    can_claim_item, claimable_fraction, create_claim, member_claim, ClaimDenial, ClaimOptions,
    FULL_CLAIM_TOLERANCE,
};
use super::summary::{
    generate_receipt_summary, settlement_splits, validate_all_items_claimed, ClaimValidation,
    ReceiptSummary,
};
use super::totals::calculate_member_totals;
use crate::audit::EntityType;
use crate::error::{FairshareError, FairshareResult};
use crate::models::{
    round_to_cents, Expense, ItemClaim, ItemId, MemberId, Receipt, ReceiptId, ReceiptItem,
    ReceiptStatus, SplitMethod,
};
use crate::storage::Storage;

/// A receipt with its lines and every claim on them
#[derive(Debug, Clone)]
pub struct ReceiptSnapshot {
    pub receipt: Receipt,
    /// Lines in receipt order, each with its claims attached
    pub items: Vec<ReceiptItem>,
    /// All claims on the receipt's lines
    pub claims: Vec<ItemClaim>,
}

impl ReceiptSnapshot {
    pub fn item(&self, id: ItemId) -> Option<&ReceiptItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// A receipt as produced by an extraction step, ready to be imported
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptImport {
    pub merchant_name: String,
    #[serde(default)]
    pub receipt_date: Option<NaiveDate>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub subtotal: Option<f64>,
    #[serde(default)]
    pub tax_amount: Option<f64>,
    #[serde(default)]
    pub tip_amount: Option<f64>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub items: Vec<ImportedLine>,
}

/// One extracted receipt line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedLine {
    pub description: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    pub total_price: f64,
    #[serde(default)]
    pub is_tax: bool,
    #[serde(default)]
    pub is_tip: bool,
    #[serde(default)]
    pub is_subtotal: bool,
    #[serde(default)]
    pub is_total: bool,
    #[serde(default)]
    pub is_discount: bool,
}

impl ImportedLine {
    fn into_item(self, receipt_id: ReceiptId) -> ReceiptItem {
        let mut item = ReceiptItem::new(receipt_id, self.description, self.total_price);
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        item.unit_price = self.unit_price;
        item.is_tax = self.is_tax;
        item.is_tip = self.is_tip;
        item.is_subtotal = self.is_subtotal;
        item.is_total = self.is_total;
        item.is_discount = self.is_discount;
        item
    }
}

fn check_amount(label: &str, amount: Option<f64>) -> FairshareResult<()> {
    match amount {
        Some(value) if !value.is_finite() || value < 0.0 => Err(FairshareError::Validation(
            format!("{} must be a non-negative amount", label),
        )),
        _ => Ok(()),
    }
}

/// Service for receipts and item claims
pub struct ReceiptService<'a> {
    storage: &'a Storage,
}

impl<'a> ReceiptService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new receipt
    pub fn create(&self, receipt: Receipt) -> FairshareResult<Receipt> {
        if receipt.merchant_name.trim().is_empty() {
            return Err(FairshareError::Validation(
                "Merchant name cannot be empty".into(),
            ));
        }
        check_amount("Subtotal", receipt.subtotal)?;
        check_amount("Tax", receipt.tax_amount)?;
        check_amount("Tip", receipt.tip_amount)?;
        check_amount("Total", receipt.total_amount)?;

        self.storage.receipts.upsert(receipt.clone())?;
        self.storage.receipts.save()?;

        self.storage.log_create(
            EntityType::Receipt,
            receipt.id.to_string(),
            Some(receipt.merchant_name.clone()),
            &receipt,
        );

        debug!(receipt = %receipt.id, merchant = %receipt.merchant_name, "receipt created");
        Ok(receipt)
    }

    /// Append lines to an existing receipt
    pub fn add_items(&self, items: Vec<ReceiptItem>) -> FairshareResult<Vec<ReceiptItem>> {
        for item in &items {
            if item.description.trim().is_empty() {
                return Err(FairshareError::Validation(
                    "Item description cannot be empty".into(),
                ));
            }
            if !item.total_price.is_finite() {
                return Err(FairshareError::Validation(format!(
                    "Invalid price for {}",
                    item.description
                )));
            }
            if item.is_claimable() && item.total_price < 0.0 {
                return Err(FairshareError::Validation(format!(
                    "Price of {} cannot be negative",
                    item.description
                )));
            }
        }

        self.storage.receipts.add_items(items.clone())?;
        self.storage.receipts.save()?;
        Ok(items)
    }

    /// Record a receipt and its lines in one step
    pub fn import(&self, doc: ReceiptImport) -> FairshareResult<ReceiptSnapshot> {
        let mut receipt = Receipt::new(doc.merchant_name).with_amounts(
            doc.subtotal,
            doc.tax_amount,
            doc.tip_amount,
            doc.total_amount,
        );
        receipt.receipt_date = doc.receipt_date;
        if let Some(currency) = doc.currency {
            receipt.currency = currency;
        }

        let receipt = self.create(receipt)?;
        let items = doc
            .items
            .into_iter()
            .map(|line| line.into_item(receipt.id))
            .collect();
        self.add_items(items)?;

        info!(receipt = %receipt.id, "receipt imported");
        self.snapshot(receipt.id)
    }

    /// Look up a receipt
    pub fn get(&self, receipt_id: ReceiptId) -> FairshareResult<Receipt> {
        self.storage
            .receipts
            .get(receipt_id)?
            .ok_or_else(|| FairshareError::receipt_not_found(receipt_id.to_string()))
    }

    /// Assemble a receipt with its lines and their claims
    pub fn snapshot(&self, receipt_id: ReceiptId) -> FairshareResult<ReceiptSnapshot> {
        let receipt = self.get(receipt_id)?;
        let items = self.storage.receipts.items_for(receipt_id)?;
        let item_ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        let claims = self.storage.claims.for_items(&item_ids)?;

        let items = items
            .into_iter()
            .map(|item| {
                let own: Vec<ItemClaim> = claims
                    .iter()
                    .filter(|c| c.receipt_item_id == item.id)
                    .cloned()
                    .collect();
                item.with_claims(own)
            })
            .collect();

        Ok(ReceiptSnapshot {
            receipt,
            items,
            claims,
        })
    }

    /// Claim (or re-claim) an item for a member
    ///
    /// An existing claim by the member is replaced. The fraction is capped at
    /// what remains unclaimed plus the member's own previous share.
    pub fn claim(
        &self,
        receipt_id: ReceiptId,
        item_id: ItemId,
        member_id: MemberId,
        options: ClaimOptions,
    ) -> FairshareResult<ItemClaim> {
        if let Some(fraction) = options.share_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(FairshareError::Validation(
                    "Share fraction must be greater than 0 and at most 1".into(),
                ));
            }
        }

        let snapshot = self.snapshot(receipt_id)?;
        if !snapshot.receipt.status.accepts_claims() {
            return Err(FairshareError::ClaimRejected(format!(
                "Receipt is {}",
                snapshot.receipt.status
            )));
        }

        let item = snapshot
            .item(item_id)
            .ok_or_else(|| FairshareError::item_not_found(item_id.to_string()))?;

        let eligibility = can_claim_item(item, member_id);
        if let Some(reason) = eligibility.reason {
            return Err(FairshareError::ClaimRejected(reason.to_string()));
        }

        let max_fraction = claimable_fraction(item, member_id);
        if max_fraction < FULL_CLAIM_TOLERANCE {
            return Err(FairshareError::ClaimRejected(
                ClaimDenial::FullyClaimed.to_string(),
            ));
        }

        let claim = create_claim(item.id, member_id, &options.with_max_fraction(max_fraction));

        let replaced = match member_claim(item, member_id) {
            Some(existing) => Some(self.storage.claims.delete(existing.id)?),
            None => None,
        };
        self.storage.claims.insert(claim.clone())?;
        self.storage.claims.save()?;

        if let Some(old) = replaced {
            self.storage.log_delete(
                EntityType::Claim,
                old.id.to_string(),
                Some(item.description.clone()),
                &old,
            );
        }
        self.storage.log_create(
            EntityType::Claim,
            claim.id.to_string(),
            Some(item.description.clone()),
            &claim,
        );

        info!(
            item = %item.id,
            member = %member_id,
            share_fraction = claim.share_fraction,
            "item claimed"
        );
        Ok(claim)
    }

    /// Remove a member's claim on an item
    pub fn unclaim(&self, item_id: ItemId, member_id: MemberId) -> FairshareResult<ItemClaim> {
        let item = self
            .storage
            .receipts
            .get_item(item_id)?
            .ok_or_else(|| FairshareError::item_not_found(item_id.to_string()))?;
        let receipt = self.get(item.receipt_id)?;
        if !receipt.status.accepts_claims() {
            return Err(FairshareError::ClaimRejected(format!(
                "Receipt is {}",
                receipt.status
            )));
        }

        let existing = self
            .storage
            .claims
            .find_member_claim(item_id, member_id)?
            .ok_or_else(|| {
                FairshareError::claim_not_found(format!("{} on {}", member_id, item.description))
            })?;

        let removed = self.storage.claims.delete(existing.id)?;
        self.storage.claims.save()?;

        self.storage.log_delete(
            EntityType::Claim,
            removed.id.to_string(),
            Some(item.description.clone()),
            &removed,
        );

        info!(item = %item_id, member = %member_id, "claim removed");
        Ok(removed)
    }

    /// Settlement summary for a receipt
    pub fn summary(&self, receipt_id: ReceiptId) -> FairshareResult<ReceiptSummary> {
        let snapshot = self.snapshot(receipt_id)?;
        let members = self.storage.members.get_all()?;
        Ok(generate_receipt_summary(
            &snapshot.receipt,
            &snapshot.items,
            &snapshot.claims,
            &members,
        ))
    }

    /// Check whether every claimable line has been claimed
    pub fn validate(&self, receipt_id: ReceiptId) -> FairshareResult<ClaimValidation> {
        let snapshot = self.snapshot(receipt_id)?;
        Ok(validate_all_items_claimed(&snapshot.items, &snapshot.claims))
    }

    /// Record a fully claimed receipt as an exact-split group expense
    ///
    /// Each member's split is their rounded grand total. The receipt is then
    /// marked settled and stops accepting claims.
    pub fn settle(&self, receipt_id: ReceiptId, paid_by: MemberId) -> FairshareResult<Expense> {
        let snapshot = self.snapshot(receipt_id)?;
        let mut receipt = snapshot.receipt;

        if receipt.status == ReceiptStatus::Settled {
            return Err(FairshareError::Validation(
                "Receipt has already been settled".into(),
            ));
        }

        let validation = validate_all_items_claimed(&snapshot.items, &snapshot.claims);
        if !validation.is_valid {
            let names: Vec<&str> = validation
                .unclaimed_items
                .iter()
                .map(|i| i.description.as_str())
                .collect();
            return Err(FairshareError::Validation(format!(
                "{} item(s) still unclaimed: {}",
                names.len(),
                names.join(", ")
            )));
        }

        let members = self.storage.members.get_all()?;
        let totals = calculate_member_totals(&receipt, &snapshot.items, &snapshot.claims, &members);
        let splits = settlement_splits(&totals);
        if splits.is_empty() {
            return Err(FairshareError::Validation(
                "Nothing has been claimed on this receipt".into(),
            ));
        }

        let amount = round_to_cents(splits.iter().map(|s| s.amount).sum());
        let mut expense = Expense::new(
            receipt.merchant_name.clone(),
            amount,
            paid_by,
            SplitMethod::Exact,
            splits,
        );
        expense.group_id = receipt.group_id;
        expense.receipt_id = Some(receipt.id);

        self.storage.expenses.insert_expense(expense.clone())?;
        self.storage.expenses.save()?;

        receipt.status = ReceiptStatus::Settled;
        self.storage.receipts.upsert(receipt)?;
        self.storage.receipts.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &expense,
        );

        info!(receipt = %receipt_id, expense = %expense.id, amount, "receipt settled");
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::FairsharePaths;
    use crate::models::Member;
    use crate::storage::ClaimRepository;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        storage: Storage,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let paths = FairsharePaths::with_base_dir(temp.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        Fixture {
            _temp: temp,
            storage,
        }
    }

    fn add_member(storage: &Storage, name: &str) -> Member {
        let member = Member::new(name);
        storage.members.insert(member.clone()).unwrap();
        member
    }

    fn bistro(service: &ReceiptService) -> ReceiptSnapshot {
        service
            .import(ReceiptImport {
                merchant_name: "Bistro".into(),
                receipt_date: None,
                currency: None,
                subtotal: Some(100.0),
                tax_amount: Some(10.0),
                tip_amount: Some(20.0),
                total_amount: Some(130.0),
                items: vec![
                    line("Steak", 75.0),
                    line("Salad", 25.0),
                    ImportedLine {
                        is_tax: true,
                        ..line("Tax", 10.0)
                    },
                ],
            })
            .unwrap()
    }

    fn line(description: &str, total_price: f64) -> ImportedLine {
        ImportedLine {
            description: description.into(),
            quantity: None,
            unit_price: None,
            total_price,
            is_tax: false,
            is_tip: false,
            is_subtotal: false,
            is_total: false,
            is_discount: false,
        }
    }

    #[test]
    fn test_import_builds_snapshot() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let snapshot = bistro(&service);

        assert_eq!(snapshot.items.len(), 3);
        assert!(snapshot.claims.is_empty());
        assert!(!snapshot.items[2].is_claimable());
        assert_eq!(snapshot.receipt.currency, "USD");
    }

    #[test]
    fn test_claim_and_replace() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let alice = add_member(&f.storage, "Alice");
        let snapshot = bistro(&service);
        let steak = snapshot.items[0].id;

        service
            .claim(snapshot.receipt.id, steak, alice.id, ClaimOptions::fraction(0.5))
            .unwrap();
        let full = service
            .claim(snapshot.receipt.id, steak, alice.id, ClaimOptions::default())
            .unwrap();

        assert!(full.is_full());
        let claims = f.storage.claims.for_item(steak).unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].id, full.id);
    }

    #[test]
    fn test_claim_capped_by_remaining() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let alice = add_member(&f.storage, "Alice");
        let bob = add_member(&f.storage, "Bob");
        let snapshot = bistro(&service);
        let steak = snapshot.items[0].id;

        service
            .claim(snapshot.receipt.id, steak, alice.id, ClaimOptions::fraction(0.6))
            .unwrap();
        let bobs = service
            .claim(snapshot.receipt.id, steak, bob.id, ClaimOptions::fraction(0.6))
            .unwrap();
        assert!((bobs.share_fraction - 0.4).abs() < 1e-9);

        let carol = add_member(&f.storage, "Carol");
        let err = service
            .claim(snapshot.receipt.id, steak, carol.id, ClaimOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot claim item: Item is fully claimed");
    }

    #[test]
    fn test_claim_rejections() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let alice = add_member(&f.storage, "Alice");
        let snapshot = bistro(&service);
        let receipt_id = snapshot.receipt.id;

        let err = service
            .claim(receipt_id, snapshot.items[2].id, alice.id, ClaimOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot claim item: This item cannot be claimed");

        service
            .claim(receipt_id, snapshot.items[1].id, alice.id, ClaimOptions::default())
            .unwrap();
        let err = service
            .claim(receipt_id, snapshot.items[1].id, alice.id, ClaimOptions::fraction(0.5))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot claim item: You already claimed this item");

        let err = service
            .claim(receipt_id, snapshot.items[0].id, alice.id, ClaimOptions::fraction(1.5))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_unclaim() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let alice = add_member(&f.storage, "Alice");
        let snapshot = bistro(&service);
        let salad = snapshot.items[1].id;

        service
            .claim(snapshot.receipt.id, salad, alice.id, ClaimOptions::default())
            .unwrap();
        service.unclaim(salad, alice.id).unwrap();
        assert!(f.storage.claims.for_item(salad).unwrap().is_empty());
        assert!(service.unclaim(salad, alice.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_summary_and_settle() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let alice = add_member(&f.storage, "Alice");
        let bob = add_member(&f.storage, "Bob");
        let snapshot = bistro(&service);
        let receipt_id = snapshot.receipt.id;

        service
            .claim(receipt_id, snapshot.items[0].id, alice.id, ClaimOptions::default())
            .unwrap();
        assert!(!service.validate(receipt_id).unwrap().is_valid);
        let err = service.settle(receipt_id, alice.id).unwrap_err();
        assert!(err.to_string().contains("Salad"));

        service
            .claim(receipt_id, snapshot.items[1].id, bob.id, ClaimOptions::default())
            .unwrap();
        let summary = service.summary(receipt_id).unwrap();
        assert!(summary.is_fully_claimed());
        assert_eq!(summary.member_totals[0].grand_total, 97.5);
        assert_eq!(summary.member_totals[1].grand_total, 32.5);

        let expense = service.settle(receipt_id, alice.id).unwrap();
        assert_eq!(expense.amount, 130.0);
        assert_eq!(expense.split_method, SplitMethod::Exact);
        assert_eq!(expense.receipt_id, Some(receipt_id));
        assert_eq!(expense.share_of(bob.id), 32.5);

        assert_eq!(service.get(receipt_id).unwrap().status, ReceiptStatus::Settled);
        let err = service
            .claim(receipt_id, snapshot.items[0].id, bob.id, ClaimOptions::fraction(0.5))
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot claim item: Receipt is Settled");
    }

    #[test]
    fn test_audit_records_claim_replacement() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let alice = add_member(&f.storage, "Alice");
        let snapshot = bistro(&service);
        let steak = snapshot.items[0].id;

        service
            .claim(snapshot.receipt.id, steak, alice.id, ClaimOptions::fraction(0.5))
            .unwrap();
        service
            .claim(snapshot.receipt.id, steak, alice.id, ClaimOptions::fraction(0.25))
            .unwrap();

        let claim_ops: Vec<_> = f
            .storage
            .audit()
            .unwrap()
            .read_all()
            .unwrap()
            .into_iter()
            .filter(|e| e.entity_type == EntityType::Claim)
            .map(|e| e.operation)
            .collect();
        assert_eq!(
            claim_ops,
            vec![Operation::Create, Operation::Delete, Operation::Create]
        );
    }

    #[test]
    fn test_saved_changes_survive_audit_write_failure() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage);
        let alice = add_member(&f.storage, "Alice");
        let bob = add_member(&f.storage, "Bob");
        let snapshot = bistro(&service);
        let receipt_id = snapshot.receipt.id;

        // A directory in place of the log file makes every append fail
        let audit_log = f.storage.paths().audit_log();
        if audit_log.exists() {
            std::fs::remove_file(&audit_log).unwrap();
        }
        std::fs::create_dir_all(&audit_log).unwrap();

        let steak = snapshot.items[0].id;
        let salad = snapshot.items[1].id;
        service
            .claim(receipt_id, steak, alice.id, ClaimOptions::fraction(0.5))
            .unwrap();
        let replaced = service
            .claim(receipt_id, steak, alice.id, ClaimOptions::default())
            .unwrap();
        service
            .claim(receipt_id, salad, bob.id, ClaimOptions::default())
            .unwrap();

        let reloaded = ClaimRepository::new(f.storage.paths().claims_file());
        reloaded.load().unwrap();
        let steak_claims = reloaded.for_item(steak).unwrap();
        assert_eq!(steak_claims.len(), 1);
        assert_eq!(steak_claims[0].id, replaced.id);

        let expense = service.settle(receipt_id, alice.id).unwrap();
        assert_eq!(expense.amount, 130.0);
        assert_eq!(
            service.get(receipt_id).unwrap().status,
            ReceiptStatus::Settled
        );
    }
}
