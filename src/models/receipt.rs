//! Receipt and receipt item models
//!
//! A receipt is parsed from a scanned image into line items. Some lines are
//! goods a member can take ownership of; others (tax, tip, subtotal, total,
//! discount) are derived charges that cannot be claimed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::claim::ItemClaim;
use super::ids::{GroupId, ItemId, MemberId, ReceiptId};

/// Processing status of a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    /// Image uploaded, line items not yet extracted
    #[default]
    Processing,
    /// Line items extracted; members can claim
    Ready,
    /// Turned into an expense and settled
    Settled,
    /// Extraction failed
    Failed,
}

impl ReceiptStatus {
    /// Check whether items on this receipt may still be claimed
    pub fn accepts_claims(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "Processing"),
            Self::Ready => write!(f, "Ready"),
            Self::Settled => write!(f, "Settled"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// A scanned receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier
    pub id: ReceiptId,

    /// The group the receipt was shared with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,

    /// Member who uploaded the receipt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<MemberId>,

    /// Merchant name, if recognized
    #[serde(default)]
    pub merchant_name: String,

    /// Date printed on the receipt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_date: Option<NaiveDate>,

    /// ISO currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Subtotal printed on the receipt
    #[serde(default)]
    pub subtotal: Option<f64>,

    /// Tax printed on the receipt
    #[serde(default)]
    pub tax_amount: Option<f64>,

    /// Tip printed on (or added to) the receipt
    #[serde(default)]
    pub tip_amount: Option<f64>,

    /// Total printed on the receipt
    #[serde(default)]
    pub total_amount: Option<f64>,

    /// Processing status
    #[serde(default)]
    pub status: ReceiptStatus,

    /// When the receipt was uploaded
    pub created_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Receipt {
    /// Create a new receipt ready for claiming
    pub fn new(merchant_name: impl Into<String>) -> Self {
        Self {
            id: ReceiptId::new(),
            group_id: None,
            uploaded_by: None,
            merchant_name: merchant_name.into(),
            receipt_date: None,
            currency: default_currency(),
            subtotal: None,
            tax_amount: None,
            tip_amount: None,
            total_amount: None,
            status: ReceiptStatus::Ready,
            created_at: Utc::now(),
        }
    }

    /// Set the printed charges (builder style)
    pub fn with_amounts(
        mut self,
        subtotal: Option<f64>,
        tax_amount: Option<f64>,
        tip_amount: Option<f64>,
        total_amount: Option<f64>,
    ) -> Self {
        self.subtotal = subtotal;
        self.tax_amount = tax_amount;
        self.tip_amount = tip_amount;
        self.total_amount = total_amount;
        self
    }

    /// Tax amount, treating a missing value as zero
    pub fn tax(&self) -> f64 {
        self.tax_amount.unwrap_or(0.0)
    }

    /// Tip amount, treating a missing value as zero
    pub fn tip(&self) -> f64 {
        self.tip_amount.unwrap_or(0.0)
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let merchant = if self.merchant_name.is_empty() {
            "Unknown merchant"
        } else {
            &self.merchant_name
        };
        match self.receipt_date {
            Some(date) => write!(f, "{} {}", date.format("%Y-%m-%d"), merchant),
            None => write!(f, "{}", merchant),
        }
    }
}

/// A single line from a scanned receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Unique identifier
    pub id: ItemId,

    /// The receipt this line belongs to
    pub receipt_id: ReceiptId,

    /// Text of the line as printed
    #[serde(default)]
    pub description: String,

    /// Quantity printed on the line
    #[serde(default = "default_quantity")]
    pub quantity: f64,

    /// Unit price, when printed separately
    #[serde(default)]
    pub unit_price: Option<f64>,

    /// Line total
    pub total_price: f64,

    /// Line is a tax charge
    #[serde(default)]
    pub is_tax: bool,

    /// Line is a tip
    #[serde(default)]
    pub is_tip: bool,

    /// Line is the printed subtotal
    #[serde(default)]
    pub is_subtotal: bool,

    /// Line is the printed total
    #[serde(default)]
    pub is_total: bool,

    /// Line is a discount
    #[serde(default)]
    pub is_discount: bool,

    /// Claims made on this line; absent or null means no claims
    #[serde(default, deserialize_with = "null_as_empty")]
    pub claims: Vec<ItemClaim>,
}

fn default_quantity() -> f64 {
    1.0
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ItemClaim>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ItemClaim>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ReceiptItem {
    /// Create a claimable line item
    pub fn new(receipt_id: ReceiptId, description: impl Into<String>, total_price: f64) -> Self {
        Self {
            id: ItemId::new(),
            receipt_id,
            description: description.into(),
            quantity: default_quantity(),
            unit_price: None,
            total_price,
            is_tax: false,
            is_tip: false,
            is_subtotal: false,
            is_total: false,
            is_discount: false,
            claims: Vec::new(),
        }
    }

    /// Create a tax line
    pub fn tax(receipt_id: ReceiptId, total_price: f64) -> Self {
        let mut item = Self::new(receipt_id, "Tax", total_price);
        item.is_tax = true;
        item
    }

    /// Create a tip line
    pub fn tip(receipt_id: ReceiptId, total_price: f64) -> Self {
        let mut item = Self::new(receipt_id, "Tip", total_price);
        item.is_tip = true;
        item
    }

    /// Attach claims (builder style)
    pub fn with_claims(mut self, claims: Vec<ItemClaim>) -> Self {
        self.claims = claims;
        self
    }

    /// Check whether a member can take ownership of this line
    ///
    /// Tax, tip, subtotal, total and discount lines are derived charges and
    /// are never claimable.
    pub fn is_claimable(&self) -> bool {
        !(self.is_tax || self.is_tip || self.is_subtotal || self.is_total || self.is_discount)
    }

    /// Short label describing the kind of line
    pub fn kind_label(&self) -> &'static str {
        if self.is_tax {
            "tax"
        } else if self.is_tip {
            "tip"
        } else if self.is_subtotal {
            "subtotal"
        } else if self.is_total {
            "total"
        } else if self.is_discount {
            "discount"
        } else {
            "item"
        }
    }
}

impl fmt::Display for ReceiptItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.description, self.total_price)
    }
}
