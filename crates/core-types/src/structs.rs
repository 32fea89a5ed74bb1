use crate::enums::ItemCategory;
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line of the cafe's sales ledger.
///
/// `sale_amount` is net of discount, so the pre-discount price of the line is
/// `sale_amount + discount_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub category: ItemCategory,
    pub product: String,
    pub sale_amount: Decimal,
    pub quantity: u32,
    pub discount_applied: bool,
    pub discount_amount: Decimal,
    pub temperature_f: f64,
}

impl Transaction {
    /// The pre-discount price of the line.
    pub fn gross_amount(&self) -> Decimal {
        self.sale_amount + self.discount_amount
    }

    /// The discount as a fraction of the gross amount.
    ///
    /// Returns `Ok(None)` when the gross amount is zero, since the ratio is
    /// undefined. A negative gross amount is a data integrity violation.
    pub fn discount_ratio(&self) -> Result<Option<Decimal>, CoreError> {
        let gross = self.gross_amount();
        if gross < Decimal::ZERO {
            return Err(CoreError::DataIntegrity(format!(
                "gross amount {} on {} ({}) is negative",
                gross, self.date, self.product
            )));
        }
        if gross.is_zero() {
            return Ok(None);
        }
        Ok(Some(self.discount_amount / gross))
    }
}

/// A calendar event such as a public holiday or festival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub description: String,
}

/// The immutable, fully loaded input of every analysis.
///
/// Analyses borrow the dataset and build their own derived tables; nothing
/// ever writes back into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    transactions: Vec<Transaction>,
    events: Vec<Event>,
}

impl Dataset {
    pub fn new(transactions: Vec<Transaction>, events: Vec<Event>) -> Self {
        Self {
            transactions,
            events,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
