use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// When a transaction happened: a calendar date, or a free display label
/// such as "Heute" for demo rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionDate {
    Date(NaiveDate),
    Label(String),
}

impl std::fmt::Display for TransactionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionDate::Date(date) => write!(f, "{}", date.format("%d.%m.%Y")),
            TransactionDate::Label(label) => write!(f, "{label}"),
        }
    }
}

impl From<NaiveDate> for TransactionDate {
    fn from(date: NaiveDate) -> Self {
        TransactionDate::Date(date)
    }
}

impl From<&str> for TransactionDate {
    fn from(label: &str) -> Self {
        TransactionDate::Label(label.to_string())
    }
}

/// A single booked movement of money.
///
/// The sign of `amount` distinguishes inflow (positive) from outflow
/// (negative). Once handed to the store a transaction is never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier within a snapshot
    pub id: String,

    /// Counterparty shown in the list (e.g., "Apple Store")
    pub merchant: String,

    pub date: TransactionDate,

    pub amount: Money,

    #[serde(default)]
    pub category: Option<String>,
}

impl Transaction {
    /// Create a transaction with a freshly generated id.
    pub fn new(merchant: impl Into<String>, date: impl Into<TransactionDate>, amount: Money) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), merchant, date, amount)
    }

    /// Create a transaction with a caller-chosen id.
    pub fn with_id(
        id: impl Into<String>,
        merchant: impl Into<String>,
        date: impl Into<TransactionDate>,
        amount: Money,
    ) -> Self {
        Self {
            id: id.into(),
            merchant: merchant.into(),
            date: date.into(),
            amount,
            category: None,
        }
    }

    /// Attach a category label.
    pub fn categorized(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
