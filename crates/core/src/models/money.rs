use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Currency used whenever a code is missing or malformed.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Returns the normalized (trimmed, uppercased) currency code if it is
/// exactly 3 ASCII letters.
pub fn normalize_currency_code(code: &str) -> Option<String> {
    let trimmed = code.trim().to_uppercase();
    if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed)
    } else {
        None
    }
}

/// A signed decimal amount tagged with its currency code.
///
/// Display text is produced by the format service, never by this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Signed amount: positive is inflow, negative is outflow
    pub amount: Decimal,

    /// Uppercase ISO-style currency code (e.g., "EUR")
    pub currency: String,
}

impl Money {
    /// Create an amount; malformed currency codes fall back to EUR.
    pub fn new(amount: Decimal, currency: &str) -> Self {
        let currency =
            normalize_currency_code(currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        Self { amount, currency }
    }

    pub fn zero(currency: &str) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Shorthand for euro amounts given in cents.
    pub fn eur_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2), DEFAULT_CURRENCY)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_inflow(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Add two amounts of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, CoreError> {
        if self.currency != other.currency {
            return Err(CoreError::ValidationError(format!(
                "Cannot combine {} with {}",
                self.currency, other.currency
            )));
        }
        let amount = self.amount.checked_add(other.amount).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Amount overflow adding {} to {}",
                other.amount, self.amount
            ))
        })?;
        Ok(Money {
            amount,
            currency: self.currency.clone(),
        })
    }
}
