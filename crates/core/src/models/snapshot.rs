use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::goal::Goal;
use super::money::{Money, DEFAULT_CURRENCY};
use super::transaction::{Transaction, TransactionDate};

/// Net worth of the demo dataset, in cents.
pub const DEMO_NET_WORTH_CENTS: i64 = 14_250_000;

/// The full financial state at a point in time. This is the unit that gets
/// persisted and reset.
///
/// `net_worth` is stored independently; it is NOT derived from the
/// transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub net_worth: Money,

    /// Cash available right now
    pub liquidity: Money,

    pub monthly_inflow: Money,

    pub monthly_outflow: Money,

    /// Newest first
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl PortfolioSnapshot {
    /// All zero amounts, no transactions, no goals.
    pub fn empty(currency: &str) -> Self {
        Self {
            net_worth: Money::zero(currency),
            liquidity: Money::zero(currency),
            monthly_inflow: Money::zero(currency),
            monthly_outflow: Money::zero(currency),
            transactions: Vec::new(),
            goals: Vec::new(),
        }
    }

    /// The fixed illustrative dataset shown in demo mode.
    pub fn demo() -> Self {
        let tank_date: TransactionDate = NaiveDate::from_ymd_opt(2024, 2, 12)
            .map(Into::into)
            .unwrap_or_else(|| "12.02.2024".into());

        Self {
            net_worth: Money::eur_cents(DEMO_NET_WORTH_CENTS),
            liquidity: Money::eur_cents(3_825_000),
            monthly_inflow: Money::eur_cents(2_450_000),
            monthly_outflow: Money::eur_cents(845_000),
            transactions: vec![
                Transaction::with_id("1", "Apple Store", "Heute", Money::eur_cents(-129_900))
                    .categorized("Tech"),
                Transaction::with_id("2", "Gehalt", "Gestern", Money::eur_cents(450_000))
                    .categorized("Einkommen"),
                Transaction::with_id("3", "Server Kosten", "Vorgestern", Money::eur_cents(-2_900))
                    .categorized("Business"),
                Transaction::with_id("4", "Tankstelle", tank_date, Money::eur_cents(-8_500))
                    .categorized("Auto"),
            ],
            goals: vec![
                Goal::new(
                    "Notgroschen",
                    Money::eur_cents(800_000),
                    Money::eur_cents(1_000_000),
                    "emerald",
                ),
                Goal::new(
                    "Immobilie",
                    Money::eur_cents(6_500_000),
                    Money::eur_cents(25_000_000),
                    "blue",
                ),
                Goal::new(
                    "Weltreise",
                    Money::eur_cents(150_000),
                    Money::eur_cents(1_200_000),
                    "purple",
                ),
            ],
        }
    }

    /// Currency of the headline figures.
    pub fn currency(&self) -> &str {
        &self.net_worth.currency
    }

    /// True when every figure is zero and there is no history or goal.
    pub fn is_empty(&self) -> bool {
        self.net_worth.is_zero()
            && self.liquidity.is_zero()
            && self.monthly_inflow.is_zero()
            && self.monthly_outflow.is_zero()
            && self.transactions.is_empty()
            && self.goals.is_empty()
    }

    /// Sum of all transaction amounts. Informational only; may differ from
    /// `net_worth`.
    pub fn transactions_total(&self) -> Decimal {
        self.transactions.iter().map(|t| t.amount.amount).sum()
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }
}

impl Default for PortfolioSnapshot {
    fn default() -> Self {
        Self::empty(DEFAULT_CURRENCY)
    }
}
