use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::money::{normalize_currency_code, Money, DEFAULT_CURRENCY};
use crate::models::snapshot::PortfolioSnapshot;
use crate::models::transaction::{Transaction, TransactionDate};

/// Current storage document version.
pub const CURRENT_VERSION: u32 = 1;

/// The JSON document stored under the storage key.
///
/// Layout:
/// ```text
/// { "version": 1, "saved_at": "2025-01-15T10:00:00Z", "snapshot": { ... } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub snapshot: PortfolioSnapshot,
}

/// Serialize a snapshot into a versioned document.
pub fn write_document(
    snapshot: &PortfolioSnapshot,
    saved_at: DateTime<Utc>,
) -> Result<String, CoreError> {
    let document = SnapshotDocument {
        version: CURRENT_VERSION,
        saved_at,
        snapshot: snapshot.clone(),
    };
    serde_json::to_string(&document)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))
}

/// Parse a stored document back into a snapshot.
///
/// Accepts the current versioned layout and the unversioned layout written
/// by the earlier web build (`{"state": {...}, "version": 0}`), which is
/// migrated on the fly.
pub fn read_document(json: &str) -> Result<PortfolioSnapshot, CoreError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| CoreError::InvalidFileFormat(format!("Not valid JSON: {e}")))?;

    let object = value
        .as_object()
        .ok_or_else(|| CoreError::InvalidFileFormat("Document is not a JSON object".into()))?;

    if let Some(state) = object.get("state") {
        return migrate_legacy(state.clone());
    }

    let version = object
        .get("version")
        .ok_or_else(|| CoreError::InvalidFileFormat("Missing version tag".into()))?
        .as_u64()
        .ok_or_else(|| CoreError::InvalidFileFormat("Version tag is not a number".into()))?;

    if version == 0 || version > u64::from(CURRENT_VERSION) {
        return Err(CoreError::UnsupportedVersion(
            u32::try_from(version).unwrap_or(u32::MAX),
        ));
    }

    let document: SnapshotDocument = serde_json::from_value(value)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize snapshot: {e}")))?;

    Ok(document.snapshot)
}

// ── Legacy layout ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LegacyState {
    net_worth: Option<Decimal>,
    liquidity: Option<Decimal>,
    monthly_inflow: Option<Decimal>,
    monthly_outflow: Option<Decimal>,
    transactions: Vec<LegacyTransaction>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyTransaction {
    id: Value,
    date: String,
    amount: Decimal,
    merchant: String,
    category: Option<String>,
}

fn migrate_legacy(state: Value) -> Result<PortfolioSnapshot, CoreError> {
    let legacy: LegacyState = serde_json::from_value(state)
        .map_err(|e| CoreError::Deserialization(format!("Failed to read legacy state: {e}")))?;

    let currency = legacy
        .currency
        .as_deref()
        .and_then(normalize_currency_code)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
    let money = |amount: Option<Decimal>| Money::new(amount.unwrap_or(Decimal::ZERO), &currency);

    let mut seen = HashSet::new();
    let transactions = legacy
        .transactions
        .into_iter()
        .map(|tx| {
            let id = match tx.id {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            // Ids must stay unique and non-empty after import.
            let id = if id.trim().is_empty() || !seen.insert(id.clone()) {
                Uuid::new_v4().to_string()
            } else {
                id
            };
            Transaction {
                id,
                merchant: tx.merchant,
                date: legacy_date(&tx.date),
                amount: Money::new(tx.amount, &currency),
                category: tx.category,
            }
        })
        .collect();

    Ok(PortfolioSnapshot {
        net_worth: money(legacy.net_worth),
        liquidity: money(legacy.liquidity),
        monthly_inflow: money(legacy.monthly_inflow),
        monthly_outflow: money(legacy.monthly_outflow),
        transactions,
        goals: Vec::new(),
    })
}

/// Legacy rows carry either German dates (`12.02.2024`) or labels (`Heute`).
fn legacy_date(raw: &str) -> TransactionDate {
    NaiveDate::parse_from_str(raw, "%d.%m.%Y")
        .map(TransactionDate::Date)
        .unwrap_or_else(|_| TransactionDate::Label(raw.to_string()))
}
