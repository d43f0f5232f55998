use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::money::DEFAULT_CURRENCY;
use super::view::Screen;

/// Local-storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "rilly-finance-storage";

/// Simulated biometric check duration.
pub const DEFAULT_AUTH_DELAY_MS: u64 = 2_000;

/// Number formatting convention for money display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// de-DE: `1.234,50 €`
    #[default]
    De,
    /// en-US: `€1,234.50`
    En,
}

/// Store configuration, supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSettings {
    /// Key under which the snapshot document is stored.
    pub storage_key: String,

    pub locale: Locale,

    /// Currency of the empty snapshot and initial display currency.
    pub default_currency: String,

    /// Screen shown on startup. `Auth` enables the cosmetic splash.
    pub initial_screen: Screen,

    pub auth_delay_ms: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            locale: Locale::default(),
            default_currency: DEFAULT_CURRENCY.to_string(),
            initial_screen: Screen::Dashboard,
            auth_delay_ms: DEFAULT_AUTH_DELAY_MS,
        }
    }
}

impl StoreSettings {
    /// Parse settings from a JSON config blob. Missing fields take their
    /// defaults; unknown fields are rejected.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: StoreSettings = serde_json::from_str(json)?;
        if settings.storage_key.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "storage_key must not be empty".into(),
            ));
        }
        Ok(settings)
    }
}
