use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// The closed set of screens the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Dashboard,
    Transactions,
    Pricing,
    /// Cosmetic biometric splash
    Auth,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Dashboard,
        Screen::Transactions,
        Screen::Pricing,
        Screen::Auth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::Transactions => "transactions",
            Screen::Pricing => "pricing",
            Screen::Auth => "auth",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Screen {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == wanted)
            .ok_or_else(|| CoreError::InvalidScreen(s.to_string()))
    }
}

/// Transient UI state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub active_screen: Screen,
    pub is_demo_mode: bool,
    pub is_persistence_enabled: bool,
    /// Display currency preference
    pub currency: String,
}

impl ViewState {
    pub fn new(active_screen: Screen, currency: impl Into<String>) -> Self {
        Self {
            active_screen,
            is_demo_mode: false,
            is_persistence_enabled: false,
            currency: currency.into(),
        }
    }
}
