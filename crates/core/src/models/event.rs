use serde::{Deserialize, Serialize};

use super::view::Screen;

/// What changed in the store. Delivered to every subscriber after a
/// successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    ScreenChanged(Screen),
    DemoModeChanged(bool),
    PersistenceChanged(bool),
    /// Carries the id of the new transaction
    TransactionAdded(String),
    CurrencyChanged(String),
    /// The snapshot was replaced wholesale (reset)
    SnapshotReset,
}

impl std::fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreEvent::ScreenChanged(screen) => write!(f, "screen changed to {screen}"),
            StoreEvent::DemoModeChanged(on) => write!(f, "demo mode {}", on_off(*on)),
            StoreEvent::PersistenceChanged(on) => write!(f, "persistence {}", on_off(*on)),
            StoreEvent::TransactionAdded(id) => write!(f, "transaction {id} added"),
            StoreEvent::CurrencyChanged(code) => write!(f, "currency changed to {code}"),
            StoreEvent::SnapshotReset => write!(f, "snapshot reset"),
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
