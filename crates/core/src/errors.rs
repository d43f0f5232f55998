use thiserror::Error;

/// Unified error type for the entire rilly-finance-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// None of these are fatal: the store always falls back to its pre-call
/// state (or to in-memory-only mode for persistence failures).
#[derive(Debug, Error)]
pub enum CoreError {
    // ── View State ──────────────────────────────────────────────────
    #[error("Invalid screen: '{0}'")]
    InvalidScreen(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Duplicate transaction id: {0}")]
    DuplicateId(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    // ── Storage ─────────────────────────────────────────────────────
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("Invalid storage document: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported storage version: {0}")]
    UnsupportedVersion(u32),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::PersistenceUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
