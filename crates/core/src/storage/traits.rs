use crate::errors::CoreError;

/// Key/value storage the store persists its snapshot document into
/// (browser local storage, a file directory, memory).
///
/// Implementations report every failure as
/// `CoreError::PersistenceUnavailable`; the store degrades to
/// in-memory-only mode on such errors. Writes replace the previous value as
/// a whole.
pub trait KeyValueStorage {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Read the value under `key`. `Ok(None)` means the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}
