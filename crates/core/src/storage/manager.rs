use chrono::Utc;

use crate::errors::CoreError;
use crate::models::snapshot::PortfolioSnapshot;

use super::format;
use super::traits::KeyValueStorage;

/// High-level storage operations: save/load/clear a snapshot under a key
/// of any `KeyValueStorage` backend.
pub struct StorageManager;

impl StorageManager {
    /// Serialize and write a snapshot, replacing whatever was stored.
    ///
    /// Flow: PortfolioSnapshot → versioned JSON document → storage.write
    pub fn save(
        storage: &mut dyn KeyValueStorage,
        key: &str,
        snapshot: &PortfolioSnapshot,
    ) -> Result<(), CoreError> {
        let json = format::write_document(snapshot, Utc::now())?;
        storage.write(key, &json)
    }

    /// Read and parse the stored snapshot. `Ok(None)` when nothing is stored.
    ///
    /// Flow: storage.read → parse document (migrating legacy layouts) → PortfolioSnapshot
    pub fn load(
        storage: &dyn KeyValueStorage,
        key: &str,
    ) -> Result<Option<PortfolioSnapshot>, CoreError> {
        match storage.read(key)? {
            Some(json) => format::read_document(&json).map(Some),
            None => Ok(None),
        }
    }

    /// Delete the stored snapshot, if any.
    pub fn clear(storage: &mut dyn KeyValueStorage, key: &str) -> Result<(), CoreError> {
        storage.remove(key)
    }
}
