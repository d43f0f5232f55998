use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::CoreError;

use super::traits::KeyValueStorage;

/// In-memory storage. Clones share the same map, so a second store opened
/// on a clone sees what the first one wrote (a simulated page reload).
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A storage that rejects every operation, like local storage in a
    /// locked-down private window.
    pub fn failing() -> Self {
        Self {
            entries: Rc::default(),
            unavailable: true,
        }
    }

    /// Raw value under `key`, bypassing availability checks.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable {
            return Err(CoreError::PersistenceUnavailable(
                "memory storage is disabled".into(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.check_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.check_available()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.check_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
