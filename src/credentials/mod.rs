//! Secret storage for the news API key.
//!
//! The fetcher only needs [`CredentialStore::get`]; `set` and `delete` back the
//! `newsdesk key` commands.
//!
//! - [`MemoryCredentialStore`]: process-local map, used in tests
//! - [`FileCredentialStore`]: TOML file readable only by the owner
//! - `KeyringCredentialStore`: OS keyring (requires the `os-keyring` feature)

mod file;
#[cfg(feature = "os-keyring")]
mod os_keyring;

pub use file::FileCredentialStore;
#[cfg(feature = "os-keyring")]
pub use os_keyring::KeyringCredentialStore;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::app::{NewsError, Result};

/// Name under which the news API key is stored.
pub const API_KEY_NAME: &str = "news_api_key";

pub trait CredentialStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>>;
    fn set(&self, name: &str, value: &str) -> Result<()>;
    fn delete(&self, name: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(name: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(name.to_string(), value.to_string());
        }
        store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|e| NewsError::Credential(e.to_string()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(name).cloned())
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.lock()?.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        self.lock()?.remove(name);
        Ok(())
    }
}

/// Show only the last four characters of a secret.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get(API_KEY_NAME).unwrap(), None);

        store.set(API_KEY_NAME, "abc123").unwrap();
        assert_eq!(store.get(API_KEY_NAME).unwrap().as_deref(), Some("abc123"));

        store.delete(API_KEY_NAME).unwrap();
        assert_eq!(store.get(API_KEY_NAME).unwrap(), None);
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let store = MemoryCredentialStore::new();
        assert!(store.delete("nothing").is_ok());
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("0123456789"), "******6789");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask(""), "");
    }
}
