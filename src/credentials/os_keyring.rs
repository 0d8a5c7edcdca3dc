use crate::app::{NewsError, Result};
use crate::credentials::CredentialStore;

const SERVICE: &str = "newsdesk";

/// OS keyring (Keychain, Secret Service, Credential Manager).
#[derive(Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(name: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(SERVICE, name).map_err(|e| NewsError::Credential(e.to_string()))
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        match Self::entry(name)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(NewsError::Credential(e.to_string())),
        }
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        Self::entry(name)?
            .set_password(value)
            .map_err(|e| NewsError::Credential(e.to_string()))?;
        tracing::debug!("Stored credential {} in OS keyring", name);
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        match Self::entry(name)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(NewsError::Credential(e.to_string())),
        }
    }
}
