use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::app::{NewsError, Result};
use crate::credentials::CredentialStore;

/// Credentials kept as a flat TOML table, e.g. `news_api_key = "..."`.
pub struct FileCredentialStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<config_dir>/newsdesk/credentials.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| NewsError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("newsdesk").join("credentials.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            NewsError::Credential(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string(values).map_err(|e| NewsError::Credential(e.to_string()))?;
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten files that already existed.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| NewsError::Credential(e.to_string()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.remove(name))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut values = self.read_all()?;
        values.insert(name.to_string(), value.to_string());
        self.write_all(&values)?;
        tracing::debug!("Stored credential {} at {:?}", name, self.path);
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut values = self.read_all()?;
        if values.remove(name).is_some() {
            self.write_all(&values)?;
            tracing::debug!("Deleted credential {} from {:?}", name, self.path);
        }
        Ok(())
    }
}
