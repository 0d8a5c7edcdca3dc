use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{NewsError, Result};
use crate::config::{Config, CredentialBackend};
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::fetcher::{ArticleSource, NewsApiSource};
use crate::state::FetchStateMachine;
use crate::store::sqlite::SqliteStore;

/// Everything a front end needs: the bookmark store, the credential store,
/// the shared article source, and one fetch state machine per surface.
pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub source: Arc<dyn ArticleSource>,
    pub headlines: FetchStateMachine,
    pub search: FetchStateMachine,
}

impl AppContext {
    pub fn new(config: &Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path.or_else(|| config.storage.database.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let credentials = Self::credential_store(config)?;
        Self::assemble(config, store, credentials)
    }

    pub fn in_memory(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::assemble(config, store, credentials)
    }

    fn assemble(
        config: &Config,
        store: Arc<SqliteStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let source: Arc<dyn ArticleSource> =
            Arc::new(NewsApiSource::new(&config.api, credentials.clone())?);

        Ok(Self {
            store,
            credentials,
            headlines: FetchStateMachine::new(source.clone()),
            search: FetchStateMachine::new(source.clone()),
            source,
        })
    }

    fn credential_store(config: &Config) -> Result<Arc<dyn CredentialStore>> {
        match config.credentials.backend {
            CredentialBackend::File => {
                Ok(Arc::new(FileCredentialStore::new(FileCredentialStore::default_path()?)))
            }
            #[cfg(feature = "os-keyring")]
            CredentialBackend::Keyring => {
                Ok(Arc::new(crate::credentials::KeyringCredentialStore::new()))
            }
            #[cfg(not(feature = "os-keyring"))]
            CredentialBackend::Keyring => Err(NewsError::Config(
                "keyring backend requires building with the os-keyring feature".into(),
            )),
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| NewsError::Config("Could not find data directory".into()))?;
        Ok(data_dir.join("newsdesk").join("newsdesk.db"))
    }
}
