use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("News API key is missing; store one with `newsdesk key set <KEY>`")]
    MissingCredential,

    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("A server error occurred: {code} (the API key may be invalid)")]
    Server { code: u16 },

    #[error("{message}")]
    Api { message: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Invalid category name: {0:?}")]
    InvalidCategory(String),

    #[error("Saved article not found: {0}")]
    SavedArticleNotFound(String),

    #[error("Credential store error: {0}")]
    Credential(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("article already saved: {0}")]
    DuplicateArticle(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("bookmark store lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for NewsError {
    fn from(e: rusqlite::Error) -> Self {
        NewsError::Persistence(PersistenceError::Database(e))
    }
}

impl From<reqwest::Error> for NewsError {
    fn from(e: reqwest::Error) -> Self {
        // The request URL carries the API key in its query string.
        NewsError::Transport(Box::new(e.without_url()))
    }
}

impl From<serde_json::Error> for NewsError {
    fn from(e: serde_json::Error) -> Self {
        NewsError::Transport(Box::new(e))
    }
}

impl NewsError {
    /// Whether a user-initiated retry may succeed without other changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NewsError::Transport(_) | NewsError::Server { .. })
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
