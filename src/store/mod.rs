pub mod filter;
pub mod sqlite;

use crate::app::Result;
use crate::domain::{Article, ArticleId, Category, SavedArticle};

pub use filter::{picker_order, SavedFilter};
pub use sqlite::SqliteStore;

/// Persisted bookmarks grouped into named categories.
pub trait BookmarkStore {
    // Bookmark operations
    fn is_saved(&self, article: &Article) -> Result<bool>;
    fn save(&self, article: &Article, category_name: &str) -> Result<SavedArticle>;
    fn delete(&self, saved: &SavedArticle) -> Result<()>;
    fn get_saved(&self, id: &ArticleId) -> Result<Option<SavedArticle>>;
    fn list_all(&self) -> Result<Vec<SavedArticle>>;

    // Category operations
    fn fetch_or_create_category(&self, name: &str) -> Result<Category>;
    fn list_category_names(&self) -> Result<Vec<String>>;
    fn articles_in_category(&self, name: &str) -> Result<Vec<SavedArticle>>;
}
