pub mod news_api;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Article, NewsCategory};
use crate::sort::SortPolicy;

pub use news_api::NewsApiSource;

/// Remote supplier of articles. One attempt per call, no retries.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Top headlines for a category, in server order
    async fn fetch_by_category(&self, category: NewsCategory) -> Result<Vec<Article>>;

    /// Free-text search; `policy` is forwarded as the server-side sort hint
    async fn search(&self, query: &str, policy: SortPolicy) -> Result<Vec<Article>>;
}
