use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable article key: the article URL joined to its publish time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    /// `"{url}-{unix seconds}"`. Whole seconds only, so ids read
    /// `https://x/a-1704103200` rather than a fractional `...-1704103200.0`;
    /// ids written by clients that format the timestamp as a float will not
    /// match.
    pub fn new(url: &str, published_at: DateTime<Utc>) -> Self {
        Self(format!("{}-{}", url, published_at.timestamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ArticleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub source_name: String,
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl Article {
    pub fn new(
        source_name: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            title: title.into(),
            url: url.into(),
            published_at,
            author: None,
            description: None,
            image_url: None,
        }
    }

    pub fn with_author(self, author: Option<String>) -> Self {
        Self { author, ..self }
    }

    pub fn with_description(self, description: Option<String>) -> Self {
        Self {
            description,
            ..self
        }
    }

    pub fn with_image_url(self, image_url: Option<String>) -> Self {
        Self { image_url, ..self }
    }

    pub fn id(&self) -> ArticleId {
        ArticleId::new(&self.url, self.published_at)
    }

    pub fn author_text(&self) -> &str {
        self.author.as_deref().unwrap_or("")
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// "Source - 2024-01-01 10:00" line shown under a headline
    pub fn caption(&self) -> String {
        format!(
            "{} - {}",
            self.source_name,
            self.published_at.format("%Y-%m-%d %H:%M")
        )
    }
}

// Identity, not field-by-field equality: a re-fetch with a new description is
// still the same article.
impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Article {}

impl Hash for Article {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_id_concatenates_url_and_timestamp() {
        let article = Article::new("BBC", "Title", "https://example.com/a", ts(1_704_103_200));
        assert_eq!(article.id().as_str(), "https://example.com/a-1704103200");
    }

    #[test]
    fn test_id_deterministic() {
        let a = Article::new("BBC", "Title", "https://example.com/a", ts(100));
        let b = Article::new("BBC", "Title", "https://example.com/a", ts(100));
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_differs_by_publish_time() {
        let a = Article::new("BBC", "Title", "https://example.com/a", ts(100));
        let b = Article::new("BBC", "Title", "https://example.com/a", ts(101));
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_equality_ignores_display_fields() {
        let a = Article::new("BBC", "Title", "https://example.com/a", ts(100))
            .with_description(Some("first".into()));
        let b = Article::new("Reuters", "Other", "https://example.com/a", ts(100))
            .with_author(Some("Jane".into()))
            .with_description(Some("second".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_text_accessors_default_to_empty() {
        let article = Article::new("BBC", "Title", "https://example.com/a", ts(100));
        assert_eq!(article.author_text(), "");
        assert_eq!(article.description_text(), "");

        let article = article.with_author(Some("Jane Doe".into()));
        assert_eq!(article.author_text(), "Jane Doe");
    }

    #[test]
    fn test_caption() {
        let article = Article::new("BBC", "Title", "https://example.com/a", ts(1_704_103_200));
        assert_eq!(article.caption(), "BBC - 2024-01-01 10:00");
    }
}
