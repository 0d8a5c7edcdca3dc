use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Article, ArticleId};

/// A bookmarked article snapshot. `id` is taken from the article when it is
/// saved and is never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedArticle {
    pub id: ArticleId,
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub category: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub source_name: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedArticle {
    pub fn from_article(article: &Article, category: &str, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: article.id(),
            title: article.title.clone(),
            url: article.url.clone(),
            published_at: article.published_at,
            category: category.to_string(),
            image_url: article.image_url.clone(),
            description: article.description.clone(),
            author: article.author.clone(),
            source_name: article.source_name.clone(),
            saved_at,
        }
    }

    pub fn to_article(&self) -> Article {
        Article::new(
            self.source_name.clone(),
            self.title.clone(),
            self.url.clone(),
            self.published_at,
        )
        .with_author(self.author.clone())
        .with_description(self.description.clone())
        .with_image_url(self.image_url.clone())
    }
}
