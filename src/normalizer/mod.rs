use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::app::{NewsError, Result};
use crate::domain::Article;

const FALLBACK_API_MESSAGE: &str = "An error occurred";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    articles: Option<Vec<WireArticle>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    source: WireSource,
    title: String,
    url: String,
    published_at: DateTime<Utc>,
    author: Option<String>,
    description: Option<String>,
    url_to_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSource {
    name: String,
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        Article::new(wire.source.name, wire.title, wire.url, wire.published_at)
            .with_author(wire.author)
            .with_description(wire.description)
            .with_image_url(wire.url_to_image)
    }
}

/// Turns a 2xx response body into articles.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<Vec<Article>> {
        let envelope: Envelope = serde_json::from_slice(body)?;

        if envelope.status != "ok" {
            let message = envelope
                .message
                .unwrap_or_else(|| FALLBACK_API_MESSAGE.to_string());
            tracing::warn!("News API reported status {}: {}", envelope.status, message);
            return Err(NewsError::Api { message });
        }

        Ok(envelope
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(Article::from)
            .collect())
    }
}
