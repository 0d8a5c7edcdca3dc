use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::app::{NewsError, Result};
use crate::config::ApiConfig;
use crate::credentials::{CredentialStore, API_KEY_NAME};
use crate::domain::{Article, NewsCategory};
use crate::fetcher::ArticleSource;
use crate::normalizer::Normalizer;
use crate::sort::SortPolicy;

/// NewsAPI.org client. Holds no per-request state, so one instance can serve
/// concurrent calls.
pub struct NewsApiSource {
    client: Client,
    base_url: String,
    language: String,
    credentials: Arc<dyn CredentialStore>,
    normalizer: Normalizer,
}

impl NewsApiSource {
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            credentials,
            normalizer: Normalizer::new(),
        })
    }

    fn api_key(&self) -> Result<String> {
        match self.credentials.get(API_KEY_NAME)? {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(NewsError::MissingCredential),
        }
    }

    pub fn headlines_url(&self, api_key: &str, category: NewsCategory) -> Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}/top-headlines", self.base_url),
            &[
                ("apiKey", api_key),
                ("language", self.language.as_str()),
                ("category", category.as_str()),
            ],
        )?;
        Ok(url)
    }

    pub fn search_url(&self, api_key: &str, query: &str, policy: SortPolicy) -> Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}/everything", self.base_url),
            &[
                ("apiKey", api_key),
                ("language", self.language.as_str()),
                ("q", query),
                ("sortBy", policy.api_value()),
            ],
        )?;
        Ok(url)
    }

    async fn fetch_articles(&self, url: Url) -> Result<Vec<Article>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("News API responded with HTTP {}", status.as_u16());
            return Err(NewsError::Server {
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let articles = self.normalizer.normalize(&body)?;
        tracing::info!("Fetched {} articles", articles.len());
        Ok(articles)
    }
}

#[async_trait]
impl ArticleSource for NewsApiSource {
    async fn fetch_by_category(&self, category: NewsCategory) -> Result<Vec<Article>> {
        let api_key = self.api_key()?;
        let url = self.headlines_url(&api_key, category)?;
        tracing::debug!("Requesting top headlines for {}", category.as_str());
        self.fetch_articles(url).await
    }

    async fn search(&self, query: &str, policy: SortPolicy) -> Result<Vec<Article>> {
        let api_key = self.api_key()?;
        let url = self.search_url(&api_key, query, policy)?;
        tracing::debug!("Searching for {:?} sorted by {}", query, policy.api_value());
        self.fetch_articles(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;

    fn source(key: Option<&str>) -> NewsApiSource {
        let credentials = match key {
            Some(k) => MemoryCredentialStore::with_value(API_KEY_NAME, k),
            None => MemoryCredentialStore::new(),
        };
        NewsApiSource::new(&ApiConfig::default(), Arc::new(credentials)).unwrap()
    }

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_headlines_url() {
        let url = source(Some("k")).headlines_url("k", NewsCategory::Technology).unwrap();
        assert_eq!(url.path(), "/v2/top-headlines");
        assert_eq!(
            query_pairs(&url),
            vec![
                ("apiKey".to_string(), "k".to_string()),
                ("language".to_string(), "en".to_string()),
                ("category".to_string(), "technology".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_url_percent_encodes_query() {
        let url = source(Some("k"))
            .search_url("k", "rust & wasm?", SortPolicy::PublishedAt)
            .unwrap();
        assert_eq!(url.path(), "/v2/everything");

        let raw = url.query().unwrap();
        assert!(!raw.contains("rust & wasm?"));

        let pairs = query_pairs(&url);
        assert!(pairs.contains(&("q".to_string(), "rust & wasm?".to_string())));
        assert!(pairs.contains(&("sortBy".to_string(), "publishedAt".to_string())));
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(source(None).api_key(), Err(NewsError::MissingCredential)));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        assert!(matches!(
            source(Some("   ")).api_key(),
            Err(NewsError::MissingCredential)
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ApiConfig {
            base_url: "http://localhost:9999/v2/".into(),
            ..ApiConfig::default()
        };
        let source = NewsApiSource::new(&config, Arc::new(MemoryCredentialStore::new())).unwrap();
        let url = source.headlines_url("k", NewsCategory::General).unwrap();
        assert_eq!(url.path(), "/v2/top-headlines");
    }
}
