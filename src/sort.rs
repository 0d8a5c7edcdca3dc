use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SortPolicy {
    /// Order returned by the source
    #[default]
    Relevance,
    /// Source name, descending
    Popularity,
    /// Publish time, newest first
    #[value(name = "newest", alias = "published-at")]
    PublishedAt,
}

impl SortPolicy {
    pub fn label(self) -> &'static str {
        match self {
            SortPolicy::Relevance => "Relevance",
            SortPolicy::Popularity => "Popularity",
            SortPolicy::PublishedAt => "Newest",
        }
    }

    /// Value of the `sortBy` query parameter on search requests
    pub fn api_value(self) -> &'static str {
        match self {
            SortPolicy::Relevance => "relevancy",
            SortPolicy::Popularity => "popularity",
            SortPolicy::PublishedAt => "publishedAt",
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" | "relevancy" => Ok(SortPolicy::Relevance),
            "popularity" => Ok(SortPolicy::Popularity),
            "newest" | "publishedat" | "published_at" => Ok(SortPolicy::PublishedAt),
            other => Err(format!("Unknown sort policy: {}", other)),
        }
    }
}

/// Order `articles` by `policy`. `sort_by` is stable, so equal keys keep
/// their input order.
pub fn sort(articles: &[Article], policy: SortPolicy) -> Vec<Article> {
    let mut sorted = articles.to_vec();
    match policy {
        SortPolicy::Relevance => {}
        SortPolicy::Popularity => sorted.sort_by(|a, b| b.source_name.cmp(&a.source_name)),
        SortPolicy::PublishedAt => sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(source: &str, url: &str, secs: i64) -> Article {
        Article::new(source, format!("title {}", url), url, Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn urls(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.url.as_str()).collect()
    }

    fn sample() -> Vec<Article> {
        vec![
            article("CNN", "u1", 300),
            article("BBC", "u2", 100),
            article("Wired", "u3", 300),
            article("BBC", "u4", 200),
            article("CNN", "u5", 100),
        ]
    }

    #[test]
    fn test_relevance_is_identity() {
        let input = sample();
        assert_eq!(urls(&sort(&input, SortPolicy::Relevance)), urls(&input));
    }

    #[test]
    fn test_popularity_descending_and_stable() {
        let sorted = sort(&sample(), SortPolicy::Popularity);
        assert_eq!(urls(&sorted), vec!["u3", "u1", "u5", "u2", "u4"]);
    }

    #[test]
    fn test_published_at_descending_and_stable() {
        let sorted = sort(&sample(), SortPolicy::PublishedAt);
        assert_eq!(urls(&sorted), vec!["u1", "u3", "u4", "u2", "u5"]);
    }

    #[test]
    fn test_length_and_elements_preserved() {
        let input = sample();
        for policy in [SortPolicy::Relevance, SortPolicy::Popularity, SortPolicy::PublishedAt] {
            let sorted = sort(&input, policy);
            assert_eq!(sorted.len(), input.len());

            let mut expected = urls(&input);
            let mut actual = urls(&sorted);
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected, "policy {}", policy);
        }
    }

    #[test]
    fn test_duplicates_not_removed() {
        let input = vec![article("BBC", "same", 1), article("BBC", "same", 1)];
        assert_eq!(sort(&input, SortPolicy::Popularity).len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(sort(&[], SortPolicy::PublishedAt).is_empty());
    }

    #[test]
    fn test_two_technology_articles_newest_first() {
        let t1 = article("Verge", "older", 1_000);
        let t2 = article("Verge", "newer", 2_000);
        let sorted = sort(&[t1, t2], SortPolicy::PublishedAt);
        assert_eq!(urls(&sorted), vec!["newer", "older"]);
    }

    #[test]
    fn test_policy_parsing_and_api_values() {
        assert_eq!("Newest".parse::<SortPolicy>(), Ok(SortPolicy::PublishedAt));
        assert_eq!("relevance".parse::<SortPolicy>(), Ok(SortPolicy::Relevance));
        assert!("random".parse::<SortPolicy>().is_err());
        assert_eq!(SortPolicy::PublishedAt.api_value(), "publishedAt");
        assert_eq!(SortPolicy::Relevance.api_value(), "relevancy");
    }
}
