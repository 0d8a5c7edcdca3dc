//! # newsdesk
//!
//! Data layer for a news reader backed by the NewsAPI.org service: fetch
//! headlines by category, search, sort, and bookmark articles locally.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Normalizer → FetchStateMachine → Sort → front end
//!                                  front end → BookmarkStore (SQLite)
//! ```
//!
//! - [`fetcher`]: HTTP client for the news API
//! - [`normalizer`]: Decodes the API envelope into [`Article`](domain::Article)s
//! - [`state`]: Per-surface fetch lifecycle with stale-response dropping
//! - [`sort`]: Stable client-side ordering
//! - [`store`]: SQLite bookmark persistence
//!
//! ## Quick Start
//!
//! ```bash
//! # Store the API key
//! newsdesk key set <YOUR_KEY>
//!
//! # Technology headlines, newest first
//! newsdesk headlines technology --sort newest
//!
//! # Search and bookmark the second hit
//! newsdesk search "rust language" --save 2 --into Technology
//!
//! # List bookmarks
//! newsdesk saved
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// bookmark store, credential store, article source, fetch state machines.
pub mod app;

/// Command-line front end using clap.
///
/// - `headlines [CATEGORY]` - Top headlines
/// - `search <QUERY>` - Full search
/// - `saved` / `unsave <ID>` / `categories` - Bookmarks
/// - `key set|delete|show` - API key management
pub mod cli;

/// Configuration loaded from `~/.config/newsdesk/config.toml`.
pub mod config;

/// Storage for the news API key.
pub mod credentials;

/// Core domain models.
///
/// - [`Article`](domain::Article): Fetched article with URL+timestamp identity
/// - [`SavedArticle`](domain::SavedArticle): Bookmark snapshot
/// - [`Category`](domain::Category) / [`NewsCategory`](domain::NewsCategory):
///   bookmark categories and API headline categories
pub mod domain;

/// Remote article source.
///
/// - [`ArticleSource`](fetcher::ArticleSource): Async trait for fetching
/// - [`NewsApiSource`](fetcher::NewsApiSource): reqwest-based implementation
pub mod fetcher;

/// API response decoding.
pub mod normalizer;

/// Client-side sorting of article lists.
pub mod sort;

/// Fetch/search lifecycle exposed to front ends.
pub mod state;

/// Bookmark persistence.
///
/// - [`BookmarkStore`](store::BookmarkStore): Trait defining bookmark operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
