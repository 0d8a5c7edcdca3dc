use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bookmark categories created on first open.
pub const SEED_CATEGORIES: [&str; 7] = [
    "General",
    "Business",
    "Technology",
    "Entertainment",
    "Sports",
    "Health",
    "Science",
];

/// Headline categories understood by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    General,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 7] = [
        NewsCategory::General,
        NewsCategory::Business,
        NewsCategory::Technology,
        NewsCategory::Entertainment,
        NewsCategory::Sports,
        NewsCategory::Science,
        NewsCategory::Health,
    ];

    /// Value of the `category` query parameter
    pub fn as_str(self) -> &'static str {
        match self {
            NewsCategory::General => "general",
            NewsCategory::Business => "business",
            NewsCategory::Technology => "technology",
            NewsCategory::Entertainment => "entertainment",
            NewsCategory::Sports => "sports",
            NewsCategory::Science => "science",
            NewsCategory::Health => "health",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            NewsCategory::General => "Latest News",
            NewsCategory::Business => "Business",
            NewsCategory::Technology => "Technology",
            NewsCategory::Entertainment => "Entertainment",
            NewsCategory::Sports => "Sports",
            NewsCategory::Science => "Science",
            NewsCategory::Health => "Health",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for NewsCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        NewsCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// A persisted bookmark category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
