pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::domain::NewsCategory;
use crate::sort::SortPolicy;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Browse, search and bookmark news headlines", long_about = None)]
pub struct Cli {
    /// Bookmark database path (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Save one of the listed results as a bookmark.
#[derive(Args, Debug, Clone)]
pub struct SaveArgs {
    /// Position (starting at 1) of the article to save
    #[arg(long, requires = "into")]
    pub save: Option<usize>,

    /// Bookmark category; created if it does not exist
    #[arg(long, requires = "save")]
    pub into: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show top headlines for a category
    Headlines {
        #[arg(value_enum, default_value_t = NewsCategory::General)]
        category: NewsCategory,

        #[arg(short, long, value_enum, default_value_t = SortPolicy::Relevance)]
        sort: SortPolicy,

        #[command(flatten)]
        bookmark: SaveArgs,
    },
    /// Search all articles
    Search {
        query: String,

        #[arg(short, long, value_enum, default_value_t = SortPolicy::Relevance)]
        sort: SortPolicy,

        #[command(flatten)]
        bookmark: SaveArgs,
    },
    /// List bookmarks, newest first
    Saved {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only bookmarks whose title or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Remove a bookmark by its id
    Unsave { id: String },
    /// List bookmark categories
    Categories,
    /// Manage the news API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Store the API key
    Set { value: String },
    /// Remove the stored API key
    Delete,
    /// Show the stored API key, masked
    Show,
}
