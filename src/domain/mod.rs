pub mod article;
pub mod category;
pub mod saved;

pub use article::{Article, ArticleId};
pub use category::{Category, NewsCategory, SEED_CATEGORIES};
pub use saved::SavedArticle;
