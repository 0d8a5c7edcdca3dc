use crate::app::{AppContext, NewsError, Result};
use crate::cli::SaveArgs;
use crate::credentials::{mask, API_KEY_NAME};
use crate::domain::{Article, ArticleId, NewsCategory};
use crate::sort::SortPolicy;
use crate::state::{FetchPhase, FetchStateMachine};
use crate::store::{picker_order, BookmarkStore, SavedFilter};

pub async fn show_headlines(
    ctx: &AppContext,
    category: NewsCategory,
    sort: SortPolicy,
    bookmark: &SaveArgs,
) -> anyhow::Result<()> {
    println!("{}", category.display_name());
    ctx.headlines.set_sort_policy(sort);
    ctx.headlines.load_category(category).await;
    present(ctx, &ctx.headlines, bookmark)
}

pub async fn search(
    ctx: &AppContext,
    query: &str,
    sort: SortPolicy,
    bookmark: &SaveArgs,
) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        println!("Enter a search term");
        return Ok(());
    }
    ctx.search.set_sort_policy(sort);
    ctx.search.search(query).await;
    present(ctx, &ctx.search, bookmark)
}

fn present(ctx: &AppContext, machine: &FetchStateMachine, bookmark: &SaveArgs) -> anyhow::Result<()> {
    match machine.phase() {
        FetchPhase::Idle => {
            println!("Nothing loaded");
            Ok(())
        }
        FetchPhase::Failure(e) => {
            if e.is_retryable() {
                eprintln!("Request failed; run the command again to retry.");
            }
            Err(e.into())
        }
        FetchPhase::Success(articles) => {
            if articles.is_empty() {
                println!("No articles found");
                return Ok(());
            }
            print_articles(ctx, &articles)?;
            if let (Some(position), Some(category)) = (bookmark.save, bookmark.into.as_deref()) {
                save_article(ctx, &articles, position, category)?;
            }
            Ok(())
        }
    }
}

fn print_articles(ctx: &AppContext, articles: &[Article]) -> Result<()> {
    for (i, article) in articles.iter().enumerate() {
        let marker = if ctx.store.is_saved(article)? { " [saved]" } else { "" };
        println!("{:>3}. {}{}", i + 1, article.title, marker);
        println!("     {}", article.caption());
        println!("     {}", article.url);
    }
    Ok(())
}

fn save_article(
    ctx: &AppContext,
    articles: &[Article],
    position: usize,
    category: &str,
) -> anyhow::Result<()> {
    let Some(article) = position.checked_sub(1).and_then(|i| articles.get(i)) else {
        anyhow::bail!(
            "No article at position {}; choose 1-{}",
            position,
            articles.len()
        );
    };

    if ctx.store.is_saved(article)? {
        println!("Already saved: {}", article.title);
        return Ok(());
    }

    let saved = ctx.store.save(article, category)?;
    println!("Saved to {}: {}", saved.category, saved.title);
    Ok(())
}

pub fn list_saved(ctx: &AppContext, category: Option<String>, text: Option<String>) -> Result<()> {
    let filter = SavedFilter { category, text };
    let saved = filter.apply(&ctx.store.list_all()?);

    if saved.is_empty() {
        println!("No saved articles");
        return Ok(());
    }

    for entry in saved {
        println!("[{}] {}", entry.category, entry.title);
        println!("     {}", entry.to_article().caption());
        println!("     id: {}", entry.id);
    }
    Ok(())
}

pub fn unsave(ctx: &AppContext, id: &str) -> Result<()> {
    let saved = ctx
        .store
        .get_saved(&ArticleId::from(id.to_string()))?
        .ok_or_else(|| NewsError::SavedArticleNotFound(id.to_string()))?;

    ctx.store.delete(&saved)?;
    println!("Removed: {}", saved.title);
    Ok(())
}

pub fn list_categories(ctx: &AppContext) -> Result<()> {
    for name in picker_order(&ctx.store.list_category_names()?) {
        let count = ctx.store.articles_in_category(&name)?.len();
        println!("{} ({})", name, count);
    }
    Ok(())
}

pub fn set_key(ctx: &AppContext, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(NewsError::MissingCredential);
    }
    ctx.credentials.set(API_KEY_NAME, value)?;
    println!("API key saved");
    Ok(())
}

pub fn delete_key(ctx: &AppContext) -> Result<()> {
    ctx.credentials.delete(API_KEY_NAME)?;
    println!("API key removed");
    Ok(())
}

pub fn show_key(ctx: &AppContext) -> Result<()> {
    match ctx.credentials.get(API_KEY_NAME)? {
        Some(key) if !key.is_empty() => println!("Saved API key: {}", mask(&key)),
        _ => println!("No API key saved"),
    }
    Ok(())
}
