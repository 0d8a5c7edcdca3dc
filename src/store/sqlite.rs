use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{NewsError, PersistenceError, Result};
use crate::domain::{Article, ArticleId, Category, SavedArticle, SEED_CATEGORIES};
use crate::store::BookmarkStore;

const SAVED_COLUMNS: &str =
    "s.id, s.title, s.url, s.published_at, c.name, s.image_url, s.description, s.author, s.source_name, s.saved_at";

/// SQLite-backed bookmark store. Every call takes the connection lock, so
/// reads and writes are serialized and each mutation commits before the lock
/// is released.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(Connection::open_in_memory()?)
    }

    fn open(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        store.seed_categories()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|e| PersistenceError::Migration(e.to_string()))?;

        Ok(())
    }

    fn seed_categories(&self) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for name in SEED_CATEGORIES {
            Self::fetch_or_create_in(&tx, name)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned.into())
    }

    fn fetch_or_create_in(conn: &Connection, name: &str) -> rusqlite::Result<Category> {
        let created = conn.execute(
            "INSERT OR IGNORE INTO categories (name, created_at) VALUES (?1, ?2)",
            params![name, Utc::now().to_rfc3339()],
        )?;
        if created > 0 {
            tracing::debug!("Created category {}", name);
        }

        conn.query_row(
            "SELECT id, name, created_at FROM categories WHERE name = ?1",
            params![name],
            |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: Self::datetime_column(row, 2)?,
                })
            },
        )
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
        let raw: String = row.get(idx)?;
        Self::parse_datetime(&raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Text,
                format!("invalid timestamp: {}", raw).into(),
            )
        })
    }

    fn row_to_saved(row: &Row<'_>) -> rusqlite::Result<SavedArticle> {
        Ok(SavedArticle {
            id: ArticleId::from(row.get::<_, String>(0)?),
            title: row.get(1)?,
            url: row.get(2)?,
            published_at: Self::datetime_column(row, 3)?,
            category: row.get(4)?,
            image_url: row.get(5)?,
            description: row.get(6)?,
            author: row.get(7)?,
            source_name: row.get(8)?,
            saved_at: Self::datetime_column(row, 9)?,
        })
    }

    fn is_unique_violation(e: &rusqlite::Error) -> bool {
        matches!(
            e,
            rusqlite::Error::SqliteFailure(err, _)
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }

    fn validate_category_name(name: &str) -> Result<&str> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NewsError::InvalidCategory(name.to_string()));
        }
        Ok(trimmed)
    }
}

impl BookmarkStore for SqliteStore {
    fn is_saved(&self, article: &Article) -> Result<bool> {
        let conn = self.conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM saved_articles WHERE id = ?1",
            params![article.id().as_str()],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn save(&self, article: &Article, category_name: &str) -> Result<SavedArticle> {
        let category_name = Self::validate_category_name(category_name)?;
        let mut conn = self.conn()?;

        let tx = conn.transaction()?;
        let category = Self::fetch_or_create_in(&tx, category_name)?;
        let saved = SavedArticle::from_article(article, &category.name, Utc::now());

        tx.execute(
            "INSERT INTO saved_articles (id, title, url, published_at, category_id, image_url, description, author, source_name, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                saved.id.as_str(),
                saved.title,
                saved.url,
                saved.published_at.to_rfc3339(),
                category.id,
                saved.image_url,
                saved.description,
                saved.author,
                saved.source_name,
                saved.saved_at.to_rfc3339()
            ],
        )
        .map_err(|e| {
            if Self::is_unique_violation(&e) {
                NewsError::from(PersistenceError::DuplicateArticle(saved.id.to_string()))
            } else {
                NewsError::from(e)
            }
        })?;

        tx.commit()?;
        tracing::info!("Saved {} into {}", saved.id, category.name);
        Ok(saved)
    }

    fn delete(&self, saved: &SavedArticle) -> Result<()> {
        let conn = self.conn()?;

        let removed = conn.execute(
            "DELETE FROM saved_articles WHERE id = ?1",
            params![saved.id.as_str()],
        )?;
        if removed == 0 {
            tracing::debug!("Nothing to delete for {}", saved.id);
        }

        Ok(())
    }

    fn get_saved(&self, id: &ArticleId) -> Result<Option<SavedArticle>> {
        let conn = self.conn()?;

        let result = conn
            .query_row(
                &format!(
                    "SELECT {} FROM saved_articles s JOIN categories c ON c.id = s.category_id
                     WHERE s.id = ?1",
                    SAVED_COLUMNS
                ),
                params![id.as_str()],
                Self::row_to_saved,
            )
            .optional()?;

        Ok(result)
    }

    fn list_all(&self) -> Result<Vec<SavedArticle>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM saved_articles s JOIN categories c ON c.id = s.category_id
             ORDER BY s.seq",
            SAVED_COLUMNS
        ))?;

        let saved = stmt
            .query_map([], Self::row_to_saved)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(saved)
    }

    fn fetch_or_create_category(&self, name: &str) -> Result<Category> {
        let name = Self::validate_category_name(name)?;
        let conn = self.conn()?;
        Ok(Self::fetch_or_create_in(&conn, name)?)
    }

    fn list_category_names(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(names)
    }

    fn articles_in_category(&self, name: &str) -> Result<Vec<SavedArticle>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM saved_articles s JOIN categories c ON c.id = s.category_id
             WHERE c.name = ?1 ORDER BY s.seq",
            SAVED_COLUMNS
        ))?;

        let saved = stmt
            .query_map(params![name.trim()], Self::row_to_saved)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(saved)
    }
}
