use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::models::{Link, Page, Post};

/// Result of an update or delete against a caller-supplied id. The store
/// never errors on a missing id; callers that care can inspect the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    Missing,
}

impl UpdateOutcome {
    fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            UpdateOutcome::Applied
        } else {
            UpdateOutcome::Missing
        }
    }

    pub fn applied(self) -> bool {
        self == UpdateOutcome::Applied
    }
}

/// Async content store over a SQLite connection pool. Sole authority on id
/// assignment and cascade deletion; everything else is one statement per call.
pub struct ContentStore {
    pool: SqlitePool,
}

impl ContentStore {
    /// Opens (creating the file if needed) and initializes the store.
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Storage(format!("invalid database URL: {}", e)))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| AppError::Storage(format!("failed to connect to {}: {}", database_url, e)))?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// In-memory store for tests. Pinned to a single connection so every
    /// statement sees the same database.
    pub async fn in_memory() -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::Storage(format!("failed to open in-memory SQLite: {}", e)))?;

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    /// Creates the schema if absent. Safe to call on every startup.
    pub async fn init(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("failed to create pages table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                date TEXT NOT NULL,
                page_id INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("failed to create posts table: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                description TEXT,
                page_id INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("failed to create links table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_page ON posts(page_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to create posts index: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_page ON links(page_id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to create links index: {}", e)))?;

        Ok(())
    }

    // ---- pages ----

    pub async fn create_page(&self, name: &str) -> AppResult<i64> {
        let result = sqlx::query("INSERT INTO pages (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to create page: {}", e)))?;
        Ok(result.last_insert_rowid())
    }

    /// All pages in insertion order.
    pub async fn list_pages(&self) -> AppResult<Vec<Page>> {
        let rows = sqlx::query("SELECT id, name FROM pages ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to list pages: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| Page {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    pub async fn update_page(&self, page_id: i64, name: &str) -> AppResult<UpdateOutcome> {
        let result = sqlx::query("UPDATE pages SET name = ? WHERE id = ?")
            .bind(name)
            .bind(page_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to update page {}: {}", page_id, e)))?;
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    /// Deletes a page together with every post and link that references it.
    /// The three deletions run in one transaction so a fault cannot leave
    /// orphaned rows behind.
    pub async fn delete_page(&self, page_id: i64) -> AppResult<UpdateOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Storage(format!("failed to begin transaction: {}", e)))?;

        sqlx::query("DELETE FROM posts WHERE page_id = ?")
            .bind(page_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::Storage(format!("failed to delete posts of page {}: {}", page_id, e))
            })?;

        sqlx::query("DELETE FROM links WHERE page_id = ?")
            .bind(page_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::Storage(format!("failed to delete links of page {}: {}", page_id, e))
            })?;

        let result = sqlx::query("DELETE FROM pages WHERE id = ?")
            .bind(page_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Storage(format!("failed to delete page {}: {}", page_id, e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Storage(format!("failed to commit page deletion: {}", e)))?;

        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    // ---- posts ----

    /// Inserts a post with `date` set to now. The page_id is not checked
    /// against the pages table; an orphan insert succeeds.
    pub async fn create_post(&self, title: &str, content: &str, page_id: i64) -> AppResult<i64> {
        let result =
            sqlx::query("INSERT INTO posts (title, content, date, page_id) VALUES (?, ?, ?, ?)")
                .bind(title)
                .bind(content)
                .bind(Utc::now())
                .bind(page_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Storage(format!("failed to create post: {}", e)))?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_posts(&self, page_id: i64) -> AppResult<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT id, title, content, date, page_id FROM posts WHERE page_id = ? ORDER BY id",
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("failed to list posts of page {}: {}", page_id, e)))?;

        Ok(rows
            .into_iter()
            .map(|row| Post {
                id: row.get("id"),
                title: row.get("title"),
                content: row.get("content"),
                date: row.get::<DateTime<Utc>, _>("date"),
                page_id: row.get("page_id"),
            })
            .collect())
    }

    /// Replaces title and content and resets `date` to now.
    pub async fn update_post(
        &self,
        post_id: i64,
        title: &str,
        content: &str,
    ) -> AppResult<UpdateOutcome> {
        let result =
            sqlx::query("UPDATE posts SET title = ?, content = ?, date = ? WHERE id = ?")
                .bind(title)
                .bind(content)
                .bind(Utc::now())
                .bind(post_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Storage(format!("failed to update post {}: {}", post_id, e)))?;
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    pub async fn delete_post(&self, post_id: i64) -> AppResult<UpdateOutcome> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to delete post {}: {}", post_id, e)))?;
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    // ---- links ----

    pub async fn create_link(
        &self,
        url: &str,
        description: Option<&str>,
        page_id: i64,
    ) -> AppResult<i64> {
        let result = sqlx::query("INSERT INTO links (url, description, page_id) VALUES (?, ?, ?)")
            .bind(url)
            .bind(description)
            .bind(page_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to create link: {}", e)))?;
        Ok(result.last_insert_rowid())
    }

    pub async fn list_links(&self, page_id: i64) -> AppResult<Vec<Link>> {
        let rows = sqlx::query(
            "SELECT id, url, description, page_id FROM links WHERE page_id = ? ORDER BY id",
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("failed to list links of page {}: {}", page_id, e)))?;

        Ok(rows
            .into_iter()
            .map(|row| Link {
                id: row.get("id"),
                url: row.get("url"),
                description: row.get("description"),
                page_id: row.get("page_id"),
            })
            .collect())
    }

    pub async fn update_link(
        &self,
        link_id: i64,
        url: &str,
        description: Option<&str>,
    ) -> AppResult<UpdateOutcome> {
        let result = sqlx::query("UPDATE links SET url = ?, description = ? WHERE id = ?")
            .bind(url)
            .bind(description)
            .bind(link_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to update link {}: {}", link_id, e)))?;
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }

    pub async fn delete_link(&self, link_id: i64) -> AppResult<UpdateOutcome> {
        let result = sqlx::query("DELETE FROM links WHERE id = ?")
            .bind(link_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("failed to delete link {}: {}", link_id, e)))?;
        Ok(UpdateOutcome::from_rows_affected(result.rows_affected()))
    }
}
