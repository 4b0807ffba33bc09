use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::config::AppConfig;
use crate::models::{
    BookMetadata, ChapterContent, ChapterSummary, PreparedChapter, StoredMetadata,
};

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("failed to create {}", config.data_dir.display()))?;
        Self::connect(&config.sqlite_dsn(), 5).await
    }

    /// Private in-memory database, mainly for tests.
    pub async fn in_memory() -> Result<Self> {
        // Every connection to `sqlite::memory:` is its own database.
        Self::connect("sqlite::memory:", 1).await
    }

    pub async fn connect(dsn: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(dsn)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open {dsn}"))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                book_name TEXT UNIQUE NOT NULL
            );

            CREATE TABLE IF NOT EXISTS book_metadata (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                book_id INTEGER UNIQUE NOT NULL,
                author TEXT DEFAULT '未知',
                tags TEXT DEFAULT '',
                status TEXT DEFAULT '連載中',
                description TEXT DEFAULT '暫無簡介',
                last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (book_id) REFERENCES books (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS chapters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                book_id INTEGER,
                chapter_num INTEGER,
                title TEXT,
                content TEXT,
                FOREIGN KEY (book_id) REFERENCES books (id) ON DELETE CASCADE,
                UNIQUE(book_id, chapter_num)
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the id of `book_name`, inserting the book if needed.
    pub async fn ensure_book(&self, book_name: &str) -> Result<i64> {
        sqlx::query("INSERT OR IGNORE INTO books (book_name) VALUES (?)")
            .bind(book_name)
            .execute(&self.pool)
            .await?;

        let id = sqlx::query_scalar("SELECT id FROM books WHERE book_name = ?")
            .bind(book_name)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("no id for book {book_name}"))?;

        Ok(id)
    }

    pub async fn upsert_metadata(&self, book_id: i64, metadata: &BookMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO book_metadata (book_id, author, tags, status, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(book_id)
        .bind(&metadata.author)
        .bind(&metadata.tags)
        .bind(&metadata.status)
        .bind(&metadata.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts chapters that are not stored yet; existing `(book, chapter_num)`
    /// rows are kept. Returns the number of new rows.
    pub async fn insert_chapters(&self, book_id: i64, chapters: &[PreparedChapter]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for chapter in chapters {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO chapters (book_id, chapter_num, title, content) VALUES (?, ?, ?, ?)",
            )
            .bind(book_id)
            .bind(chapter.index as i64)
            .bind(&chapter.title)
            .bind(&chapter.content)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    pub async fn list_books(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar("SELECT book_name FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    pub async fn list_chapters(&self, book_name: &str) -> Result<Vec<ChapterSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT c.chapter_num, c.title
            FROM chapters c
            JOIN books b ON c.book_id = b.id
            WHERE b.book_name = ?
            ORDER BY c.chapter_num
            "#,
        )
        .bind(book_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ChapterSummary {
                chapter_num: row.get("chapter_num"),
                title: row.get::<Option<String>, _>("title").unwrap_or_default(),
            })
            .collect())
    }

    pub async fn get_chapter(&self, book_name: &str, chapter_num: i64) -> Result<Option<ChapterContent>> {
        let row = sqlx::query(
            r#"
            SELECT c.title, c.content
            FROM chapters c
            JOIN books b ON c.book_id = b.id
            WHERE b.book_name = ? AND c.chapter_num = ?
            "#,
        )
        .bind(book_name)
        .bind(chapter_num)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| ChapterContent {
            title: row.get::<Option<String>, _>("title").unwrap_or_default(),
            content: row.get::<Option<String>, _>("content").unwrap_or_default(),
        }))
    }

    pub async fn get_metadata(&self, book_name: &str) -> Result<Option<StoredMetadata>> {
        let row = sqlx::query(
            r#"
            SELECT m.author, m.tags, m.status, m.description,
                   CAST(m.last_updated AS TEXT) AS last_updated
            FROM book_metadata m
            JOIN books b ON m.book_id = b.id
            WHERE b.book_name = ?
            "#,
        )
        .bind(book_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_metadata))
    }
}

fn row_to_metadata(row: SqliteRow) -> StoredMetadata {
    let defaults = BookMetadata::default();
    let text = |column: &str, fallback: String| -> String {
        row.get::<Option<String>, _>(column).unwrap_or(fallback)
    };

    StoredMetadata {
        metadata: BookMetadata {
            author: text("author", defaults.author),
            tags: text("tags", defaults.tags),
            status: text("status", defaults.status),
            description: text("description", defaults.description),
        },
        last_updated: row.get("last_updated"),
    }
}
