//! Embedded schema definition and search-capability detection.

use sqlx::SqlitePool;
use tracing::{info, warn};

use paperwatch_core::Result;

/// Topic-search strategy available for a connected store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// FTS5 index over title/abstract/categories, trigger-maintained.
    Indexed,
    /// Case-insensitive LIKE scan over the same columns.
    Fallback,
}

const BASE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS papers (
        arxiv_id         TEXT PRIMARY KEY,
        title            TEXT NOT NULL,
        abstract         TEXT NOT NULL,
        published        TEXT NOT NULL,
        updated          TEXT NOT NULL,
        primary_category TEXT NOT NULL,
        categories       TEXT NOT NULL DEFAULT '[]',
        pdf_url          TEXT,
        llm_summary      TEXT,
        key_insights     TEXT,
        created_at       TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at       TEXT NOT NULL DEFAULT (datetime('now'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_papers_published ON papers(published DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS authors (
        id   INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS paper_authors (
        paper_id  TEXT NOT NULL REFERENCES papers(arxiv_id) ON DELETE CASCADE,
        author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
        position  INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (paper_id, author_id)
    )
    "#,
];

// The FTS table mirrors the filterable paper columns and is kept consistent
// through triggers, so ordinary upserts on `papers` never touch it directly.
const FTS_OBJECTS: &[&str] = &[
    r#"
    CREATE VIRTUAL TABLE IF NOT EXISTS papers_fts USING fts5(
        arxiv_id UNINDEXED,
        title,
        abstract,
        primary_category,
        categories
    )
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS papers_fts_insert AFTER INSERT ON papers BEGIN
        INSERT INTO papers_fts(arxiv_id, title, abstract, primary_category, categories)
        VALUES (new.arxiv_id, new.title, new.abstract, new.primary_category, new.categories);
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS papers_fts_delete AFTER DELETE ON papers BEGIN
        DELETE FROM papers_fts WHERE arxiv_id = old.arxiv_id;
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS papers_fts_update AFTER UPDATE ON papers BEGIN
        DELETE FROM papers_fts WHERE arxiv_id = old.arxiv_id;
        INSERT INTO papers_fts(arxiv_id, title, abstract, primary_category, categories)
        VALUES (new.arxiv_id, new.title, new.abstract, new.primary_category, new.categories);
    END
    "#,
];

/// Create the base tables.
pub async fn init_base_schema(pool: &SqlitePool) -> Result<()> {
    for stmt in BASE_TABLES {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}

/// Create the FTS index and its sync triggers, detecting FTS5 availability.
///
/// Returns the search mode the store should operate in. An engine built
/// without the FTS5 extension fails the virtual-table creation; that is a
/// recoverable condition answered with the LIKE fallback, not an error.
pub async fn init_search_schema(pool: &SqlitePool) -> SearchMode {
    for stmt in FTS_OBJECTS {
        if let Err(e) = sqlx::query(stmt).execute(pool).await {
            warn!(
                subsystem = "store",
                component = "schema",
                op = "detect_fts",
                error = %e,
                "FTS5 unavailable, falling back to LIKE topic search"
            );
            return SearchMode::Fallback;
        }
    }
    info!(
        subsystem = "store",
        component = "schema",
        op = "detect_fts",
        "FTS5 index active for topic search"
    );
    SearchMode::Indexed
}
