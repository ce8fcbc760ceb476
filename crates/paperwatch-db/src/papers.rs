//! Paper repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{debug, instrument};

use paperwatch_core::{Paper, PaperFilter, PaperPage, Result, StoreStats};

use crate::schema::{init_base_schema, init_search_schema, SearchMode};
use crate::topic::{Fts5TopicSearch, LikeTopicSearch, TopicSearch};

/// SQLite-backed store for paper records.
///
/// The catalog ID is the primary key; `save` is a full-column upsert plus an
/// additive author-link upsert (stale links from earlier versions of the same
/// paper are never removed). The topic-search strategy is fixed when the
/// store connects and never re-checked per call.
#[derive(Clone)]
pub struct PaperStore {
    pool: SqlitePool,
    topic: Arc<dyn TopicSearch>,
}

impl PaperStore {
    /// Connect a store over an existing pool, creating the schema and
    /// detecting whether the FTS5 index is available.
    pub async fn connect(pool: SqlitePool) -> Result<Self> {
        init_base_schema(&pool).await?;
        let topic: Arc<dyn TopicSearch> = match init_search_schema(&pool).await {
            SearchMode::Indexed => Arc::new(Fts5TopicSearch),
            SearchMode::Fallback => Arc::new(LikeTopicSearch),
        };
        Ok(Self { pool, topic })
    }

    /// Connect a store that always uses the LIKE fallback for topic search,
    /// regardless of engine capabilities.
    ///
    /// Both strategies must return the same results for simple keyword
    /// topics; this constructor exists so that property can be exercised.
    pub async fn connect_with_fallback_search(pool: SqlitePool) -> Result<Self> {
        init_base_schema(&pool).await?;
        Ok(Self {
            pool,
            topic: Arc::new(LikeTopicSearch),
        })
    }

    /// The topic-search mode this store operates in.
    pub fn search_mode(&self) -> SearchMode {
        self.topic.mode()
    }

    /// Insert or fully replace a paper record, then upsert its author links.
    ///
    /// Every paper column takes the incoming value (`created_at` excepted).
    /// Author names are registered first-write-wins and linked if not
    /// already linked; links from a previous version of the paper persist.
    #[instrument(skip(self, paper), fields(subsystem = "store", op = "save", paper_id = %paper.arxiv_id))]
    pub async fn save(&self, paper: &Paper) -> Result<()> {
        let categories_json = serde_json::to_string(&paper.categories)?;
        let insights_json = paper
            .key_insights
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO papers (
                arxiv_id, title, abstract, published, updated,
                primary_category, categories, pdf_url, llm_summary, key_insights,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(arxiv_id) DO UPDATE SET
                title = excluded.title,
                abstract = excluded.abstract,
                published = excluded.published,
                updated = excluded.updated,
                primary_category = excluded.primary_category,
                categories = excluded.categories,
                pdf_url = excluded.pdf_url,
                llm_summary = excluded.llm_summary,
                key_insights = excluded.key_insights,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&paper.arxiv_id)
        .bind(&paper.title)
        .bind(&paper.abstract_text)
        .bind(paper.published)
        .bind(paper.updated)
        .bind(&paper.primary_category)
        .bind(&categories_json)
        .bind(&paper.pdf_url)
        .bind(&paper.llm_summary)
        .bind(&insights_json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        for (position, name) in paper.authors.iter().enumerate() {
            sqlx::query("INSERT OR IGNORE INTO authors (name) VALUES (?)")
                .bind(name)
                .execute(&self.pool)
                .await?;

            let author_id: i64 = sqlx::query_scalar("SELECT id FROM authors WHERE name = ?")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;

            sqlx::query(
                "INSERT OR IGNORE INTO paper_authors (paper_id, author_id, position) VALUES (?, ?, ?)",
            )
            .bind(&paper.arxiv_id)
            .bind(author_id)
            .bind(position as i64)
            .execute(&self.pool)
            .await?;
        }

        debug!(
            subsystem = "store",
            op = "save",
            paper_id = %paper.arxiv_id,
            author_count = paper.authors.len(),
            "Paper saved"
        );
        Ok(())
    }

    /// Fetch a paper by catalog ID, with its authors in stored order.
    pub async fn get(&self, arxiv_id: &str) -> Result<Option<Paper>> {
        let row = sqlx::query(
            r#"
            SELECT arxiv_id, title, abstract, published, updated,
                   primary_category, categories, pdf_url, llm_summary, key_insights
            FROM papers
            WHERE arxiv_id = ?
            "#,
        )
        .bind(arxiv_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_paper(row).await?)),
            None => Ok(None),
        }
    }

    /// Whether a record with this catalog ID is already persisted.
    pub async fn exists(&self, arxiv_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM papers WHERE arxiv_id = ?")
            .bind(arxiv_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Total number of stored papers.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM papers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Paginated listing matching a filter, newest published first.
    ///
    /// `total` counts every match, not just the returned page. Authors are
    /// loaded per row; fine at page-sized result sets.
    #[instrument(skip(self, filter), fields(subsystem = "store", op = "list"))]
    pub async fn list(&self, filter: &PaperFilter) -> Result<PaperPage> {
        let (where_clause, binds) = self.filter_sql(filter);

        let count_sql = format!("SELECT COUNT(*) FROM papers {}", where_clause);
        let mut count_query = sqlx::query_scalar(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total: i64 = count_query.fetch_one(&self.pool).await?;

        let page_sql = format!(
            r#"
            SELECT arxiv_id, title, abstract, published, updated,
                   primary_category, categories, pdf_url, llm_summary, key_insights
            FROM papers
            {}
            ORDER BY published DESC
            LIMIT ? OFFSET ?
            "#,
            where_clause
        );
        let mut page_query = sqlx::query(&page_sql);
        for bind in &binds {
            page_query = page_query.bind(bind);
        }
        let rows = page_query
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(self.row_to_paper(row).await?);
        }

        debug!(
            subsystem = "store",
            op = "list",
            result_count = items.len(),
            total,
            "Listing complete"
        );
        Ok(PaperPage {
            items,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }

    /// Aggregate statistics across the store.
    pub async fn stats(&self) -> Result<StoreStats> {
        let total = self.count().await?;

        let last_fetch_time: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(updated_at) FROM papers")
                .fetch_one(&self.pool)
                .await?;

        let category_rows = sqlx::query(
            "SELECT primary_category, COUNT(*) AS n FROM papers GROUP BY primary_category",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut categories = BTreeMap::new();
        for row in category_rows {
            categories.insert(row.try_get::<String, _>("primary_category")?, row.try_get::<i64, _>("n")?);
        }

        let with_summary: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM papers WHERE llm_summary IS NOT NULL AND TRIM(llm_summary) <> ''",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreStats {
            total,
            last_fetch_time,
            categories,
            with_summary,
            without_summary: total - with_summary,
        })
    }

    /// Distinct primary categories present in the store, sorted.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let rows = sqlx::query_scalar(
            "SELECT DISTINCT primary_category FROM papers ORDER BY primary_category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Build the WHERE clause and bind values for a filter.
    ///
    /// Date bounds compare by calendar day, inclusive on both ends; the topic
    /// condition comes from the store's fixed search strategy.
    fn filter_sql(&self, filter: &PaperFilter) -> (String, Vec<String>) {
        let mut clauses = Vec::new();
        let mut binds = Vec::new();

        if let Some(topic) = filter.topic.as_deref() {
            self.topic.apply(topic, &mut clauses, &mut binds);
        }
        if let Some(start) = filter.start_date {
            clauses.push("date(published) >= ?".to_string());
            binds.push(start.to_string());
        }
        if let Some(end) = filter.end_date {
            clauses.push("date(published) <= ?".to_string());
            binds.push(end.to_string());
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        (where_clause, binds)
    }

    /// Hydrate a paper from its row plus a secondary author lookup.
    async fn row_to_paper(&self, row: sqlx::sqlite::SqliteRow) -> Result<Paper> {
        let arxiv_id: String = row.try_get("arxiv_id")?;
        let categories_json: String = row.try_get("categories")?;
        let insights_json: Option<String> = row.try_get("key_insights")?;

        let authors = sqlx::query_scalar(
            r#"
            SELECT a.name FROM authors a
            JOIN paper_authors pa ON pa.author_id = a.id
            WHERE pa.paper_id = ?
            ORDER BY pa.position, a.id
            "#,
        )
        .bind(&arxiv_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Paper {
            arxiv_id,
            title: row.try_get("title")?,
            authors,
            abstract_text: row.try_get("abstract")?,
            published: row.try_get("published")?,
            updated: row.try_get("updated")?,
            primary_category: row.try_get("primary_category")?,
            categories: serde_json::from_str(&categories_json)?,
            pdf_url: row.try_get("pdf_url")?,
            llm_summary: row.try_get("llm_summary")?,
            key_insights: insights_json
                .map(|text| serde_json::from_str(&text))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::create_memory_pool;
    use crate::test_fixtures::sample_paper;

    async fn memory_store() -> PaperStore {
        let pool = create_memory_pool().await.unwrap();
        PaperStore::connect(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_save_and_get_roundtrip() {
        let store = memory_store().await;
        let paper = sample_paper("2301.00001");

        store.save(&paper).await.unwrap();

        let retrieved = store.get("2301.00001").await.unwrap().unwrap();
        assert_eq!(retrieved.arxiv_id, paper.arxiv_id);
        assert_eq!(retrieved.title, paper.title);
        assert_eq!(retrieved.authors, paper.authors);
        assert_eq!(retrieved.categories, paper.categories);
        assert_eq!(retrieved.published, paper.published);
        assert_eq!(retrieved.pdf_url, paper.pdf_url);
        assert!(retrieved.llm_summary.is_none());
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = memory_store().await;
        assert!(store.get("9999.99999").await.unwrap().is_none());
        assert!(!store.exists("9999.99999").await.unwrap());
    }

    #[tokio::test]
    async fn test_save_twice_same_id_keeps_one_record() {
        let store = memory_store().await;
        let paper = sample_paper("2301.00002");

        store.save(&paper).await.unwrap();
        let updated = Paper {
            title: "Updated Title".to_string(),
            ..paper
        };
        store.save(&updated).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let retrieved = store.get("2301.00002").await.unwrap().unwrap();
        assert_eq!(retrieved.title, "Updated Title");
    }

    #[tokio::test]
    async fn test_second_save_overwrites_every_column() {
        let store = memory_store().await;
        let first = sample_paper("2301.00003").with_summary("first summary");
        store.save(&first).await.unwrap();

        let second = Paper {
            title: "Second".to_string(),
            abstract_text: "Rewritten abstract.".to_string(),
            primary_category: "cs.LG".to_string(),
            categories: vec!["cs.LG".to_string()],
            pdf_url: None,
            llm_summary: None,
            key_insights: Some(serde_json::json!({"k": 1})),
            ..sample_paper("2301.00003")
        };
        store.save(&second).await.unwrap();

        let retrieved = store.get("2301.00003").await.unwrap().unwrap();
        assert_eq!(retrieved.title, "Second");
        assert_eq!(retrieved.abstract_text, "Rewritten abstract.");
        assert_eq!(retrieved.primary_category, "cs.LG");
        assert!(retrieved.pdf_url.is_none());
        // The store itself does not preserve enrichment fields; that overlay
        // belongs to the reconciliation loop.
        assert!(retrieved.llm_summary.is_none());
        assert_eq!(retrieved.key_insights, Some(serde_json::json!({"k": 1})));
    }

    #[tokio::test]
    async fn test_authors_shared_across_papers() {
        let store = memory_store().await;
        let a = Paper {
            authors: vec!["Shared Author".to_string()],
            ..sample_paper("2301.00004")
        };
        let b = Paper {
            authors: vec!["Shared Author".to_string(), "Second Author".to_string()],
            ..sample_paper("2301.00005")
        };

        store.save(&a).await.unwrap();
        store.save(&b).await.unwrap();

        let names: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(names, 2, "identical names collapse to one author row");
    }

    #[tokio::test]
    async fn test_stale_author_links_persist_across_overwrite() {
        let store = memory_store().await;
        let v1 = Paper {
            authors: vec!["Alice".to_string(), "Bob".to_string()],
            ..sample_paper("2301.00006")
        };
        store.save(&v1).await.unwrap();

        let v2 = Paper {
            authors: vec!["Bob".to_string(), "Carol".to_string()],
            ..sample_paper("2301.00006")
        };
        store.save(&v2).await.unwrap();

        let retrieved = store.get("2301.00006").await.unwrap().unwrap();
        // Alice's link survives the overwrite; author lists only grow.
        assert_eq!(retrieved.authors.len(), 3);
        assert!(retrieved.authors.contains(&"Alice".to_string()));
        assert!(retrieved.authors.contains(&"Carol".to_string()));
    }

    #[tokio::test]
    async fn test_author_order_preserved() {
        let store = memory_store().await;
        let paper = Paper {
            authors: vec![
                "Zoe Last".to_string(),
                "Adam First".to_string(),
                "Mia Middle".to_string(),
            ],
            ..sample_paper("2301.00007")
        };
        store.save(&paper).await.unwrap();

        let retrieved = store.get("2301.00007").await.unwrap().unwrap();
        assert_eq!(
            retrieved.authors,
            vec!["Zoe Last", "Adam First", "Mia Middle"],
            "authors come back in catalog order, not alphabetical"
        );
    }

    #[tokio::test]
    async fn test_key_insights_roundtrip() {
        let store = memory_store().await;
        let insights = serde_json::json!({"novelty": "high", "scores": [1, 2, 3]});
        let paper = Paper {
            key_insights: Some(insights.clone()),
            ..sample_paper("2301.00008")
        };
        store.save(&paper).await.unwrap();

        let retrieved = store.get("2301.00008").await.unwrap().unwrap();
        assert_eq!(retrieved.key_insights, Some(insights));
    }
}
