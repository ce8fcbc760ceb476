//! Topic-search strategies: FTS5 index vs. LIKE fallback.
//!
//! Both strategies must return the same result set for any corpus and topic
//! string under substring semantics; the indexed mode approximates this via
//! token matching, which is exact for simple alphanumeric keywords.

use crate::escape_like;
use crate::schema::SearchMode;

/// Query-predicate strategy for topic filtering.
///
/// Selected once when the store connects, based on engine feature detection,
/// and never re-checked per call. `apply` appends one SQL condition for
/// `topic` to `clauses` and its bind values, in order, onto `binds`.
pub trait TopicSearch: Send + Sync {
    fn mode(&self) -> SearchMode;

    fn apply(&self, topic: &str, clauses: &mut Vec<String>, binds: &mut Vec<String>);
}

/// Indexed strategy: AND-combined token match against the FTS5 index.
pub struct Fts5TopicSearch;

impl TopicSearch for Fts5TopicSearch {
    fn mode(&self) -> SearchMode {
        SearchMode::Indexed
    }

    fn apply(&self, topic: &str, clauses: &mut Vec<String>, binds: &mut Vec<String>) {
        let expr = fts_match_expression(topic);
        if expr.is_empty() {
            return;
        }
        clauses.push(
            "arxiv_id IN (SELECT arxiv_id FROM papers_fts WHERE papers_fts MATCH ?)".to_string(),
        );
        binds.push(expr);
    }
}

/// Fallback strategy: per-keyword case-insensitive substring scan.
///
/// Each keyword must match at least one of title/abstract/primary_category/
/// categories; keywords are AND-combined.
pub struct LikeTopicSearch;

impl TopicSearch for LikeTopicSearch {
    fn mode(&self) -> SearchMode {
        SearchMode::Fallback
    }

    fn apply(&self, topic: &str, clauses: &mut Vec<String>, binds: &mut Vec<String>) {
        for keyword in topic.split_whitespace() {
            let pattern = format!("%{}%", escape_like(keyword));
            clauses.push(
                "(title LIKE ? ESCAPE '\\' OR abstract LIKE ? ESCAPE '\\' \
                 OR primary_category LIKE ? ESCAPE '\\' OR categories LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            for _ in 0..4 {
                binds.push(pattern.clone());
            }
        }
    }
}

/// Build an FTS5 MATCH expression from a raw topic string.
///
/// Keywords are lowercased, stripped of quote characters, and AND-combined;
/// each token is quoted so FTS5 treats it as a plain term rather than query
/// syntax.
pub fn fts_match_expression(topic: &str) -> String {
    topic
        .to_lowercase()
        .replace('"', " ")
        .split_whitespace()
        .map(|token| format!("\"{}\"", token))
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_expression_single_token() {
        assert_eq!(fts_match_expression("quantum"), "\"quantum\"");
    }

    #[test]
    fn test_match_expression_ands_tokens() {
        assert_eq!(
            fts_match_expression("Quantum Computing"),
            "\"quantum\" AND \"computing\""
        );
    }

    #[test]
    fn test_match_expression_strips_quotes() {
        assert_eq!(
            fts_match_expression("\"graph neural\""),
            "\"graph\" AND \"neural\""
        );
    }

    #[test]
    fn test_match_expression_empty_topic() {
        assert_eq!(fts_match_expression("   "), "");
    }

    #[test]
    fn test_fts_apply_pushes_single_clause() {
        let mut clauses = Vec::new();
        let mut binds = Vec::new();
        Fts5TopicSearch.apply("deep learning", &mut clauses, &mut binds);

        assert_eq!(clauses.len(), 1);
        assert_eq!(binds, vec!["\"deep\" AND \"learning\"".to_string()]);
    }

    #[test]
    fn test_fts_apply_skips_blank_topic() {
        let mut clauses = Vec::new();
        let mut binds = Vec::new();
        Fts5TopicSearch.apply("  ", &mut clauses, &mut binds);
        assert!(clauses.is_empty());
        assert!(binds.is_empty());
    }

    #[test]
    fn test_like_apply_binds_four_columns_per_keyword() {
        let mut clauses = Vec::new();
        let mut binds = Vec::new();
        LikeTopicSearch.apply("deep learning", &mut clauses, &mut binds);

        assert_eq!(clauses.len(), 2);
        assert_eq!(binds.len(), 8);
        assert!(binds.iter().all(|b| b == "%deep%" || b == "%learning%"));
    }

    #[test]
    fn test_like_apply_escapes_wildcards() {
        let mut clauses = Vec::new();
        let mut binds = Vec::new();
        LikeTopicSearch.apply("100%_sure", &mut clauses, &mut binds);
        assert_eq!(binds[0], "%100\\%\\_sure%");
    }
}
