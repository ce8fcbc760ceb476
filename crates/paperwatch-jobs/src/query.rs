//! arXiv search-expression builder.
//!
//! Assembles the query string sent to the catalog from structured fetch
//! parameters. Used only when the caller did not supply a raw expression.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use paperwatch_core::FetchParams;

/// Lookback window in days when neither a range nor a day count is given.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 1;

/// Build a catalog query from structured parameters.
///
/// Terms are joined with ` AND `, in order:
/// - the category expression verbatim, parenthesized when it contains an
///   ` OR ` token so the AND binds over the whole alternation;
/// - the topic as `all:word`, quoted when it contains whitespace;
/// - a submitted-date window: the explicit range when both bounds are set,
///   otherwise the last `days` days ending now.
pub fn build_query(params: &FetchParams) -> String {
    let mut terms: Vec<String> = Vec::new();

    if let Some(category) = params.category.as_deref() {
        if category.contains(" OR ") {
            terms.push(format!("({category})"));
        } else {
            terms.push(category.to_string());
        }
    }

    if let Some(topic) = params.topic.as_deref() {
        if topic.chars().any(char::is_whitespace) {
            terms.push(format!("all:\"{topic}\""));
        } else {
            terms.push(format!("all:{topic}"));
        }
    }

    let window = match (params.start_date, params.end_date) {
        (Some(start), Some(end)) => date_window(start, end),
        _ => {
            let days = params.days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
            lookback_window(Utc::now(), days)
        }
    };
    terms.push(window);

    terms.join(" AND ")
}

/// Inclusive full-day range term: 00:00 on the start day through 23:59 on
/// the end day.
fn date_window(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "submittedDate:[{}0000 TO {}2359]",
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}

/// Range term covering the `days` days ending at `now`.
fn lookback_window(now: DateTime<Utc>, days: u32) -> String {
    let start = now - Duration::days(i64::from(days));
    date_window(start.date_naive(), now.date_naive())
}
