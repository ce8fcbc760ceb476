//! paperwatch - fetch, summarize, store, and serve research papers.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use paperwatch_api::{serve, AppState};
use paperwatch_arxiv::ArxivClient;
use paperwatch_core::{FetchParams, DEFAULT_MAX_RESULTS};
use paperwatch_db::{create_pool, PaperStore};
use paperwatch_inference::summarizer_from_env;
use paperwatch_jobs::{JobRunner, JobTracker, ReconcileLoop};
use paperwatch_notify::EmailNotifier;

const DEFAULT_DATABASE_URL: &str = "sqlite:data/papers.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CATEGORY: &str = "cs.AI";
const DEFAULT_SCHEDULE: (u32, u32) = (8, 0);

#[derive(Parser)]
#[command(
    name = "paperwatch",
    version,
    about = "Research-paper watch service: fetch, summarize, notify, serve"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server (the default when no subcommand is given)
    Serve,
    /// Run one fetch cycle and exit
    Fetch {
        /// Category expression, e.g. "cat:cs.AI" (defaults to DEFAULT_CATEGORY)
        #[arg(long)]
        category: Option<String>,
        /// Raw catalog query, bypassing the expression builder
        #[arg(long)]
        query: Option<String>,
        /// Lookback window in days
        #[arg(long)]
        days: Option<u32>,
        /// Topic keyword to AND into the query
        #[arg(long)]
        topic: Option<String>,
        /// Result cap for the cycle
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: u32,
    },
    /// Run a cycle every day at SCHEDULE_TIME (HH:MM UTC, default 08:00)
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_serve().await,
        Command::Fetch {
            category,
            query,
            days,
            topic,
            max_results,
        } => run_fetch(category, query, days, topic, max_results).await,
        Command::Schedule => run_schedule().await,
    }
}

/// Wire the store and collaborators from the environment.
async fn build_pipeline() -> anyhow::Result<ReconcileLoop> {
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    ensure_data_dir(&database_url)?;

    let pool = create_pool(&database_url).await?;
    let store = PaperStore::connect(pool).await?;

    Ok(ReconcileLoop::new(
        store,
        Arc::new(ArxivClient::from_env()),
        summarizer_from_env(),
        Arc::new(EmailNotifier::from_env()),
        Arc::new(JobTracker::new()),
    ))
}

async fn run_serve() -> anyhow::Result<()> {
    let pipeline = build_pipeline().await?;
    let store = pipeline.store().clone();
    let runner = JobRunner::new(Arc::new(pipeline));

    let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    serve(AppState::new(store, runner), addr).await?;
    Ok(())
}

async fn run_fetch(
    category: Option<String>,
    query: Option<String>,
    days: Option<u32>,
    topic: Option<String>,
    max_results: u32,
) -> anyhow::Result<()> {
    let pipeline = build_pipeline().await?;

    // A raw query stands on its own; otherwise fall back to the default
    // category so a bare `paperwatch fetch` does something useful.
    let category = match (&query, category) {
        (Some(_), explicit) => explicit,
        (None, Some(explicit)) => Some(explicit),
        (None, None) => Some(default_category()),
    };

    let params = FetchParams {
        query,
        category,
        days,
        topic,
        max_results,
        ..FetchParams::default()
    };

    let report = pipeline.run_cycle(&params, None).await?;
    info!(
        subsystem = "api",
        op = "fetch",
        processed = report.processed,
        new_count = report.new,
        "Cycle finished"
    );
    Ok(())
}

async fn run_schedule() -> anyhow::Result<()> {
    let pipeline = build_pipeline().await?;

    let raw = std::env::var("SCHEDULE_TIME").unwrap_or_default();
    let (hour, minute) = parse_schedule_time(&raw).unwrap_or_else(|| {
        if !raw.is_empty() {
            warn!(value = %raw, "Invalid SCHEDULE_TIME, using 08:00");
        }
        DEFAULT_SCHEDULE
    });

    info!(
        subsystem = "api",
        component = "scheduler",
        hour,
        minute,
        "Scheduler started"
    );

    loop {
        let delay = until_next(Utc::now(), hour, minute);
        info!(
            subsystem = "api",
            component = "scheduler",
            sleep_secs = delay.as_secs(),
            "Sleeping until next cycle"
        );
        tokio::time::sleep(delay).await;

        let params = FetchParams {
            category: Some(default_category()),
            ..FetchParams::default()
        };
        match pipeline.run_cycle(&params, None).await {
            Ok(report) => info!(
                subsystem = "api",
                component = "scheduler",
                processed = report.processed,
                new_count = report.new,
                "Scheduled cycle finished"
            ),
            // Keep the loop alive; tomorrow's run gets a fresh attempt.
            Err(e) => error!(
                subsystem = "api",
                component = "scheduler",
                error = %e,
                "Scheduled cycle failed"
            ),
        }
    }
}

fn default_category() -> String {
    std::env::var("DEFAULT_CATEGORY").unwrap_or_else(|_| DEFAULT_CATEGORY.to_string())
}

/// Create the directory the SQLite file lives in, if the URL names one.
fn ensure_data_dir(database_url: &str) -> std::io::Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    if path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Parse `HH:MM` into validated hour and minute parts.
fn parse_schedule_time(raw: &str) -> Option<(u32, u32)> {
    let (h, m) = raw.split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    (hour < 24 && minute < 60).then_some((hour, minute))
}

/// Duration until the next occurrence of `hour:minute` UTC strictly after
/// `now`.
fn until_next(now: DateTime<Utc>, hour: u32, minute: u32) -> std::time::Duration {
    let Some(today_target) = now.date_naive().and_hms_opt(hour, minute, 0) else {
        // Inputs are validated upstream; a full day keeps the loop sane.
        return std::time::Duration::from_secs(24 * 60 * 60);
    };
    let today_target = today_target.and_utc();
    let target = if today_target > now {
        today_target
    } else {
        today_target + chrono::Duration::days(1)
    };
    (target - now).to_std().unwrap_or_default()
}
