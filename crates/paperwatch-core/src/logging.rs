//! Structured logging schema and field name constants for paperwatch.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), cycle completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-candidate iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "store", "catalog", "inference", "notify", "jobs"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "arxiv", "ollama", "smtp", "tracker", "pipeline"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "save", "list", "fetch", "summarize", "run_cycle"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Catalog ID of the paper being operated on.
pub const PAPER_ID: &str = "paper_id";

/// Job token being processed.
pub const JOB_ID: &str = "job_id";

/// Search expression sent to the catalog or the store.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a fetch or query.
pub const RESULT_COUNT: &str = "result_count";

/// Candidates processed so far in a cycle.
pub const PROCESSED: &str = "processed";

/// New records persisted so far in a cycle.
pub const NEW_COUNT: &str = "new_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Provider selected for summarization.
pub const PROVIDER: &str = "provider";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
