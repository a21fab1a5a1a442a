/*!
 * System Limits and Constants
 *
 * Centralized location for scheduler-wide limits and defaults.
 * Organized by domain for discoverability.
 */

// =============================================================================
// READY QUEUE
// =============================================================================

/// Default ready queue capacity
pub const MAX_PROCESSES: usize = 100;

// =============================================================================
// JOB SUBMISSION
// =============================================================================

/// Maximum tokens (program + arguments) accepted from one command line
pub const MAX_COMMAND_TOKENS: usize = 255;

/// Maximum length of a job's display name, in characters
pub const MAX_JOB_NAME_LEN: usize = 255;

// =============================================================================
// TIME SLICE
// =============================================================================

/// Smallest accepted quantum (1ms)
pub const MIN_TIME_SLICE_MS: u64 = 1;

/// Largest accepted quantum (1 minute)
pub const MAX_TIME_SLICE_MS: u64 = 60_000;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides the ready queue capacity
pub const ENV_QUEUE_CAPACITY: &str = "SCHED_QUEUE_CAPACITY";

/// Selects the completion report format (`table` or `json`)
pub const ENV_REPORT_FORMAT: &str = "SCHED_REPORT_FORMAT";

/// Enables JSON log output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "SCHED_TRACE_JSON";
