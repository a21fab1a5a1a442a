/*!
 * Core Module
 * Fundamental types, configuration, timing and error handling
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod time;
pub mod types;

// Re-export for convenience
pub use config::{usage, ReportFormat, SchedulerConfig};
pub use errors::*;
pub use time::{Clock, ManualClock, SystemClock};
pub use types::*;
