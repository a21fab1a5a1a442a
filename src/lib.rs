/*!
 * Round-Robin Scheduler Library
 * Multi-slot time-sliced scheduling of external processes
 */

pub mod core;
pub mod monitoring;
pub mod process;
pub mod scheduler;
pub mod shell;

// Re-exports
pub use crate::core::{
    usage, Clock, ConfigError, ManualClock, ProcessError, ReportFormat, SchedulerConfig,
    SchedulerError, SystemClock,
};
pub use monitoring::init_tracing;
#[cfg(unix)]
pub use process::OsLauncher;
pub use process::{CommandLine, ExitState, Launcher, ProcessControl, SimulatedLauncher};
pub use scheduler::{CompletionReport, PassSummary, ReadyQueue, Scheduler, Session, Submitter};
pub use shell::Shell;
