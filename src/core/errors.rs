/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::Pid;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Process-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Invalid command: {0}")]
    #[diagnostic(
        code(process::invalid_command),
        help("A command line needs at least an executable name.")
    )]
    InvalidCommand(String),

    #[error("Failed to launch '{command}': {reason}")]
    #[diagnostic(
        code(process::launch_failed),
        help("Check that the executable exists and is on PATH.")
    )]
    LaunchFailed { command: String, reason: String },

    #[error("Failed to send {signal} to PID {pid}: {reason}")]
    #[diagnostic(
        code(process::signal_failed),
        help("The process may have exited or is no longer a child of the scheduler.")
    )]
    SignalFailed {
        pid: Pid,
        signal: String,
        reason: String,
    },

    #[error("Failed to poll PID {pid}: {reason}")]
    #[diagnostic(
        code(process::poll_failed),
        help("The process could not be reaped. It is treated as finished.")
    )]
    PollFailed { pid: Pid, reason: String },
}

/// Scheduler-related errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Ready queue full (capacity {capacity})")]
    #[diagnostic(
        code(scheduler::queue_full),
        help("Run `start` to drain the queue or raise SCHED_QUEUE_CAPACITY.")
    )]
    QueueFull { capacity: usize },

    #[error("Ready queue empty")]
    #[diagnostic(code(scheduler::queue_empty), help("Submit a job first."))]
    QueueEmpty,

    #[error("Process error: {0}")]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),
}

impl SchedulerError {
    /// `QueueEmpty` means "nothing to do" rather than a failure
    #[inline]
    #[must_use]
    pub const fn is_empty_queue(&self) -> bool {
        matches!(self, Self::QueueEmpty)
    }
}

/// Startup configuration errors; all of them are fatal
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Missing required argument <{0}>")]
    #[diagnostic(
        code(config::missing_argument),
        help("Usage: <program> <NCPU> <TSLICE in milliseconds>")
    )]
    MissingArgument(String),

    #[error("Invalid NCPU '{0}': expected a positive integer")]
    #[diagnostic(code(config::invalid_ncpu), help("NCPU is the number of jobs run at once."))]
    InvalidNcpu(String),

    #[error("Invalid TSLICE '{value}': expected milliseconds in {min}..={max}")]
    #[diagnostic(code(config::invalid_tslice))]
    InvalidTimeSlice { value: String, min: u64, max: u64 },

    #[error("Invalid value '{value}' for {key}")]
    #[diagnostic(code(config::invalid_env))]
    InvalidEnv { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_process_error_wraps_into_scheduler_error() {
        let err: SchedulerError = ProcessError::InvalidCommand("empty".into()).into();
        assert_eq!(err.to_string(), "Process error: Invalid command: empty");
        assert!(!err.is_empty_queue());
        assert!(SchedulerError::QueueEmpty.is_empty_queue());
    }

    #[test]
    fn test_error_serialization_is_tagged() {
        let err = SchedulerError::QueueFull { capacity: 4 };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"error_type":"queue_full","details":{"capacity":4}}"#
        );

        let back: SchedulerError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_launch_error_message() {
        let err = ProcessError::LaunchFailed {
            command: "nope".into(),
            reason: "No such file or directory".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to launch 'nope': No such file or directory"
        );
    }
}
