/*!
 * Scheduler Configuration
 * Positional arguments plus environment overrides
 */

use super::errors::ConfigError;
use super::limits::{
    ENV_QUEUE_CAPACITY, ENV_REPORT_FORMAT, MAX_PROCESSES, MAX_TIME_SLICE_MS, MIN_TIME_SLICE_MS,
};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Output format for completion reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Fixed-width table, one block per completed job
    #[default]
    Table,
    /// One JSON object per line
    Json,
}

impl ReportFormat {
    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" | "text" => Some(Self::Table),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Session-wide scheduler configuration
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulerConfig {
    /// Maximum jobs granted permission to run in one dispatch round
    pub ncpu: NonZeroUsize,
    /// Fixed quantum every dispatched job receives
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub quantum: Duration,
    /// Ready queue capacity
    pub queue_capacity: NonZeroUsize,
    pub report_format: ReportFormat,
}

impl SchedulerConfig {
    /// Create a config with default capacity and table reports
    pub fn new(ncpu: NonZeroUsize, quantum: Duration) -> Self {
        Self {
            ncpu,
            quantum,
            queue_capacity: NonZeroUsize::new(MAX_PROCESSES).unwrap_or(NonZeroUsize::MIN),
            report_format: ReportFormat::Table,
        }
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Parse `<program> <ncpu> <tslice>`
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        let ncpu = args
            .get(1)
            .ok_or_else(|| ConfigError::MissingArgument("NCPU".into()))?;
        let tslice = args
            .get(2)
            .ok_or_else(|| ConfigError::MissingArgument("TSLICE".into()))?;

        Ok(Self::new(parse_ncpu(ncpu.as_ref())?, parse_time_slice(tslice.as_ref())?))
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_QUEUE_CAPACITY) {
            self.queue_capacity = value
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| invalid_env(ENV_QUEUE_CAPACITY, &value))?;
        }

        if let Some(value) = lookup(ENV_REPORT_FORMAT) {
            self.report_format =
                ReportFormat::parse(&value).ok_or_else(|| invalid_env(ENV_REPORT_FORMAT, &value))?;
        }

        Ok(self)
    }

    /// Quantum in whole milliseconds
    #[inline]
    pub fn quantum_ms(&self) -> u64 {
        super::time::duration_to_millis(self.quantum)
    }
}

/// Usage line printed on fatal configuration errors
pub fn usage(program: &str) -> String {
    format!("Usage: {} <NCPU> <TSLICE in milliseconds>", program)
}

fn parse_ncpu(value: &str) -> Result<NonZeroUsize, ConfigError> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| ConfigError::InvalidNcpu(value.to_string()))
}

fn parse_time_slice(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if (MIN_TIME_SLICE_MS..=MAX_TIME_SLICE_MS).contains(&ms) => {
            Ok(Duration::from_millis(ms))
        }
        _ => Err(ConfigError::InvalidTimeSlice {
            value: value.to_string(),
            min: MIN_TIME_SLICE_MS,
            max: MAX_TIME_SLICE_MS,
        }),
    }
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    }
}
