/*!
 * Scheduler Reports
 * Completion statistics and pass summaries
 */

use crate::core::config::ReportFormat;
use crate::core::types::{Millis, Pid};
use crate::process::ExitState;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use tracing::warn;
use uuid::Uuid;

/// Statistics emitted the moment a job's exit is detected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub name: String,
    pub pid: Pid,
    pub run_time: Millis,
    pub wait_time: Millis,
    /// `run_time + wait_time`
    pub completion_time: Millis,
    /// Clock reading at first dispatch
    pub start_time: Millis,
    /// Clock reading when the exit was detected
    pub end_time: Millis,
    pub exit: ExitState,
}

impl fmt::Display for CompletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Process Completed: {} (PID: {})", self.name, self.pid)?;
        writeln!(
            f,
            "{:<10} {:<6} {:<12} {:<12} {:<12}",
            "Name", "PID", "Run Time", "Wait Time", "Completion Time"
        )?;
        write!(
            f,
            "{:<10} {:<6} {:<12} {:<12} {:<12}",
            self.name, self.pid, self.run_time, self.wait_time, self.completion_time
        )
    }
}

/// Receives completion reports in dispatch order
pub trait CompletionSink {
    fn on_completion(&mut self, report: &CompletionReport);
}

impl CompletionSink for Vec<CompletionReport> {
    fn on_completion(&mut self, report: &CompletionReport) {
        self.push(report.clone());
    }
}

/// Writes reports to an output stream as they arrive
pub struct ReportWriter<W: Write> {
    out: W,
    format: ReportFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_report(&mut self, report: &CompletionReport) -> std::io::Result<()> {
        match self.format {
            ReportFormat::Table => {
                writeln!(self.out)?;
                writeln!(self.out, "{}", report)?;
            }
            ReportFormat::Json => {
                serde_json::to_writer(&mut self.out, report)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> CompletionSink for ReportWriter<W> {
    fn on_completion(&mut self, report: &CompletionReport) {
        if let Err(e) = self.write_report(report) {
            warn!(pid = report.pid, error = %e, "Failed to write completion report");
        }
    }
}

/// Outcome of one scheduling pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub pass_id: Uuid,
    /// Queue length when the pass started
    pub total: usize,
    pub completed: usize,
    /// Dispatch rounds executed
    pub rounds: u64,
    pub elapsed_ms: Millis,
}

impl PassSummary {
    /// Summary of a pass that found nothing to run
    pub fn empty(pass_id: Uuid) -> Self {
        Self {
            pass_id,
            total: 0,
            completed: 0,
            rounds: 0,
            elapsed_ms: 0,
        }
    }
}
