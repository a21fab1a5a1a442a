/*!
 * Scheduler Jobs
 * Process handles paired with their accounting records
 */

use super::report::CompletionReport;
use crate::core::types::{Millis, Pid};
use crate::process::{CommandLine, ExitState, ProcessControl};
use serde::Serialize;

/// Per-job timestamps and accumulated durations
///
/// Updated only by the scheduler. `last_pause` is the timestamp of the last
/// suspend-or-resume boundary and is the base of the next delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Accounting {
    pub start_time: Option<Millis>,
    pub end_time: Option<Millis>,
    pub last_pause: Millis,
    pub run_time: Millis,
    pub wait_time: Millis,
}

impl Accounting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dispatch at `now`
    ///
    /// The first dispatch only stamps `start_time`; later ones charge the
    /// time spent queued since the last pause as wait time.
    pub fn on_dispatch(&mut self, now: Millis) {
        match self.start_time {
            None => self.start_time = Some(now),
            Some(_) => self.wait_time += now.saturating_sub(self.last_pause),
        }
        self.last_pause = now;
    }

    /// Charge the slice that just ended as run time
    pub fn on_slice_end(&mut self, now: Millis) {
        self.run_time += now.saturating_sub(self.last_pause);
        self.last_pause = now;
    }

    pub fn on_complete(&mut self, now: Millis) {
        self.end_time = Some(now);
    }

    /// Run time plus wait time
    #[inline]
    pub fn completion_time(&self) -> Millis {
        self.run_time + self.wait_time
    }
}

/// A queued job: its process handle plus scheduling state
#[derive(Debug)]
pub struct Job<H> {
    handle: H,
    name: String,
    command: String,
    accounting: Accounting,
    exit: Option<ExitState>,
}

impl<H: ProcessControl> Job<H> {
    pub fn new(handle: H, command: &CommandLine) -> Self {
        Self {
            handle,
            name: command.name(),
            command: command.raw().to_string(),
            accounting: Accounting::new(),
            exit: None,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.handle.id()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[inline]
    pub fn accounting(&self) -> &Accounting {
        &self.accounting
    }

    /// True exactly once the exit has been detected
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.exit.is_some()
    }

    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub(crate) fn accounting_mut(&mut self) -> &mut Accounting {
        &mut self.accounting
    }

    /// Mark the job finished at `now`
    pub(crate) fn complete(&mut self, now: Millis, exit: ExitState) {
        debug_assert!(self.exit.is_none(), "job completed twice");
        self.accounting.on_complete(now);
        self.exit = Some(exit);
    }

    /// Statistics record for a completed job
    pub fn report(&self) -> CompletionReport {
        CompletionReport {
            name: self.name.clone(),
            pid: self.pid(),
            run_time: self.accounting.run_time,
            wait_time: self.accounting.wait_time,
            completion_time: self.accounting.completion_time(),
            start_time: self.accounting.start_time.unwrap_or_default(),
            end_time: self.accounting.end_time.unwrap_or_default(),
            exit: self.exit.unwrap_or(ExitState::StillRunning),
        }
    }
}
