/*!
 * Simulated Processes
 * In-memory jobs for logical scheduling without OS processes
 *
 * A simulated job needs a fixed amount of run time and only consumes it
 * while resumed, measured against the scheduler's clock.
 */

use super::command::CommandLine;
use super::traits::{Launcher, ProcessControl};
use super::types::{ExitState, ProcessError, ProcessResult};
use crate::core::time::{Clock, ManualClock};
use crate::core::types::{Millis, Pid};
use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// First pid handed out by a `SimulatedLauncher`
pub const FIRST_SIMULATED_PID: Pid = 1000;

/// A job that exits after `work_ms` of accumulated run time
#[derive(Debug)]
pub struct SimulatedProcess<C: Clock = ManualClock> {
    pid: Pid,
    clock: C,
    work_ms: Millis,
    consumed_ms: Millis,
    running_since: Option<Millis>,
    exit_code: i32,
    resumes: Option<Arc<SegQueue<Pid>>>,
}

impl<C: Clock> SimulatedProcess<C> {
    pub fn new(pid: Pid, clock: C, work_ms: Millis) -> Self {
        Self {
            pid,
            clock,
            work_ms,
            consumed_ms: 0,
            running_since: None,
            exit_code: 0,
            resumes: None,
        }
    }

    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Record this job's pid into `log` on every resume
    #[must_use]
    pub fn with_resume_log(mut self, log: Arc<SegQueue<Pid>>) -> Self {
        self.resumes = Some(log);
        self
    }

    /// Run time consumed so far, including the current slice
    pub fn consumed_ms(&self) -> Millis {
        let current = self
            .running_since
            .map(|since| self.clock.now_ms().saturating_sub(since))
            .unwrap_or(0);
        self.consumed_ms + current
    }

    fn exit_state(&self) -> ExitState {
        if self.exit_code == 0 {
            ExitState::ExitedNormally
        } else {
            ExitState::ExitedWithError(Some(self.exit_code))
        }
    }
}

impl<C: Clock> ProcessControl for SimulatedProcess<C> {
    #[inline]
    fn id(&self) -> Pid {
        self.pid
    }

    fn resume(&mut self) -> ProcessResult<()> {
        if self.running_since.is_none() {
            self.running_since = Some(self.clock.now_ms());
        }
        if let Some(ref log) = self.resumes {
            log.push(self.pid);
        }
        Ok(())
    }

    fn suspend(&mut self) -> ProcessResult<()> {
        self.consumed_ms = self.consumed_ms();
        self.running_since = None;
        Ok(())
    }

    fn poll_exit(&mut self) -> ProcessResult<ExitState> {
        if self.consumed_ms() >= self.work_ms {
            Ok(self.exit_state())
        } else {
            Ok(ExitState::StillRunning)
        }
    }
}

/// Launches simulated jobs from `<name> <work_ms> [exit_code]` command lines
#[derive(Debug, Clone)]
pub struct SimulatedLauncher<C: Clock + Clone = ManualClock> {
    clock: C,
    next_pid: Arc<AtomicU32>,
    resumes: Arc<SegQueue<Pid>>,
}

impl<C: Clock + Clone> SimulatedLauncher<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_pid: Arc::new(AtomicU32::new(FIRST_SIMULATED_PID)),
            resumes: Arc::new(SegQueue::new()),
        }
    }

    /// Drain the pids of every resume so far, in resume order
    pub fn take_resume_log(&self) -> Vec<Pid> {
        std::iter::from_fn(|| self.resumes.pop()).collect()
    }
}

impl<C: Clock + Clone> Launcher for SimulatedLauncher<C> {
    type Handle = SimulatedProcess<C>;

    fn launch(&self, command: &CommandLine) -> ProcessResult<Self::Handle> {
        let launch_failed = |reason: &str| ProcessError::LaunchFailed {
            command: command.program().to_string(),
            reason: reason.to_string(),
        };

        let work_ms = command
            .args()
            .first()
            .ok_or_else(|| launch_failed("missing work duration"))?
            .parse::<Millis>()
            .map_err(|_| launch_failed("work duration must be whole milliseconds"))?;

        let exit_code = match command.args().get(1) {
            Some(code) => code
                .parse::<i32>()
                .map_err(|_| launch_failed("exit code must be an integer"))?,
            None => 0,
        };

        let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
        Ok(SimulatedProcess::new(pid, self.clock.clone(), work_ms)
            .with_exit_code(exit_code)
            .with_resume_log(Arc::clone(&self.resumes)))
    }
}
