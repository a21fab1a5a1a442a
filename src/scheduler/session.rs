/*!
 * Scheduler Session
 * Per-session context owning the ready queue and job submission
 *
 * Submissions go through a cloneable `Submitter` into a lock-free inbox.
 * The inbox is drained into the ready queue when a pass starts, so a job
 * submitted while a pass is running waits for the next pass. Capacity is
 * enforced across the queue and the inbox together.
 */

use super::job::Job;
use super::pass::Scheduler;
use super::queue::ReadyQueue;
use super::report::{CompletionSink, PassSummary};
use crate::core::config::SchedulerConfig;
use crate::core::errors::{SchedulerError, SchedulerResult};
use crate::core::time::{Clock, SystemClock};
use crate::core::types::Pid;
use crate::process::{CommandLine, Launcher};
use crossbeam_queue::SegQueue;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Receipt for an accepted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobTicket {
    pub pid: Pid,
    pub name: String,
    pub command: String,
}

/// Thread-safe handle for submitting jobs to a session
pub struct Submitter<L: Launcher> {
    launcher: Arc<L>,
    inbox: Arc<SegQueue<Job<L::Handle>>>,
    occupied: Arc<AtomicUsize>,
    active: Arc<AtomicBool>,
    capacity: usize,
}

impl<L: Launcher> Submitter<L> {
    fn new(launcher: L, capacity: usize) -> Self {
        Self {
            launcher: Arc::new(launcher),
            inbox: Arc::new(SegQueue::new()),
            occupied: Arc::new(AtomicUsize::new(0)),
            active: Arc::new(AtomicBool::new(false)),
            capacity,
        }
    }

    /// Parse `line`, launch it suspended, and queue it for the next pass
    ///
    /// Fails with `QueueFull` before anything is launched when the session
    /// is at capacity. A failed launch leaves the queue untouched.
    #[instrument(skip(self), fields(capacity = self.capacity))]
    pub fn submit(&self, line: &str) -> SchedulerResult<JobTicket> {
        let command = CommandLine::parse(line)?;
        self.reserve()?;

        let handle = match self.launcher.launch(&command) {
            Ok(handle) => handle,
            Err(e) => {
                self.release(1);
                warn!(command = %command.raw(), error = %e, "Launch failed");
                return Err(e.into());
            }
        };

        let job = Job::new(handle, &command);
        let ticket = JobTicket {
            pid: job.pid(),
            name: job.name().to_string(),
            command: job.command().to_string(),
        };
        self.inbox.push(job);

        if self.active.load(Ordering::SeqCst) {
            info!(pid = ticket.pid, "Job submitted during active pass, queued for next pass");
        } else {
            info!(pid = ticket.pid, name = %ticket.name, "Job submitted");
        }
        Ok(ticket)
    }

    /// Jobs submitted but not yet admitted to the ready queue
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    fn reserve(&self) -> SchedulerResult<()> {
        self.occupied
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .map(|_| ())
            .map_err(|_| SchedulerError::QueueFull {
                capacity: self.capacity,
            })
    }

    fn release(&self, count: usize) {
        // Never underflow, whatever the bookkeeping order
        let _ = self
            .occupied
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(count))
            });
    }
}

impl<L: Launcher> Clone for Submitter<L> {
    fn clone(&self) -> Self {
        Self {
            launcher: Arc::clone(&self.launcher),
            inbox: Arc::clone(&self.inbox),
            occupied: Arc::clone(&self.occupied),
            active: Arc::clone(&self.active),
            capacity: self.capacity,
        }
    }
}

/// Scheduler context for one interactive session
pub struct Session<L: Launcher, C: Clock = SystemClock> {
    scheduler: Scheduler<C>,
    queue: ReadyQueue<Job<L::Handle>>,
    submitter: Submitter<L>,
}

impl<L: Launcher> Session<L, SystemClock> {
    pub fn new(config: SchedulerConfig, launcher: L) -> Self {
        Self::with_clock(config, launcher, SystemClock::new())
    }
}

impl<L: Launcher, C: Clock> Session<L, C> {
    pub fn with_clock(config: SchedulerConfig, launcher: L, clock: C) -> Self {
        let capacity = config.queue_capacity.get();
        debug!(capacity, "Session created");
        Self {
            scheduler: Scheduler::with_clock(config, clock),
            queue: ReadyQueue::with_capacity(capacity),
            submitter: Submitter::new(launcher, capacity),
        }
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        self.scheduler.config()
    }

    /// A submission handle usable from other threads
    pub fn submitter(&self) -> Submitter<L> {
        self.submitter.clone()
    }

    pub fn submit(&self, line: &str) -> SchedulerResult<JobTicket> {
        self.submitter.submit(line)
    }

    /// Jobs waiting for the next pass
    pub fn queued(&self) -> usize {
        self.queue.len() + self.submitter.pending()
    }

    /// Run one full pass over everything submitted so far, then reset
    #[instrument(skip(self, sink), fields(queued = self.queued()))]
    pub fn start(&mut self, sink: &mut dyn CompletionSink) -> SchedulerResult<PassSummary> {
        self.admit_pending()?;
        let total = self.queue.len();

        self.submitter.active.store(true, Ordering::SeqCst);
        let result = self.scheduler.run_pass(&mut self.queue, sink);
        self.submitter.active.store(false, Ordering::SeqCst);

        self.queue.reset();
        self.submitter.release(total);
        result
    }

    /// Discard every job that never ran, killing its process
    ///
    /// Returns how many jobs were discarded.
    pub fn shutdown(&mut self) -> usize {
        let mut discarded = self.queue.len();
        self.queue.reset();

        while self.submitter.inbox.pop().is_some() {
            discarded += 1;
        }
        self.submitter.release(discarded);

        if discarded > 0 {
            info!(discarded, "Discarded jobs that never ran");
        }
        discarded
    }

    fn admit_pending(&mut self) -> SchedulerResult<()> {
        while let Some(job) = self.submitter.inbox.pop() {
            self.queue.enqueue(job)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ProcessError;
    use crate::core::time::ManualClock;
    use crate::process::SimulatedLauncher;
    use crate::scheduler::report::CompletionReport;
    use pretty_assertions::assert_eq;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    fn session(capacity: usize) -> Session<SimulatedLauncher, ManualClock> {
        let clock = ManualClock::new();
        let config = SchedulerConfig::new(NonZeroUsize::new(2).unwrap(), Duration::from_millis(100))
            .with_queue_capacity(NonZeroUsize::new(capacity).unwrap());
        Session::with_clock(config, SimulatedLauncher::new(clock.clone()), clock)
    }

    #[test]
    fn test_submit_returns_ticket() {
        let session = session(4);
        let ticket = session.submit("worker 100").unwrap();
        assert_eq!(ticket.name, "worker");
        assert_eq!(ticket.command, "worker 100");
        assert_eq!(session.queued(), 1);
    }

    #[test]
    fn test_capacity_enforced_before_launch() {
        let session = session(2);
        session.submit("a 10").unwrap();
        session.submit("b 10").unwrap();
        assert_eq!(
            session.submit("c 10"),
            Err(SchedulerError::QueueFull { capacity: 2 })
        );
        assert_eq!(session.queued(), 2);
    }

    #[test]
    fn test_failed_launch_leaves_queue_untouched() {
        let session = session(1);
        let err = session.submit("bad notanumber").unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::Process(ProcessError::LaunchFailed { .. })
        ));
        assert_eq!(session.queued(), 0);

        // The reserved slot was released
        session.submit("good 10").unwrap();
    }

    #[test]
    fn test_empty_command_rejected() {
        let session = session(1);
        assert!(matches!(
            session.submit("   "),
            Err(SchedulerError::Process(ProcessError::InvalidCommand(_)))
        ));
    }

    #[test]
    fn test_start_runs_and_resets() {
        let mut session = session(2);
        session.submit("a 50").unwrap();
        session.submit("b 150").unwrap();

        let mut sink: Vec<CompletionReport> = Vec::new();
        let summary = session.start(&mut sink).unwrap();
        assert_eq!(summary.completed, 2);
        assert_eq!(sink.len(), 2);
        assert_eq!(session.queued(), 0);

        // Capacity is available again for the next pass
        session.submit("c 10").unwrap();
        session.submit("d 10").unwrap();
        let summary = session.start(&mut sink).unwrap();
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_start_with_nothing_queued() {
        let mut session = session(2);
        let mut sink: Vec<CompletionReport> = Vec::new();
        let summary = session.start(&mut sink).unwrap();
        assert_eq!(summary.total, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_submitter_from_another_thread() {
        let mut session = session(4);
        let submitter = session.submitter();

        std::thread::spawn(move || {
            submitter.submit("remote 10").unwrap();
        })
        .join()
        .unwrap();

        let mut sink: Vec<CompletionReport> = Vec::new();
        session.start(&mut sink).unwrap();
        assert_eq!(sink[0].name, "remote");
    }

    #[test]
    fn test_shutdown_discards_pending() {
        let mut session = session(3);
        session.submit("a 10").unwrap();
        session.submit("b 10").unwrap();

        assert_eq!(session.shutdown(), 2);
        assert_eq!(session.queued(), 0);
        assert_eq!(session.shutdown(), 0);
    }
}
