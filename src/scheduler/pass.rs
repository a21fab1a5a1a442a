/*!
 * Scheduling Pass
 * Multi-slot round-robin dispatch under a fixed quantum
 *
 * One pass runs Dispatching -> Waiting-On-Slice -> Reconciling rounds until
 * every job queued at the start of the pass has exited.
 */

use super::job::Job;
use super::queue::ReadyQueue;
use super::report::{CompletionSink, PassSummary};
use crate::core::config::SchedulerConfig;
use crate::core::errors::SchedulerResult;
use crate::core::time::{Clock, SystemClock};
use crate::process::{ExitState, ProcessControl};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

/// Round-robin dispatcher
///
/// Stateless between passes: the queue and its counters are owned by the
/// caller and handed in for the duration of a pass.
#[derive(Debug, Clone)]
pub struct Scheduler<C: Clock = SystemClock> {
    config: SchedulerConfig,
    clock: C,
}

impl Scheduler<SystemClock> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(config: SchedulerConfig, clock: C) -> Self {
        info!(
            ncpu = config.ncpu.get(),
            quantum_ms = config.quantum_ms(),
            "Scheduler initialized"
        );
        Self { config, clock }
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run every job currently in `queue` to completion
    ///
    /// Reports are handed to `sink` as each exit is detected, in dispatch
    /// order within a round. The queue is left empty but not reset.
    pub fn run_pass<H: ProcessControl>(
        &self,
        queue: &mut ReadyQueue<Job<H>>,
        sink: &mut dyn CompletionSink,
    ) -> SchedulerResult<PassSummary> {
        let pass_id = Uuid::new_v4();
        let total = queue.len();
        let span = info_span!("pass", pass_id = %pass_id, total);
        let _entered = span.enter();

        if total == 0 {
            debug!("Nothing to schedule");
            return Ok(PassSummary::empty(pass_id));
        }

        let started = self.clock.now_ms();
        let mut rounds = 0u64;

        while queue.completed() < total {
            let dispatched = self.dispatch(queue)?;
            if dispatched.is_empty() {
                // Unreachable while unfinished jobs are always requeued
                warn!(
                    completed = queue.completed(),
                    "Ready queue drained before every job completed"
                );
                break;
            }

            rounds += 1;
            self.clock.sleep(self.config.quantum);
            self.reconcile(queue, dispatched, sink)?;
        }

        let summary = PassSummary {
            pass_id,
            total,
            completed: queue.completed(),
            rounds,
            elapsed_ms: self.clock.now_ms().saturating_sub(started),
        };
        info!(rounds, elapsed_ms = summary.elapsed_ms, "Pass complete");
        Ok(summary)
    }

    /// Take up to `ncpu` runnable jobs from the head and resume them
    ///
    /// Returns each job with whether its resume succeeded. Running out of
    /// queued jobs ends the round early.
    fn dispatch<H: ProcessControl>(
        &self,
        queue: &mut ReadyQueue<Job<H>>,
    ) -> SchedulerResult<Vec<(Job<H>, bool)>> {
        let ncpu = self.config.ncpu.get();
        let mut dispatched = Vec::with_capacity(ncpu);

        while dispatched.len() < ncpu {
            let mut job = match queue.dequeue() {
                Ok(job) => job,
                Err(e) if e.is_empty_queue() => break,
                Err(e) => return Err(e),
            };

            if job.is_completed() {
                debug!(pid = job.pid(), "Dropping completed job from queue");
                continue;
            }

            job.accounting_mut().on_dispatch(self.clock.now_ms());

            let resumed = match job.handle_mut().resume() {
                Ok(()) => true,
                Err(e) => {
                    warn!(pid = job.pid(), error = %e, "Failed to resume job");
                    false
                }
            };

            dispatched.push((job, resumed));
        }

        debug!(running = dispatched.len(), "Dispatched round");
        Ok(dispatched)
    }

    /// Charge the slice, detect exits, and preempt everything else
    fn reconcile<H: ProcessControl>(
        &self,
        queue: &mut ReadyQueue<Job<H>>,
        dispatched: Vec<(Job<H>, bool)>,
        sink: &mut dyn CompletionSink,
    ) -> SchedulerResult<()> {
        for (mut job, resumed) in dispatched {
            let now = self.clock.now_ms();

            // A job that never resumed spent the slice waiting
            if resumed {
                job.accounting_mut().on_slice_end(now);
            }

            let state = job.handle_mut().poll_exit().unwrap_or_else(|e| {
                warn!(pid = job.pid(), error = %e, "Poll failed, treating job as finished");
                ExitState::ExitedWithError(None)
            });

            if state.has_exited() {
                job.complete(now, state);
                queue.mark_completed();

                let report = job.report();
                info!(
                    pid = report.pid,
                    run_time = report.run_time,
                    wait_time = report.wait_time,
                    "Job completed"
                );
                sink.on_completion(&report);
                continue;
            }

            if resumed {
                if let Err(e) = job.handle_mut().suspend() {
                    warn!(pid = job.pid(), error = %e, "Failed to suspend job");
                }
            }
            queue.enqueue(job)?;
        }

        Ok(())
    }
}
