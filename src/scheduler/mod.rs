/*!
 * Scheduler Module
 * Ready queue, job accounting, and round-robin dispatch
 */

pub mod job;
pub mod pass;
pub mod queue;
pub mod report;
pub mod session;

// Re-export public API
pub use job::{Accounting, Job};
pub use pass::Scheduler;
pub use queue::ReadyQueue;
pub use report::{CompletionReport, CompletionSink, PassSummary, ReportWriter};
pub use session::{JobTicket, Session, Submitter};
