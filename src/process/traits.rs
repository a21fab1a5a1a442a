/*!
 * Process Traits
 * Capability interfaces the scheduler drives jobs through
 */

use super::command::CommandLine;
use super::types::{ExitState, ProcessResult};
use crate::core::types::Pid;

/// Job control over one launched process
///
/// Call discipline (resume only while suspended, suspend only while
/// running) is guaranteed by the scheduler, not by implementations.
pub trait ProcessControl {
    /// Identifier of the underlying process
    fn id(&self) -> Pid;

    /// Suspended -> running
    fn resume(&mut self) -> ProcessResult<()>;

    /// Running -> suspended, preserving all process state
    fn suspend(&mut self) -> ProcessResult<()>;

    /// Non-blocking check for termination; must never block the caller
    fn poll_exit(&mut self) -> ProcessResult<ExitState>;
}

/// Starts processes for submitted command lines
pub trait Launcher: Send + Sync {
    type Handle: ProcessControl + Send;

    /// Launch `command` already suspended
    fn launch(&self, command: &CommandLine) -> ProcessResult<Self::Handle>;
}
