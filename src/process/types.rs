/*!
 * Process Types
 * Common types for process control
 */

use serde::{Deserialize, Serialize};

pub use crate::core::errors::{ProcessError, ProcessResult};

/// Result of a non-blocking exit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "code")]
pub enum ExitState {
    /// Process has not terminated yet
    StillRunning,
    /// Process exited with status 0
    ExitedNormally,
    /// Non-zero exit, death by signal, or an unreapable child
    ExitedWithError(Option<i32>),
}

impl ExitState {
    /// Check if the process has terminated
    ///
    /// # Performance
    /// Hot path - checked once per dispatched job per round
    #[inline(always)]
    #[must_use]
    pub const fn has_exited(&self) -> bool {
        !matches!(self, Self::StillRunning)
    }

    /// Check if the process exited successfully
    #[inline(always)]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::ExitedNormally)
    }
}

#[cfg(unix)]
impl ExitState {
    /// Interpret a `waitpid` result; anything but an exit or a fatal signal
    /// means the process is still alive
    pub fn from_wait_status(status: nix::sys::wait::WaitStatus) -> Self {
        use nix::sys::wait::WaitStatus;

        match status {
            WaitStatus::Exited(_, 0) => Self::ExitedNormally,
            WaitStatus::Exited(_, code) => Self::ExitedWithError(Some(code)),
            // Signal deaths are reported as 128 + signo, like a shell
            WaitStatus::Signaled(_, signal, _) => Self::ExitedWithError(Some(128 + signal as i32)),
            _ => Self::StillRunning,
        }
    }
}
