/*!
 * Process Module
 * Process handles, command parsing, and launchers
 */

pub mod command;
#[cfg(unix)]
pub mod executor;
pub mod simulated;
pub mod traits;
pub mod types;
#[cfg(unix)]
pub mod workload;

// Re-export for convenience
pub use command::CommandLine;
#[cfg(unix)]
pub use executor::{OsLauncher, OsProcess};
pub use simulated::{SimulatedLauncher, SimulatedProcess};
pub use traits::{Launcher, ProcessControl};
pub use types::{ExitState, ProcessError, ProcessResult};
