/*!
 * Workload Gate
 * Start-up hook for sample workloads run under the scheduler
 *
 * A gated workload parks in `pause()` until it receives SIGCONT, so it does
 * no work until the scheduler grants it a slice. SIGINT is caught and
 * ignored so an interrupt at the shell does not take workloads down with it.
 */

use nix::libc;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::unistd::pause;
use std::sync::atomic::{AtomicBool, Ordering};

static CONTINUED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_continue(_: libc::c_int) {
    CONTINUED.store(true, Ordering::SeqCst);
}

extern "C" fn on_interrupt(_: libc::c_int) {}

/// Block until the first SIGCONT arrives
pub fn wait_for_first_slice() -> nix::Result<()> {
    let continue_action = SigAction::new(
        SigHandler::Handler(on_continue),
        SaFlags::empty(),
        SigSet::empty(),
    );
    let interrupt_action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );

    // SAFETY: both handlers are async-signal-safe; one stores an atomic, the
    // other does nothing.
    unsafe {
        sigaction(Signal::SIGCONT, &continue_action)?;
        sigaction(Signal::SIGINT, &interrupt_action)?;
    }

    // A SIGCONT racing the check is caught on the scheduler's next resume
    while !CONTINUED.load(Ordering::SeqCst) {
        pause();
    }
    Ok(())
}
