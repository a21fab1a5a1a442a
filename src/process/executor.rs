/*!
 * Process Executor
 * Handles OS-level process spawning and job control
 *
 * A job is forked, stops itself with SIGSTOP, and only execs its program once
 * the scheduler first sends SIGCONT. Afterwards it is driven with
 * SIGCONT/SIGSTOP, the same signals a shell uses for job control.
 */

use super::command::CommandLine;
use super::traits::{Launcher, ProcessControl};
use super::types::{ExitState, ProcessError, ProcessResult};
use crate::core::types::Pid;
use nix::libc;
use nix::sys::signal::{kill, raise, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid as NixPid};
use std::ffi::CString;
use std::fs::File;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Exit status of a child whose exec failed after the stop
const EXEC_FAILED_STATUS: i32 = 127;

/// An external process launched for a job
#[derive(Debug)]
pub struct OsProcess {
    pid: Pid,
    name: String,
    exit: Option<ExitState>,
}

impl OsProcess {
    /// Fork `command` stopped, before it has executed a single instruction
    /// of the target program
    pub fn spawn(command: &CommandLine) -> ProcessResult<Self> {
        let launch_failed = |reason: String| ProcessError::LaunchFailed {
            command: command.program().to_string(),
            reason,
        };

        let path = resolve_program(command.program())
            .ok_or_else(|| launch_failed("executable not found".to_string()))?;

        // Everything the child touches is allocated before the fork
        let path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| launch_failed(e.to_string()))?;
        let argv = std::iter::once(command.program())
            .chain(command.args().iter().map(String::as_str))
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| launch_failed(e.to_string()))?;
        let mut argv_ptrs: Vec<*const libc::c_char> = argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(std::ptr::null());

        // The shell owns stdin; output stays visible
        let dev_null = File::open("/dev/null").map_err(|e| launch_failed(e.to_string()))?;

        // SAFETY: the child only calls async-signal-safe functions (dup2,
        // raise, execv, _exit) on memory prepared before the fork.
        match unsafe { fork() }.map_err(|e| launch_failed(e.to_string()))? {
            ForkResult::Child => unsafe {
                libc::dup2(dev_null.as_raw_fd(), libc::STDIN_FILENO);
                let _ = raise(Signal::SIGSTOP);
                libc::execv(path.as_ptr(), argv_ptrs.as_ptr());
                libc::_exit(EXEC_FAILED_STATUS)
            },
            ForkResult::Parent { child } => {
                let mut process = Self {
                    pid: child.as_raw() as Pid,
                    name: command.name(),
                    exit: None,
                };

                match waitpid(child, Some(WaitPidFlag::WUNTRACED)) {
                    Ok(WaitStatus::Stopped(_, _)) => {
                        info!(pid = process.pid, name = %process.name, "Spawned suspended OS process");
                        Ok(process)
                    }
                    Ok(status) => {
                        // Already reaped; nothing left to kill on drop
                        process.exit = Some(ExitState::from_wait_status(status));
                        Err(launch_failed(format!("child did not stop: {:?}", status)))
                    }
                    // Dropping kills and reaps the child
                    Err(e) => Err(launch_failed(e.to_string())),
                }
            }
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn nix_pid(&self) -> NixPid {
        NixPid::from_raw(self.pid as i32)
    }

    fn signal(&self, signal: Signal) -> ProcessResult<()> {
        kill(self.nix_pid(), signal).map_err(|e| ProcessError::SignalFailed {
            pid: self.pid,
            signal: signal.as_str().to_string(),
            reason: e.to_string(),
        })
    }
}

impl ProcessControl for OsProcess {
    #[inline]
    fn id(&self) -> Pid {
        self.pid
    }

    fn resume(&mut self) -> ProcessResult<()> {
        self.signal(Signal::SIGCONT)?;
        debug!(pid = self.pid, "Resumed");
        Ok(())
    }

    fn suspend(&mut self) -> ProcessResult<()> {
        self.signal(Signal::SIGSTOP)?;
        debug!(pid = self.pid, "Suspended");
        Ok(())
    }

    fn poll_exit(&mut self) -> ProcessResult<ExitState> {
        if let Some(exit) = self.exit {
            return Ok(exit);
        }

        let status = waitpid(self.nix_pid(), Some(WaitPidFlag::WNOHANG)).map_err(|e| {
            ProcessError::PollFailed {
                pid: self.pid,
                reason: e.to_string(),
            }
        })?;

        let exit = ExitState::from_wait_status(status);
        if exit.has_exited() {
            info!(pid = self.pid, ?status, "Process exited");
            self.exit = Some(exit);
        }
        Ok(exit)
    }
}

impl Drop for OsProcess {
    fn drop(&mut self) {
        if self.exit.is_some() {
            return;
        }

        // Never leave a stopped child behind; SIGKILL also ends stopped processes
        match kill(self.nix_pid(), Signal::SIGKILL) {
            Ok(()) => {
                let _ = waitpid(self.nix_pid(), None);
                debug!(pid = self.pid, "Killed unfinished job on drop");
            }
            Err(e) => warn!(pid = self.pid, error = %e, "Failed to kill unfinished job"),
        }
    }
}

/// Locate `program` the way `execvp` would
fn resolve_program(program: &str) -> Option<PathBuf> {
    if program.contains('/') {
        let path = PathBuf::from(program);
        return is_executable(&path).then_some(path);
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Launches jobs as real OS processes
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLauncher;

impl Launcher for OsLauncher {
    type Handle = OsProcess;

    fn launch(&self, command: &CommandLine) -> ProcessResult<OsProcess> {
        OsProcess::spawn(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::{Duration, Instant};

    fn spawn(line: &str) -> OsProcess {
        OsProcess::spawn(&CommandLine::parse(line).unwrap()).unwrap()
    }

    fn wait_for_exit(process: &mut OsProcess) -> ExitState {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            let state = process.poll_exit().unwrap();
            if state.has_exited() {
                return state;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("process {} did not exit", process.id());
    }

    #[test]
    #[serial]
    fn test_spawn_is_suspended() {
        let mut process = spawn("sleep 0.05");
        assert!(process.id() > 0);
        assert_eq!(process.name(), "sleep");

        // Stopped processes cannot finish, however long we wait
        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(process.poll_exit().unwrap(), ExitState::StillRunning);
    }

    #[test]
    #[serial]
    fn test_no_side_effects_before_first_resume() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let mut process = spawn(&format!("touch {}", marker.display()));

        std::thread::sleep(Duration::from_millis(100));
        assert!(!marker.exists());

        process.resume().unwrap();
        assert_eq!(wait_for_exit(&mut process), ExitState::ExitedNormally);
        assert!(marker.exists());
    }

    #[test]
    #[serial]
    fn test_resume_runs_to_completion() {
        let mut process = spawn("sleep 0.05");
        process.resume().unwrap();
        assert_eq!(wait_for_exit(&mut process), ExitState::ExitedNormally);

        // Exit state is cached once reaped
        assert_eq!(process.poll_exit().unwrap(), ExitState::ExitedNormally);
    }

    #[test]
    #[serial]
    fn test_non_zero_exit() {
        let mut process = spawn("false");
        process.resume().unwrap();
        assert_eq!(
            wait_for_exit(&mut process),
            ExitState::ExitedWithError(Some(1))
        );
    }

    #[test]
    #[serial]
    fn test_suspend_and_resume_again() {
        let mut process = spawn("sleep 0.1");
        process.resume().unwrap();
        process.suspend().unwrap();
        assert_eq!(process.poll_exit().unwrap(), ExitState::StillRunning);
        process.resume().unwrap();
        assert_eq!(wait_for_exit(&mut process), ExitState::ExitedNormally);
    }

    #[test]
    fn test_missing_executable() {
        let result = OsProcess::spawn(&CommandLine::parse("definitely-not-a-real-binary-xyz").unwrap());
        assert!(matches!(
            result.unwrap_err(),
            ProcessError::LaunchFailed { .. }
        ));
    }

    #[test]
    fn test_non_executable_paths_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("data.txt");
        std::fs::write(&plain, "not a program").unwrap();

        for line in [dir.path().display().to_string(), plain.display().to_string()] {
            assert!(matches!(
                OsProcess::spawn(&CommandLine::parse(&line).unwrap()),
                Err(ProcessError::LaunchFailed { .. })
            ));
        }
    }

    #[test]
    fn test_resolve_program_on_path() {
        let resolved = resolve_program("sh").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolve_program("definitely-not-a-real-binary-xyz").is_none());
    }

    #[test]
    #[serial]
    fn test_drop_kills_unfinished_job() {
        let process = spawn("sleep 10");
        let pid = NixPid::from_raw(process.id() as i32);
        drop(process);

        // Reaped: the pid no longer exists
        assert!(kill(pid, None).is_err());
    }

    #[test]
    #[serial]
    fn test_launcher() {
        let launcher = OsLauncher;
        let mut process = launcher
            .launch(&CommandLine::parse("sleep 0.01").unwrap())
            .unwrap();
        process.resume().unwrap();
        assert!(wait_for_exit(&mut process).is_success());
    }
}
