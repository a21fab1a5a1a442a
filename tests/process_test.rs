/*!
 * Process Tests
 * Scheduling passes over real OS processes
 */

#![cfg(unix)]

use pretty_assertions::assert_eq;
use rr_scheduler::{
    CompletionReport, ExitState, OsLauncher, SchedulerConfig, SchedulerError, Session,
};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid as NixPid;
use serial_test::serial;
use std::num::NonZeroUsize;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

fn session(ncpu: usize, quantum_ms: u64, capacity: usize) -> Session<OsLauncher> {
    let config = SchedulerConfig::new(
        NonZeroUsize::new(ncpu).unwrap(),
        Duration::from_millis(quantum_ms),
    )
    .with_queue_capacity(NonZeroUsize::new(capacity).unwrap());
    Session::new(config, OsLauncher)
}

#[test]
#[serial]
fn test_pass_over_real_processes() {
    let mut session = session(2, 20, 8);
    let fib = format!("{} 20", env!("CARGO_BIN_EXE_fib"));

    let fib_pid = session.submit(&fib).unwrap().pid;
    let sleep_pid = session.submit("sleep 0.1").unwrap().pid;
    let false_pid = session.submit("false").unwrap().pid;

    let mut sink: Vec<CompletionReport> = Vec::new();
    let summary = session.start(&mut sink).unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed, 3);
    assert_eq!(sink.len(), 3);

    let exit_of = |pid| sink.iter().find(|r| r.pid == pid).unwrap().exit;
    assert_eq!(exit_of(fib_pid), ExitState::ExitedNormally);
    assert_eq!(exit_of(sleep_pid), ExitState::ExitedNormally);
    assert_eq!(exit_of(false_pid), ExitState::ExitedWithError(Some(1)));

    for report in &sink {
        assert_eq!(report.completion_time, report.run_time + report.wait_time);
        assert!(report.run_time > 0);
    }
}

#[test]
#[serial]
fn test_missing_program_is_not_queued() {
    let session = session(1, 10, 2);
    let err = session.submit("/nonexistent/program --flag").unwrap_err();
    assert!(matches!(err, SchedulerError::Process(_)));
    assert_eq!(session.queued(), 0);
}

#[test]
#[serial]
fn test_full_queue_launches_nothing() {
    let mut session = session(1, 10, 1);
    session.submit("sleep 5").unwrap();
    assert_eq!(
        session.submit("sleep 5"),
        Err(SchedulerError::QueueFull { capacity: 1 })
    );

    // The queued sleeper is killed rather than left stopped
    assert_eq!(session.shutdown(), 1);
}

#[test]
#[serial]
fn test_submitted_jobs_do_nothing_until_started() {
    let dir = tempfile::tempdir().unwrap();
    let markers: Vec<_> = (0..20).map(|i| dir.path().join(format!("marker_{}", i))).collect();

    let mut session = session(4, 10, markers.len());
    for marker in &markers {
        session.submit(&format!("touch {}", marker.display())).unwrap();
    }

    std::thread::sleep(Duration::from_millis(50));
    let early = markers.iter().filter(|m| m.exists()).count();
    assert_eq!(early, 0, "jobs ran before start");

    let mut sink: Vec<CompletionReport> = Vec::new();
    session.start(&mut sink).unwrap();
    assert!(markers.iter().all(|m| m.exists()));
    assert!(sink.iter().all(|r| r.exit == ExitState::ExitedNormally));
}

#[test]
#[serial]
fn test_fib_waits_for_continue() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_fib"))
        .arg("1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_millis(200));
    assert!(child.try_wait().unwrap().is_none(), "fib ran without SIGCONT");

    let pid = NixPid::from_raw(child.id() as i32);
    let deadline = Instant::now() + Duration::from_secs(5);
    while child.try_wait().unwrap().is_none() {
        assert!(Instant::now() < deadline, "fib never finished");
        kill(pid, Signal::SIGCONT).unwrap();
        std::thread::sleep(Duration::from_millis(10));
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "Fibonacci(1) = 1\n");
}
