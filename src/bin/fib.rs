/*!
 * Fibonacci Workload
 * CPU-bound sample job for exercising the scheduler
 *
 * Usage: fib [N]   (default 40)
 *
 * The workload waits for SIGCONT before computing anything, so run on its
 * own it blocks until `kill -CONT <pid>`.
 */

use std::process::ExitCode;

const DEFAULT_N: u32 = 40;

fn fib(n: u32) -> u64 {
    if n <= 1 {
        u64::from(n)
    } else {
        fib(n - 1) + fib(n - 2)
    }
}

fn main() -> ExitCode {
    #[cfg(unix)]
    if let Err(e) = rr_scheduler::process::workload::wait_for_first_slice() {
        eprintln!("fib: failed to install signal handlers: {}", e);
        return ExitCode::FAILURE;
    }

    let n = match std::env::args().nth(1) {
        None => DEFAULT_N,
        Some(arg) => match arg.trim().parse::<u32>() {
            // fib(93) is the last value that fits in a u64
            Ok(n) if n <= 93 => n,
            _ => {
                eprintln!("Usage: fib [N]  (0 <= N <= 93)");
                return ExitCode::FAILURE;
            }
        },
    };

    println!("Fibonacci({}) = {}", n, fib(n));
    ExitCode::SUCCESS
}
