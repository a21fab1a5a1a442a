/*!
 * Interactive Shell
 * Line-oriented driver over a scheduler session
 *
 * The shell only submits jobs and starts passes; it has no say in how the
 * scheduler runs them.
 */

mod command;

pub use command::ShellCommand;

use crate::core::time::{Clock, SystemClock};
use crate::process::Launcher;
use crate::scheduler::{ReportWriter, Session};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Prompt printed before every command
pub const PROMPT: &str = "SimpleShell$ ";

/// Whether the loop keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Command loop bound to one session
pub struct Shell<L: Launcher, C: Clock = SystemClock> {
    session: Session<L, C>,
}

impl<L: Launcher, C: Clock> Shell<L, C> {
    pub fn new(session: Session<L, C>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session<L, C> {
        &self.session
    }

    /// Read commands from `input` until `exit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        let config = *self.session.config();
        writeln!(
            out,
            "SimpleShell started with {} CPU(s) and {} ms time slice.",
            config.ncpu,
            config.quantum_ms()
        )
        .context("failed to write banner")?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT).context("failed to write prompt")?;
            out.flush().context("failed to flush prompt")?;

            let line = match lines.next() {
                Some(line) => line.context("failed to read command")?,
                None => {
                    debug!("End of input");
                    break;
                }
            };

            if self.execute(&line, &mut out)? == Flow::Exit {
                break;
            }
        }

        self.session.shutdown();
        Ok(())
    }

    /// Execute a single command line
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        match ShellCommand::parse(line) {
            ShellCommand::Submit(command) => match self.session.submit(command) {
                Ok(ticket) => writeln!(
                    out,
                    "Submitted job: {} (PID: {})",
                    ticket.command, ticket.pid
                ),
                Err(e) => writeln!(out, "Failed to submit job: {}", e),
            }
            .context("failed to write submit result")?,

            ShellCommand::Start => {
                let format = self.session.config().report_format;
                let result = {
                    let mut sink = ReportWriter::new(&mut *out, format);
                    self.session.start(&mut sink)
                };

                match result {
                    Ok(summary) => info!(
                        total = summary.total,
                        rounds = summary.rounds,
                        elapsed_ms = summary.elapsed_ms,
                        "Pass finished"
                    ),
                    Err(e) => writeln!(out, "Scheduling pass failed: {}", e)
                        .context("failed to write pass error")?,
                }
            }

            ShellCommand::Exit => {
                writeln!(out, "Exiting SimpleShell.").context("failed to write exit")?;
                return Ok(Flow::Exit);
            }

            ShellCommand::Empty => {}

            ShellCommand::Unknown(text) => {
                writeln!(out, "Unknown command: {}", text).context("failed to write reply")?
            }
        }

        Ok(Flow::Continue)
    }
}
