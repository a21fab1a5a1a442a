/*!
 * Command Line Parsing
 * Whitespace tokenization of submitted jobs
 */

use super::types::{ProcessError, ProcessResult};
use crate::core::limits::{MAX_COMMAND_TOKENS, MAX_JOB_NAME_LEN};

/// A parsed job command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    raw: String,
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Split `line` on whitespace; the first token is the executable
    ///
    /// Tokens past `MAX_COMMAND_TOKENS` are ignored.
    pub fn parse(line: &str) -> ProcessResult<Self> {
        let mut tokens = line
            .split_whitespace()
            .take(MAX_COMMAND_TOKENS)
            .map(str::to_string);

        let program = tokens
            .next()
            .ok_or_else(|| ProcessError::InvalidCommand("Empty command".to_string()))?;

        Ok(Self {
            raw: line.trim().to_string(),
            program,
            args: tokens.collect(),
        })
    }

    /// The command line as submitted, trimmed
    #[inline]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Display label for the job (the executable token, length-capped)
    pub fn name(&self) -> String {
        self.program.chars().take(MAX_JOB_NAME_LEN).collect()
    }
}
