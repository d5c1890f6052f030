//! Child-process seam.
//!
//! Every external collaborator (benchmark driver, source control, build) is
//! invoked through [`ToolRunner`] with a structured argument vector — never
//! a shell string. Tests substitute a scripted implementation.

use crate::error::MatrixError;
use std::process::Command;
use tracing::debug;

/// Synchronous external-tool invocation. All methods block until the child
/// exits; there are no timeouts.
pub trait ToolRunner {
    /// Spawn and wait; report whether the child exited successfully. Failing
    /// to start the child is an error, a non-zero exit is not.
    fn run_status(&self, argv: &[&str]) -> Result<bool, MatrixError>;

    /// Spawn and wait; a non-zero exit is an `ExternalTool` error.
    fn run_checked(&self, argv: &[&str]) -> Result<(), MatrixError>;

    /// Spawn, wait, and return trimmed stdout; a non-zero exit is an
    /// `ExternalTool` error.
    fn run_capture(&self, argv: &[&str]) -> Result<String, MatrixError>;
}

/// The real thing, over `std::process::Command`.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

fn command_line(argv: &[&str]) -> String {
    argv.join(" ")
}

fn split<'a>(argv: &'a [&'a str]) -> Result<(&'a str, &'a [&'a str]), MatrixError> {
    argv.split_first()
        .map(|(p, rest)| (*p, rest))
        .ok_or_else(|| MatrixError::Spawn {
            command: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argv"),
        })
}

impl ToolRunner for ProcessRunner {
    fn run_status(&self, argv: &[&str]) -> Result<bool, MatrixError> {
        debug!(command = %command_line(argv), "spawning");
        let (program, rest) = split(argv)?;
        let status = Command::new(program)
            .args(rest)
            .status()
            .map_err(|e| MatrixError::Spawn {
                command: command_line(argv),
                source: e,
            })?;
        Ok(status.success())
    }

    fn run_checked(&self, argv: &[&str]) -> Result<(), MatrixError> {
        if self.run_status(argv)? {
            Ok(())
        } else {
            Err(MatrixError::ExternalTool {
                command: command_line(argv),
                status: "non-zero exit".to_string(),
            })
        }
    }

    fn run_capture(&self, argv: &[&str]) -> Result<String, MatrixError> {
        debug!(command = %command_line(argv), "spawning (capture)");
        let (program, rest) = split(argv)?;
        let output = Command::new(program)
            .args(rest)
            .output()
            .map_err(|e| MatrixError::Spawn {
                command: command_line(argv),
                source: e,
            })?;
        if !output.status.success() {
            return Err(MatrixError::ExternalTool {
                command: command_line(argv),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_status_tolerates_nonzero_exit() {
        let runner = ProcessRunner::new();
        assert!(runner.run_status(&["true"]).unwrap());
        assert!(!runner.run_status(&["false"]).unwrap());
    }

    #[test]
    fn run_checked_escalates_nonzero_exit() {
        let runner = ProcessRunner::new();
        assert!(runner.run_checked(&["true"]).is_ok());
        assert!(matches!(
            runner.run_checked(&["false"]),
            Err(MatrixError::ExternalTool { .. })
        ));
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let runner = ProcessRunner::new();
        match runner.run_status(&["/nonexistent/bench-driver"]) {
            Err(MatrixError::Spawn { command, .. }) => {
                assert!(command.contains("bench-driver"));
            }
            other => panic!("expected Spawn error, got {other:?}"),
        }
    }

    #[test]
    fn run_capture_trims_stdout() {
        let runner = ProcessRunner::new();
        assert_eq!(runner.run_capture(&["echo", "main"]).unwrap(), "main");
    }
}
