//! External management CLI invocation
//!
//! The CLI owns authentication and transport. We only build the
//! `rest --method put` command line, run it to completion and hand back what
//! it printed. A non-zero exit is an outcome, not an error.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::error::UpdateError;

/// Captured result of a finished management CLI process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code; 1 when the process was terminated by a signal
    pub exit_code: i32,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Handle on the management CLI (`az` by default)
#[derive(Debug, Clone)]
pub struct ManagementCli {
    program: String,
}

impl ManagementCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Find the executable on PATH (or check an explicit path)
    pub fn locate(&self) -> Result<PathBuf, UpdateError> {
        which::which(&self.program).map_err(|e| {
            log::debug!("Lookup of '{}' failed: {e}", self.program);
            UpdateError::ToolNotFound {
                tool: self.program.clone(),
            }
        })
    }

    /// Arguments for `PUT <uri>` with the body read from `payload_path`
    pub fn put_args(&self, uri: &str, payload_path: &Path) -> Vec<OsString> {
        let mut body = OsString::from("@");
        body.push(payload_path.as_os_str());

        vec![
            "rest".into(),
            "--method".into(),
            "put".into(),
            "--uri".into(),
            uri.into(),
            "--body".into(),
            body,
        ]
    }

    /// Human-readable command line for progress output
    pub fn command_line(&self, uri: &str, payload_path: &Path) -> String {
        std::iter::once(self.program.clone())
            .chain(
                self.put_args(uri, payload_path)
                    .into_iter()
                    .map(|arg| arg.to_string_lossy().into_owned()),
            )
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run `PUT <uri>` and wait for the CLI to exit.
    ///
    /// No timeout is applied.
    pub async fn put(&self, uri: &str, payload_path: &Path) -> Result<CommandOutcome, UpdateError> {
        let program = self.locate()?;
        log::debug!("Resolved '{}' to {}", self.program, program.display());

        let output = Command::new(&program)
            .args(self.put_args(uri, payload_path))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    UpdateError::ToolNotFound {
                        tool: self.program.clone(),
                    }
                } else {
                    UpdateError::Spawn {
                        tool: self.program.clone(),
                        source,
                    }
                }
            })?;

        let outcome = CommandOutcome {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(1),
        };
        log::info!("'{}' exited with code {}", self.program, outcome.exit_code);

        Ok(outcome)
    }
}
