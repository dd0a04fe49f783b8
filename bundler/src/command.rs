//! External command execution.
//!
//! The bundler shells out to `git` for cloning and to pip for fetching the
//! vendored parser source. Both go through [`CommandExecutor`] so tests can
//! substitute canned responses.

use crate::error::{BundlerError, Result};
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jaclang_bundler::command::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("git", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), jaclang_bundler::error::BundlerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system, capturing stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        log::trace!("running {cmd} {}", args.join(" "));
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(BundlerError::from)
    }
}

/// Returns the trimmed stderr of a finished command as UTF-8 text.
#[must_use]
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_owned()
}
