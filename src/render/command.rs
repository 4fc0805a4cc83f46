use crate::foundation::error::{TapeError, TapeResult};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// An external program invoked by path or by name from `PATH`.
#[derive(Clone, Debug)]
pub(crate) struct Tool {
    program: PathBuf,
}

impl Tool {
    pub(crate) fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub(crate) fn program(&self) -> &Path {
        &self.program
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }

    /// Fail with [`TapeError::CommandNotFound`] unless `<program> -version` runs cleanly.
    pub(crate) fn ensure_available(&self) -> TapeResult<()> {
        let ok = Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(TapeError::CommandNotFound(format!(
                "{}: command not found",
                self.name()
            )))
        }
    }

    /// Run with `args`, returning captured stdout.
    pub(crate) fn run<I, S>(&self, args: I) -> TapeResult<Vec<u8>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).stdin(Stdio::null());
        let line = command_line(&cmd);
        tracing::debug!(command = %line, "run_command");

        let out = cmd.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                TapeError::CommandNotFound(format!("{}: command not found", self.name()))
            } else {
                TapeError::Other(anyhow::Error::new(e).context(format!("failed to spawn {line}")))
            }
        })?;

        let stderr = String::from_utf8_lossy(&out.stderr);
        if !stderr.trim().is_empty() {
            tracing::debug!(stderr = %stderr.trim(), "command stderr");
        }
        if !out.status.success() {
            return Err(TapeError::command_failed(
                line,
                format!("exited with {}: {}", out.status, stderr.trim()),
            ));
        }
        Ok(out.stdout)
    }
}

/// Render a command as a single shell-like line for logs and errors.
pub(crate) fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|a| {
            let s = a.to_string_lossy();
            if s.contains(char::is_whitespace) {
                format!("\"{s}\"")
            } else {
                s.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/render/command.rs"]
mod tests;
