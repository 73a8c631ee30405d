//! Host side effects
//!
//! Every change pibackbone makes to the machine goes through the `Host`
//! trait: privileged file copy, privileged append, shell execution and the
//! final reboot. `SystemHost` is the real implementation; tests substitute
//! a recording host.
//!
//! # Elevation
//!
//! Privileged steps run in-process when the effective UID is already 0 and
//! through `sudo` otherwise. Shell directives always run with the privilege
//! the process already has.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// How privileged steps gain root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// Already root, write files directly
    Direct,
    /// Wrap privileged steps in `sudo`
    Sudo,
}

impl Elevation {
    /// Pick `Direct` when running as root (EUID 0), `Sudo` otherwise
    pub fn detect() -> Self {
        if nix::unistd::geteuid().is_root() {
            Self::Direct
        } else {
            Self::Sudo
        }
    }
}

/// Result of a shell directive or helper command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard error, when it was captured
    pub stderr: String,
    /// Exit code (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Whether the command exited with code 0
    pub success: bool,
}

impl CommandOutput {
    fn from_status(status: ExitStatus, stderr: String) -> Self {
        Self {
            stderr,
            exit_code: status.code(),
            success: status.success(),
        }
    }

    /// Check if the command succeeded and return an error if not.
    pub fn ensure_success(&self, context: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            let code = self.exit_code.unwrap_or(-1);
            anyhow::bail!(
                "{} failed (exit code {}): {}",
                context,
                code,
                self.stderr.trim()
            )
        }
    }
}

/// Side effects the installer performs on the machine
pub trait Host {
    /// Copy `source` to `dest` with elevated privilege
    fn copy_privileged(&mut self, source: &Path, dest: &Path) -> Result<()>;

    /// Append `line` plus a newline to `file` with elevated privilege
    fn append_privileged(&mut self, line: &str, file: &Path) -> Result<()>;

    /// Run `command` through `sh -c` with inherited environment and stdio
    fn run_shell(&mut self, command: &str) -> Result<CommandOutput>;

    /// Reboot the machine with elevated privilege
    fn reboot(&mut self) -> Result<()>;
}

/// The real machine
#[derive(Debug, Clone)]
pub struct SystemHost {
    elevation: Elevation,
}

impl SystemHost {
    pub fn new(elevation: Elevation) -> Self {
        Self { elevation }
    }

    /// Host using the elevation matching the current process
    pub fn detect() -> Self {
        Self::new(Elevation::detect())
    }

    pub fn elevation(&self) -> Elevation {
        self.elevation
    }

    fn sudo(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!("sudo {:?}", args);
        let output = Command::new("sudo")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .context("Failed to spawn sudo")?;
        Ok(CommandOutput::from_status(
            output.status,
            String::from_utf8_lossy(&output.stderr).to_string(),
        ))
    }
}

/// Spawn `command`, write `line` plus a newline to its stdin and wait for it.
///
/// The child is always waited on, even when the write fails.
fn pipe_line(mut command: Command, line: &str, context: &str) -> Result<()> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {}", context))?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = writeln!(stdin, "{}", line) {
            drop(stdin);
            if let Err(wait_err) = child.wait() {
                debug!("Failed to reap {}: {}", context, wait_err);
            }
            return Err(e).with_context(|| format!("Failed to write to {}", context));
        }
    }

    let output = child
        .wait_with_output()
        .with_context(|| format!("Failed waiting for {}", context))?;
    CommandOutput::from_status(
        output.status,
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
    .ensure_success(context)
}

impl Host for SystemHost {
    fn copy_privileged(&mut self, source: &Path, dest: &Path) -> Result<()> {
        match self.elevation {
            Elevation::Direct => {
                fs::copy(source, dest)
                    .with_context(|| format!("Failed to copy {:?} to {:?}", source, dest))?;
                Ok(())
            }
            Elevation::Sudo => {
                let source = source.to_string_lossy();
                let dest = dest.to_string_lossy();
                self.sudo(&["cp", &*source, &*dest])?
                    .ensure_success(&format!("sudo cp {} {}", source, dest))
            }
        }
    }

    fn append_privileged(&mut self, line: &str, file: &Path) -> Result<()> {
        match self.elevation {
            Elevation::Direct => {
                let mut handle = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(file)
                    .with_context(|| format!("Failed to open {:?} for append", file))?;
                writeln!(handle, "{}", line)
                    .with_context(|| format!("Failed to append to {:?}", file))?;
                Ok(())
            }
            Elevation::Sudo => {
                let target = file.to_string_lossy();
                let mut command = Command::new("sudo");
                command.args(["tee", "-a", &*target]);
                pipe_line(command, line, &format!("sudo tee -a {}", target))
            }
        }
    }

    fn run_shell(&mut self, command: &str) -> Result<CommandOutput> {
        info!("Running: {}", command);
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .with_context(|| format!("Failed to spawn shell for: {}", command))?;
        Ok(CommandOutput::from_status(status, String::new()))
    }

    fn reboot(&mut self) -> Result<()> {
        let output = match self.elevation {
            Elevation::Direct => {
                let status = Command::new("reboot")
                    .status()
                    .context("Failed to spawn reboot")?;
                CommandOutput::from_status(status, String::new())
            }
            Elevation::Sudo => self.sudo(&["reboot"])?,
        };
        output.ensure_success("reboot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_success_reports_code_and_stderr() {
        let output = CommandOutput {
            stderr: "permission denied\n".to_string(),
            exit_code: Some(1),
            success: false,
        };
        let err = output.ensure_success("sudo cp a b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "sudo cp a b failed (exit code 1): permission denied"
        );
    }

    #[test]
    fn test_run_shell_records_exit_code() {
        let mut host = SystemHost::new(Elevation::Direct);
        let ok = host.run_shell("true").unwrap();
        assert!(ok.success);
        assert_eq!(ok.exit_code, Some(0));

        let failed = host.run_shell("exit 3").unwrap();
        assert!(!failed.success);
        assert_eq!(failed.exit_code, Some(3));
    }

    #[test]
    fn test_direct_append_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.txt");
        let mut host = SystemHost::new(Elevation::Direct);

        host.append_privileged("start_x=1", &file).unwrap();
        host.append_privileged("dtparam=i2c=1", &file).unwrap();

        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content, "start_x=1\ndtparam=i2c=1\n");
    }

    #[test]
    fn test_pipe_line_appends_through_child() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.txt");
        let mut command = Command::new("sh");
        command.arg("-c").arg(format!("cat >> '{}'", file.display()));

        pipe_line(command, "start_x=1", "cat").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "start_x=1\n");
    }

    #[test]
    fn test_pipe_line_child_that_never_reads_fails() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("exec 0<&-; echo denied >&2; exit 4");

        let err = pipe_line(command, "start_x=1", "tee").unwrap_err();
        let text = format!("{:#}", err);
        assert!(text.contains("tee"), "unexpected error: {}", text);
    }

    #[test]
    fn test_direct_copy_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = SystemHost::new(Elevation::Direct);
        let result = host.copy_privileged(&dir.path().join("missing"), &dir.path().join("dest"));
        assert!(result.is_err());
    }
}
