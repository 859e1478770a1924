use std::process::Command;

use anyhow::{Context, Result};

/// Captured result of one shell command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub success: bool,
}

impl ProcessOutput {
    /// The last non-empty stderr line, else the last stdout line.
    pub fn failure_summary(&self) -> String {
        let last = |s: &str| {
            s.lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string())
        };
        last(&self.stderr)
            .or_else(|| last(&self.stdout))
            .unwrap_or_else(|| match self.exit_code {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            })
    }
}

/// Run `command` through the platform shell and capture its output.
///
/// A non-zero exit is reported in [`ProcessOutput::success`], not as an
/// error; only a failure to spawn the shell is an `Err`.
pub fn run_shell_command(command: &str) -> Result<ProcessOutput> {
    #[cfg(target_os = "windows")]
    let output = Command::new("cmd")
        .arg("/C")
        .arg(command)
        .output()
        .with_context(|| format!("failed executing command: {command}"))?;

    #[cfg(not(target_os = "windows"))]
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .with_context(|| format!("failed executing command: {command}"))?;

    Ok(ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
        success: output.status.success(),
    })
}

/// Quote `arg` for `sh -c` unless it is made of shell-safe characters only.
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_summary_prefers_stderr() {
        let out = ProcessOutput {
            stdout: "step 1\nstep 2\n".to_string(),
            stderr: "warning\nAccessDenied\n\n".to_string(),
            exit_code: Some(255),
            success: false,
        };
        assert_eq!(out.failure_summary(), "AccessDenied");
    }

    #[test]
    fn failure_summary_falls_back_to_exit_code() {
        let out = ProcessOutput {
            exit_code: Some(2),
            ..ProcessOutput::default()
        };
        assert_eq!(out.failure_summary(), "exited with status 2");
    }

    #[test]
    fn shell_quote_leaves_safe_args() {
        assert_eq!(shell_quote("s3://bucket-1"), "s3://bucket-1");
        assert_eq!(shell_quote("frontend/build/"), "frontend/build/");
    }

    #[test]
    fn shell_quote_wraps_unsafe_args() {
        assert_eq!(shell_quote("max-age=0, no-cache"), "'max-age=0, no-cache'");
        assert_eq!(shell_quote("*.html"), "'*.html'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn run_shell_command_captures_output() {
        let out = run_shell_command("echo hello; exit 3").unwrap();
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success);
    }
}
