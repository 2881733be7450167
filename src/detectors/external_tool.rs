//! Subprocess runner for external linters
//!
//! External tools follow a common pattern:
//! 1. Run the tool as a subprocess with `std::process::Command`
//! 2. Wait for it, killing it once the timeout passes
//! 3. Hand stdout/stderr back for the caller to parse

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Result from running an external tool
#[derive(Debug, Clone)]
pub struct ExternalToolResult {
    /// Whether the tool ran to completion (it may still have reported problems)
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub return_code: Option<i32>,
    pub timed_out: bool,
    /// Error message if the tool could not be run
    pub error: Option<String>,
}

impl ExternalToolResult {
    pub fn success(stdout: String, stderr: String, return_code: i32) -> Self {
        Self {
            success: true,
            stdout,
            stderr,
            return_code: Some(return_code),
            timed_out: false,
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            timed_out: false,
            error: Some(error),
        }
    }

    pub fn timeout(tool_name: &str, timeout_secs: u64) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            return_code: None,
            timed_out: true,
            error: Some(format!("{} timed out after {}s", tool_name, timeout_secs)),
        }
    }
}

/// Run an external tool
///
/// # Arguments
/// * `cmd` - Command and arguments to run
/// * `tool_name` - Human-readable tool name for error messages
/// * `timeout_secs` - Timeout in seconds (0 = no timeout)
/// * `cwd` - Working directory for the tool
pub fn run_external_tool(
    cmd: &[String],
    tool_name: &str,
    timeout_secs: u64,
    cwd: Option<&Path>,
) -> ExternalToolResult {
    let Some((program, args)) = cmd.split_first() else {
        return ExternalToolResult::failure("Empty command".to_string());
    };

    debug!("Running {}: {} {:?}", tool_name, program, args);

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            if e.kind() == std::io::ErrorKind::NotFound {
                return ExternalToolResult::failure(format!("{} not found", tool_name));
            }
            return ExternalToolResult::failure(format!("Failed to run {}: {}", tool_name, e));
        }
    };

    if timeout_secs > 0 {
        run_with_timeout(child, tool_name, timeout_secs)
    } else {
        run_without_timeout(child, tool_name)
    }
}

fn run_without_timeout(child: Child, tool_name: &str) -> ExternalToolResult {
    let output = match child.wait_with_output() {
        Ok(output) => output,
        Err(e) => {
            return ExternalToolResult::failure(format!("Failed to wait for {}: {}", tool_name, e));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    ExternalToolResult::success(stdout, stderr, output.status.code().unwrap_or(-1))
}

/// Drain a pipe on its own thread so a chatty tool can't block on a full buffer
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Run process with timeout (polls with short sleeps)
fn run_with_timeout(mut child: Child, tool_name: &str, timeout_secs: u64) -> ExternalToolResult {
    let start = Instant::now();
    let timeout = Duration::from_secs(timeout_secs);

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = stdout.join().unwrap_or_default();
                let stderr = stderr.join().unwrap_or_default();
                return ExternalToolResult::success(stdout, stderr, status.code().unwrap_or(-1));
            }
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    debug!("{} timed out after {}s", tool_name, timeout_secs);
                    return ExternalToolResult::timeout(tool_name, timeout_secs);
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                return ExternalToolResult::failure(format!(
                    "Failed to wait for {}: {}",
                    tool_name, e
                ));
            }
        }
    }
}
