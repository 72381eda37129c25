use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use super::parser::parse_statistics;
use super::result::{ExecutionFailure, ProbeOutcome, ProbeResult};

/// Something that can run a ping against a host.
///
/// On success the raw stdout of the tool is returned. On failure the error is
/// a text blob whose first line is a header and whose second line carries the
/// tool's own diagnostic.
pub trait ProbeRunner {
    fn run_probe(&self, host: &str) -> impl Future<Output = Result<String, String>> + Send;
}

/// Runs the system `ping` binary in quiet mode.
#[derive(Debug, Clone)]
pub struct SystemPing {
    pub packet_count: u32,
    pub timeout: Duration,
}

impl SystemPing {
    pub fn new(packet_count: u32, timeout: Duration) -> Self {
        SystemPing {
            packet_count,
            timeout,
        }
    }

    fn command_line(&self, host: &str) -> String {
        format!("ping -q -c {} {host}", self.packet_count)
    }
}

impl ProbeRunner for SystemPing {
    async fn run_probe(&self, host: &str) -> Result<String, String> {
        let mut command = Command::new("ping");
        command
            .arg("-q")
            .arg("-c")
            .arg(self.packet_count.to_string())
            .arg(host);

        run_command(command, &self.command_line(host), self.timeout).await
    }
}

/// Runs `command` to completion and returns its stdout, or an error text
/// headed by `command_line` when it cannot start, exits non-zero or runs
/// longer than `limit`.
async fn run_command(
    mut command: Command,
    command_line: &str,
    limit: Duration,
) -> Result<String, String> {
    log::debug!("Running '{command_line}'");

    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("Command failed: {command_line}\nping: {e}"))?;

    // Dropping the child on timeout kills the process.
    let output = match timeout(limit, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| format!("Command failed: {command_line}\nping: {e}"))?,
        Err(_) => {
            log::warn!("'{command_line}' killed after {}s", limit.as_secs());
            return Err(format!(
                "Command failed: {command_line}\nping: no answer within {}s",
                limit.as_secs()
            ));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    Err(failure_text(
        command_line,
        &stdout,
        &String::from_utf8_lossy(&output.stderr),
    ))
}

/// Error text for a run that exited non-zero.
fn failure_text(command_line: &str, stdout: &str, stderr: &str) -> String {
    let detail = if stderr.trim().is_empty() {
        // iputils exits non-zero on total loss and only writes the summary to stdout
        last_line(stdout)
    } else {
        stderr.trim()
    };
    format!("Command failed: {command_line}\n{detail}")
}

fn last_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

/// Probes `host` once and classifies what came back.
pub async fn probe_host<R: ProbeRunner>(runner: &R, host: &str) -> ProbeResult {
    let outcome = match runner.run_probe(host).await {
        Ok(raw_output) => match parse_statistics(&raw_output) {
            Ok(measurement) => ProbeOutcome::Measured(measurement),
            Err(failure) => ProbeOutcome::Unparseable(failure),
        },
        Err(error_text) => ProbeOutcome::Failed(ExecutionFailure::from_error_text(&error_text)),
    };

    ProbeResult::new(host, outcome)
}
