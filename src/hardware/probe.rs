//! Host probing capability.
//!
//! Everything that shells out or touches the filesystem goes through
//! [`HardwareProbe`], so collection logic can be exercised against canned
//! output in tests. [`SystemProbe`] is the real implementation: every
//! invocation runs under a deadline and is killed when it expires, since
//! hardware tools can hang on a faulty device.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::hardware::error::{ProbeError, Result};

/// Default timeout per external invocation in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// A full lshw scan walks every bus and can take tens of seconds on large
/// servers, so it gets its own default.
pub const DEFAULT_LSHW_TIMEOUT_SECS: u64 = 60;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout of a command that is required to succeed.
    pub fn into_checked(self, tool: &str) -> Result<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(ProbeError::Failed {
                tool: tool.to_string(),
                code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

pub trait HardwareProbe {
    /// Run a text-output tool and capture stdout/stderr.
    fn run(&self, program: &str, args: &[&str]) -> Result<ToolOutput>;

    /// Run a tool with stdout redirected into `dest`. Returns the exit code.
    fn run_to_file(&self, program: &str, args: &[&str], dest: &Path) -> Result<Option<i32>>;

    fn read_file(&self, path: &Path) -> Result<String>;

    fn exists(&self, path: &Path) -> bool;
}

/// Probes the machine this process runs on.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    timeout: Duration,
    tool_timeouts: HashMap<String, Duration>,
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl SystemProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            tool_timeouts: HashMap::new(),
        }
    }

    /// Use `timeout` instead of the default for every run of `program`.
    pub fn with_tool_timeout(mut self, program: &str, timeout: Duration) -> Self {
        self.tool_timeouts.insert(program.to_string(), timeout);
        self
    }

    fn timeout_for(&self, program: &str) -> Duration {
        self.tool_timeouts.get(program).copied().unwrap_or(self.timeout)
    }

    fn command(program: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args).env("LC_ALL", "C").stdin(Stdio::null());
        cmd
    }

    fn spawn(mut cmd: Command, program: &str) -> Result<Child> {
        cmd.spawn().map_err(|source| ProbeError::Unavailable {
            tool: program.to_string(),
            source,
        })
    }

    fn wait_with_deadline(child: &mut Child, program: &str, deadline: &Deadline) -> Result<ExitStatus> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline.at {
                let _ = child.kill();
                let _ = child.wait();
                return Err(deadline.expired(program));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// One deadline covers the child and everything still holding its pipes.
struct Deadline {
    at: Instant,
    timeout: Duration,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
            timeout,
        }
    }

    fn expired(&self, program: &str) -> ProbeError {
        ProbeError::Timeout {
            tool: program.to_string(),
            after: self.timeout,
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

/// A backgrounded grandchild can keep the pipe open after the child exits;
/// the reader is abandoned once the deadline passes.
fn collect(rx: Receiver<Vec<u8>>, program: &str, deadline: &Deadline) -> Result<String> {
    let remaining = deadline.at.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(RecvTimeoutError::Timeout) => Err(deadline.expired(program)),
        Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
    }
}

impl HardwareProbe for SystemProbe {
    fn run(&self, program: &str, args: &[&str]) -> Result<ToolOutput> {
        let started = Instant::now();
        let mut cmd = Self::command(program, args);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let deadline = Deadline::after(self.timeout_for(program));
        let mut child = Self::spawn(cmd, program)?;
        // Pipes are drained concurrently so a chatty tool can't block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = Self::wait_with_deadline(&mut child, program, &deadline)?;
        let output = ToolOutput {
            stdout: collect(stdout, program, &deadline)?,
            stderr: collect(stderr, program, &deadline)?,
            exit_code: status.code(),
        };

        debug!(
            program,
            ?args,
            exit_code = ?output.exit_code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe finished"
        );
        Ok(output)
    }

    fn run_to_file(&self, program: &str, args: &[&str], dest: &Path) -> Result<Option<i32>> {
        let started = Instant::now();
        let file = File::create(dest)?;
        let mut cmd = Self::command(program, args);
        cmd.stdout(Stdio::from(file)).stderr(Stdio::piped());

        let deadline = Deadline::after(self.timeout_for(program));
        let mut child = Self::spawn(cmd, program)?;
        let stderr = drain(child.stderr.take());
        let status = Self::wait_with_deadline(&mut child, program, &deadline)?;
        let stderr = collect(stderr, program, &deadline)?;

        debug!(
            program,
            ?args,
            dest = %dest.display(),
            exit_code = ?status.code(),
            stderr = stderr.trim(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "probe finished"
        );
        Ok(status.code())
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| ProbeError::read(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::error::ErrorKind;

    #[test]
    fn test_run_captures_stdout_and_exit_code() {
        let probe = SystemProbe::default();
        let output = probe.run("sh", &["-c", "echo hello; exit 3"]).unwrap();
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let probe = SystemProbe::default();
        let err = probe.run("definitely-not-a-real-tool-xyz", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_hanging_program_times_out() {
        let probe = SystemProbe::new(Duration::from_millis(200));
        let started = Instant::now();
        let err = probe.run("sleep", &["10"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_background_child_holding_pipe_times_out() {
        let probe = SystemProbe::new(Duration::from_millis(200));
        let started = Instant::now();
        let err = probe.run("sh", &["-c", "sleep 3 & echo started"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_tool_timeout_overrides_default() {
        let probe = SystemProbe::new(Duration::from_millis(200))
            .with_tool_timeout("sleep", Duration::from_secs(5));
        assert_eq!(probe.timeout_for("sleep"), Duration::from_secs(5));
        assert_eq!(probe.timeout_for("ipmitool"), Duration::from_millis(200));

        let output = probe.run("sleep", &["0.5"]).unwrap();
        assert!(output.success());
    }

    #[test]
    fn test_run_to_file_redirects_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let probe = SystemProbe::default();
        let code = probe
            .run_to_file("sh", &["-c", "echo 'IP Address : 10.0.0.1'"], &dest)
            .unwrap();
        assert_eq!(code, Some(0));
        assert_eq!(
            probe.read_file(&dest).unwrap().trim(),
            "IP Address : 10.0.0.1"
        );
    }

    #[test]
    fn test_into_checked_reports_failure() {
        let output = ToolOutput {
            stdout: String::new(),
            stderr: "Device \"eth0\" does not exist.\n".to_string(),
            exit_code: Some(1),
        };
        let err = output.into_checked("ip").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Failed);
        assert!(err.to_string().contains("does not exist"));
    }
}
