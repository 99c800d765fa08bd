//! External antivirus integration.
//!
//! The scanner is an opaque external process. [`ClamScan`] runs it and
//! [`parse_scan_output`] turns its output into an [`AvStatus`]; the parser is
//! a pure function so it can be tested without the binary installed.

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

use thiserror::Error;
use tracing::debug;
use tracing::warn;

use crate::config::AntivirusConfig;
use crate::types::AvStatus;

/// Scans one file and reports a verdict.
///
/// Implementations must not panic or propagate failures; anything that goes
/// wrong becomes [`AvStatus::Error`].
pub trait AntivirusScanner {
    /// Scans the file at `path`.
    fn scan(&self, path: &Path) -> AvStatus;
}

/// How often a bounded wait polls the child for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Debug, Error)]
enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", .timeout.as_secs_f64())]
    TimedOut { program: String, timeout: Duration },
}

/// [`AntivirusScanner`] that runs ClamAV's `clamscan` (or a compatible
/// command) once per file.
///
/// The command line is `<program> [args..] <path>`. Without a timeout the
/// call blocks until the scanner exits.
#[derive(Debug, Clone)]
pub struct ClamScan {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ClamScan {
    /// Creates a scanner from its invocation settings.
    #[must_use]
    pub fn new(config: &AntivirusConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout,
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(path).stdin(Stdio::null());
        command
    }

    fn run(&self, path: &Path) -> Result<Output, RunError> {
        let mut command = self.command(path);
        match self.timeout {
            None => command.output().map_err(|source| RunError::Spawn {
                program: self.program_name(),
                source,
            }),
            Some(timeout) => self.output_with_timeout(command, timeout),
        }
    }

    fn output_with_timeout(
        &self,
        mut command: Command,
        timeout: Duration,
    ) -> Result<Output, RunError> {
        let mut child = command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: self.program_name(),
                source,
            })?;

        // Pipes are drained on their own threads while the child is polled.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RunError::TimedOut {
                        program: self.program_name(),
                        timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    return Err(RunError::Wait {
                        program: self.program_name(),
                        source,
                    });
                }
            }
        };

        Ok(Output {
            status,
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }
}

impl AntivirusScanner for ClamScan {
    fn scan(&self, path: &Path) -> AvStatus {
        match self.run(path) {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                let status = parse_scan_output(&stdout, &stderr, output.status.code());
                debug!(path = %path.display(), status = status.as_str(), "antivirus scan finished");
                status
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "antivirus scan failed");
                AvStatus::Error(e.to_string())
            }
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Classifies `clamscan`-style output.
///
/// Parsing is line-anchored: only a line of the form `<path>: OK` counts as
/// clean and only `<path>: <signature> FOUND` counts as a detection, so the
/// words appearing inside an echoed file path do not match. A detection
/// wins over a clean line.
///
/// When no verdict line is present, an empty stdout together with an exit
/// code other than 0 or 1 (or death by signal) is an error whose reason is
/// stderr, or the exit status if stderr is empty. Anything else is
/// [`AvStatus::Unknown`] carrying the trimmed stdout.
///
/// # Examples
///
/// ```
/// use imgward_core::classify::parse_scan_output;
/// use imgward_core::types::AvStatus;
///
/// let status = parse_scan_output("/imgs/OK_FOUND.jpg: OK\n", "", Some(0));
/// assert_eq!(status, AvStatus::Clean);
///
/// let status = parse_scan_output("/imgs/a.jpg: Eicar-Signature FOUND\n", "", Some(1));
/// assert!(status.is_malicious());
/// ```
pub fn parse_scan_output(stdout: &str, stderr: &str, exit_code: Option<i32>) -> AvStatus {
    let mut clean = false;

    for line in stdout.lines() {
        let Some((_, verdict)) = line.trim_end().rsplit_once(": ") else {
            continue;
        };
        if verdict == "OK" {
            clean = true;
        } else if let Some(signature) = verdict.strip_suffix("FOUND") {
            let signature = signature.trim();
            return AvStatus::Malicious {
                signature: (!signature.is_empty()).then(|| signature.to_string()),
            };
        }
    }

    if clean {
        return AvStatus::Clean;
    }

    let raw = stdout.trim();
    let exited_abnormally = !matches!(exit_code, Some(0 | 1));
    if raw.is_empty() && exited_abnormally {
        let stderr = stderr.trim();
        let reason = if !stderr.is_empty() {
            stderr.to_string()
        } else if let Some(code) = exit_code {
            format!("scanner exited with status {code}")
        } else {
            "scanner terminated by signal".to_string()
        };
        return AvStatus::Error(reason);
    }

    AvStatus::Unknown(raw.to_string())
}
