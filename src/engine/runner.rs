// Single external-process lifecycle: shell spawn, merged line streaming, graceful stop.
use std::ffi::OsStr;
use std::io::{self, BufRead, BufReader};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use thiserror::Error;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

pub(crate) fn hidden_command(program: impl AsRef<OsStr>) -> Command {
    let mut command = Command::new(program);
    #[cfg(target_os = "windows")]
    {
        command.creation_flags(CREATE_NO_WINDOW);
    }
    command
}

// Run the command line through the platform shell with stderr folded into
// stdout, so the caller observes one interleaved line stream.
fn shell_command(command_line: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut command = hidden_command("cmd");
        command.arg("/C").arg(format!("{command_line} 2>&1"));
        command
    }
    #[cfg(not(target_os = "windows"))]
    {
        let mut command = hidden_command("sh");
        command.arg("-c").arg(format!("exec 2>&1; {command_line}"));
        // Own process group, so a stop request can signal shell descendants
        // that still hold the output pipe.
        command.process_group(0);
        command
    }
}

fn terminate_process(pid: u32) {
    #[cfg(target_os = "windows")]
    {
        let _ = hidden_command("taskkill")
            .args(["/T", "/PID", &pid.to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
    #[cfg(not(target_os = "windows"))]
    {
        let _ = hidden_command("kill")
            .args(["-TERM", "--", &format!("-{pid}")])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
}

fn read_lossy_process_line<R: BufRead>(
    reader: &mut R,
    raw_buffer: &mut Vec<u8>,
) -> Result<Option<String>, io::Error> {
    raw_buffer.clear();
    let bytes_read = reader.read_until(b'\n', raw_buffer)?;
    if bytes_read == 0 {
        return Ok(None);
    }
    while matches!(raw_buffer.last(), Some(b'\n') | Some(b'\r')) {
        raw_buffer.pop();
    }
    Ok(Some(String::from_utf8_lossy(raw_buffer).to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Failure(i32),
    /// A stop request arrived before the process finished on its own.
    Killed,
}

#[derive(Debug, Error)]
#[error("Failed to start process: {0}")]
pub struct SpawnError(#[from] io::Error);

/// Runs one external command at a time. Cloneable [`RunnerHandle`]s let any
/// thread request a stop while `run` is streaming output.
pub struct ProcessRunner {
    cancelled: Arc<AtomicBool>,
    live_pid: Arc<Mutex<Option<u32>>>,
}

#[derive(Clone)]
pub struct RunnerHandle {
    cancelled: Arc<AtomicBool>,
    live_pid: Arc<Mutex<Option<u32>>>,
}

impl RunnerHandle {
    /// Requests a graceful terminate of the live child, if any, and marks the
    /// runner cancelled. Safe to call repeatedly and from any thread.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Ok(guard) = self.live_pid.lock() {
            if let Some(pid) = *guard {
                terminate_process(pid);
            }
        }
    }

    pub(crate) fn same_runner(&self, other: &RunnerHandle) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            live_pid: Arc::new(Mutex::new(None)),
        }
    }

    pub fn handle(&self) -> RunnerHandle {
        RunnerHandle {
            cancelled: Arc::clone(&self.cancelled),
            live_pid: Arc::clone(&self.live_pid),
        }
    }

    pub fn stop(&self) {
        self.handle().stop();
    }

    /// Spawns `command_line` and forwards each output line to `on_line` as it
    /// arrives. Blocks until the process exits or a stop request lands; a stop
    /// request wins over the eventual exit code.
    pub fn run(
        &self,
        command_line: &str,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ExitOutcome, SpawnError> {
        let mut child = shell_command(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let pid = child.id();
        if let Ok(mut guard) = self.live_pid.lock() {
            *guard = Some(pid);
        }
        // A stop that raced ahead of the spawn never saw this pid.
        if self.cancelled.load(Ordering::SeqCst) {
            terminate_process(pid);
        }

        let stdout = child.stdout.take().ok_or_else(|| {
            SpawnError(io::Error::new(
                io::ErrorKind::Other,
                "process stdout was not captured",
            ))
        })?;
        let mut reader = BufReader::new(stdout);
        let mut raw_buffer: Vec<u8> = Vec::new();

        loop {
            match read_lossy_process_line(&mut reader, &mut raw_buffer) {
                Ok(Some(line)) => on_line(&line),
                Ok(None) => break,
                Err(error) => {
                    on_line(&format!("Failed to read process output: {error}"));
                    break;
                }
            }
            if self.cancelled.load(Ordering::SeqCst) {
                terminate_process(pid);
                break;
            }
        }

        if let Ok(mut guard) = self.live_pid.lock() {
            *guard = None;
        }

        if self.cancelled.load(Ordering::SeqCst) {
            // Reap off-thread; the terminate request is out and the caller
            // should not block on OS cleanup.
            thread::spawn(move || {
                let _ = child.wait();
            });
            return Ok(ExitOutcome::Killed);
        }

        let status = child.wait()?;
        if self.cancelled.load(Ordering::SeqCst) {
            return Ok(ExitOutcome::Killed);
        }
        if status.success() {
            Ok(ExitOutcome::Success)
        } else {
            Ok(ExitOutcome::Failure(status.code().unwrap_or(-1)))
        }
    }
}
