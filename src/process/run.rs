use std::io::BufRead;
use std::process::{Child, ChildStderr, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use super::types::{OutputLine, ProcessCommand, ProcessResult};

/// Spawn a process and return a channel that streams its output.
///
/// The caller receives [`OutputLine::Stdout`]/[`Stderr`] as they arrive,
/// followed by exactly one [`OutputLine::Done`] carrying the final result.
pub fn spawn(cmd: &ProcessCommand) -> Result<Receiver<OutputLine>> {
    let mut child = Command::new(&cmd.program)
        .args(&cmd.args)
        .current_dir(&cmd.work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn `{}`", cmd.program))?;

    let stdout = child.stdout.take().context("child stdout was not captured")?;
    let stderr = child.stderr.take().context("child stderr was not captured")?;

    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        supervise(child, stdout, stderr, tx);
    });

    Ok(rx)
}

fn supervise(mut child: Child, stdout: ChildStdout, stderr: ChildStderr, tx: Sender<OutputLine>) {
    // Both streams interleaved in arrival order, for the final log.
    let log_buf = Arc::new(Mutex::new(String::new()));

    let stdout_handle = forward_lines(stdout, tx.clone(), log_buf.clone(), OutputLine::Stdout);
    let stderr_handle = forward_lines(stderr, tx.clone(), log_buf.clone(), OutputLine::Stderr);

    let status = child.wait();

    let _ = stdout_handle.join();
    let _ = stderr_handle.join();

    let log = log_buf.lock().map(|b| b.clone()).unwrap_or_default();
    let result = match status {
        Ok(status) => result_from_status(status, log),
        Err(e) => ProcessResult {
            log: format!("{log}failed to wait for process: {e}\n"),
            ..ProcessResult::default()
        },
    };

    // Receiver may be dropped; ignore send errors.
    let _ = tx.send(OutputLine::Done(result));
}

fn forward_lines<R>(
    stream: R,
    tx: Sender<OutputLine>,
    log_buf: Arc<Mutex<String>>,
    wrap: fn(String) -> OutputLine,
) -> std::thread::JoinHandle<()>
where
    R: std::io::Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut reader = std::io::BufReader::new(stream);
        let mut raw = Vec::new();
        loop {
            raw.clear();
            // Bytes, not `lines()`: tool output is not guaranteed to be UTF-8.
            match reader.read_until(b'\n', &mut raw) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            if raw.last() == Some(&b'\n') {
                raw.pop();
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
            }
            let line = String::from_utf8_lossy(&raw).into_owned();
            if let Ok(mut buf) = log_buf.lock() {
                buf.push_str(&line);
                buf.push('\n');
            }
            let _ = tx.send(wrap(line));
        }
    })
}

fn result_from_status(status: ExitStatus, log: String) -> ProcessResult {
    ProcessResult {
        success: status.success(),
        exit_code: status.code(),
        signal: exit_signal(status),
        log,
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}
