use std::path::PathBuf;

/// A single external command. `program` is looked up on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: PathBuf,
}

impl ProcessCommand {
    /// The command line, quoted so it can be pasted into a shell.
    pub fn display_line(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// Outcome of a finished process.
#[derive(Debug, Clone, Default)]
pub struct ProcessResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Set when the process was terminated by a signal (unix only).
    pub signal: Option<i32>,
    pub log: String,
}

/// Streamed output from a running process.
#[derive(Debug)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
    Done(ProcessResult),
}
