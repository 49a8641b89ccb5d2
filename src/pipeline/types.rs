use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::coverage::CoverageSummary;
use crate::error::{ConfigError, GateError};
use crate::process::ProcessCommand;

/// The fixed checks, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    #[serde(rename = "fmt")]
    Format,
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "clippy")]
    Clippy,
    #[serde(rename = "deny")]
    Deny,
    #[serde(rename = "udeps")]
    Udeps,
    #[serde(rename = "coverage")]
    Coverage,
}

impl StepKind {
    pub const ALL: [StepKind; 6] = [
        StepKind::Format,
        StepKind::Check,
        StepKind::Clippy,
        StepKind::Deny,
        StepKind::Udeps,
        StepKind::Coverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Format => "fmt",
            StepKind::Check => "check",
            StepKind::Clippy => "clippy",
            StepKind::Deny => "deny",
            StepKind::Udeps => "udeps",
            StepKind::Coverage => "coverage",
        }
    }

    /// Status line printed before the step runs.
    pub fn message(&self) -> &'static str {
        match self {
            StepKind::Format => "Checking formatting",
            StepKind::Check => "Running cargo check",
            StepKind::Clippy => "Running clippy",
            StepKind::Deny => "Checking dependency policy",
            StepKind::Udeps => "Checking for unused dependencies",
            StepKind::Coverage => "Running tests with coverage",
        }
    }
}

/// One planned step: what it is and what to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCommand {
    pub kind: StepKind,
    pub command: ProcessCommand,
}

/// Input to the step sequencer.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub steps: Vec<StepCommand>,
    pub coverage_threshold: f64,
    pub work_dir: PathBuf,
}

impl PipelineInput {
    /// Plan the fixed sequence for `work_dir` under `config`.
    pub fn from_config(config: &Config, work_dir: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            steps: super::commands::build_steps(config, work_dir)?,
            coverage_threshold: config.coverage_threshold,
            work_dir: work_dir.to_path_buf(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub step: StepKind,
    pub status: StepStatus,
    pub exit_code: Option<i32>,
    pub failure: Option<String>,
    pub log: String,
}

impl StepReport {
    pub fn skipped(step: StepKind) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            exit_code: None,
            failure: None,
            log: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// The step that stopped the run and why.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub step: StepKind,
    pub error: GateError,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub summary: Summary,
    pub coverage: Option<CoverageSummary>,
    pub html_report: Option<PathBuf>,
    #[serde(skip)]
    pub failure: Option<StepFailure>,
}

impl RunReport {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    /// Process exit status for the whole run.
    pub fn exit_status(&self) -> u8 {
        self.failure
            .as_ref()
            .map(|f| f.error.exit_status())
            .unwrap_or(0)
    }
}

/// Which stream a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Events emitted by the step sequencer.
#[derive(Debug)]
pub enum PipelineEvent {
    StepStarted { index: usize, step: StepKind },
    Log {
        step: StepKind,
        stream: Stream,
        line: String,
    },
    StepFinished { step: StepKind, success: bool },
    Completed(RunReport),
}
