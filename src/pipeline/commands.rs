use std::path::Path;

use crate::config::Config;
use crate::error::ConfigError;
use crate::process::ProcessCommand;

use super::types::{StepCommand, StepKind};

/// File the coverage runner writes into the working directory.
pub const HTML_REPORT: &str = "tarpaulin-report.html";

/// Arguments passed to cargo for each step, after any `cargo` prefix words.
pub fn step_args(kind: StepKind, cfg: &Config) -> Vec<String> {
    let fixed: &[&str] = match kind {
        StepKind::Format => &["fmt", "--all", "--", "--check"],
        StepKind::Check => &["check", "--all-targets", "--all-features"],
        StepKind::Clippy => &[
            "clippy",
            "--all-targets",
            "--all-features",
            "--",
            "-D",
            "warnings",
        ],
        StepKind::Deny => &["deny", "check"],
        StepKind::Udeps => &["+nightly", "udeps", "--all-targets"],
        StepKind::Coverage => {
            return vec![
                "tarpaulin".into(),
                "--fail-under".into(),
                cfg.threshold_arg(),
                "--timeout".into(),
                cfg.test_timeout.to_string(),
                "--out".into(),
                "Html".into(),
            ];
        }
    };
    fixed.iter().map(|s| s.to_string()).collect()
}

/// Build the full, ordered list of steps.
pub fn build_steps(cfg: &Config, work_dir: &Path) -> Result<Vec<StepCommand>, ConfigError> {
    let (program, prefix) = cfg.cargo_command()?;

    let steps = StepKind::ALL
        .iter()
        .map(|&kind| {
            let mut args = prefix.clone();
            args.extend(step_args(kind, cfg));
            StepCommand {
                kind,
                command: ProcessCommand {
                    program: program.clone(),
                    args,
                    work_dir: work_dir.to_path_buf(),
                },
            }
        })
        .collect();

    Ok(steps)
}
