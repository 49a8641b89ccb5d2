use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use crate::coverage::{self, CoverageSummary};
use crate::error::GateError;
use crate::process::{self, OutputLine, ProcessResult};

use super::commands::HTML_REPORT;
use super::types::{
    PipelineEvent, PipelineInput, RunReport, StepCommand, StepFailure, StepKind, StepReport,
    StepStatus, Stream, Summary,
};

/// Launch the step sequence on a background thread.
///
/// Returns a receiver that streams `PipelineEvent` values. Steps run strictly
/// one after another; the first failure skips the rest. The final event is
/// always `Completed`.
pub fn run_pipeline(input: PipelineInput) -> Receiver<PipelineEvent> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let report = run_inner(&input, &tx);
        let _ = tx.send(PipelineEvent::Completed(report));
    });
    rx
}

fn run_inner(input: &PipelineInput, tx: &Sender<PipelineEvent>) -> RunReport {
    let mut report = RunReport::default();

    for (index, step) in input.steps.iter().enumerate() {
        if report.failure.is_some() {
            report.steps.push(StepReport::skipped(step.kind));
            continue;
        }

        let _ = tx.send(PipelineEvent::StepStarted {
            index,
            step: step.kind,
        });
        debug!(step = step.kind.as_str(), command = %step.command.display_line(), "spawning");

        let (step_report, summary, error) = run_step(step, input.coverage_threshold, tx);
        let success = error.is_none();

        if summary.is_some() {
            report.coverage = summary;
        }
        match error {
            None => info!(step = step.kind.as_str(), "step passed"),
            Some(error) => {
                warn!(step = step.kind.as_str(), %error, "step failed");
                report.failure = Some(StepFailure {
                    step: step.kind,
                    error,
                });
            }
        }
        report.steps.push(step_report);

        let _ = tx.send(PipelineEvent::StepFinished {
            step: step.kind,
            success,
        });
    }

    let coverage_ran = report
        .steps
        .iter()
        .any(|s| s.step == StepKind::Coverage && s.status != StepStatus::Skipped);
    let html = input.work_dir.join(HTML_REPORT);
    if coverage_ran && html.exists() {
        report.html_report = Some(html);
    }

    report.summary = summarize(&report.steps);
    report
}

/// Run one step and judge its outcome.
fn run_step(
    step: &StepCommand,
    threshold: f64,
    tx: &Sender<PipelineEvent>,
) -> (StepReport, Option<CoverageSummary>, Option<GateError>) {
    let result = match run_process(step, tx) {
        Ok(result) => result,
        Err(error) => {
            let report = StepReport {
                step: step.kind,
                status: StepStatus::Fail,
                exit_code: None,
                failure: Some(error.to_string()),
                log: String::new(),
            };
            return (report, None, Some(error));
        }
    };

    let (summary, error) = judge(step.kind, &result, threshold);
    let report = StepReport {
        step: step.kind,
        status: if error.is_none() {
            StepStatus::Pass
        } else {
            StepStatus::Fail
        },
        exit_code: result.exit_code,
        failure: error.as_ref().map(ToString::to_string),
        log: result.log,
    };
    (report, summary, error)
}

/// Run a single process, draining its output channel and forwarding
/// lines as `PipelineEvent::Log`.
fn run_process(step: &StepCommand, tx: &Sender<PipelineEvent>) -> Result<ProcessResult, GateError> {
    let rx = process::spawn(&step.command).map_err(|e| GateError::Spawn {
        reason: format!("{e:#}"),
    })?;

    for line in rx {
        match line {
            OutputLine::Stdout(line) => {
                let _ = tx.send(PipelineEvent::Log {
                    step: step.kind,
                    stream: Stream::Stdout,
                    line,
                });
            }
            OutputLine::Stderr(line) => {
                let _ = tx.send(PipelineEvent::Log {
                    step: step.kind,
                    stream: Stream::Stderr,
                    line,
                });
            }
            OutputLine::Done(result) => return Ok(result),
        }
    }

    Err(GateError::Spawn {
        reason: "process output ended without an exit status".into(),
    })
}

/// Decide whether a finished step passed. Only the coverage step is gated
/// on its parsed summary in addition to its exit status.
fn judge(
    kind: StepKind,
    result: &ProcessResult,
    threshold: f64,
) -> (Option<CoverageSummary>, Option<GateError>) {
    let summary = match kind {
        StepKind::Coverage => coverage::parse_summary(&result.log),
        _ => None,
    };

    if !result.success {
        let error = match (result.signal, result.exit_code) {
            (Some(signal), _) => GateError::Signal { signal },
            (None, Some(code)) => GateError::ExitCode { code },
            (None, None) => GateError::ExitCode { code: 1 },
        };
        return (summary, Some(error));
    }

    if let Some(s) = summary
        && !s.meets(threshold)
    {
        return (
            summary,
            Some(GateError::CoverageBelowThreshold {
                percent: s.percent,
                threshold,
            }),
        );
    }

    (summary, None)
}

fn summarize(steps: &[StepReport]) -> Summary {
    let count = |status: StepStatus| steps.iter().filter(|s| s.status == status).count();
    Summary {
        total: steps.len(),
        passed: count(StepStatus::Pass),
        failed: count(StepStatus::Fail),
        skipped: count(StepStatus::Skipped),
    }
}
