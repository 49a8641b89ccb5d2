use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::mpsc::Receiver;

use anyhow::{Context, Result, bail};
use clap::Parser;

use checkgate::config::{self, ColorMode};
use checkgate::logging;
use checkgate::pipeline::{self, PipelineEvent, PipelineInput, RunReport, Stream};
use checkgate::ui::StatusPrinter;

/// Exit status for problems that stop the run before any step starts.
const SETUP_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "checkgate", version)]
#[command(about = "Run formatting, lint, dependency and coverage checks; stop at the first failure")]
struct Cli {
    /// Working directory for every step
    #[arg(short = 'C', long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Config file (default: <DIR>/.checkgate.yaml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the JSON run report to FILE
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Print the planned steps and exit
    #[arg(long)]
    list: bool,

    /// When to color status lines
    #[arg(long, value_enum, value_name = "WHEN")]
    color: Option<ColorMode>,

    /// Debug-level diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("checkgate: {e:#}");
            ExitCode::from(SETUP_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let work_dir = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    if !work_dir.is_dir() {
        bail!("working directory {} does not exist", work_dir.display());
    }

    let cfg = match config::resolve(&work_dir, cli.config.as_deref()) {
        Some(path) => config::load_file(&path)?,
        None => config::load(&work_dir)?,
    };
    tracing::debug!(?cfg, dir = %work_dir.display(), "configuration loaded");

    let input = PipelineInput::from_config(&cfg, &work_dir).context("invalid config")?;

    if cli.list {
        print_plan(&input);
        return Ok(0);
    }

    let color = cli.color.unwrap_or(cfg.color);
    let printer = StatusPrinter::new(color.resolve());
    let report = drain_events(pipeline::run_pipeline(input), &printer)?;

    if let Some(path) = &cli.report {
        write_report(path, &report)?;
    }

    if let Some(failure) = &report.failure {
        StatusPrinter::new(color.resolve_stderr()).print_failure(
            &mut io::stderr(),
            &format!(
                "checkgate: step '{}' failed: {}",
                failure.step.as_str(),
                failure.error
            ),
        );
    }

    Ok(report.exit_status())
}

/// Print one status line per step start and pass tool output through.
fn drain_events(rx: Receiver<PipelineEvent>, printer: &StatusPrinter) -> Result<RunReport> {
    let stdout = io::stdout();
    let stderr = io::stderr();

    for ev in rx {
        match ev {
            PipelineEvent::StepStarted { step, .. } => {
                printer.print(&mut stdout.lock(), step.message());
            }
            PipelineEvent::Log {
                stream: Stream::Stdout,
                line,
                ..
            } => {
                let _ = writeln!(stdout.lock(), "{line}");
            }
            PipelineEvent::Log {
                stream: Stream::Stderr,
                line,
                ..
            } => {
                let _ = writeln!(stderr.lock(), "{line}");
            }
            PipelineEvent::StepFinished { .. } => {}
            PipelineEvent::Completed(report) => return Ok(report),
        }
    }

    bail!("step sequencer stopped without a report")
}

fn print_plan(input: &PipelineInput) {
    for (i, step) in input.steps.iter().enumerate() {
        println!(
            "{}. {}: {}",
            i + 1,
            step.kind.message(),
            step.command.display_line()
        );
    }
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write run report {}", path.display()))?;
    Ok(())
}
