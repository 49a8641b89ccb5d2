pub mod commands;
pub mod orchestrator;
mod types;

pub use commands::{HTML_REPORT, build_steps};
pub use orchestrator::run_pipeline;
pub use types::{
    PipelineEvent, PipelineInput, RunReport, StepCommand, StepFailure, StepKind, StepReport,
    StepStatus, Stream, Summary,
};
