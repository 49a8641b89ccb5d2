//! Run a Rust project's contribution checks in a fixed order, stopping at the
//! first failure.

pub mod config;
pub mod coverage;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod ui;

pub use error::{ConfigError, GateError};
pub use pipeline::{PipelineEvent, PipelineInput, RunReport, run_pipeline};
