// External process execution: spawning, output streaming, exit status.

pub mod run;
pub mod types;

pub use run::spawn;
pub use types::{OutputLine, ProcessCommand, ProcessResult};
