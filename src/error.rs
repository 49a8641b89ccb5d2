use thiserror::Error;

/// Why a step stopped the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("exited with status {code}")]
    ExitCode { code: i32 },

    #[error("killed by signal {signal}")]
    Signal { signal: i32 },

    #[error("could not be started: {reason}")]
    Spawn { reason: String },

    #[error("coverage {percent:.2}% is below the {threshold}% threshold")]
    CoverageBelowThreshold { percent: f64, threshold: f64 },
}

impl GateError {
    /// Exit status the whole run reports for this failure. Never zero.
    pub fn exit_status(&self) -> u8 {
        match self {
            GateError::ExitCode { code } => match (*code & 0xff) as u8 {
                0 => 1,
                n => n,
            },
            GateError::Signal { signal } => (128 + (*signal & 0x7f)) as u8,
            GateError::Spawn { .. } => 127,
            GateError::CoverageBelowThreshold { .. } => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("`{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
