use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// When to color status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Decide whether stdout should carry escape sequences.
    pub fn resolve(self) -> bool {
        self.resolve_for(std::io::stdout().is_terminal())
    }

    /// Same decision for stderr, which may be redirected on its own.
    pub fn resolve_stderr(self) -> bool {
        self.resolve_for(std::io::stderr().is_terminal())
    }

    /// `Auto` colors only an interactive terminal, and honours `NO_COLOR`.
    fn resolve_for(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && is_terminal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Cargo invocation, split with shell-words.
    pub cargo: String,
    /// Minimum line coverage, in percent.
    pub coverage_threshold: f64,
    /// Per-test timeout handed to the coverage runner, in seconds.
    pub test_timeout: u64,
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cargo: "cargo".to_string(),
            coverage_threshold: 80.0,
            test_timeout: 120,
            color: ColorMode::Auto,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.coverage_threshold) {
            return Err(ConfigError::Invalid {
                key: "coverage_threshold",
                reason: format!("{} is not between 0 and 100", self.coverage_threshold),
            });
        }
        if self.test_timeout == 0 {
            return Err(ConfigError::Invalid {
                key: "test_timeout",
                reason: "must be a positive number of seconds".into(),
            });
        }
        self.cargo_command()?;
        Ok(())
    }

    /// Split `cargo` into the program and any leading arguments.
    pub fn cargo_command(&self) -> Result<(String, Vec<String>), ConfigError> {
        let words = shell_words::split(&self.cargo).map_err(|e| ConfigError::Invalid {
            key: "cargo",
            reason: e.to_string(),
        })?;
        let mut words = words.into_iter();
        match words.next() {
            Some(program) => Ok((program, words.collect())),
            None => Err(ConfigError::Invalid {
                key: "cargo",
                reason: "must name a program".into(),
            }),
        }
    }

    /// Threshold as passed on the command line: `80` rather than `80.0`.
    pub fn threshold_arg(&self) -> String {
        if self.coverage_threshold.fract() == 0.0 {
            format!("{}", self.coverage_threshold as u64)
        } else {
            format!("{}", self.coverage_threshold)
        }
    }
}
