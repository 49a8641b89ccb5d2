/// Coverage runner output parsing: the tarpaulin summary line to a structured result.
mod parse;

pub use parse::parse_summary;

use serde::{Deserialize, Serialize};

/// Line coverage reported by the test runner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub percent: f64,
    pub covered: u64,
    pub coverable: u64,
}

impl CoverageSummary {
    pub fn meets(&self, threshold: f64) -> bool {
        self.percent >= threshold
    }
}
