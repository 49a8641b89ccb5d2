//! Shared fixture: a work directory with a fake `cargo` shell script.
//!
//! The script appends its arguments to `calls.log`, prints a coverage
//! summary for `tarpaulin`, and exits non-zero for the configured subcommand.

#![allow(dead_code)]

use std::path::Path;

use checkgate::config::Config;

pub const SCRIPT: &str = "fake-cargo.sh";
pub const CALLS: &str = "calls.log";

pub struct FakeCargo {
    /// Leading words of the failing invocation, e.g. `"clippy"` or `"+nightly udeps"`.
    pub fail: Option<(&'static str, i32)>,
    pub coverage_line: &'static str,
}

impl Default for FakeCargo {
    fn default() -> Self {
        Self {
            fail: None,
            coverage_line: "91.00% coverage, 91/100 lines covered",
        }
    }
}

impl FakeCargo {
    pub fn install(&self, dir: &Path) {
        let (pattern, code) = self.fail.unwrap_or(("__never__", 0));
        let script = format!(
            r#"echo "$*" >> {CALLS}
echo "fake: $*"
case "$*" in
  tarpaulin*) echo "{coverage}"; touch tarpaulin-report.html ;;
esac
case "$*" in
  "{pattern}"*) echo "{pattern} failed" >&2; exit {code} ;;
esac
exit 0
"#,
            coverage = self.coverage_line,
        );
        std::fs::write(dir.join(SCRIPT), script).expect("failed to write fake cargo");
    }
}

pub fn config() -> Config {
    Config {
        cargo: format!("sh {SCRIPT}"),
        ..Config::default()
    }
}

pub fn workdir(fake: &FakeCargo) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    fake.install(dir.path());
    dir
}

/// Invocations recorded by the fake, one per line, in call order.
pub fn calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join(CALLS))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// The leading words each step passes to cargo, in order.
pub const SUBCOMMANDS: [&str; 6] = [
    "fmt",
    "check",
    "clippy",
    "deny",
    "+nightly udeps",
    "tarpaulin",
];
