use super::CoverageSummary;

/// Find the last coverage summary in raw test runner output.
///
/// Expects tarpaulin's closing line, optionally behind a log prefix:
/// ```text
/// 85.71% coverage, 12/14 lines covered, +1.20% change in coverage
/// ```
pub fn parse_summary(raw: &str) -> Option<CoverageSummary> {
    raw.lines().rev().find_map(parse_line)
}

fn parse_line(line: &str) -> Option<CoverageSummary> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.windows(4).find_map(|w| parse_window(w[0], w[1], w[2], w[3]))
}

/// `<pct>%  coverage,  <covered>/<coverable>  lines`
fn parse_window(pct: &str, word: &str, ratio: &str, lines: &str) -> Option<CoverageSummary> {
    if word != "coverage," || !lines.starts_with("lines") {
        return None;
    }
    let percent: f64 = pct.strip_suffix('%')?.parse().ok()?;
    let (covered, coverable) = ratio.split_once('/')?;
    Some(CoverageSummary {
        percent,
        covered: covered.parse().ok()?,
        coverable: coverable.parse().ok()?,
    })
}
