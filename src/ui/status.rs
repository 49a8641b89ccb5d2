use std::io::Write;

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};

// ── Colour constants ──────────────────────────────────────────────────
pub const COLOR_STATUS: Color = Color::Green;
pub const COLOR_FAIL: Color = Color::Red;

/// Writes the one-line banner shown before each step.
#[derive(Debug, Clone, Copy)]
pub struct StatusPrinter {
    color: bool,
}

impl StatusPrinter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Render a status line, newline included.
    pub fn render(&self, message: &str) -> String {
        self.render_with(COLOR_STATUS, message)
    }

    /// Render a failure line, newline included.
    pub fn render_failure(&self, message: &str) -> String {
        self.render_with(COLOR_FAIL, message)
    }

    fn render_with(&self, color: Color, message: &str) -> String {
        if !self.color {
            return format!("{message}\n");
        }
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = queue!(
            buf,
            SetForegroundColor(color),
            SetAttribute(Attribute::Bold),
            Print(message),
            ResetColor,
            Print("\n")
        );
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Print a status line to `out`. Write errors are ignored.
    pub fn print(&self, out: &mut impl Write, message: &str) {
        let _ = out.write_all(self.render(message).as_bytes());
        let _ = out.flush();
    }

    pub fn print_failure(&self, out: &mut impl Write, message: &str) {
        let _ = out.write_all(self.render_failure(message).as_bytes());
        let _ = out.flush();
    }
}
