//! Terminal output helpers: colors, relative timestamps, aligned tables.
//!
//! Everything here is a pure function of its inputs plus an explicit
//! color flag; nothing inspects the terminal after construction.

use std::io::{self, IsTerminal, Write};

use colored::Colorize;

/// Color configuration for shell output.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

impl Style {
    /// Colorize only when stdout is a terminal.
    pub fn auto() -> Self {
        Self {
            color: io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn green(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn blue(&self, text: &str) -> String {
        if self.color {
            text.blue().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn cyan(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn red(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Short human form of an elapsed duration: "less than a minute ago",
/// "3 hours ago". Negative durations (clock skew) read as "just created".
pub fn relative_age(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    let mins = secs / 60;
    let hours = mins / 60;
    let days = hours / 24;

    if secs < 60 {
        "less than a minute ago".to_string()
    } else if mins == 1 {
        "a minute ago".to_string()
    } else if mins < 60 {
        format!("{} minutes ago", mins)
    } else if hours == 1 {
        "an hour ago".to_string()
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else if days == 1 {
        "a day ago".to_string()
    } else if days < 30 {
        format!("{} days ago", days)
    } else if days < 60 {
        "a month ago".to_string()
    } else if days < 365 {
        format!("{} months ago", days / 30)
    } else if days < 730 {
        "a year ago".to_string()
    } else {
        format!("{} years ago", days / 365)
    }
}

/// Accumulates rows and flushes space-aligned columns on demand.
///
/// Widths are computed on visible characters, so colored cells do not skew
/// the alignment of their neighbors.
#[derive(Default)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn flush(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let mut widths: Vec<usize> = Vec::new();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let width = visible_width(cell);
                if i == widths.len() {
                    widths.push(width);
                } else if width > widths[i] {
                    widths[i] = width;
                }
            }
        }

        for row in &self.rows {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i + 1 < row.len() {
                    let pad = widths[i] - visible_width(cell) + 2;
                    for _ in 0..pad {
                        line.push(' ');
                    }
                }
            }
            writeln!(out, "{}", line.trim_end())?;
        }

        self.rows.clear();
        Ok(())
    }
}

/// Character count excluding ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}
