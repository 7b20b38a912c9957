//! Terminal styling.

use colored::Colorize;
use doclens_core::{RiskLevel, ShieldLevel};

pub(crate) struct Theme;

impl Theme {
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    pub(crate) fn section(text: &str) -> String {
        format!("{}", text.bold())
    }

    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Color `text` by risk severity.
    pub(crate) fn by_risk(level: RiskLevel, text: &str) -> String {
        match level {
            RiskLevel::Low => text.green().to_string(),
            RiskLevel::Medium => text.yellow().to_string(),
            RiskLevel::High => text.red().bold().to_string(),
        }
    }

    pub(crate) fn risk_level(level: RiskLevel) -> String {
        Self::by_risk(level, level.as_str())
    }

    pub(crate) fn shield(level: ShieldLevel, text: &str) -> String {
        match level {
            ShieldLevel::High => text.green().to_string(),
            ShieldLevel::Medium => text.yellow().to_string(),
            ShieldLevel::Low => text.red().to_string(),
        }
    }

    pub(crate) fn timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
        dt.format("%Y-%m-%d %H:%M").to_string().dimmed().to_string()
    }
}

/// Strip ANSI escape codes for visible-width calculation.
pub(crate) fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            result.push(c);
        }
    }
    result
}

/// Terminal rows `line` occupies at `width` columns.
pub(crate) fn rows_for(line: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let visible = strip_ansi(line).chars().count();
    let rows = visible.div_ceil(width).max(1);
    u16::try_from(rows).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_color_codes() {
        assert_eq!(strip_ansi("\x1b[31mHigh\x1b[0m risk"), "High risk");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn rows_account_for_wrapping() {
        assert_eq!(rows_for("", 80), 1);
        assert_eq!(rows_for(&"x".repeat(80), 80), 1);
        assert_eq!(rows_for(&"x".repeat(81), 80), 2);
        assert_eq!(rows_for("\x1b[1mabc\x1b[0m", 2), 2);
    }
}
