//! ANSI escape sequences used by the handler
//!
//! Colors are named with `colored::Color` and turned into SGR sequences once.
//! The output never depends on terminal detection or environment variables:
//! a record always renders to the same bytes.

use super::log_level::LogLevel;
use colored::Color;
use std::sync::OnceLock;

/// Resets every SGR attribute
pub const RESET: &str = "\x1b[0m";

/// SGR attribute placed in front of the foreground color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// Foreground only: `ESC[33m`
    Plain,
    /// Reset then foreground: `ESC[0;32m`
    Normal,
    /// Bold then foreground: `ESC[1;34m`
    Bold,
}

/// Build the escape sequence selecting `color` as foreground
pub fn sgr(weight: Weight, color: Color) -> String {
    let fg = color.to_fg_str();
    match weight {
        Weight::Plain => format!("\x1b[{}m", fg),
        Weight::Normal => format!("\x1b[0;{}m", fg),
        Weight::Bold => format!("\x1b[1;{}m", fg),
    }
}

/// Precomputed sequences for every fragment the handler writes
#[derive(Debug)]
pub struct Palette {
    pub timestamp: String,
    pub key: String,
    pub scalar: String,
    pub true_literal: String,
    pub false_literal: String,
    pub temporal: String,
    labels: [Option<String>; 6],
}

impl Palette {
    fn build() -> Self {
        let levels = [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Fatal,
        ];
        let labels = levels.map(|level| {
            level
                .color_code()
                .map(|color| format!("{}{} {}", sgr(Weight::Bold, color), level.to_str(), RESET))
        });

        Self {
            timestamp: sgr(Weight::Plain, Color::Yellow),
            key: sgr(Weight::Normal, Color::Green),
            scalar: sgr(Weight::Normal, Color::BrightYellow),
            true_literal: format!("{}true{}", sgr(Weight::Normal, Color::Green), RESET),
            false_literal: format!("{}false{}", sgr(Weight::Normal, Color::Red), RESET),
            temporal: sgr(Weight::Plain, Color::Yellow),
            labels,
        }
    }

    /// Colored label for `level`, or `None` when the level has no label
    pub fn label(&self, level: LogLevel) -> Option<&str> {
        self.labels[level as usize].as_deref()
    }
}

/// The process-wide palette
pub fn palette() -> &'static Palette {
    static PALETTE: OnceLock<Palette> = OnceLock::new();
    PALETTE.get_or_init(Palette::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgr_weights() {
        assert_eq!(sgr(Weight::Plain, Color::Yellow), "\x1b[33m");
        assert_eq!(sgr(Weight::Normal, Color::Green), "\x1b[0;32m");
        assert_eq!(sgr(Weight::Bold, Color::BrightRed), "\x1b[1;91m");
    }

    #[test]
    fn test_level_labels() {
        let p = palette();
        assert_eq!(p.label(LogLevel::Debug), Some("\x1b[1;34mDEBUG \x1b[0m"));
        assert_eq!(p.label(LogLevel::Info), Some("\x1b[1;36mINFO \x1b[0m"));
        assert_eq!(p.label(LogLevel::Warn), Some("\x1b[1;31mWARN \x1b[0m"));
        assert_eq!(p.label(LogLevel::Error), Some("\x1b[1;91mERROR \x1b[0m"));
        assert_eq!(p.label(LogLevel::Trace), None);
        assert_eq!(p.label(LogLevel::Fatal), None);
    }

    #[test]
    fn test_literals() {
        let p = palette();
        assert_eq!(p.true_literal, "\x1b[0;32mtrue\x1b[0m");
        assert_eq!(p.false_literal, "\x1b[0;31mfalse\x1b[0m");
        assert_eq!(p.scalar, "\x1b[0;93m");
        assert_eq!(p.key, "\x1b[0;32m");
    }
}
