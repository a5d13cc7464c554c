//! Log level definitions

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Record severity.
///
/// The handler prints a label for `Debug` through `Error`. `Trace` and
/// `Fatal` take part in threshold comparisons but print no label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Label color, if this level has a label
    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Some(Blue),
            LogLevel::Info => Some(Cyan),
            LogLevel::Warn => Some(Red),
            LogLevel::Error => Some(BrightRed),
            LogLevel::Trace | LogLevel::Fatal => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// A threshold that can be changed while handlers are running.
///
/// Clones share the same cell, so every handler built from one `LevelVar`
/// observes `set` immediately.
#[derive(Debug, Clone, Default)]
pub struct LevelVar {
    level: Arc<RwLock<LogLevel>>,
}

impl LevelVar {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: Arc::new(RwLock::new(level)),
        }
    }

    #[inline]
    pub fn get(&self) -> LogLevel {
        *self.level.read()
    }

    pub fn set(&self, level: LogLevel) {
        *self.level.write() = level;
    }
}

impl From<LogLevel> for LevelVar {
    fn from(level: LogLevel) -> Self {
        LevelVar::new(level)
    }
}
