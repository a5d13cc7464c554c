//! Log record structure

use super::log_level::LogLevel;
use super::value::Attr;
use chrono::{DateTime, Utc};

/// One structured log event, owned by the front-end
#[derive(Debug, Clone)]
pub struct Record {
    pub level: LogLevel,
    pub time: DateTime<Utc>,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl Record {
    /// A record stamped with the current time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            time: Utc::now(),
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    #[must_use]
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }
}
