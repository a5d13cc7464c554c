//! Fluent record construction
//!
//! Provides a builder for records whose attributes are easier to add one at a
//! time than to collect up front.

use super::context::Context;
use super::error::Result;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::record::Record;
use super::shape::Loggable;
use super::value::{Attr, Value};
use chrono::{DateTime, Utc};

/// Builder for a single record
///
/// # Example
///
/// ```
/// use rust_color_handler::prelude::*;
///
/// let (sink, buffer) = SharedSink::memory();
/// let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Info));
///
/// logger.info_builder()
///     .message("Request processed")
///     .attr("user_id", 12345)
///     .attr("latency_ms", 42.5)
///     .any("path", &vec!["api", "v1"])
///     .log()
///     .unwrap();
///
/// assert!(buffer.contents_string().contains("path[1]"));
/// ```
#[must_use = "a record builder does nothing until `log` is called"]
pub struct RecordBuilder<'a> {
    logger: &'a Logger,
    ctx: Option<Context>,
    record: Record,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(logger: &'a Logger, level: LogLevel) -> Self {
        Self {
            logger,
            ctx: None,
            record: Record::new(level, String::new()),
        }
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.record.message = msg.into();
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.record.add_attr(Attr::new(key, value));
        self
    }

    /// Add an attribute rendered by the value's shape
    pub fn any<T: Loggable + ?Sized>(mut self, key: impl Into<String>, value: &T) -> Self {
        self.record.add_attr(Attr::any(key, value));
        self
    }

    pub fn group(mut self, key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.record.add_attr(Attr::group(key, attrs));
        self
    }

    /// Override the record time, which defaults to when the builder was created
    pub fn at(mut self, time: DateTime<Utc>) -> Self {
        self.record.time = time;
        self
    }

    pub fn context(mut self, ctx: Context) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Send the record, subject to the handler's level check
    pub fn log(self) -> Result<()> {
        let ctx = self.ctx.unwrap_or_default();
        if !self.logger.handler().enabled(&ctx, self.record.level) {
            return Ok(());
        }
        self.logger.log_record(&ctx, &self.record)
    }
}

impl Logger {
    pub fn trace_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Trace)
    }

    pub fn debug_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Debug)
    }

    pub fn info_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Info)
    }

    pub fn warn_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Warn)
    }

    pub fn error_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColorHandler, SharedSink, TimestampFormat};
    use chrono::TimeZone;

    #[test]
    fn test_builder_writes_attrs_in_order() {
        let (sink, buffer) = SharedSink::memory();
        let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Unix, LogLevel::Debug));

        logger
            .warn_builder()
            .message("disk")
            .attr("free_pct", 3_u8)
            .group("mount", [Attr::string("path", "/var")])
            .at(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
            .log()
            .unwrap();

        let out = buffer.contents_string();
        assert!(out.starts_with("\x1b[33m1700000000 \x1b[1;31mWARN \x1b[0mdisk"));
        let free = out.find("free_pct").unwrap();
        let path = out.find("mount.path").unwrap();
        assert!(free < path);
    }

    #[test]
    fn test_builder_respects_level_and_context() {
        let (sink, buffer) = SharedSink::memory();
        let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Unix, LogLevel::Info));

        logger.debug_builder().message("hidden").log().unwrap();

        let ctx = Context::cancellable();
        ctx.cancel();
        logger.error_builder().message("hidden").context(ctx).log().unwrap();

        assert!(buffer.is_empty());
    }
}
