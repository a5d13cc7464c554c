//! Logging front-end
//!
//! `Logger` turns calls into `Record`s and hands them to a `Handler`. It checks
//! `enabled` first, so disabled levels cost no allocation or formatting.

use super::{
    context::Context,
    error::Result,
    handler::Handler,
    log_level::LogLevel,
    record::Record,
    value::Attr,
};
use std::fmt;
use std::sync::Arc;

/// Cheaply cloneable front-end over a shared handler
///
/// # Example
///
/// ```
/// use rust_color_handler::prelude::*;
///
/// let (sink, buffer) = SharedSink::memory();
/// let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Debug));
///
/// let requests = logger.with_group("http").with([Attr::string("method", "GET")]);
/// requests.info("served", [Attr::uint("status", 200)]).unwrap();
///
/// let out = buffer.contents_string();
/// assert!(out.contains("http.status"));
/// assert!(out.contains("http.method"));
/// ```
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(&Context::background(), level)
    }

    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<()> {
        self.log_ctx(&Context::background(), level, message, attrs)
    }

    /// Log under a caller context
    ///
    /// A cancelled context disables every level, so nothing is written and
    /// `Ok` is returned. Use `log_record` to observe the cancellation error.
    pub fn log_ctx(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) -> Result<()> {
        if !self.handler.enabled(ctx, level) {
            return Ok(());
        }
        let record = Record::new(level, message).with_attrs(attrs);
        self.handler.handle(ctx, &record)
    }

    /// Hand a prepared record straight to the handler, skipping `enabled`
    pub fn log_record(&self, ctx: &Context, record: &Record) -> Result<()> {
        self.handler.handle(ctx, record)
    }

    pub fn trace(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Result<()> {
        self.log(LogLevel::Trace, message, attrs)
    }

    pub fn debug(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Result<()> {
        self.log(LogLevel::Debug, message, attrs)
    }

    pub fn info(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Result<()> {
        self.log(LogLevel::Info, message, attrs)
    }

    pub fn warn(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Result<()> {
        self.log(LogLevel::Warn, message, attrs)
    }

    pub fn error(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Result<()> {
        self.log(LogLevel::Error, message, attrs)
    }

    /// A logger whose records carry `attrs` after their own attributes
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Logger {
        let attrs: Vec<Attr> = attrs.into_iter().collect();
        if attrs.is_empty() {
            return self.clone();
        }
        Self::from_handler(self.handler.with_attrs(attrs))
    }

    /// A logger whose keys are qualified by `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        Self::from_handler(self.handler.with_group(name))
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
