//! Record handler
//!
//! `Handler` is the seam between a logging front-end and an output backend.
//! `ColorHandler` is the ANSI terminal backend: one colored line per record.

use super::{
    context::Context,
    error::{LoggerError, Result},
    log_level::{LevelVar, LogLevel},
    metrics::HandlerMetrics,
    record::Record,
    render::Emitter,
    sink::SharedSink,
    timestamp::{HandlerConfig, TimestampFormat},
    value::Attr,
};
use std::sync::Arc;

/// A pluggable record backend
///
/// Derivation (`with_attrs`, `with_group`) returns a new handler and never
/// changes the receiver.
pub trait Handler: Send + Sync {
    /// Whether a record at `level` would be written
    fn enabled(&self, ctx: &Context, level: LogLevel) -> bool;

    fn handle(&self, ctx: &Context, record: &Record) -> Result<()>;

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler>;

    fn with_group(&self, name: &str) -> Arc<dyn Handler>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Writes records as ANSI-colored lines
///
/// Cloning is cheap: the sink, bound attributes and metrics are shared.
///
/// # Example
///
/// ```
/// use rust_color_handler::core::{ColorHandler, Context, Handler, LogLevel, Record, SharedSink};
///
/// let (sink, buffer) = SharedSink::memory();
/// let handler = ColorHandler::new(sink, Default::default(), LogLevel::Debug);
///
/// handler.handle(&Context::background(), &Record::new(LogLevel::Info, "ready")).unwrap();
/// assert!(buffer.contents_string().contains("\x1b[1;36mINFO \x1b[0mready\x1b[0m"));
/// ```
#[derive(Debug, Clone)]
pub struct ColorHandler {
    sink: SharedSink,
    timestamp_format: TimestampFormat,
    time_format: TimestampFormat,
    level: LevelVar,
    attrs: Arc<Vec<Attr>>,
    /// Dot-joined group path prefixed to every key
    group: Option<Arc<str>>,
    metrics: Arc<HandlerMetrics>,
}

impl ColorHandler {
    pub fn new(sink: SharedSink, timestamp_format: TimestampFormat, min_level: LogLevel) -> Self {
        Self {
            sink,
            timestamp_format,
            time_format: TimestampFormat::Rfc822,
            level: LevelVar::new(min_level),
            attrs: Arc::new(Vec::new()),
            group: None,
            metrics: Arc::new(HandlerMetrics::new()),
        }
    }

    /// Build from a validated `HandlerConfig`
    pub fn from_config(sink: SharedSink, config: &HandlerConfig) -> Result<Self> {
        config.validate()?;
        let mut handler = Self::new(sink, config.timestamp_format.clone(), config.min_level);
        handler.time_format = config.time_format.clone();
        Ok(handler)
    }

    #[must_use]
    pub fn builder() -> HandlerBuilder {
        HandlerBuilder::new()
    }

    /// A copy whose bound attributes are the current ones followed by `extra`
    #[must_use]
    pub fn bind_attributes(&self, extra: impl IntoIterator<Item = Attr>) -> Self {
        let mut extra = extra.into_iter().peekable();
        if extra.peek().is_none() {
            return self.clone();
        }

        let mut attrs = Vec::with_capacity(self.attrs.len());
        attrs.extend(self.attrs.iter().cloned());
        attrs.extend(extra);

        Self {
            attrs: Arc::new(attrs),
            ..self.clone()
        }
    }

    /// A copy whose group path ends with `name`
    ///
    /// The group prefixes every key this handler writes, including attributes
    /// bound before the group was entered. An empty name changes nothing.
    #[must_use]
    pub fn enter_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }

        let group = match &self.group {
            Some(current) => format!("{}.{}", current, name),
            None => name.to_string(),
        };

        Self {
            group: Some(Arc::from(group)),
            ..self.clone()
        }
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.metrics
    }

    pub fn sink(&self) -> &SharedSink {
        &self.sink
    }

    pub fn min_level(&self) -> LogLevel {
        self.level.get()
    }

    /// The shared threshold; `set` on it affects every derived handler
    pub fn level_var(&self) -> &LevelVar {
        &self.level
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }
}

impl Handler for ColorHandler {
    fn enabled(&self, ctx: &Context, level: LogLevel) -> bool {
        !ctx.is_cancelled() && level >= self.level.get()
    }

    fn handle(&self, ctx: &Context, record: &Record) -> Result<()> {
        if let Some(reason) = ctx.err() {
            self.metrics.record_cancelled();
            return Err(LoggerError::cancelled(reason));
        }

        let timestamp = match self.timestamp_format.format(&record.time) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                self.metrics.record_failed();
                return Err(e);
            }
        };

        let group = self.group.as_deref();
        let (written, result) = self.sink.with_writer(|out| {
            let mut emitter = Emitter::new(out, group, &self.time_format);
            let result = emitter.record(record, &timestamp, &self.attrs);
            (emitter.written(), result)
        });

        match &result {
            Ok(()) => {
                self.metrics.record_handled(written);
            }
            Err(_) => {
                self.metrics.record_failed();
                self.metrics.record_partial_bytes(written);
            }
        }
        result
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        Arc::new(self.bind_attributes(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.enter_group(name))
    }

    fn flush(&self) -> Result<()> {
        self.sink.flush()
    }
}

/// Builder for `ColorHandler`
///
/// # Example
///
/// ```
/// use rust_color_handler::core::{ColorHandler, LogLevel, SharedSink};
///
/// let handler = ColorHandler::builder()
///     .sink(SharedSink::stderr())
///     .custom_timestamp("%H:%M:%S")
///     .min_level(LogLevel::Debug)
///     .build()
///     .unwrap();
/// assert_eq!(handler.min_level(), LogLevel::Debug);
/// ```
#[derive(Debug, Default)]
pub struct HandlerBuilder {
    sink: Option<SharedSink>,
    timestamp_format: TimestampFormat,
    time_format: Option<TimestampFormat>,
    level: Option<LevelVar>,
}

impl HandlerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output destination; stdout when not set
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Format of the timestamp that opens every record
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }

    /// Format of time-valued attributes
    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = Some(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.level = Some(LevelVar::new(level));
        self
    }

    /// Share a threshold that can be changed after the handler is built
    #[must_use = "builder methods return a new value"]
    pub fn level_var(mut self, level: LevelVar) -> Self {
        self.level = Some(level);
        self
    }

    pub fn build(self) -> Result<ColorHandler> {
        let time_format = self.time_format.unwrap_or(TimestampFormat::Rfc822);
        self.timestamp_format.validate()?;
        time_format.validate()?;

        let mut handler = ColorHandler::new(
            self.sink.unwrap_or_else(SharedSink::stdout),
            self.timestamp_format,
            LogLevel::Info,
        );
        handler.time_format = time_format;
        if let Some(level) = self.level {
            handler.level = level;
        }
        Ok(handler)
    }
}
