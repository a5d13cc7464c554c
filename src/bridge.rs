//! `log` facade bridge
//!
//! Routes records from the `log` crate's macros into any `Handler`, so
//! libraries that log through the facade share the colored output.

use crate::core::{Attr, Context, Handler, LogLevel, LoggerError, Record, Result, Value};
use log::kv::{self, VisitSource};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Adapter implementing `log::Log` over a `Handler`
///
/// `log::Log::log` cannot return errors, so failed records are counted
/// instead.
///
/// # Example
///
/// ```
/// use rust_color_handler::bridge::LogBridge;
/// use rust_color_handler::prelude::*;
///
/// let (sink, buffer) = SharedSink::memory();
/// let bridge = LogBridge::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Info));
///
/// log::Log::log(
///     &bridge,
///     &log::Record::builder()
///         .level(log::Level::Warn)
///         .args(format_args!("disk at {}%", 91))
///         .build(),
/// );
/// assert!(buffer.contents_string().contains("disk at 91%"));
/// ```
pub struct LogBridge {
    handler: Arc<dyn Handler>,
    failed: AtomicU64,
}

impl LogBridge {
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self::from_handler(Arc::new(handler))
    }

    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            failed: AtomicU64::new(0),
        }
    }

    /// Records the handler failed to write
    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Install as the process-wide `log` backend
    ///
    /// Fails if another logger was installed first.
    pub fn init(self, max_level: log::LevelFilter) -> Result<()> {
        log::set_boxed_logger(Box::new(self))
            .map_err(|e| LoggerError::config("LogBridge", e.to_string()))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

/// Map a facade level onto the handler's levels
pub fn level_from_log(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.handler
            .enabled(&Context::background(), level_from_log(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut attrs = Vec::new();
        let _ = record
            .key_values()
            .visit(&mut AttrCollector { attrs: &mut attrs });

        let target = record.target();
        if record.module_path() != Some(target) && !target.is_empty() {
            attrs.push(Attr::string("target", target));
        }

        let message = match record.args().as_str() {
            Some(text) => text.to_string(),
            None => record.args().to_string(),
        };
        let converted = Record::new(level_from_log(record.level()), message).with_attrs(attrs);

        if self
            .handler
            .handle(&Context::background(), &converted)
            .is_err()
        {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn flush(&self) {
        let _ = self.handler.flush();
    }
}

struct AttrCollector<'a> {
    attrs: &'a mut Vec<Attr>,
}

impl<'kvs> VisitSource<'kvs> for AttrCollector<'_> {
    fn visit_pair(
        &mut self,
        key: kv::Key<'kvs>,
        value: kv::Value<'kvs>,
    ) -> std::result::Result<(), kv::Error> {
        self.attrs.push(Attr::new(key.as_str(), convert(&value)));
        Ok(())
    }
}

fn convert(value: &kv::Value<'_>) -> Value {
    if let Some(b) = value.to_bool() {
        Value::Bool(b)
    } else if let Some(i) = value.to_i64() {
        Value::Int(i)
    } else if let Some(u) = value.to_u64() {
        Value::Uint(u)
    } else if let Some(f) = value.to_f64() {
        Value::Float(f)
    } else if let Some(s) = value.to_borrowed_str() {
        Value::String(s.to_string())
    } else {
        Value::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColorHandler, MemoryBuffer, SharedSink, TimestampFormat};
    use log::Log;

    fn bridge(level: LogLevel) -> (LogBridge, MemoryBuffer) {
        let (sink, buffer) = SharedSink::memory();
        let handler = ColorHandler::new(sink, TimestampFormat::Unix, level);
        (LogBridge::new(handler), buffer)
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_from_log(log::Level::Error), LogLevel::Error);
        assert_eq!(level_from_log(log::Level::Trace), LogLevel::Trace);
    }

    #[test]
    fn test_enabled_follows_handler() {
        let (bridge, _) = bridge(LogLevel::Warn);
        let info = log::Metadata::builder().level(log::Level::Info).build();
        let error = log::Metadata::builder().level(log::Level::Error).build();
        assert!(!bridge.enabled(&info));
        assert!(bridge.enabled(&error));
    }

    #[test]
    fn test_key_values_become_attrs() {
        let (bridge, buffer) = bridge(LogLevel::Debug);
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .target("server")
                .module_path(Some("server"))
                .args(format_args!("listening"))
                .key_values(&[("port", 8080)])
                .build(),
        );

        let out = buffer.contents_string();
        assert!(out.contains("\x1b[1;36mINFO \x1b[0mlistening\x1b[0m"));
        assert!(out.contains(" \x1b[0;32mport\x1b[0m->\x1b[0;93m8080\x1b[0m"));
        assert!(!out.contains("target"));
    }

    #[test]
    fn test_foreign_target_is_recorded() {
        let (bridge, buffer) = bridge(LogLevel::Info);
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Error)
                .target("db::pool")
                .module_path(Some("app::db"))
                .args(format_args!("exhausted"))
                .build(),
        );
        assert!(buffer
            .contents_string()
            .contains(" \x1b[0;32mtarget\x1b[0m->\x1b[0;93mdb::pool\x1b[0m"));
    }

    #[test]
    fn test_failures_are_counted() {
        struct Closed;
        impl std::io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let handler = ColorHandler::new(SharedSink::new(Closed), TimestampFormat::Unix, LogLevel::Info);
        let bridge = LogBridge::new(handler);
        bridge.log(
            &log::Record::builder()
                .level(log::Level::Info)
                .args(format_args!("lost"))
                .build(),
        );
        assert_eq!(bridge.failed_count(), 1);
    }
}
