//! # Rust Color Handler
//!
//! A structured log record handler that writes each record as one
//! ANSI-colored terminal line.
//!
//! ## Features
//!
//! - **Nested values**: groups, structs, sequences, maps, channels, functions
//!   and lazily computed values flatten into dotted `key->value` pairs
//! - **Copy-on-derive handlers**: bound attributes and group prefixes never
//!   change the handler they were derived from
//! - **Line atomicity**: concurrent records sharing a sink never interleave
//! - **`log` bridge**: route the `log` facade through the same output
//!
//! ## Example
//!
//! ```
//! use rust_color_handler::prelude::*;
//!
//! let (sink, buffer) = SharedSink::memory();
//! let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Debug));
//!
//! logger
//!     .info("a test message", [Attr::any("ports", &[80_u16, 443])])
//!     .unwrap();
//!
//! let line = buffer.contents_string();
//! assert!(line.contains("ports[0]"));
//! assert!(line.ends_with('\n'));
//! ```

#[cfg(feature = "log-bridge")]
pub mod bridge;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Attr, ColorHandler, Context, Handler, HandlerBuilder, HandlerConfig, LevelVar, LogLevel,
        Loggable, Logger, LoggerError, MemoryBuffer, Record, Result, Shape, SharedSink,
        TimestampFormat, Value,
    };
}

#[cfg(feature = "log-bridge")]
pub use bridge::LogBridge;
pub use crate::core::{
    Attr, ColorHandler, Context, Handler, HandlerBuilder, HandlerConfig, HandlerMetrics, LazyValue,
    LevelVar, LogLevel, LogValuer, Loggable, Logger, LoggerError, MemoryBuffer, Record,
    RecordBuilder, Result, Shape, SharedSink, TimestampFormat, Value,
};
