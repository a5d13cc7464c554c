//! Core handler types and traits

pub mod context;
pub mod error;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod palette;
pub mod record;
pub mod render;
pub mod shape;
pub mod sink;
pub mod structured_builder;
pub mod timestamp;
pub mod value;

pub use context::Context;
pub use error::{LoggerError, Result};
pub use handler::{ColorHandler, Handler, HandlerBuilder};
pub use log_level::{LevelVar, LogLevel};
pub use logger::Logger;
pub use metrics::HandlerMetrics;
pub use record::Record;
pub use render::Chunk;
pub use shape::{ChanDir, ChannelInfo, Complex, Field, FuncInfo, Loggable, Shape, StructBuilder};
pub use sink::{MemoryBuffer, SharedSink};
pub use structured_builder::RecordBuilder;
pub use timestamp::{format_duration, HandlerConfig, TimestampFormat};
pub use value::{Attr, LazyValue, LogValuer, Value, MAX_LAZY_RESOLUTIONS};
