//! Logging macros for ergonomic message formatting.
//!
//! The level macros format their message like `format!`. Attributes follow a
//! `;` as `key => value` pairs.
//!
//! # Examples
//!
//! ```
//! use rust_color_handler::prelude::*;
//! use rust_color_handler::{attrs, info, warn};
//!
//! let (sink, buffer) = SharedSink::memory();
//! let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Info));
//!
//! info!(logger, "Server started").unwrap();
//!
//! let port = 8080;
//! info!(logger, "Listening on port {}", port; "tls" => true).unwrap();
//!
//! let db = logger.with(attrs!["pool" => "primary"]);
//! warn!(db, "Slow query"; "ms" => 1250_u64, "rows" => 3).unwrap();
//!
//! assert_eq!(buffer.contents_string().lines().count(), 3);
//! ```

/// Build a `Vec<Attr>` from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use rust_color_handler::attrs;
///
/// let attrs = attrs!["user" => "ana", "admin" => false];
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs[0].key, "user");
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        ::std::vec::Vec::<$crate::core::Attr>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$($crate::core::Attr::new($key, $value)),+]
    };
}

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_color_handler::prelude::*;
/// # let (sink, _buffer) = SharedSink::memory();
/// # let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Info));
/// use rust_color_handler::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500; "retry" => false).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log($level, format!($fmt $(, $arg)*), $crate::attrs![$($key => $value),+])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), $crate::attrs![])
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_color_handler::prelude::*;
/// # let (sink, _buffer) = SharedSink::memory();
/// # let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Debug));
/// use rust_color_handler::debug;
/// debug!(logger, "Counter value: {}", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_color_handler::prelude::*;
/// # let (sink, buffer) = SharedSink::memory();
/// # let logger = Logger::new(ColorHandler::new(sink, TimestampFormat::Console, LogLevel::Info));
/// use rust_color_handler::error;
/// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
/// error!(logger, "Failed to load config"; "cause" => err.to_string()).unwrap();
/// assert!(buffer.contents_string().contains("ERROR"));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Error, $($arg)+)
    };
}

/// Implement `Loggable` for a struct by listing its rendered fields.
///
/// Listed fields are rendered under their own names; unlisted fields are
/// never rendered.
///
/// # Examples
///
/// ```
/// use rust_color_handler::core::{Loggable, Shape};
/// use rust_color_handler::loggable_struct;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// loggable_struct!(Point { x, y });
///
/// assert!(matches!(Point { x: 1, y: 2 }.shape(), Shape::Struct(fields) if fields.len() == 2));
/// ```
#[macro_export]
macro_rules! loggable_struct {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::core::Loggable for $ty {
            fn shape(&self) -> $crate::core::Shape {
                $crate::core::Shape::structure()
                    $(.field(stringify!($field), &self.$field))*
                    .build()
            }
        }
    };
}
