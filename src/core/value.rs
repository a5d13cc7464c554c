//! Attribute values
//!
//! This module provides:
//! - `Value`: the tagged value carried by an attribute
//! - `Attr`: a key paired with a `Value`
//! - `LazyValue` / `LogValuer`: values computed on demand, at most once

use super::shape::{Loggable, Shape};
use super::timestamp::format_duration;
use chrono::{DateTime, SecondsFormat, Utc};
use std::borrow::Cow;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime};

/// Hops allowed through chains of lazy values before giving up
pub const MAX_LAZY_RESOLUTIONS: usize = 100;

/// Tagged attribute value
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Ordered sub-attributes, rendered under the attribute's key
    Group(Vec<Attr>),
    /// Computed on first use
    Lazy(LazyValue),
    /// Opaque value rendered by its shape
    Any(Shape),
}

impl Value {
    /// Capture `value` by its shape
    pub fn any<T: Loggable + ?Sized>(value: &T) -> Self {
        Value::Any(value.shape())
    }

    /// Defer computing the value until it is rendered
    pub fn lazy(valuer: impl LogValuer + 'static) -> Self {
        Value::Lazy(LazyValue::new(valuer))
    }

    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Self {
        Value::Group(attrs.into_iter().collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Duration(d) => write!(f, "{}", format_duration(*d)),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Value::Group(attrs) => {
                write!(f, "[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}={}", attr.key, attr.value)?;
                }
                write!(f, "]")
            }
            Value::Lazy(lazy) => write!(f, "{}", lazy.resolve()),
            Value::Any(shape) => write!(f, "{}", shape),
        }
    }
}

macro_rules! value_from {
    ($variant:ident: $($ty:ty),+ => $target:ty) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

value_from!(Int: i8, i16, i32, i64, isize => i64);
value_from!(Uint: u8, u16, u32, u64, usize => u64);
value_from!(Float: f32, f64 => f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::String(s.into_owned())
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<SystemTime> for Value {
    fn from(t: SystemTime) -> Self {
        Value::Time(t.into())
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}

impl From<LazyValue> for Value {
    fn from(lazy: LazyValue) -> Self {
        Value::Lazy(lazy)
    }
}

impl From<Shape> for Value {
    fn from(shape: Shape) -> Self {
        Value::Any(shape)
    }
}

/// A key/value pair attached to a record or bound to a handler
#[derive(Debug, Clone)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::Int(value))
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::Uint(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::Float(value))
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(value))
    }

    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(key, Value::group(attrs))
    }

    /// Attribute rendered by the shape of `value`
    pub fn any<T: Loggable + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        Self::new(key, Value::any(value))
    }

    pub fn lazy(key: impl Into<String>, valuer: impl LogValuer + 'static) -> Self {
        Self::new(key, Value::lazy(valuer))
    }
}

/// Produces a value on demand
///
/// Closures returning a `Value` implement this trait.
pub trait LogValuer: Send + Sync {
    fn log_value(&self) -> Value;
}

impl<F> LogValuer for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn log_value(&self) -> Value {
        self()
    }
}

/// A value evaluated at most once.
///
/// Clones share the evaluation: whichever clone is rendered first runs the
/// valuer and every later render reuses its result.
#[derive(Clone)]
pub struct LazyValue {
    valuer: Arc<dyn LogValuer>,
    resolved: Arc<OnceLock<Value>>,
}

impl LazyValue {
    pub fn new(valuer: impl LogValuer + 'static) -> Self {
        Self {
            valuer: Arc::new(valuer),
            resolved: Arc::new(OnceLock::new()),
        }
    }

    /// Whether the valuer has already run
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Resolve through any chain of lazy values to a concrete value.
    ///
    /// A chain longer than `MAX_LAZY_RESOLUTIONS` yields a string value
    /// describing the problem.
    pub fn resolve(&self) -> Cow<'_, Value> {
        let mut current = self.direct();
        for _ in 1..MAX_LAZY_RESOLUTIONS {
            match current {
                Value::Lazy(next) => current = next.direct(),
                value => return Cow::Borrowed(value),
            }
        }
        match current {
            Value::Lazy(_) => Cow::Owned(Value::String(format!(
                "LogValue called too many times on Value of type {}",
                std::any::type_name::<LazyValue>()
            ))),
            value => Cow::Borrowed(value),
        }
    }

    /// This value's own result, which may itself be lazy
    fn direct(&self) -> &Value {
        self.resolved.get_or_init(|| {
            match catch_unwind(AssertUnwindSafe(|| self.valuer.log_value())) {
                Ok(value) => value,
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    Value::String(format!("LogValue panicked: {}", panic_msg))
                }
            }
        })
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolved.get() {
            Some(value) => f.debug_tuple("LazyValue").field(value).finish(),
            None => f.write_str("LazyValue(<unresolved>)"),
        }
    }
}
