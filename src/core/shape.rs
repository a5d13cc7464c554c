//! Value shapes and the `Loggable` capability
//!
//! A `Shape` is the structural description of an opaque value: a scalar, an
//! indirection, a sequence, a map, a struct, a channel, a function, a complex
//! number or a raw address. Types opt in to rendering by implementing
//! `Loggable`; the renderer walks the shape, never the value itself.

use super::timestamp::format_duration;
use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Structural description of a value
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Absent value, such as `None` or a null indirection
    Nil,
    /// A reference to another value
    Indirect(Box<Shape>),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    /// Raw machine address
    Address(usize),
    Complex(Complex),
    /// Indexable sequence
    Seq(Vec<Shape>),
    /// Key/value entries in the source collection's iteration order
    Map(Vec<(Shape, Shape)>),
    Struct(Vec<Field>),
    Channel(ChannelInfo),
    Func(FuncInfo),
}

impl Shape {
    /// Follow indirections until reaching a value that is not one
    pub fn deref(&self) -> &Shape {
        let mut current = self;
        while let Shape::Indirect(inner) = current {
            current = inner.as_ref();
        }
        current
    }

    /// Start describing a struct
    pub fn structure() -> StructBuilder {
        StructBuilder::default()
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.deref(), Shape::Nil)
    }
}

/// `0x`-prefixed lowercase hex
pub fn hex_address(address: usize) -> String {
    format!("0x{:x}", address)
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Nil => write!(f, "<nil>"),
            Shape::Indirect(inner) => write!(f, "{}", inner),
            Shape::Bool(b) => write!(f, "{}", b),
            Shape::Int(i) => write!(f, "{}", i),
            Shape::Uint(u) => write!(f, "{}", u),
            Shape::Float(fl) => write!(f, "{}", fl),
            Shape::Str(s) => write!(f, "{}", s),
            Shape::Address(a) => write!(f, "{}", hex_address(*a)),
            Shape::Complex(c) => write!(f, "{}", c),
            Shape::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Shape::Map(entries) => {
                write!(f, "map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                write!(f, "]")
            }
            Shape::Struct(fields) => {
                write!(f, "{{")?;
                let mut first = true;
                for field in fields.iter().filter(|field| field.exported) {
                    if !first {
                        write!(f, " ")?;
                    }
                    first = false;
                    write!(f, "{}:{}", field.name, field.value)?;
                }
                write!(f, "}}")
            }
            Shape::Channel(ch) => write!(f, "{}", hex_address(ch.address)),
            Shape::Func(func) => write!(f, "{}", hex_address(func.address)),
        }
    }
}

/// A struct field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Only exported fields are rendered
    pub exported: bool,
    pub value: Shape,
}

/// Builder for `Shape::Struct`
///
/// # Example
///
/// ```
/// use rust_color_handler::core::{Loggable, Shape};
///
/// struct Account {
///     id: u64,
///     secret: String,
/// }
///
/// impl Loggable for Account {
///     fn shape(&self) -> Shape {
///         Shape::structure()
///             .field("ID", &self.id)
///             .private_field("secret", &self.secret)
///             .build()
///     }
/// }
/// ```
#[derive(Debug, Default)]
pub struct StructBuilder {
    fields: Vec<Field>,
}

impl StructBuilder {
    #[must_use]
    pub fn field<T: Loggable + ?Sized>(mut self, name: impl Into<String>, value: &T) -> Self {
        self.fields.push(Field {
            name: name.into(),
            exported: true,
            value: value.shape(),
        });
        self
    }

    /// A field that is described but never rendered
    #[must_use]
    pub fn private_field<T: Loggable + ?Sized>(
        mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            exported: false,
            value: value.shape(),
        });
        self
    }

    pub fn build(self) -> Shape {
        Shape::Struct(self.fields)
    }
}

/// Complex number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "({}{}i)", self.re, self.im)
        } else {
            write!(f, "({}+{}i)", self.re, self.im)
        }
    }
}

/// Which ends of a channel a value holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Recv,
    Send,
}

impl ChanDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChanDir::Both => "bidirectional",
            ChanDir::Recv => "receiver",
            ChanDir::Send => "sender",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInfo {
    pub dir: ChanDir,
    pub elem_type: String,
    pub address: usize,
    pub len: usize,
    /// `None` for unbounded channels
    pub cap: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncInfo {
    pub signature: String,
    pub address: usize,
}

/// Types that can describe themselves for rendering
pub trait Loggable {
    fn shape(&self) -> Shape;
}

impl Loggable for Shape {
    fn shape(&self) -> Shape {
        self.clone()
    }
}

macro_rules! loggable_scalar {
    ($variant:ident: $($ty:ty),+ => $target:ty) => {
        $(
            impl Loggable for $ty {
                fn shape(&self) -> Shape {
                    Shape::$variant(*self as $target)
                }
            }
        )+
    };
}

loggable_scalar!(Int: i8, i16, i32, i64, isize => i64);
loggable_scalar!(Uint: u8, u16, u32, u64, usize => u64);
loggable_scalar!(Float: f32, f64 => f64);

impl Loggable for bool {
    fn shape(&self) -> Shape {
        Shape::Bool(*self)
    }
}

impl Loggable for char {
    fn shape(&self) -> Shape {
        Shape::Str(self.to_string())
    }
}

impl Loggable for str {
    fn shape(&self) -> Shape {
        Shape::Str(self.to_string())
    }
}

impl Loggable for String {
    fn shape(&self) -> Shape {
        Shape::Str(self.clone())
    }
}

impl Loggable for Cow<'_, str> {
    fn shape(&self) -> Shape {
        Shape::Str(self.to_string())
    }
}

impl Loggable for Duration {
    fn shape(&self) -> Shape {
        Shape::Str(format_duration(*self))
    }
}

impl Loggable for DateTime<Utc> {
    fn shape(&self) -> Shape {
        Shape::Str(self.to_rfc3339())
    }
}

impl Loggable for Complex {
    fn shape(&self) -> Shape {
        Shape::Complex(*self)
    }
}

impl<T: Loggable> Loggable for Option<T> {
    fn shape(&self) -> Shape {
        match self {
            Some(value) => Shape::Indirect(Box::new(value.shape())),
            None => Shape::Nil,
        }
    }
}

impl<T: Loggable + ?Sized> Loggable for &T {
    fn shape(&self) -> Shape {
        Shape::Indirect(Box::new((**self).shape()))
    }
}

impl<T: Loggable + ?Sized> Loggable for &mut T {
    fn shape(&self) -> Shape {
        Shape::Indirect(Box::new((**self).shape()))
    }
}

impl<T: Loggable + ?Sized> Loggable for Box<T> {
    fn shape(&self) -> Shape {
        Shape::Indirect(Box::new((**self).shape()))
    }
}

impl<T: Loggable + ?Sized> Loggable for Arc<T> {
    fn shape(&self) -> Shape {
        Shape::Indirect(Box::new((**self).shape()))
    }
}

impl<T: Loggable + ?Sized> Loggable for Rc<T> {
    fn shape(&self) -> Shape {
        Shape::Indirect(Box::new((**self).shape()))
    }
}

impl<T: ?Sized> Loggable for *const T {
    fn shape(&self) -> Shape {
        Shape::Address(self.cast::<()>() as usize)
    }
}

impl<T: ?Sized> Loggable for *mut T {
    fn shape(&self) -> Shape {
        Shape::Address(self.cast::<()>() as usize)
    }
}

impl<T: Loggable> Loggable for [T] {
    fn shape(&self) -> Shape {
        Shape::Seq(self.iter().map(Loggable::shape).collect())
    }
}

impl<T: Loggable, const N: usize> Loggable for [T; N] {
    fn shape(&self) -> Shape {
        self.as_slice().shape()
    }
}

impl<T: Loggable> Loggable for Vec<T> {
    fn shape(&self) -> Shape {
        self.as_slice().shape()
    }
}

impl<T: Loggable> Loggable for VecDeque<T> {
    fn shape(&self) -> Shape {
        Shape::Seq(self.iter().map(Loggable::shape).collect())
    }
}

/// Entries come out in the map's own iteration order, which for `HashMap`
/// is unspecified and may differ between runs.
impl<K: Loggable, V: Loggable, S: BuildHasher> Loggable for HashMap<K, V, S> {
    fn shape(&self) -> Shape {
        Shape::Map(self.iter().map(|(k, v)| (k.shape(), v.shape())).collect())
    }
}

impl<K: Loggable, V: Loggable> Loggable for BTreeMap<K, V> {
    fn shape(&self) -> Shape {
        Shape::Map(self.iter().map(|(k, v)| (k.shape(), v.shape())).collect())
    }
}

fn channel<T>(dir: ChanDir, address: usize, len: usize, cap: Option<usize>) -> Shape {
    Shape::Channel(ChannelInfo {
        dir,
        elem_type: std::any::type_name::<T>().to_string(),
        address,
        len,
        cap,
    })
}

impl<T> Loggable for Sender<T> {
    fn shape(&self) -> Shape {
        let address = self as *const Self as usize;
        channel::<T>(ChanDir::Send, address, self.len(), self.capacity())
    }
}

impl<T> Loggable for Receiver<T> {
    fn shape(&self) -> Shape {
        let address = self as *const Self as usize;
        channel::<T>(ChanDir::Recv, address, self.len(), self.capacity())
    }
}

/// Both ends of one channel, as returned by `bounded` and `unbounded`
impl<T> Loggable for (Sender<T>, Receiver<T>) {
    fn shape(&self) -> Shape {
        let address = &self.0 as *const Sender<T> as usize;
        channel::<T>(ChanDir::Both, address, self.0.len(), self.0.capacity())
    }
}

macro_rules! loggable_fn {
    ($($arg:ident),*) => {
        impl<R $(, $arg)*> Loggable for fn($($arg),*) -> R {
            fn shape(&self) -> Shape {
                Shape::Func(FuncInfo {
                    signature: std::any::type_name::<Self>().to_string(),
                    address: *self as usize,
                })
            }
        }
    };
}

loggable_fn!();
loggable_fn!(A);
loggable_fn!(A, B);
loggable_fn!(A, B, C);

#[cfg(test)]
mod tests {
    use super::*;

    fn double(x: i32) -> i32 {
        x * 2
    }

    #[test]
    fn test_scalar_shapes() {
        assert_eq!(5_u8.shape(), Shape::Uint(5));
        assert_eq!((-3_i16).shape(), Shape::Int(-3));
        assert_eq!("hi".shape(), Shape::Str("hi".to_string()));
        assert_eq!(true.shape(), Shape::Bool(true));
    }

    #[test]
    fn test_indirections_deref() {
        let boxed: Box<Option<Arc<u32>>> = Box::new(Some(Arc::new(9)));
        assert_eq!(boxed.shape().deref(), &Shape::Uint(9));

        let empty: Option<Box<u32>> = None;
        assert!(empty.shape().is_nil());
    }

    #[test]
    fn test_struct_builder_marks_visibility() {
        let shape = Shape::structure()
            .field("Name", "svc")
            .private_field("token", "s3cret")
            .build();
        match shape {
            Shape::Struct(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(fields[0].exported);
                assert!(!fields[1].exported);
            }
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_shapes() {
        let (tx, rx) = crossbeam_channel::bounded::<i32>(64);
        tx.send(1).unwrap();

        match tx.shape() {
            Shape::Channel(info) => {
                assert_eq!(info.dir, ChanDir::Send);
                assert_eq!(info.elem_type, "i32");
                assert_eq!(info.len, 1);
                assert_eq!(info.cap, Some(64));
            }
            other => panic!("expected channel, got {:?}", other),
        }

        let pair = (tx, rx);
        assert!(matches!(pair.shape(), Shape::Channel(ChannelInfo { dir: ChanDir::Both, .. })));

        let (_utx, urx) = crossbeam_channel::unbounded::<String>();
        assert!(matches!(
            urx.shape(),
            Shape::Channel(ChannelInfo { dir: ChanDir::Recv, cap: None, .. })
        ));
    }

    #[test]
    fn test_function_shape() {
        let f: fn(i32) -> i32 = double;
        match f.shape() {
            Shape::Func(info) => {
                assert_eq!(info.signature, "fn(i32) -> i32");
                assert_eq!(info.address, f as usize);
            }
            other => panic!("expected func, got {:?}", other),
        }
    }

    #[test]
    fn test_display_for_map_keys() {
        assert_eq!(Complex::new(13.0, 256.0).to_string(), "(13+256i)");
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "(1-2i)");
        assert_eq!(Shape::Nil.to_string(), "<nil>");
        assert_eq!(vec![1_u8, 2].shape().to_string(), "[1 2]");
        assert_eq!(Shape::Address(255).to_string(), "0xff");
    }
}
