//! Value renderer
//!
//! Walks an attribute value depth-first and writes one
//! ` ESC[0;32m<key-path>ESC[0m-><colored value>` fragment per leaf, straight
//! to the sink. Nothing is buffered: fragments appear in traversal order and
//! the walk stops at the first failed write.
//!
//! Traversal order is pre-order for groups and structs, index order for
//! sequences, and the source collection's iteration order for maps. Maps
//! backed by `HashMap` therefore render in an unspecified order.

use super::error::{LoggerError, Result};
use super::palette::{palette, Palette, RESET};
use super::record::Record;
use super::shape::{hex_address, Shape};
use super::timestamp::{format_duration, TimestampFormat};
use super::value::{Attr, Value};
use std::io::Write;

/// Byte-like input accepted by the write primitive
#[derive(Debug, Clone, Copy)]
pub enum Chunk<'a> {
    Bytes(&'a [u8]),
    Byte(u8),
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for Chunk<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Chunk::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Chunk<'a> {
    fn from(text: &'a str) -> Self {
        Chunk::Text(text)
    }
}

impl<'a> From<&'a String> for Chunk<'a> {
    fn from(text: &'a String) -> Self {
        Chunk::Text(text.as_str())
    }
}

impl From<u8> for Chunk<'_> {
    fn from(byte: u8) -> Self {
        Chunk::Byte(byte)
    }
}

/// Join a key onto a dotted prefix; an empty side contributes nothing
fn join(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (true, _) => key.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{}.{}", prefix, key),
    }
}

/// Writes fragments for one record into a locked sink
pub(crate) struct Emitter<'a> {
    out: &'a mut dyn Write,
    group: Option<&'a str>,
    time_format: &'a TimestampFormat,
    palette: &'static Palette,
    written: u64,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(
        out: &'a mut dyn Write,
        group: Option<&'a str>,
        time_format: &'a TimestampFormat,
    ) -> Self {
        Self {
            out,
            group,
            time_format,
            palette: palette(),
            written: 0,
        }
    }

    /// Bytes accepted by the sink so far
    pub(crate) fn written(&self) -> u64 {
        self.written
    }

    /// The raw-write primitive: one sink call per chunk, all or nothing
    pub(crate) fn write<'c>(&mut self, chunk: impl Into<Chunk<'c>>) -> Result<()> {
        let single;
        let bytes: &[u8] = match chunk.into() {
            Chunk::Bytes(bytes) => bytes,
            Chunk::Text(text) => text.as_bytes(),
            Chunk::Byte(byte) => {
                single = [byte];
                &single
            }
        };
        if bytes.is_empty() {
            return Ok(());
        }

        let accepted = self
            .out
            .write(bytes)
            .map_err(|e| LoggerError::io_operation("writing", e))?;
        self.written += accepted as u64;
        if accepted < bytes.len() {
            return Err(LoggerError::short_write(accepted, bytes.len()));
        }
        Ok(())
    }

    /// Write a whole record: timestamp, label, message, attributes, newline
    pub(crate) fn record(&mut self, record: &Record, timestamp: &str, bound: &[Attr]) -> Result<()> {
        let palette = self.palette;

        self.write(palette.timestamp.as_str())?;
        self.write(timestamp)?;
        self.write(b' ')?;

        if let Some(label) = palette.label(record.level) {
            self.write(label)?;
        }

        self.write(&record.message)?;
        self.write(RESET)?;

        for attr in record.attrs.iter().chain(bound) {
            self.attr("", attr)?;
        }

        self.write(b'\n')
    }

    pub(crate) fn attr(&mut self, prefix: &str, attr: &Attr) -> Result<()> {
        self.value(prefix, &attr.key, &attr.value)
    }

    fn value(&mut self, prefix: &str, key: &str, value: &Value) -> Result<()> {
        match value {
            Value::Bool(b) => self.boolean(prefix, key, *b),
            Value::Int(i) => self.scalar(prefix, key, &i.to_string()),
            Value::Uint(u) => self.scalar(prefix, key, &u.to_string()),
            Value::Float(f) => self.scalar(prefix, key, &f.to_string()),
            Value::String(s) => self.scalar(prefix, key, s),
            Value::Duration(d) => self.temporal(prefix, key, &format_duration(*d)),
            Value::Time(t) => {
                let text = self.time_format.format(t)?;
                self.temporal(prefix, key, &text)
            }
            Value::Group(attrs) => {
                let nested = join(prefix, key);
                for attr in attrs {
                    self.attr(&nested, attr)?;
                }
                Ok(())
            }
            Value::Lazy(lazy) => {
                let resolved = lazy.resolve();
                self.value(prefix, key, &resolved)
            }
            Value::Any(shape) => self.shape(prefix, key, shape),
        }
    }

    fn shape(&mut self, prefix: &str, key: &str, shape: &Shape) -> Result<()> {
        match shape.deref() {
            Shape::Nil => Ok(()),
            Shape::Bool(b) => self.boolean(prefix, key, *b),
            Shape::Int(i) => self.scalar(prefix, key, &i.to_string()),
            Shape::Uint(u) => self.scalar(prefix, key, &u.to_string()),
            Shape::Float(f) => self.scalar(prefix, key, &f.to_string()),
            Shape::Str(s) => self.scalar(prefix, key, s),
            Shape::Address(address) => self.scalar(prefix, key, &hex_address(*address)),
            Shape::Complex(c) => {
                let nested = join(prefix, key);
                self.scalar(&nested, "real", &c.re.to_string())?;
                self.scalar(&nested, "imag", &c.im.to_string())
            }
            Shape::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.shape(prefix, &format!("{}[{}]", key, i), item)?;
                }
                Ok(())
            }
            Shape::Channel(ch) => {
                let nested = join(prefix, key);
                self.scalar(&nested, "kind", ch.dir.as_str())?;
                self.scalar(&nested, "type", &ch.elem_type)?;
                self.scalar(&nested, "pointer", &hex_address(ch.address))?;
                self.scalar(&nested, "len", &ch.len.to_string())?;
                match ch.cap {
                    Some(cap) => self.scalar(&nested, "cap", &cap.to_string()),
                    None => self.scalar(&nested, "cap", "unbounded"),
                }
            }
            Shape::Func(func) => {
                let nested = join(prefix, key);
                self.scalar(&nested, "signature", &func.signature)?;
                self.scalar(&nested, "pointer", &hex_address(func.address))
            }
            // deref() has already stripped every indirection
            Shape::Indirect(_) => Ok(()),
            Shape::Map(entries) => {
                for (entry_key, entry_value) in entries {
                    self.shape(prefix, &format!("{}[{}]", key, entry_key), entry_value)?;
                }
                Ok(())
            }
            Shape::Struct(fields) => {
                let nested = join(prefix, key);
                for field in fields.iter().filter(|field| field.exported) {
                    self.shape(&nested, &field.name, &field.value)?;
                }
                Ok(())
            }
        }
    }

    /// ` ESC[0;32m[group.][prefix.]keyESC[0m->`
    fn key(&mut self, prefix: &str, key: &str) -> Result<()> {
        self.write(b' ')?;
        self.write(self.palette.key.as_str())?;
        if let Some(group) = self.group {
            self.write(group)?;
            self.write(b'.')?;
        }
        if !prefix.is_empty() {
            self.write(prefix)?;
            self.write(b'.')?;
        }
        self.write(key)?;
        self.write(RESET)?;
        self.write("->")
    }

    fn scalar(&mut self, prefix: &str, key: &str, text: &str) -> Result<()> {
        self.key(prefix, key)?;
        self.write(self.palette.scalar.as_str())?;
        self.write(text)?;
        self.write(RESET)
    }

    fn boolean(&mut self, prefix: &str, key: &str, value: bool) -> Result<()> {
        self.key(prefix, key)?;
        let literal = if value {
            self.palette.true_literal.as_str()
        } else {
            self.palette.false_literal.as_str()
        };
        self.write(literal)
    }

    fn temporal(&mut self, prefix: &str, key: &str, text: &str) -> Result<()> {
        self.key(prefix, key)?;
        self.write(self.palette.temporal.as_str())?;
        self.write(text)?;
        self.write(RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::{Complex, Loggable};
    use crate::core::value::LazyValue;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const KEY: &str = "\x1b[0;32m";
    const VAL: &str = "\x1b[0;93m";
    const R: &str = "\x1b[0m";

    fn render_with(group: Option<&str>, attr: &Attr) -> String {
        let mut out = Vec::new();
        let format = TimestampFormat::Rfc822;
        let mut emitter = Emitter::new(&mut out, group, &format);
        emitter.attr("", attr).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    fn render(attr: &Attr) -> String {
        render_with(None, attr)
    }

    fn scalar(path: &str, text: &str) -> String {
        format!(" {KEY}{path}{R}->{VAL}{text}{R}")
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render(&Attr::int("n", -4)), scalar("n", "-4"));
        assert_eq!(render(&Attr::uint("n", 4)), scalar("n", "4"));
        assert_eq!(render(&Attr::float("f", 2.5)), scalar("f", "2.5"));
        assert_eq!(render(&Attr::string("s", "hi")), scalar("s", "hi"));
    }

    #[test]
    fn test_booleans() {
        assert_eq!(
            render(&Attr::bool("ok", true)),
            format!(" {KEY}ok{R}->\x1b[0;32mtrue{R}")
        );
        assert_eq!(
            render(&Attr::bool("ok", false)),
            format!(" {KEY}ok{R}->\x1b[0;31mfalse{R}")
        );
    }

    #[test]
    fn test_duration_and_time() {
        assert_eq!(
            render(&Attr::duration("took", Duration::from_millis(1500))),
            format!(" {KEY}took{R}->\x1b[33m1.5s{R}")
        );
        let at = Utc.with_ymd_and_hms(2024, 3, 2, 15, 4, 5).unwrap();
        assert_eq!(
            render(&Attr::time("at", at)),
            format!(" {KEY}at{R}->\x1b[33m02 Mar 24 15:04 UTC{R}")
        );
    }

    #[test]
    fn test_group_prefixes_children() {
        let attr = Attr::group(
            "req",
            [
                Attr::string("method", "GET"),
                Attr::group("peer", [Attr::uint("port", 443)]),
            ],
        );
        assert_eq!(
            render(&attr),
            format!("{}{}", scalar("req.method", "GET"), scalar("req.peer.port", "443"))
        );
    }

    #[test]
    fn test_empty_group_key_inlines() {
        let attr = Attr::group("", [Attr::int("a", 1)]);
        assert_eq!(render(&attr), scalar("a", "1"));
        assert_eq!(render(&Attr::group("empty", [])), "");
    }

    #[test]
    fn test_handler_group_prefix() {
        let attr = Attr::group("g", [Attr::int("a", 1)]);
        assert_eq!(render_with(Some("app.db"), &attr), scalar("app.db.g.a", "1"));
    }

    #[test]
    fn test_lazy_resolved_once_across_renders() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy = LazyValue::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Value::from("computed")
        });
        let attr = Attr::new("v", lazy);

        assert_eq!(render(&attr), scalar("v", "computed"));
        assert_eq!(render(&attr), scalar("v", "computed"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_struct_paths() {
        let inner = Shape::structure().field("Y", &5_i32).build();
        let outer = Shape::structure()
            .field("X", &inner)
            .private_field("hidden", &1_i32)
            .build();
        assert_eq!(render(&Attr::any("a", &outer)), scalar("a.X.Y", "5"));
    }

    #[test]
    fn test_sequence_is_flat() {
        assert_eq!(
            render(&Attr::any("n", &vec![10, 20])),
            format!("{}{}", scalar("n[0]", "10"), scalar("n[1]", "20"))
        );
    }

    #[test]
    fn test_nil_renders_nothing() {
        let none: Option<Box<i32>> = None;
        assert_eq!(render(&Attr::any("p", &none)), "");
        assert_eq!(render(&Attr::any("p", &Box::new(none))), "");
    }

    #[test]
    fn test_indirection_is_followed() {
        let value = Arc::new(Box::new(Some(7_u8)));
        assert_eq!(render(&Attr::any("p", &value)), scalar("p", "7"));
    }

    #[test]
    fn test_address() {
        let ptr = 0x1f00 as *const u8;
        assert_eq!(render(&Attr::any("ptr", &ptr)), scalar("ptr", "0x1f00"));
    }

    #[test]
    fn test_complex() {
        assert_eq!(
            render(&Attr::any("number", &Complex::new(13.0, 256.0))),
            format!("{}{}", scalar("number.real", "13"), scalar("number.imag", "256"))
        );
    }

    #[test]
    fn test_map_keys() {
        let mut map = BTreeMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        assert_eq!(
            render(&Attr::any("m", &map)),
            format!("{}{}", scalar("m[a]", "1"), scalar("m[b]", "2"))
        );
    }

    #[test]
    fn test_channel() {
        let (tx, _rx) = crossbeam_channel::bounded::<i32>(64);
        let address = match tx.shape() {
            Shape::Channel(info) => info.address,
            _ => unreachable!(),
        };
        let expected = [
            scalar("chan.kind", "sender"),
            scalar("chan.type", "i32"),
            scalar("chan.pointer", &hex_address(address)),
            scalar("chan.len", "0"),
            scalar("chan.cap", "64"),
        ]
        .concat();
        assert_eq!(render(&Attr::any("chan", &tx)), expected);

        let (_utx, urx) = crossbeam_channel::unbounded::<u8>();
        assert!(render(&Attr::any("c", &urx)).ends_with(&scalar("c.cap", "unbounded")));
    }

    #[test]
    fn test_function() {
        fn handler(_: u8) {}
        let f: fn(u8) = handler;
        let out = render(&Attr::any("cb", &f));
        assert!(out.starts_with(&scalar("cb.signature", "fn(u8)")));
        assert!(out.contains(&format!("{KEY}cb.pointer{R}->{VAL}0x")));
    }

    struct FailAfter {
        calls: usize,
        limit: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            if self.calls > self.limit {
                Ok(buf.len() / 2)
            } else {
                Ok(buf.len())
            }
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_short_write_stops_traversal() {
        let mut sink = FailAfter { calls: 0, limit: 3 };
        let format = TimestampFormat::Rfc822;
        let mut emitter = Emitter::new(&mut sink, None, &format);
        let attr = Attr::any("n", &vec![1, 2, 3]);

        let err = emitter.attr("", &attr).unwrap_err();
        assert!(matches!(err, LoggerError::ShortWrite { .. }));
        assert_eq!(sink.calls, 4);
    }

    #[test]
    fn test_join() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("a", ""), "a");
        assert_eq!(join("a", "b"), "a.b");
    }
}
