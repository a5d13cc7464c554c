//! Output sinks
//!
//! A `SharedSink` is the single serialization point for output: every handler
//! holding a clone of the same sink writes under the same lock, so records
//! from concurrent callers never interleave.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

type Writer = Box<dyn Write + Send>;

/// A byte destination guarded by one exclusive lock
#[derive(Clone)]
pub struct SharedSink {
    writer: Arc<Mutex<Writer>>,
}

impl SharedSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Append to `path`, creating the file if needed
    ///
    /// The file is not buffered: each fragment reaches the OS as it is written.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation(format!("opening '{}'", path.display()), e))?;
        Ok(Self::new(file))
    }

    /// An in-memory sink and a handle to read back what was written
    pub fn memory() -> (Self, MemoryBuffer) {
        let buffer = MemoryBuffer::new();
        (Self::new(buffer.clone()), buffer)
    }

    /// Run `f` with exclusive access to the writer
    ///
    /// The lock is released when `f` returns, on success and failure alike.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut dyn Write) -> R) -> R {
        let mut guard = self.writer.lock();
        f(&mut **guard)
    }

    pub fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing", e))
    }

    /// Whether both handles guard the same writer
    pub fn same_sink(&self, other: &SharedSink) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }
}

impl fmt::Debug for SharedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSink")
            .field("handles", &Arc::strong_count(&self.writer))
            .finish()
    }
}

/// Growable in-memory byte buffer; clones share the same bytes
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().clone()
    }

    /// Contents decoded as UTF-8, replacing invalid sequences
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_roundtrip() {
        let (sink, buffer) = SharedSink::memory();
        sink.with_writer(|w| w.write_all(b"hello")).unwrap();
        assert_eq!(buffer.contents_string(), "hello");
        assert_eq!(buffer.len(), 5);

        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_clones_share_lock() {
        let (sink, _buffer) = SharedSink::memory();
        let other = sink.clone();
        assert!(sink.same_sink(&other));

        let (unrelated, _) = SharedSink::memory();
        assert!(!sink.same_sink(&unrelated));
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("out.log");

        let sink = SharedSink::file(&path).unwrap();
        sink.with_writer(|w| w.write_all(b"one\n")).unwrap();
        let again = SharedSink::file(&path).unwrap();
        again.with_writer(|w| w.write_all(b"two\n")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_file_sink_open_error() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("missing").join("out.log");
        let err = SharedSink::file(&path).unwrap_err();
        assert!(err.to_string().starts_with("IO error while opening"));
    }
}
