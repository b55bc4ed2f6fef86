//! Human-readable text codec
//!
//! One line per entry:
//!
//! ```text
//! 2025-01-08 10:30:45.123456+0000 [tag, key=value] message, name=value, ...
//! ```

use crate::core::{Codec, Entry, LoggerError, PendingWrite, Result, TimestampFormat, ValueKind};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

#[cfg(feature = "console")]
use colored::Colorize;

const DEFAULT_BUFFER_CAPACITY: usize = 256;
const MAX_POOLED_BUFFERS: usize = 64;
const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// Scratch buffers reused across entries
#[derive(Debug)]
struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    capacity: usize,
}

impl BufferPool {
    fn new(capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
            capacity,
        }
    }

    fn get(&self) -> Vec<u8> {
        self.buffers
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.capacity))
    }

    fn put(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        buf.clear();
        let mut buffers = self.buffers.lock();
        if buffers.len() < MAX_POOLED_BUFFERS {
            buffers.push(buf);
        }
    }

    #[cfg(test)]
    fn pooled(&self) -> usize {
        self.buffers.lock().len()
    }
}

pub struct TextCodec<W> {
    writer: Arc<Mutex<W>>,
    pool: Arc<BufferPool>,
    timestamp_format: TimestampFormat,
    #[cfg(feature = "console")]
    use_colors: bool,
}

impl<W: Write + Send + 'static> TextCodec<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            pool: Arc::new(BufferPool::new(DEFAULT_BUFFER_CAPACITY)),
            timestamp_format: TimestampFormat::default(),
            #[cfg(feature = "console")]
            use_colors: false,
        }
    }

    /// Set the timestamp format for this codec
    ///
    /// Only sortable formats keep rendered lines in lexicographic time order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_logger::codecs::TextCodec;
    /// use ordered_logger::TimestampFormat;
    ///
    /// let codec = TextCodec::new(std::io::stdout())
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Highlight tags with terminal colors
    #[cfg(feature = "console")]
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Initial capacity of newly allocated scratch buffers
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.pool = Arc::new(BufferPool::new(capacity));
        self
    }

    fn write_tags(&self, buf: &mut Vec<u8>, entry: &Entry<'_>) -> std::io::Result<()> {
        buf.extend_from_slice(b" [");
        for (i, tag) in entry.tags.iter().enumerate() {
            if i > 0 {
                buf.extend_from_slice(b", ");
            }
            #[cfg(feature = "console")]
            if self.use_colors {
                write!(buf, "{}", tag.to_string().cyan())?;
                continue;
            }
            write!(buf, "{}", tag)?;
        }
        buf.extend_from_slice(b"] ");
        Ok(())
    }

    fn encode_into(&self, buf: &mut Vec<u8>, stamp: &str, entry: &Entry<'_>) -> std::io::Result<()> {
        buf.extend_from_slice(stamp.as_bytes());
        self.write_tags(buf, entry)?;
        buf.extend_from_slice(entry.message.as_bytes());

        for value in entry.values {
            if value.kind() == ValueKind::Unknown {
                continue;
            }
            write!(buf, ", {}={}", value.name(), value.get())?;
        }

        buf.push(b'\n');
        Ok(())
    }
}

impl<W: Write + Send + 'static> Codec for TextCodec<W> {
    fn name(&self) -> &str {
        "text"
    }

    fn encode(&self, entry: &Entry<'_>) -> Result<PendingWrite> {
        let stamp = self.timestamp_format.format(&entry.timestamp).map_err(|_| {
            LoggerError::encode("text", format!("invalid timestamp format {:?}", self.timestamp_format))
        })?;

        let mut buf = self.pool.get();
        if let Err(e) = self.encode_into(&mut buf, &stamp, entry) {
            self.pool.put(buf);
            return Err(LoggerError::encode("text", e.to_string()));
        }

        let writer = Arc::clone(&self.writer);
        let pool = Arc::clone(&self.pool);
        Ok(Box::new(move || -> Result<()> {
            let written = writer.lock().write_all(&buf);
            pool.put(buf);
            written.map_err(|e| LoggerError::io_operation("writing text entry", "sink rejected entry", e))
        }))
    }
}
