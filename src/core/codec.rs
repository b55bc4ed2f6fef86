//! Codec trait for encoding log entries and writing them to a sink
//!
//! A codec works in two steps. [`Codec::encode`] reads the caller's data and
//! returns a [`PendingWrite`]; returning marks the point after which the
//! codec no longer needs the data. The dispatcher then runs the pending write
//! once every entry logged before it has been written.
//!
//! `PendingWrite` is `'static`, so the compiler rejects a codec that tries to
//! keep a reference to the caller's values past `encode`.

use super::error::Result;
use super::tag::Tag;
use super::value::Value;
use chrono::{DateTime, Utc};

/// The deferred write half of an encoded entry
pub type PendingWrite = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// One log call, as seen by a codec
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub timestamp: DateTime<Utc>,
    pub tags: &'a [Tag],
    pub message: &'a str,
    pub values: &'a [Value],
}

impl<'a> Entry<'a> {
    pub fn new(
        timestamp: DateTime<Utc>,
        tags: &'a [Tag],
        message: &'a str,
        values: &'a [Value],
    ) -> Self {
        Self {
            timestamp,
            tags,
            message,
            values,
        }
    }
}

/// Encoder and writer attached to a logging context.
///
/// `encode` may be called concurrently from many log calls. State shared
/// between calls (writers, scratch buffers) must be synchronized by the
/// codec itself.
///
/// # Example
///
/// ```
/// use ordered_logger::core::{Codec, Entry, PendingWrite, Result};
/// use std::sync::Arc;
/// use parking_lot::Mutex;
///
/// struct MessageCounter(Arc<Mutex<Vec<String>>>);
///
/// impl Codec for MessageCounter {
///     fn name(&self) -> &str {
///         "counter"
///     }
///
///     fn encode(&self, entry: &Entry<'_>) -> Result<PendingWrite> {
///         let message = entry.message.to_string();
///         let sink = Arc::clone(&self.0);
///         Ok(Box::new(move || -> Result<()> {
///             sink.lock().push(message);
///             Ok(())
///         }))
///     }
/// }
/// ```
pub trait Codec: Send + Sync {
    fn name(&self) -> &str;

    /// Encode `entry` and return the write to perform once it is this
    /// entry's turn.
    ///
    /// An `Err` skips the write for this codec only.
    fn encode(&self, entry: &Entry<'_>) -> Result<PendingWrite>;
}
