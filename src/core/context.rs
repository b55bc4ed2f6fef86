//! Logging context: attached codecs and tags
//!
//! A [`LogContext`] is an immutable value that callers thread through their
//! call chains. Attaching a codec or a tag returns a new context holding the
//! parent's list plus one element; the parent is never touched, so a context
//! can be cloned and shared across threads freely.

use super::codec::Codec;
use super::tag::Tag;
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub struct LogContext {
    codecs: Arc<[Arc<dyn Codec>]>,
    tags: Arc<[Tag]>,
    /// Debug switch shared by this context and everything derived from it
    #[cfg_attr(feature = "strip-debug", allow(dead_code))]
    pub(crate) debug: Arc<AtomicBool>,
}

fn appended<T: Clone>(list: &[T], item: T) -> Arc<[T]> {
    let mut items = Vec::with_capacity(list.len() + 1);
    items.extend_from_slice(list);
    items.push(item);
    Arc::from(items)
}

impl LogContext {
    /// Create a context with no codecs. Logging on it does nothing.
    pub fn new() -> Self {
        Self {
            codecs: Arc::from(Vec::new()),
            tags: Arc::from(Vec::new()),
            debug: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Derive a context with `codec` attached after the existing ones
    #[must_use]
    pub fn with_codec<C: Codec + 'static>(&self, codec: C) -> Self {
        self.with_shared_codec(Arc::new(codec))
    }

    /// Derive a context with an already shared codec attached
    #[must_use]
    pub fn with_shared_codec(&self, codec: Arc<dyn Codec>) -> Self {
        Self {
            codecs: appended(&self.codecs[..], codec),
            tags: Arc::clone(&self.tags),
            debug: Arc::clone(&self.debug),
        }
    }

    /// Derive a context with a bare tag
    #[must_use]
    pub fn with_tag(&self, key: impl Into<String>) -> Self {
        self.with(Tag::bare(key))
    }

    /// Derive a context with a `key=value` tag
    #[must_use]
    pub fn with_tag_pair(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(Tag::pair(key, value))
    }

    /// Derive a context with `tag` appended
    #[must_use]
    pub fn with(&self, tag: Tag) -> Self {
        Self {
            codecs: Arc::clone(&self.codecs),
            tags: appended(&self.tags[..], tag),
            debug: Arc::clone(&self.debug),
        }
    }

    /// Derive a context with several tags appended in order
    #[must_use]
    pub fn with_tags<I>(&self, tags: I) -> Self
    where
        I: IntoIterator<Item = Tag>,
    {
        let mut all = self.tags.to_vec();
        all.extend(tags);
        Self {
            codecs: Arc::clone(&self.codecs),
            tags: Arc::from(all),
            debug: Arc::clone(&self.debug),
        }
    }

    pub fn codecs(&self) -> &[Arc<dyn Codec>] {
        &self.codecs
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_codecs(&self) -> bool {
        !self.codecs.is_empty()
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.codecs.iter().map(|c| c.name()).collect();
        f.debug_struct("LogContext")
            .field("codecs", &names)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Builder for a root [`LogContext`]
///
/// # Example
///
/// ```
/// use ordered_logger::prelude::*;
///
/// let sink = SharedBuffer::new();
/// let ctx = LogContext::builder()
///     .codec(TextCodec::new(sink.clone()))
///     .tag("server")
///     .tag_pair("port", "8080")
///     .build();
///
/// assert_eq!(ctx.tags().len(), 2);
/// assert!(ctx.has_codecs());
/// ```
pub struct ContextBuilder {
    codecs: Vec<Arc<dyn Codec>>,
    tags: Vec<Tag>,
    debug: bool,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            codecs: Vec::new(),
            tags: Vec::new(),
            debug: false,
        }
    }

    /// Attach a codec
    #[must_use = "builder methods return a new value"]
    pub fn codec<C: Codec + 'static>(mut self, codec: C) -> Self {
        self.codecs.push(Arc::new(codec));
        self
    }

    /// Attach a codec shared with other contexts
    #[must_use = "builder methods return a new value"]
    pub fn shared_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codecs.push(codec);
        self
    }

    /// Add a bare tag
    #[must_use = "builder methods return a new value"]
    pub fn tag(mut self, key: impl Into<String>) -> Self {
        self.tags.push(Tag::bare(key));
        self
    }

    /// Add a `key=value` tag
    #[must_use = "builder methods return a new value"]
    pub fn tag_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::pair(key, value));
        self
    }

    /// Start with debug logging enabled for this context
    #[must_use = "builder methods return a new value"]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    pub fn build(self) -> LogContext {
        LogContext {
            codecs: Arc::from(self.codecs),
            tags: Arc::from(self.tags),
            debug: Arc::new(AtomicBool::new(self.debug)),
        }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
