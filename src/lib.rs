//! # Ordered Logger
//!
//! A structured, asynchronous logging core with ordered writes.
//!
//! ## Features
//!
//! - **Encode Before Return**: `log` returns once every codec has read the
//!   logged values, so callers may mutate them right away
//! - **Background Writes**: Encoded entries are written off the calling path
//! - **Ordered Output**: Entries reach every sink in the order their calls
//!   started, across threads and contexts
//! - **Typed Values**: Named string, integer, float and boxed values
//! - **Pluggable Codecs**: Text and JSON codecs, or your own

pub mod codecs;
pub mod core;
pub mod macros;
pub mod sink;

pub mod prelude {
    pub use crate::codecs::{JsonCodec, TextCodec};
    pub use crate::core::{
        set_debug_enabled, set_global_debug_enabled, AnyValue, Codec, ContextBuilder,
        DispatchMetrics, Dispatcher, DynValue, Entry, LogContext, LoggerError, PendingWrite,
        Result, Tag, TimestampFormat, ToValue, Value, ValueKind,
    };
    pub use crate::sink::SharedBuffer;
}

pub use codecs::{JsonCodec, TextCodec};
pub use core::{
    debug, log, set_debug_enabled, set_global_debug_enabled, sync, AnyValue, Codec,
    ContextBuilder, DispatchMetrics, Dispatcher, DynValue, Entry, LogContext, LoggerError,
    PendingWrite, Result, Tag, TimestampFormat, ToValue, Value, ValueKind, TIME_FORMAT,
};
pub use sink::SharedBuffer;
