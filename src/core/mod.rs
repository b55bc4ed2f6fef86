//! Core types: values, tags, contexts, the codec contract and the dispatcher

pub mod codec;
pub mod context;
pub mod debug;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod tag;
pub mod timestamp;
pub mod value;

pub use codec::{Codec, Entry, PendingWrite};
pub use context::{ContextBuilder, LogContext};
pub use debug::{set_debug_enabled, set_global_debug_enabled};
pub use dispatcher::{debug, log, sync, Dispatcher};
pub use error::{LoggerError, Result};
pub use metrics::DispatchMetrics;
pub use tag::Tag;
pub use timestamp::{TimestampFormat, TIME_FORMAT};
pub use value::{AnyValue, DynValue, ToValue, Value, ValueKind};
