//! Logging macros for building typed values inline.
//!
//! Each `name = expr` pair becomes a [`Value`](crate::Value) named after the
//! identifier, with its kind picked by [`ToValue`](crate::ToValue).
//!
//! # Examples
//!
//! ```
//! use ordered_logger::prelude::*;
//! use ordered_logger::log;
//!
//! let sink = SharedBuffer::new();
//! let ctx = LogContext::new().with_codec(TextCodec::new(sink.clone()));
//!
//! let port = 8080_u16;
//! log!(ctx, "listening", port = port, tls = false);
//! ordered_logger::sync();
//!
//! assert!(sink.to_string_lossy().ends_with("listening, port=8080, tls=false\n"));
//! ```

/// Log a message with named values through the global dispatcher.
///
/// # Examples
///
/// ```
/// # use ordered_logger::prelude::*;
/// # let ctx = LogContext::new();
/// use ordered_logger::log;
/// log!(ctx, "Simple message");
/// log!(ctx, "Request served", status = 200, path = "/health");
/// ```
#[macro_export]
macro_rules! log {
    ($ctx:expr, $message:expr $(, $name:ident = $value:expr)* $(,)?) => {
        $crate::core::dispatcher::log(
            &$ctx,
            $message,
            &[$($crate::Value::new(stringify!($name), $value)),*],
        )
    };
}

/// Log a debug message with named values through the global dispatcher.
///
/// Nothing is logged unless debugging is enabled for the context or
/// globally.
///
/// # Examples
///
/// ```
/// # use ordered_logger::prelude::*;
/// # let ctx = LogContext::new();
/// use ordered_logger::debug;
/// debug!(ctx, "Cache state", hits = 10_u64, ratio = 0.9);
/// ```
#[macro_export]
macro_rules! debug {
    ($ctx:expr, $message:expr $(, $name:ident = $value:expr)* $(,)?) => {
        $crate::core::dispatcher::debug(
            &$ctx,
            $message,
            &[$($crate::Value::new(stringify!($name), $value)),*],
        )
    };
}
