//! Runtime switches for debug logging
//!
//! Debug entries are produced when either the process-wide switch or the
//! context's own switch is on. The switches cannot be queried: whether
//! debugging is on must not change what the rest of the program does.
//!
//! With the `strip-debug` feature every switch is inert and
//! [`Dispatcher::debug`](super::Dispatcher::debug) never logs.

use super::context::LogContext;

#[cfg(not(feature = "strip-debug"))]
mod imp {
    use super::LogContext;
    use std::sync::atomic::{AtomicBool, Ordering};

    static GLOBAL_DEBUG: AtomicBool = AtomicBool::new(false);

    pub fn set_global_debug_enabled(enabled: bool) {
        GLOBAL_DEBUG.store(enabled, Ordering::SeqCst);
    }

    pub fn set_debug_enabled(ctx: &LogContext, enabled: bool) {
        ctx.debug.store(enabled, Ordering::SeqCst);
    }

    pub fn debug_enabled(ctx: &LogContext) -> bool {
        GLOBAL_DEBUG.load(Ordering::SeqCst) || ctx.debug.load(Ordering::SeqCst)
    }
}

#[cfg(feature = "strip-debug")]
mod imp {
    use super::LogContext;

    pub fn set_global_debug_enabled(_enabled: bool) {}

    pub fn set_debug_enabled(_ctx: &LogContext, _enabled: bool) {}

    pub fn debug_enabled(_ctx: &LogContext) -> bool {
        false
    }
}

/// Turn debug logging on or off for every context.
///
/// Contexts whose own switch is on keep logging debug entries when the
/// global switch is off.
pub fn set_global_debug_enabled(enabled: bool) {
    imp::set_global_debug_enabled(enabled);
}

/// Turn debug logging on or off for `ctx` and every context that shares its
/// root (derived from it, or it from them).
pub fn set_debug_enabled(ctx: &LogContext, enabled: bool) {
    imp::set_debug_enabled(ctx, enabled);
}

pub(crate) fn debug_enabled(ctx: &LogContext) -> bool {
    imp::debug_enabled(ctx)
}
