//! Dispatch and write ordering
//!
//! Every log call takes the pending ordering token of its predecessor and
//! installs a fresh one for its successor, all under one short critical
//! section that also reads the clock. Encoding then runs concurrently on
//! the caller's side while the caller waits; writing runs in the background
//! once the predecessor's token fires.
//!
//! Writes are chained without a central writer thread: a call's write job is
//! parked on its predecessor's token, and whichever thread fires that token
//! carries on with the parked job. A background writer is only spawned when
//! the predecessor has already finished. No lock is held while a codec
//! writes.

use super::codec::{Codec, Entry, PendingWrite};
use super::context::LogContext;
use super::debug::debug_enabled;
use super::error::LoggerError;
use super::metrics::DispatchMetrics;
use super::value::Value;
use chrono::{DateTime, Utc};
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::thread;

type PanicPayload = Box<dyn Any + Send + 'static>;

fn panic_message(payload: &PanicPayload) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

enum TokenState {
    /// Not fired yet; holds the write job of the next call once parked
    Pending(Option<WriteJob>),
    Fired,
}

/// One-shot signal meaning "every write of one log call has finished"
struct WriteToken {
    state: Mutex<TokenState>,
    fired: Condvar,
}

impl WriteToken {
    fn pending() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(TokenState::Pending(None)),
            fired: Condvar::new(),
        })
    }

    fn fired() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(TokenState::Fired),
            fired: Condvar::new(),
        })
    }

    /// Park `job` until this token fires. Hands the job back if the token
    /// has already fired.
    fn park(&self, job: WriteJob) -> Option<WriteJob> {
        let mut state = self.state.lock();
        match &mut *state {
            TokenState::Fired => Some(job),
            TokenState::Pending(slot) => {
                debug_assert!(slot.is_none(), "ordering token parked twice");
                *slot = Some(job);
                None
            }
        }
    }

    /// Fire the token and take the job parked behind it
    fn fire(&self) -> Option<WriteJob> {
        let previous = std::mem::replace(&mut *self.state.lock(), TokenState::Fired);
        self.fired.notify_all();
        match previous {
            TokenState::Pending(job) => job,
            TokenState::Fired => None,
        }
    }

    fn wait(&self) {
        let mut state = self.state.lock();
        while !matches!(*state, TokenState::Fired) {
            self.fired.wait(&mut state);
        }
    }
}

struct CodecWrite {
    codec: String,
    write: PendingWrite,
}

/// The write half of one log call
struct WriteJob {
    writes: Vec<CodecWrite>,
    /// Token fired once every write above is done
    done: Arc<WriteToken>,
    shared: Arc<Shared>,
}

impl WriteJob {
    /// Perform the writes, fire this call's token and return the job of the
    /// next call if it was already waiting.
    fn run(self) -> Option<WriteJob> {
        let WriteJob {
            mut writes,
            done,
            shared,
        } = self;

        if let Some(last) = writes.pop() {
            let slots: Vec<Mutex<Option<CodecWrite>>> =
                writes.into_iter().map(|write| Mutex::new(Some(write))).collect();
            thread::scope(|s| {
                for slot in &slots {
                    let shared = &shared;
                    let spawned =
                        spawn_scoped(s, "ordered-logger-writer", move || shared.perform_slot(slot));
                    if let Err(e) = spawned {
                        warn_spawn_failed("writer", &e);
                        shared.perform_slot(slot);
                    }
                }
                shared.perform(last);
            });
        }

        done.fire()
    }
}

#[cfg(test)]
thread_local! {
    /// Makes every spawn from this thread fail, as when the OS is out of threads
    static REFUSE_SPAWN: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

fn check_spawn() -> io::Result<()> {
    #[cfg(test)]
    if REFUSE_SPAWN.with(std::cell::Cell::get) {
        return Err(io::Error::new(io::ErrorKind::WouldBlock, "thread limit reached"));
    }
    Ok(())
}

fn spawn_scoped<'scope, 'env, F, T>(
    scope: &'scope thread::Scope<'scope, 'env>,
    name: &str,
    f: F,
) -> io::Result<thread::ScopedJoinHandle<'scope, T>>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    check_spawn()?;
    thread::Builder::new().name(name.to_string()).spawn_scoped(scope, f)
}

fn warn_spawn_failed(role: &str, e: &io::Error) {
    eprintln!(
        "[LOGGER WARNING] Failed to spawn {} thread: {}. Running on the current thread.",
        role, e
    );
}

/// Run `job` and every job chained behind it that is ready
fn drive(mut job: WriteJob) {
    while let Some(next) = job.run() {
        job = next;
    }
}

fn spawn_writer(job: WriteJob) {
    let slot = Arc::new(Mutex::new(Some(job)));
    let handoff = Arc::clone(&slot);
    let spawned = check_spawn().and_then(|()| {
        thread::Builder::new()
            .name("ordered-logger-writer".to_string())
            .spawn(move || {
                let job = handoff.lock().take();
                if let Some(job) = job {
                    drive(job);
                }
            })
    });

    if let Err(e) = spawned {
        warn_spawn_failed("writer", &e);
        let job = slot.lock().take();
        if let Some(job) = job {
            drive(job);
        }
    }
}

struct ChainState {
    pending: Arc<WriteToken>,
    last_timestamp: Option<DateTime<Utc>>,
}

struct Shared {
    chain: Mutex<ChainState>,
    metrics: DispatchMetrics,
}

impl Shared {
    /// Swap in a fresh pending token and read the clock, atomically.
    ///
    /// Returns the predecessor's token, this call's token and its timestamp.
    fn advance(&self) -> (Arc<WriteToken>, Arc<WriteToken>, DateTime<Utc>) {
        let mut chain = self.chain.lock();
        let next = WriteToken::pending();
        let previous = std::mem::replace(&mut chain.pending, Arc::clone(&next));

        // the clock is read before unlocking; a wall clock step backwards
        // must not reorder timestamps either
        let mut timestamp = Utc::now();
        if let Some(last) = chain.last_timestamp {
            if timestamp < last {
                timestamp = last;
            }
        }
        chain.last_timestamp = Some(timestamp);

        (previous, next, timestamp)
    }

    fn perform_slot(&self, slot: &Mutex<Option<CodecWrite>>) {
        let write = slot.lock().take();
        if let Some(write) = write {
            self.perform(write);
        }
    }

    fn perform(&self, write: CodecWrite) {
        let CodecWrite { codec, write } = write;
        match panic::catch_unwind(AssertUnwindSafe(write)) {
            Ok(Ok(())) => {
                self.metrics.record_written();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Codec '{}' write failed: {}", codec, e);
                self.metrics.record_write_failure();
            }
            Err(payload) => {
                eprintln!(
                    "[LOGGER CRITICAL] Codec '{}' panicked while writing: {}. \
                     Other codecs continue to function.",
                    codec,
                    panic_message(&payload)
                );
                self.metrics.record_panic();
            }
        }
    }
}

enum EncodeFailure {
    Error(LoggerError),
    Panic(PanicPayload),
}

fn encode_one(codec: &Arc<dyn Codec>, entry: &Entry<'_>) -> Result<CodecWrite, EncodeFailure> {
    match panic::catch_unwind(AssertUnwindSafe(|| codec.encode(entry))) {
        Ok(Ok(write)) => Ok(CodecWrite {
            codec: codec.name().to_string(),
            write,
        }),
        Ok(Err(e)) => Err(EncodeFailure::Error(e)),
        Err(payload) => Err(EncodeFailure::Panic(payload)),
    }
}

/// Owner of one write-ordering chain
///
/// Entries logged through the same dispatcher land on every codec in the
/// order their calls started, whichever context they were logged on. The
/// free functions [`log`], [`debug`](fn@debug) and [`sync`] use the
/// process-wide [`Dispatcher::global`].
///
/// # Example
///
/// ```
/// use ordered_logger::prelude::*;
///
/// let sink = SharedBuffer::new();
/// let ctx = LogContext::new().with_codec(TextCodec::new(sink.clone()));
///
/// let dispatcher = Dispatcher::new();
/// dispatcher.log(&ctx, "started", &[Value::uint64("workers", 4)]);
/// dispatcher.sync();
///
/// assert!(sink.to_string_lossy().ends_with("[] started, workers=4\n"));
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    shared: Arc<Shared>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                chain: Mutex::new(ChainState {
                    pending: WriteToken::fired(),
                    last_timestamp: None,
                }),
                metrics: DispatchMetrics::new(),
            }),
        }
    }

    /// The process-wide dispatcher
    pub fn global() -> &'static Dispatcher {
        static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();
        GLOBAL.get_or_init(Dispatcher::new)
    }

    /// Log `message` with `values` to every codec attached to `ctx`.
    ///
    /// Returns once every codec has finished encoding; after that nothing
    /// reachable from `values` is read again. Writes happen in the
    /// background, in call order. A context without codecs makes this a
    /// no-op.
    ///
    /// # Panics
    ///
    /// A panic raised by a codec while encoding is resumed here, after the
    /// writes of the other codecs have been scheduled.
    pub fn log(&self, ctx: &LogContext, message: &str, values: &[Value]) {
        let codecs = ctx.codecs();
        if codecs.is_empty() {
            return;
        }

        let (previous, next, timestamp) = self.shared.advance();
        self.shared.metrics.record_dispatched();

        let entry = Entry::new(timestamp, ctx.tags(), message, values);
        let outcomes: Vec<Result<CodecWrite, EncodeFailure>> = match codecs {
            [codec] => vec![encode_one(codec, &entry)],
            [first, rest @ ..] => thread::scope(|s| {
                let spawned: Vec<_> = rest
                    .iter()
                    .map(|codec| {
                        spawn_scoped(s, "ordered-logger-encoder", move || encode_one(codec, &entry))
                            .map_err(|e| {
                                warn_spawn_failed("encoder", &e);
                                codec
                            })
                    })
                    .collect();
                let mut outcomes = vec![encode_one(first, &entry)];
                outcomes.extend(spawned.into_iter().map(|spawned| match spawned {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or_else(|payload| Err(EncodeFailure::Panic(payload))),
                    Err(codec) => encode_one(codec, &entry),
                }));
                outcomes
            }),
            [] => Vec::new(),
        };

        let mut writes = Vec::with_capacity(outcomes.len());
        let mut fatal = None;
        for (codec, outcome) in codecs.iter().zip(outcomes) {
            match outcome {
                Ok(write) => writes.push(write),
                Err(EncodeFailure::Error(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Codec '{}' failed to encode entry: {}",
                        codec.name(),
                        e
                    );
                    self.shared.metrics.record_encode_failure();
                }
                Err(EncodeFailure::Panic(payload)) => {
                    self.shared.metrics.record_panic();
                    if fatal.is_none() {
                        fatal = Some(payload);
                    }
                }
            }
        }

        let job = WriteJob {
            writes,
            done: next,
            shared: Arc::clone(&self.shared),
        };
        if let Some(job) = previous.park(job) {
            spawn_writer(job);
        }

        if let Some(payload) = fatal {
            panic::resume_unwind(payload);
        }
    }

    /// Like [`Dispatcher::log`] with a `debug` tag, when debug logging is
    /// enabled globally or for `ctx`.
    pub fn debug(&self, ctx: &LogContext, message: &str, values: &[Value]) {
        if debug_enabled(ctx) {
            self.log(&ctx.with_tag("debug"), message, values);
        }
    }

    /// Block until every entry logged before this call has been written.
    ///
    /// Calls that start concurrently with or after `sync` are not waited
    /// for.
    pub fn sync(&self) {
        let pending = Arc::clone(&self.shared.chain.lock().pending);
        pending.wait();
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.shared.metrics
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Log through the global dispatcher. See [`Dispatcher::log`].
pub fn log(ctx: &LogContext, message: &str, values: &[Value]) {
    Dispatcher::global().log(ctx, message, values);
}

/// Debug-log through the global dispatcher. See [`Dispatcher::debug`].
pub fn debug(ctx: &LogContext, message: &str, values: &[Value]) {
    Dispatcher::global().debug(ctx, message, values);
}

/// Wait for the global dispatcher. See [`Dispatcher::sync`].
pub fn sync() {
    Dispatcher::global().sync();
}
