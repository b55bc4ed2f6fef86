//! Concurrent logging example
//!
//! Demonstrates many threads logging through one dispatcher while a slow
//! file sink writes in the background, in call order.
//!
//! Run with: cargo run --example concurrent_logging

use ordered_logger::prelude::*;
use std::fs::{self, File};
use std::thread;
use std::time::Instant;

const THREADS: u64 = 8;
const PER_THREAD: u64 = 5_000;

fn main() -> Result<()> {
    println!("=== Ordered Logger - Concurrent Logging Example ===\n");

    let path = std::env::temp_dir().join("ordered_logger_concurrent.log");
    let ctx = LogContext::builder()
        .codec(TextCodec::new(File::create(&path)?))
        .tag("worker")
        .build();
    let dispatcher = Dispatcher::new();

    println!("1. Logging {} entries from {} threads...", THREADS * PER_THREAD, THREADS);
    let start = Instant::now();
    thread::scope(|s| {
        for t in 0..THREADS {
            let ctx = ctx.with_tag_pair("id", t.to_string());
            let dispatcher = &dispatcher;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    dispatcher.log(&ctx, "tick", &[Value::uint64("seq", i)]);
                }
            });
        }
    });
    let returned = start.elapsed();

    dispatcher.sync();
    let written = start.elapsed();

    println!("   All log calls returned after {:?}", returned);
    println!("   All entries written after {:?}", written);

    println!("\n2. Checking the file is in timestamp order...");
    let contents = fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();
    let stamp_len = "2025-01-08 10:30:45.123456+0000".len();
    let sorted = lines
        .windows(2)
        .all(|pair| pair[0][..stamp_len] <= pair[1][..stamp_len]);
    println!("   {} lines, sorted: {}", lines.len(), sorted);

    let metrics = dispatcher.metrics();
    println!("\n3. Metrics:");
    println!("   dispatched: {}", metrics.dispatched());
    println!("   written: {}", metrics.written());
    println!("   failure rate: {:.2}%", metrics.failure_rate());

    fs::remove_file(&path)?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
