//! Basic logger usage example
//!
//! Demonstrates contexts, tags, typed values and debug switches with the
//! text codec writing to stdout.
//!
//! Run with: cargo run --example basic_usage

use ordered_logger::prelude::*;
use ordered_logger::{debug, log};
use std::io;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Ordered Logger - Basic Usage Example ===\n");

    // Root context with a text codec on stdout
    let root = LogContext::builder()
        .codec(TextCodec::new(io::stdout()).with_colors(true))
        .tag("demo")
        .build();

    println!("1. Logging typed values:");
    ordered_logger::log(
        &root,
        "service started",
        &[
            Value::string("version", env!("CARGO_PKG_VERSION")),
            Value::uint64("workers", 4),
            Value::int64("offset", -3),
            Value::float64("load", 0.25),
        ],
    );
    ordered_logger::sync();

    println!("\n2. Deriving contexts with extra tags:");
    let http = root.with_tag_pair("component", "http");
    let db = root.with_tag_pair("component", "db");
    log!(http, "request served", status = 200, path = "/health");
    log!(db, "query finished", rows = 42_u64, secs = 0.003);
    log!(root, "parent context is unchanged");
    ordered_logger::sync();

    println!("\n3. Boxed values:");
    let peers = Arc::new(vec!["10.0.0.1", "10.0.0.2"]);
    let addr = Arc::new(std::net::Ipv4Addr::new(192, 168, 0, 1));
    ordered_logger::log(
        &root,
        "cluster view",
        &[Value::any("peers", peers), Value::describable("self", addr)],
    );
    ordered_logger::sync();

    println!("\n4. Debug logging:");
    debug!(root, "hidden while debugging is off", step = 1);
    set_debug_enabled(&root, true);
    debug!(http, "shown for every context sharing the root", step = 2);
    set_debug_enabled(&root, false);
    ordered_logger::sync();

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
