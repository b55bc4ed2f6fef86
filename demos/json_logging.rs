//! JSON logging example
//!
//! Demonstrates the JSON codec next to the text codec, and a custom codec
//! written against the `Codec` trait.
//!
//! Run with: cargo run --example json_logging

use ordered_logger::prelude::*;
use std::io;

/// Prints the message length and value count of each entry
struct LengthCodec;

impl Codec for LengthCodec {
    fn name(&self) -> &str {
        "length"
    }

    fn encode(&self, entry: &Entry<'_>) -> Result<PendingWrite> {
        let summary = format!(
            "   [length codec] {} bytes, {} values",
            entry.message.len(),
            entry.values.len()
        );
        Ok(Box::new(move || -> Result<()> {
            println!("{}", summary);
            Ok(())
        }))
    }
}

fn main() -> Result<()> {
    println!("=== Ordered Logger - JSON Logging Example ===\n");

    println!("1. One JSON object per line:");
    let json = LogContext::new()
        .with_codec(JsonCodec::new(io::stdout()))
        .with_tag("api")
        .with_tag_pair("region", "eu-west-1");
    let dispatcher = Dispatcher::new();
    dispatcher.log(
        &json,
        "user login",
        &[
            Value::string("user", "alice"),
            Value::uint64("attempts", 1),
            Value::float64("latency_ms", 12.5),
        ],
    );
    dispatcher.log(&json, "no values or extra tags", &[]);
    dispatcher.sync();

    println!("\n2. Pretty-printed records:");
    let pretty = LogContext::new()
        .with_codec(JsonCodec::new(io::stdout()).pretty().with_timestamp_format(TimestampFormat::Rfc3339));
    dispatcher.log(&pretty, "pretty record", &[Value::int64("delta", -7)]);
    dispatcher.sync();

    println!("\n3. Several codecs on one context:");
    let mixed = json
        .with_codec(TextCodec::new(io::stdout()))
        .with_codec(LengthCodec);
    dispatcher.log(&mixed, "written three ways", &[Value::string("key", "value")]);
    dispatcher.sync();

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
