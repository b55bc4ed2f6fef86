//! JSON codec for structured logging
//!
//! Writes each entry as one JSON object per line (JSONL), compatible with
//! log aggregation tools like ELK, Loki, etc.

use crate::core::{Codec, DynValue, Entry, LoggerError, PendingWrite, Result, Tag, TimestampFormat, ValueKind};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

/// Shape of one encoded entry
#[derive(Debug, Serialize)]
struct JsonRecord<'a> {
    date: String,
    dateunix: i64,
    nanoseconds: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    message: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    data: BTreeMap<&'a str, DynValue<'a>>,
}

fn render_tags(tags: &[Tag]) -> Vec<String> {
    tags.iter().map(Tag::to_string).collect()
}

pub struct JsonCodec<W> {
    writer: Arc<Mutex<W>>,
    timestamp_format: TimestampFormat,
    pretty: bool,
}

impl<W: Write + Send + 'static> JsonCodec<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
            timestamp_format: TimestampFormat::default(),
            pretty: false,
        }
    }

    /// Pretty-print each record (records then span several lines)
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Format used for the `date` field
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn to_record<'a>(&self, entry: &Entry<'a>) -> Result<JsonRecord<'a>> {
        // later values win on duplicate names
        let data = entry
            .values
            .iter()
            .filter(|value| value.kind() != ValueKind::Unknown)
            .map(|value| (value.name(), value.get()))
            .collect();

        let date = self.timestamp_format.format(&entry.timestamp).map_err(|_| {
            LoggerError::encode("json", format!("invalid timestamp format {:?}", self.timestamp_format))
        })?;

        Ok(JsonRecord {
            date,
            dateunix: entry.timestamp.timestamp(),
            nanoseconds: entry.timestamp.timestamp_subsec_nanos(),
            tags: render_tags(entry.tags),
            message: entry.message,
            data,
        })
    }
}

impl<W: Write + Send + 'static> Codec for JsonCodec<W> {
    fn name(&self) -> &str {
        "json"
    }

    fn encode(&self, entry: &Entry<'_>) -> Result<PendingWrite> {
        let record = self.to_record(entry)?;
        let mut bytes = if self.pretty {
            serde_json::to_vec_pretty(&record)?
        } else {
            serde_json::to_vec(&record)?
        };
        bytes.push(b'\n');

        let writer = Arc::clone(&self.writer);
        Ok(Box::new(move || -> Result<()> {
            writer
                .lock()
                .write_all(&bytes)
                .map_err(|e| LoggerError::io_operation("writing json entry", "sink rejected entry", e))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Dispatcher, LogContext, Value};
    use crate::sink::SharedBuffer;

    fn log_json(ctx: &LogContext, message: &str, values: &[Value]) {
        let dispatcher = Dispatcher::new();
        dispatcher.log(ctx, message, values);
        dispatcher.sync();
    }

    #[test]
    fn test_json_record_fields() -> std::result::Result<(), serde_json::Error> {
        let sink = SharedBuffer::new();
        let ctx = LogContext::new()
            .with_codec(JsonCodec::new(sink.clone()))
            .with_tag("auth")
            .with_tag_pair("user", "alice");

        log_json(
            &ctx,
            "login",
            &[
                Value::uint64("attempts", u64::MAX),
                Value::int64("delta", -2),
                Value::float64("secs", 1.25),
                Value::string("method", "token"),
            ],
        );

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&lines[0])?;

        assert!(parsed["date"].as_str().unwrap().ends_with("+0000"));
        assert!(parsed["dateunix"].as_i64().unwrap() > 0);
        assert!(parsed["nanoseconds"].as_u64().unwrap() < 2_000_000_000);
        assert_eq!(parsed["tags"], serde_json::json!(["auth", "user=alice"]));
        assert_eq!(parsed["message"], "login");
        assert_eq!(parsed["data"]["attempts"].as_u64(), Some(u64::MAX));
        assert_eq!(parsed["data"]["delta"], -2);
        assert_eq!(parsed["data"]["secs"], 1.25);
        assert_eq!(parsed["data"]["method"], "token");
        Ok(())
    }

    #[test]
    fn test_empty_tags_and_data_are_omitted() -> std::result::Result<(), serde_json::Error> {
        let sink = SharedBuffer::new();
        let ctx = LogContext::new().with_codec(JsonCodec::new(sink.clone()));
        log_json(&ctx, "bare", &[Value::default()]);

        let parsed: serde_json::Value = serde_json::from_str(&sink.lines()[0])?;
        let object = parsed.as_object().unwrap();
        assert!(!object.contains_key("tags"));
        assert!(!object.contains_key("data"));
        Ok(())
    }

    #[test]
    fn test_special_values() -> std::result::Result<(), serde_json::Error> {
        let sink = SharedBuffer::new();
        let ctx = LogContext::new().with_codec(JsonCodec::new(sink.clone()));
        log_json(
            &ctx,
            "special",
            &[
                Value::float64("nan", f64::NAN),
                Value::any("pair", Arc::new((1, "a"))),
                Value::describable("addr", Arc::new(std::net::Ipv4Addr::LOCALHOST)),
                Value::int64("dup", 1),
                Value::int64("dup", 2),
            ],
        );

        let parsed: serde_json::Value = serde_json::from_str(&sink.lines()[0])?;
        assert!(parsed["data"]["nan"].is_null());
        assert_eq!(parsed["data"]["pair"], "(1, \"a\")");
        assert_eq!(parsed["data"]["addr"], "127.0.0.1");
        assert_eq!(parsed["data"]["dup"], 2);
        Ok(())
    }

    #[test]
    fn test_invalid_timestamp_format_skips_entry() {
        let sink = SharedBuffer::new();
        let codec = JsonCodec::new(sink.clone())
            .with_timestamp_format(TimestampFormat::Custom("%Q".to_string()));
        let ctx = LogContext::new().with_codec(codec);

        let dispatcher = Dispatcher::new();
        let logged = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            dispatcher.log(&ctx, "hello", &[Value::int64("n", 1)]);
        }));
        dispatcher.sync();

        assert!(logged.is_ok());
        assert!(sink.is_empty());
        assert_eq!(dispatcher.metrics().encode_failures(), 1);
        assert_eq!(dispatcher.metrics().panics(), 0);
    }

    #[test]
    fn test_pretty_output_is_valid_json() -> std::result::Result<(), serde_json::Error> {
        let sink = SharedBuffer::new();
        let ctx = LogContext::new().with_codec(JsonCodec::new(sink.clone()).pretty());
        log_json(&ctx, "pretty", &[Value::int64("n", 1)]);

        let text = sink.to_string_lossy();
        assert!(text.lines().count() > 1);
        let parsed: serde_json::Value = serde_json::from_str(text.trim_end())?;
        assert_eq!(parsed["data"]["n"], 1);
        Ok(())
    }
}
