//! Property-based tests for ordered_logger using proptest

use ordered_logger::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn kind() -> impl Strategy<Value = ValueKind> {
    prop_oneof![
        Just(ValueKind::String),
        Just(ValueKind::Int64),
        Just(ValueKind::Uint64),
        Just(ValueKind::Float64),
        Just(ValueKind::Any),
    ]
}

fn value_of(kind: ValueKind) -> Value {
    match kind {
        ValueKind::String => Value::string("v", "text"),
        ValueKind::Int64 => Value::int64("v", -1),
        ValueKind::Uint64 => Value::uint64("v", 1),
        ValueKind::Float64 => Value::float64("v", 1.5),
        ValueKind::Any => Value::any("v", Arc::new(())),
        ValueKind::Unknown => Value::default(),
    }
}

// ============================================================================
// Value Tests
// ============================================================================

proptest! {
    /// Test that string values come back unchanged
    #[test]
    fn test_string_value_roundtrip(name in "[a-z_]{1,16}", text in ".*") {
        let value = Value::string(name.clone(), text.clone());
        prop_assert_eq!(value.kind(), ValueKind::String);
        prop_assert_eq!(value.name(), name.as_str());
        prop_assert_eq!(value.as_str(), text.as_str());
    }

    /// Test that every signed integer comes back unchanged
    #[test]
    fn test_int64_value_roundtrip(n in any::<i64>()) {
        prop_assert_eq!(Value::int64("n", n).as_int64(), n);
    }

    /// Test that every unsigned integer comes back unchanged
    #[test]
    fn test_uint64_value_roundtrip(n in any::<u64>()) {
        prop_assert_eq!(Value::uint64("n", n).as_uint64(), n);
    }

    /// Test that floats keep their exact bit pattern, NaN payloads included
    #[test]
    fn test_float64_bits_roundtrip(bits in any::<u64>()) {
        let f = f64::from_bits(bits);
        prop_assert_eq!(Value::float64("f", f).as_float64().to_bits(), bits);
    }

    /// Test that boxed values are the same object that was logged
    #[test]
    fn test_any_value_roundtrip(items in prop::collection::vec(any::<u32>(), 0..8)) {
        let boxed = Arc::new(items.clone());
        let value = Value::any("items", Arc::clone(&boxed));
        let inner = value.as_any().as_any().downcast_ref::<Vec<u32>>();
        prop_assert_eq!(inner, Some(&items));
        prop_assert_eq!(value.get().to_string(), format!("{:?}", items));
    }

    /// Test that accessors of any other kind are rejected
    #[test]
    fn test_wrong_kind_is_rejected(actual in kind(), expected in kind()) {
        let value = value_of(actual);
        let result = match expected {
            ValueKind::String => value.try_str().map(|_| ()),
            ValueKind::Int64 => value.try_int64().map(|_| ()),
            ValueKind::Uint64 => value.try_uint64().map(|_| ()),
            ValueKind::Float64 => value.try_float64().map(|_| ()),
            _ => value.try_any().map(|_| ()),
        };

        if actual == expected {
            prop_assert!(result.is_ok());
        } else {
            let message = result.unwrap_err().to_string();
            prop_assert_eq!(
                message,
                format!("value type mismatch: {} != {}", actual, expected)
            );
        }
    }
}

// ============================================================================
// Tag and Context Tests
// ============================================================================

proptest! {
    /// Test that tags render as key or key=value
    #[test]
    fn test_tag_display(key in "[a-z]{1,8}", value in "[a-z0-9]{0,8}") {
        let tag = Tag::pair(key.clone(), value.clone());
        let expected = if value.is_empty() { key } else { format!("{}={}", key, value) };
        prop_assert_eq!(tag.to_string(), expected);
    }

    /// Test that deriving never changes the parent and keeps attach order
    #[test]
    fn test_context_derivation(keys in prop::collection::vec("[a-z]{1,6}", 0..12)) {
        let root = LogContext::new();
        let mut ctx = root.clone();
        for key in &keys {
            ctx = ctx.with_tag(key.clone());
        }

        prop_assert!(root.tags().is_empty());
        let attached: Vec<&str> = ctx.tags().iter().map(|t| t.key.as_str()).collect();
        let expected: Vec<&str> = keys.iter().map(String::as_str).collect();
        prop_assert_eq!(attached, expected);
    }
}

// ============================================================================
// Codec Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Test that the text codec writes every value in logged order
    #[test]
    fn test_text_codec_renders_values(values in prop::collection::vec(any::<i64>(), 0..10)) {
        let sink = SharedBuffer::new();
        let ctx = LogContext::new().with_codec(TextCodec::new(sink.clone()));
        let logged: Vec<Value> = values.iter().map(|&n| Value::int64("n", n)).collect();

        let dispatcher = Dispatcher::new();
        dispatcher.log(&ctx, "m", &logged);
        dispatcher.sync();

        let mut expected = String::from("[] m");
        for n in &values {
            expected.push_str(&format!(", n={}", n));
        }
        let lines = sink.lines();
        prop_assert!(lines[0].ends_with(&expected));
    }

    /// Test that the json codec preserves unsigned integers exactly
    #[test]
    fn test_json_codec_preserves_uint64(n in any::<u64>()) {
        let sink = SharedBuffer::new();
        let ctx = LogContext::new().with_codec(JsonCodec::new(sink.clone()));

        let dispatcher = Dispatcher::new();
        dispatcher.log(&ctx, "m", &[Value::uint64("n", n)]);
        dispatcher.sync();

        let record: serde_json::Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        prop_assert_eq!(record["data"]["n"].as_u64(), Some(n));
    }
}
