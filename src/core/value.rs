//! Typed, named values carried by log entries
//!
//! A [`Value`] is immutable once built: its [`ValueKind`] is fixed by the
//! constructor that created it. Codecs read values back through the
//! kind-specific accessors, or through [`Value::get`] when they iterate
//! heterogeneous lists.
//!
//! Reading a value through the accessor of another kind is a codec bug, not
//! bad input, so the accessors panic instead of coercing. The `try_*`
//! variants exist for code that probes values it did not build.

use super::error::{LoggerError, Result};
use serde::Serialize;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Kind of payload stored in a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueKind {
    /// The zero value; never produced by a constructor
    #[default]
    Unknown,
    String,
    Int64,
    Uint64,
    Float64,
    Any,
}

impl ValueKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            ValueKind::Unknown => "Unknown",
            ValueKind::String => "String",
            ValueKind::Int64 => "Int64",
            ValueKind::Uint64 => "Uint64",
            ValueKind::Float64 => "Float64",
            ValueKind::Any => "Any",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// A boxed value of arbitrary type logged with [`Value::any`] or
/// [`Value::describable`].
///
/// `describe` is the narrow "render yourself as text" capability. Values
/// that return `None` are rendered by codecs through their `Debug` form.
pub trait AnyValue: fmt::Debug + Send + Sync {
    fn describe(&self) -> Option<String> {
        None
    }

    /// Access the boxed value for downcasting
    fn as_any(&self) -> &dyn Any;
}

struct Opaque<T>(Arc<T>);

impl<T: fmt::Debug> fmt::Debug for Opaque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> AnyValue for Opaque<T>
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        &*self.0
    }
}

struct Described<T>(Arc<T>);

impl<T: fmt::Display> fmt::Debug for Described<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> AnyValue for Described<T>
where
    T: fmt::Display + Send + Sync + 'static,
{
    fn describe(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn as_any(&self) -> &dyn Any {
        &*self.0
    }
}

#[derive(Clone, Default)]
enum Payload {
    #[default]
    Empty,
    Text(Cow<'static, str>),
    // i64, u64 and f64 share one fixed-width slot
    Bits(u64),
    Boxed(Arc<dyn AnyValue>),
}

/// A named, kind-tagged unit of log data
#[derive(Clone, Default)]
pub struct Value {
    name: Cow<'static, str>,
    kind: ValueKind,
    payload: Payload,
}

/// Dynamically typed view of a [`Value`], produced by [`Value::get`]
#[derive(Debug, Clone)]
pub enum DynValue<'a> {
    Str(&'a str),
    Int64(i64),
    Uint64(u64),
    Float64(f64),
    /// Boxed value that described itself
    Text(String),
    /// Boxed value without the describe capability
    Opaque(&'a dyn AnyValue),
}

impl fmt::Display for DynValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynValue::Str(s) => f.write_str(s),
            DynValue::Int64(i) => write!(f, "{}", i),
            DynValue::Uint64(u) => write!(f, "{}", u),
            DynValue::Float64(fl) => write!(f, "{}", fl),
            DynValue::Text(s) => f.write_str(s),
            DynValue::Opaque(v) => write!(f, "{:?}", v),
        }
    }
}

impl Serialize for DynValue<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DynValue::Str(s) => serializer.serialize_str(s),
            DynValue::Int64(i) => serializer.serialize_i64(*i),
            DynValue::Uint64(u) => serializer.serialize_u64(*u),
            // serde_json writes non-finite floats as null
            DynValue::Float64(fl) => serializer.serialize_f64(*fl),
            DynValue::Text(s) => serializer.serialize_str(s),
            DynValue::Opaque(v) => serializer.collect_str(&format_args!("{:?}", v)),
        }
    }
}

impl Value {
    fn with_payload(name: impl Into<Cow<'static, str>>, kind: ValueKind, payload: Payload) -> Self {
        Self {
            name: name.into(),
            kind,
            payload,
        }
    }

    /// Build a value from any type with a natural kind (integers, floats,
    /// strings, booleans and chars)
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl ToValue) -> Self {
        value.to_value(name.into())
    }

    pub fn string(name: impl Into<Cow<'static, str>>, value: impl Into<Cow<'static, str>>) -> Self {
        Self::with_payload(name, ValueKind::String, Payload::Text(value.into()))
    }

    pub fn int64(name: impl Into<Cow<'static, str>>, value: i64) -> Self {
        Self::with_payload(name, ValueKind::Int64, Payload::Bits(value as u64))
    }

    pub fn uint64(name: impl Into<Cow<'static, str>>, value: u64) -> Self {
        Self::with_payload(name, ValueKind::Uint64, Payload::Bits(value))
    }

    pub fn float64(name: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::with_payload(name, ValueKind::Float64, Payload::Bits(value.to_bits()))
    }

    /// Box an arbitrary value by reference. Codecs render it through `Debug`.
    pub fn any<T>(name: impl Into<Cow<'static, str>>, value: Arc<T>) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self::with_payload(name, ValueKind::Any, Payload::Boxed(Arc::new(Opaque(value))))
    }

    /// Box a value that knows how to render itself as text
    pub fn describable<T>(name: impl Into<Cow<'static, str>>, value: Arc<T>) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self::with_payload(name, ValueKind::Any, Payload::Boxed(Arc::new(Described(value))))
    }

    /// Box a custom [`AnyValue`] implementation
    pub fn boxed(name: impl Into<Cow<'static, str>>, value: Arc<dyn AnyValue>) -> Self {
        Self::with_payload(name, ValueKind::Any, Payload::Boxed(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    fn check_kind(&self, want: ValueKind) {
        if self.kind != want {
            panic!("value type mismatch: {} != {}", self.kind, want);
        }
    }

    fn try_kind(&self, want: ValueKind) -> Result<()> {
        if self.kind != want {
            return Err(LoggerError::type_mismatch(want, self.kind));
        }
        Ok(())
    }

    fn bits(&self) -> u64 {
        match self.payload {
            Payload::Bits(bits) => bits,
            _ => unreachable!("numeric kind without numeric payload"),
        }
    }

    /// # Panics
    ///
    /// Panics if the value is not a string.
    pub fn as_str(&self) -> &str {
        self.check_kind(ValueKind::String);
        match &self.payload {
            Payload::Text(s) => s,
            _ => unreachable!("string kind without string payload"),
        }
    }

    /// # Panics
    ///
    /// Panics if the value is not an int64.
    pub fn as_int64(&self) -> i64 {
        self.check_kind(ValueKind::Int64);
        self.bits() as i64
    }

    /// # Panics
    ///
    /// Panics if the value is not a uint64.
    pub fn as_uint64(&self) -> u64 {
        self.check_kind(ValueKind::Uint64);
        self.bits()
    }

    /// # Panics
    ///
    /// Panics if the value is not a float64.
    pub fn as_float64(&self) -> f64 {
        self.check_kind(ValueKind::Float64);
        f64::from_bits(self.bits())
    }

    /// # Panics
    ///
    /// Panics if the value is not a boxed value.
    pub fn as_any(&self) -> &dyn AnyValue {
        self.check_kind(ValueKind::Any);
        match &self.payload {
            Payload::Boxed(v) => v.as_ref(),
            _ => unreachable!("any kind without boxed payload"),
        }
    }

    pub fn try_str(&self) -> Result<&str> {
        self.try_kind(ValueKind::String)?;
        Ok(self.as_str())
    }

    pub fn try_int64(&self) -> Result<i64> {
        self.try_kind(ValueKind::Int64)?;
        Ok(self.as_int64())
    }

    pub fn try_uint64(&self) -> Result<u64> {
        self.try_kind(ValueKind::Uint64)?;
        Ok(self.as_uint64())
    }

    pub fn try_float64(&self) -> Result<f64> {
        self.try_kind(ValueKind::Float64)?;
        Ok(self.as_float64())
    }

    pub fn try_any(&self) -> Result<&dyn AnyValue> {
        self.try_kind(ValueKind::Any)?;
        Ok(self.as_any())
    }

    /// Read the value without knowing its kind up front.
    ///
    /// Boxed values that can describe themselves come back as
    /// [`DynValue::Text`]; the others are handed back unchanged for the
    /// caller to introspect.
    ///
    /// # Panics
    ///
    /// Panics on the `Unknown` zero value.
    pub fn get(&self) -> DynValue<'_> {
        match self.kind {
            ValueKind::Unknown => panic!("no data"),
            ValueKind::String => DynValue::Str(self.as_str()),
            ValueKind::Int64 => DynValue::Int64(self.as_int64()),
            ValueKind::Uint64 => DynValue::Uint64(self.as_uint64()),
            ValueKind::Float64 => DynValue::Float64(self.as_float64()),
            ValueKind::Any => {
                let boxed = self.as_any();
                match boxed.describe() {
                    Some(text) => DynValue::Text(text),
                    None => DynValue::Opaque(boxed),
                }
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Value");
        s.field("name", &self.name).field("kind", &self.kind);
        match &self.payload {
            Payload::Empty => {}
            Payload::Text(text) => {
                s.field("value", text);
            }
            Payload::Bits(_) => {
                s.field("value", &self.get());
            }
            Payload::Boxed(boxed) => {
                s.field("value", boxed);
            }
        }
        s.finish()
    }
}

/// Conversion used by [`Value::new`] and the logging macros
pub trait ToValue {
    fn to_value(self, name: Cow<'static, str>) -> Value;
}

macro_rules! impl_to_value {
    ($ctor:ident, $as:ty => $($t:ty),+) => {
        $(
            impl ToValue for $t {
                fn to_value(self, name: Cow<'static, str>) -> Value {
                    Value::$ctor(name, self as $as)
                }
            }
        )+
    };
}

impl_to_value!(int64, i64 => i8, i16, i32, i64, isize);
impl_to_value!(uint64, u64 => u8, u16, u32, u64, usize);
impl_to_value!(float64, f64 => f32, f64);

impl ToValue for &str {
    fn to_value(self, name: Cow<'static, str>) -> Value {
        Value::string(name, self.to_owned())
    }
}

impl ToValue for String {
    fn to_value(self, name: Cow<'static, str>) -> Value {
        Value::string(name, self)
    }
}

impl ToValue for &String {
    fn to_value(self, name: Cow<'static, str>) -> Value {
        Value::string(name, self.clone())
    }
}

impl ToValue for Cow<'static, str> {
    fn to_value(self, name: Cow<'static, str>) -> Value {
        Value::string(name, self)
    }
}

impl ToValue for bool {
    fn to_value(self, name: Cow<'static, str>) -> Value {
        Value::string(name, if self { "true" } else { "false" })
    }
}

impl ToValue for char {
    fn to_value(self, name: Cow<'static, str>) -> Value {
        Value::string(name, self.to_string())
    }
}

impl ToValue for Value {
    fn to_value(self, name: Cow<'static, str>) -> Value {
        Value { name, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Debug)]
    struct Counter(AtomicI64);

    impl fmt::Display for Counter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(Value::string("s", "x").kind(), ValueKind::String);
        assert_eq!(Value::int64("i", -1).kind(), ValueKind::Int64);
        assert_eq!(Value::uint64("u", 1).kind(), ValueKind::Uint64);
        assert_eq!(Value::float64("f", 0.5).kind(), ValueKind::Float64);
        assert_eq!(Value::any("a", Arc::new(vec![1, 2])).kind(), ValueKind::Any);
        assert_eq!(Value::default().kind(), ValueKind::Unknown);
    }

    #[test]
    fn test_accessors_return_original_values() {
        assert_eq!(Value::string("s", "hello").as_str(), "hello");
        assert_eq!(Value::int64("i", i64::MIN).as_int64(), i64::MIN);
        assert_eq!(Value::uint64("u", u64::MAX).as_uint64(), u64::MAX);

        let nan = f64::from_bits(0x7ff8_0000_0000_0001);
        let back = Value::float64("f", nan).as_float64();
        assert_eq!(back.to_bits(), nan.to_bits());

        let neg_zero = Value::float64("z", -0.0).as_float64();
        assert!(neg_zero.is_sign_negative());
    }

    #[test]
    fn test_name_is_preserved() {
        let v = Value::new(String::from("dynamic name"), 42_u8);
        assert_eq!(v.name(), "dynamic name");
        assert_eq!(v.kind(), ValueKind::Uint64);
        assert_eq!(v.as_uint64(), 42);
    }

    #[test]
    #[should_panic(expected = "value type mismatch: String != Int64")]
    fn test_wrong_accessor_panics() {
        let v = Value::string("s", "not a number");
        let _ = v.as_int64();
    }

    #[test]
    #[should_panic(expected = "no data")]
    fn test_get_on_zero_value_panics() {
        let _ = Value::default().get();
    }

    #[test]
    fn test_try_accessor_reports_both_kinds() {
        let v = Value::float64("f", 1.0);
        match v.try_uint64() {
            Err(LoggerError::TypeMismatch { expected, actual }) => {
                assert_eq!(expected, ValueKind::Uint64);
                assert_eq!(actual, ValueKind::Float64);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(v.try_float64().unwrap(), 1.0);
    }

    #[test]
    fn test_get_prefers_description() {
        let counter = Arc::new(Counter(AtomicI64::new(123)));
        let v = Value::describable("counter", Arc::clone(&counter));
        match v.get() {
            DynValue::Text(text) => assert_eq!(text, "123"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_get_falls_back_to_opaque() {
        let v = Value::any("list", Arc::new(vec![1_u8, 2, 3]));
        match v.get() {
            DynValue::Opaque(boxed) => {
                assert!(boxed.describe().is_none());
                let list = boxed.as_any().downcast_ref::<Vec<u8>>().unwrap();
                assert_eq!(list, &vec![1, 2, 3]);
            }
            other => panic!("expected opaque, got {:?}", other),
        }
        assert_eq!(v.get().to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_boxed_value_is_shared_by_reference() {
        let counter = Arc::new(Counter(AtomicI64::new(1)));
        let v = Value::describable("counter", Arc::clone(&counter));
        counter.0.store(2, Ordering::SeqCst);
        assert_eq!(v.get().to_string(), "2");
    }

    #[test]
    fn test_to_value_conversions() {
        assert_eq!(Value::new("a", -3_i32).as_int64(), -3);
        assert_eq!(Value::new("b", 7_usize).as_uint64(), 7);
        assert_eq!(Value::new("c", 1.5_f32).as_float64(), 1.5);
        assert_eq!(Value::new("d", true).as_str(), "true");
        assert_eq!(Value::new("e", 'x').as_str(), "x");

        let renamed = Value::new("f", Value::int64("old", 9));
        assert_eq!(renamed.name(), "f");
        assert_eq!(renamed.as_int64(), 9);
    }

    #[test]
    fn test_dyn_value_display() {
        assert_eq!(Value::int64("i", -12).get().to_string(), "-12");
        assert_eq!(Value::float64("f", 0.25).get().to_string(), "0.25");
        assert_eq!(Value::string("s", "txt").get().to_string(), "txt");
    }
}
