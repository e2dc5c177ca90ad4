//! In-memory value universe
//!
//! [`Value`] is everything the codec can encode: JSON primitives, ordered
//! sequences, insertion-ordered mappings, and composites behind
//! [`Reflect`]. Conversions into `Value` go through `From`; conversions back
//! out go through [`FromValue`].

use indexmap::IndexMap;
use thiserror::Error;

use crate::error::{CodecError, CodecResult};
use crate::reflect::Reflect;

/// Field name → value, insertion ordered
pub type Fields = IndexMap<String, Value>;

/// Encodable value
#[derive(Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Unsigned integer above `i64::MAX`
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(Fields),
    Object(Box<dyn Reflect>),
}

impl Value {
    /// Box a composite
    pub fn object<T: Reflect>(value: T) -> Self {
        Value::Object(Box::new(value))
    }

    /// Short name of the variant, or the type path for composites
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(object) => object.type_path(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&dyn Reflect> {
        match self {
            Value::Object(object) => Some(&**object),
            _ => None,
        }
    }

    /// Borrow the composite as a concrete type
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_object()
            .and_then(|object| object.as_any().downcast_ref::<T>())
    }

    /// Take the composite as a concrete type
    pub fn into_object<T: Reflect>(self) -> Result<T, ValueMismatch> {
        match self {
            Value::Object(object) => {
                let found = object.type_path();
                object
                    .into_any()
                    .downcast::<T>()
                    .map(|boxed| *boxed)
                    .map_err(|_| ValueMismatch::new(std::any::type_name::<T>(), found))
            },
            other => Err(ValueMismatch::new(
                std::any::type_name::<T>(),
                other.type_name(),
            )),
        }
    }

    /// Convert into a field value, attributing failures to `type_path.field`
    pub fn into_field<T: FromValue>(self, type_path: &str, field: &str) -> CodecResult<T> {
        T::from_value(self).map_err(|err| CodecError::field(type_path, field, err))
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::UInt(u) => Value::UInt(*u),
            Value::Float(f) => Value::Float(*f),
            Value::Str(s) => Value::Str(s.clone()),
            Value::List(items) => Value::List(items.clone()),
            Value::Map(fields) => Value::Map(fields.clone()),
            Value::Object(object) => Value::Object(object.clone_boxed()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.eq_dyn(&**b),
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Into Value
// ═══════════════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! from_lossless_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Value::Int)
            .unwrap_or(Value::UInt(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::from(value as u64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<Box<dyn Reflect>> for Value {
    fn from(value: Box<dyn Reflect>) -> Self {
        Value::Object(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<IndexMap<String, T>> for Value {
    fn from(values: IndexMap<String, T>) -> Self {
        Value::Map(values.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// From Value
// ═══════════════════════════════════════════════════════════════════════════

/// Decoded value had the wrong kind for its destination
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct ValueMismatch {
    pub expected: String,
    pub found: String,
}

impl ValueMismatch {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Conversion out of a decoded [`Value`]
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueMismatch>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(ValueMismatch::new("bool", other.type_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Int(i) => Ok(i),
            other => Err(ValueMismatch::new("int", other.type_name())),
        }
    }
}

macro_rules! from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    let i = i64::from_value(value)?;
                    <$ty>::try_from(i).map_err(|_| {
                        ValueMismatch::new(stringify!($ty), format!("out-of-range int {}", i))
                    })
                }
            }
        )*
    };
}

from_value_int!(i8, i16, i32, u8, u16, u32);

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::UInt(u) => Ok(u),
            Value::Int(i) => u64::try_from(i)
                .map_err(|_| ValueMismatch::new("u64", format!("out-of-range int {}", i))),
            other => Err(ValueMismatch::new("int", other.type_name())),
        }
    }
}

impl FromValue for usize {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        let u = u64::from_value(value)?;
        usize::try_from(u)
            .map_err(|_| ValueMismatch::new("usize", format!("out-of-range int {}", u)))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            Value::UInt(u) => Ok(u as f64),
            other => Err(ValueMismatch::new("float", other.type_name())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(ValueMismatch::new("str", other.type_name())),
        }
    }
}

impl FromValue for Box<dyn Reflect> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(ValueMismatch::new("object", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(ValueMismatch::new("list", other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Map(fields) => fields
                .into_iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k, v)))
                .collect(),
            other => Err(ValueMismatch::new("map", other.type_name())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Keyword arguments
// ═══════════════════════════════════════════════════════════════════════════

/// Decoded fields handed to [`Record::from_fields`]
///
/// Each accessor removes the field it reads; [`FieldArgs::finish`] rejects
/// whatever is left, the way keyword construction rejects unexpected
/// keywords.
///
/// [`Record::from_fields`]: crate::Record::from_fields
#[derive(Debug, Clone)]
pub struct FieldArgs {
    type_path: &'static str,
    fields: Fields,
}

impl FieldArgs {
    pub fn new(type_path: &'static str, fields: Fields) -> Self {
        Self { type_path, fields }
    }

    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Required keyword
    pub fn require<T: FromValue>(&mut self, name: &str) -> CodecResult<T> {
        match self.fields.shift_remove(name) {
            Some(value) => value.into_field(self.type_path, name),
            None => Err(CodecError::field(
                self.type_path,
                name,
                "missing required field",
            )),
        }
    }

    /// Keyword with a default when absent
    pub fn or<T: FromValue>(&mut self, name: &str, default: T) -> CodecResult<T> {
        match self.fields.shift_remove(name) {
            Some(value) => value.into_field(self.type_path, name),
            None => Ok(default),
        }
    }

    pub fn or_default<T: FromValue + Default>(&mut self, name: &str) -> CodecResult<T> {
        self.or(name, T::default())
    }

    /// Nested composite of a known type
    pub fn object<T: Reflect>(&mut self, name: &str) -> CodecResult<T> {
        match self.fields.shift_remove(name) {
            Some(value) => value
                .into_object::<T>()
                .map_err(|err| CodecError::field(self.type_path, name, err)),
            None => Err(CodecError::field(
                self.type_path,
                name,
                "missing required field",
            )),
        }
    }

    /// Fail on any keyword no accessor consumed
    pub fn finish(self) -> CodecResult<()> {
        match self.fields.keys().next() {
            Some(name) => Err(CodecError::unknown_field(self.type_path, name.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reflect::Shape;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i64,
    }

    impl Reflect for Point {
        fn type_path(&self) -> &'static str {
            "tests::Point"
        }

        fn shape(&self) -> Shape {
            let mut fields = Fields::new();
            fields.insert("x".to_string(), self.x.into());
            Shape::Record(fields)
        }
    }

    fn args(pairs: Vec<(&str, Value)>) -> FieldArgs {
        FieldArgs::new(
            "tests::Args",
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_primitive_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(34u32), Value::Int(34));
        assert_eq!(Value::from(u64::MAX), Value::UInt(u64::MAX));
        assert_eq!(Value::from(7u64), Value::Int(7));
        assert_eq!(Value::from("a"), Value::Str("a".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(
            Value::from(vec![1i64, 2, 3]),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_from_value_widths() {
        assert_eq!(u32::from_value(Value::Int(7)), Ok(7));
        assert!(u32::from_value(Value::Int(-1)).is_err());
        assert!(u8::from_value(Value::Int(300)).is_err());
        assert_eq!(f64::from_value(Value::Int(10)), Ok(10.0));
        assert_eq!(Option::<u64>::from_value(Value::Null), Ok(None));
        assert_eq!(u64::from_value(Value::from(u64::MAX)), Ok(u64::MAX));
        assert!(u64::from_value(Value::Int(-1)).is_err());
        assert!(i64::from_value(Value::UInt(u64::MAX)).is_err());
        assert_eq!(
            Vec::<String>::from_value(Value::List(vec!["a".into()])),
            Ok(vec!["a".to_string()])
        );

        let err = bool::from_value(Value::Str("true".into())).unwrap_err();
        assert_eq!(err.expected, "bool");
        assert_eq!(err.found, "str");
    }

    #[test]
    fn test_object_equality_and_downcast() {
        let a = Value::object(Point { x: 1 });
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::object(Point { x: 2 }));
        assert_eq!(a.type_name(), "tests::Point");
        assert_eq!(a.downcast_ref::<Point>(), Some(&Point { x: 1 }));
        assert_eq!(a.into_object::<Point>(), Ok(Point { x: 1 }));
        assert!(Value::Int(1).into_object::<Point>().is_err());
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let mut a = Fields::new();
        a.insert("k1".into(), Value::Int(1));
        a.insert("k2".into(), Value::Int(2));
        let mut b = Fields::new();
        b.insert("k2".into(), Value::Int(2));
        b.insert("k1".into(), Value::Int(1));
        assert_eq!(Value::Map(a), Value::Map(b));
    }

    #[test]
    fn test_field_args_accessors() {
        let mut args = args(vec![
            ("field1", Value::Int(23)),
            ("field2", Value::Str("Hello".into())),
            ("nested", Value::object(Point { x: 4 })),
        ]);

        assert_eq!(args.require::<i64>("field1").unwrap(), 23);
        assert_eq!(args.or("field4", "Default".to_string()).unwrap(), "Default");
        assert_eq!(args.object::<Point>("nested").unwrap(), Point { x: 4 });
        assert!(args.contains("field2"));

        let err = args.require::<i64>("field2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Payload);
        assert!(err.to_string().contains("field2"));

        args.finish().unwrap();
    }

    #[test]
    fn test_field_args_missing_and_unknown() {
        let mut missing = args(vec![]);
        let err = missing.require::<i64>("field1").unwrap_err();
        assert!(err.to_string().contains("missing required field"));

        let unknown = args(vec![("surprise", Value::Null)]);
        let err = unknown.finish().unwrap_err();
        assert!(err.to_string().contains("surprise"));
    }
}
