//! Dynamic value representation for anon data.
//!
//! [`Value`] is a closed enum over the sixteen kinds the format can carry:
//! objects, strings, four integer widths, two float widths, and a
//! homogeneous array of each of those.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_anon::{Object, Value};
//!
//! let text = Value::from("hello");
//! let small = Value::from(42i32);
//! let wide = Value::from(42u64);
//! let list = Value::from(vec![1.5f64, 2.5]);
//! let nested = Value::from(Object::new());
//! ```
//!
//! ### Type Checking and Extraction
//!
//! ```rust
//! use serde_anon::{Kind, Value};
//!
//! let value = Value::from(42i32);
//! assert_eq!(value.kind(), Kind::I32);
//! assert_eq!(value.as_i32(), Some(42));
//! assert_eq!(value.as_i64(), None); // no coercion between widths
//!
//! let n: i32 = i32::try_from(value).unwrap();
//! assert_eq!(n, 42);
//! ```

use crate::{Error, Kind, Object, PropertyName, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed representation of any anon value.
///
/// Widths never coerce into each other: an `i32` value is only ever
/// accessible as an `i32`.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Object(Object),
    String(String),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    ObjectArray(Vec<Object>),
    StringArray(Vec<String>),
    I32Array(Vec<i32>),
    I64Array(Vec<i64>),
    U32Array(Vec<u32>),
    U64Array(Vec<u64>),
    F32Array(Vec<f32>),
    F64Array(Vec<f64>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Object(Object::new())
    }
}

macro_rules! accessors {
    ($($variant:ident: $is:ident, $as:ident -> $ty:ty;)*) => {
        $(
            #[inline]
            #[must_use]
            pub const fn $is(&self) -> bool {
                matches!(self, Value::$variant(_))
            }

            #[inline]
            #[must_use]
            pub fn $as(&self) -> Option<$ty> {
                match self {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        )*
    };
}

macro_rules! slice_accessors {
    ($($variant:ident: $as:ident -> $ty:ty;)*) => {
        $(
            #[inline]
            #[must_use]
            pub fn $as(&self) -> Option<&[$ty]> {
                match self {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        )*
    };
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Value::Object(_) => Kind::Object,
            Value::String(_) => Kind::String,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::ObjectArray(_) => Kind::ObjectArray,
            Value::StringArray(_) => Kind::StringArray,
            Value::I32Array(_) => Kind::I32Array,
            Value::I64Array(_) => Kind::I64Array,
            Value::U32Array(_) => Kind::U32Array,
            Value::U64Array(_) => Kind::U64Array,
            Value::F32Array(_) => Kind::F32Array,
            Value::F64Array(_) => Kind::F64Array,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` for any of the array kinds.
    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.kind().is_array()
    }

    accessors! {
        I32: is_i32, as_i32 -> i32;
        I64: is_i64, as_i64 -> i64;
        U32: is_u32, as_u32 -> u32;
        U64: is_u64, as_u64 -> u64;
        F32: is_f32, as_f32 -> f32;
        F64: is_f64, as_f64 -> f64;
    }

    slice_accessors! {
        ObjectArray: as_object_array -> Object;
        StringArray: as_string_array -> String;
        I32Array: as_i32_array -> i32;
        I64Array: as_i64_array -> i64;
        U32Array: as_u32_array -> u32;
        U64Array: as_u64_array -> u64;
        F32Array: as_f32_array -> f32;
        F64Array: as_f64_array -> f64;
    }

    /// If the value is a string, returns a reference to it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::from(42i32).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The number of elements of an array value, or `None` for scalars.
    #[must_use]
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Value::ObjectArray(v) => Some(v.len()),
            Value::StringArray(v) => Some(v.len()),
            Value::I32Array(v) => Some(v.len()),
            Value::I64Array(v) => Some(v.len()),
            Value::U32Array(v) => Some(v.len()),
            Value::U64Array(v) => Some(v.len()),
            Value::F32Array(v) => Some(v.len()),
            Value::F64Array(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Builds a homogeneous array from individual scalar values.
    ///
    /// An empty input produces an empty `obj*`, since there is nothing to
    /// infer the element kind from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the elements are not all of the
    /// same kind, or if an element is itself an array.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Value;
    ///
    /// let arr = Value::array_from_elements(vec![Value::I32(1), Value::I32(2)]).unwrap();
    /// assert_eq!(arr, Value::I32Array(vec![1, 2]));
    ///
    /// assert!(Value::array_from_elements(vec![Value::I32(1), Value::I64(2)]).is_err());
    /// ```
    pub fn array_from_elements(elements: Vec<Value>) -> Result<Value> {
        let Some(first) = elements.first() else {
            return Ok(Value::ObjectArray(Vec::new()));
        };
        let element_kind = first.kind();
        let array_kind = element_kind
            .array_of()
            .ok_or_else(|| Error::type_mismatch("scalar array element", element_kind))?;

        macro_rules! collect {
            ($element:ident => $array:ident) => {
                elements
                    .into_iter()
                    .map(|element| match element {
                        Value::$element(v) => Ok(v),
                        other => Err(Error::type_mismatch(element_kind, other.kind())),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Value::$array)
            };
        }

        match array_kind {
            Kind::ObjectArray => collect!(Object => ObjectArray),
            Kind::StringArray => collect!(String => StringArray),
            Kind::I32Array => collect!(I32 => I32Array),
            Kind::I64Array => collect!(I64 => I64Array),
            Kind::U32Array => collect!(U32 => U32Array),
            Kind::U64Array => collect!(U64 => U64Array),
            Kind::F32Array => collect!(F32 => F32Array),
            Kind::F64Array => collect!(F64 => F64Array),
            scalar => Err(Error::type_mismatch("array kind", scalar)),
        }
    }

    /// Splits an array value into individual element values.
    ///
    /// Returns `None` for scalar values.
    #[must_use]
    pub fn into_elements(self) -> Option<Vec<Value>> {
        fn wrap<T>(items: Vec<T>, f: fn(T) -> Value) -> Option<Vec<Value>> {
            Some(items.into_iter().map(f).collect())
        }

        match self {
            Value::ObjectArray(v) => wrap(v, Value::Object),
            Value::StringArray(v) => wrap(v, Value::String),
            Value::I32Array(v) => wrap(v, Value::I32),
            Value::I64Array(v) => wrap(v, Value::I64),
            Value::U32Array(v) => wrap(v, Value::U32),
            Value::U64Array(v) => wrap(v, Value::U64),
            Value::F32Array(v) => wrap(v, Value::F32),
            Value::F64Array(v) => wrap(v, Value::F64),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Object(obj) => obj.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::ObjectArray(v) => v.serialize(serializer),
            Value::StringArray(v) => v.serialize(serializer),
            Value::I32Array(v) => v.serialize(serializer),
            Value::I64Array(v) => v.serialize(serializer),
            Value::U32Array(v) => v.serialize(serializer),
            Value::U64Array(v) => v.serialize(serializer),
            Value::F32Array(v) => v.serialize(serializer),
            Value::F64Array(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid anon value")
            }

            fn visit_i8<E>(self, value: i8) -> std::result::Result<Value, E> {
                Ok(Value::I32(i32::from(value)))
            }

            fn visit_i16<E>(self, value: i16) -> std::result::Result<Value, E> {
                Ok(Value::I32(i32::from(value)))
            }

            fn visit_i32<E>(self, value: i32) -> std::result::Result<Value, E> {
                Ok(Value::I32(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(Value::I64(value))
            }

            fn visit_u8<E>(self, value: u8) -> std::result::Result<Value, E> {
                Ok(Value::U32(u32::from(value)))
            }

            fn visit_u16<E>(self, value: u16) -> std::result::Result<Value, E> {
                Ok(Value::U32(u32::from(value)))
            }

            fn visit_u32<E>(self, value: u32) -> std::result::Result<Value, E> {
                Ok(Value::U32(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E> {
                Ok(Value::U64(value))
            }

            fn visit_f32<E>(self, value: f32) -> std::result::Result<Value, E> {
                Ok(Value::F32(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E> {
                Ok(Value::F64(value))
            }

            fn visit_char<E>(self, value: char) -> std::result::Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut elements = Vec::new();
                while let Some(element) = seq.next_element()? {
                    elements.push(element);
                }
                Value::array_from_elements(elements).map_err(de::Error::custom)
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut object = Object::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    object.insert(key, value).map_err(de::Error::custom)?;
                }
                Ok(Value::Object(object))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident, $array:ident;)*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(value: Vec<$ty>) -> Self {
                    Value::$array(value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::type_mismatch(Kind::$variant, other.kind())),
                    }
                }
            }

            impl TryFrom<Value> for Vec<$ty> {
                type Error = Error;

                fn try_from(value: Value) -> Result<Self> {
                    match value {
                        Value::$array(v) => Ok(v),
                        other => Err(Error::type_mismatch(Kind::$array, other.kind())),
                    }
                }
            }
        )*
    };
}

impl_from_scalar! {
    Object => Object, ObjectArray;
    String => String, StringArray;
    i32 => I32, I32Array;
    i64 => I64, I64Array;
    u32 => U32, U32Array;
    u64 => U64, U64Array;
    f32 => F32, F32Array;
    f64 => F64, F64Array;
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<PropertyName> for Value {
    fn from(value: PropertyName) -> Self {
        Value::String(value.into_string())
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Value::StringArray(value.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_exact_width_only() {
        assert_eq!(i32::try_from(Value::I32(42)).unwrap(), 42);
        assert!(i64::try_from(Value::I32(42)).is_err());
        assert!(u32::try_from(Value::U64(1)).is_err());
        assert_eq!(
            f64::try_from(Value::F32(1.0)).unwrap_err(),
            Error::type_mismatch("f64", "f32")
        );
    }

    #[test]
    fn test_tryfrom_string_and_arrays() {
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert_eq!(
            Vec::<u64>::try_from(Value::U64Array(vec![1, 2])).unwrap(),
            vec![1, 2]
        );
        assert!(Vec::<u64>::try_from(Value::U32Array(vec![1])).is_err());
        assert!(Object::try_from(Value::I32(0)).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(42i32), Value::I32(42));
        assert_eq!(Value::from(42i64), Value::I64(42));
        assert_eq!(Value::from(42u32), Value::U32(42));
        assert_eq!(Value::from(42u64), Value::U64(42));
        assert_eq!(Value::from(3.5f32), Value::F32(3.5));
        assert_eq!(Value::from(3.5f64), Value::F64(3.5));
        assert_eq!(Value::from("test"), Value::String("test".to_string()));
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::StringArray(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_kind_and_accessors() {
        let value = Value::from(vec![1u32, 2, 3]);
        assert_eq!(value.kind(), Kind::U32Array);
        assert!(value.is_array());
        assert_eq!(value.array_len(), Some(3));
        assert_eq!(value.as_u32_array(), Some(&[1u32, 2, 3][..]));
        assert_eq!(value.as_u32(), None);
        assert!(Value::default().is_object());
        assert_eq!(Value::I64(7).as_i64(), Some(7));
        assert!(Value::F32(1.0).is_f32());
    }

    #[test]
    fn test_array_from_elements() {
        assert_eq!(
            Value::array_from_elements(vec![Value::from("a"), Value::from("b")]).unwrap(),
            Value::from(vec!["a", "b"])
        );
        assert_eq!(
            Value::array_from_elements(Vec::new()).unwrap(),
            Value::ObjectArray(Vec::new())
        );
        assert!(Value::array_from_elements(vec![Value::I32Array(vec![1])]).is_err());
        assert!(Value::array_from_elements(vec![Value::from("a"), Value::I32(1)]).is_err());
    }

    #[test]
    fn test_into_elements_inverts_array_from_elements() {
        let value = Value::from(vec![1.5f64, -2.0]);
        let elements = value.clone().into_elements().unwrap();
        assert_eq!(elements, vec![Value::F64(1.5), Value::F64(-2.0)]);
        assert_eq!(Value::array_from_elements(elements).unwrap(), value);
        assert_eq!(Value::I32(1).into_elements(), None);
    }

    #[test]
    fn test_serde_json_interop() {
        let mut obj = Object::new();
        obj.insert("n", 1i32).unwrap();
        obj.insert("tags", vec!["x", "y"]).unwrap();
        let json = serde_json::to_string(&Value::Object(obj)).unwrap();
        assert_eq!(json, r#"{"n":1,"tags":["x","y"]}"#);

        let back: Value = serde_json::from_str(r#"{"a":-1,"b":2,"c":[1.5],"d":"s"}"#).unwrap();
        let back = back.as_object().unwrap();
        assert_eq!(back.get("a"), Some(&Value::I64(-1)));
        assert_eq!(back.get("b"), Some(&Value::U64(2)));
        assert_eq!(back.get("c"), Some(&Value::F64Array(vec![1.5])));
        assert_eq!(back.get("d"), Some(&Value::from("s")));
    }

    #[test]
    fn test_deserialize_rejects_bad_keys() {
        assert!(serde_json::from_str::<Value>(r#"{"Bad":1}"#).is_err());
        assert!(serde_json::from_str::<Value>(r#"[1,"x"]"#).is_err());
    }
}
