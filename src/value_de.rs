//! Deserializing Rust types out of an owned [`Value`].

use crate::{Error, Object, Result, Value};
use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

/// Converts an [`Object`] into any `T: Deserialize`.
///
/// # Errors
///
/// Returns an error if the object does not have the shape `T` expects.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_anon::{from_object, object};
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_object(object!({ "x": 1, "y": 2 }))?;
/// assert_eq!(point, Point { x: 1, y: 2 });
/// # Ok::<(), serde_anon::Error>(())
/// ```
pub fn from_object<T: DeserializeOwned>(object: Object) -> Result<T> {
    from_value(Value::Object(object))
}

/// Converts a [`Value`] into any `T: Deserialize`.
///
/// # Errors
///
/// Returns an error if the value does not have the shape `T` expects.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(value)
}

fn visit_object<'de, V>(object: Object, visitor: V) -> Result<V::Value>
where
    V: Visitor<'de>,
{
    let mut map = MapDeserializer::<_, Error>::new(
        object
            .into_iter()
            .map(|(key, value)| (key.into_string(), value)),
    );
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}

fn visit_array<'de, T, V>(elements: Vec<T>, visitor: V) -> Result<V::Value>
where
    T: IntoDeserializer<'de, Error>,
    V: Visitor<'de>,
{
    let mut seq = SeqDeserializer::<_, Error>::new(elements.into_iter());
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

impl<'de> de::Deserializer<'de> for Value {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Object(object) => visit_object(object, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::I32(n) => visitor.visit_i32(n),
            Value::I64(n) => visitor.visit_i64(n),
            Value::U32(n) => visitor.visit_u32(n),
            Value::U64(n) => visitor.visit_u64(n),
            Value::F32(n) => visitor.visit_f32(n),
            Value::F64(n) => visitor.visit_f64(n),
            Value::ObjectArray(v) => visit_array(v, visitor),
            Value::StringArray(v) => visit_array(v, visitor),
            Value::I32Array(v) => visit_array(v, visitor),
            Value::I64Array(v) => visit_array(v, visitor),
            Value::U32Array(v) => visit_array(v, visitor),
            Value::U64Array(v) => visit_array(v, visitor),
            Value::F32Array(v) => visit_array(v, visitor),
            Value::F64Array(v) => visit_array(v, visitor),
        }
    }

    fn deserialize_bool<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::UnsupportedType("bool".to_string()))
    }

    // Absent members are `None`; anything present is `Some`.
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            other => Err(Error::type_mismatch("unit variant name", other.kind())),
        }
    }

    forward_to_deserialize_any! {
        i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = Value;

    fn into_deserializer(self) -> Value {
        self
    }
}

impl<'de> IntoDeserializer<'de, Error> for Object {
    type Deserializer = Value;

    fn into_deserializer(self) -> Value {
        Value::Object(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Item {
        id: u64,
        label: String,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Level {
        Low,
        High,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Catalog {
        items: Vec<Item>,
        weights: Vec<f64>,
        level: Level,
        note: Option<String>,
        small: u8,
    }

    #[test]
    fn test_struct_from_object() {
        let mut first = Object::new();
        first.insert("id", 1u64).unwrap();
        first.insert("label", "one").unwrap();

        let mut object = Object::new();
        object.insert("items", vec![first]).unwrap();
        object.insert("weights", vec![0.5f64, 1.5]).unwrap();
        object.insert("level", "High").unwrap();
        object.insert("small", 200u32).unwrap();

        let catalog: Catalog = from_object(object).unwrap();
        assert_eq!(
            catalog,
            Catalog {
                items: vec![Item {
                    id: 1,
                    label: "one".to_string()
                }],
                weights: vec![0.5, 1.5],
                level: Level::High,
                note: None,
                small: 200,
            }
        );
    }

    #[test]
    fn test_out_of_range_narrowing_fails() {
        #[derive(Deserialize, Debug)]
        struct Small {
            #[allow(dead_code)]
            n: u8,
        }
        let object = Object::new().with("n", 300u32).unwrap();
        assert!(from_object::<Small>(object).is_err());
    }

    #[test]
    fn test_enum_from_non_string_fails() {
        assert!(from_value::<Level>(Value::I32(1)).is_err());
        assert_eq!(from_value::<Level>(Value::from("Low")).unwrap(), Level::Low);
    }

    #[test]
    fn test_bool_is_unsupported() {
        assert!(matches!(
            from_value::<bool>(Value::I32(1)),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_value_passthrough_keeps_widths() {
        let object = Object::new()
            .with("a", 1i32)
            .unwrap()
            .with("b", vec![2u64])
            .unwrap();
        let value: Value = from_object(object.clone()).unwrap();
        assert_eq!(value, Value::Object(object));
    }
}
