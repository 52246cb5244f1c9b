//! anon encoding.
//!
//! This module has two halves:
//!
//! - the [`Encoder`], which writes a [`Value`] tree to a [`Sink`] as
//!   `<tag>{<body>\}`, recursively;
//! - the [`ValueSerializer`], a serde serializer that turns any
//!   `T: Serialize` into a [`Value`] so it can be handed to the encoder.
//!
//! ## Body rules
//!
//! - **Objects**: `key:` followed by the full tagged value, in key order
//! - **Arrays**: each element body followed by `\;`, including the last
//! - **Strings**: verbatim, with `\` doubled
//! - **Integers**: plain decimal
//! - **Floats**: shortest scientific notation that round-trips
//!
//! ## Examples
//!
//! ```rust
//! use serde_anon::{store, Object};
//!
//! let mut object = Object::new();
//! object.insert("xs", vec![1i32, 2, 3])?;
//! object.insert("name", "a\\b")?;
//!
//! let mut out = String::new();
//! store(&object, &mut out)?;
//! assert_eq!(out, "obj{name:str{a\\\\b\\}xs:i32*{1\\;2\\;3\\;\\}\\}");
//! # Ok::<(), serde_anon::Error>(())
//! ```

use crate::kind::Numeric;
use crate::{EncodeOptions, Error, Object, Result, Value};
use serde::ser::{self, Serialize};

/// A consumer of encoded output.
pub trait Sink {
    /// Writes a string slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying sink fails.
    fn write_str(&mut self, s: &str) -> Result<()>;

    /// Writes a single character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying sink fails.
    fn write_char(&mut self, c: char) -> Result<()> {
        let mut buf = [0; 4];
        self.write_str(c.encode_utf8(&mut buf))
    }
}

impl Sink for String {
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> Result<()> {
        self.push(c);
        Ok(())
    }
}

impl Sink for Vec<u8> {
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_str(&mut self, s: &str) -> Result<()> {
        (**self).write_str(s)
    }

    fn write_char(&mut self, c: char) -> Result<()> {
        (**self).write_char(c)
    }
}

/// Writes values to a [`Sink`].
pub struct Encoder<'a, S: Sink + ?Sized> {
    sink: &'a mut S,
    options: EncodeOptions,
    depth: usize,
    // Reused for number formatting.
    scratch: String,
}

impl<'a, S: Sink + ?Sized> Encoder<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Encoder::with_options(sink, EncodeOptions::default())
    }

    pub fn with_options(sink: &'a mut S, options: EncodeOptions) -> Self {
        Encoder {
            sink,
            options,
            depth: 0,
            scratch: String::with_capacity(32),
        }
    }

    /// Writes `object` as a top-level `obj{...\}` value.
    ///
    /// # Errors
    ///
    /// [`Error::NullCharacter`] if a string contains NUL, or a sink error.
    pub fn encode_object(&mut self, object: &Object) -> Result<()> {
        self.sink.write_str("obj{")?;
        self.write_object_body(object)?;
        self.sink.write_str("\\}")
    }

    /// Writes `value` with its tag and braces.
    ///
    /// # Errors
    ///
    /// [`Error::NullCharacter`] if a string contains NUL, or a sink error.
    pub fn encode_value(&mut self, value: &Value) -> Result<()> {
        self.sink.write_str(value.kind().tag())?;
        self.sink.write_char('{')?;
        self.write_body(value)?;
        self.sink.write_str("\\}")
    }

    fn write_newline(&mut self) -> Result<()> {
        if self.options.pretty {
            self.sink.write_char('\n')?;
            for _ in 0..self.depth * self.options.indent {
                self.sink.write_char(' ')?;
            }
        }
        Ok(())
    }

    fn write_body(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Object(object) => self.write_object_body(object),
            Value::String(s) => self.write_string(s),
            Value::I32(n) => self.write_number(*n),
            Value::I64(n) => self.write_number(*n),
            Value::U32(n) => self.write_number(*n),
            Value::U64(n) => self.write_number(*n),
            Value::F32(n) => self.write_number(*n),
            Value::F64(n) => self.write_number(*n),
            Value::ObjectArray(elements) => {
                for element in elements {
                    self.write_object_body(element)?;
                    self.sink.write_str("\\;")?;
                }
                Ok(())
            }
            Value::StringArray(v) => self.write_elements(v, |enc, s| enc.write_string(s)),
            Value::I32Array(v) => self.write_elements(v, |enc, n| enc.write_number(*n)),
            Value::I64Array(v) => self.write_elements(v, |enc, n| enc.write_number(*n)),
            Value::U32Array(v) => self.write_elements(v, |enc, n| enc.write_number(*n)),
            Value::U64Array(v) => self.write_elements(v, |enc, n| enc.write_number(*n)),
            Value::F32Array(v) => self.write_elements(v, |enc, n| enc.write_number(*n)),
            Value::F64Array(v) => self.write_elements(v, |enc, n| enc.write_number(*n)),
        }
    }

    fn write_object_body(&mut self, object: &Object) -> Result<()> {
        self.depth += 1;
        for (key, value) in object {
            self.write_newline()?;
            self.sink.write_str(key)?;
            self.sink.write_char(':')?;
            if self.options.pretty {
                self.sink.write_char(' ')?;
            }
            self.encode_value(value)?;
        }
        self.depth -= 1;
        if !object.is_empty() {
            self.write_newline()?;
        }
        Ok(())
    }

    fn write_elements<T>(
        &mut self,
        elements: &[T],
        mut write: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        for element in elements {
            write(self, element)?;
            self.sink.write_str("\\;")?;
        }
        Ok(())
    }

    fn write_number<N: Numeric>(&mut self, n: N) -> Result<()> {
        self.scratch.clear();
        n.format_text(&mut self.scratch);
        self.sink.write_str(&self.scratch)
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        if s.contains('\0') {
            return Err(Error::NullCharacter);
        }
        let mut parts = s.split('\\');
        if let Some(first) = parts.next() {
            self.sink.write_str(first)?;
        }
        for part in parts {
            self.sink.write_str("\\\\")?;
            self.sink.write_str(part)?;
        }
        Ok(())
    }
}

/// Encodes `object` as a top-level value.
///
/// # Errors
///
/// [`Error::NullCharacter`] if any string contains NUL, or a sink error.
pub fn store<S: Sink + ?Sized>(object: &Object, sink: &mut S) -> Result<()> {
    Encoder::new(sink).encode_object(object)
}

/// Encodes `object` with custom options.
///
/// # Errors
///
/// As for [`store`].
pub fn store_with_options<S: Sink + ?Sized>(
    object: &Object,
    sink: &mut S,
    options: &EncodeOptions,
) -> Result<()> {
    Encoder::with_options(sink, options.clone()).encode_object(object)
}

/// Encodes a value of any kind.
///
/// # Errors
///
/// As for [`store`].
///
/// # Examples
///
/// ```rust
/// use serde_anon::{store_value, Value};
///
/// let mut out = String::new();
/// store_value(&Value::F64Array(vec![1.0, 0.5]), &mut out)?;
/// assert_eq!(out, "f64*{1e0\\;5e-1\\;\\}");
/// # Ok::<(), serde_anon::Error>(())
/// ```
pub fn store_value<S: Sink + ?Sized>(value: &Value, sink: &mut S) -> Result<()> {
    Encoder::new(sink).encode_value(value)
}

/// Converts any `T: Serialize` into a [`Value`].
///
/// # Errors
///
/// [`Error::UnsupportedType`] for data the format cannot carry (booleans,
/// unit, bytes, non-unit enum variants, nested arrays, a bare `None`).
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value
        .serialize(ValueSerializer)?
        .ok_or_else(|| Error::UnsupportedType("none".to_string()))
}

/// Serde serializer producing [`Value`]s.
///
/// The output is `None` for `Option::None`, which lets struct and map
/// members with no value be left out of the enclosing object.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Object,
    current_key: Option<String>,
}

fn unsupported(what: &str) -> Error {
    Error::UnsupportedType(what.to_string())
}

impl ser::Serializer for ValueSerializer {
    type Ok = Option<Value>;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = ser::Impossible<Option<Value>, Error>;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = ser::Impossible<Option<Value>, Error>;

    fn serialize_bool(self, _v: bool) -> Result<Option<Value>> {
        Err(unsupported("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<Option<Value>> {
        Ok(Some(Value::I32(i32::from(v))))
    }

    fn serialize_i16(self, v: i16) -> Result<Option<Value>> {
        Ok(Some(Value::I32(i32::from(v))))
    }

    fn serialize_i32(self, v: i32) -> Result<Option<Value>> {
        Ok(Some(Value::I32(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Option<Value>> {
        Ok(Some(Value::I64(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Option<Value>> {
        Ok(Some(Value::U32(u32::from(v))))
    }

    fn serialize_u16(self, v: u16) -> Result<Option<Value>> {
        Ok(Some(Value::U32(u32::from(v))))
    }

    fn serialize_u32(self, v: u32) -> Result<Option<Value>> {
        Ok(Some(Value::U32(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Option<Value>> {
        Ok(Some(Value::U64(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Option<Value>> {
        Ok(Some(Value::F32(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Option<Value>> {
        Ok(Some(Value::F64(v)))
    }

    fn serialize_char(self, v: char) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Option<Value>> {
        Ok(Some(Value::String(v.to_string())))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Option<Value>> {
        Err(unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<Option<Value>> {
        Ok(None)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Option<Value>> {
        Err(unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Option<Value>> {
        Err(unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Option<Value>> {
        Ok(Some(Value::String(variant.to_string())))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Option<Value>>
    where
        T: ?Sized + Serialize,
    {
        Err(unsupported("newtype variant"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unsupported("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unsupported("struct variant"))
    }
}

impl SerializeVec {
    fn new(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }

    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let element = to_value(value)?;
        if element.is_array() {
            return Err(unsupported("nested array"));
        }
        self.vec.push(element);
        Ok(())
    }

    fn finish(self) -> Result<Option<Value>> {
        Value::array_from_elements(self.vec).map(Some)
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: Object::new(),
            current_key: None,
        }
    }

    fn insert<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if let Some(value) = value.serialize(ValueSerializer)? {
            self.map.insert(key, value)?;
        }
        Ok(())
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Option<Value>> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer)? {
            Some(Value::String(s)) => {
                self.current_key = Some(s);
                Ok(())
            }
            _ => Err(Error::custom("Map keys must be strings")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.insert(&key, value)
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Object(self.map)))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Option<Value>;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.insert(key, value)
    }

    fn end(self) -> Result<Option<Value>> {
        Ok(Some(Value::Object(self.map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn encode(value: &Value) -> String {
        let mut out = String::new();
        store_value(value, &mut out).unwrap();
        out
    }

    #[test]
    fn test_scalar_bodies() {
        assert_eq!(encode(&Value::I32(-12)), "i32{-12\\}");
        assert_eq!(encode(&Value::U64(0)), "u64{0\\}");
        assert_eq!(encode(&Value::F64(1.5)), "f64{1.5e0\\}");
        assert_eq!(encode(&Value::F32(-0.25)), "f32{-2.5e-1\\}");
        assert_eq!(encode(&Value::from("")), "str{\\}");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(encode(&Value::from("a\\b")), "str{a\\\\b\\}");
        assert_eq!(encode(&Value::from("\\\\")), "str{\\\\\\\\\\}");
        assert_eq!(encode(&Value::from("{};")), "str{{};\\}");
        let mut out = String::new();
        assert_eq!(
            store_value(&Value::from("a\0b"), &mut out),
            Err(Error::NullCharacter)
        );
    }

    #[test]
    fn test_arrays_have_trailing_separator() {
        assert_eq!(encode(&Value::I32Array(vec![1, 2, 3])), "i32*{1\\;2\\;3\\;\\}");
        assert_eq!(encode(&Value::I32Array(Vec::new())), "i32*{\\}");
        assert_eq!(
            encode(&Value::StringArray(vec!["a".into(), String::new()])),
            "str*{a\\;\\;\\}"
        );
    }

    #[test]
    fn test_object_arrays() {
        let mut element = Object::new();
        element.insert("a", 1i32).unwrap();
        let value = Value::ObjectArray(vec![element, Object::new()]);
        assert_eq!(encode(&value), "obj*{a:i32{1\\}\\;\\;\\}");
    }

    #[test]
    fn test_keys_in_order() {
        let mut object = Object::new();
        object.insert("b", 2u32).unwrap();
        object.insert("a", 1u32).unwrap();
        let mut out = String::new();
        store(&object, &mut out).unwrap();
        assert_eq!(out, "obj{a:u32{1\\}b:u32{2\\}\\}");
    }

    #[test]
    fn test_pretty_nested() {
        let mut inner = Object::new();
        inner.insert("x", 1i32).unwrap();
        let mut object = Object::new();
        object.insert("inner", inner).unwrap();

        let mut out = String::new();
        store_with_options(&object, &mut out, &EncodeOptions::pretty()).unwrap();
        assert_eq!(
            out,
            "obj{\n  inner: obj{\n    x: i32{1\\}\n  \\}\n\\}"
        );
    }

    #[test]
    fn test_pretty_object_array_elements_share_object_indent() {
        let rows = vec![
            Object::new().with("k", "v").unwrap(),
            Object::new(),
            Object::new().with("k", "w").unwrap(),
        ];
        let object = Object::new().with("rows", rows).unwrap();

        let mut out = String::new();
        store_with_options(&object, &mut out, &EncodeOptions::pretty()).unwrap();
        assert_eq!(
            out,
            "obj{\n  rows: obj*{\n    k: str{v\\}\n  \\;\\;\n    k: str{w\\}\n  \\;\\}\n\\}"
        );
    }

    #[test]
    fn test_bytes_sink() {
        let mut out: Vec<u8> = Vec::new();
        store(&Object::new(), &mut out).unwrap();
        assert_eq!(out, b"obj{\\}");
    }

    #[derive(Serialize)]
    struct Record {
        id: u8,
        name: String,
        scores: Vec<f32>,
        nickname: Option<String>,
        kind: Shape,
    }

    #[derive(Serialize)]
    enum Shape {
        Round,
    }

    #[test]
    fn test_to_value_maps_widths() {
        let record = Record {
            id: 7,
            name: "r".to_string(),
            scores: vec![0.5],
            nickname: None,
            kind: Shape::Round,
        };
        let value = to_value(&record).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.get("id"), Some(&Value::U32(7)));
        assert_eq!(object.get("scores"), Some(&Value::F32Array(vec![0.5])));
        assert_eq!(object.get("kind"), Some(&Value::from("Round")));
        assert!(!object.contains_key("nickname"));
        assert_eq!(object.len(), 4);
    }

    #[test]
    fn test_to_value_rejects_unsupported() {
        assert!(matches!(to_value(&true), Err(Error::UnsupportedType(_))));
        assert!(matches!(to_value(&()), Err(Error::UnsupportedType(_))));
        assert!(matches!(
            to_value(&vec![vec![1i32]]),
            Err(Error::UnsupportedType(_))
        ));
        assert!(matches!(
            to_value(&Option::<i32>::None),
            Err(Error::UnsupportedType(_))
        ));

        let mut map = BTreeMap::new();
        map.insert("BadKey", 1i32);
        assert!(matches!(to_value(&map), Err(Error::MalformedKey(_))));
    }

    #[test]
    fn test_empty_sequence_is_object_array() {
        assert_eq!(
            to_value(&Vec::<i32>::new()).unwrap(),
            Value::ObjectArray(Vec::new())
        );
    }
}
