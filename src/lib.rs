//! # serde_anon
//!
//! A streaming codec and Serde bridge for the anon object format.
//!
//! ## What is anon?
//!
//! anon is a self-describing, tag-delimited text format for nested objects.
//! Every value is written as `<tag>{<body>\}`, where the tag names one of a
//! closed set of kinds: objects, strings, four integer widths, two float
//! widths, and a homogeneous array of each. The backslash is the only
//! special character in a body, which lets a decoder consume the input one
//! byte at a time with no lookahead.
//!
//! ```text
//! obj{name:str{Alice\}scores:u32*{7\;9\;\}\}
//! ```
//!
//! ## Key Features
//!
//! - **Streaming**: the [`Decoder`] is resumable and never needs the whole
//!   document; non-blocking sources suspend it without losing state
//! - **Exact widths**: an `i32` stays an `i32`; numbers never coerce across kinds
//! - **Canonical output**: object members are always written in key order,
//!   so encoding is deterministic
//! - **Serde Compatible**: convert any `#[derive(Serialize, Deserialize)]`
//!   type to and from anon text
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_anon::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     tags: Vec<String>,
//! }
//!
//! let user = User {
//!     id: 123,
//!     name: "Alice".to_string(),
//!     tags: vec!["admin".to_string()],
//! };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "obj{id:u32{123\\}name:str{Alice\\}tags:str*{admin\\;\\}\\}");
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Dynamic Values
//!
//! ```rust
//! use serde_anon::{load, object, store, SliceSource, Value};
//!
//! let data = object!({
//!     "name": "Alice",
//!     "age": 30u32,
//!     "tags": vec!["rust", "serde"],
//! });
//!
//! let mut text = String::new();
//! store(&data, &mut text)?;
//!
//! let back = load(&mut SliceSource::new(text.as_bytes()))?;
//! assert_eq!(back.get("age"), Some(&Value::U32(30)));
//! assert_eq!(back, data);
//! # Ok::<(), serde_anon::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`de`]: the streaming decoder and the [`Source`] contract
//! - [`ser`]: the encoder, the [`Sink`] contract and the serde serializer
//! - [`io`]: source and sink adapters for slices, readers, writers and files
//! - [`format`]: the wire format in detail
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Proper error propagation with `Result` types
//! - Decoding errors carry the line and column of the offending byte

pub mod de;
pub mod error;
pub mod format;
pub mod io;
mod key;
mod kind;
mod macros;
mod map;
pub mod options;
pub mod ser;
pub mod value;
mod value_de;

pub use de::{
    load, load_value, load_value_with_options, load_with_options, Decoder, Input, Progress,
    Source, State,
};
pub use error::{Error, Result};
pub use io::{load_path, store_path, ReaderSource, SliceSource, StreamBuffer, WriterSink};
pub use key::{is_valid_property_name, IntoPropertyName, PropertyName, MAX_PROPERTY_NAME_LEN};
pub use kind::{Kind, Numeric};
pub use map::Object;
pub use options::{DecodeOptions, EncodeOptions, DEFAULT_MAX_DEPTH};
pub use ser::{store, store_value, store_with_options, to_value, Encoder, Sink, ValueSerializer};
pub use value::Value;
pub use value_de::{from_object, from_value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self as stdio, Write};

/// Converts any `T: Serialize` into an [`Object`].
///
/// # Errors
///
/// [`Error::NotAnObject`] if `T` does not serialize as a struct or map, or
/// any error from [`to_value`].
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_anon::{to_object, Value};
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let object = to_object(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(object.get("x"), Some(&Value::I32(1)));
/// ```
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_object<T>(value: &T) -> Result<Object>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Object(object) => Ok(object),
        other => Err(Error::NotAnObject(other.kind())),
    }
}

/// Serialize any `T: Serialize` to an anon string.
///
/// The top level must serialize as a struct or map.
///
/// # Errors
///
/// Returns an error if the value cannot be represented (e.g., unsupported
/// types or invalid member names).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, EncodeOptions::default())
}

/// Serialize any `T: Serialize` to a pretty-printed anon string.
///
/// Pretty output only adds whitespace the decoder ignores.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_anon::to_string_pretty;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let text = to_string_pretty(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(text, "obj{\n  x: i32{1\\}\n  y: i32{2\\}\n\\}");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_pretty<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, EncodeOptions::pretty())
}

/// Serialize any `T: Serialize` to an anon string with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be represented.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: EncodeOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let object = to_object(value)?;
    // 256 bytes is a good starting point for typical structs
    let mut out = String::with_capacity(256);
    Encoder::with_options(&mut out, options).encode_object(&object)?;
    Ok(out)
}

/// Serialize any `T: Serialize` to a writer in anon format.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use serde_anon::to_writer;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert!(buffer.starts_with(b"obj{x:i32{1"));
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: Write,
    T: ?Sized + Serialize,
{
    let object = to_object(value)?;
    let mut sink = WriterSink::new(writer);
    store(&object, &mut sink)?;
    sink.into_inner().flush()?;
    Ok(())
}

/// Deserialize an instance of type `T` from a string of anon text.
///
/// Bytes after the top-level object are ignored.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_anon::from_str;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("obj{x:i32{1\\}y:i32{2\\}\\}").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the input is not valid anon text or cannot be
/// deserialized to type `T`. Syntax errors include line and column
/// information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice(s.as_bytes())
}

/// Deserialize an instance of type `T` from bytes of anon text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid anon text or cannot be
/// deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_object(load(&mut SliceSource::new(v))?)
}

/// Deserialize an instance of type `T` from an I/O stream of anon text.
///
/// The reader is consumed one byte at a time and only up to the end of
/// the top-level object.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use serde_anon::from_reader;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let cursor = Cursor::new(b"obj{x:i32{1\\}y:i32{2\\}\\}");
/// let point: Point = from_reader(cursor).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the input is not
/// valid anon text, or the data cannot be deserialized to type `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: stdio::Read,
    T: DeserializeOwned,
{
    from_object(load(&mut ReaderSource::new(reader))?)
}
