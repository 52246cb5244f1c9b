//! The type registry.
//!
//! Every value on the wire is introduced by a type tag. The set of tags is
//! closed: eight scalar kinds, and an array form of each written as the
//! scalar tag followed by `*`.
//!
//! | Tag   | Kind            | Rust type      |
//! |-------|-----------------|----------------|
//! | `obj` | [`Kind::Object`] | [`Object`]    |
//! | `str` | [`Kind::String`] | `String`      |
//! | `i32` | [`Kind::I32`]   | `i32`          |
//! | `i64` | [`Kind::I64`]   | `i64`          |
//! | `u32` | [`Kind::U32`]   | `u32`          |
//! | `u64` | [`Kind::U64`]   | `u64`          |
//! | `f32` | [`Kind::F32`]   | `f32`          |
//! | `f64` | [`Kind::F64`]   | `f64`          |
//!
//! [`Kind::from_tag`] performs the reverse lookup used by the decoder, and
//! [`Kind::initial_state`] names the decoder state entered right after
//! `<tag>{`.

use crate::de::State;
use crate::{Error, Object, Result, Value};
use std::fmt;
use std::num::{IntErrorKind, ParseIntError};

/// The kind of a [`Value`], one per wire tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Object,
    String,
    I32,
    I64,
    U32,
    U64,
    F32,
    F64,
    ObjectArray,
    StringArray,
    I32Array,
    I64Array,
    U32Array,
    U64Array,
    F32Array,
    F64Array,
}

struct Entry {
    tag: &'static str,
    kind: Kind,
}

const REGISTRY: [Entry; 16] = [
    Entry { tag: "obj", kind: Kind::Object },
    Entry { tag: "str", kind: Kind::String },
    Entry { tag: "i32", kind: Kind::I32 },
    Entry { tag: "i64", kind: Kind::I64 },
    Entry { tag: "u32", kind: Kind::U32 },
    Entry { tag: "u64", kind: Kind::U64 },
    Entry { tag: "f32", kind: Kind::F32 },
    Entry { tag: "f64", kind: Kind::F64 },
    Entry { tag: "obj*", kind: Kind::ObjectArray },
    Entry { tag: "str*", kind: Kind::StringArray },
    Entry { tag: "i32*", kind: Kind::I32Array },
    Entry { tag: "i64*", kind: Kind::I64Array },
    Entry { tag: "u32*", kind: Kind::U32Array },
    Entry { tag: "u64*", kind: Kind::U64Array },
    Entry { tag: "f32*", kind: Kind::F32Array },
    Entry { tag: "f64*", kind: Kind::F64Array },
];

impl Kind {
    /// Every kind, scalars first.
    pub const ALL: [Kind; 16] = [
        Kind::Object,
        Kind::String,
        Kind::I32,
        Kind::I64,
        Kind::U32,
        Kind::U64,
        Kind::F32,
        Kind::F64,
        Kind::ObjectArray,
        Kind::StringArray,
        Kind::I32Array,
        Kind::I64Array,
        Kind::U32Array,
        Kind::U64Array,
        Kind::F32Array,
        Kind::F64Array,
    ];

    /// Returns the wire tag of this kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Kind;
    ///
    /// assert_eq!(Kind::I32.tag(), "i32");
    /// assert_eq!(Kind::ObjectArray.tag(), "obj*");
    /// ```
    #[must_use]
    pub const fn tag(self) -> &'static str {
        REGISTRY[self as usize].tag
    }

    /// Looks up the kind named by a wire tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Kind;
    ///
    /// assert_eq!(Kind::from_tag(b"u64*"), Some(Kind::U64Array));
    /// assert_eq!(Kind::from_tag(b"bool"), None);
    /// ```
    #[must_use]
    pub fn from_tag(tag: &[u8]) -> Option<Kind> {
        REGISTRY
            .iter()
            .find(|entry| entry.tag.as_bytes() == tag)
            .map(|entry| entry.kind)
    }

    /// Resolves a wire tag into its kind, a zero value, and the decoder
    /// state that follows `<tag>{`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the tag is not registered.
    pub fn resolve(tag: &[u8]) -> Result<(Kind, Value, State)> {
        let kind = Kind::from_tag(tag)
            .ok_or_else(|| Error::UnsupportedType(String::from_utf8_lossy(tag).into_owned()))?;
        Ok((kind, kind.zero_value(), kind.initial_state()))
    }

    /// The decoder state entered right after `<tag>{`.
    ///
    /// Objects start by reading a key. Everything else, arrays included,
    /// starts in the state of its element kind.
    #[must_use]
    pub const fn initial_state(self) -> State {
        match self.element() {
            Kind::Object => State::Key,
            _ => State::Value,
        }
    }

    /// Returns `true` for the `*` kinds.
    #[inline]
    #[must_use]
    pub const fn is_array(self) -> bool {
        (self as usize) >= Kind::ObjectArray as usize
    }

    /// The element kind of an array kind, or `self` for a scalar kind.
    #[must_use]
    pub const fn element(self) -> Kind {
        if self.is_array() {
            Kind::ALL[self as usize - Kind::ObjectArray as usize]
        } else {
            self
        }
    }

    /// The array kind whose elements are of this kind.
    ///
    /// Returns `None` if `self` is already an array kind.
    #[must_use]
    pub const fn array_of(self) -> Option<Kind> {
        if self.is_array() {
            None
        } else {
            Some(Kind::ALL[self as usize + Kind::ObjectArray as usize])
        }
    }

    /// An empty or zero-valued instance of this kind.
    #[must_use]
    pub fn zero_value(self) -> Value {
        match self {
            Kind::Object => Value::Object(Object::new()),
            Kind::String => Value::String(String::new()),
            Kind::I32 => Value::I32(0),
            Kind::I64 => Value::I64(0),
            Kind::U32 => Value::U32(0),
            Kind::U64 => Value::U64(0),
            Kind::F32 => Value::F32(0.0),
            Kind::F64 => Value::F64(0.0),
            Kind::ObjectArray => Value::ObjectArray(Vec::new()),
            Kind::StringArray => Value::StringArray(Vec::new()),
            Kind::I32Array => Value::I32Array(Vec::new()),
            Kind::I64Array => Value::I64Array(Vec::new()),
            Kind::U32Array => Value::U32Array(Vec::new()),
            Kind::U64Array => Value::U64Array(Vec::new()),
            Kind::F32Array => Value::F32Array(Vec::new()),
            Kind::F64Array => Value::F64Array(Vec::new()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A fixed-width numeric type with a wire representation.
///
/// Parsing is strict: the whole text must be consumed, and values outside
/// the destination range are reported as [`Error::DoesNotFit`] rather than
/// being clamped or wrapped.
pub trait Numeric: Copy + Sized {
    const KIND: Kind;

    /// Parses wire text into this type.
    ///
    /// # Errors
    ///
    /// [`Error::NotConvertible`] for text that is not a number,
    /// [`Error::DoesNotFit`] for numbers outside the range of `Self`.
    fn parse_text(text: &[u8]) -> Result<Self>;

    /// Appends the canonical wire text of this value.
    fn format_text(self, out: &mut String);
}

fn not_convertible(text: &[u8], kind: Kind) -> Error {
    Error::NotConvertible {
        text: String::from_utf8_lossy(text).into_owned(),
        kind,
    }
}

fn does_not_fit(text: &[u8], kind: Kind) -> Error {
    Error::DoesNotFit {
        text: String::from_utf8_lossy(text).into_owned(),
        kind,
    }
}

fn parse_int<T>(text: &[u8], kind: Kind) -> Result<T>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    // An explicit plus sign is not part of the integer syntax.
    if text.first() == Some(&b'+') {
        return Err(not_convertible(text, kind));
    }
    let s = std::str::from_utf8(text).map_err(|_| not_convertible(text, kind))?;
    s.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => does_not_fit(text, kind),
        _ => not_convertible(text, kind),
    })
}

fn is_infinity_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn mantissa_is_zero(s: &str) -> bool {
    s.bytes()
        .take_while(|b| !matches!(b, b'e' | b'E'))
        .all(|b| matches!(b, b'0' | b'.' | b'-'))
}

fn parse_float<T>(text: &[u8], kind: Kind) -> Result<T>
where
    T: std::str::FromStr + Into<f64> + Copy,
{
    if text.first() == Some(&b'+') {
        return Err(not_convertible(text, kind));
    }
    let s = std::str::from_utf8(text).map_err(|_| not_convertible(text, kind))?;
    let value: T = s.parse().map_err(|_| not_convertible(text, kind))?;
    let wide: f64 = value.into();
    if wide.is_infinite() && !is_infinity_literal(s) {
        return Err(does_not_fit(text, kind));
    }
    if wide == 0.0 && !mantissa_is_zero(s) {
        return Err(does_not_fit(text, kind));
    }
    Ok(value)
}

macro_rules! impl_numeric_int {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl Numeric for $ty {
                const KIND: Kind = Kind::$kind;

                fn parse_text(text: &[u8]) -> Result<Self> {
                    parse_int(text, Self::KIND)
                }

                fn format_text(self, out: &mut String) {
                    out.push_str(&self.to_string());
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($ty:ty => $kind:ident),*) => {
        $(
            impl Numeric for $ty {
                const KIND: Kind = Kind::$kind;

                fn parse_text(text: &[u8]) -> Result<Self> {
                    parse_float(text, Self::KIND)
                }

                fn format_text(self, out: &mut String) {
                    // `{:e}` is the shortest scientific form that round-trips.
                    out.push_str(&format!("{:e}", self));
                }
            }
        )*
    };
}

impl_numeric_int!(i32 => I32, i64 => I64, u32 => U32, u64 => U64);
impl_numeric_float!(f32 => F32, f64 => F64);
