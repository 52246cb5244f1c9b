//! Property names.
//!
//! Object members are named by a [`PropertyName`], a string restricted to a
//! small alphabet so that it can be written to the wire without escaping.
//! A name is valid when it
//!
//! - is not empty and shorter than [`MAX_PROPERTY_NAME_LEN`] bytes,
//! - does not start with two underscores,
//! - does not start with a digit,
//! - contains only lowercase ASCII letters, digits and `_`.
//!
//! Validation happens whenever a name is constructed, so a `PropertyName`
//! in hand is always valid.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Property names must be strictly shorter than this many bytes.
pub const MAX_PROPERTY_NAME_LEN: usize = 32;

/// Checks whether `name` can be used as a property name.
///
/// # Examples
///
/// ```rust
/// use serde_anon::is_valid_property_name;
///
/// assert!(is_valid_property_name("foo_2"));
/// assert!(!is_valid_property_name("__x"));
/// assert!(!is_valid_property_name("9x"));
/// assert!(!is_valid_property_name("Foo"));
/// ```
#[must_use]
pub fn is_valid_property_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes {
        [] => false,
        _ if bytes.len() >= MAX_PROPERTY_NAME_LEN => false,
        [b'_', b'_', ..] => false,
        [first, ..] if first.is_ascii_digit() => false,
        _ => bytes
            .iter()
            .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_'),
    }
}

/// A validated object member name.
///
/// Ordering is byte-lexicographic, which is the iteration order of an
/// [`Object`](crate::Object).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyName(String);

impl PropertyName {
    /// Validates `name` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if `name` is not a valid property name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::PropertyName;
    ///
    /// assert_eq!(PropertyName::new("an_i32").unwrap().as_str(), "an_i32");
    /// assert!(PropertyName::new("An_i32").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if is_valid_property_name(&name) {
            Ok(PropertyName(name))
        } else {
            Err(Error::MalformedKey(name))
        }
    }

    /// Validates raw bytes read from the wire.
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        match String::from_utf8(bytes) {
            Ok(name) => Self::new(name),
            Err(err) => Err(Error::MalformedKey(
                String::from_utf8_lossy(err.as_bytes()).into_owned(),
            )),
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for PropertyName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PropertyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PropertyName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PropertyName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PropertyName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<&str> for PropertyName {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        PropertyName::new(name)
    }
}

impl TryFrom<String> for PropertyName {
    type Error = Error;

    fn try_from(name: String) -> Result<Self> {
        PropertyName::new(name)
    }
}

impl From<PropertyName> for String {
    fn from(name: PropertyName) -> Self {
        name.0
    }
}

/// Conversion into a validated [`PropertyName`].
///
/// Implemented for already-validated names and for string types, so the
/// [`Object`](crate::Object) API accepts either while still enforcing the
/// naming rules.
pub trait IntoPropertyName {
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if the name is not valid.
    fn into_property_name(self) -> Result<PropertyName>;
}

impl IntoPropertyName for PropertyName {
    fn into_property_name(self) -> Result<PropertyName> {
        Ok(self)
    }
}

impl IntoPropertyName for &PropertyName {
    fn into_property_name(self) -> Result<PropertyName> {
        Ok(self.clone())
    }
}

impl IntoPropertyName for &str {
    fn into_property_name(self) -> Result<PropertyName> {
        PropertyName::new(self)
    }
}

impl IntoPropertyName for String {
    fn into_property_name(self) -> Result<PropertyName> {
        PropertyName::new(self)
    }
}

impl IntoPropertyName for &String {
    fn into_property_name(self) -> Result<PropertyName> {
        PropertyName::new(self.as_str())
    }
}

impl Serialize for PropertyName {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PropertyName {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        PropertyName::new(name).map_err(serde::de::Error::custom)
    }
}
