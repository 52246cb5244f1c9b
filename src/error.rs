//! Error types for anon encoding and decoding.
//!
//! Every failure is reported through the single [`Error`] enum. Errors raised
//! while decoding are wrapped in [`Error::At`], which records the line and
//! column of the byte that triggered them; [`Error::inner`] strips that
//! wrapper so callers can match on the underlying kind.
//!
//! ## Error Categories
//!
//! - **Keys**: [`Error::MalformedKey`], [`Error::KeyExists`], [`Error::KeyNotFound`]
//! - **Types**: [`Error::UnsupportedType`], [`Error::NotAnArray`], [`Error::NotAnObject`],
//!   [`Error::TypeMismatch`]
//! - **Structure**: [`Error::JunkAfterTypeTag`], [`Error::JunkAfterKey`], [`Error::NoValueToEnd`],
//!   [`Error::NonTerminatedArrayElement`], [`Error::UnexpectedEof`], [`Error::TrailingData`],
//!   [`Error::NestingTooDeep`]
//! - **Numbers**: [`Error::NotConvertible`], [`Error::DoesNotFit`]
//! - **Encoding**: [`Error::NullCharacter`], [`Error::InvalidUtf8`]
//!
//! ## Examples
//!
//! ```rust
//! use serde_anon::{from_str, Error, Object};
//!
//! let err = from_str::<Object>("obj{n:i32{4000000000\\}\\}").unwrap_err();
//! assert!(matches!(err.inner(), Error::DoesNotFit { .. }));
//! assert!(err.to_string().contains("line 1"));
//! ```

use crate::Kind;
use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// A property name failed validation
    #[error("Malformed property name '{0}'")]
    MalformedKey(String),

    /// A type tag that is not part of the registry
    #[error("Unsupported type '{0}'")]
    UnsupportedType(String),

    #[error("Junk after type tag: {}", describe_byte(.0))]
    JunkAfterTypeTag(u8),

    #[error("Junk after key: {}", describe_byte(.0))]
    JunkAfterKey(u8),

    /// A closing `\}` with no open value
    #[error("No value here to end")]
    NoValueToEnd,

    /// A container value was closed with unconsumed text
    #[error("Non-terminated array element '{0}'")]
    NonTerminatedArrayElement(String),

    /// An element separator inside a value that is not an array
    #[error("Multiple values require an array, found {0}")]
    NotAnArray(Kind),

    #[error("{text} is not convertible to {kind}")]
    NotConvertible { text: String, kind: Kind },

    #[error("{text} does not fit in a {kind}")]
    DoesNotFit { text: String, kind: Kind },

    /// A NUL byte in string content
    #[error("Null character in string content")]
    NullCharacter,

    #[error("String content is not valid UTF-8")]
    InvalidUtf8,

    /// Input ended while a value was still open
    #[error("Input data contains a non-terminated value")]
    UnexpectedEof,

    #[error("Nesting depth exceeds the limit of {0}")]
    NestingTooDeep(usize),

    #[error("Unexpected data after the top-level value: {}", describe_byte(.0))]
    TrailingData(u8),

    #[error("Key '{0}' already exists")]
    KeyExists(String),

    #[error("Key '{0}' not found")]
    KeyNotFound(String),

    /// The top-level value is not an object
    #[error("Expected an object at the top level, found {0}")]
    NotAnObject(Kind),

    /// A value of the wrong kind was found during conversion
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A decode error with the position of the offending byte
    #[error("{source} at line {line}, column {column}")]
    At {
        line: usize,
        column: usize,
        source: Box<Error>,
    },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Returns the underlying error with any positional context removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Error;
    ///
    /// let err = Error::NoValueToEnd.at(3, 7);
    /// assert_eq!(err.inner(), &Error::NoValueToEnd);
    /// ```
    #[must_use]
    pub fn inner(&self) -> &Error {
        match self {
            Error::At { source, .. } => source.inner(),
            other => other,
        }
    }

    /// Attaches a line/column position to this error.
    #[must_use]
    pub fn at(self, line: usize, column: usize) -> Self {
        match self {
            err @ Error::At { .. } => err,
            err => Error::At {
                line,
                column,
                source: Box::new(err),
            },
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

fn describe_byte(byte: &u8) -> String {
    format!("'{}'", std::ascii::escape_default(*byte))
}

pub type Result<T> = std::result::Result<T, Error>;
