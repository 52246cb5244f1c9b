//! Configuration options for anon encoding and decoding.
//!
//! - [`EncodeOptions`]: compact canonical output, or pretty-printed output
//!   that only adds whitespace the decoder ignores
//! - [`DecodeOptions`]: optional nesting limit and trailing-data check
//!
//! ## Examples
//!
//! ```rust
//! use serde_anon::{load_with_options, DecodeOptions, EncodeOptions, SliceSource};
//!
//! let options = EncodeOptions::pretty().with_indent(4);
//! assert!(options.pretty);
//!
//! let options = DecodeOptions::new().with_max_depth(2);
//! let mut source = SliceSource::new(b"obj{a:obj{b:obj{\\}\\}\\}");
//! assert!(load_with_options(&mut source, &options).is_err());
//! ```

/// Configuration options for encoding.
///
/// # Examples
///
/// ```rust
/// use serde_anon::EncodeOptions;
///
/// // Default compact options
/// let options = EncodeOptions::new();
/// assert!(!options.pretty);
///
/// // Pretty-printed with 4-space indentation
/// let options = EncodeOptions::pretty().with_indent(4);
/// assert_eq!(options.indent, 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub indent: usize,
    pub pretty: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            pretty: false,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (compact output, 2-space indent when pretty).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed output.
    ///
    /// Object members go on their own lines. Whitespace is only placed where
    /// the decoder skips it, so the pretty form decodes to the same object as
    /// the compact one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::{object, store_with_options, EncodeOptions};
    ///
    /// let mut out = String::new();
    /// store_with_options(&object!({ "n": 1 }), &mut out, &EncodeOptions::pretty())?;
    /// assert_eq!(out, "obj{\n  n: i32{1\\}\n\\}");
    /// # Ok::<(), serde_anon::Error>(())
    /// ```
    #[must_use]
    pub fn pretty() -> Self {
        EncodeOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the number of spaces per nesting level.
    ///
    /// Only affects pretty-printed output.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Nesting limit applied by [`DecodeOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for decoding.
///
/// The defaults allow [`DEFAULT_MAX_DEPTH`] levels of nesting and leave
/// bytes after the top-level value unread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of simultaneously open values. The top-level value
    /// counts as depth 1.
    ///
    /// `None` removes the limit. Decoded values are dropped and encoded
    /// recursively, so unbounded input can then exhaust the stack.
    pub max_depth: Option<usize>,
    /// Fail with [`Error::TrailingData`](crate::Error::TrailingData) if
    /// anything but whitespace follows the top-level value.
    pub deny_trailing_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            deny_trailing_data: false,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject trailing data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::{load_with_options, DecodeOptions, SliceSource};
    ///
    /// let mut source = SliceSource::new(b"obj{\\}blah");
    /// assert!(load_with_options(&mut source, &DecodeOptions::strict()).is_err());
    /// ```
    #[must_use]
    pub fn strict() -> Self {
        DecodeOptions {
            deny_trailing_data: true,
            ..Default::default()
        }
    }

    /// Limits how deeply values may nest.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Removes the nesting limit.
    #[must_use]
    pub fn without_max_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    #[must_use]
    pub fn with_deny_trailing_data(mut self, deny: bool) -> Self {
        self.deny_trailing_data = deny;
        self
    }
}
