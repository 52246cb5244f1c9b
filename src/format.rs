//! anon Format Specification
//!
//! This module documents the anon wire format as implemented by this
//! library. It contains no code.
//!
//! # Overview
//!
//! anon is a nested, self-describing text format. Every value carries a type
//! tag, and every value ends with the two-byte sequence `\}`. Because the
//! backslash is the only byte with special meaning inside a value, a decoder
//! can process the input strictly one byte at a time and stop in the middle
//! of a value whenever its source runs dry.
//!
//! # Grammar
//!
//! ```text
//! value       := tag '{' body '\}'
//! tag         := scalar-tag | scalar-tag '*'
//! scalar-tag  := "obj" | "str" | "i32" | "i64" | "u32" | "u64" | "f32" | "f64"
//! obj-body    := (key ':' value)*
//! array-body  := (element-body '\;')*
//! scalar-body := decimal-integer | scientific-float | escaped-string-bytes
//! ```
//!
//! ## Objects
//!
//! An object body is a sequence of `key:value` members with no separator
//! between them:
//!
//! ```text
//! obj{name:str{Alice\}age:u32{30\}\}
//! ```
//!
//! **Rules**:
//! - Keys are 1 to 31 bytes of `[a-z0-9_]`, must not start with a digit and
//!   must not start with `__`
//! - Keys are unique within an object
//! - Members are written in byte-lexicographic key order; the decoder
//!   accepts any order
//!
//! ## Scalars
//!
//! | Tag   | Body | Example |
//! |-------|------|---------|
//! | `str` | raw bytes, `\` doubled | `str{C:\\tmp\}` is `C:\tmp` |
//! | `i32` | decimal, `-` only for negatives | `i32{-42\}` |
//! | `i64` | decimal | `i64{9000000000\}` |
//! | `u32` | decimal | `u32{7\}` |
//! | `u64` | decimal | `u64{18446744073709551615\}` |
//! | `f32` | scientific notation | `f32{1.5e0\}` |
//! | `f64` | scientific notation | `f64{-2.5e-3\}` |
//!
//! Numbers are parsed strictly: the whole body must be a number, and it must
//! fit the width named by the tag. `i32{4000000000\}` and `i32{12a\}` are
//! both errors, reported differently.
//!
//! Strings must be valid UTF-8 and must not contain NUL.
//!
//! ## Arrays
//!
//! An array tag is its element tag followed by `*`. The body is the element
//! bodies, each followed by `\;`, including the last one:
//!
//! ```text
//! i32*{1\;2\;3\;\}
//! str*{a\;\;b\;\}
//! obj*{x:i32{1\}\;x:i32{2\}\;\}
//! i32*{\}
//! ```
//!
//! Elements carry no tag and no braces of their own. Arrays of arrays do not
//! exist.
//!
//! ## Escapes
//!
//! Inside a body, `\` introduces a control sequence:
//!
//! | Sequence | Meaning |
//! |----------|---------|
//! | `\}`     | end of the current value |
//! | `\;`     | end of the current array element |
//! | `\` + any other byte | that byte, literally |
//!
//! So `\\` is a literal backslash, and `\{` is a literal `{`. Plain `{`,
//! `}` and `;` need no escaping inside string content.
//!
//! ## Whitespace
//!
//! Bytes up to and including `0x20` are insignificant:
//!
//! - before a type tag
//! - between a type tag and its `{`
//! - before a key, and between a key and its `:`
//! - before the closing `\}` of an object or the `\;` of an object array
//!   element
//!
//! Whitespace inside scalar bodies is content.
//!
//! ## Trailing data
//!
//! The decoder stops right after the closing `\}` of the top-level value.
//! Whatever follows is left unread, unless
//! [`DecodeOptions::deny_trailing_data`](crate::DecodeOptions::deny_trailing_data)
//! is set.
//!
//! # Implementation Notes
//!
//! ## Serde type mapping
//!
//! | Rust | anon |
//! |------|------|
//! | `i8`, `i16`, `i32` | `i32` |
//! | `i64` | `i64` |
//! | `u8`, `u16`, `u32` | `u32` |
//! | `u64` | `u64` |
//! | `f32` / `f64` | `f32` / `f64` |
//! | `char`, `String`, `&str` | `str` |
//! | structs, maps | `obj` |
//! | `Vec<T>`, tuples | `T*` |
//! | unit enum variants | `str` |
//! | `Option<T>` members | omitted when `None` |
//!
//! Booleans, unit, byte strings, data-carrying enum variants and nested
//! sequences have no representation and fail with
//! [`Error::UnsupportedType`](crate::Error::UnsupportedType).
//!
//! An empty sequence carries no element kind and serializes as an empty
//! `obj*`. Conversely, an empty array of any kind deserializes into any
//! empty `Vec<T>`.
