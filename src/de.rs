//! Streaming anon decoding.
//!
//! The [`Decoder`] is a resumable state machine fed one byte (or an
//! end-of-input signal) at a time. It never needs the whole document in
//! memory and keeps all of its working state in the decoder value itself,
//! so a source that temporarily has nothing to offer can simply be polled
//! again later.
//!
//! ## Overview
//!
//! - **Byte at a time**: [`Decoder::update`] consumes exactly one byte or EOF
//! - **Resumable**: [`Decoder::pump`] stops on [`Input::WouldBlock`] without
//!   losing state
//! - **Strict scalars**: numbers must parse completely into their width
//! - **Positioned errors**: every error carries the line and column of the
//!   offending byte
//!
//! ## Usage
//!
//! Most users should use [`load`] or the serde functions in the crate root:
//!
//! ```rust
//! use serde_anon::{load, SliceSource, Value};
//!
//! let mut source = SliceSource::new(b"obj{k:obj{a:str{hi\\}\\}\\}");
//! let object = load(&mut source)?;
//! let inner = object.get("k").and_then(Value::as_object).unwrap();
//! assert_eq!(inner.get("a").and_then(Value::as_str), Some("hi"));
//! # Ok::<(), serde_anon::Error>(())
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use serde_anon::{Decoder, Progress, StreamBuffer};
//!
//! let mut buffer = StreamBuffer::new();
//! let mut decoder = Decoder::new();
//!
//! buffer.push(b"obj{xs:i32*{1\\;2");
//! assert_eq!(decoder.pump(&mut buffer)?, Progress::NeedMore);
//!
//! buffer.push(b"\\;3\\;\\}\\}");
//! let Progress::Done(value) = decoder.pump(&mut buffer)? else { unreachable!() };
//! let xs = value.as_object().and_then(|o| o.get("xs")).unwrap();
//! assert_eq!(xs.as_i32_array(), Some(&[1, 2, 3][..]));
//! # Ok::<(), serde_anon::Error>(())
//! ```

use crate::kind::Numeric;
use crate::{DecodeOptions, Error, Kind, Object, PropertyName, Result, Value};
use std::mem;

/// The outcome of asking a [`Source`] for the next byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// A byte is ready.
    Byte(u8),
    /// The source is exhausted.
    Eof,
    /// The source has nothing right now but may have more later.
    WouldBlock,
}

/// A producer of input bytes for the decoder.
pub trait Source {
    /// Returns the next byte, or signals end of input or a temporary lack
    /// of data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying source fails.
    fn next_input(&mut self) -> Result<Input>;
}

impl<S: Source + ?Sized> Source for &mut S {
    fn next_input(&mut self) -> Result<Input> {
        (**self).next_input()
    }
}

/// The states of the decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Skipping whitespace before a type tag.
    Init,
    /// Reading a type tag.
    TypeTag,
    /// Between a type tag and its `{`.
    AfterTypeTag,
    /// Reading a property name.
    Key,
    /// Between a property name and its `:`.
    AfterKey,
    /// Reading scalar text.
    Value,
    /// Right after an escape character.
    CtrlChar,
}

/// What a call to the decoder produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Progress {
    /// The top-level value has been closed.
    Done(Value),
    /// More input is needed.
    NeedMore,
}

/// A value that has been opened but not yet closed.
#[derive(Debug)]
struct Node {
    key: Option<PropertyName>,
    value: Value,
}

#[inline]
fn is_whitespace(byte: u8) -> bool {
    byte <= b' '
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_string(text: Vec<u8>) -> Result<String> {
    String::from_utf8(text).map_err(|_| Error::InvalidUtf8)
}

/// Parses a scalar body into the slot that was opened for it.
fn finalize(value: &mut Value, text: Vec<u8>) -> Result<()> {
    match value {
        Value::String(s) => *s = decode_string(text)?,
        Value::I32(n) => *n = i32::parse_text(&text)?,
        Value::I64(n) => *n = i64::parse_text(&text)?,
        Value::U32(n) => *n = u32::parse_text(&text)?,
        Value::U64(n) => *n = u64::parse_text(&text)?,
        Value::F32(n) => *n = f32::parse_text(&text)?,
        Value::F64(n) => *n = f64::parse_text(&text)?,
        // Containers are complete once closed; anything left over is an
        // element that never saw its separator.
        _ if !text.is_empty() => return Err(Error::NonTerminatedArrayElement(lossy(&text))),
        _ => {}
    }
    Ok(())
}

/// Appends one element body to a scalar array.
fn push_element(value: &mut Value, text: Vec<u8>) -> Result<()> {
    match value {
        Value::StringArray(v) => v.push(decode_string(text)?),
        Value::I32Array(v) => v.push(i32::parse_text(&text)?),
        Value::I64Array(v) => v.push(i64::parse_text(&text)?),
        Value::U32Array(v) => v.push(u32::parse_text(&text)?),
        Value::U64Array(v) => v.push(u64::parse_text(&text)?),
        Value::F32Array(v) => v.push(f32::parse_text(&text)?),
        Value::F64Array(v) => v.push(f64::parse_text(&text)?),
        other => return Err(Error::NotAnArray(other.kind())),
    }
    Ok(())
}

/// An incremental anon decoder.
///
/// Feed it bytes with [`update`](Decoder::update) or drain a [`Source`]
/// with [`pump`](Decoder::pump). Once the top-level value closes, the
/// decoder hands it out as [`Progress::Done`] and resets, ready for the
/// next document. After an error it also resets, discarding the partial
/// result.
#[derive(Debug)]
pub struct Decoder {
    state: State,
    resume: State,
    buffer: Vec<u8>,
    pending_key: Option<PropertyName>,
    nodes: Vec<Node>,
    level: usize,
    line: usize,
    column: usize,
    options: DecodeOptions,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl Decoder {
    #[must_use]
    pub fn new() -> Self {
        Decoder::with_options(DecodeOptions::default())
    }

    #[must_use]
    pub fn with_options(options: DecodeOptions) -> Self {
        Decoder {
            state: State::Init,
            resume: State::Init,
            buffer: Vec::new(),
            pending_key: None,
            nodes: Vec::new(),
            level: 0,
            line: 1,
            column: 1,
            options,
        }
    }

    /// The current state of the machine.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// The number of currently open values.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.level
    }

    /// The 1-based line and column of the next byte to be consumed.
    ///
    /// Positions keep counting across documents read by the same decoder.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Discards any partially decoded value.
    pub fn reset(&mut self) {
        self.state = State::Init;
        self.resume = State::Init;
        self.buffer.clear();
        self.pending_key = None;
        self.nodes.clear();
        self.level = 0;
    }

    /// Consumes one byte, or end of input when `input` is `None`.
    ///
    /// # Errors
    ///
    /// Any decoding error, wrapped in [`Error::At`] with the position of
    /// the byte. End of input while a value is open is
    /// [`Error::UnexpectedEof`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_anon::{Decoder, Progress, Value};
    ///
    /// let mut decoder = Decoder::new();
    /// for &byte in b"obj{\\" {
    ///     assert_eq!(decoder.update(Some(byte))?, Progress::NeedMore);
    /// }
    /// assert!(matches!(decoder.update(Some(b'}'))?, Progress::Done(Value::Object(_))));
    /// # Ok::<(), serde_anon::Error>(())
    /// ```
    pub fn update(&mut self, input: Option<u8>) -> Result<Progress> {
        let outcome = match input {
            Some(byte) => self.step(byte),
            None => self.finish(),
        };
        let (line, column) = (self.line, self.column);
        if let Some(byte) = input {
            self.advance(byte);
        }

        match outcome {
            Ok(Progress::NeedMore) => Ok(Progress::NeedMore),
            Ok(done) => {
                self.reset();
                Ok(done)
            }
            Err(err) => {
                self.reset();
                Err(err.at(line, column))
            }
        }
    }

    /// Feeds bytes from `source` until the top-level value is complete, the
    /// source is exhausted, or the source would block.
    ///
    /// On [`Input::WouldBlock`] this returns [`Progress::NeedMore`] with the
    /// decoder state untouched, and a later call continues where this one
    /// left off.
    ///
    /// # Errors
    ///
    /// Decoding errors as for [`update`](Decoder::update), and source
    /// failures.
    pub fn pump<S: Source + ?Sized>(&mut self, source: &mut S) -> Result<Progress> {
        loop {
            let input = match source.next_input() {
                Ok(input) => input,
                Err(err) => {
                    self.reset();
                    return Err(err);
                }
            };
            match input {
                Input::Byte(byte) => {
                    if let done @ Progress::Done(_) = self.update(Some(byte))? {
                        return Ok(done);
                    }
                }
                Input::Eof => return self.update(None),
                Input::WouldBlock => return Ok(Progress::NeedMore),
            }
        }
    }

    fn advance(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn step(&mut self, byte: u8) -> Result<Progress> {
        match self.state {
            State::Init => {
                if !is_whitespace(byte) {
                    self.buffer.push(byte);
                    self.state = State::TypeTag;
                }
            }
            State::TypeTag => match byte {
                b'{' => self.open()?,
                b if is_whitespace(b) => self.state = State::AfterTypeTag,
                b => self.buffer.push(b),
            },
            State::AfterTypeTag => match byte {
                b'{' => self.open()?,
                b if is_whitespace(b) => {}
                b => return Err(Error::JunkAfterTypeTag(b)),
            },
            State::Key => match byte {
                b':' => self.end_key()?,
                b'\\' => self.escape(),
                b if is_whitespace(b) => {
                    if !self.buffer.is_empty() {
                        self.state = State::AfterKey;
                    }
                }
                b => self.buffer.push(b),
            },
            State::AfterKey => match byte {
                b':' => self.end_key()?,
                b if is_whitespace(b) => {}
                b => return Err(Error::JunkAfterKey(b)),
            },
            State::Value => match byte {
                b'\\' => self.escape(),
                0 => return Err(Error::NullCharacter),
                b => self.buffer.push(b),
            },
            State::CtrlChar => match byte {
                b'}' => return self.close(),
                b';' => self.separate()?,
                0 => return Err(Error::NullCharacter),
                b => {
                    self.buffer.push(b);
                    self.state = self.resume;
                }
            },
        }
        Ok(Progress::NeedMore)
    }

    fn finish(&mut self) -> Result<Progress> {
        if self.level == 0 && self.state == State::Init && self.buffer.is_empty() {
            Ok(Progress::Done(Value::Object(Object::new())))
        } else {
            Err(Error::UnexpectedEof)
        }
    }

    fn escape(&mut self) {
        self.resume = self.state;
        self.state = State::CtrlChar;
    }

    fn end_key(&mut self) -> Result<()> {
        let name = PropertyName::from_bytes(mem::take(&mut self.buffer))?;
        self.pending_key = Some(name);
        self.state = State::Init;
        Ok(())
    }

    fn open(&mut self) -> Result<()> {
        let (kind, value, state) = Kind::resolve(&self.buffer)?;
        if let Some(max_depth) = self.options.max_depth {
            if self.level >= max_depth {
                return Err(Error::NestingTooDeep(max_depth));
            }
        }
        self.buffer.clear();
        self.level += 1;
        self.nodes.push(Node {
            key: self.pending_key.take(),
            value,
        });
        if kind == Kind::ObjectArray {
            // Elements of an object array are read as ordinary objects.
            self.nodes.push(Node {
                key: None,
                value: Value::Object(Object::new()),
            });
        }
        self.state = state;
        Ok(())
    }

    fn close(&mut self) -> Result<Progress> {
        if self.level == 0 {
            return Err(Error::NoValueToEnd);
        }
        self.level -= 1;

        let mut node = self.nodes.pop().ok_or(Error::NoValueToEnd)?;
        finalize(&mut node.value, mem::take(&mut self.buffer))?;

        if matches!(
            self.nodes.last(),
            Some(Node {
                value: Value::ObjectArray(_),
                ..
            })
        ) {
            // `node` is the element placeholder of an object array.
            if let Value::Object(element) = &node.value {
                if !element.is_empty() {
                    let keys: Vec<&str> = element.keys().map(PropertyName::as_str).collect();
                    return Err(Error::NonTerminatedArrayElement(keys.join(",")));
                }
            }
            node = self.nodes.pop().ok_or(Error::NoValueToEnd)?;
        }

        if self.level == 0 {
            return Ok(Progress::Done(node.value));
        }

        let key = node
            .key
            .ok_or_else(|| Error::MalformedKey(String::new()))?;
        match self.nodes.last_mut().map(|parent| &mut parent.value) {
            Some(Value::Object(parent)) => {
                parent.insert(key, node.value)?;
            }
            Some(other) => return Err(Error::NotAnObject(other.kind())),
            None => return Err(Error::NoValueToEnd),
        }
        self.state = State::Key;
        Ok(Progress::NeedMore)
    }

    fn separate(&mut self) -> Result<()> {
        let (current, ancestors) = self.nodes.split_last_mut().ok_or(Error::NoValueToEnd)?;
        match ancestors.last_mut() {
            Some(Node {
                value: Value::ObjectArray(elements),
                ..
            }) => {
                if !self.buffer.is_empty() {
                    return Err(Error::NonTerminatedArrayElement(lossy(&self.buffer)));
                }
                match &mut current.value {
                    Value::Object(element) => elements.push(mem::take(element)),
                    other => return Err(Error::NotAnObject(other.kind())),
                }
            }
            _ => push_element(&mut current.value, mem::take(&mut self.buffer))?,
        }
        self.state = self.resume;
        Ok(())
    }
}

fn read_value<S: Source + ?Sized>(source: &mut S, options: &DecodeOptions) -> Result<Value> {
    let mut decoder = Decoder::with_options(options.clone());
    loop {
        let byte = match source.next_input()? {
            Input::Byte(byte) => Some(byte),
            // Without a way to wait, a blocked source has nothing more to say.
            Input::Eof | Input::WouldBlock => None,
        };
        if let Progress::Done(value) = decoder.update(byte)? {
            if options.deny_trailing_data {
                let (line, column) = decoder.position();
                reject_trailing_data(source, line, column)?;
            }
            return Ok(value);
        }
    }
}

fn reject_trailing_data<S: Source + ?Sized>(
    source: &mut S,
    mut line: usize,
    mut column: usize,
) -> Result<()> {
    loop {
        match source.next_input()? {
            Input::Byte(b'\n') => {
                line += 1;
                column = 1;
            }
            Input::Byte(byte) if is_whitespace(byte) => column += 1,
            Input::Byte(byte) => return Err(Error::TrailingData(byte).at(line, column)),
            Input::Eof | Input::WouldBlock => return Ok(()),
        }
    }
}

/// Decodes one top-level object from `source`.
///
/// Reading stops right after the closing `\}` of the object; any bytes
/// after it are left in the source. A source that would block is treated
/// as exhausted.
///
/// # Errors
///
/// Any decoding error, [`Error::NestingTooDeep`] past
/// [`DEFAULT_MAX_DEPTH`](crate::DEFAULT_MAX_DEPTH) levels, or
/// [`Error::NotAnObject`] if the top-level value is not an `obj`.
///
/// # Examples
///
/// ```rust
/// use serde_anon::{load, SliceSource};
///
/// let mut source = SliceSource::new(b"obj{n:u64{7\\}\\}rest");
/// let object = load(&mut source)?;
/// assert_eq!(object.get("n").and_then(|v| v.as_u64()), Some(7));
/// assert_eq!(source.remaining(), b"rest");
/// # Ok::<(), serde_anon::Error>(())
/// ```
pub fn load<S: Source + ?Sized>(source: &mut S) -> Result<Object> {
    load_with_options(source, &DecodeOptions::default())
}

/// Decodes one top-level object with custom options.
///
/// # Errors
///
/// As for [`load`], with the nesting limit taken from `options`, plus
/// [`Error::TrailingData`] when the options ask for it.
pub fn load_with_options<S: Source + ?Sized>(
    source: &mut S,
    options: &DecodeOptions,
) -> Result<Object> {
    match load_value_with_options(source, options)? {
        Value::Object(object) => Ok(object),
        other => Err(Error::NotAnObject(other.kind())),
    }
}

/// Decodes one top-level value of any kind.
///
/// # Errors
///
/// Any decoding error.
///
/// # Examples
///
/// ```rust
/// use serde_anon::{load_value, SliceSource, Value};
///
/// let value = load_value(&mut SliceSource::new(b"str{a\\\\b\\}"))?;
/// assert_eq!(value, Value::from("a\\b"));
/// # Ok::<(), serde_anon::Error>(())
/// ```
pub fn load_value<S: Source + ?Sized>(source: &mut S) -> Result<Value> {
    read_value(source, &DecodeOptions::default())
}

/// Decodes one top-level value of any kind with custom options.
///
/// # Errors
///
/// As for [`load_with_options`], except that any kind is accepted.
pub fn load_value_with_options<S: Source + ?Sized>(
    source: &mut S,
    options: &DecodeOptions,
) -> Result<Value> {
    read_value(source, options)
}
