//! Byte sources and sinks.
//!
//! The codec only needs the [`Source`] and [`Sink`] contracts. This module
//! provides the adapters most callers want:
//!
//! - [`SliceSource`]: an in-memory document, exposing what is left after
//!   the top-level value
//! - [`ReaderSource`]: any [`std::io::Read`], with non-blocking readers
//!   reporting [`Input::WouldBlock`]
//! - [`StreamBuffer`]: a push buffer for feeding the streaming decoder by hand
//! - [`WriterSink`]: any [`std::io::Write`]
//! - [`load_path`] / [`store_path`]: whole-file convenience
//!
//! ## Examples
//!
//! ```rust
//! use serde_anon::{load, ReaderSource};
//!
//! let input: &[u8] = b"obj{name:str{Alice\\}\\}";
//! let object = load(&mut ReaderSource::new(input))?;
//! assert_eq!(object.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! # Ok::<(), serde_anon::Error>(())
//! ```

use crate::de::{Input, Source};
use crate::ser::Sink;
use crate::{load, store, Object, Result};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// A [`Source`] over a byte slice.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        SliceSource { bytes, position: 0 }
    }

    /// The number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }
}

impl Source for SliceSource<'_> {
    fn next_input(&mut self) -> Result<Input> {
        match self.bytes.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                Ok(Input::Byte(byte))
            }
            None => Ok(Input::Eof),
        }
    }
}

/// A [`Source`] reading one byte at a time from an [`io::Read`].
///
/// Reads are unbuffered; wrap files and sockets in a [`BufReader`].
/// [`io::ErrorKind::WouldBlock`] becomes [`Input::WouldBlock`] and
/// interrupted reads are retried.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Source for ReaderSource<R> {
    fn next_input(&mut self) -> Result<Input> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(Input::Eof),
                Ok(_) => return Ok(Input::Byte(byte[0])),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(Input::WouldBlock),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// An in-memory queue of input bytes.
///
/// Drained but still open, it reports [`Input::WouldBlock`]; once
/// [`close`](StreamBuffer::close)d it reports [`Input::Eof`].
#[derive(Clone, Debug, Default)]
pub struct StreamBuffer {
    pending: VecDeque<u8>,
    closed: bool,
}

impl StreamBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bytes for the decoder to consume.
    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    /// Marks the end of the input.
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The number of bytes not yet consumed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Source for StreamBuffer {
    fn next_input(&mut self) -> Result<Input> {
        Ok(match self.pending.pop_front() {
            Some(byte) => Input::Byte(byte),
            None if self.closed => Input::Eof,
            None => Input::WouldBlock,
        })
    }
}

/// A [`Sink`] writing to an [`io::Write`].
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }
}

/// Reads one object from the file at `path`.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) if the file cannot be read, or any
/// decoding error.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Object> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading anon document");
    let file = File::open(path)?;
    let object = load(&mut ReaderSource::new(BufReader::new(file)))?;
    debug!(path = %path.display(), properties = object.len(), "Loaded anon document");
    Ok(object)
}

/// Writes `object` to the file at `path`, replacing its contents.
///
/// # Errors
///
/// [`Error::Io`](crate::Error::Io) if the file cannot be written, or
/// [`Error::NullCharacter`](crate::Error::NullCharacter) if a string
/// contains NUL.
pub fn store_path<P: AsRef<Path>>(object: &Object, path: P) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), properties = object.len(), "Storing anon document");
    let file = File::create(path)?;
    let mut sink = WriterSink::new(BufWriter::new(file));
    store(object, &mut sink)?;
    sink.into_inner().flush()?;
    Ok(())
}
