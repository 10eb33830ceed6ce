use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// A seekable, growable byte buffer with big-endian primitive readers and
/// writers, decoupled from any particular I/O sink.
///
/// `ByteStream` is the one buffer the codec touches — there are no hidden
/// pools. Readers that would cross the tail fail with
/// [`Error::UnexpectedEof`]; writers always grow the buffer. Position is
/// independent of length, so a stream can be rewound and re-read (used by
/// `peek_u8`/`read_type`).
#[derive(Debug, Default)]
pub struct ByteStream {
    buffer: Vec<u8>,
    cursor: usize,
}

impl ByteStream {
    /// Wrap existing bytes for reading, cursor at the start.
    pub fn new(data: Vec<u8>) -> Self {
        ByteStream { buffer: data, cursor: 0 }
    }

    /// Start an empty, writable stream with a size hint.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteStream { buffer: Vec::with_capacity(capacity), cursor: 0 }
    }

    /// Current cursor position.
    pub fn tell(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to an absolute offset.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.buffer.len() {
            return Err(Error::parse(format!(
                "seek offset {offset} past end of buffer (len {})",
                self.buffer.len()
            )));
        }
        self.cursor = offset;
        Ok(())
    }

    /// Drop the buffer to `n` bytes, clamping the cursor if it now lies past
    /// the new end. `truncate(0)` is the common "reset for reuse" case.
    pub fn truncate(&mut self, n: usize) {
        self.buffer.truncate(n);
        if self.cursor > self.buffer.len() {
            self.cursor = self.buffer.len();
        }
    }

    /// Bytes left to read from the current position.
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor)
    }

    fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            Err(Error::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    /// Look at the next byte without consuming it. Used by `read_type`-style
    /// marker validation that shouldn't commit to reading a value.
    pub fn peek_u8(&self) -> Result<u8> {
        self.require(1)?;
        Ok(self.buffer[self.cursor])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.require(1)?;
        let v = self.buffer[self.cursor];
        self.cursor += 1;
        Ok(v)
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.buffer.push(value);
        Ok(())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_u8(value as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.require(2)?;
        let mut cursor = Cursor::new(&self.buffer[self.cursor..]);
        let value = cursor.read_u16::<BigEndian>()?;
        self.cursor += 2;
        Ok(value)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let mut bytes = Vec::with_capacity(2);
        bytes.write_u16::<BigEndian>(value)?;
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.require(2)?;
        let mut cursor = Cursor::new(&self.buffer[self.cursor..]);
        let value = cursor.read_i16::<BigEndian>()?;
        self.cursor += 2;
        Ok(value)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        let mut bytes = Vec::with_capacity(2);
        bytes.write_i16::<BigEndian>(value)?;
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.require(4)?;
        let mut cursor = Cursor::new(&self.buffer[self.cursor..]);
        let value = cursor.read_u32::<BigEndian>()?;
        self.cursor += 4;
        Ok(value)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let mut bytes = Vec::with_capacity(4);
        bytes.write_u32::<BigEndian>(value)?;
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.require(4)?;
        let mut cursor = Cursor::new(&self.buffer[self.cursor..]);
        let value = cursor.read_i32::<BigEndian>()?;
        self.cursor += 4;
        Ok(value)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let mut bytes = Vec::with_capacity(4);
        bytes.write_i32::<BigEndian>(value)?;
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn read_float(&mut self) -> Result<f32> {
        self.require(4)?;
        let mut cursor = Cursor::new(&self.buffer[self.cursor..]);
        let value = cursor.read_f32::<BigEndian>()?;
        self.cursor += 4;
        Ok(value)
    }

    pub fn write_float(&mut self, value: f32) -> Result<()> {
        let mut bytes = Vec::with_capacity(4);
        bytes.write_f32::<BigEndian>(value)?;
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    pub fn read_double(&mut self) -> Result<f64> {
        self.require(8)?;
        let mut cursor = Cursor::new(&self.buffer[self.cursor..]);
        let value = cursor.read_f64::<BigEndian>()?;
        self.cursor += 8;
        Ok(value)
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        let mut bytes = Vec::with_capacity(8);
        bytes.write_f64::<BigEndian>(value)?;
        self.buffer.extend_from_slice(&bytes);
        Ok(())
    }

    /// Consume `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.require(len)?;
        let bytes = self.buffer[self.cursor..self.cursor + len].to_vec();
        self.cursor += len;
        Ok(bytes)
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    /// Consume `len` bytes and validate them as UTF-8.
    pub fn read_utf8(&mut self, len: usize) -> Result<String> {
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|e| Error::encoding(format!("invalid UTF-8: {e}")))
    }

    /// Consume `len` bytes and decode them via a named charset. Only the
    /// charsets the wire format actually needs are supported: `utf-8`
    /// (validated) and `iso-8859-1` (every byte maps 1:1 onto the matching
    /// Latin-1 Unicode scalar value, so no lookup table is needed).
    pub fn read_multibyte(&mut self, len: usize, charset: &str) -> Result<String> {
        match charset {
            "utf-8" | "utf8" => self.read_utf8(len),
            "iso-8859-1" | "latin1" => {
                let bytes = self.read_bytes(len)?;
                Ok(bytes.into_iter().map(char::from).collect())
            }
            other => Err(Error::encoding(format!("unsupported charset: {other}"))),
        }
    }

    /// Snapshot of everything written so far, independent of cursor position.
    pub fn getvalue(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
