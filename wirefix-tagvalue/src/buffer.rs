/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Growable byte buffer for the encoder and parser.
//!
//! [`ElasticBuffer`] is an append-only byte sink with a current write
//! cursor. Growth is amortized geometric (backed by `BytesMut`), and
//! offsets handed out during one message cycle stay valid until `reset`.
//! A single-byte `patch` supports delimiter substitution and the session
//! layer's length/checksum back-fill.

use arrayvec::ArrayString;
use bytes::{BufMut, Bytes, BytesMut};
use rust_decimal::Decimal;
use std::fmt::Write as _;

/// Append-only byte sink with positional patch support.
#[derive(Debug, Default)]
pub struct ElasticBuffer {
    data: BytesMut,
}

impl ElasticBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a buffer with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Initial capacity in bytes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: BytesMut::with_capacity(capacity),
        }
    }

    /// Returns the current write cursor (equals the number of bytes
    /// written since the last reset).
    #[inline]
    #[must_use]
    pub fn pos(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing has been written since the last reset.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends a single byte.
    #[inline]
    pub fn write_u8(&mut self, byte: u8) {
        self.data.put_u8(byte);
    }

    /// Appends raw bytes verbatim.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.data.put_slice(bytes);
    }

    /// Appends a UTF-8 string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.put_slice(s.as_bytes());
    }

    /// Appends a signed integer as ASCII digits.
    #[inline]
    pub fn write_int(&mut self, value: i64) {
        let mut buf = itoa::Buffer::new();
        self.data.put_slice(buf.format(value).as_bytes());
    }

    /// Appends an unsigned integer as ASCII digits.
    #[inline]
    pub fn write_uint(&mut self, value: u64) {
        let mut buf = itoa::Buffer::new();
        self.data.put_slice(buf.format(value).as_bytes());
    }

    /// Appends a decimal value, preserving the source scale.
    pub fn write_decimal(&mut self, value: &Decimal) {
        let mut buf = ArrayString::<64>::new();
        let _ = write!(buf, "{value}");
        self.data.put_slice(buf.as_bytes());
    }

    /// Appends an unsigned integer zero-padded to a fixed width, for the
    /// fixed-width date/time tokens.
    ///
    /// # Arguments
    /// * `value` - The value to write
    /// * `width` - Exact number of digits to emit
    pub fn write_padded_uint(&mut self, value: u32, width: usize) {
        let mut digits = [b'0'; 10];
        let mut v = value;
        let mut i = width.min(10);
        while i > 0 {
            i -= 1;
            digits[i] = b'0' + (v % 10) as u8;
            v /= 10;
        }
        self.data.put_slice(&digits[..width.min(10)]);
    }

    /// Overwrites one previously written byte in place.
    ///
    /// Out-of-range offsets are ignored; the recorded regions of the tag
    /// position index are never moved by a patch.
    #[inline]
    pub fn patch(&mut self, offset: usize, byte: u8) {
        if let Some(b) = self.data.get_mut(offset) {
            *b = byte;
        }
    }

    /// Returns the written region as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Copies the current contents out as a mutable snapshot.
    #[must_use]
    pub fn copy(&self) -> BytesMut {
        BytesMut::from(self.data.as_ref())
    }

    /// Freezes the accumulated bytes into an immutable, refcounted region
    /// and leaves the buffer empty for the next message.
    ///
    /// Offsets recorded against this buffer index directly into the
    /// returned region.
    #[must_use]
    pub fn split_frozen(&mut self) -> Bytes {
        self.data.split().freeze()
    }

    /// Clears the buffer, invalidating all previously returned offsets.
    #[inline]
    pub fn reset(&mut self) {
        self.data.clear();
    }
}
