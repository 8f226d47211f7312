/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Streaming tag=value parser.
//!
//! [`AsciiParser`] consumes the byte stream in arbitrary chunk sizes and
//! emits a complete [`MsgView`] per message, delimited by the trailing
//! checksum field (tag 10). The state machine tracks one field at a time;
//! a field may begin in one chunk and end in a later one.
//!
//! Raw-data fields are length-driven: when a tag resolves to a data type in
//! the dictionary, the previously parsed field's value is taken as the byte
//! count and exactly that many bytes are consumed without delimiter
//! scanning, so values containing delimiter bytes survive intact.
//!
//! A decode error abandons the message in progress and resets the machine
//! to seek the next message start. Messages already completed and queued
//! are unaffected.

use crate::buffer::ElasticBuffer;
use crate::checksum::{calculate_checksum, parse_checksum};
use crate::encoder::{CHECKSUM_TAG, MSG_TYPE_TAG, SOH};
use crate::tags::TagIndex;
use crate::view::MsgView;
use std::collections::VecDeque;
use std::sync::Arc;
use wirefix_core::DecodeError;
use wirefix_dictionary::{Dictionary, FieldType};

/// Parse state, tracked per byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between messages; skip until a digit starts the next tag.
    Idle,
    /// Accumulating tag digits before `=`.
    Tag,
    /// Accumulating a value until the field delimiter.
    Value,
    /// Consuming a declared number of raw bytes without delimiter scanning.
    Raw {
        /// Raw bytes still to consume.
        remaining: usize,
    },
    /// All declared raw bytes consumed; the next byte must be the delimiter.
    RawDelim,
}

/// Chunked tag=value stream parser producing navigable message views.
#[derive(Debug)]
pub struct AsciiParser {
    dictionary: Arc<Dictionary>,
    buffer: ElasticBuffer,
    tags: TagIndex,
    delimiter: u8,
    validate_checksum: bool,
    state: State,
    tag_acc: u32,
    tag_digits: usize,
    field_start: usize,
    value_start: usize,
    msg_type: Option<String>,
    stream_offset: usize,
    ready: VecDeque<MsgView>,
}

impl AsciiParser {
    /// Creates a parser expecting the standard SOH field delimiter.
    #[must_use]
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self::with_delimiter(dictionary, SOH)
    }

    /// Creates a parser expecting an explicit field delimiter, for streams
    /// captured in log form.
    #[must_use]
    pub fn with_delimiter(dictionary: Arc<Dictionary>, delimiter: u8) -> Self {
        Self {
            dictionary,
            buffer: ElasticBuffer::new(),
            tags: TagIndex::new(),
            delimiter,
            validate_checksum: false,
            state: State::Idle,
            tag_acc: 0,
            tag_digits: 0,
            field_start: 0,
            value_start: 0,
            msg_type: None,
            stream_offset: 0,
            ready: VecDeque::new(),
        }
    }

    /// Enables verification of the trailing checksum field against the byte
    /// sum of the message body. Off by default.
    #[must_use]
    pub fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    /// Pushes a chunk of stream bytes through the state machine. Chunk
    /// boundaries are arbitrary; fields and messages may span them.
    ///
    /// # Errors
    /// Returns the first [`DecodeError`] hit inside the chunk. The message
    /// in progress is abandoned and the machine reset; messages completed
    /// earlier (in this chunk or before) remain queued.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), DecodeError> {
        let mut i = 0;
        while i < chunk.len() {
            // bulk paths: value bytes run to the next delimiter, raw bytes
            // to the declared count; both can be appended in one pass
            match self.state {
                State::Value => match memchr::memchr(self.delimiter, &chunk[i..]) {
                    Some(rel) => {
                        self.buffer.write_slice(&chunk[i..i + rel]);
                        self.stream_offset += rel;
                        i += rel;
                    }
                    None => {
                        self.buffer.write_slice(&chunk[i..]);
                        self.stream_offset += chunk.len() - i;
                        return Ok(());
                    }
                },
                State::Raw { remaining } => {
                    let take = remaining.min(chunk.len() - i);
                    self.buffer.write_slice(&chunk[i..i + take]);
                    self.stream_offset += take;
                    i += take;
                    self.state = if take == remaining {
                        State::RawDelim
                    } else {
                        State::Raw {
                            remaining: remaining - take,
                        }
                    };
                    continue;
                }
                _ => {}
            }
            if let Err(err) = self.consume(chunk[i]) {
                self.recover();
                return Err(err);
            }
            self.stream_offset += 1;
            i += 1;
        }
        Ok(())
    }

    /// Drains the next completed message view, in arrival order.
    pub fn next_message(&mut self) -> Option<MsgView> {
        self.ready.pop_front()
    }

    /// Number of completed messages waiting to be drained.
    #[inline]
    #[must_use]
    pub fn queued(&self) -> usize {
        self.ready.len()
    }

    fn consume(&mut self, byte: u8) -> Result<(), DecodeError> {
        match self.state {
            State::Idle => {
                if byte.is_ascii_digit() {
                    self.begin_tag(byte);
                }
                Ok(())
            }
            State::Tag => self.consume_tag_byte(byte),
            State::Value => {
                if byte == self.delimiter {
                    self.complete_field()
                } else {
                    self.buffer.write_u8(byte);
                    Ok(())
                }
            }
            State::Raw { remaining } => {
                self.buffer.write_u8(byte);
                self.state = if remaining > 1 {
                    State::Raw {
                        remaining: remaining - 1,
                    }
                } else {
                    State::RawDelim
                };
                Ok(())
            }
            State::RawDelim => {
                if byte == self.delimiter {
                    self.complete_field()
                } else {
                    Err(DecodeError::RawValueOverrun {
                        tag: self.tag_acc,
                        offset: self.stream_offset,
                    })
                }
            }
        }
    }

    fn begin_tag(&mut self, digit: u8) {
        self.field_start = self.buffer.pos();
        self.tag_acc = u32::from(digit - b'0');
        self.tag_digits = 1;
        self.buffer.write_u8(digit);
        self.state = State::Tag;
    }

    fn consume_tag_byte(&mut self, byte: u8) -> Result<(), DecodeError> {
        if byte.is_ascii_digit() {
            if self.tag_digits == 0 {
                self.field_start = self.buffer.pos();
                self.tag_acc = 0;
            }
            if self.tag_digits >= 9 {
                return Err(self.invalid_tag(byte));
            }
            self.tag_acc = self.tag_acc * 10 + u32::from(byte - b'0');
            self.tag_digits += 1;
            self.buffer.write_u8(byte);
            return Ok(());
        }
        if byte == b'=' && self.tag_digits > 0 {
            self.buffer.write_u8(byte);
            self.value_start = self.buffer.pos();
            self.state = self.value_state_for(self.tag_acc);
            return Ok(());
        }
        Err(self.invalid_tag(byte))
    }

    /// Decides whether the upcoming value is delimiter-scanned or
    /// length-driven. A data-typed tag switches to raw consumption using
    /// the preceding field's value as the declared byte count.
    fn value_state_for(&self, tag: u32) -> State {
        let is_data = self
            .dictionary
            .field(tag)
            .is_some_and(|def| def.field_type == FieldType::Data);
        if !is_data {
            return State::Value;
        }
        let declared = self.tags.last().and_then(|prev| {
            let bytes = &self.buffer.as_slice()[prev.start..prev.start + prev.len];
            std::str::from_utf8(bytes).ok()?.parse::<usize>().ok()
        });
        match declared {
            // without a usable length prefix, fall back to delimiter
            // scanning
            None => State::Value,
            Some(0) => State::RawDelim,
            Some(n) => State::Raw { remaining: n },
        }
    }

    fn complete_field(&mut self) -> Result<(), DecodeError> {
        let tag = self.tag_acc;
        let value_len = self.buffer.pos() - self.value_start;
        self.tags.store(tag, self.value_start, value_len);

        if tag == MSG_TYPE_TAG {
            let value = &self.buffer.as_slice()[self.value_start..];
            self.msg_type = Some(std::str::from_utf8(value)?.to_string());
        }

        if tag == CHECKSUM_TAG {
            if self.validate_checksum {
                self.verify_checksum()?;
            }
            self.buffer.write_u8(self.delimiter);
            return self.complete_message();
        }

        self.buffer.write_u8(self.delimiter);
        self.tag_digits = 0;
        self.state = State::Tag;
        Ok(())
    }

    fn verify_checksum(&self) -> Result<(), DecodeError> {
        let data = self.buffer.as_slice();
        let value = &data[self.value_start..];
        let declared = parse_checksum(value).ok_or_else(|| DecodeError::InvalidFieldValue {
            tag: CHECKSUM_TAG,
            reason: format!(
                "checksum token '{}' is not 3 digits",
                String::from_utf8_lossy(value)
            ),
        })?;
        // the sum covers every byte before the checksum field itself
        let calculated = calculate_checksum(&data[..self.field_start]);
        if calculated != declared {
            return Err(DecodeError::ChecksumMismatch {
                calculated,
                declared,
            });
        }
        Ok(())
    }

    fn complete_message(&mut self) -> Result<(), DecodeError> {
        let msg_type = self.msg_type.take().ok_or(DecodeError::MissingMsgType)?;
        let definition = self
            .dictionary
            .message_by_type(&msg_type)
            .ok_or(DecodeError::UnknownMsgType(msg_type))?;
        let set = Arc::clone(&definition.set);

        let entries = self.tags.take();
        let data = self.buffer.split_frozen();
        self.ready.push_back(MsgView::root(
            data,
            entries,
            set,
            Arc::clone(&self.dictionary),
        ));

        self.tag_digits = 0;
        self.state = State::Idle;
        Ok(())
    }

    fn invalid_tag(&self, byte: u8) -> DecodeError {
        let data = self.buffer.as_slice();
        let from = data.len().saturating_sub(16);
        let mut context = String::from_utf8_lossy(&data[from..]).into_owned();
        context.push(char::from(byte));
        DecodeError::InvalidTag {
            offset: self.stream_offset,
            context,
        }
    }

    /// Drops the message in progress and re-seeks. Queued views survive.
    fn recover(&mut self) {
        self.buffer.reset();
        self.tags.reset();
        self.msg_type = None;
        self.tag_acc = 0;
        self.tag_digits = 0;
        self.state = State::Idle;
    }
}
