/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema-driven message encoder.
//!
//! [`AsciiEncoder`] walks a loose [`Value`] tree against a dictionary
//! field-set and serializes it as `tag=value` pairs. Wire order follows the
//! schema's ordinal positions, never the object's key order. Every written
//! scalar's value region is recorded in the tag position index, which makes
//! post-hoc delimiter substitution (`trim`) and the session layer's
//! length/checksum patch-back possible without re-encoding.
//!
//! Fields are written with the secondary log delimiter during encoding, so
//! the raw buffer is directly readable in diagnostics; `trim` revisits each
//! recorded entry and overwrites the single delimiter byte after it with
//! the wire delimiter.

use crate::buffer::ElasticBuffer;
use crate::tags::TagIndex;
use crate::time;
use bytes::BytesMut;
use std::sync::Arc;
use wirefix_core::{EncodeError, Value};
use wirefix_dictionary::{ContainedField, Dictionary, FieldSet, FieldType, GroupField, SimpleField};

/// SOH, the standard wire field delimiter.
pub const SOH: u8 = 0x01;

/// Pipe, the default human-readable log delimiter.
pub const PIPE: u8 = b'|';

/// Tag of the body-length field whose value the session layer patches.
pub const BODY_LENGTH_TAG: u32 = 9;

/// Tag of the message-type field.
pub const MSG_TYPE_TAG: u32 = 35;

/// Tag of the trailing checksum field that completes a message.
pub const CHECKSUM_TAG: u32 = 10;

/// Schema-driven tag=value encoder over an elastic buffer.
#[derive(Debug)]
pub struct AsciiEncoder {
    dictionary: Arc<Dictionary>,
    buffer: ElasticBuffer,
    tags: TagIndex,
    delimiter: u8,
    log_delimiter: u8,
    body_length_pos: Option<usize>,
    msg_type_pos: Option<usize>,
}

impl AsciiEncoder {
    /// Creates an encoder with the standard delimiters (SOH on the wire,
    /// pipe in the log form).
    ///
    /// # Arguments
    /// * `dictionary` - The pre-loaded schema graph
    #[must_use]
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self::with_delimiters(dictionary, SOH, PIPE)
    }

    /// Creates an encoder with explicit wire and log delimiters. The two
    /// must be single, distinct bytes for `trim` to be meaningful.
    #[must_use]
    pub fn with_delimiters(dictionary: Arc<Dictionary>, delimiter: u8, log_delimiter: u8) -> Self {
        Self {
            dictionary,
            buffer: ElasticBuffer::new(),
            tags: TagIndex::new(),
            delimiter,
            log_delimiter,
            body_length_pos: None,
            msg_type_pos: None,
        }
    }

    /// Encodes `object` against the message or component field-set named
    /// `set_name`, appending to the current buffer.
    ///
    /// Object keys the schema does not know are silently ignored; matched
    /// fields are written in schema ordinal order.
    ///
    /// # Errors
    /// Returns [`EncodeError`] on schema mismatch or group inconsistency.
    /// The buffer state after a failed encode is undefined; call
    /// [`reset`](Self::reset) before reuse.
    pub fn encode(&mut self, set_name: &str, object: &Value) -> Result<(), EncodeError> {
        let set = self
            .dictionary
            .set_by_name(set_name)
            .ok_or_else(|| EncodeError::UnknownFieldSet {
                name: set_name.to_string(),
            })?;
        self.encode_set(object, &set)
    }

    /// Encodes one field-set occurrence.
    pub fn encode_set(&mut self, object: &Value, set: &FieldSet) -> Result<(), EncodeError> {
        let map = object
            .as_object()
            .ok_or_else(|| EncodeError::ExpectedObject {
                set_name: set.name.clone(),
            })?;

        let mut matched: Vec<&ContainedField> = map
            .keys()
            .filter_map(|key| set.field_by_name(key))
            .collect();
        matched.sort_by_key(|f| f.position());
        // group aliases (group name and counting-field name) resolve to the
        // same position; encode it once
        matched.dedup_by_key(|f| f.position());

        for field in matched {
            match field {
                ContainedField::Simple(sf) => {
                    if let Some(value) = map.get(&sf.definition.name) {
                        // empty values are malformed on the wire; omit them
                        if value.is_null() || value.as_str() == Some("") {
                            continue;
                        }
                        self.encode_simple(object, set, sf, value)?;
                    }
                }
                ContainedField::Component(cf) => {
                    if let Some(child) = map.get(&cf.set.name)
                        && !child.is_null()
                    {
                        let child_set = Arc::clone(&cf.set);
                        self.encode_set(child, &child_set)?;
                    }
                }
                ContainedField::Group(gf) => {
                    self.encode_instances(object, gf)?;
                }
            }
        }
        Ok(())
    }

    /// Produces a byte-exact wire-delimiter copy by overwriting the single
    /// delimiter byte after each recorded value region. Value offsets and
    /// lengths are untouched.
    #[must_use]
    pub fn trim(&self) -> BytesMut {
        let mut copy = self.buffer.copy();
        if self.delimiter != self.log_delimiter {
            for entry in self.tags.iter() {
                if let Some(byte) = copy.get_mut(entry.delimiter_offset()) {
                    *byte = self.delimiter;
                }
            }
        }
        copy
    }

    /// Copies the current log-delimited contents out.
    #[must_use]
    pub fn copy(&self) -> BytesMut {
        self.buffer.copy()
    }

    /// Clears buffer, index, and remembered offsets between messages. All
    /// previously returned offsets are invalidated.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.tags.reset();
        self.body_length_pos = None;
        self.msg_type_pos = None;
    }

    /// Returns the underlying buffer.
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &ElasticBuffer {
        &self.buffer
    }

    /// Returns the tag position index populated by encoding.
    #[inline]
    #[must_use]
    pub fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    /// Value offset of the body-length field (tag 9), remembered for the
    /// session layer to patch once the full body is known.
    #[inline]
    #[must_use]
    pub fn body_length_pos(&self) -> Option<usize> {
        self.body_length_pos
    }

    /// Field offset of the message-type field (tag 35).
    #[inline]
    #[must_use]
    pub fn msg_type_pos(&self) -> Option<usize> {
        self.msg_type_pos
    }

    fn write_tag_equals(&mut self, tag: u32) {
        self.buffer.write_uint(u64::from(tag));
        self.buffer.write_u8(b'=');
    }

    /// Records the value region written since `value_start` and terminates
    /// the field with the log delimiter.
    fn write_delimiter(&mut self, tag: u32, value_start: usize) {
        self.tags
            .store(tag, value_start, self.buffer.pos() - value_start);
        self.buffer.write_u8(self.log_delimiter);
    }

    fn encode_simple(
        &mut self,
        object: &Value,
        set: &FieldSet,
        sf: &SimpleField,
        value: &Value,
    ) -> Result<(), EncodeError> {
        let def = &sf.definition;
        let tag = def.tag;

        if def.field_type == FieldType::Data {
            return self.encode_raw_data(object, set, sf, value);
        }

        let field_start = self.buffer.pos();
        self.write_tag_equals(tag);
        let value_start = self.buffer.pos();

        match (def.field_type, value) {
            // a string destined for a boolean field is coerced by its
            // first character: 'Y' or 'T' is true, anything else false
            (FieldType::Boolean, Value::String(s)) => {
                let truthy = matches!(s.chars().next(), Some('Y' | 'T'));
                self.buffer.write_u8(if truthy { b'Y' } else { b'N' });
            }
            (FieldType::Boolean, Value::Bool(b)) => {
                self.buffer.write_u8(if *b { b'Y' } else { b'N' });
            }
            (FieldType::Boolean, Value::Int(i)) => {
                self.buffer.write_u8(if *i != 0 { b'Y' } else { b'N' });
            }
            // strings pass through verbatim for every other type, so a
            // caller-formatted number keeps its exact source precision
            (_, Value::String(s)) => self.buffer.write_str(s),
            (FieldType::Int | FieldType::Length, Value::Int(i)) => self.buffer.write_int(*i),
            (FieldType::Float, Value::Float(d)) => self.buffer.write_decimal(d),
            (FieldType::Float, Value::Int(i)) => self.buffer.write_int(*i),
            (FieldType::UtcTimestamp, Value::Timestamp(dt)) => {
                time::write_utc_timestamp(&mut self.buffer, dt);
            }
            (FieldType::UtcTimeOnly, Value::Time(t)) => time::write_utc_time(&mut self.buffer, t),
            (FieldType::UtcTimeOnly, Value::Timestamp(dt)) => {
                time::write_utc_time(&mut self.buffer, &dt.time());
            }
            (FieldType::UtcDateOnly | FieldType::LocalDate, Value::Date(d)) => {
                time::write_utc_date(&mut self.buffer, d);
            }
            (FieldType::UtcDateOnly | FieldType::LocalDate, Value::Timestamp(dt)) => {
                time::write_utc_date(&mut self.buffer, &dt.date_naive());
            }
            (FieldType::String, Value::Int(i)) => self.buffer.write_int(*i),
            (FieldType::String, Value::Float(d)) => self.buffer.write_decimal(d),
            (_, other) => {
                return Err(EncodeError::InvalidFieldValue {
                    tag,
                    reason: format!("cannot encode {other} as {:?}", def.field_type),
                });
            }
        }

        self.write_delimiter(tag, value_start);

        match tag {
            // "9=" is two bytes; remember where the patchable value begins
            BODY_LENGTH_TAG => self.body_length_pos = Some(field_start + 2),
            MSG_TYPE_TAG => self.msg_type_pos = Some(field_start),
            _ => {}
        }
        Ok(())
    }

    /// Raw-data fields are length-prefixed by the simple field at the
    /// preceding ordinal position; the length is synthesized when the
    /// object did not supply it explicitly.
    fn encode_raw_data(
        &mut self,
        object: &Value,
        set: &FieldSet,
        sf: &SimpleField,
        value: &Value,
    ) -> Result<(), EncodeError> {
        let def = &sf.definition;
        let data: &[u8] = match value {
            Value::Bytes(b) => b,
            Value::String(s) => s.as_bytes(),
            other => {
                return Err(EncodeError::InvalidFieldValue {
                    tag: def.tag,
                    reason: format!("cannot encode {other} as raw data"),
                });
            }
        };

        let length_field = match sf
            .position
            .checked_sub(1)
            .and_then(|i| set.fields.get(i))
        {
            Some(ContainedField::Simple(lf)) => lf,
            _ => {
                return Err(EncodeError::NoLengthField {
                    field: def.name.clone(),
                });
            }
        };

        if object
            .get(&length_field.definition.name)
            .is_none_or(Value::is_null)
        {
            self.write_tag_equals(length_field.definition.tag);
            let start = self.buffer.pos();
            self.buffer.write_uint(data.len() as u64);
            self.write_delimiter(length_field.definition.tag, start);
        }

        self.write_tag_equals(def.tag);
        let start = self.buffer.pos();
        self.buffer.write_slice(data);
        self.write_delimiter(def.tag, start);
        Ok(())
    }

    /// Encodes a repeating group: the counting field first, then every
    /// instance that supplies the group's delimiter field.
    fn encode_instances(&mut self, object: &Value, gf: &GroupField) -> Result<(), EncodeError> {
        // the group's data may sit under its own name or its counting
        // field's name; both address the same sequence
        let Some(instances) = object
            .get(gf.name())
            .or_else(|| object.get(&gf.count_field.name))
        else {
            return Ok(());
        };
        if instances.is_null() {
            return Ok(());
        }
        let Some(items) = instances.as_array() else {
            return Err(EncodeError::GroupNotSequence {
                count_field: gf.count_field.name.clone(),
            });
        };

        if gf.set.delimiter_field().is_none() {
            return Err(EncodeError::NoGroupDelimiter {
                set_name: gf.set.name.clone(),
            });
        }

        self.write_tag_equals(gf.count_field.tag);
        let start = self.buffer.pos();
        self.buffer.write_uint(items.len() as u64);
        self.write_delimiter(gf.count_field.tag, start);

        let group_set = Arc::clone(&gf.set);
        let mut expected: Option<u32> = None;
        for (index, instance) in items.iter().enumerate() {
            if !instance_supplies_delimiter(&group_set, instance) {
                continue;
            }
            let before = self.tags.len();
            self.encode_set(instance, &group_set)?;
            if self.tags.len() > before {
                // every instance must open with the same tag the first one
                // did, or group boundaries become ambiguous on decode
                let first_tag = self.tags.get(before).map_or(0, |e| e.tag);
                match expected {
                    None => expected = Some(first_tag),
                    Some(e) if e != first_tag => {
                        return Err(EncodeError::InconsistentGroupInstance {
                            instance: index,
                            actual: first_tag,
                            expected: e,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

/// Checks whether an instance supplies a value for the group's delimiter
/// field, walking into nested components' first fields the same way the
/// schema resolves the delimiter itself.
fn instance_supplies_delimiter(set: &FieldSet, instance: &Value) -> bool {
    let mut set = set;
    let mut object = instance;
    loop {
        match set.fields.first() {
            Some(ContainedField::Simple(sf)) => {
                return object
                    .get(&sf.definition.name)
                    .is_some_and(|v| !v.is_null());
            }
            Some(ContainedField::Component(cf)) => match object.get(&cf.set.name) {
                Some(child) if !child.is_null() => {
                    object = child;
                    set = &cf.set;
                }
                _ => return false,
            },
            _ => return false,
        }
    }
}
