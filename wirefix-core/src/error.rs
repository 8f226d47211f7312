/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the WireFix codec.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across encode and decode operations.

use thiserror::Error;

/// Result type alias using [`FixError`] as the error type.
pub type Result<T> = std::result::Result<T, FixError>;

/// Top-level error type for all WireFix operations.
#[derive(Debug, Error)]
pub enum FixError {
    /// Error during message encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error during message decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

/// Errors that occur while encoding a message object against a field-set.
///
/// Any of these aborts the current encode call. The buffer contents from the
/// partial encode are undefined and the encoder must be reset before reuse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value supplied for an encode call was not an object.
    #[error("expected object instance for field-set {set_name}")]
    ExpectedObject {
        /// Name of the field-set being encoded.
        set_name: String,
    },

    /// No message or component definition exists under the requested name.
    #[error("unknown field-set: {name}")]
    UnknownFieldSet {
        /// The requested field-set name.
        name: String,
    },

    /// Group data was present in the object but is not an ordered sequence.
    #[error("expected array instance for group {count_field}")]
    GroupNotSequence {
        /// Name of the group's counting field.
        count_field: String,
    },

    /// A group's repeated field-set has no resolvable concrete simple field
    /// to act as the instance delimiter.
    #[error("group field-set {set_name} has no delimiter field")]
    NoGroupDelimiter {
        /// Name of the repeated field-set.
        set_name: String,
    },

    /// A later group instance starts with a different tag than the one that
    /// delimited the first encoded instance.
    #[error("group instance [{instance}] inconsistent delimiter {actual} expected tag {expected}")]
    InconsistentGroupInstance {
        /// Zero-based index of the offending instance.
        instance: usize,
        /// Tag that actually started the instance.
        actual: u32,
        /// Tag that delimited the first encoded instance.
        expected: u32,
    },

    /// A raw-data field is not preceded by a simple length field at the
    /// previous ordinal position.
    #[error("raw data field {field} has no preceding length field")]
    NoLengthField {
        /// Name of the raw-data field.
        field: String,
    },

    /// A value cannot be represented in the field's wire encoding.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },
}

/// Errors that occur while decoding a byte stream.
///
/// Fatal for the current message only; the parser recovers cleanly at the
/// next message boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A tag contained a non-digit byte, or was empty before `=`.
    #[error("invalid tag at offset {offset}: ...{context}")]
    InvalidTag {
        /// Stream offset of the offending byte.
        offset: usize,
        /// Bytes surrounding the offending position, lossily decoded.
        context: String,
    },

    /// A length-prefixed raw value was not followed by the field delimiter
    /// after the declared number of bytes.
    #[error("raw value for tag {tag} exceeds declared length at offset {offset}")]
    RawValueOverrun {
        /// The raw-data tag.
        tag: u32,
        /// Stream offset where the delimiter was expected.
        offset: usize,
    },

    /// A date/time token does not match its fixed-width layout.
    #[error("bad time token: expected {expected}, got '{actual}'")]
    BadTimeToken {
        /// Description of the expected layout.
        expected: &'static str,
        /// The offending token, lossily decoded.
        actual: String,
    },

    /// A field value cannot be parsed as its dictionary type.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// A message completed without a MsgType field (tag 35).
    #[error("missing msg type field (tag 35)")]
    MissingMsgType,

    /// The MsgType value has no message definition in the dictionary.
    #[error("unknown msg type: {0}")]
    UnknownMsgType(String),

    /// Checksum mismatch between calculated and declared values.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u8,
        /// Declared checksum value in the message.
        declared: u8,
    },

    /// Invalid UTF-8 in a string field.
    #[error("invalid utf-8 in field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::InconsistentGroupInstance {
            instance: 1,
            actual: 456,
            expected: 455,
        };
        assert_eq!(
            err.to_string(),
            "group instance [1] inconsistent delimiter 456 expected tag 455"
        );
    }

    #[test]
    fn test_group_not_sequence_display() {
        let err = EncodeError::GroupNotSequence {
            count_field: "NoSecurityAltID".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "expected array instance for group NoSecurityAltID"
        );
    }

    #[test]
    fn test_fix_error_from_decode() {
        let decode_err = DecodeError::MissingMsgType;
        let fix_err: FixError = decode_err.into();
        assert!(matches!(
            fix_err,
            FixError::Decode(DecodeError::MissingMsgType)
        ));
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::ChecksumMismatch {
            calculated: 100,
            declared: 200,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch: calculated 100, declared 200"
        );
    }
}
