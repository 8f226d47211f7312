/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Trailer checksum helpers.
//!
//! The trailing checksum field carries the byte sum of everything before it
//! modulo 256, as a 3-digit zero-padded token. The parser can optionally
//! verify it; the session layer uses these helpers together with the
//! encoder's fixed offsets to finish framing a message.

/// Sums `data` modulo 256.
#[inline]
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> u8 {
    let sum: u32 = data.iter().map(|&b| u32::from(b)).sum();
    (sum % 256) as u8
}

/// Formats a checksum as its 3-digit zero-padded wire token.
#[inline]
#[must_use]
pub fn format_checksum(checksum: u8) -> [u8; 3] {
    [
        b'0' + checksum / 100,
        b'0' + (checksum / 10) % 10,
        b'0' + checksum % 10,
    ]
}

/// Parses a 3-digit checksum token; any other width or a non-digit byte
/// yields `None`.
#[inline]
#[must_use]
pub fn parse_checksum(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value =
        u32::from(bytes[0] - b'0') * 100 + u32::from(bytes[1] - b'0') * 10 + u32::from(bytes[2] - b'0');
    u8::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate() {
        assert_eq!(calculate_checksum(b""), 0);
        assert_eq!(
            calculate_checksum(b"XYZ"),
            ((b'X' as u32 + b'Y' as u32 + b'Z' as u32) % 256) as u8
        );
        assert_eq!(calculate_checksum(&[200u8; 300]), ((200u32 * 300) % 256) as u8);
    }

    #[test]
    fn test_format_parse_agree() {
        for value in [0u8, 7, 42, 99, 100, 255] {
            assert_eq!(parse_checksum(&format_checksum(value)), Some(value));
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_checksum(b"27"), None);
        assert_eq!(parse_checksum(b"0273"), None);
        assert_eq!(parse_checksum(b"2a7"), None);
        assert_eq!(parse_checksum(b"999"), None);
    }
}
