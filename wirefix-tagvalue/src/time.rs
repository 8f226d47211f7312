/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Fixed-width date/time token formatting and parsing.
//!
//! The protocol carries four temporal encodings, each exact-width and
//! zero-padded:
//! - UTC timestamp: `YYYYMMDD-HH:MM:SS.mmm` (21 bytes)
//! - UTC time only: `HH:MM:SS.mmm` (12 bytes)
//! - UTC date only: `YYYYMMDD` (8 bytes)
//! - Local date: `YYYYMMDD` (8 bytes, no zone conversion)
//!
//! Millisecond precision is always emitted. Parsers reject any token whose
//! width or separator layout is not exact; this is a decode-time contract,
//! not just an encode-time one.

use crate::buffer::ElasticBuffer;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use wirefix_core::DecodeError;

/// Byte width of a UTC timestamp token.
pub const UTC_TIMESTAMP_LEN: usize = 21;
/// Byte width of a UTC time-only token.
pub const UTC_TIME_LEN: usize = 12;
/// Byte width of a date token (UTC or local).
pub const DATE_LEN: usize = 8;

/// Writes `YYYYMMDD-HH:MM:SS.mmm` for a UTC instant.
pub fn write_utc_timestamp(buffer: &mut ElasticBuffer, instant: &DateTime<Utc>) {
    write_date_parts(buffer, &instant.date_naive());
    buffer.write_u8(b'-');
    write_time_parts(buffer, &instant.time());
}

/// Writes `HH:MM:SS.mmm` for a UTC time of day.
pub fn write_utc_time(buffer: &mut ElasticBuffer, time: &NaiveTime) {
    write_time_parts(buffer, time);
}

/// Writes `YYYYMMDD` for a UTC calendar date.
pub fn write_utc_date(buffer: &mut ElasticBuffer, date: &NaiveDate) {
    write_date_parts(buffer, date);
}

/// Writes `YYYYMMDD` for a local market date. No zone conversion is
/// applied; the date is emitted as given.
pub fn write_local_date(buffer: &mut ElasticBuffer, date: &NaiveDate) {
    write_date_parts(buffer, date);
}

fn write_date_parts(buffer: &mut ElasticBuffer, date: &NaiveDate) {
    buffer.write_padded_uint(date.year().max(0) as u32, 4);
    buffer.write_padded_uint(date.month(), 2);
    buffer.write_padded_uint(date.day(), 2);
}

fn write_time_parts(buffer: &mut ElasticBuffer, time: &NaiveTime) {
    buffer.write_padded_uint(time.hour(), 2);
    buffer.write_u8(b':');
    buffer.write_padded_uint(time.minute(), 2);
    buffer.write_u8(b':');
    buffer.write_padded_uint(time.second(), 2);
    buffer.write_u8(b'.');
    // nanosecond() >= 1_000_000_000 only during a leap second; clamp to
    // keep the token width fixed
    buffer.write_padded_uint((time.nanosecond() / 1_000_000).min(999), 3);
}

/// Parses a `YYYYMMDD-HH:MM:SS.mmm` token into a UTC instant.
///
/// # Errors
/// Returns [`DecodeError::BadTimeToken`] on any width, separator, or
/// range violation.
pub fn parse_utc_timestamp(token: &[u8]) -> Result<DateTime<Utc>, DecodeError> {
    const EXPECTED: &str = "YYYYMMDD-HH:MM:SS.mmm";
    if token.len() != UTC_TIMESTAMP_LEN || token[8] != b'-' {
        return Err(bad_token(EXPECTED, token));
    }
    let date = parse_date_parts(&token[..8]).ok_or_else(|| bad_token(EXPECTED, token))?;
    let time = parse_time_parts(&token[9..]).ok_or_else(|| bad_token(EXPECTED, token))?;
    Ok(date.and_time(time).and_utc())
}

/// Parses an `HH:MM:SS.mmm` token into a UTC time of day.
///
/// # Errors
/// Returns [`DecodeError::BadTimeToken`] on any width, separator, or
/// range violation.
pub fn parse_utc_time(token: &[u8]) -> Result<NaiveTime, DecodeError> {
    const EXPECTED: &str = "HH:MM:SS.mmm";
    if token.len() != UTC_TIME_LEN {
        return Err(bad_token(EXPECTED, token));
    }
    parse_time_parts(token).ok_or_else(|| bad_token(EXPECTED, token))
}

/// Parses a `YYYYMMDD` token into a UTC calendar date.
///
/// # Errors
/// Returns [`DecodeError::BadTimeToken`] on any width or range violation.
pub fn parse_utc_date(token: &[u8]) -> Result<NaiveDate, DecodeError> {
    const EXPECTED: &str = "YYYYMMDD";
    if token.len() != DATE_LEN {
        return Err(bad_token(EXPECTED, token));
    }
    parse_date_parts(token).ok_or_else(|| bad_token(EXPECTED, token))
}

/// Parses a `YYYYMMDD` token into a local market date.
///
/// # Errors
/// Returns [`DecodeError::BadTimeToken`] on any width or range violation.
pub fn parse_local_date(token: &[u8]) -> Result<NaiveDate, DecodeError> {
    parse_utc_date(token)
}

fn parse_date_parts(bytes: &[u8]) -> Option<NaiveDate> {
    let year = digits(&bytes[..4])?;
    let month = digits(&bytes[4..6])?;
    let day = digits(&bytes[6..8])?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn parse_time_parts(bytes: &[u8]) -> Option<NaiveTime> {
    if bytes[2] != b':' || bytes[5] != b':' || bytes[8] != b'.' {
        return None;
    }
    let hour = digits(&bytes[..2])?;
    let minute = digits(&bytes[3..5])?;
    let second = digits(&bytes[6..8])?;
    let milli = digits(&bytes[9..12])?;
    NaiveTime::from_hms_milli_opt(hour, minute, second, milli)
}

fn digits(bytes: &[u8]) -> Option<u32> {
    let mut value: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(b - b'0');
    }
    Some(value)
}

fn bad_token(expected: &'static str, token: &[u8]) -> DecodeError {
    DecodeError::BadTimeToken {
        expected,
        actual: String::from_utf8_lossy(token).into_owned(),
    }
}
