/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # WireFix Tag-Value
//!
//! Schema-driven tag=value encoding and decoding for the WireFix codec.
//!
//! This crate provides the wire layer: serialization of loose message
//! objects against a dictionary, chunked stream parsing, and lazy navigable
//! views over parsed messages.
//!
//! ## Features
//!
//! - **Schema-driven encoding**: wire order follows the dictionary, not the
//!   object; components inline, repeating groups count-prefixed
//! - **Tag position index**: every value region recorded for delimiter
//!   substitution and session-layer length/checksum patch-back
//! - **Streaming decode**: arbitrary chunk boundaries, length-driven raw
//!   data, per-message error recovery
//! - **Lazy views**: on-demand typed getters and dotted-path navigation
//!   over refcounted message bytes

pub mod buffer;
pub mod checksum;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod encoder;
pub mod parser;
pub mod tags;
pub mod time;
pub mod view;

pub use buffer::ElasticBuffer;
pub use checksum::{calculate_checksum, format_checksum, parse_checksum};
pub use encoder::{AsciiEncoder, BODY_LENGTH_TAG, CHECKSUM_TAG, MSG_TYPE_TAG, PIPE, SOH};
pub use parser::AsciiParser;
pub use tags::{TagIndex, TagPos};
pub use view::{MsgView, Selector};
