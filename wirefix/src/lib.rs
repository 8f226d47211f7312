/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # WireFix
//!
//! A schema-driven FIX tag=value codec for Rust.
//!
//! WireFix serializes loose message objects against a pre-loaded dictionary,
//! parses byte streams in arbitrary chunk sizes, and exposes parsed messages
//! through lazy, navigable views. The schema dictates wire order and typing;
//! the application object model stays permissive.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wirefix::prelude::*;
//!
//! let dictionary = std::sync::Arc::new(load_dictionary());
//! let mut encoder = AsciiEncoder::new(std::sync::Arc::clone(&dictionary));
//! encoder.encode("ExecutionReport", &Value::record([
//!     ("ClOrdID", "Order-1".into()),
//!     ("Price", 100.into()),
//! ]))?;
//! let wire = encoder.trim();
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Value model and error definitions
//! - [`dictionary`]: Schema graph and dictionary management
//! - [`tagvalue`]: Encoding, streaming parsing, and message views

pub mod core {
    //! Value model and error definitions.
    pub use wirefix_core::*;
}

pub mod dictionary {
    //! Schema graph and dictionary management.
    pub use wirefix_dictionary::*;
}

pub mod tagvalue {
    //! Tag=value encoding, streaming parsing, and message views.
    pub use wirefix_tagvalue::*;
}

/// Commonly used types, re-exported for convenient glob import.
pub mod prelude {
    pub use crate::core::{DecodeError, EncodeError, FieldMap, FixError, Result, Value};
    pub use crate::dictionary::{
        ContainedField, Dictionary, FieldDef, FieldSet, FieldType, GroupField, MessageDef,
        SimpleField,
    };
    pub use crate::tagvalue::{
        AsciiEncoder, AsciiParser, BODY_LENGTH_TAG, CHECKSUM_TAG, ElasticBuffer, MSG_TYPE_TAG,
        MsgView, PIPE, SOH, Selector, TagIndex, TagPos, calculate_checksum, format_checksum,
        parse_checksum,
    };
}
