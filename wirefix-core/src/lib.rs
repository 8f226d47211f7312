/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # WireFix Core
//!
//! Core types and error definitions for the WireFix tag=value codec.
//!
//! This crate provides the building blocks shared across all WireFix crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Value model**: The loose, schema-permissive message object tree
//!
//! ## Loose objects, strict schemas
//!
//! Applications build messages as [`Value`] trees with arbitrary keys; the
//! encoder matches keys against the dictionary and silently ignores keys the
//! schema does not know. Wire order is always dictated by the schema, never
//! by the object.

pub mod error;
pub mod value;

pub use error::{DecodeError, EncodeError, FixError, Result};
pub use value::{FieldMap, Value};
