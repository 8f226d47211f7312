/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # WireFix Dictionary
//!
//! Schema graph and dictionary management for the WireFix codec.
//!
//! This crate provides:
//! - **Field definitions**: tag, name, and semantic type, `Arc`-shared
//! - **Field-sets**: ordered field sequences with O(1) name lookup
//! - **Contained fields**: the closed simple/component/group sum type
//! - **Dictionary**: message, component, and field resolution
//!
//! The dictionary is an immutable, pre-loaded collaborator: the codec only
//! ever reads it. Parsing dictionary definitions from configuration files
//! is out of scope; field-sets are assembled through the builder methods on
//! [`FieldSet`] and [`Dictionary`].

pub mod schema;

pub use schema::{
    ComponentField, ContainedField, Dictionary, FieldDef, FieldSet, FieldType, GroupField,
    MessageDef, SimpleField,
};
