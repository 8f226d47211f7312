/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema graph for the WireFix codec.
//!
//! This module defines the immutable, pre-loaded tree of field definitions
//! the encoder and decoder dispatch over:
//! - [`FieldDef`]: a field's tag, name, and semantic type
//! - [`ContainedField`]: the closed three-variant sum over simple fields,
//!   components, and repeating groups
//! - [`FieldSet`]: an ordered field sequence with O(1) name lookup
//! - [`Dictionary`]: message/component/field lookups by name, type, and tag
//!
//! Field definitions are `Arc`-shared by reference across every message that
//! uses them. Loading definitions from configuration files is a collaborator
//! concern; this crate only offers the programmatic construction API.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Semantic type of a field value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Free-form text.
    String,
    /// Base-10 signed integer.
    Int,
    /// Byte count for a following raw-data field.
    Length,
    /// Decimal number, full source precision preserved.
    Float,
    /// Boolean (wire form `Y` / `N`).
    Boolean,
    /// UTC timestamp, `YYYYMMDD-HH:MM:SS.mmm`.
    UtcTimestamp,
    /// UTC time of day, `HH:MM:SS.mmm`.
    UtcTimeOnly,
    /// UTC date, `YYYYMMDD`.
    UtcDateOnly,
    /// Local market date, `YYYYMMDD`, no zone conversion.
    LocalDate,
    /// Raw bytes, length-prefixed by the preceding field.
    Data,
}

impl FieldType {
    /// Returns true if this type is written as a number.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Length | Self::Float)
    }

    /// Returns true if this type is one of the four fixed-width
    /// date/time encodings.
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::UtcTimestamp | Self::UtcTimeOnly | Self::UtcDateOnly | Self::LocalDate
        )
    }
}

impl std::str::FromStr for FieldType {
    type Err = std::convert::Infallible;

    /// Creates a FieldType from a dictionary type name.
    ///
    /// Unknown names fall back to `String`, matching the permissive handling
    /// of vendor dictionaries.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "INT" | "SEQNUM" | "NUMINGROUP" | "TAGNUM" | "DAYOFMONTH" => Self::Int,
            "LENGTH" => Self::Length,
            "FLOAT" | "QTY" | "QUANTITY" | "PRICE" | "PRICEOFFSET" | "AMT" | "AMOUNT"
            | "PERCENTAGE" => Self::Float,
            "BOOLEAN" => Self::Boolean,
            "UTCTIMESTAMP" => Self::UtcTimestamp,
            "UTCTIMEONLY" => Self::UtcTimeOnly,
            "UTCDATEONLY" => Self::UtcDateOnly,
            "LOCALMKTDATE" => Self::LocalDate,
            "DATA" | "XMLDATA" => Self::Data,
            _ => Self::String,
        })
    }
}

/// Definition of a single protocol field.
///
/// Immutable once loaded; shared by reference across every field-set that
/// contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Protocol-assigned tag number.
    pub tag: u32,
    /// Human-readable field name.
    pub name: String,
    /// Semantic wire type.
    pub field_type: FieldType,
}

impl FieldDef {
    /// Creates a new field definition.
    ///
    /// # Arguments
    /// * `tag` - The protocol-assigned tag number
    /// * `name` - The field name
    /// * `field_type` - The semantic wire type
    #[must_use]
    pub fn new(tag: u32, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            tag,
            name: name.into(),
            field_type,
        }
    }
}

/// A simple field occurrence inside a field-set.
#[derive(Debug, Clone)]
pub struct SimpleField {
    /// The shared field definition.
    pub definition: Arc<FieldDef>,
    /// Ordinal position within the containing field-set.
    pub position: usize,
}

/// A component occurrence: a nested field-set encoded inline at the
/// parent's position.
#[derive(Debug, Clone)]
pub struct ComponentField {
    /// The nested field-set definition.
    pub set: Arc<FieldSet>,
    /// Ordinal position within the containing field-set.
    pub position: usize,
}

/// A repeating group occurrence: a counting field followed by repeated
/// instances of a field-set.
#[derive(Debug, Clone)]
pub struct GroupField {
    /// The counting field; its wire value is the instance count.
    pub count_field: Arc<FieldDef>,
    /// The repeated field-set; each instance is one occurrence of it.
    pub set: Arc<FieldSet>,
    /// Ordinal position within the containing field-set.
    pub position: usize,
}

impl GroupField {
    /// Returns the group name (the repeated field-set's name).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.set.name
    }
}

/// One entry of a field-set: exactly one of the three field kinds.
///
/// Encode and decode dispatch over this closed sum with exhaustive
/// matching; there is no open hierarchy and no runtime type inspection of
/// the application object.
#[derive(Debug, Clone)]
pub enum ContainedField {
    /// A single scalar field.
    Simple(SimpleField),
    /// A nested field-set encoded inline.
    Component(ComponentField),
    /// A counting field plus repeated instances.
    Group(GroupField),
}

impl ContainedField {
    /// Returns the ordinal position within the containing field-set.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Simple(f) => f.position,
            Self::Component(f) => f.position,
            Self::Group(f) => f.position,
        }
    }

    /// Returns the local name this entry is addressed by.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(f) => &f.definition.name,
            Self::Component(f) => &f.set.name,
            Self::Group(f) => f.name(),
        }
    }
}

/// An ordered schema description of the fields a message, component, or
/// group instance may contain.
///
/// Ordinal positions are assigned in insertion order and are unique and
/// increasing. Lookup tables are maintained incrementally so that name and
/// tag resolution stay O(1) at codec time.
#[derive(Debug, Default)]
pub struct FieldSet {
    /// Field-set name (message, component, or group name).
    pub name: String,
    /// Contained fields in ordinal order.
    pub fields: Vec<ContainedField>,
    /// Local name (including group counting-field aliases) to field index.
    by_name: HashMap<String, usize>,
    /// Tag to owning top-level field index, for every tag appearing inline
    /// (simple tags, component interiors, group count tags).
    tag_owner: HashMap<u32, usize>,
    /// Every tag reachable from this set, including group-instance
    /// interiors. Used for segment-extent detection on decode.
    all_tags: HashSet<u32>,
}

impl FieldSet {
    /// Creates an empty field-set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Appends a simple field at the next ordinal position.
    pub fn add_simple(&mut self, definition: Arc<FieldDef>) {
        let position = self.fields.len();
        self.by_name.insert(definition.name.clone(), position);
        self.tag_owner.insert(definition.tag, position);
        self.all_tags.insert(definition.tag);
        self.fields
            .push(ContainedField::Simple(SimpleField { definition, position }));
    }

    /// Appends a component at the next ordinal position.
    ///
    /// The component's inline tags become resolvable through this set.
    pub fn add_component(&mut self, set: Arc<FieldSet>) {
        let position = self.fields.len();
        self.by_name.insert(set.name.clone(), position);
        for &tag in set.tag_owner.keys() {
            self.tag_owner.insert(tag, position);
        }
        self.all_tags.extend(set.all_tags.iter().copied());
        self.fields
            .push(ContainedField::Component(ComponentField { set, position }));
    }

    /// Appends a repeating group at the next ordinal position.
    ///
    /// The group is addressable both by its own name and by its counting
    /// field's name.
    pub fn add_group(&mut self, count_field: Arc<FieldDef>, set: Arc<FieldSet>) {
        let position = self.fields.len();
        self.by_name.insert(set.name.clone(), position);
        self.by_name.insert(count_field.name.clone(), position);
        self.tag_owner.insert(count_field.tag, position);
        self.all_tags.insert(count_field.tag);
        self.all_tags.extend(set.all_tags.iter().copied());
        self.fields.push(ContainedField::Group(GroupField {
            count_field,
            set,
            position,
        }));
    }

    /// Looks up a contained field by local name in O(1).
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&ContainedField> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Returns the top-level field owning `tag`, for tags that appear
    /// inline in this set (group-instance interiors are not inline).
    #[must_use]
    pub fn owner_of(&self, tag: u32) -> Option<&ContainedField> {
        self.tag_owner.get(&tag).map(|&i| &self.fields[i])
    }

    /// Returns true if `tag` is reachable anywhere under this set,
    /// including inside group instances.
    #[inline]
    #[must_use]
    pub fn contains_tag(&self, tag: u32) -> bool {
        self.all_tags.contains(&tag)
    }

    /// Resolves the delimiter field of a repeated field-set: the first
    /// concrete simple field, found by walking into nested components'
    /// first fields. Returns `None` when the walk dead-ends in a group.
    #[must_use]
    pub fn delimiter_field(&self) -> Option<&SimpleField> {
        let mut set = self;
        loop {
            match set.fields.first()? {
                ContainedField::Simple(sf) => return Some(sf),
                ContainedField::Component(cf) => set = &cf.set,
                ContainedField::Group(_) => return None,
            }
        }
    }

    /// Locates a name in this set or transparently inside nested
    /// components, returning the index path from this set down to the
    /// located field.
    #[must_use]
    pub fn locate(&self, name: &str) -> Option<Vec<usize>> {
        if let Some(&i) = self.by_name.get(name) {
            return Some(vec![i]);
        }
        for (i, field) in self.fields.iter().enumerate() {
            if let ContainedField::Component(cf) = field
                && let Some(mut path) = cf.set.locate(name)
            {
                path.insert(0, i);
                return Some(path);
            }
        }
        None
    }
}

/// Definition of a message: a named field-set tied to a msg-type value.
#[derive(Debug, Clone)]
pub struct MessageDef {
    /// Message name (e.g. `ExecutionReport`).
    pub name: String,
    /// Wire msg-type value (e.g. `8`).
    pub msg_type: String,
    /// The message's field-set, including header and trailer components.
    pub set: Arc<FieldSet>,
}

/// Complete pre-loaded dictionary: the read-only collaborator the codec
/// resolves every name and tag against.
#[derive(Debug, Default)]
pub struct Dictionary {
    fields_by_tag: HashMap<u32, Arc<FieldDef>>,
    fields_by_name: HashMap<String, Arc<FieldDef>>,
    messages: HashMap<String, Arc<MessageDef>>,
    messages_by_type: HashMap<String, Arc<MessageDef>>,
    components: HashMap<String, Arc<FieldSet>>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field definition and returns the shared handle.
    pub fn add_field(&mut self, definition: FieldDef) -> Arc<FieldDef> {
        let definition = Arc::new(definition);
        self.fields_by_name
            .insert(definition.name.clone(), Arc::clone(&definition));
        self.fields_by_tag
            .insert(definition.tag, Arc::clone(&definition));
        definition
    }

    /// Registers a message definition under its name and msg-type value.
    pub fn add_message(&mut self, msg_type: impl Into<String>, set: Arc<FieldSet>) {
        let definition = Arc::new(MessageDef {
            name: set.name.clone(),
            msg_type: msg_type.into(),
            set,
        });
        self.messages
            .insert(definition.name.clone(), Arc::clone(&definition));
        self.messages_by_type
            .insert(definition.msg_type.clone(), definition);
    }

    /// Registers a reusable component field-set.
    pub fn add_component(&mut self, set: Arc<FieldSet>) {
        self.components.insert(set.name.clone(), set);
    }

    /// Gets a field definition by tag.
    #[must_use]
    pub fn field(&self, tag: u32) -> Option<&Arc<FieldDef>> {
        self.fields_by_tag.get(&tag)
    }

    /// Gets a field definition by name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields_by_name.get(name)
    }

    /// Gets a message definition by name.
    #[must_use]
    pub fn message(&self, name: &str) -> Option<&Arc<MessageDef>> {
        self.messages.get(name)
    }

    /// Gets a message definition by wire msg-type value.
    #[must_use]
    pub fn message_by_type(&self, msg_type: &str) -> Option<&Arc<MessageDef>> {
        self.messages_by_type.get(msg_type)
    }

    /// Gets a component field-set by name.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Arc<FieldSet>> {
        self.components.get(name)
    }

    /// Resolves an encodable field-set by name: messages first, then
    /// components.
    #[must_use]
    pub fn set_by_name(&self, name: &str) -> Option<Arc<FieldSet>> {
        self.messages
            .get(name)
            .map(|m| Arc::clone(&m.set))
            .or_else(|| self.components.get(name).cloned())
    }
}
