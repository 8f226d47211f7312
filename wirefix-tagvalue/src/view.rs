/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Lazy navigable message views.
//!
//! A [`MsgView`] is a window over a parsed message: the frozen message
//! bytes, the tag position index built while parsing, and the field-set the
//! window is interpreted against. Nothing is materialized up front; string
//! and typed getters decode single values on demand, and [`MsgView::get_view`]
//! narrows the window to a component or repeating group without copying.
//!
//! Views are cheap to produce (the backing bytes are refcounted) but
//! [`Clone`] is a deliberate deep copy, so a cloned view can outlive the
//! parser and its other views without pinning shared state.

use crate::tags::TagPos;
use crate::time;
use bytes::Bytes;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use wirefix_core::Value;
use wirefix_dictionary::{ContainedField, Dictionary, FieldSet, FieldType, GroupField};

/// Addresses a field inside a view either by tag number or by its
/// dictionary name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Protocol tag number.
    Tag(u32),
    /// Dictionary field name, resolved through the view's field-set.
    Name(&'a str),
}

impl From<u32> for Selector<'static> {
    fn from(tag: u32) -> Self {
        Self::Tag(tag)
    }
}

impl<'a> From<&'a str> for Selector<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// What the view's window denotes.
#[derive(Debug, Clone)]
enum ViewKind {
    /// A field-set occurrence (message, component, or group instance).
    Set,
    /// A repeating group segment: the counting entry plus all instances.
    Group(GroupField),
}

/// A navigable window over one parsed message.
#[derive(Debug)]
pub struct MsgView {
    data: Bytes,
    entries: Arc<Vec<TagPos>>,
    /// First index entry of the window, inclusive.
    start: usize,
    /// End index entry of the window, exclusive.
    end: usize,
    set: Arc<FieldSet>,
    dictionary: Arc<Dictionary>,
    kind: ViewKind,
}

impl MsgView {
    /// Builds the root view over a complete message.
    pub(crate) fn root(
        data: Bytes,
        entries: Vec<TagPos>,
        set: Arc<FieldSet>,
        dictionary: Arc<Dictionary>,
    ) -> Self {
        let end = entries.len();
        Self {
            data,
            entries: Arc::new(entries),
            start: 0,
            end,
            set,
            dictionary,
            kind: ViewKind::Set,
        }
    }

    /// Name of the field-set this view is interpreted against.
    #[inline]
    #[must_use]
    pub fn set_name(&self) -> &str {
        &self.set.name
    }

    /// Number of index entries inside the window.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.end - self.start
    }

    /// Returns a field's raw value bytes.
    #[must_use]
    pub fn get_raw<'a>(&self, selector: impl Into<Selector<'a>>) -> Option<&[u8]> {
        let entry = self.find_entry(selector.into())?;
        Some(&self.data[entry.start..entry.start + entry.len])
    }

    /// Returns a field's value decoded as a string, without type coercion.
    #[must_use]
    pub fn get_string<'a>(&self, selector: impl Into<Selector<'a>>) -> Option<String> {
        self.get_raw(selector)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Returns a field's value coerced to its dictionary type. Tags the
    /// dictionary does not know, and values that fail to parse as their
    /// declared type, come back as `None`.
    #[must_use]
    pub fn get_typed<'a>(&self, selector: impl Into<Selector<'a>>) -> Option<Value> {
        let entry = self.find_entry(selector.into())?;
        self.typed_value(entry)
    }

    /// Decodes several fields in one pass, preserving the requested order.
    /// Selectors may be tag numbers or dictionary names, uniformly. Missing
    /// or unparseable fields yield [`Value::Null`] at their slot.
    #[must_use]
    pub fn get_typed_tags<'a, S>(&self, selectors: &[S]) -> Vec<Value>
    where
        S: Into<Selector<'a>> + Copy,
    {
        selectors
            .iter()
            .map(|&s| self.get_typed(s).unwrap_or(Value::Null))
            .collect()
    }

    /// Narrows to a nested view addressed by a dotted path of component and
    /// group names (a group is addressable by its own name or its counting
    /// field's name). Component nesting is transparent: a name buried in a
    /// component chain resolves without spelling out the chain.
    #[must_use]
    pub fn get_view(&self, path: &str) -> Option<MsgView> {
        let mut current = self.shallow();
        for segment in path.split('.') {
            current = current.child_view(segment)?;
        }
        Some(current)
    }

    /// Number of instances a group view carries, read from its counting
    /// entry. `None` on non-group views.
    #[must_use]
    pub fn group_count(&self) -> Option<usize> {
        match &self.kind {
            ViewKind::Group(_) => {
                let count = self.entries.get(self.start)?;
                let bytes = &self.data[count.start..count.start + count.len];
                std::str::from_utf8(bytes).ok()?.parse().ok()
            }
            ViewKind::Set => None,
        }
    }

    /// Returns instance `index` of a group view as a field-set view over
    /// the instance's repeated set. Instances are split at the delimiter
    /// tag, the tag that opened the first instance.
    #[must_use]
    pub fn group_instance(&self, index: usize) -> Option<MsgView> {
        let ViewKind::Group(gf) = &self.kind else {
            return None;
        };
        let first = self.start + 1;
        if first >= self.end {
            return None;
        }
        let delimiter_tag = self.entries[first].tag;

        let mut seen = 0usize;
        let mut instance_start = None;
        for i in first..self.end {
            if self.entries[i].tag == delimiter_tag {
                if let Some(begin) = instance_start
                    && seen == index + 1
                {
                    return Some(self.narrowed(begin, i, Arc::clone(&gf.set), ViewKind::Set));
                }
                seen += 1;
                if seen == index + 1 {
                    instance_start = Some(i);
                }
            }
        }
        instance_start.map(|begin| self.narrowed(begin, self.end, Arc::clone(&gf.set), ViewKind::Set))
    }

    /// Materializes the window into a [`Value`] tree shaped like the object
    /// the encoder accepts: simple fields keyed by name, components as
    /// nested objects, groups as instance arrays under their counting
    /// field's name.
    #[must_use]
    pub fn to_object(&self) -> Value {
        if let ViewKind::Group(_) = &self.kind {
            let count = self.group_count().unwrap_or(0);
            let instances = (0..count)
                .filter_map(|i| self.group_instance(i))
                .map(|v| v.to_object());
            return Value::array(instances);
        }

        let mut map = wirefix_core::FieldMap::new();
        let mut i = self.start;
        while i < self.end {
            let tag = self.entries[i].tag;
            match self.set.owner_of(tag) {
                Some(ContainedField::Simple(sf)) => {
                    if let Some(value) = self.typed_value(&self.entries[i]) {
                        map.insert(sf.definition.name.clone(), value);
                    }
                    i += 1;
                }
                Some(ContainedField::Component(cf)) => {
                    let child_set = Arc::clone(&cf.set);
                    let run = self.segment_extent(i, &child_set);
                    let child = self.narrowed(i, run, child_set, ViewKind::Set);
                    map.insert(cf.set.name.clone(), child.to_object());
                    i = run;
                }
                Some(ContainedField::Group(gf)) => {
                    let group_set = Arc::clone(&gf.set);
                    let run = self.segment_extent(i + 1, &group_set);
                    let child = self.narrowed(i, run, group_set, ViewKind::Group(gf.clone()));
                    map.insert(gf.count_field.name.clone(), child.to_object());
                    i = run;
                }
                None => {
                    // unknown tags survive as strings keyed by tag number
                    let entry = &self.entries[i];
                    let bytes = &self.data[entry.start..entry.start + entry.len];
                    map.insert(
                        tag.to_string(),
                        Value::String(String::from_utf8_lossy(bytes).into_owned()),
                    );
                    i += 1;
                }
            }
        }
        Value::Object(map)
    }

    fn find_entry(&self, selector: Selector<'_>) -> Option<&TagPos> {
        let tag = match selector {
            Selector::Tag(tag) => tag,
            Selector::Name(name) => self.tag_of_name(name)?,
        };
        self.entries[self.start..self.end]
            .iter()
            .find(|e| e.tag == tag)
    }

    /// Resolves a name to a concrete simple-field tag, looking through the
    /// window's field-set first (including nested components) and falling
    /// back to the global dictionary.
    fn tag_of_name(&self, name: &str) -> Option<u32> {
        if let Some(path) = self.set.locate(name) {
            if let ContainedField::Simple(sf) = follow_path(&self.set, &path)? {
                return Some(sf.definition.tag);
            }
            return None;
        }
        self.dictionary.field_by_name(name).map(|def| def.tag)
    }

    fn typed_value(&self, entry: &TagPos) -> Option<Value> {
        let bytes = &self.data[entry.start..entry.start + entry.len];
        let Some(def) = self.dictionary.field(entry.tag) else {
            return None;
        };
        match def.field_type {
            FieldType::Int | FieldType::Length => {
                let s = std::str::from_utf8(bytes).ok()?;
                s.parse::<i64>().ok().map(Value::Int)
            }
            FieldType::Float => {
                let s = std::str::from_utf8(bytes).ok()?;
                Decimal::from_str(s).ok().map(Value::Float)
            }
            FieldType::Boolean => Some(Value::Bool(bytes.first() == Some(&b'Y'))),
            FieldType::UtcTimestamp => {
                time::parse_utc_timestamp(bytes).ok().map(Value::Timestamp)
            }
            FieldType::UtcTimeOnly => time::parse_utc_time(bytes).ok().map(Value::Time),
            FieldType::UtcDateOnly => time::parse_utc_date(bytes).ok().map(Value::Date),
            FieldType::LocalDate => time::parse_local_date(bytes).ok().map(Value::Date),
            FieldType::Data => Some(Value::Bytes(
                self.data.slice(entry.start..entry.start + entry.len),
            )),
            FieldType::String => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
        }
    }

    /// Narrows one path segment: a component becomes a field-set window, a
    /// group becomes a group window anchored at its counting entry.
    fn child_view(&self, name: &str) -> Option<MsgView> {
        let path = self.set.locate(name)?;
        match follow_path(&self.set, &path)? {
            ContainedField::Simple(_) => None,
            ContainedField::Component(cf) => {
                let child_set = Arc::clone(&cf.set);
                let begin = self.first_owned(&child_set)?;
                let run = self.segment_extent(begin, &child_set);
                Some(self.narrowed(begin, run, child_set, ViewKind::Set))
            }
            ContainedField::Group(gf) => {
                let gf = gf.clone();
                let begin = (self.start..self.end)
                    .find(|&i| self.entries[i].tag == gf.count_field.tag)?;
                let group_set = Arc::clone(&gf.set);
                let run = self.segment_extent(begin + 1, &group_set);
                Some(self.narrowed(begin, run, group_set, ViewKind::Group(gf)))
            }
        }
    }

    /// First window entry whose tag belongs to `set`.
    fn first_owned(&self, set: &FieldSet) -> Option<usize> {
        (self.start..self.end).find(|&i| set.contains_tag(self.entries[i].tag))
    }

    /// Extends a segment from `begin` while entries stay inside `set`'s
    /// tag closure, returning the exclusive end index.
    fn segment_extent(&self, begin: usize, set: &FieldSet) -> usize {
        let mut i = begin;
        while i < self.end && set.contains_tag(self.entries[i].tag) {
            i += 1;
        }
        i
    }

    fn narrowed(&self, start: usize, end: usize, set: Arc<FieldSet>, kind: ViewKind) -> MsgView {
        MsgView {
            data: self.data.clone(),
            entries: Arc::clone(&self.entries),
            start,
            end,
            set,
            dictionary: Arc::clone(&self.dictionary),
            kind,
        }
    }

    /// Refcount-sharing copy for internal narrowing. The public [`Clone`]
    /// deep-copies instead.
    fn shallow(&self) -> MsgView {
        self.narrowed(self.start, self.end, Arc::clone(&self.set), self.kind.clone())
    }
}

impl Clone for MsgView {
    /// Deep copy: the backing bytes and index are duplicated so the clone
    /// shares no storage with the parser or any sibling view.
    fn clone(&self) -> Self {
        MsgView {
            data: Bytes::copy_from_slice(&self.data),
            entries: Arc::new((*self.entries).clone()),
            start: self.start,
            end: self.end,
            set: Arc::clone(&self.set),
            dictionary: Arc::clone(&self.dictionary),
            kind: self.kind.clone(),
        }
    }
}

impl fmt::Display for MsgView {
    /// Renders one `[index] tag (Name) = value` line per entry, for
    /// diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, i) in (self.start..self.end).enumerate() {
            let entry = &self.entries[i];
            let name = self
                .dictionary
                .field(entry.tag)
                .map_or("?", |def| def.name.as_str());
            let value = String::from_utf8_lossy(&self.data[entry.start..entry.start + entry.len]);
            writeln!(f, "[{line}] {} ({name}) = {value}", entry.tag)?;
        }
        Ok(())
    }
}

/// Follows a locate path from `set` down to the terminal contained field.
fn follow_path<'a>(set: &'a FieldSet, path: &[usize]) -> Option<&'a ContainedField> {
    let (&last, inner) = path.split_last()?;
    let mut current = set;
    for &i in inner {
        match current.fields.get(i)? {
            ContainedField::Component(cf) => current = &cf.set,
            _ => return None,
        }
    }
    current.fields.get(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{AsciiEncoder, PIPE};
    use crate::fixtures;
    use crate::parser::AsciiParser;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    const MD: &str = "8=FIX4.4|9=0000208|35=W|49=sender-co|56=target-co|34=1|\
        52=20180610-16:35:00.246|55=Gold|268=2|269=0|270=1.1|272=20180610|\
        273=16:35:00.000|110=1|269=1|270=1.2|272=20180610|273=16:35:10.000|\
        110=2|10=100|";

    const ER: &str = "8=FIX4.4|9=0000100|35=8|49=s|56=t|34=2|\
        52=20180610-16:35:00.246|55=IBM|454=2|455=a|456=1|455=b|456=2|\
        11=ord-1|44=125.5|75=20180725|113=Y|10=094|";

    fn parse(text: &str) -> MsgView {
        let mut parser = AsciiParser::with_delimiter(fixtures::dict(), PIPE);
        parser.feed(text.as_bytes()).unwrap();
        parser.next_message().unwrap()
    }

    #[test]
    fn test_typed_tags_preserve_requested_order() {
        let view = parse(MD);
        let values = view.get_typed_tags(&[8u32, 9, 35, 49]);
        assert_eq!(
            values,
            vec![
                Value::String("FIX4.4".to_string()),
                Value::Int(208),
                Value::String("W".to_string()),
                Value::String("sender-co".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_tags_yield_null() {
        let view = parse(MD);
        assert_eq!(view.get_typed_tags(&[8u32, 11]), vec![
            Value::String("FIX4.4".to_string()),
            Value::Null,
        ]);
    }

    #[test]
    fn test_typed_names_preserve_requested_order() {
        let view = parse(MD);
        let values = view.get_typed_tags(&["MsgSeqNum", "Symbol", "ClOrdID", "SendingTime"]);
        let sent = NaiveDate::from_ymd_opt(2018, 6, 10)
            .unwrap()
            .and_hms_milli_opt(16, 35, 0, 246)
            .unwrap()
            .and_utc();
        assert_eq!(
            values,
            vec![
                Value::Int(1),
                Value::String("Gold".to_string()),
                Value::Null,
                Value::Timestamp(sent),
            ]
        );
    }

    #[test]
    fn test_get_string_by_name_or_tag() {
        let view = parse(ER);
        assert_eq!(view.get_string("ClOrdID"), Some("ord-1".to_string()));
        assert_eq!(view.get_string(11u32), Some("ord-1".to_string()));
        assert_eq!(view.get_string("Product"), None);
    }

    #[test]
    fn test_typed_getters() {
        let view = parse(ER);
        assert_eq!(
            view.get_typed("Price"),
            Some(Value::Float(Decimal::new(1255, 1)))
        );
        assert_eq!(
            view.get_typed("TradeDate"),
            Some(Value::Date(NaiveDate::from_ymd_opt(2018, 7, 25).unwrap()))
        );
        assert_eq!(view.get_typed("ReportToExch"), Some(Value::Bool(true)));
        let expected = NaiveDate::from_ymd_opt(2018, 6, 10)
            .unwrap()
            .and_hms_milli_opt(16, 35, 0, 246)
            .unwrap()
            .and_utc();
        assert_eq!(view.get_typed("SendingTime"), Some(Value::Timestamp(expected)));
    }

    #[test]
    fn test_group_view_and_instances() {
        let view = parse(MD);
        let group = view.get_view("NoMDEntries").unwrap();
        assert_eq!(group.group_count(), Some(2));

        let first = group.group_instance(0).unwrap();
        assert_eq!(
            first.get_typed("MDEntryPx"),
            Some(Value::Float(Decimal::new(11, 1)))
        );
        let second = group.group_instance(1).unwrap();
        assert_eq!(second.get_string("MDEntryType"), Some("1".to_string()));
        assert_eq!(
            second.get_typed("MDEntryTime"),
            Some(Value::Time(
                chrono::NaiveTime::from_hms_opt(16, 35, 10).unwrap()
            ))
        );
        assert!(group.group_instance(2).is_none());
    }

    #[test]
    fn test_group_instances_do_not_leak_into_each_other() {
        let view = parse(MD);
        let group = view.get_view("NoMDEntries").unwrap();
        let first = group.group_instance(0).unwrap();
        // both instances carry tag 110; each window sees only its own
        assert_eq!(first.get_typed("MinQty"), Some(Value::Float(Decimal::from(1))));
        let second = group.group_instance(1).unwrap();
        assert_eq!(second.get_typed("MinQty"), Some(Value::Float(Decimal::from(2))));
    }

    #[test]
    fn test_dotted_path_navigation() {
        let view = parse(ER);
        let alt = view.get_view("Instrument.NoSecurityAltID").unwrap();
        assert_eq!(alt.group_count(), Some(2));
        assert_eq!(
            alt.group_instance(1).unwrap().get_string("SecurityAltID"),
            Some("b".to_string())
        );
    }

    #[test]
    fn test_component_nesting_is_transparent() {
        let view = parse(ER);
        // the group resolves without naming the component that holds it
        let alt = view.get_view("NoSecurityAltID").unwrap();
        assert_eq!(alt.group_count(), Some(2));
        // simple fields buried in components resolve by name too
        assert_eq!(view.get_string("Symbol"), Some("IBM".to_string()));
    }

    #[test]
    fn test_component_view_window() {
        let view = parse(ER);
        let instrument = view.get_view("Instrument").unwrap();
        assert_eq!(instrument.set_name(), "Instrument");
        assert_eq!(instrument.get_string("Symbol"), Some("IBM".to_string()));
        // fields outside the window are invisible
        assert_eq!(instrument.get_string("ClOrdID"), None);
    }

    #[test]
    fn test_to_object_shape() {
        let object = parse(ER).to_object();
        assert_eq!(
            object.get("ClOrdID"),
            Some(&Value::String("ord-1".to_string()))
        );
        assert_eq!(
            object.get("StandardHeader").and_then(|h| h.get("MsgSeqNum")),
            Some(&Value::Int(2))
        );
        let alt_ids = object
            .get("Instrument")
            .and_then(|i| i.get("NoSecurityAltID"))
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(alt_ids.len(), 2);
        assert_eq!(
            alt_ids[1].get("SecurityAltID"),
            Some(&Value::String("b".to_string()))
        );
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let dict = fixtures::dict();
        let object = Value::record([
            (
                "StandardHeader",
                Value::record([
                    ("BeginString", "FIX4.4".into()),
                    ("BodyLength", "0000042".into()),
                    ("MsgType", "8".into()),
                    ("MsgSeqNum", 7.into()),
                ]),
            ),
            (
                "Instrument",
                Value::record([("Symbol", "Gold".into())]),
            ),
            (
                "NoPartyIDs",
                Value::array([Value::record([
                    ("PartyID", "acct-1".into()),
                    ("PartyRole", 28.into()),
                ])]),
            ),
            ("ClOrdID", "ord-9".into()),
            ("StandardTrailer", Value::record([("CheckSum", "000".into())])),
        ]);
        let mut encoder = AsciiEncoder::new(Arc::clone(&dict));
        encoder.encode("ExecutionReport", &object).unwrap();

        let mut parser = AsciiParser::with_delimiter(dict, PIPE);
        parser.feed(encoder.buffer().as_slice()).unwrap();
        let decoded = parser.next_message().unwrap().to_object();

        assert_eq!(decoded.get("ClOrdID"), object.get("ClOrdID"));
        let parties = decoded
            .get("NoPartyIDs")
            .and_then(Value::as_array)
            .unwrap();
        assert_eq!(parties[0].get("PartyID"), Some(&Value::String("acct-1".to_string())));
        assert_eq!(parties[0].get("PartyRole"), Some(&Value::Int(28)));
        assert_eq!(
            decoded.get("Instrument").and_then(|i| i.get("Symbol")),
            Some(&Value::String("Gold".to_string()))
        );
    }

    #[test]
    fn test_negative_int_and_full_precision_decimal_roundtrip() {
        let dict = fixtures::dict();
        let price = Decimal::from_str("123.12345678901234").unwrap();
        let object = Value::record([
            (
                "StandardHeader",
                Value::record([("MsgType", "8".into()), ("MsgSeqNum", (-42).into())]),
            ),
            ("Price", price.into()),
            ("StandardTrailer", Value::record([("CheckSum", "000".into())])),
        ]);
        let mut encoder = AsciiEncoder::new(Arc::clone(&dict));
        encoder.encode("ExecutionReport", &object).unwrap();

        let mut parser = AsciiParser::with_delimiter(dict, PIPE);
        parser.feed(encoder.buffer().as_slice()).unwrap();
        let view = parser.next_message().unwrap();
        assert_eq!(view.get_typed("MsgSeqNum"), Some(Value::Int(-42)));
        assert_eq!(view.get_typed("Price"), Some(Value::Float(price)));
    }

    #[test]
    fn test_clone_is_independent_of_parser() {
        let copy;
        {
            let mut parser = AsciiParser::with_delimiter(fixtures::dict(), PIPE);
            parser.feed(ER.as_bytes()).unwrap();
            let view = parser.next_message().unwrap();
            copy = view.clone();
        }
        assert_eq!(copy.get_string("ClOrdID"), Some("ord-1".to_string()));
        assert_eq!(copy.get_typed("ReportToExch"), Some(Value::Bool(true)));
    }

    #[test]
    fn test_display_renders_named_lines() {
        let rendered = parse(ER).to_string();
        assert!(rendered.contains("11 (ClOrdID) = ord-1"));
        assert!(rendered.contains("35 (MsgType) = 8"));
    }
}
