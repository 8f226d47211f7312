/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Shared FIX 4.4 subset dictionary for the codec test suites.

use std::sync::Arc;
use wirefix_dictionary::{Dictionary, FieldDef, FieldSet, FieldType};

/// Builds a small FIX 4.4 subset: header/trailer components, an Instrument
/// component with a nested alternate-ID group, a party group, raw encoded
/// text, and a market-data entry group.
pub fn dict() -> Arc<Dictionary> {
    let mut dict = Dictionary::new();
    let defs: &[(u32, &str, FieldType)] = &[
        (8, "BeginString", FieldType::String),
        (9, "BodyLength", FieldType::Length),
        (35, "MsgType", FieldType::String),
        (49, "SenderCompID", FieldType::String),
        (56, "TargetCompID", FieldType::String),
        (34, "MsgSeqNum", FieldType::Int),
        (52, "SendingTime", FieldType::UtcTimestamp),
        (10, "CheckSum", FieldType::String),
        (11, "ClOrdID", FieldType::String),
        (44, "Price", FieldType::Float),
        (75, "TradeDate", FieldType::LocalDate),
        (126, "ExpireTime", FieldType::UtcTimestamp),
        (113, "ReportToExch", FieldType::Boolean),
        (354, "EncodedTextLen", FieldType::Length),
        (355, "EncodedText", FieldType::Data),
        (453, "NoPartyIDs", FieldType::Int),
        (448, "PartyID", FieldType::String),
        (447, "PartyIDSource", FieldType::String),
        (452, "PartyRole", FieldType::Int),
        (55, "Symbol", FieldType::String),
        (65, "SymbolSfx", FieldType::String),
        (48, "SecurityID", FieldType::String),
        (22, "SecurityIDSource", FieldType::String),
        (460, "Product", FieldType::Int),
        (454, "NoSecurityAltID", FieldType::Int),
        (455, "SecurityAltID", FieldType::String),
        (456, "SecurityAltIDSource", FieldType::String),
        (268, "NoMDEntries", FieldType::Int),
        (269, "MDEntryType", FieldType::String),
        (270, "MDEntryPx", FieldType::Float),
        (272, "MDEntryDate", FieldType::UtcDateOnly),
        (273, "MDEntryTime", FieldType::UtcTimeOnly),
        (110, "MinQty", FieldType::Float),
    ];
    for &(tag, name, field_type) in defs {
        dict.add_field(FieldDef::new(tag, name, field_type));
    }
    let field = |dict: &Dictionary, tag: u32| Arc::clone(dict.field(tag).unwrap());

    let mut header = FieldSet::new("StandardHeader");
    for tag in [8, 9, 35, 49, 56, 34, 52] {
        header.add_simple(field(&dict, tag));
    }
    let header = Arc::new(header);

    let mut trailer = FieldSet::new("StandardTrailer");
    trailer.add_simple(field(&dict, 10));
    let trailer = Arc::new(trailer);

    let mut alt_ids = FieldSet::new("SecAltIDGrp");
    alt_ids.add_simple(field(&dict, 455));
    alt_ids.add_simple(field(&dict, 456));

    let mut instrument = FieldSet::new("Instrument");
    instrument.add_simple(field(&dict, 55));
    instrument.add_simple(field(&dict, 65));
    instrument.add_group(field(&dict, 454), Arc::new(alt_ids));
    instrument.add_simple(field(&dict, 48));
    instrument.add_simple(field(&dict, 22));
    instrument.add_simple(field(&dict, 460));
    let instrument = Arc::new(instrument);
    dict.add_component(Arc::clone(&instrument));

    let mut parties = FieldSet::new("Parties");
    parties.add_simple(field(&dict, 448));
    parties.add_simple(field(&dict, 447));
    parties.add_simple(field(&dict, 452));
    let parties = Arc::new(parties);

    let mut md_entries = FieldSet::new("MDFullGrp");
    for tag in [269, 270, 272, 273, 110] {
        md_entries.add_simple(field(&dict, tag));
    }
    let md_entries = Arc::new(md_entries);

    let mut exec = FieldSet::new("ExecutionReport");
    exec.add_component(Arc::clone(&header));
    exec.add_component(Arc::clone(&instrument));
    exec.add_group(field(&dict, 453), parties);
    for tag in [11, 44, 75, 126, 113, 354, 355] {
        exec.add_simple(field(&dict, tag));
    }
    exec.add_component(Arc::clone(&trailer));
    dict.add_message("8", Arc::new(exec));

    let mut snapshot = FieldSet::new("MarketDataSnapshotFullRefresh");
    snapshot.add_component(header);
    snapshot.add_component(instrument);
    snapshot.add_group(field(&dict, 268), md_entries);
    snapshot.add_component(trailer);
    dict.add_message("W", Arc::new(snapshot));

    Arc::new(dict)
}
