//! FIX 4.4 order round-trip: encode, frame, parse back.
//!
//! Shows the session-layer framing flow: encode with a body-length
//! placeholder, patch the real length and append the checksum using the
//! encoder's fixed offsets, then feed the framed bytes back through the
//! streaming parser.

use std::sync::Arc;
use tracing::info;
use wirefix::prelude::*;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

const BODY_LENGTH_WIDTH: usize = 7;

fn load_dictionary() -> Dictionary {
    let mut dict = Dictionary::new();
    let defs = [
        (8, "BeginString", FieldType::String),
        (9, "BodyLength", FieldType::Length),
        (35, "MsgType", FieldType::String),
        (49, "SenderCompID", FieldType::String),
        (56, "TargetCompID", FieldType::String),
        (34, "MsgSeqNum", FieldType::Int),
        (52, "SendingTime", FieldType::UtcTimestamp),
        (11, "ClOrdID", FieldType::String),
        (55, "Symbol", FieldType::String),
        (54, "Side", FieldType::String),
        (38, "OrderQty", FieldType::Float),
        (44, "Price", FieldType::Float),
        (10, "CheckSum", FieldType::String),
    ];
    for (tag, name, field_type) in defs {
        dict.add_field(FieldDef::new(tag, name, field_type));
    }

    let mut header = FieldSet::new("StandardHeader");
    for tag in [8, 9, 35, 49, 56, 34, 52] {
        header.add_simple(Arc::clone(dict.field(tag).expect("header field")));
    }
    let header = Arc::new(header);

    let mut trailer = FieldSet::new("StandardTrailer");
    trailer.add_simple(Arc::clone(dict.field(10).expect("trailer field")));
    let trailer = Arc::new(trailer);

    let mut order = FieldSet::new("NewOrderSingle");
    order.add_component(Arc::clone(&header));
    for tag in [11, 55, 54, 38, 44] {
        order.add_simple(Arc::clone(dict.field(tag).expect("body field")));
    }
    order.add_component(trailer);
    dict.add_message("D", Arc::new(order));
    dict
}

fn main() -> Result<()> {
    init_logging();
    let dictionary = Arc::new(load_dictionary());

    let order = Value::record([
        (
            "StandardHeader",
            Value::record([
                ("BeginString", "FIX.4.4".into()),
                // fixed-width placeholder, patched after encoding
                ("BodyLength", "0".repeat(BODY_LENGTH_WIDTH).into()),
                ("MsgType", "D".into()),
                ("SenderCompID", "BUY-SIDE".into()),
                ("TargetCompID", "SELL-SIDE".into()),
                ("MsgSeqNum", 1.into()),
                ("SendingTime", chrono::Utc::now().into()),
            ]),
        ),
        ("ClOrdID", "Order-1".into()),
        ("Symbol", "IBM".into()),
        ("Side", "1".into()),
        ("OrderQty", 100.into()),
        ("Price", "125.50".into()),
    ]);

    let mut encoder = AsciiEncoder::new(Arc::clone(&dictionary));
    encoder.encode("NewOrderSingle", &order)?;
    info!("log form: {}", String::from_utf8_lossy(encoder.buffer().as_slice()));

    let mut wire = encoder.trim();
    let length_pos = encoder.body_length_pos().expect("tag 9 was encoded");

    // body length covers everything after the body-length field's
    // delimiter up to the start of the checksum field
    let body_start = length_pos + BODY_LENGTH_WIDTH + 1;
    let body_len = wire.len() - body_start;
    let digits = format!("{:0width$}", body_len, width = BODY_LENGTH_WIDTH);
    wire[length_pos..length_pos + BODY_LENGTH_WIDTH].copy_from_slice(digits.as_bytes());

    let checksum = calculate_checksum(&wire);
    wire.extend_from_slice(b"10=");
    wire.extend_from_slice(&format_checksum(checksum));
    wire.extend_from_slice(&[SOH]);

    let mut parser = AsciiParser::new(Arc::clone(&dictionary)).with_checksum_validation(true);
    parser.feed(&wire).map_err(FixError::Decode)?;
    let view = parser.next_message().expect("one complete message");

    info!("parsed {} fields from {}", view.field_count(), view.set_name());
    info!(
        "ClOrdID={:?} Price={:?}",
        view.get_string("ClOrdID"),
        view.get_typed("Price")
    );
    info!("\n{view}");
    Ok(())
}
