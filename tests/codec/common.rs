//! Shared helpers for codec tests

pub use tagwire::prelude::*;
pub use tagwire::{CodecError, ErrorClass};

/// Build a mapping from string keys, panicking on duplicates
pub fn map(entries: Vec<(&str, Value)>) -> Value {
    let mut m = Mapping::new();
    for (k, v) in entries {
        m.insert(Value::from(k), v).unwrap();
    }
    Value::Mapping(m)
}

/// Sequence of ints
pub fn ints(values: &[i64]) -> Value {
    Value::Sequence(values.iter().map(|i| Value::Int(*i)).collect())
}

/// Route codec logs to the test output; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Encode then decode with the same codec
pub fn roundtrip(codec: &Codec, value: &Value) -> Value {
    init_tracing();
    let bytes = codec.encode(value).unwrap();
    codec.decode(&bytes).unwrap()
}

/// Parse a hex string with optional spaces
pub fn hex(text: &str) -> Vec<u8> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    digits
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
        .collect()
}

/// Codec whose registry binds only Int, String and Mapping
pub fn int_string_mapping_codec() -> Codec {
    let registry = TagRegistry::with_tags(&[
        (ValueKind::Int, Tag(0x02)),
        (ValueKind::String, Tag(0x04)),
        (ValueKind::Mapping, Tag(0x06)),
    ])
    .unwrap();
    Codec::builder().registry(registry).build()
}
