//! Limits loaded from configuration

use crate::common::*;

#[test]
fn options_from_json_config() {
    let config = r#"{ "max_depth": 2, "max_entries": 3 }"#;
    let options: CodecOptions = serde_json::from_str(config).unwrap();
    assert_eq!(options.max_depth, 2);
    assert_eq!(options.max_entries, 3);
    assert_eq!(
        options.max_payload_len,
        CodecOptions::default().max_payload_len
    );

    let codec = Codec::builder().options(options).build();
    assert!(codec.encode(&ints(&[1, 2, 3])).is_ok());
    assert!(codec.encode(&ints(&[1, 2, 3, 4])).is_err());
    assert_eq!(codec.options(), &options);
}

#[test]
fn options_serialize_all_fields() {
    let json = serde_json::to_value(CodecOptions::strict()).unwrap();
    assert_eq!(json["max_depth"], 64);
    assert_eq!(json["max_payload_len"], 1024 * 1024);
    assert_eq!(json["max_entries"], 64 * 1024);
    assert_eq!(json["max_graph_values"], 64 * 1024);
}

#[test]
fn unbounded_accepts_what_default_rejects() {
    init_tracing();
    let mut value = Value::Null;
    for _ in 0..600 {
        value = Value::Sequence(vec![value]);
    }

    assert!(Codec::standard().encode(&value).is_err());
    let unbounded = Codec::builder().options(CodecOptions::unbounded()).build();
    let bytes = unbounded.encode(&value).unwrap();
    assert_eq!(unbounded.decode(&bytes).unwrap(), value);
}
