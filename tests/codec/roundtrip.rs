//! Round-trip tests for every kind

use crate::common::*;

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn scalars_roundtrip() {
    let codec = Codec::standard();
    let values = vec![
        Value::Null,
        Value::Bool(true),
        Value::Bool(false),
        Value::Int(0),
        Value::Int(i64::MAX),
        Value::Int(i64::MIN),
        Value::Float(3.25),
        Value::Float(f64::INFINITY),
        Value::Float(f64::NEG_INFINITY),
        Value::from(""),
        Value::from("日本語"),
        Value::Bytes(vec![]),
        Value::Bytes((0..=255).collect()),
    ];
    for v in values {
        assert_eq!(roundtrip(&codec, &v), v, "value {:?}", v);
    }
}

#[test]
fn special_floats_keep_their_bits() {
    let codec = Codec::standard();

    let back = roundtrip(&codec, &Value::Float(-0.0));
    assert_eq!(back.as_float().unwrap().to_bits(), (-0.0f64).to_bits());

    let nan = f64::from_bits(0x7ff8_0000_0000_beef);
    let back = roundtrip(&codec, &Value::Float(nan));
    assert_eq!(back.as_float().unwrap().to_bits(), nan.to_bits());
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn sequence_keeps_order() {
    let codec = Codec::standard();
    assert_eq!(roundtrip(&codec, &ints(&[1, 2, 3])), ints(&[1, 2, 3]));
}

#[test]
fn mapping_keeps_insertion_order() {
    let codec = Codec::standard();
    let value = map(vec![
        ("c", Value::Int(1)),
        ("a", Value::Int(2)),
        ("b", Value::Int(3)),
    ]);
    let back = roundtrip(&codec, &value);
    let keys: Vec<&str> = back
        .as_mapping()
        .unwrap()
        .keys()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}

#[test]
fn non_string_keys_roundtrip() {
    let codec = Codec::standard();
    let m = Mapping::from_entries(vec![
        (Value::Int(1), Value::from("int key")),
        (Value::Bool(true), Value::from("bool key")),
        (Value::Bytes(vec![1]), Value::from("bytes key")),
        (ints(&[1, 2]), Value::from("sequence key")),
        (Value::Null, Value::Null),
    ])
    .unwrap();
    let value = Value::Mapping(m);
    assert_eq!(roundtrip(&codec, &value), value);
}

#[test]
fn nested_document_roundtrips() {
    let codec = Codec::standard();
    let value = map(vec![
        ("name", Value::from("tagwire")),
        ("version", Value::Int(1)),
        (
            "targets",
            Value::Sequence(vec![
                map(vec![("os", Value::from("linux")), ("arch", Value::from("x86_64"))]),
                map(vec![("os", Value::from("macos")), ("arch", Value::from("aarch64"))]),
            ]),
        ),
        ("checksum", Value::Bytes(vec![0xca, 0xfe])),
        ("ratio", Value::Float(0.5)),
        ("stable", Value::Bool(false)),
        ("notes", Value::Null),
        ("empty", Value::Sequence(vec![])),
    ]);
    assert_eq!(roundtrip(&codec, &value), value);
}

#[test]
fn deep_nesting_within_limit() {
    let codec = Codec::standard();
    let mut value = Value::Int(0);
    for _ in 0..500 {
        value = Value::Sequence(vec![value]);
    }
    assert_eq!(roundtrip(&codec, &value), value);
}

#[test]
fn custom_tags_roundtrip() {
    let codec = int_string_mapping_codec();
    let value = map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
    assert_eq!(roundtrip(&codec, &value), value);
}

#[test]
fn user_codec_for_a_kind() {
    // Ints as 4-byte big-endian values
    fn encode_i32(value: &Value, out: &mut Vec<u8>) -> tagwire::CodecResult<()> {
        let i = value.as_int().ok_or(CodecError::KindMismatch {
            expected: ValueKind::Int,
            actual: value.kind(),
        })?;
        let narrow = i32::try_from(i).map_err(|_| CodecError::InvalidPayload {
            kind: ValueKind::Int,
            offset: None,
            reason: format!("{} does not fit in 4 bytes", i),
        })?;
        out.extend_from_slice(&narrow.to_be_bytes());
        Ok(())
    }
    fn decode_i32(payload: &[u8]) -> tagwire::CodecResult<Value> {
        let bytes: [u8; 4] = payload.try_into().map_err(|_| CodecError::InvalidPayload {
            kind: ValueKind::Int,
            offset: None,
            reason: "expected 4 bytes".to_string(),
        })?;
        Ok(Value::Int(i32::from_be_bytes(bytes) as i64))
    }

    let mut registry = TagRegistry::new();
    registry
        .register(
            ValueKind::Int,
            Tag(0x02),
            tagwire::KindCodec::Scalar {
                width: tagwire::Width::Fixed(4),
                encode: encode_i32,
                decode: decode_i32,
            },
        )
        .unwrap();
    let codec = Codec::builder().registry(registry).build();

    let bytes = codec.encode(&Value::Int(-3)).unwrap();
    assert_eq!(bytes, hex("02 fffffffd"));
    assert_eq!(codec.decode(&bytes).unwrap(), Value::Int(-3));

    let err = codec.encode(&Value::Int(i64::MAX)).unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
}
