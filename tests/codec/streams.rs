//! Multiple values in one buffer

use crate::common::*;

fn concatenated(codec: &Codec, values: &[Value]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in values {
        codec.encode_into(v, &mut out).unwrap();
    }
    out
}

#[test]
fn decode_at_walks_the_buffer() {
    let codec = Codec::standard();
    let values = vec![Value::from("first"), ints(&[1, 2]), Value::Null];
    let bytes = concatenated(&codec, &values);

    let mut cursor = 0;
    let mut decoded = Vec::new();
    while cursor < bytes.len() {
        let (value, next) = codec.decode_at(&bytes, cursor).unwrap();
        assert!(next > cursor);
        decoded.push(value);
        cursor = next;
    }
    assert_eq!(decoded, values);
    assert_eq!(cursor, bytes.len());
}

#[test]
fn cursor_lands_on_value_boundaries() {
    let codec = Codec::standard();
    let first = codec.encode(&Value::Int(1)).unwrap();
    let second = codec.encode(&Value::from("two")).unwrap();
    let mut bytes = first.clone();
    bytes.extend_from_slice(&second);

    let (_, end) = codec.decode_at(&bytes, 0).unwrap();
    assert_eq!(end, first.len());
    let (_, end) = codec.decode_at(&bytes, end).unwrap();
    assert_eq!(end, first.len() + second.len());
}

#[test]
fn decode_stream_collects_in_order() {
    let codec = Codec::standard();
    let values: Vec<Value> = (0..10).map(Value::Int).collect();
    let bytes = concatenated(&codec, &values);

    let decoded: Vec<Value> = codec
        .decode_stream(&bytes)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(decoded, values);
}

#[test]
fn decode_stream_ends_with_the_error() {
    let codec = Codec::standard();
    let mut bytes = concatenated(&codec, &[Value::Bool(true), Value::Bool(false)]);
    bytes.push(0x04); // String tag with no length

    let results: Vec<_> = codec.decode_stream(&bytes).unwrap().collect();
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(results[2].as_ref().unwrap_err().is_incomplete());
}

#[test]
fn empty_buffer_is_an_empty_stream() {
    let codec = Codec::standard();
    assert_eq!(codec.decode_stream(&[]).unwrap().count(), 0);
}

#[test]
fn decode_at_past_the_end() {
    let codec = Codec::standard();
    let err = codec.decode_at(&[0x00], 5).unwrap_err();
    assert!(err.is_incomplete());
}
