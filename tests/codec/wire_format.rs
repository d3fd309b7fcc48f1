//! Bit-exact layout tests

use crate::common::*;

#[test]
fn mapping_with_one_int_entry() {
    let codec = int_string_mapping_codec();
    let value = map(vec![("a", Value::Int(1))]);

    let bytes = codec.encode(&value).unwrap();
    assert_eq!(bytes, hex("06 00000001 04 00000001 61 02 0000000000000001"));
    assert_eq!(codec.decode(&bytes).unwrap(), value);
}

#[test]
fn encoding_is_deterministic() {
    let codec = Codec::standard();
    let value = map(vec![
        ("z", ints(&[3, 2, 1])),
        ("a", Value::Bytes(vec![9; 4])),
    ]);
    assert_eq!(codec.encode(&value).unwrap(), codec.encode(&value).unwrap());
}

#[test]
fn mapping_order_is_insertion_order() {
    let codec = Codec::standard();
    let forward = map(vec![("x", Value::Null), ("y", Value::Null)]);
    let backward = map(vec![("y", Value::Null), ("x", Value::Null)]);

    // Equal as mappings, distinct on the wire
    assert_eq!(forward, backward);
    assert_ne!(codec.encode(&forward).unwrap(), codec.encode(&backward).unwrap());
}

#[test]
fn scalar_layouts() {
    let codec = Codec::standard();
    assert_eq!(codec.encode(&Value::Null).unwrap(), hex("00"));
    assert_eq!(codec.encode(&Value::Bool(false)).unwrap(), hex("01 00"));
    assert_eq!(
        codec.encode(&Value::Int(-2)).unwrap(),
        hex("02 fffffffffffffffe")
    );
    assert_eq!(
        codec.encode(&Value::Float(1.0)).unwrap(),
        hex("03 3ff0000000000000")
    );
    assert_eq!(
        codec.encode(&Value::from("ab")).unwrap(),
        hex("04 00000002 6162")
    );
    assert_eq!(
        codec.encode(&Value::Bytes(vec![0xde, 0xad])).unwrap(),
        hex("05 00000002 dead")
    );
}

#[test]
fn sequence_layout() {
    let codec = Codec::standard();
    assert_eq!(
        codec.encode(&ints(&[1, 2])).unwrap(),
        hex("07 00000002 02 0000000000000001 02 0000000000000002")
    );
    assert_eq!(codec.encode(&Value::Sequence(vec![])).unwrap(), hex("07 00000000"));
}

#[test]
fn retagged_registry_changes_only_tags() {
    let standard = Codec::standard();
    let registry = TagRegistry::with_tags(&[
        (ValueKind::Int, Tag(0x20)),
        (ValueKind::Sequence, Tag(0x70)),
    ])
    .unwrap();
    let custom = Codec::builder().registry(registry).build();

    let value = ints(&[5]);
    let a = standard.encode(&value).unwrap();
    let b = custom.encode(&value).unwrap();

    assert_eq!(a.len(), b.len());
    assert_eq!(b[0], 0x70);
    assert_eq!(b[5], 0x20);
    assert_eq!(a[1..5], b[1..5]);
    assert_eq!(a[6..], b[6..]);
    assert_eq!(custom.decode(&b).unwrap(), value);
}

#[test]
fn dump_lists_every_node() {
    let codec = Codec::standard();
    let bytes = codec.encode(&map(vec![("k", ints(&[7]))])).unwrap();
    let text = codec.dump(&bytes).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("Mapping entries=1"));
    assert!(lines[1].contains("String \"k\""));
    assert!(lines[2].contains("Sequence entries=1"));
    assert!(lines[3].contains("Int 7"));
}
