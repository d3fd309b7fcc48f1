//! Generated-tree properties

use crate::common::{Codec, Mapping, Tag, TagRegistry, Value, ValueKind};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(|bits| Value::Float(f64::from_bits(bits))),
        ".{0,12}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Sequence),
            prop::collection::vec((inner.clone(), inner), 0..6).prop_map(|entries| {
                // Keep the first occurrence of each key
                let mut m = Mapping::new();
                for (k, v) in entries {
                    let _ = m.insert(k, v);
                }
                Value::Mapping(m)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn roundtrip_is_identity(value in tree()) {
        let codec = Codec::standard();
        let bytes = codec.encode(&value).unwrap();
        prop_assert_eq!(codec.decode(&bytes).unwrap(), value);
    }

    #[test]
    fn proper_prefixes_are_truncated(value in tree(), cut in any::<prop::sample::Index>()) {
        let codec = Codec::standard();
        let bytes = codec.encode(&value).unwrap();
        let end = cut.index(bytes.len());
        let err = codec.decode(&bytes[..end]).unwrap_err();
        prop_assert!(err.is_incomplete(), "prefix {} of {}: {}", end, bytes.len(), err);
    }

    #[test]
    fn concatenation_decodes_in_order(values in prop::collection::vec(tree(), 0..5)) {
        let codec = Codec::standard();
        let mut bytes = Vec::new();
        for v in &values {
            codec.encode_into(v, &mut bytes).unwrap();
        }
        let decoded: Vec<Value> = codec
            .decode_stream(&bytes)
            .unwrap()
            .collect::<tagwire::Result<_>>()
            .unwrap();
        prop_assert_eq!(decoded, values);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let codec = Codec::standard();
        let _ = codec.decode(&bytes);
        let _ = codec.dump(&bytes);
    }

    #[test]
    fn retagging_preserves_roundtrip(value in tree(), offset in 8u8..200) {
        let assignment: Vec<(ValueKind, Tag)> = ValueKind::ALL
            .iter()
            .map(|k| (*k, Tag(offset + k.index() as u8)))
            .collect();
        let registry = TagRegistry::with_tags(&assignment).unwrap();
        let codec = Codec::builder().registry(registry).build();

        let bytes = codec.encode(&value).unwrap();
        prop_assert_eq!(codec.decode(&bytes).unwrap(), value);
    }
}
