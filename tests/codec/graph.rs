//! Graph flattening and cycle detection

use crate::common::*;

#[test]
fn shared_node_is_written_once_per_reference() {
    let codec = Codec::standard();
    let mut g = ValueGraph::new();

    let defaults = g.mapping();
    let key = g.leaf("retries");
    let three = g.leaf(3i64);
    g.insert(defaults, key, three).unwrap();

    let root = g.mapping();
    let dev = g.leaf("dev");
    let prod = g.leaf("prod");
    g.insert(root, dev, defaults).unwrap();
    g.insert(root, prod, defaults).unwrap();

    let bytes = codec.encode_graph(&g, root).unwrap();
    let expected = map(vec![
        ("dev", map(vec![("retries", Value::Int(3))])),
        ("prod", map(vec![("retries", Value::Int(3))])),
    ]);
    assert_eq!(codec.decode(&bytes).unwrap(), expected);
}

#[test]
fn self_reference_is_cyclic() {
    let codec = Codec::standard();
    let mut g = ValueGraph::new();
    let root = g.mapping();
    let key = g.leaf("self");
    g.insert(root, key, root).unwrap();

    let err = codec.encode_graph(&g, root).unwrap_err();
    assert!(matches!(err, Error::CyclicStructure(_)));
    assert_eq!(err.class(), ErrorClass::CyclicStructure);
}

#[test]
fn long_cycle_is_cyclic() {
    let codec = Codec::standard();
    let mut g = ValueGraph::new();
    let nodes: Vec<NodeId> = (0..50).map(|_| g.sequence()).collect();
    for pair in nodes.windows(2) {
        g.push(pair[0], pair[1]).unwrap();
    }
    g.push(nodes[49], nodes[0]).unwrap();

    let err = codec.encode_graph(&g, nodes[10]).unwrap_err();
    assert!(matches!(err, Error::CyclicStructure(_)));
}

#[test]
fn diamond_is_not_a_cycle() {
    let codec = Codec::standard();
    let mut g = ValueGraph::new();
    let bottom = g.leaf(Value::Bytes(vec![1]));
    let left = g.sequence();
    let right = g.sequence();
    let top = g.sequence();
    g.push(left, bottom).unwrap();
    g.push(right, bottom).unwrap();
    g.push(top, left).unwrap();
    g.push(top, right).unwrap();

    let bytes = codec.encode_graph(&g, top).unwrap();
    let leaf = Value::Sequence(vec![Value::Bytes(vec![1])]);
    assert_eq!(
        codec.decode(&bytes).unwrap(),
        Value::Sequence(vec![leaf.clone(), leaf])
    );
}

#[test]
fn acyclic_subgraph_of_cyclic_graph_encodes() {
    let codec = Codec::standard();
    let mut g = ValueGraph::new();
    let looped = g.sequence();
    g.push(looped, looped).unwrap();
    let fine = g.sequence();
    let one = g.leaf(1i64);
    g.push(fine, one).unwrap();

    assert!(codec.encode_graph(&g, looped).is_err());
    let bytes = codec.encode_graph(&g, fine).unwrap();
    assert_eq!(codec.decode(&bytes).unwrap(), ints(&[1]));
}

#[test]
fn alias_expansion_is_bounded_by_options() {
    init_tracing();
    // Each level holds two references to the level below.
    let mut g = ValueGraph::new();
    let mut below = g.leaf(Value::Bytes(vec![0; 16]));
    for _ in 0..30 {
        let level = g.sequence();
        g.push(level, below).unwrap();
        g.push(level, below).unwrap();
        below = level;
    }
    assert_eq!(g.len(), 31);

    let strict = Codec::builder().options(CodecOptions::strict()).build();
    let err = strict.encode_graph(&g, below).unwrap_err();
    assert!(matches!(err, Error::LimitExceeded(_)));
    assert_eq!(err.class(), ErrorClass::LimitExceeded);
}

#[test]
fn graph_value_limit_is_configurable() {
    let mut g = ValueGraph::new();
    let root = g.sequence();
    let one = g.leaf(1i64);
    for _ in 0..3 {
        g.push(root, one).unwrap();
    }

    let tight = Codec::builder()
        .options(CodecOptions::default().with_max_graph_values(3))
        .build();
    assert!(tight.encode_graph(&g, root).is_err());

    let enough = Codec::builder()
        .options(CodecOptions::default().with_max_graph_values(4))
        .build();
    let bytes = enough.encode_graph(&g, root).unwrap();
    assert_eq!(enough.decode(&bytes).unwrap(), ints(&[1, 1, 1]));
}
