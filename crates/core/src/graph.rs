//! Arena form for values with shared or cyclic references
//!
//! Some producers cannot hand over an owned tree directly: a loader that
//! resolves anchors and aliases, for example, ends up with several parents
//! pointing at one node, and possibly with a node that contains itself.
//! [`ValueGraph`] stores such structures as an arena of nodes that refer to
//! each other by [`NodeId`].
//!
//! The wire format has no back-references, so a graph is flattened into a
//! [`Value`] tree before encoding:
//! - shared (acyclic) nodes are expanded once per reference
//! - a reference to a node on the current path is a cycle and fails with
//!   [`CodecError::CyclicStructure`]
//!
//! Expanding shared nodes can grow a small graph exponentially, so
//! [`ValueGraph::resolve_with_limit`] caps the number of values produced.

use crate::error::{CodecError, Result};
use crate::mapping::Mapping;
use crate::value::{Value, ValueKind};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

/// Identifier of a node inside one [`ValueGraph`]
///
/// Ids carry the identity of the graph that issued them; another graph
/// rejects them with [`CodecError::UnknownNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    graph: u64,
    index: usize,
}

impl NodeId {
    /// Position of the node in its graph
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(Value),
    Sequence(Vec<NodeId>),
    Mapping(Vec<(NodeId, NodeId)>),
}

impl Node {
    fn kind(&self) -> ValueKind {
        match self {
            Node::Leaf(v) => v.kind(),
            Node::Sequence(_) => ValueKind::Sequence,
            Node::Mapping(_) => ValueKind::Mapping,
        }
    }
}

/// Arena of value nodes linked by id
///
/// A clone keeps the identity of its source, so ids stay valid in both.
#[derive(Debug, Clone)]
pub struct ValueGraph {
    id: u64,
    nodes: Vec<Node>,
}

impl Default for ValueGraph {
    fn default() -> Self {
        ValueGraph {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
        }
    }
}

impl ValueGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node holding an owned value
    ///
    /// The value may itself be a container; its children are owned and
    /// cannot refer to other graph nodes.
    pub fn leaf(&mut self, value: impl Into<Value>) -> NodeId {
        self.add(Node::Leaf(value.into()))
    }

    /// Add an empty sequence node
    pub fn sequence(&mut self) -> NodeId {
        self.add(Node::Sequence(Vec::new()))
    }

    /// Add an empty mapping node
    pub fn mapping(&mut self) -> NodeId {
        self.add(Node::Mapping(Vec::new()))
    }

    /// Append `child` to the sequence node `seq`
    pub fn push(&mut self, seq: NodeId, child: NodeId) -> Result<()> {
        self.check(child)?;
        match self.node_mut(seq)? {
            Node::Sequence(items) => {
                items.push(child);
                Ok(())
            }
            other => Err(CodecError::KindMismatch {
                expected: ValueKind::Sequence,
                actual: other.kind(),
            }),
        }
    }

    /// Append the entry `key -> value` to the mapping node `map`
    ///
    /// Key uniqueness is checked when the graph is resolved, since keys
    /// are only known once their nodes are expanded.
    pub fn insert(&mut self, map: NodeId, key: NodeId, value: NodeId) -> Result<()> {
        self.check(key)?;
        self.check(value)?;
        match self.node_mut(map)? {
            Node::Mapping(entries) => {
                entries.push((key, value));
                Ok(())
            }
            other => Err(CodecError::KindMismatch {
                expected: ValueKind::Mapping,
                actual: other.kind(),
            }),
        }
    }

    /// Kind of a node, if it exists
    pub fn kind(&self, id: NodeId) -> Option<ValueKind> {
        self.node(id).ok().map(Node::kind)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flatten the graph reachable from `root` into an owned tree
    ///
    /// # Errors
    ///
    /// - [`CodecError::CyclicStructure`] if a node is reachable from itself
    /// - [`CodecError::UnknownNode`] if `root` is not in this graph
    /// - [`CodecError::DuplicateKey`] if a mapping resolves two equal keys
    pub fn resolve(&self, root: NodeId) -> Result<Value> {
        self.resolve_with_limit(root, usize::MAX)
    }

    /// Flatten the graph like [`resolve`](Self::resolve), producing at most
    /// `max_values` values
    ///
    /// Every value of the result counts, including those nested inside
    /// leaf nodes. Fails with [`CodecError::LimitExceeded`] as soon as the
    /// budget is spent, before the oversized tree is built.
    pub fn resolve_with_limit(&self, root: NodeId, max_values: usize) -> Result<Value> {
        let mut on_path = vec![false; self.nodes.len()];
        let mut stack: Vec<Frame> = Vec::new();
        let mut current = root;
        let mut produced: usize = 0;

        loop {
            let node = self.node(current)?;
            if on_path[current.index] {
                return Err(CodecError::CyclicStructure {
                    node: current.index,
                });
            }

            let weight = match node {
                Node::Leaf(v) => value_count(v),
                _ => 1,
            };
            produced = produced.saturating_add(weight);
            if produced > max_values {
                return Err(CodecError::LimitExceeded {
                    limit: "graph values",
                    max: max_values,
                    actual: produced,
                });
            }

            let mut done = match node {
                Node::Leaf(v) => v.clone(),
                Node::Sequence(items) if items.is_empty() => Value::Sequence(Vec::new()),
                Node::Mapping(entries) if entries.is_empty() => Value::Mapping(Mapping::new()),
                Node::Sequence(items) => {
                    on_path[current.index] = true;
                    stack.push(Frame::new(current, ValueKind::Sequence, items.clone()));
                    current = items[0];
                    continue;
                }
                Node::Mapping(entries) => {
                    on_path[current.index] = true;
                    let children: Vec<NodeId> =
                        entries.iter().flat_map(|(k, v)| [*k, *v]).collect();
                    let first = children[0];
                    stack.push(Frame::new(current, ValueKind::Mapping, children));
                    current = first;
                    continue;
                }
            };

            // Hand finished values up until a frame still has children to visit.
            loop {
                if let Some(frame) = stack.last_mut() {
                    if frame.values.len() + 1 < frame.children.len() {
                        frame.values.push(done);
                        current = frame.children[frame.values.len()];
                        break;
                    }
                }
                let Some(mut frame) = stack.pop() else {
                    return Ok(done);
                };
                frame.values.push(done);
                on_path[frame.id.index] = false;
                done = frame.finish()?;
            }
        }
    }

    fn add(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId {
            graph: self.id,
            index: self.nodes.len() - 1,
        }
    }

    fn check(&self, id: NodeId) -> Result<()> {
        self.node(id).map(|_| ())
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        if id.graph != self.id {
            return Err(CodecError::UnknownNode { node: id.index });
        }
        self.nodes
            .get(id.index)
            .ok_or(CodecError::UnknownNode { node: id.index })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        if id.graph != self.id {
            return Err(CodecError::UnknownNode { node: id.index });
        }
        self.nodes
            .get_mut(id.index)
            .ok_or(CodecError::UnknownNode { node: id.index })
    }
}

/// Number of values in an owned tree, the root included
fn value_count(value: &Value) -> usize {
    let mut count = 0usize;
    let mut pending = vec![value];
    while let Some(v) = pending.pop() {
        count = count.saturating_add(1);
        match v {
            Value::Sequence(items) => pending.extend(items),
            Value::Mapping(m) => {
                for (k, v) in m.iter() {
                    pending.push(k);
                    pending.push(v);
                }
            }
            _ => {}
        }
    }
    count
}

struct Frame {
    id: NodeId,
    kind: ValueKind,
    children: Vec<NodeId>,
    values: Vec<Value>,
}

impl Frame {
    fn new(id: NodeId, kind: ValueKind, children: Vec<NodeId>) -> Self {
        let values = Vec::with_capacity(children.len());
        Frame {
            id,
            kind,
            children,
            values,
        }
    }

    fn finish(self) -> Result<Value> {
        match self.kind {
            ValueKind::Mapping => {
                let mut values = self.values.into_iter();
                let mut mapping = Mapping::with_capacity(self.children.len() / 2);
                while let (Some(k), Some(v)) = (values.next(), values.next()) {
                    mapping.insert(k, v)?;
                }
                Ok(Value::Mapping(mapping))
            }
            _ => Ok(Value::Sequence(self.values)),
        }
    }
}
