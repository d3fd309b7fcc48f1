//! Value tree to bytes
//!
//! Nodes are written depth-first in pre-order: a node's tag, then its
//! payload, then (for containers) its children. Traversal uses an explicit
//! work stack, so nesting depth is bounded only by [`CodecOptions`].

use crate::options::CodecOptions;
use crate::registry::{KindCodec, TagRegistry, Width};
use byteorder::{BigEndian, ByteOrder};
use tagwire_core::{CodecError, NodeId, Result, Value, ValueGraph};
use tracing::trace;

/// Serializes values with a sealed registry
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'r> {
    registry: &'r TagRegistry,
    options: CodecOptions,
}

impl<'r> Encoder<'r> {
    /// Create an encoder with default limits
    ///
    /// Fails with [`CodecError::RegistryNotSealed`] for an unsealed registry.
    pub fn new(registry: &'r TagRegistry) -> Result<Self> {
        Self::with_options(registry, CodecOptions::default())
    }

    /// Create an encoder with explicit limits
    pub fn with_options(registry: &'r TagRegistry, options: CodecOptions) -> Result<Self> {
        registry.ensure_sealed()?;
        Ok(Encoder { registry, options })
    }

    /// Limits in effect
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode one value into a new buffer
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(value, &mut out)?;
        Ok(out)
    }

    /// Append one encoded value to `out`, returning the bytes written
    ///
    /// On error `out` is truncated back to its original length.
    pub fn encode_into(&self, value: &Value, out: &mut Vec<u8>) -> Result<usize> {
        let start = out.len();
        match self.write(value, out) {
            Ok(()) => {
                let written = out.len() - start;
                trace!(kind = %value.kind(), bytes = written, "Encoded value");
                Ok(written)
            }
            Err(e) => {
                out.truncate(start);
                Err(e)
            }
        }
    }

    /// Flatten a graph from `root` and encode the result
    ///
    /// Fails with [`CodecError::CyclicStructure`] if `root` reaches a cycle,
    /// and with [`CodecError::LimitExceeded`] if flattening would produce
    /// more than `max_graph_values` values.
    pub fn encode_graph(&self, graph: &ValueGraph, root: NodeId) -> Result<Vec<u8>> {
        let value = graph.resolve_with_limit(root, self.options.max_graph_values)?;
        self.encode(&value)
    }

    fn write(&self, root: &Value, out: &mut Vec<u8>) -> Result<()> {
        // (node, number of enclosing containers)
        let mut pending: Vec<(&Value, usize)> = vec![(root, 0)];

        while let Some((node, depth)) = pending.pop() {
            let entry = self.registry.lookup_by_kind(node.kind())?;
            out.push(entry.tag.byte());

            match entry.codec {
                KindCodec::Scalar {
                    width: Width::Fixed(width),
                    encode,
                    ..
                } => {
                    let before = out.len();
                    encode(node, out)?;
                    let written = out.len() - before;
                    if written != width {
                        return Err(CodecError::InvalidPayload {
                            kind: entry.kind,
                            offset: Some(before),
                            reason: format!("wrote {} bytes for fixed width {}", written, width),
                        });
                    }
                }
                KindCodec::Scalar {
                    width: Width::Prefixed,
                    encode,
                    ..
                } => {
                    let len_at = out.len();
                    out.extend_from_slice(&[0u8; 4]);
                    encode(node, out)?;
                    let len = out.len() - len_at - 4;
                    self.options.check_payload_len(len)?;
                    BigEndian::write_u32(&mut out[len_at..len_at + 4], length_field(len)?);
                }
                KindCodec::Container { arity, split, .. } => {
                    let depth = depth + 1;
                    self.options.check_depth(depth)?;

                    let children = split(node)?;
                    if children.len() % arity != 0 {
                        return Err(CodecError::InvalidPayload {
                            kind: entry.kind,
                            offset: None,
                            reason: format!(
                                "{} children for arity {}",
                                children.len(),
                                arity
                            ),
                        });
                    }
                    let count = children.len() / arity;
                    self.options.check_entries(count)?;

                    let mut buf = [0u8; 4];
                    BigEndian::write_u32(&mut buf, length_field(count)?);
                    out.extend_from_slice(&buf);

                    // Reversed so the first child is popped next.
                    pending.extend(children.into_iter().rev().map(|c| (c, depth)));
                }
            }
        }
        Ok(())
    }
}

fn length_field(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| CodecError::LengthOverflow { len })
}
