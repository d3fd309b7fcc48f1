//! Main entry point for tagwire.
//!
//! [`Codec`] bundles a sealed registry with codec limits so callers do not
//! have to thread both through every call.

use crate::error::Result;
use std::sync::Arc;
use tagwire_core::{NodeId, Value, ValueGraph};
use tagwire_wire::{CodecOptions, Decoder, Encoder, TagRegistry};
use tracing::debug;

/// Encoder and decoder over one shared registry.
///
/// Cloning is cheap; clones share the registry.
///
/// # Example
///
/// ```
/// use tagwire::prelude::*;
///
/// let codec = Codec::standard();
/// let value = Value::Sequence(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
///
/// let bytes = codec.encode(&value)?;
/// assert_eq!(codec.decode(&bytes)?, value);
/// # Ok::<(), tagwire::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Codec {
    registry: Arc<TagRegistry>,
    options: CodecOptions,
}

impl Codec {
    /// Codec over the standard registry with default limits.
    pub fn standard() -> Self {
        Self::builder().build()
    }

    /// Create a builder for a custom registry or limits.
    ///
    /// # Example
    ///
    /// ```
    /// use tagwire::prelude::*;
    ///
    /// let registry = TagRegistry::with_tags(&[
    ///     (ValueKind::Int, Tag(0x02)),
    ///     (ValueKind::String, Tag(0x04)),
    ///     (ValueKind::Mapping, Tag(0x06)),
    /// ])?;
    /// let codec = Codec::builder()
    ///     .registry(registry)
    ///     .options(CodecOptions::strict())
    ///     .build();
    /// # Ok::<(), tagwire::Error>(())
    /// ```
    pub fn builder() -> CodecBuilder {
        CodecBuilder::new()
    }

    /// The sealed registry in use.
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// The limits in use.
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode one value.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(self.encoder()?.encode(value)?)
    }

    /// Append one encoded value to `out`, returning the bytes written.
    ///
    /// On error `out` keeps its original contents.
    pub fn encode_into(&self, value: &Value, out: &mut Vec<u8>) -> Result<usize> {
        Ok(self.encoder()?.encode_into(value, out)?)
    }

    /// Flatten a graph from `root` and encode it.
    ///
    /// Fails with [`Error::CyclicStructure`](crate::Error::CyclicStructure)
    /// when `root` reaches a cycle.
    pub fn encode_graph(&self, graph: &ValueGraph, root: NodeId) -> Result<Vec<u8>> {
        Ok(self.encoder()?.encode_graph(graph, root)?)
    }

    /// Decode a buffer holding exactly one value.
    pub fn decode(&self, input: &[u8]) -> Result<Value> {
        Ok(self.decoder()?.decode_exact(input)?)
    }

    /// Decode the value starting at `cursor`, returning it and the offset
    /// just past it.
    pub fn decode_at(&self, input: &[u8], cursor: usize) -> Result<(Value, usize)> {
        Ok(self.decoder()?.decode(input, cursor)?)
    }

    /// Decode every value in a buffer of concatenated values.
    ///
    /// Stops at the end of input or after the first error.
    pub fn decode_stream<'a>(
        &'a self,
        input: &'a [u8],
    ) -> Result<impl Iterator<Item = Result<Value>> + 'a> {
        let stream = self.decoder()?.stream(input);
        Ok(stream.map(|item| item.map_err(Into::into)))
    }

    /// Annotated listing of every value in `input`.
    pub fn dump(&self, input: &[u8]) -> Result<String> {
        Ok(tagwire_wire::dump(&self.registry, input)?)
    }

    fn encoder(&self) -> Result<Encoder<'_>> {
        Ok(Encoder::with_options(&self.registry, self.options)?)
    }

    fn decoder(&self) -> Result<Decoder<'_>> {
        Ok(Decoder::with_options(&self.registry, self.options)?)
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for [`Codec`].
#[derive(Debug, Default)]
pub struct CodecBuilder {
    registry: Option<TagRegistry>,
    options: CodecOptions,
}

impl CodecBuilder {
    /// Builder with the standard registry and default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom registry; it is sealed by [`build`](Self::build).
    pub fn registry(mut self, registry: TagRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use custom limits.
    pub fn options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// Seal the registry and build the codec.
    pub fn build(self) -> Codec {
        let mut registry = self.registry.unwrap_or_else(TagRegistry::standard);
        registry.seal();
        debug!(
            kinds = registry.len(),
            max_depth = self.options.max_depth,
            max_payload_len = self.options.max_payload_len,
            max_entries = self.options.max_entries,
            "Built codec"
        );
        Codec {
            registry: Arc::new(registry),
            options: self.options,
        }
    }
}
