//! Codec limits
//!
//! Limits guard the decoder against hostile input (a 4-byte count can claim
//! four billion entries) and apply identically when encoding, so that
//! anything an encoder accepts, a decoder with the same options accepts too.
//! `max_graph_values` bounds how far a shared-node graph may expand before it
//! is encoded.

use serde::{Deserialize, Serialize};
use tagwire_core::{CodecError, Result};

/// Default maximum container nesting
pub const DEFAULT_MAX_DEPTH: usize = 512;
/// Default maximum String/Bytes payload (64 MiB)
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;
/// Default maximum entries in one container (16 Mi)
pub const DEFAULT_MAX_ENTRIES: usize = 16 * 1024 * 1024;
/// Default maximum values produced by flattening a graph (16 Mi)
pub const DEFAULT_MAX_GRAPH_VALUES: usize = 16 * 1024 * 1024;

/// Limits applied by encoders and decoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Maximum number of nested containers (0 allows only scalars)
    pub max_depth: usize,
    /// Maximum length of a prefixed scalar payload
    pub max_payload_len: usize,
    /// Maximum entry count of a single container
    pub max_entries: usize,
    /// Maximum values a graph may expand to when encoded
    pub max_graph_values: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_graph_values: DEFAULT_MAX_GRAPH_VALUES,
        }
    }
}

impl CodecOptions {
    /// Small limits for untrusted input
    pub fn strict() -> Self {
        CodecOptions {
            max_depth: 64,
            max_payload_len: 1024 * 1024,
            max_entries: 64 * 1024,
            max_graph_values: 64 * 1024,
        }
    }

    /// No limits
    ///
    /// Lengths are still bounded by the 4-byte length field.
    pub fn unbounded() -> Self {
        CodecOptions {
            max_depth: usize::MAX,
            max_payload_len: usize::MAX,
            max_entries: usize::MAX,
            max_graph_values: usize::MAX,
        }
    }

    /// Set the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the payload length limit
    pub fn with_max_payload_len(mut self, max_payload_len: usize) -> Self {
        self.max_payload_len = max_payload_len;
        self
    }

    /// Set the container entry limit
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the graph expansion limit
    pub fn with_max_graph_values(mut self, max_graph_values: usize) -> Self {
        self.max_graph_values = max_graph_values;
        self
    }

    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        check("depth", self.max_depth, depth)
    }

    pub(crate) fn check_payload_len(&self, len: usize) -> Result<()> {
        check("payload length", self.max_payload_len, len)
    }

    pub(crate) fn check_entries(&self, entries: usize) -> Result<()> {
        check("entries", self.max_entries, entries)
    }
}

fn check(limit: &'static str, max: usize, actual: usize) -> Result<()> {
    if actual > max {
        Err(CodecError::LimitExceeded { limit, max, actual })
    } else {
        Ok(())
    }
}
