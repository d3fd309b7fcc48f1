//! Error types for tagwire
//!
//! Every registry, encode and decode operation fails with a [`CodecError`].
//! All errors are terminal for the call that produced them: no partial
//! results are returned and nothing is retried internally.
//!
//! ## Error Classes
//!
//! Detailed variants group into a small, frozen taxonomy ([`ErrorClass`]):
//!
//! | Class | Variants |
//! |-------|----------|
//! | UnknownTag | UnknownTag, UnknownKind |
//! | DuplicateTag | DuplicateTag, DuplicateKind |
//! | TruncatedStream | TruncatedStream |
//! | CyclicStructure | CyclicStructure |
//! | Malformed | UnknownNode, KindMismatch, InvalidPayload, DuplicateKey, LengthOverflow, TrailingBytes |
//! | LimitExceeded | LimitExceeded |
//! | Registry | RegistrySealed, RegistryNotSealed, InvalidArity |

use crate::value::ValueKind;
use std::fmt;
use thiserror::Error;

/// Codec error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A discriminator byte that no kind is registered for
    #[error("unknown tag 0x{tag:02x}{}", at(.offset))]
    UnknownTag {
        /// The unregistered tag byte
        tag: u8,
        /// Stream offset of the tag byte, when known
        offset: Option<usize>,
    },

    /// A kind that no tag is registered for
    #[error("no tag registered for kind {kind}")]
    UnknownKind {
        /// The unregistered kind
        kind: ValueKind,
    },

    /// Tag already bound to another kind
    #[error("tag 0x{tag:02x} is already bound to kind {existing}")]
    DuplicateTag {
        /// The tag being registered
        tag: u8,
        /// Kind the tag is already bound to
        existing: ValueKind,
    },

    /// Kind already bound to another tag
    #[error("kind {kind} is already bound to tag 0x{existing:02x}")]
    DuplicateKind {
        /// The kind being registered
        kind: ValueKind,
        /// Tag the kind is already bound to
        existing: u8,
    },

    /// Registration attempted after the registry was sealed
    #[error("tag registry is sealed")]
    RegistrySealed,

    /// Encoder or decoder built from a registry that was never sealed
    #[error("tag registry must be sealed before use")]
    RegistryNotSealed,

    /// Container codec registered with an arity of zero
    #[error("container codec for {kind} must have an arity of at least 1")]
    InvalidArity {
        /// The kind being registered
        kind: ValueKind,
    },

    /// Fewer bytes remain than a tag, length or payload declares
    #[error("truncated stream at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedStream {
        /// Offset where the read started
        offset: usize,
        /// Bytes required
        needed: usize,
        /// Bytes remaining
        available: usize,
    },

    /// A graph node refers back to a node on its own path
    #[error("cyclic structure: node {node} is reachable from itself")]
    CyclicStructure {
        /// Id of the node closing the cycle
        node: usize,
    },

    /// A graph reference to a node that does not exist
    #[error("unknown graph node {node}")]
    UnknownNode {
        /// The missing node id
        node: usize,
    },

    /// A codec function received a value of a different kind
    #[error("kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        /// Kind the function handles
        expected: ValueKind,
        /// Kind it received
        actual: ValueKind,
    },

    /// Payload bytes rejected by the kind's decode function
    #[error("invalid {kind} payload{}: {reason}", at(.offset))]
    InvalidPayload {
        /// Kind being decoded
        kind: ValueKind,
        /// Offset of the payload, when known
        offset: Option<usize>,
        /// What was wrong
        reason: String,
    },

    /// A mapping key that is already present
    #[error("duplicate {kind} key in mapping{}", at(.offset))]
    DuplicateKey {
        /// Kind of the repeated key
        kind: ValueKind,
        /// Offset of the mapping, when known
        offset: Option<usize>,
    },

    /// A length or count that does not fit the 4-byte length field
    #[error("length {len} exceeds the 32-bit length field")]
    LengthOverflow {
        /// The offending length
        len: usize,
    },

    /// A configured codec limit was exceeded
    #[error("{limit} limit exceeded: {actual} > {max}")]
    LimitExceeded {
        /// Name of the limit
        limit: &'static str,
        /// Configured maximum
        max: usize,
        /// Observed value
        actual: usize,
    },

    /// Bytes left over after a value that should span the whole input
    #[error("{remaining} trailing bytes after value ending at offset {offset}")]
    TrailingBytes {
        /// Offset where the value ended
        offset: usize,
        /// Bytes left over
        remaining: usize,
    },
}

fn at(offset: &Option<usize>) -> String {
    match offset {
        Some(o) => format!(" at offset {}", o),
        None => String::new(),
    }
}

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Coarse error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Unregistered discriminator or kind
    UnknownTag,
    /// Registry misconfiguration
    DuplicateTag,
    /// Insufficient bytes for a declared length
    TruncatedStream,
    /// Cycle found while flattening a graph
    CyclicStructure,
    /// Structurally invalid input
    Malformed,
    /// Configured limit exceeded
    LimitExceeded,
    /// Registry used in the wrong state
    Registry,
}

impl ErrorClass {
    /// Canonical class name
    pub const fn name(&self) -> &'static str {
        match self {
            ErrorClass::UnknownTag => "UnknownTag",
            ErrorClass::DuplicateTag => "DuplicateTag",
            ErrorClass::TruncatedStream => "TruncatedStream",
            ErrorClass::CyclicStructure => "CyclicStructure",
            ErrorClass::Malformed => "Malformed",
            ErrorClass::LimitExceeded => "LimitExceeded",
            ErrorClass::Registry => "Registry",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl CodecError {
    /// Get the canonical error code
    ///
    /// Codes are frozen and match the variant names.
    pub fn error_code(&self) -> &'static str {
        match self {
            CodecError::UnknownTag { .. } => "UnknownTag",
            CodecError::UnknownKind { .. } => "UnknownKind",
            CodecError::DuplicateTag { .. } => "DuplicateTag",
            CodecError::DuplicateKind { .. } => "DuplicateKind",
            CodecError::RegistrySealed => "RegistrySealed",
            CodecError::RegistryNotSealed => "RegistryNotSealed",
            CodecError::InvalidArity { .. } => "InvalidArity",
            CodecError::TruncatedStream { .. } => "TruncatedStream",
            CodecError::CyclicStructure { .. } => "CyclicStructure",
            CodecError::UnknownNode { .. } => "UnknownNode",
            CodecError::KindMismatch { .. } => "KindMismatch",
            CodecError::InvalidPayload { .. } => "InvalidPayload",
            CodecError::DuplicateKey { .. } => "DuplicateKey",
            CodecError::LengthOverflow { .. } => "LengthOverflow",
            CodecError::LimitExceeded { .. } => "LimitExceeded",
            CodecError::TrailingBytes { .. } => "TrailingBytes",
        }
    }

    /// Get the coarse class of this error
    pub fn class(&self) -> ErrorClass {
        match self {
            CodecError::UnknownTag { .. } | CodecError::UnknownKind { .. } => ErrorClass::UnknownTag,
            CodecError::DuplicateTag { .. } | CodecError::DuplicateKind { .. } => {
                ErrorClass::DuplicateTag
            }
            CodecError::TruncatedStream { .. } => ErrorClass::TruncatedStream,
            CodecError::CyclicStructure { .. } => ErrorClass::CyclicStructure,
            CodecError::LimitExceeded { .. } => ErrorClass::LimitExceeded,
            CodecError::RegistrySealed
            | CodecError::RegistryNotSealed
            | CodecError::InvalidArity { .. } => ErrorClass::Registry,
            CodecError::UnknownNode { .. }
            | CodecError::KindMismatch { .. }
            | CodecError::InvalidPayload { .. }
            | CodecError::DuplicateKey { .. }
            | CodecError::LengthOverflow { .. }
            | CodecError::TrailingBytes { .. } => ErrorClass::Malformed,
        }
    }

    /// Check if this is a truncation error
    pub fn is_truncated(&self) -> bool {
        matches!(self, CodecError::TruncatedStream { .. })
    }

    /// Check if this is an unknown tag or kind
    pub fn is_unknown_tag(&self) -> bool {
        self.class() == ErrorClass::UnknownTag
    }

    /// Attach a stream offset to errors raised without one
    ///
    /// Codec functions see only a payload slice; the decoder calls this to
    /// report where the payload sits in the stream.
    pub fn at_offset(self, position: usize) -> Self {
        match self {
            CodecError::InvalidPayload {
                kind,
                offset: None,
                reason,
            } => CodecError::InvalidPayload {
                kind,
                offset: Some(position),
                reason,
            },
            CodecError::DuplicateKey { kind, offset: None } => CodecError::DuplicateKey {
                kind,
                offset: Some(position),
            },
            CodecError::UnknownTag { tag, offset: None } => CodecError::UnknownTag {
                tag,
                offset: Some(position),
            },
            other => other,
        }
    }
}
