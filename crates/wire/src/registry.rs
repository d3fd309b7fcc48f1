//! Tag registry
//!
//! A [`TagRegistry`] binds each [`ValueKind`] to a one-byte [`Tag`] and to the
//! [`KindCodec`] that writes and reads that kind's payload. Both directions
//! must agree, so the same registry (or one built identically) is handed to
//! the encoder and the decoder.
//!
//! ## Lifecycle
//!
//! 1. Build: [`TagRegistry::new`] then [`TagRegistry::register`] per kind
//! 2. Seal: [`TagRegistry::seal`] resolves the dispatch tables and freezes
//!    the bindings
//! 3. Use: encoders and decoders refuse unsealed registries
//!
//! A sealed registry is never mutated again and can be shared across threads
//! without locking.

use crate::payload;
use std::fmt;
use tagwire_core::{CodecError, Result, Tag, Value, ValueKind};
use tracing::debug;

/// Writes a scalar's payload bytes
pub type ScalarEncodeFn = fn(&Value, &mut Vec<u8>) -> Result<()>;
/// Rebuilds a scalar from its payload bytes
pub type ScalarDecodeFn = fn(&[u8]) -> Result<Value>;
/// Lists a container's children in wire order
pub type SplitFn = for<'a> fn(&'a Value) -> Result<Vec<&'a Value>>;
/// Rebuilds a container from its decoded children
pub type AssembleFn = fn(Vec<Value>) -> Result<Value>;

/// Payload width of a scalar kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// Exactly this many payload bytes follow the tag (may be zero)
    Fixed(usize),
    /// A 4-byte big-endian length follows the tag, then the payload
    Prefixed,
}

/// Encode/decode function pair for one kind
#[derive(Clone, Copy)]
pub enum KindCodec {
    /// Leaf kind carrying only payload bytes
    Scalar {
        /// How the payload length is determined
        width: Width,
        /// Payload writer
        encode: ScalarEncodeFn,
        /// Payload reader
        decode: ScalarDecodeFn,
    },
    /// Composite kind carrying a counted list of children
    Container {
        /// Children per counted entry (1 for sequences, 2 for mappings)
        arity: usize,
        /// Child enumerator
        split: SplitFn,
        /// Node builder
        assemble: AssembleFn,
    },
}

impl KindCodec {
    /// Check if this codec handles a composite kind
    pub fn is_container(&self) -> bool {
        matches!(self, KindCodec::Container { .. })
    }
}

impl fmt::Debug for KindCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindCodec::Scalar { width, .. } => {
                f.debug_struct("Scalar").field("width", width).finish()
            }
            KindCodec::Container { arity, .. } => {
                f.debug_struct("Container").field("arity", arity).finish()
            }
        }
    }
}

/// One kind-to-tag binding
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    /// Bound kind
    pub kind: ValueKind,
    /// Bound discriminator
    pub tag: Tag,
    /// Payload functions
    pub codec: KindCodec,
}

/// Lookup tables built once at seal time
#[derive(Debug, Clone)]
struct DispatchTables {
    by_kind: [Option<u8>; ValueKind::COUNT],
    by_tag: [Option<u8>; 256],
}

/// Registry of kind/tag bindings
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    entries: Vec<RegistryEntry>,
    tables: Option<DispatchTables>,
}

impl TagRegistry {
    /// Create an empty, unsealed registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard tag assignment and payload codecs, sealed
    ///
    /// | Kind | Tag |
    /// |------|-----|
    /// | Null | 0x00 |
    /// | Bool | 0x01 |
    /// | Int | 0x02 |
    /// | Float | 0x03 |
    /// | String | 0x04 |
    /// | Bytes | 0x05 |
    /// | Mapping | 0x06 |
    /// | Sequence | 0x07 |
    pub fn standard() -> Self {
        let mut registry = TagRegistry::new();
        for (kind, tag) in STANDARD_TAGS {
            registry.entries.push(RegistryEntry {
                kind,
                tag,
                codec: payload::standard_codec(kind),
            });
        }
        registry.seal();
        registry
    }

    /// Unsealed registry binding the given kinds to custom tags
    ///
    /// Each kind uses its standard payload codec. Kinds left out stay
    /// unregistered; the caller may register them or seal as is.
    pub fn with_tags(assignment: &[(ValueKind, Tag)]) -> Result<Self> {
        let mut registry = TagRegistry::new();
        for &(kind, tag) in assignment {
            registry.register(kind, tag, payload::standard_codec(kind))?;
        }
        Ok(registry)
    }

    /// Bind `kind` to `tag`
    ///
    /// # Errors
    ///
    /// - [`CodecError::RegistrySealed`] after [`seal`](Self::seal)
    /// - [`CodecError::DuplicateTag`] if `tag` is bound to any kind
    /// - [`CodecError::DuplicateKind`] if `kind` is bound to any tag
    /// - [`CodecError::InvalidArity`] for a container codec with arity 0
    pub fn register(&mut self, kind: ValueKind, tag: Tag, codec: KindCodec) -> Result<()> {
        if self.is_sealed() {
            return Err(CodecError::RegistrySealed);
        }
        if let Some(existing) = self.entries.iter().find(|e| e.tag == tag) {
            return Err(CodecError::DuplicateTag {
                tag: tag.byte(),
                existing: existing.kind,
            });
        }
        if let Some(existing) = self.entries.iter().find(|e| e.kind == kind) {
            return Err(CodecError::DuplicateKind {
                kind,
                existing: existing.tag.byte(),
            });
        }
        if let KindCodec::Container { arity: 0, .. } = codec {
            return Err(CodecError::InvalidArity { kind });
        }

        self.entries.push(RegistryEntry { kind, tag, codec });
        Ok(())
    }

    /// Freeze the registry and build its dispatch tables
    ///
    /// Sealing an already sealed registry has no effect.
    pub fn seal(&mut self) {
        if self.is_sealed() {
            return;
        }

        let mut tables = DispatchTables {
            by_kind: [None; ValueKind::COUNT],
            by_tag: [None; 256],
        };
        // At most one entry per kind, so indices fit in a byte.
        for (i, entry) in self.entries.iter().enumerate() {
            tables.by_kind[entry.kind.index()] = Some(i as u8);
            tables.by_tag[entry.tag.byte() as usize] = Some(i as u8);
        }
        self.tables = Some(tables);

        debug!(entries = self.entries.len(), "Sealed tag registry");
    }

    /// Check if the registry has been sealed
    pub fn is_sealed(&self) -> bool {
        self.tables.is_some()
    }

    /// Fail with [`CodecError::RegistryNotSealed`] unless sealed
    pub fn ensure_sealed(&self) -> Result<()> {
        if self.is_sealed() {
            Ok(())
        } else {
            Err(CodecError::RegistryNotSealed)
        }
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All bindings, ordered by tag
    pub fn entries(&self) -> Vec<RegistryEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| e.tag);
        entries
    }

    /// Find the binding for a kind
    pub fn lookup_by_kind(&self, kind: ValueKind) -> Result<&RegistryEntry> {
        let found = match &self.tables {
            Some(tables) => tables.by_kind[kind.index()].map(|i| &self.entries[i as usize]),
            None => self.entries.iter().find(|e| e.kind == kind),
        };
        found.ok_or(CodecError::UnknownKind { kind })
    }

    /// Find the binding for a tag
    ///
    /// The returned error carries no stream offset; the decoder adds it.
    pub fn lookup_by_tag(&self, tag: Tag) -> Result<&RegistryEntry> {
        let found = match &self.tables {
            Some(tables) => tables.by_tag[tag.byte() as usize].map(|i| &self.entries[i as usize]),
            None => self.entries.iter().find(|e| e.tag == tag),
        };
        found.ok_or(CodecError::UnknownTag {
            tag: tag.byte(),
            offset: None,
        })
    }
}

const STANDARD_TAGS: [(ValueKind, Tag); ValueKind::COUNT] = [
    (ValueKind::Null, Tag::NULL),
    (ValueKind::Bool, Tag::BOOL),
    (ValueKind::Int, Tag::INT),
    (ValueKind::Float, Tag::FLOAT),
    (ValueKind::String, Tag::STRING),
    (ValueKind::Bytes, Tag::BYTES),
    (ValueKind::Mapping, Tag::MAPPING),
    (ValueKind::Sequence, Tag::SEQUENCE),
];
