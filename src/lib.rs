//! # tagwire
//!
//! Tagged binary encoding for hierarchical values.
//!
//! A [`Value`] tree is written as a linear byte sequence in which every node
//! starts with a one-byte tag naming its kind. The kind-to-tag assignment
//! lives in an explicit, sealable [`TagRegistry`], so the format can be
//! re-tagged without touching the encoder or decoder.
//!
//! ## Quick Start
//!
//! ```
//! use tagwire::prelude::*;
//!
//! let codec = Codec::standard();
//!
//! let mut doc = Mapping::new();
//! doc.insert(Value::from("a"), Value::Int(1))?;
//! let value = Value::Mapping(doc);
//!
//! let bytes = codec.encode(&value)?;
//! assert_eq!(
//!     bytes,
//!     [0x06, 0, 0, 0, 1, 0x04, 0, 0, 0, 1, b'a', 0x02, 0, 0, 0, 0, 0, 0, 0, 1]
//! );
//! assert_eq!(codec.decode(&bytes)?, value);
//! # Ok::<(), tagwire::Error>(())
//! ```
//!
//! ## Crates
//!
//! - `tagwire-core`: [`Value`], [`Mapping`], [`Tag`], [`ValueGraph`] and
//!   [`CodecError`]
//! - `tagwire-wire`: [`TagRegistry`], [`Encoder`], [`Decoder`] and
//!   [`CodecOptions`]
//!
//! This crate adds the [`Codec`] facade and the [`Error`] taxonomy.

#![warn(missing_docs)]

mod codec;
mod error;

pub mod prelude;

// Re-export main entry points
pub use codec::{Codec, CodecBuilder};
pub use error::{Error, Result};

// Re-export the data model
pub use tagwire_core::{CodecError, ErrorClass, Mapping, NodeId, Tag, Value, ValueGraph, ValueKind};

/// Result type of registry and payload codec functions
pub use tagwire_core::Result as CodecResult;

// Re-export the wire layer
pub use tagwire_wire::{
    dump, CodecOptions, Decoder, Encoder, KindCodec, RegistryEntry, TagRegistry, Token, Width,
};
