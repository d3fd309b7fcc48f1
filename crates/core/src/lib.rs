//! Core types for tagwire
//!
//! This crate defines the data model shared by the encoder and decoder:
//! - [`Value`]: the value tree (eight kinds, owned, acyclic)
//! - [`ValueKind`]: the kind discriminant of a value
//! - [`Mapping`]: ordered, unique-keyed map of values
//! - [`Tag`]: the one-byte on-wire discriminator
//! - [`ValueGraph`]: arena form for producers with shared or cyclic references
//! - [`CodecError`]: the error type of every codec operation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod graph;
pub mod mapping;
pub mod tag;
pub mod value;

pub use error::{CodecError, ErrorClass, Result};
pub use graph::{NodeId, ValueGraph};
pub use mapping::Mapping;
pub use tag::Tag;
pub use value::{Value, ValueKind};
