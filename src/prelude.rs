//! Convenient imports for tagwire.
//!
//! ```
//! use tagwire::prelude::*;
//!
//! let codec = Codec::standard();
//! let bytes = codec.encode(&Value::Bool(true))?;
//! assert_eq!(bytes, [0x01, 0x01]);
//! # Ok::<(), tagwire::Error>(())
//! ```

// Main entry point
pub use crate::codec::{Codec, CodecBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Data model
pub use tagwire_core::{Mapping, NodeId, Tag, Value, ValueGraph, ValueKind};

// Configuration
pub use tagwire_wire::{CodecOptions, TagRegistry};
