//! Binary wire format for tagwire values
//!
//! Every value is written as a one-byte tag followed by its payload:
//!
//! | Kind | Encoding |
//! |------|----------|
//! | Null | `[tag]` |
//! | Bool | `[tag][0x00 or 0x01]` |
//! | Int | `[tag][8 bytes big-endian]` |
//! | Float | `[tag][8 bytes big-endian IEEE-754]` |
//! | String | `[tag][len:4 BE][UTF-8]` |
//! | Bytes | `[tag][len:4 BE][bytes]` |
//! | Sequence | `[tag][count:4 BE][item...]` |
//! | Mapping | `[tag][count:4 BE][key value...]` |
//!
//! Tags come from a sealed [`TagRegistry`]; encoder and decoder must use
//! the same assignment.
//!
//! ## Examples
//!
//! ```
//! use tagwire_wire::{Decoder, Encoder, TagRegistry};
//! use tagwire_core::Value;
//!
//! let registry = TagRegistry::standard();
//! let bytes = Encoder::new(&registry)?.encode(&Value::Int(1))?;
//! assert_eq!(bytes, [0x02, 0, 0, 0, 0, 0, 0, 0, 1]);
//!
//! let value = Decoder::new(&registry)?.decode_exact(&bytes)?;
//! assert_eq!(value, Value::Int(1));
//! # Ok::<(), tagwire_core::CodecError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod options;
pub mod payload;
pub mod registry;

pub use decode::{Decoder, Token, Tokens, ValueStream};
pub use encode::Encoder;
pub use inspect::dump;
pub use options::CodecOptions;
pub use registry::{KindCodec, RegistryEntry, TagRegistry, Width};
