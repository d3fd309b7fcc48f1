//! On-wire kind discriminator

use serde::{Deserialize, Serialize};
use std::fmt;

/// One-byte discriminator identifying a value's kind on the wire
///
/// Tags are assigned to kinds by a tag registry. An assignment must stay
/// stable across encoder and decoder versions, otherwise previously encoded
/// streams stop decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(pub u8);

impl Tag {
    /// Standard tag for Null
    pub const NULL: Tag = Tag(0x00);
    /// Standard tag for Bool
    pub const BOOL: Tag = Tag(0x01);
    /// Standard tag for Int
    pub const INT: Tag = Tag(0x02);
    /// Standard tag for Float
    pub const FLOAT: Tag = Tag(0x03);
    /// Standard tag for String
    pub const STRING: Tag = Tag(0x04);
    /// Standard tag for Bytes
    pub const BYTES: Tag = Tag(0x05);
    /// Standard tag for Mapping
    pub const MAPPING: Tag = Tag(0x06);
    /// Standard tag for Sequence
    pub const SEQUENCE: Tag = Tag(0x07);

    /// The raw discriminator byte
    pub const fn byte(&self) -> u8 {
        self.0
    }
}

impl From<u8> for Tag {
    fn from(b: u8) -> Self {
        Tag(b)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}
