//! Human-readable stream listing
//!
//! ```text
//! 000000  0x06 Mapping entries=1
//! 000005    0x04 String "a"
//! 00000b    0x02 Int 1
//! ```

use crate::decode::{Decoder, Token};
use crate::registry::TagRegistry;
use std::fmt;
use tagwire_core::{Result, Value};

/// Longest byte payload printed in full
const MAX_BYTES_SHOWN: usize = 16;

/// Render every value in `input`, one line per scalar or container
///
/// Fails with the first decode error; nothing is rendered past it.
pub fn dump(registry: &TagRegistry, input: &[u8]) -> Result<String> {
    let decoder = Decoder::new(registry)?;
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let mut root = decoder.tokens(input, pos);
        for token in root.by_ref() {
            tokens.push(token?);
        }
        pos = root.position();
    }
    Ok(Listing(&tokens).to_string())
}

/// Decoded tokens laid out one per line
struct Listing<'t>(&'t [Token]);

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self.0 {
            render(f, token)?;
        }
        Ok(())
    }
}

fn render(f: &mut fmt::Formatter<'_>, token: &Token) -> fmt::Result {
    match token {
        Token::Open {
            offset,
            depth,
            tag,
            kind,
            entries,
        } => writeln!(
            f,
            "{:06x}  {}{} {} entries={}",
            offset,
            indent(*depth),
            tag,
            kind,
            entries
        ),
        Token::Scalar {
            offset,
            depth,
            tag,
            value,
        } => writeln!(
            f,
            "{:06x}  {}{} {}{}",
            offset,
            indent(*depth),
            tag,
            value.kind(),
            scalar_text(value)
        ),
        Token::Close { .. } => Ok(()),
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => format!(" {}", b),
        Value::Int(i) => format!(" {}", i),
        Value::Float(f) => format!(" {:?}", f),
        Value::String(s) => format!(" {:?}", s),
        Value::Bytes(b) => {
            let shown: String = b
                .iter()
                .take(MAX_BYTES_SHOWN)
                .map(|byte| format!("{:02x}", byte))
                .collect();
            if b.len() > MAX_BYTES_SHOWN {
                format!(" {}.. ({} bytes)", shown, b.len())
            } else {
                format!(" {}", shown)
            }
        }
        Value::Sequence(_) | Value::Mapping(_) => String::new(),
    }
}
