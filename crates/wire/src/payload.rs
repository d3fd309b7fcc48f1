//! Standard payload codecs
//!
//! | Kind | Width | Payload |
//! |------|-------|---------|
//! | Null | fixed 0 | none |
//! | Bool | fixed 1 | `0x00` or `0x01` |
//! | Int | fixed 8 | big-endian two's complement |
//! | Float | fixed 8 | big-endian IEEE-754 bits |
//! | String | prefixed | UTF-8 bytes |
//! | Bytes | prefixed | raw bytes |
//! | Sequence | container, arity 1 | items |
//! | Mapping | container, arity 2 | `key value key value ...` |

use crate::registry::{KindCodec, Width};
use byteorder::{BigEndian, ByteOrder};
use tagwire_core::{CodecError, Mapping, Result, Value, ValueKind};

/// Standard codec for a kind
pub fn standard_codec(kind: ValueKind) -> KindCodec {
    match kind {
        ValueKind::Null => KindCodec::Scalar {
            width: Width::Fixed(0),
            encode: encode_null,
            decode: decode_null,
        },
        ValueKind::Bool => KindCodec::Scalar {
            width: Width::Fixed(1),
            encode: encode_bool,
            decode: decode_bool,
        },
        ValueKind::Int => KindCodec::Scalar {
            width: Width::Fixed(8),
            encode: encode_int,
            decode: decode_int,
        },
        ValueKind::Float => KindCodec::Scalar {
            width: Width::Fixed(8),
            encode: encode_float,
            decode: decode_float,
        },
        ValueKind::String => KindCodec::Scalar {
            width: Width::Prefixed,
            encode: encode_string,
            decode: decode_string,
        },
        ValueKind::Bytes => KindCodec::Scalar {
            width: Width::Prefixed,
            encode: encode_bytes,
            decode: decode_bytes,
        },
        ValueKind::Sequence => KindCodec::Container {
            arity: 1,
            split: split_sequence,
            assemble: assemble_sequence,
        },
        ValueKind::Mapping => KindCodec::Container {
            arity: 2,
            split: split_mapping,
            assemble: assemble_mapping,
        },
    }
}

fn mismatch(expected: ValueKind, value: &Value) -> CodecError {
    CodecError::KindMismatch {
        expected,
        actual: value.kind(),
    }
}

fn invalid(kind: ValueKind, reason: impl Into<String>) -> CodecError {
    CodecError::InvalidPayload {
        kind,
        offset: None,
        reason: reason.into(),
    }
}

fn expect_width(kind: ValueKind, payload: &[u8], width: usize) -> Result<()> {
    if payload.len() == width {
        Ok(())
    } else {
        Err(invalid(
            kind,
            format!("expected {} bytes, got {}", width, payload.len()),
        ))
    }
}

// ============================================================================
// Scalars
// ============================================================================

/// Null has no payload
pub fn encode_null(value: &Value, _out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        other => Err(mismatch(ValueKind::Null, other)),
    }
}

/// Decode a Null payload
pub fn decode_null(payload: &[u8]) -> Result<Value> {
    expect_width(ValueKind::Null, payload, 0)?;
    Ok(Value::Null)
}

/// Encode a Bool as one byte
pub fn encode_bool(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Bool(b) => {
            out.push(u8::from(*b));
            Ok(())
        }
        other => Err(mismatch(ValueKind::Bool, other)),
    }
}

/// Decode a Bool; any byte other than 0 or 1 is rejected
pub fn decode_bool(payload: &[u8]) -> Result<Value> {
    expect_width(ValueKind::Bool, payload, 1)?;
    match payload[0] {
        0x00 => Ok(Value::Bool(false)),
        0x01 => Ok(Value::Bool(true)),
        b => Err(invalid(ValueKind::Bool, format!("byte 0x{:02x}", b))),
    }
}

/// Encode an Int as 8 big-endian bytes
pub fn encode_int(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Int(i) => {
            let mut buf = [0u8; 8];
            BigEndian::write_i64(&mut buf, *i);
            out.extend_from_slice(&buf);
            Ok(())
        }
        other => Err(mismatch(ValueKind::Int, other)),
    }
}

/// Decode an Int
pub fn decode_int(payload: &[u8]) -> Result<Value> {
    expect_width(ValueKind::Int, payload, 8)?;
    Ok(Value::Int(BigEndian::read_i64(payload)))
}

/// Encode a Float as its 8-byte big-endian bit pattern
pub fn encode_float(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Float(f) => {
            let mut buf = [0u8; 8];
            BigEndian::write_u64(&mut buf, f.to_bits());
            out.extend_from_slice(&buf);
            Ok(())
        }
        other => Err(mismatch(ValueKind::Float, other)),
    }
}

/// Decode a Float, preserving NaN payloads and the sign of zero
pub fn decode_float(payload: &[u8]) -> Result<Value> {
    expect_width(ValueKind::Float, payload, 8)?;
    Ok(Value::Float(f64::from_bits(BigEndian::read_u64(payload))))
}

/// Encode a String as its UTF-8 bytes
pub fn encode_string(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::String(s) => {
            out.extend_from_slice(s.as_bytes());
            Ok(())
        }
        other => Err(mismatch(ValueKind::String, other)),
    }
}

/// Decode a String; invalid UTF-8 is rejected
pub fn decode_string(payload: &[u8]) -> Result<Value> {
    match std::str::from_utf8(payload) {
        Ok(s) => Ok(Value::String(s.to_string())),
        Err(e) => Err(invalid(ValueKind::String, format!("invalid UTF-8: {}", e))),
    }
}

/// Encode Bytes verbatim
pub fn encode_bytes(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Bytes(b) => {
            out.extend_from_slice(b);
            Ok(())
        }
        other => Err(mismatch(ValueKind::Bytes, other)),
    }
}

/// Decode Bytes
pub fn decode_bytes(payload: &[u8]) -> Result<Value> {
    Ok(Value::Bytes(payload.to_vec()))
}

// ============================================================================
// Containers
// ============================================================================

/// Sequence items in order
pub fn split_sequence(value: &Value) -> Result<Vec<&Value>> {
    match value {
        Value::Sequence(items) => Ok(items.iter().collect()),
        other => Err(mismatch(ValueKind::Sequence, other)),
    }
}

/// Rebuild a Sequence
pub fn assemble_sequence(children: Vec<Value>) -> Result<Value> {
    Ok(Value::Sequence(children))
}

/// Mapping entries flattened to `key value key value ...`
pub fn split_mapping(value: &Value) -> Result<Vec<&Value>> {
    match value {
        Value::Mapping(m) => Ok(m.iter().flat_map(|(k, v)| [k, v]).collect()),
        other => Err(mismatch(ValueKind::Mapping, other)),
    }
}

/// Rebuild a Mapping from alternating keys and values
///
/// Fails with [`CodecError::DuplicateKey`] on a repeated key.
pub fn assemble_mapping(children: Vec<Value>) -> Result<Value> {
    if children.len() % 2 != 0 {
        return Err(invalid(
            ValueKind::Mapping,
            format!("{} children do not form key/value pairs", children.len()),
        ));
    }
    let mut mapping = Mapping::with_capacity(children.len() / 2);
    let mut iter = children.into_iter();
    while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
        mapping.insert(k, v)?;
    }
    Ok(Value::Mapping(mapping))
}
