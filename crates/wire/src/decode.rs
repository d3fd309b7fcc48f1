//! Bytes to value tree
//!
//! Decoding is a single forward pass driven by an explicit state machine:
//!
//! ```text
//! ReadTag ──► ReadLength ──► ReadPayload ──► ReadTag ...
//!    │             │                             │
//!    │             └─ container: push frame ─────┘
//!    └─ fixed-width scalar ──► ReadPayload
//!                                     root complete ──► Done
//! ```
//!
//! The machine emits [`Token`]s; [`Decoder::decode`] assembles them into a
//! [`Value`] with a frame stack instead of recursion. Every length read from
//! the stream is checked against the bytes actually remaining before it is
//! trusted, and container pre-allocation is capped the same way.

use crate::options::CodecOptions;
use crate::registry::{AssembleFn, KindCodec, RegistryEntry, ScalarDecodeFn, TagRegistry, Width};
use byteorder::{BigEndian, ByteOrder};
use tagwire_core::{CodecError, Result, Tag, Value, ValueKind};
use tracing::{debug, trace};

/// One structural event of an encoded value
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A complete scalar
    Scalar {
        /// Offset of the tag byte
        offset: usize,
        /// Number of enclosing containers
        depth: usize,
        /// Discriminator read
        tag: Tag,
        /// Decoded value
        value: Value,
    },
    /// Start of a container; its children follow
    Open {
        /// Offset of the tag byte
        offset: usize,
        /// Number of enclosing containers
        depth: usize,
        /// Discriminator read
        tag: Tag,
        /// Container kind
        kind: ValueKind,
        /// Declared entry count
        entries: usize,
    },
    /// All children of the innermost open container have been read
    Close {
        /// Offset just past the container's last byte
        offset: usize,
        /// Number of enclosing containers
        depth: usize,
        /// Container kind
        kind: ValueKind,
    },
}

#[derive(Clone, Copy)]
enum State {
    ReadTag,
    ReadLength { entry: RegistryEntry, start: usize },
    ReadPayload {
        entry: RegistryEntry,
        decode: ScalarDecodeFn,
        start: usize,
        len: usize,
    },
    Done,
}

#[derive(Debug)]
struct OpenContainer {
    kind: ValueKind,
    remaining: usize,
}

/// Token producer for one root value
struct Machine<'r, 'a> {
    registry: &'r TagRegistry,
    options: CodecOptions,
    input: &'a [u8],
    pos: usize,
    state: State,
    open: Vec<OpenContainer>,
    complete: bool,
}

impl<'r, 'a> Machine<'r, 'a> {
    fn new(registry: &'r TagRegistry, options: CodecOptions, input: &'a [u8], pos: usize) -> Self {
        Machine {
            registry,
            options,
            input,
            pos,
            state: State::ReadTag,
            open: Vec::new(),
            complete: false,
        }
    }

    fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.pos)
    }

    /// Next token, or `None` once the root is complete
    ///
    /// After an error the machine stays in `Done`.
    fn next_token(&mut self) -> Result<Option<Token>> {
        let result = self.step();
        if result.is_err() {
            self.state = State::Done;
        }
        result
    }

    fn step(&mut self) -> Result<Option<Token>> {
        loop {
            match self.state {
                State::Done => return Ok(None),

                State::ReadTag => {
                    if let Some(top) = self.open.last() {
                        if top.remaining == 0 {
                            let kind = top.kind;
                            self.open.pop();
                            let depth = self.open.len();
                            self.child_complete();
                            return Ok(Some(Token::Close {
                                offset: self.pos,
                                depth,
                                kind,
                            }));
                        }
                    }

                    let start = self.pos;
                    let byte = self.take(1)?[0];
                    let entry = *self
                        .registry
                        .lookup_by_tag(Tag(byte))
                        .map_err(|e| e.at_offset(start))?;
                    self.state = match entry.codec {
                        KindCodec::Scalar {
                            width: Width::Fixed(len),
                            decode,
                            ..
                        } => State::ReadPayload {
                            entry,
                            decode,
                            start,
                            len,
                        },
                        _ => State::ReadLength { entry, start },
                    };
                }

                State::ReadLength { entry, start } => {
                    let len = BigEndian::read_u32(self.take(4)?) as usize;
                    match entry.codec {
                        KindCodec::Scalar { decode, .. } => {
                            self.options.check_payload_len(len)?;
                            self.state = State::ReadPayload {
                                entry,
                                decode,
                                start,
                                len,
                            };
                        }
                        KindCodec::Container { arity, .. } => {
                            let depth = self.open.len();
                            self.options.check_depth(depth + 1)?;
                            self.options.check_entries(len)?;
                            let children = len
                                .checked_mul(arity)
                                .ok_or(CodecError::LengthOverflow { len })?;

                            self.open.push(OpenContainer {
                                kind: entry.kind,
                                remaining: children,
                            });
                            self.state = State::ReadTag;
                            return Ok(Some(Token::Open {
                                offset: start,
                                depth,
                                tag: entry.tag,
                                kind: entry.kind,
                                entries: len,
                            }));
                        }
                    }
                }

                State::ReadPayload {
                    entry,
                    decode,
                    start,
                    len,
                } => {
                    let payload_at = self.pos;
                    let payload = self.take(len)?;
                    let value = decode(payload).map_err(|e| e.at_offset(payload_at))?;
                    if value.kind() != entry.kind {
                        return Err(CodecError::KindMismatch {
                            expected: entry.kind,
                            actual: value.kind(),
                        });
                    }

                    let depth = self.open.len();
                    self.state = State::ReadTag;
                    self.child_complete();
                    return Ok(Some(Token::Scalar {
                        offset: start,
                        depth,
                        tag: entry.tag,
                        value,
                    }));
                }
            }
        }
    }

    /// Consume `n` bytes or fail without moving
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let input: &'a [u8] = self.input;
        let available = self.remaining();
        if n > available {
            return Err(CodecError::TruncatedStream {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let bytes = &input[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn child_complete(&mut self) {
        match self.open.last_mut() {
            Some(top) => top.remaining -= 1,
            None => {
                self.complete = true;
                self.state = State::Done;
            }
        }
    }
}

/// Iterator over the tokens of one root value
pub struct Tokens<'r, 'a> {
    machine: Machine<'r, 'a>,
}

impl<'r, 'a> Tokens<'r, 'a> {
    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.machine.pos
    }

    /// Check if the root value has been fully read
    pub fn is_done(&self) -> bool {
        self.machine.complete
    }
}

impl<'r, 'a> Iterator for Tokens<'r, 'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.machine.next_token().transpose()
    }
}

/// Reconstructs values with a sealed registry
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r TagRegistry,
    options: CodecOptions,
}

struct Frame {
    kind: ValueKind,
    offset: usize,
    assemble: AssembleFn,
    children: Vec<Value>,
}

impl<'r> Decoder<'r> {
    /// Create a decoder with default limits
    ///
    /// Fails with [`CodecError::RegistryNotSealed`] for an unsealed registry.
    pub fn new(registry: &'r TagRegistry) -> Result<Self> {
        Self::with_options(registry, CodecOptions::default())
    }

    /// Create a decoder with explicit limits
    pub fn with_options(registry: &'r TagRegistry, options: CodecOptions) -> Result<Self> {
        registry.ensure_sealed()?;
        Ok(Decoder { registry, options })
    }

    /// Limits in effect
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Decode the value starting at `cursor`
    ///
    /// Returns the value and the offset just past it, so several values
    /// can be read from one buffer.
    pub fn decode(&self, input: &[u8], cursor: usize) -> Result<(Value, usize)> {
        match self.assemble(input, cursor) {
            Ok((value, end)) => {
                trace!(kind = %value.kind(), bytes = end - cursor, "Decoded value");
                Ok((value, end))
            }
            Err(e) => {
                debug!(cursor, code = e.error_code(), error = %e, "Decode failed");
                Err(e)
            }
        }
    }

    /// Decode a buffer holding exactly one value
    ///
    /// Fails with [`CodecError::TrailingBytes`] if bytes follow the value.
    pub fn decode_exact(&self, input: &[u8]) -> Result<Value> {
        let (value, end) = self.decode(input, 0)?;
        if end != input.len() {
            return Err(CodecError::TrailingBytes {
                offset: end,
                remaining: input.len() - end,
            });
        }
        Ok(value)
    }

    /// Decode consecutive values until the input is exhausted
    pub fn stream<'a>(&self, input: &'a [u8]) -> ValueStream<'r, 'a> {
        ValueStream {
            decoder: *self,
            input,
            pos: 0,
            failed: false,
        }
    }

    /// Tokens of the value starting at `cursor`
    pub fn tokens<'a>(&self, input: &'a [u8], cursor: usize) -> Tokens<'r, 'a> {
        Tokens {
            machine: Machine::new(self.registry, self.options, input, cursor),
        }
    }

    fn assemble(&self, input: &[u8], cursor: usize) -> Result<(Value, usize)> {
        if cursor > input.len() {
            return Err(CodecError::TruncatedStream {
                offset: cursor,
                needed: 1,
                available: 0,
            });
        }

        let mut machine = Machine::new(self.registry, self.options, input, cursor);
        let mut frames: Vec<Frame> = Vec::new();

        while let Some(token) = machine.next_token()? {
            let complete = match token {
                Token::Open {
                    offset,
                    kind,
                    entries,
                    ..
                } => {
                    let (arity, assemble) = self.container_codec(kind)?;
                    let capacity = child_capacity(entries, arity, machine.remaining());
                    frames.push(Frame {
                        kind,
                        offset,
                        assemble,
                        children: Vec::with_capacity(capacity),
                    });
                    None
                }
                Token::Scalar { value, .. } => Some(value),
                Token::Close { .. } => {
                    let Some(frame) = frames.pop() else {
                        break;
                    };
                    let value =
                        (frame.assemble)(frame.children).map_err(|e| e.at_offset(frame.offset))?;
                    if value.kind() != frame.kind {
                        return Err(CodecError::KindMismatch {
                            expected: frame.kind,
                            actual: value.kind(),
                        });
                    }
                    Some(value)
                }
            };

            if let Some(value) = complete {
                match frames.last_mut() {
                    Some(parent) => parent.children.push(value),
                    None => return Ok((value, machine.pos)),
                }
            }
        }

        // The machine only finishes after delivering a root.
        Err(CodecError::TruncatedStream {
            offset: machine.pos,
            needed: 1,
            available: machine.remaining(),
        })
    }

    fn container_codec(&self, kind: ValueKind) -> Result<(usize, AssembleFn)> {
        match self.registry.lookup_by_kind(kind)?.codec {
            KindCodec::Container {
                arity, assemble, ..
            } => Ok((arity, assemble)),
            KindCodec::Scalar { .. } => Err(CodecError::InvalidPayload {
                kind,
                offset: None,
                reason: "not a container kind".to_string(),
            }),
        }
    }
}

/// Most children reserved up front for one container
///
/// Declared counts are untrusted and every open frame reserves separately,
/// so larger containers grow as their children arrive.
const MAX_PREALLOCATED_CHILDREN: usize = 256;

/// Initial child capacity for a container declaring `entries` entries
///
/// Every child takes at least one byte, so `remaining` also bounds it.
fn child_capacity(entries: usize, arity: usize, remaining: usize) -> usize {
    entries
        .saturating_mul(arity)
        .min(remaining)
        .min(MAX_PREALLOCATED_CHILDREN)
}

/// Iterator over consecutive values in one buffer
///
/// Ends when the input is exhausted or after the first error.
pub struct ValueStream<'r, 'a> {
    decoder: Decoder<'r>,
    input: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'r, 'a> ValueStream<'r, 'a> {
    /// Offset of the next value
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'r, 'a> Iterator for ValueStream<'r, 'a> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.input.len() {
            return None;
        }
        match self.decoder.decode(self.input, self.pos) {
            Ok((value, end)) => {
                self.pos = end;
                Some(Ok(value))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
