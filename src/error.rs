//! Unified error types for tagwire.
//!
//! The wire crates report detailed [`CodecError`]s. This module folds them
//! into a small taxonomy that callers can match on without tracking every
//! detailed variant; the detailed error is kept inside each variant.
//!
//! Variants are transparent: they print the detailed message once and
//! [`Error::codec_error`] reaches the detail, so error-chain reporters do
//! not repeat it as a source.

use tagwire_core::{CodecError, ErrorClass};
use thiserror::Error;

/// All tagwire errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Discriminator or kind not registered
    #[error(transparent)]
    UnknownTag(CodecError),

    /// Conflicting registry bindings
    #[error(transparent)]
    DuplicateTag(CodecError),

    /// Input ended before a declared length
    #[error(transparent)]
    TruncatedStream(CodecError),

    /// A graph could not be flattened into a tree
    #[error(transparent)]
    CyclicStructure(CodecError),

    /// Structurally invalid input (bad payload, duplicate key, trailing bytes)
    #[error(transparent)]
    Malformed(CodecError),

    /// A configured limit was exceeded
    #[error(transparent)]
    LimitExceeded(CodecError),

    /// Registry used in the wrong state
    #[error(transparent)]
    Registry(CodecError),
}

/// Result type for tagwire operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The detailed error behind this one.
    pub fn codec_error(&self) -> &CodecError {
        match self {
            Error::UnknownTag(e)
            | Error::DuplicateTag(e)
            | Error::TruncatedStream(e)
            | Error::CyclicStructure(e)
            | Error::Malformed(e)
            | Error::LimitExceeded(e)
            | Error::Registry(e) => e,
        }
    }

    /// Coarse class of this error.
    pub fn class(&self) -> ErrorClass {
        self.codec_error().class()
    }

    /// Check if more input might let the same read succeed.
    ///
    /// True only for truncation: every other error stays an error no matter
    /// how many bytes follow.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::TruncatedStream(_))
    }

    /// Check if this is an unknown tag error.
    pub fn is_unknown_tag(&self) -> bool {
        matches!(self, Error::UnknownTag(_))
    }

    /// Check if this error comes from misconfiguring the registry.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::DuplicateTag(_) | Error::Registry(_))
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e.class() {
            ErrorClass::UnknownTag => Error::UnknownTag(e),
            ErrorClass::DuplicateTag => Error::DuplicateTag(e),
            ErrorClass::TruncatedStream => Error::TruncatedStream(e),
            ErrorClass::CyclicStructure => Error::CyclicStructure(e),
            ErrorClass::Malformed => Error::Malformed(e),
            ErrorClass::LimitExceeded => Error::LimitExceeded(e),
            ErrorClass::Registry => Error::Registry(e),
        }
    }
}
