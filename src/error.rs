use std::io::Error as IoError;
use thiserror::Error;

/// All failure modes the codec can produce.
///
/// Nothing here is recovered internally: every variant propagates straight
/// to the caller, who decides whether the in-flight encoder/parser is worth
/// discarding (it always is — see the crate root docs).
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("malformed object body: {0}")]
    MalformedObject(String),

    #[error("reference index out of range: {0}")]
    IndexOutOfRange(u16),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("value has no lossless AMF representation: {0}")]
    UnrepresentableValue(String),

    #[error("class alias '{0}' is already registered to a different type")]
    AliasConflict(String),

    #[error("no class descriptor registered for alias '{0}'")]
    UnresolvedAlias(String),

    #[error("reference table exhausted (more than 65536 values in one session)")]
    OutOfReferenceSlots,
}

impl Error {
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::ParseError(msg.into())
    }

    pub fn malformed_object(msg: impl Into<String>) -> Self {
        Error::MalformedObject(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Error::EncodingError(msg.into())
    }

    pub fn unrepresentable(msg: impl Into<String>) -> Self {
        Error::UnrepresentableValue(msg.into())
    }

    pub fn alias_conflict(alias: impl Into<String>) -> Self {
        Error::AliasConflict(alias.into())
    }

    pub fn unresolved_alias(alias: impl Into<String>) -> Self {
        Error::UnresolvedAlias(alias.into())
    }
}

/// Result type alias for the codec.
pub type Result<T> = std::result::Result<T, Error>;
