//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding or decoding wire documents.
///
/// A non-zero fault code inside a well-formed reply is *not* an error
/// at this layer; it is a normal [`Reply`](crate::Reply) the caller
/// must check.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An `array` element held something other than `item` children.
    #[error("malformed wire format: {0}")]
    MalformedWireFormat(String),

    /// A parsed document does not carry the expected envelope shape.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// The reply body was blank or carried the maintenance sentinel
    /// fault code.
    #[error("service temporarily unavailable due to maintenance")]
    ServiceUnavailable,

    /// The document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl ProtocolError {
    /// Creates a [`ProtocolError::MalformedWireFormat`].
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedWireFormat(detail.into())
    }

    /// Creates a [`ProtocolError::InvalidEnvelope`].
    pub fn envelope(detail: impl Into<String>) -> Self {
        Self::InvalidEnvelope(detail.into())
    }
}
