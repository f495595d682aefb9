//! Client error types.

use thiserror::Error;
use zonepull_core::RecordError;
use zonepull_protocol::ProtocolError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while calling the API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-layer failure before a reply body was obtained.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server returned no bytes.
    #[error("transport failure: empty reply from server")]
    EmptyReply,

    /// Wire-format or envelope failure from the protocol layer.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A non-zero fault code surfaced by a typed operation.
    #[error("API fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// A reply decoded fine but its payload misses a field the
    /// operation requires.
    #[error("unexpected reply shape: {0}")]
    UnexpectedReply(String),

    /// A result entry could not be turned into a typed record.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A domain name that cannot be split into name and extension.
    #[error("invalid domain name: {0}")]
    InvalidDomain(String),
}

impl ClientError {
    /// Returns true for transport-level failures (no usable reply).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::EmptyReply)
    }

    /// Returns the fault code for [`ClientError::Fault`] errors.
    pub fn fault_code(&self) -> Option<i64> {
        match self {
            Self::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}
