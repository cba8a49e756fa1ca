//! Error types for the IRC client engine.
//!
//! Client-level failures ([`ClientError`]) wrap the lower level protocol
//! errors ([`ProtocolError`]) raised by the line codec and the message
//! parser ([`MessageParseError`]).

use thiserror::Error;

/// Convenience type alias for Results using [`ClientError`].
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors surfaced by the public client API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// An outbound operation was attempted without an active session.
    #[error("not connected")]
    NotConnected,

    /// `connect` was called while a session is connecting or connected.
    #[error("already connected")]
    AlreadyConnected,

    /// `disconnect` was called before the handshake completed.
    #[error("connect aborted")]
    ConnectAborted,

    /// The transport could not be acquired.
    #[error("failed to connect to {server}: {source}")]
    Connect {
        /// `host:port` that was dialed.
        server: String,
        /// The underlying transport error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error on an established session.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured fallback encoding label is not known.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Framing or parsing failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Protocol-level errors raised while framing lines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Line exceeded the configured maximum length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Length of the offending line.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Illegal control character in an outbound line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// Failed to parse an IRC line.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The raw line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Errors encountered when tokenizing a protocol line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty or only whitespace.
    #[error("empty message")]
    EmptyMessage,

    /// No command token followed the prefix.
    #[error("missing command")]
    MissingCommand,

    /// Tokenizer failure with position information.
    #[error("parsing failed at position {position}: {context}")]
    ParseContext {
        /// Byte offset where parsing failed.
        position: usize,
        /// Description of what was being parsed.
        context: &'static str,
    },
}
