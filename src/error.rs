//! Error types for qrng-client.

use thiserror::Error;

use crate::transport::ReplyStatus;

/// Main error type for all qrng-client operations.
#[derive(Debug, Error)]
pub enum QrngError {
    /// Invalid run configuration (bad CLI values).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Could not establish the bus connection or resolve the service proxy.
    #[error("failed to connect to bus: {0}")]
    Connect(#[source] zbus::Error),

    /// Enqueuing an asynchronous call failed. Fatal to the whole run.
    #[error("failed to submit request: {0}")]
    Submit(String),

    /// The bus call itself failed (service unreachable, error envelope, ...).
    #[error("transport error: {0}")]
    Transport(#[from] zbus::Error),

    /// The reply arrived but its body did not decode as expected.
    #[error("failed to decode reply: {0}")]
    Decode(#[source] zbus::Error),

    /// The service reported a non-zero status code.
    #[error("service returned status {0}")]
    Status(ReplyStatus),

    /// The payload decoded cleanly but its size does not match the request.
    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// The completion channel closed while requests were still in flight.
    #[error("completion channel closed")]
    ChannelClosed,

    /// Final verdict for a run that finished with failed requests.
    #[error("{failed} of {sent} requests failed")]
    Failed { failed: u64, sent: u64 },
}

/// Result type alias using QrngError.
pub type Result<T> = std::result::Result<T, QrngError>;
