//! Error types for recall-gateway.

use thiserror::Error;

/// All errors that can arise from a gateway call.
///
/// `Transport`, `Malformed`, and `Decode` mean the gateway could not be
/// spoken to; `Protocol` means it answered with an explicit error payload
/// for the call.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway was unreachable or the HTTP exchange itself failed
    /// (includes request-timeout expiry).
    #[error("gateway unreachable: {0}")]
    Transport(#[source] Box<ureq::Error>),

    /// The response body could not be read or was not a valid envelope.
    #[error("malformed gateway response for '{action}': {source}")]
    Malformed {
        action: String,
        #[source]
        source: std::io::Error,
    },

    /// The envelope decoded but the `result` payload had the wrong shape.
    #[error("unexpected result shape for '{action}': {source}")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// The gateway answered with an explicit error payload.
    #[error("gateway error for '{action}': {message}")]
    Protocol { action: String, message: String },
}

impl From<ureq::Error> for GatewayError {
    fn from(source: ureq::Error) -> Self {
        GatewayError::Transport(Box::new(source))
    }
}
