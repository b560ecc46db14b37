//! Error types for the quester helpers.
//!
//! # Design
//! One variant per failure stage: building the body, moving bytes over the
//! wire, and decoding the reply. A non-2xx status is not an error here; the
//! caller inspects `HttpResponse::status` itself. Messages are carried as
//! strings so the enum stays independent of the transport and codec crates.

/// Errors returned by body building, request execution and decoding.
#[derive(Debug, thiserror::Error)]
pub enum QuesterError {
    /// The requested body kind is not one of the supported kinds.
    #[error("unsupported body kind: {0}")]
    UnsupportedBodyKind(String),

    /// The payload could not be encoded in the requested format.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport failed before a response was received.
    #[error("request failed: {0}")]
    RequestError(String),

    /// The response body was unreadable, not JSON, not a JSON object, or
    /// already consumed.
    #[error("decode failed: {0}")]
    DecodeError(String),
}

pub type Result<T> = std::result::Result<T, QuesterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_stage_and_detail() {
        let err = QuesterError::UnsupportedBodyKind("xml".to_string());
        assert_eq!(err.to_string(), "unsupported body kind: xml");

        let err = QuesterError::DecodeError("body already consumed".to_string());
        assert_eq!(err.to_string(), "decode failed: body already consumed");
    }
}
