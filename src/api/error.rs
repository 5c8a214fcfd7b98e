/// Error taxonomy for the eBird and Wikipedia clients
///
/// Variants carry plain strings so the error stays `Clone` and can
/// ride inside UI messages.
use thiserror::Error;

/// Failures a network client can hand back to the update loop.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The eBird API token is missing from the environment
    #[error("eBird API token is not set (export EBIRD_API_TOKEN)")]
    MissingCredentials,

    /// The request never produced a response
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON shape we expect
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Structurally valid JSON missing a required field
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
