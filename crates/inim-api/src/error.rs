use thiserror::Error;

/// Top-level error type for the `inim-api` crate.
///
/// Every failure a cloud call can produce lands in one of four classes:
/// connectivity (`Transport`, `HttpStatus`, `InvalidUrl`), authentication,
/// vendor API failure, and local configuration (`MissingUserCode`).
/// `inim-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, token missing from the login reply, or a token the
    /// cloud reports as invalid/expired (status 18, 19 or 20).
    #[error("Authentication failed: {message}")]
    Authentication { message: String, code: Option<i64> },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The cloud answered with a non-2xx HTTP status.
    #[error("HTTP error status {status}")]
    HttpStatus { status: u16 },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Cloud API ───────────────────────────────────────────────────
    /// Non-zero envelope `Status` outside the token-invalid set.
    #[error("INIM API error {code}: {message}")]
    Api { message: String, code: i64 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON (de)serialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local preconditions ─────────────────────────────────────────
    /// A code-protected operation was requested without a user code.
    /// Raised before any network traffic.
    #[error("A user code is required to {operation}")]
    MissingUserCode { operation: &'static str },
}

impl Error {
    /// Returns `true` if this error indicates the token was rejected
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a connectivity problem rather than a
    /// verdict from the cloud.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::HttpStatus { status } => *status >= 500,
            _ => false,
        }
    }

    /// Extract the vendor status code, if available.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::Authentication { code, .. } => *code,
            _ => None,
        }
    }
}
