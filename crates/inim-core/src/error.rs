// ── Core error types ──
//
// User-facing errors from inim-core. Consumers never see envelope
// statuses or JSON parse failures directly; `From<inim_api::Error>`
// translates them into the four classes a caller acts on: connectivity,
// authentication, API rejection, local configuration.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach INIM Cloud: {reason}")]
    ConnectionFailed { reason: String },

    #[error("INIM Cloud request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {device_id}")]
    DeviceNotFound { device_id: i64 },

    #[error("Area {area_id} not found on device {device_id}")]
    AreaNotFound { device_id: i64, area_id: i64 },

    #[error("Zone {zone_id} not found on device {device_id}")]
    ZoneNotFound { device_id: i64, zone_id: i64 },

    #[error("Scenario {scenario_id} not found on device {device_id}")]
    ScenarioNotFound { device_id: i64, scenario_id: i64 },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("INIM API error {code}: {message}")]
    Api { message: String, code: i64 },

    // ── Refresh ──────────────────────────────────────────────────────
    /// A refresh failed; the previous snapshot is still served.
    #[error("Refresh failed: {source}")]
    RefreshFailed {
        #[source]
        source: Box<CoreError>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap a refresh-time failure.
    pub fn refresh_failed(source: CoreError) -> Self {
        Self::RefreshFailed {
            source: Box::new(source),
        }
    }

    /// The underlying error, looking through `RefreshFailed`.
    pub fn root(&self) -> &CoreError {
        match self {
            Self::RefreshFailed { source } => source.root(),
            other => other,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self.root(), Self::AuthenticationFailed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<inim_api::Error> for CoreError {
    fn from(err: inim_api::Error) -> Self {
        match err {
            inim_api::Error::Authentication { message, .. } => {
                CoreError::AuthenticationFailed { message }
            }
            inim_api::Error::Transport(ref e) if e.is_timeout() => CoreError::Timeout,
            inim_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            inim_api::Error::HttpStatus { status } => CoreError::ConnectionFailed {
                reason: format!("HTTP status {status}"),
            },
            inim_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            inim_api::Error::Api { message, code } => CoreError::Api { message, code },
            inim_api::Error::Deserialization { message, .. } => {
                CoreError::Internal(format!("unexpected response: {message}"))
            }
            inim_api::Error::MissingUserCode { operation } => CoreError::Config {
                message: format!("a user code is required to {operation}"),
            },
        }
    }
}
