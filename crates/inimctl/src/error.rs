//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use inim_config::ConfigError;
use inim_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach INIM Cloud")]
    #[diagnostic(
        code(inimctl::connection_failed),
        help("Check your network connection, then retry.\nReason: {reason}")
    )]
    ConnectionFailed { reason: String },

    #[error("Request to INIM Cloud timed out")]
    #[diagnostic(
        code(inimctl::timeout),
        help("Raise `timeout` in your profile or retry later.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(inimctl::auth_failed),
        help(
            "Verify the INIM Cloud username and password of profile '{profile}'.\n\
             Run: inimctl config set-secret password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(inimctl::no_credentials),
        help("Configure credentials with: inimctl config init\nOr set INIM_PASSWORD.")
    )]
    NoCredentials { profile: String },

    #[error("No user code configured for profile '{profile}'")]
    #[diagnostic(
        code(inimctl::no_user_code),
        help(
            "Zone bypass and area control need the panel user code.\n\
             Run: inimctl config set-secret user-code --profile {profile}\n\
             Or set INIM_USER_CODE."
        )
    )]
    NoUserCode { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(inimctl::not_found),
        help("Run: inimctl {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("The account has several panels")]
    #[diagnostic(
        code(inimctl::ambiguous_device),
        help("Pick one with --device <id>. Available: {available}")
    )]
    AmbiguousDevice { available: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("INIM API error ({code}): {message}")]
    #[diagnostic(code(inimctl::api_error))]
    ApiError { code: i64, message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(inimctl::internal))]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(inimctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(inimctl::profile_not_found),
        help("Available profiles: {available}\nCreate one with: inimctl config init")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(inimctl::config),
        help("Fix the file at {path} or recreate it with: inimctl config init")
    )]
    Config { message: String, path: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(inimctl::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::AmbiguousDevice { .. }
            | Self::NoUserCode { .. }
            | Self::ProfileNotFound { .. }
            | Self::Config { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile to errors that mention one.
    pub fn for_profile(self, profile_name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: profile_name.into(),
                message,
            },
            other => other,
        }
    }

    fn not_found(resource_type: &str, identifier: String, list_command: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier,
            list_command: list_command.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "default".into(),
                message,
            },
            CoreError::DeviceNotFound { device_id } => {
                CliError::not_found("panel", device_id.to_string(), "devices")
            }
            CoreError::AreaNotFound { area_id, .. } => {
                CliError::not_found("area", area_id.to_string(), "areas --all")
            }
            CoreError::ZoneNotFound { zone_id, .. } => {
                CliError::not_found("zone", zone_id.to_string(), "zones --all")
            }
            CoreError::ScenarioNotFound { scenario_id, .. } => {
                CliError::not_found("scenario", scenario_id.to_string(), "scenarios")
            }
            CoreError::Api { message, code } => CliError::ApiError { code, message },
            CoreError::RefreshFailed { source } => CliError::from(*source),
            CoreError::Config { message } => CliError::Validation {
                field: "command".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => {
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: inim_config::config_path().display().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_class() {
        let auth: CliError = CoreError::AuthenticationFailed {
            message: "rejected".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let missing: CliError = CoreError::ScenarioNotFound {
            device_id: 1,
            scenario_id: 9,
        }
        .into();
        assert_eq!(missing.exit_code(), exit_code::NOT_FOUND);

        let conn: CliError = CoreError::ConnectionFailed {
            reason: "dns".into(),
        }
        .into();
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);

        let cfg: CliError = ConfigError::Validation {
            field: "scan_interval".into(),
            reason: "too small".into(),
        }
        .into();
        assert_eq!(cfg.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn refresh_failures_unwrap_to_root_cause() {
        let err: CliError = CoreError::refresh_failed(CoreError::Api {
            message: "busy".into(),
            code: 3,
        })
        .into();
        assert!(matches!(err, CliError::ApiError { code: 3, .. }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn auth_errors_name_the_profile() {
        let err = CliError::from(CoreError::AuthenticationFailed {
            message: "rejected".into(),
        })
        .for_profile("cabin");
        assert!(matches!(err, CliError::AuthFailed { ref profile, .. } if profile == "cabin"));
    }
}
