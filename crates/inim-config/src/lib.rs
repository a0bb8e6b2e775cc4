//! Shared configuration for inimctl.
//!
//! TOML profiles, secret resolution (env + keyring + plaintext), and
//! translation into the runtime `ClientConfig`, `Credentials` and
//! `CoordinatorConfig` types. Nothing here talks to INIM Cloud.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use inim_core::{ClientConfig, CoordinatorConfig, Credentials, ScenarioOverrides};

pub const KEYRING_SERVICE: &str = "inimctl";
pub const PASSWORD_ENV: &str = "INIM_PASSWORD";
pub const USER_CODE_ENV: &str = "INIM_USER_CODE";

/// Bounds accepted for the polling interval, in seconds.
pub const MIN_SCAN_INTERVAL_SECS: u64 = 10;
pub const MAX_SCAN_INTERVAL_SECS: u64 = 300;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level `config.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, listing the known names on a miss.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: if self.profiles.is_empty() {
                    "none".into()
                } else {
                    self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
                },
            })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Polling interval in seconds.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            scan_interval: default_scan_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_scan_interval() -> u64 {
    inim_core::config::DEFAULT_REFRESH_INTERVAL.as_secs()
}

/// One INIM Cloud account.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    pub username: String,

    /// Plaintext password. Prefer the keyring or `INIM_PASSWORD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Plaintext user code. Prefer the keyring or `INIM_USER_CODE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arm_away_scenario: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arm_home_scenario: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disarm_scenario: Option<i64>,

    /// Overrides `defaults.scan_interval`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_interval: Option<u64>,

    #[serde(default)]
    pub poll_before_refresh: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Name of the profile to use: explicit flag, then `default_profile`,
/// then `"default"`.
pub fn active_profile_name(explicit: Option<&str>, cfg: &Config) -> String {
    explicit
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "inimctl", "inimctl").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("inimctl");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading & saving ────────────────────────────────────────────────

/// Load the config from the canonical path, layered with `INIM_` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if present), then `INIM_`
/// variables (`INIM_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("INIM_").split("__"))
        .extract()?;
    Ok(config)
}

pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Secrets ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Password,
    UserCode,
}

impl SecretKind {
    fn env_var(self) -> &'static str {
        match self {
            Self::Password => PASSWORD_ENV,
            Self::UserCode => USER_CODE_ENV,
        }
    }

    /// Keyring account name, e.g. `home/user-code`.
    pub fn keyring_account(self, profile_name: &str) -> String {
        match self {
            Self::Password => format!("{profile_name}/password"),
            Self::UserCode => format!("{profile_name}/user-code"),
        }
    }
}

/// Store a secret in the OS keyring for `profile_name`.
pub fn store_secret(
    profile_name: &str,
    kind: SecretKind,
    secret: &SecretString,
) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_account(profile_name))?;
    entry.set_password(secret.expose_secret())?;
    Ok(())
}

fn keyring_lookup(profile_name: &str, kind: SecretKind) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_account(profile_name))
        .ok()?
        .get_password()
        .ok()
}

/// First non-empty value of: env var, keyring, plaintext.
fn first_secret(
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    env.filter(|v| !v.is_empty())
        .or_else(|| keyring().filter(|v| !v.is_empty()))
        .or_else(|| plaintext.filter(|v| !v.is_empty()).map(str::to_owned))
        .map(SecretString::from)
}

fn resolve_secret(
    profile_name: &str,
    kind: SecretKind,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    first_secret(
        std::env::var(kind.env_var()).ok(),
        || keyring_lookup(profile_name, kind),
        plaintext,
    )
}

/// Resolve the account credentials for a profile.
pub fn resolve_credentials(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    if profile.username.trim().is_empty() {
        return Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        });
    }
    let password = resolve_secret(profile_name, SecretKind::Password, profile.password.as_deref())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    Ok(Credentials::new(profile.username.trim(), password))
}

/// The user code is optional; without one code-protected commands fail.
pub fn resolve_user_code(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_secret(profile_name, SecretKind::UserCode, profile.user_code.as_deref())
}

// ── Translation to runtime config ───────────────────────────────────

pub fn validate_scan_interval(secs: u64) -> Result<Duration, ConfigError> {
    if (MIN_SCAN_INTERVAL_SECS..=MAX_SCAN_INTERVAL_SECS).contains(&secs) {
        Ok(Duration::from_secs(secs))
    } else {
        Err(ConfigError::Validation {
            field: "scan_interval".into(),
            reason: format!(
                "{secs}s is outside {MIN_SCAN_INTERVAL_SECS}..={MAX_SCAN_INTERVAL_SECS}s"
            ),
        })
    }
}

pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::default();

    if let Some(ref raw) = profile.base_url {
        config.base_url = Url::parse(raw).map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
    }

    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    config.timeout = Duration::from_secs(timeout);

    Ok(config)
}

/// Build a `CoordinatorConfig` from a profile and an already resolved code.
pub fn coordinator_config(
    profile: &Profile,
    defaults: &Defaults,
    user_code: Option<SecretString>,
) -> Result<CoordinatorConfig, ConfigError> {
    let refresh_interval =
        validate_scan_interval(profile.scan_interval.unwrap_or(defaults.scan_interval))?;

    Ok(CoordinatorConfig {
        refresh_interval,
        user_code,
        scenarios: ScenarioOverrides {
            away: profile.arm_away_scenario,
            home: profile.arm_home_scenario,
            disarm: profile.disarm_scenario,
        },
        poll_before_refresh: profile.poll_before_refresh,
    })
}

pub fn profile_to_coordinator_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CoordinatorConfig, ConfigError> {
    coordinator_config(profile, defaults, resolve_user_code(profile, profile_name))
}
