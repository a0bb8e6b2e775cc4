//! Glue between `GlobalOpts`, `inim-config` profiles and a live
//! `Coordinator`.

use std::sync::Arc;

use inim_config::{Config, Profile};
use inim_core::{Coordinator, CoordinatorConfig, CoreError, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A connected coordinator plus the profile it was built from.
pub struct Context {
    pub coordinator: Coordinator,
    pub profile_name: String,
}

pub fn load_config() -> Result<Config, CliError> {
    Ok(inim_config::load_config()?)
}

pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    inim_config::active_profile_name(global.profile.as_deref(), cfg)
}

/// Resolve the active profile and build a coordinator for it.
///
/// `interval_secs` overrides the profile's scan interval and goes through
/// the same bounds check.
pub fn build_context(global: &GlobalOpts, interval_secs: Option<u64>) -> Result<Context, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profile(&profile_name)?;

    let coordinator_config = coordinator_config(profile, &profile_name, &cfg, interval_secs)?;
    let client_config = inim_config::profile_to_client_config(profile, &cfg.defaults)?;
    let credentials = inim_config::resolve_credentials(profile, &profile_name)?;

    let session = Session::new(&client_config, credentials).map_err(CoreError::from)?;
    tracing::debug!(profile = %profile_name, "session configured");

    Ok(Context {
        coordinator: Coordinator::new(Arc::new(session), coordinator_config),
        profile_name,
    })
}

fn coordinator_config(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    interval_secs: Option<u64>,
) -> Result<CoordinatorConfig, CliError> {
    let mut config =
        inim_config::profile_to_coordinator_config(profile, profile_name, &cfg.defaults)?;
    if let Some(secs) = interval_secs {
        config.refresh_interval = inim_config::validate_scan_interval(secs)?;
    }
    Ok(config)
}
