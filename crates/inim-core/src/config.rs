// ── Runtime coordinator configuration ──
//
// Describes how a coordinator polls and which codes/scenarios it uses.
// Carries secrets but never touches disk: the CLI builds one and hands
// it in.

use std::time::Duration;

use secrecy::SecretString;

use crate::alarm::ScenarioOverrides;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Period of the background polling loop.
    pub refresh_interval: Duration,
    /// Required for zone bypass and area arm/disarm.
    pub user_code: Option<SecretString>,
    pub scenarios: ScenarioOverrides,
    /// Issue `RequestPoll` for every known device before fetching.
    pub poll_before_refresh: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            user_code: None,
            scenarios: ScenarioOverrides::default(),
            poll_before_refresh: false,
        }
    }
}
