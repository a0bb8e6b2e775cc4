// ── Alarm state derivation ──
//
// Maps a device's areas and active scenario to the single state shown to
// users, and picks which scenarios mean "away", "home" and "disarm".
//
// Scenario auto-detection matches Italian/English name conventions
// (TOTALE/TOTAL, SPENTO/OFF). Panels with custom names fall back to ids
// 0, 1 and 2, which may not be real scenarios on that panel; explicit
// overrides should be configured there.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::model::{Device, Scenario, ScenarioKind};

/// Fallback ids used when no scenario name matches.
pub const FALLBACK_AWAY_SCENARIO: i64 = 0;
pub const FALLBACK_DISARM_SCENARIO: i64 = 1;
pub const FALLBACK_HOME_SCENARIO: i64 = 2;

/// Externally visible state of a panel or area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlarmState {
    Disarmed,
    ArmedHome,
    ArmedAway,
    Triggered,
}

/// Explicitly configured scenario ids. `None` means auto-detect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOverrides {
    pub away: Option<i64>,
    pub home: Option<i64>,
    pub disarm: Option<i64>,
}

/// Resolved scenario ids for one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScenarioSelection {
    pub away: i64,
    pub home: i64,
    pub disarm: i64,
}

impl ScenarioSelection {
    /// Resolve ids from the device's scenarios. Overrides always win.
    ///
    /// - away: first scenario whose name contains TOTALE/TOTAL
    /// - disarm: first containing SPENTO/OFF
    /// - home: first matching neither whose id is not already taken
    pub fn resolve<'a, I>(scenarios: I, overrides: ScenarioOverrides) -> Self
    where
        I: IntoIterator<Item = &'a Scenario>,
        I::IntoIter: Clone,
    {
        let scenarios = scenarios.into_iter();
        let first_of = |kind: ScenarioKind| {
            scenarios
                .clone()
                .find(|s| s.kind() == kind)
                .map(|s| s.id)
        };

        let away = overrides
            .away
            .or_else(|| first_of(ScenarioKind::Total))
            .unwrap_or(FALLBACK_AWAY_SCENARIO);
        let disarm = overrides
            .disarm
            .or_else(|| first_of(ScenarioKind::Disarm))
            .unwrap_or(FALLBACK_DISARM_SCENARIO);
        let home = overrides
            .home
            .or_else(|| {
                scenarios
                    .clone()
                    .find(|s| s.kind() == ScenarioKind::Partial && s.id != away && s.id != disarm)
                    .map(|s| s.id)
            })
            .unwrap_or(FALLBACK_HOME_SCENARIO);

        Self { away, home, disarm }
    }

    pub fn for_device(device: &Device, overrides: ScenarioOverrides) -> Self {
        Self::resolve(device.scenarios.values(), overrides)
    }
}

/// Panel-level state. `None` (unknown) when the panel reports no active
/// scenario; otherwise first match wins:
///
/// 1. any area with a live alarm: `Triggered`
/// 2. active scenario is the disarm scenario: `Disarmed`
/// 3. active scenario is the away scenario: `ArmedAway`
/// 4. active scenario is the home scenario: `ArmedHome`
/// 5. any area not disarmed: `ArmedAway`, otherwise `Disarmed`
pub fn device_alarm_state(device: &Device, selection: ScenarioSelection) -> Option<AlarmState> {
    let active = device.active_scenario?;
    let state = if device.has_live_alarm() {
        AlarmState::Triggered
    } else if active == selection.disarm {
        AlarmState::Disarmed
    } else if active == selection.away {
        AlarmState::ArmedAway
    } else if active == selection.home {
        AlarmState::ArmedHome
    } else if device.areas.values().any(|a| !a.armed.is_disarmed()) {
        AlarmState::ArmedAway
    } else {
        AlarmState::Disarmed
    };
    Some(state)
}
