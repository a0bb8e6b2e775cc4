// ── Command API ──
//
// Every write operation against a panel is one `Command` variant. The
// coordinator validates it against the current snapshot and routes it to
// the matching session call. Commands never refresh; callers do that.

use serde::Serialize;

/// Write operations against an INIM panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // ── Scenarios ────────────────────────────────────────────────────
    ActivateScenario { device_id: i64, scenario_id: i64 },
    /// Run the resolved "away" scenario.
    ArmAway { device_id: i64 },
    /// Run the resolved "home" scenario.
    ArmHome { device_id: i64 },
    /// Run the resolved "disarm" scenario.
    Disarm { device_id: i64 },

    // ── Code-protected ───────────────────────────────────────────────
    BypassZone {
        device_id: i64,
        zone_id: i64,
        /// `false` reinstates the zone.
        bypass: bool,
    },
    SetAreas {
        device_id: i64,
        area_ids: Vec<i64>,
        arm: bool,
    },

    // ── Polling ──────────────────────────────────────────────────────
    RequestPoll { device_id: i64 },
}

impl Command {
    pub fn device_id(&self) -> i64 {
        match self {
            Self::ActivateScenario { device_id, .. }
            | Self::ArmAway { device_id }
            | Self::ArmHome { device_id }
            | Self::Disarm { device_id }
            | Self::BypassZone { device_id, .. }
            | Self::SetAreas { device_id, .. }
            | Self::RequestPoll { device_id } => *device_id,
        }
    }
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandResult {
    Ok,
    /// A scenario ran; carries the id actually used.
    ScenarioActivated { device_id: i64, scenario_id: i64 },
}
