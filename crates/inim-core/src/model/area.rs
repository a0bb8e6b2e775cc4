// ── Area domain types ──

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmState;

/// Vendor armed-status code of an area.
///
/// The panel counts upwards from "fully armed" (1) to "disarmed" (4).
/// The two partial codes are distinct panel states and are kept apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmedStatus {
    Armed,
    /// Code 2.
    PartiallyArmed,
    /// Code 3.
    PartiallyArmedAlt,
    #[default]
    Disarmed,
    Unknown(i64),
}

impl ArmedStatus {
    pub const DISARMED_CODE: i64 = 4;

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Armed,
            2 => Self::PartiallyArmed,
            3 => Self::PartiallyArmedAlt,
            Self::DISARMED_CODE => Self::Disarmed,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Armed => 1,
            Self::PartiallyArmed => 2,
            Self::PartiallyArmedAlt => 3,
            Self::Disarmed => Self::DISARMED_CODE,
            Self::Unknown(code) => code,
        }
    }

    pub fn is_disarmed(self) -> bool {
        matches!(self, Self::Disarmed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Armed => "armed",
            Self::PartiallyArmed | Self::PartiallyArmedAlt => "armed_partial",
            Self::Disarmed => "disarmed",
            Self::Unknown(_) => "unknown",
        }
    }
}

/// A partition of the premises with its own arm and alarm status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub armed: ArmedStatus,
    /// Live alarm.
    pub alarm: bool,
    /// Latched until cleared on the panel.
    pub alarm_memory: bool,
    pub tamper: bool,
    pub tamper_memory: bool,
    pub auto_insert: bool,
}

impl Area {
    /// Panel default name (`"Area 3"`), i.e. an area nobody configured.
    pub fn is_placeholder(&self) -> bool {
        self.name
            .strip_prefix("Area ")
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Alarm state of this area alone.
    pub fn alarm_state(&self) -> AlarmState {
        if self.alarm {
            AlarmState::Triggered
        } else if self.armed.is_disarmed() {
            AlarmState::Disarmed
        } else {
            AlarmState::ArmedAway
        }
    }
}
