// ── Zone domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Status code of a closed zone. Anything above it is open.
pub const ZONE_STATUS_CLOSED: i64 = 1;

/// Sensor kind guessed from the zone name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ZoneKind {
    Tamper,
    Motion,
    Door,
    Window,
    Opening,
}

const TAMPER_KEYWORDS: &[&str] = &["tamper", "sirena"];
const MOTION_KEYWORDS: &[&str] = &["pir", "movimento", "motion", "volumetrico"];
const DOOR_KEYWORDS: &[&str] = &["porta", "ingr", "scorr", "door", "gate", "cancell"];
const WINDOW_KEYWORDS: &[&str] = &[
    "finestra", "f.", "f:", "window", "cam.", "bagno", "cucina", "salotto", "studio", "palestra",
    "svago", "quadro",
];

impl ZoneKind {
    /// Keyword match on the lowercased name, checked tamper, motion,
    /// door, window in that order.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| name.contains(k));
        if hit(TAMPER_KEYWORDS) {
            Self::Tamper
        } else if hit(MOTION_KEYWORDS) {
            Self::Motion
        } else if hit(DOOR_KEYWORDS) {
            Self::Door
        } else if hit(WINDOW_KEYWORDS) {
            Self::Window
        } else {
            Self::Opening
        }
    }
}

/// A single detection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub status: i64,
    pub alarm_memory: bool,
    pub tamper_memory: bool,
    pub bypassed: bool,
    pub output_on: bool,
    pub output_value: Option<i64>,
    /// Area membership exactly as the panel reports it.
    pub areas: Option<serde_json::Value>,
    pub zone_type: Option<i64>,
    pub terminal_id: Option<i64>,
    /// Absent when the panel reports zero or less.
    pub voltage: Option<f64>,
    pub power: Option<f64>,
    pub visible: bool,
}

impl Zone {
    pub fn is_open(&self) -> bool {
        self.status > ZONE_STATUS_CLOSED
    }

    pub fn kind(&self) -> ZoneKind {
        ZoneKind::from_name(&self.name)
    }
}
