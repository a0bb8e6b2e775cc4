// ── Alarm event ──

use serde::{Deserialize, Serialize};

/// Raised once per rising edge of an area's live alarm flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub device_id: i64,
    pub device_name: String,
    pub area_id: i64,
    pub area_name: String,
}
