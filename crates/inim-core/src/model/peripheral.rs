// ── Peripheral domain types ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A bus device: keypad, expander, siren, communicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peripheral {
    pub id: i64,
    pub peripheral_type: Option<i64>,
    pub name: String,
    pub firmware: Option<String>,
    pub voltage: Option<f64>,
    pub tamper: bool,
    pub missing: bool,
    pub enabled: bool,
    /// Decoded `Data` blob (signal levels and the like), when it parses.
    pub telemetry: Option<Map<String, Value>>,
}

impl Peripheral {
    /// Look up one telemetry member, e.g. `"SignalStrength"`.
    pub fn telemetry_value(&self, key: &str) -> Option<&Value> {
        self.telemetry.as_ref().and_then(|t| t.get(key))
    }
}
