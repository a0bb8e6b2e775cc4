// ── Device domain types ──

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Area, Peripheral, Scenario, Zone};

/// One alarm panel with its child collections.
///
/// Children are keyed by their vendor id and keep the order the cloud
/// returned them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub serial_number: Option<String>,
    /// `"{family} {number}"`, trimmed.
    pub model: Option<String>,
    /// `"{major}.{minor}"`.
    pub firmware: Option<String>,
    pub voltage: Option<f64>,
    pub active_scenario: Option<i64>,
    pub network_status: Option<i64>,
    pub faults: i64,
    pub areas: IndexMap<i64, Area>,
    pub zones: IndexMap<i64, Zone>,
    pub scenarios: IndexMap<i64, Scenario>,
    pub peripherals: IndexMap<i64, Peripheral>,
    /// Passed through untouched.
    pub thermostats: Vec<Value>,
    pub blinds: Vec<Value>,
}

impl Device {
    pub fn area(&self, area_id: i64) -> Option<&Area> {
        self.areas.get(&area_id)
    }

    pub fn zone(&self, zone_id: i64) -> Option<&Zone> {
        self.zones.get(&zone_id)
    }

    pub fn scenario(&self, scenario_id: i64) -> Option<&Scenario> {
        self.scenarios.get(&scenario_id)
    }

    pub fn active_scenario(&self) -> Option<&Scenario> {
        self.active_scenario.and_then(|id| self.scenario(id))
    }

    /// Whether any area reports a live alarm.
    pub fn has_live_alarm(&self) -> bool {
        self.areas.values().any(|a| a.alarm)
    }

    pub fn open_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values().filter(|z| z.is_open())
    }
}
