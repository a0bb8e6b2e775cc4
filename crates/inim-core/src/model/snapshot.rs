// ── Snapshot ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use super::{Area, Device, Scenario, Zone};

/// Materialized state of every panel on the account.
///
/// Built wholesale per refresh and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub devices: IndexMap<i64, Arc<Device>>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn device(&self, device_id: i64) -> Option<&Arc<Device>> {
        self.devices.get(&device_id)
    }

    pub fn area(&self, device_id: i64, area_id: i64) -> Option<&Area> {
        self.device(device_id)?.area(area_id)
    }

    pub fn zone(&self, device_id: i64, zone_id: i64) -> Option<&Zone> {
        self.device(device_id)?.zone(zone_id)
    }

    pub fn scenario(&self, device_id: i64, scenario_id: i64) -> Option<&Scenario> {
        self.device(device_id)?.scenario(scenario_id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &Arc<Device>> {
        self.devices.values()
    }
}
