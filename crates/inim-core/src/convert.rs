// ── API-to-domain type conversions ──
//
// Bridges raw `inim_api::models` payloads into the normalized model.
// Pure: no I/O, no clock beyond the caller-supplied timestamp. The only
// filtering rule is that a device needs a usable (present, non-zero) id.
// Duplicate ids keep the first record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use inim_api::models::{RawArea, RawDevice, RawPeripheral, RawScenario, RawZone};

use crate::model::{Area, ArmedStatus, Device, Peripheral, Scenario, Snapshot, Zone};

const DEFAULT_DEVICE_NAME: &str = "INIM Alarm";

// ── Helpers ────────────────────────────────────────────────────────

/// `"{family} {number}"` trimmed; `None` when both are blank.
fn compose_model(family: Option<&str>, number: Option<&str>) -> Option<String> {
    let model = format!("{} {}", family.unwrap_or(""), number.unwrap_or(""));
    let model = model.trim();
    (!model.is_empty()).then(|| model.to_owned())
}

/// `"{major}.{minor}"`, absent halves rendered empty.
fn compose_firmware(major: Option<&str>, minor: Option<&str>) -> Option<String> {
    if major.is_none() && minor.is_none() {
        return None;
    }
    Some(format!("{}.{}", major.unwrap_or(""), minor.unwrap_or("")))
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Decode the peripheral `Data` blob, which may be an object or a JSON
/// string holding one.
fn parse_telemetry(data: Option<&Value>) -> Option<Map<String, Value>> {
    match data? {
        Value::Object(map) => Some(map.clone()),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "unparsable peripheral data blob");
                None
            }
        },
        _ => None,
    }
}

/// Key child records by id, skipping those without one.
fn keyed<R, T>(raw: &[R], kind: &'static str, id: impl Fn(&R) -> Option<i64>) -> IndexMap<i64, T>
where
    T: for<'a> From<(i64, &'a R)>,
{
    let mut out = IndexMap::with_capacity(raw.len());
    for r in raw {
        let Some(id) = id(r) else {
            debug!(kind, "skipping record without id");
            continue;
        };
        if out.contains_key(&id) {
            warn!(kind, id, "duplicate id, keeping the first record");
            continue;
        }
        out.insert(id, T::from((id, r)));
    }
    out
}

// ── Children ───────────────────────────────────────────────────────

impl From<(i64, &RawArea)> for Area {
    fn from((id, a): (i64, &RawArea)) -> Self {
        Area {
            id,
            name: a.name.clone().unwrap_or_else(|| format!("Area {id}")),
            armed: a.armed.map(ArmedStatus::from_code).unwrap_or_default(),
            alarm: a.alarm,
            alarm_memory: a.alarm_memory,
            tamper: a.tamper,
            tamper_memory: a.tamper_memory,
            auto_insert: a.auto_insert,
        }
    }
}

impl From<(i64, &RawZone)> for Zone {
    fn from((id, z): (i64, &RawZone)) -> Self {
        Zone {
            id,
            name: z.name.clone().unwrap_or_else(|| format!("Zone {id}")),
            status: z.status.unwrap_or(crate::model::ZONE_STATUS_CLOSED),
            alarm_memory: z.alarm_memory,
            tamper_memory: z.tamper_memory,
            bypassed: z.bypassed,
            output_on: z.output_on,
            output_value: z.output_value,
            areas: z.areas.clone(),
            zone_type: z.zone_type,
            terminal_id: z.terminal_id,
            voltage: positive(z.voltage),
            power: positive(z.power),
            visible: z.visibility != Some(0),
        }
    }
}

impl From<(i64, &RawScenario)> for Scenario {
    fn from((id, s): (i64, &RawScenario)) -> Self {
        Scenario {
            id,
            name: s.name.clone().unwrap_or_else(|| format!("Scenario {id}")),
        }
    }
}

impl From<(i64, &RawPeripheral)> for Peripheral {
    fn from((id, p): (i64, &RawPeripheral)) -> Self {
        Peripheral {
            id,
            peripheral_type: p.peripheral_type,
            name: p.name.clone().unwrap_or_else(|| format!("Peripheral {id}")),
            firmware: p.firmware.clone(),
            voltage: p.voltage,
            tamper: p.tamper,
            missing: p.missing,
            enabled: p.enabled,
            telemetry: parse_telemetry(p.data.as_ref()),
        }
    }
}

// ── Device ─────────────────────────────────────────────────────────

/// A raw device without a usable id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingDeviceId;

impl TryFrom<&RawDevice> for Device {
    type Error = MissingDeviceId;

    fn try_from(d: &RawDevice) -> Result<Self, Self::Error> {
        let id = d.device_id.filter(|id| *id != 0).ok_or(MissingDeviceId)?;
        Ok(Device {
            id,
            name: d
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_owned()),
            serial_number: d.serial_number.clone(),
            model: compose_model(d.model_family.as_deref(), d.model_number.as_deref()),
            firmware: compose_firmware(
                d.firmware_version_major.as_deref(),
                d.firmware_version_minor.as_deref(),
            ),
            voltage: d.voltage,
            active_scenario: d.active_scenario,
            network_status: d.network_status,
            faults: d.faults.unwrap_or(0),
            areas: keyed(&d.areas, "area", |a| a.area_id),
            zones: keyed(&d.zones, "zone", |z| z.zone_id),
            scenarios: keyed(&d.scenarios, "scenario", |s| s.scenario_id),
            peripherals: keyed(&d.peripherals, "peripheral", |p| p.item_id),
            thermostats: d.thermostats.clone(),
            blinds: d.blinds.clone(),
        })
    }
}

/// Build a complete snapshot from the raw device list.
pub fn build_snapshot(raw: &[RawDevice], fetched_at: DateTime<Utc>) -> Snapshot {
    let mut devices = IndexMap::with_capacity(raw.len());
    for d in raw {
        let Ok(device) = Device::try_from(d) else {
            warn!(name = ?d.name, "skipping device without a usable id");
            continue;
        };
        if devices.contains_key(&device.id) {
            warn!(id = device.id, "duplicate device id, keeping the first record");
            continue;
        }
        devices.insert(device.id, Arc::new(device));
    }
    Snapshot {
        devices,
        fetched_at: Some(fetched_at),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawDevice {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn model_is_trimmed_concatenation() {
        assert_eq!(
            compose_model(Some("NEXT"), Some("128")).as_deref(),
            Some("NEXT 128")
        );
        assert_eq!(compose_model(Some("NEXT"), None).as_deref(), Some("NEXT"));
        assert_eq!(compose_model(None, Some("128")).as_deref(), Some("128"));
        assert_eq!(compose_model(None, None), None);
    }

    #[test]
    fn firmware_from_parts() {
        assert_eq!(
            compose_firmware(Some("6"), Some("07")).as_deref(),
            Some("6.07")
        );
        assert_eq!(compose_firmware(Some("6"), None).as_deref(), Some("6."));
        assert_eq!(compose_firmware(None, None), None);
    }

    #[test]
    fn full_device_conversion() {
        let device = Device::try_from(&raw(json!({
            "DeviceId": 42,
            "Name": "Casa",
            "SerialNumber": "SN123",
            "ModelFamily": "SmartLiving",
            "ModelNumber": "1050",
            "FirmwareVersionMajor": 6,
            "FirmwareVersionMinor": 7,
            "Voltage": 13.7,
            "ActiveScenario": 1,
            "NetworkStatus": 0,
            "Areas": [
                { "AreaId": 2, "Name": "Giorno", "Armed": 1, "Alarm": 1 },
                { "AreaId": 1, "Armed": null }
            ],
            "Zones": [
                { "ZoneId": 5, "Name": "PIR sala", "Status": 2, "Voltage": 0, "Power": 1.5, "Visibility": 0 },
                { "Name": "no id" }
            ],
            "Scenarios": [{ "ScenarioId": 0, "Name": "TOTALE" }],
            "Peripherals": [{ "ItemId": 3, "Name": "Nexus", "Data": "{\"Signal\": 4}" }]
        })))
        .unwrap();

        assert_eq!(device.model.as_deref(), Some("SmartLiving 1050"));
        assert_eq!(device.firmware.as_deref(), Some("6.7"));
        assert_eq!(device.faults, 0);

        let area_ids: Vec<_> = device.areas.keys().copied().collect();
        assert_eq!(area_ids, vec![2, 1]);
        assert!(device.areas[&2].alarm);
        assert_eq!(device.areas[&1].name, "Area 1");
        assert_eq!(device.areas[&1].armed, ArmedStatus::Disarmed);

        assert_eq!(device.zones.len(), 1);
        let zone = &device.zones[&5];
        assert!(zone.is_open());
        assert!(!zone.visible);
        assert_eq!(zone.voltage, None);
        assert_eq!(zone.power, Some(1.5));

        let peripheral = &device.peripherals[&3];
        assert_eq!(peripheral.telemetry_value("Signal"), Some(&json!(4)));
    }

    #[test]
    fn devices_without_usable_id_are_excluded() {
        let snapshot = build_snapshot(
            &[
                raw(json!({ "Name": "no id" })),
                raw(json!({ "DeviceId": 0 })),
                raw(json!({ "DeviceId": 7 })),
            ],
            Utc::now(),
        );
        assert_eq!(snapshot.devices.len(), 1);
        assert_eq!(snapshot.device(7).unwrap().name, "INIM Alarm");
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let snapshot = build_snapshot(
            &[
                raw(json!({ "DeviceId": 7, "Name": "A" })),
                raw(json!({ "DeviceId": 7, "Name": "B" })),
                raw(json!({ "DeviceId": 8, "Name": "C" })),
            ],
            Utc::now(),
        );
        let names: Vec<_> = snapshot.devices.values().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);

        let device = Device::try_from(&raw(json!({
            "DeviceId": 1,
            "Areas": [
                { "AreaId": 3, "Name": "Primo" },
                { "AreaId": 3, "Name": "Secondo" }
            ]
        })))
        .unwrap();
        assert_eq!(device.areas.len(), 1);
        assert_eq!(device.areas[&3].name, "Primo");
    }

    #[test]
    fn zero_device_id_is_not_addressable() {
        assert_eq!(
            Device::try_from(&raw(json!({ "DeviceId": 0 }))).unwrap_err(),
            MissingDeviceId
        );
    }

    #[test]
    fn bad_telemetry_degrades_to_none() {
        assert_eq!(parse_telemetry(Some(&json!("not json"))), None);
        assert_eq!(parse_telemetry(Some(&json!("[1,2]"))), None);
        assert_eq!(parse_telemetry(None), None);
        assert!(parse_telemetry(Some(&json!({ "a": 1 }))).is_some());
    }
}
