// INIM Cloud response types
//
// Models for the `GetDevicesExtended` payload. The cloud is loose about
// types: flags arrive as `true` or `1`, ids as numbers or strings, lists as
// `null`. Every field is optional with a tolerant deserializer, and unknown
// members land in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Device ───────────────────────────────────────────────────────────

/// One alarm panel as reported by `GetDevicesExtended`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawDevice {
    #[serde(default, deserialize_with = "de::int")]
    pub device_id: Option<i64>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub serial_number: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub model_family: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub model_number: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub firmware_version_major: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub firmware_version_minor: Option<String>,
    #[serde(default, deserialize_with = "de::float")]
    pub voltage: Option<f64>,
    #[serde(default, deserialize_with = "de::int")]
    pub active_scenario: Option<i64>,
    #[serde(default, deserialize_with = "de::int")]
    pub network_status: Option<i64>,
    #[serde(default, deserialize_with = "de::int")]
    pub faults: Option<i64>,
    #[serde(default, deserialize_with = "de::list")]
    pub areas: Vec<RawArea>,
    #[serde(default, deserialize_with = "de::list")]
    pub zones: Vec<RawZone>,
    #[serde(default, deserialize_with = "de::list")]
    pub scenarios: Vec<RawScenario>,
    #[serde(default, deserialize_with = "de::list")]
    pub peripherals: Vec<RawPeripheral>,
    #[serde(default, deserialize_with = "de::list")]
    pub thermostats: Vec<Value>,
    #[serde(default, deserialize_with = "de::list")]
    pub blinds: Vec<Value>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Area ─────────────────────────────────────────────────────────────

/// A partition of the protected premises.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawArea {
    #[serde(default, deserialize_with = "de::int")]
    pub area_id: Option<i64>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: Option<String>,
    /// 1 armed, 2/3 partial, 4 disarmed.
    #[serde(default, deserialize_with = "de::int")]
    pub armed: Option<i64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub alarm: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub alarm_memory: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub tamper: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub tamper_memory: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub auto_insert: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Zone ─────────────────────────────────────────────────────────────

/// A single sensor input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawZone {
    #[serde(default, deserialize_with = "de::int")]
    pub zone_id: Option<i64>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: Option<String>,
    /// 1 closed, anything greater is open.
    #[serde(default, deserialize_with = "de::int")]
    pub status: Option<i64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub alarm_memory: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub tamper_memory: bool,
    #[serde(default, alias = "Bypass", deserialize_with = "de::flag")]
    pub bypassed: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub output_on: bool,
    #[serde(default, deserialize_with = "de::int")]
    pub output_value: Option<i64>,
    #[serde(default)]
    pub areas: Option<Value>,
    #[serde(default, rename = "Type", deserialize_with = "de::int")]
    pub zone_type: Option<i64>,
    #[serde(default, deserialize_with = "de::int")]
    pub terminal_id: Option<i64>,
    #[serde(default, deserialize_with = "de::float")]
    pub voltage: Option<f64>,
    #[serde(default, deserialize_with = "de::float")]
    pub power: Option<f64>,
    /// 0 hides the zone in the vendor app.
    #[serde(default, deserialize_with = "de::int")]
    pub visibility: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Scenario ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawScenario {
    #[serde(default, deserialize_with = "de::int")]
    pub scenario_id: Option<i64>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Peripheral ───────────────────────────────────────────────────────

/// Keypads, expanders, sirens and other bus devices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPeripheral {
    #[serde(default, deserialize_with = "de::int")]
    pub item_id: Option<i64>,
    #[serde(default, rename = "Type", deserialize_with = "de::int")]
    pub peripheral_type: Option<i64>,
    #[serde(default, deserialize_with = "de::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::string")]
    pub firmware: Option<String>,
    #[serde(default, deserialize_with = "de::float")]
    pub voltage: Option<f64>,
    #[serde(default, deserialize_with = "de::flag")]
    pub tamper: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub missing: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub enabled: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ── Tolerant deserializers ───────────────────────────────────────────

mod de {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// `true`, non-zero numbers and `"1"`/`"true"` are set; everything
    /// else, `null` included, is clear.
    pub(super) fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            Value::String(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s.parse::<f64>().is_ok_and(|v| v != 0.0)
            }
            _ => false,
        })
    }

    pub(super) fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|v| v.fract() == 0.0)
                    .and_then(|v| format!("{v:.0}").parse().ok())
            }),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(i64::from(b)),
            _ => None,
        })
    }

    pub(super) fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Strings as-is, numbers rendered; used for names and firmware parts.
    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// `null` or a non-list becomes empty; malformed elements are skipped.
    pub(super) fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
