// Vendor operations
//
// Each operation builds its method-specific `Params` and goes through
// `Session::call`. Code-protected operations check the user code before
// touching the network.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::info;

use crate::error::Error;
use crate::models::RawDevice;
use crate::protocol::{Context, Method, Request};
use crate::session::Session;

/// Opaque field mask asking `GetDevicesExtended` for the full payload.
const DEVICES_INFO_MASK: &str = "16908287";

/// `RequestPoll` type for an intrusion-panel poll.
const POLL_TYPE_INTRUSION: i64 = 5;

/// `InsertZone` modes.
const ZONE_MODE_BYPASS: i64 = 3;
const ZONE_MODE_NORMAL: i64 = 0;

/// `InsertAreas` modes.
const AREA_MODE_ARM: i64 = 0;
const AREA_MODE_DISARM: i64 = 3;

fn require_code<'a>(
    user_code: &'a SecretString,
    operation: &'static str,
) -> Result<&'a str, Error> {
    let code = user_code.expose_secret();
    if code.trim().is_empty() {
        return Err(Error::MissingUserCode { operation });
    }
    Ok(code)
}

impl Session {
    /// Fetch every panel on the account and cache the raw list.
    pub async fn get_devices(&self) -> Result<Vec<RawDevice>, Error> {
        let request = Request::app(
            Method::GetDevicesExtended,
            Context::Null,
            json!({ "Info": DEVICES_INFO_MASK }),
        );
        let data = self.call(&request).await?;
        let devices = parse_devices(data)?;
        self.cache_devices(devices.clone()).await;
        Ok(devices)
    }

    /// Run a panel scenario. The scenario id is not validated here.
    pub async fn activate_scenario(&self, device_id: i64, scenario_id: i64) -> Result<(), Error> {
        let request = Request::app(
            Method::ActivateScenario,
            Context::Null,
            json!({ "ScenarioId": scenario_id, "DeviceId": device_id }),
        );
        self.call(&request).await?;
        info!(device_id, scenario_id, "scenario activated");
        Ok(())
    }

    /// Bypass a zone (`bypass = true`) or reinstate it.
    pub async fn bypass_zone(
        &self,
        device_id: i64,
        zone_id: i64,
        user_code: &SecretString,
        bypass: bool,
    ) -> Result<(), Error> {
        let code = require_code(user_code, "bypass a zone")?;
        let mode = if bypass {
            ZONE_MODE_BYPASS
        } else {
            ZONE_MODE_NORMAL
        };
        let request = Request::app(
            Method::InsertZone,
            Context::Omitted,
            json!({
                "ZoneId": zone_id,
                "Mode": mode,
                "DeviceId": device_id.to_string(),
                "Code": code,
                "Value": 0,
            }),
        );
        self.call(&request).await?;
        info!(
            device_id,
            zone_id,
            action = if bypass { "bypassed" } else { "reinstated" },
            "zone updated"
        );
        Ok(())
    }

    /// Arm or disarm a batch of areas in one call.
    pub async fn insert_areas(
        &self,
        device_id: i64,
        area_ids: &[i64],
        user_code: &SecretString,
        arm: bool,
    ) -> Result<(), Error> {
        let code = require_code(user_code, if arm { "arm areas" } else { "disarm areas" })?;
        let mode = if arm { AREA_MODE_ARM } else { AREA_MODE_DISARM };
        let request = Request::app(
            Method::InsertAreas,
            Context::Omitted,
            json!({
                "AreaIds": area_ids,
                "Mode": mode,
                "DeviceId": device_id.to_string(),
                "Code": code,
            }),
        );
        self.call(&request).await?;
        info!(
            device_id,
            ?area_ids,
            action = if arm { "armed" } else { "disarmed" },
            "areas updated"
        );
        Ok(())
    }

    /// Ask the cloud to query the physical panel instead of serving its cache.
    pub async fn request_poll(&self, device_id: i64) -> Result<(), Error> {
        let request = Request {
            node: "",
            name: self.client_name().to_owned(),
            method: Method::RequestPoll,
            context: Context::Named("intrusion"),
            params: json!({ "DeviceId": device_id, "Type": POLL_TYPE_INTRUSION }),
        };
        self.call(&request).await?;
        Ok(())
    }
}

/// Extract `Data.Devices`; an absent or null list is empty.
fn parse_devices(data: Value) -> Result<Vec<RawDevice>, Error> {
    let devices = match data {
        Value::Object(mut map) => map.remove("Devices").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    match devices {
        Value::Null => Ok(Vec::new()),
        other => {
            let body = other.to_string();
            serde_json::from_value(other).map_err(|e| Error::Deserialization {
                message: format!("malformed device list: {e}"),
                body,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn blank_codes_are_rejected() {
        for code in ["", "   "] {
            let err = require_code(&SecretString::from(code), "bypass a zone").unwrap_err();
            assert!(matches!(
                err,
                Error::MissingUserCode {
                    operation: "bypass a zone"
                }
            ));
        }
        assert_eq!(
            require_code(&SecretString::from("1234"), "arm areas").unwrap(),
            "1234"
        );
    }

    #[test]
    fn devices_missing_or_null_is_empty() {
        assert!(parse_devices(Value::Null).unwrap().is_empty());
        assert!(parse_devices(json!({})).unwrap().is_empty());
        assert!(parse_devices(json!({ "Devices": null })).unwrap().is_empty());
    }

    #[test]
    fn devices_are_parsed_in_order() {
        let devices = parse_devices(json!({
            "Devices": [{ "DeviceId": 7, "Name": "A" }, { "DeviceId": 9, "Name": "B" }]
        }))
        .unwrap();
        let ids: Vec<_> = devices.iter().map(|d| d.device_id).collect();
        assert_eq!(ids, vec![Some(7), Some(9)]);
    }

    #[test]
    fn non_list_devices_is_an_error() {
        let err = parse_devices(json!({ "Devices": "nope" })).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
