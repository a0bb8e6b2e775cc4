#![allow(clippy::unwrap_used)]
// Integration tests for `Coordinator` against a wiremock INIM Cloud.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use inim_api::Transport;
use inim_core::{
    AlarmState, CommandResult, Coordinator, CoordinatorConfig, CoreError, Credentials,
    RefreshStatus, ScenarioOverrides, SecretString, Session,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn decoded(request: &Request) -> Option<Value> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == "req")
        .and_then(|(_, v)| serde_json::from_str(&v).ok())
}

struct ReqMethod(&'static str);

impl Match for ReqMethod {
    fn matches(&self, request: &Request) -> bool {
        decoded(request).is_some_and(|req| req["Method"] == self.0)
    }
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "Status": 0, "Data": data }))
}

fn panel(area_alarm: bool, active_scenario: i64) -> Value {
    json!({
        "Devices": [{
            "DeviceId": 42,
            "Name": "Casa",
            "SerialNumber": "SN-0042-SECRET",
            "ModelFamily": "SmartLiving",
            "ModelNumber": "1050",
            "FirmwareVersionMajor": 6,
            "FirmwareVersionMinor": 7,
            "ActiveScenario": active_scenario,
            "Areas": [
                { "AreaId": 1, "Name": "Giorno", "Armed": 1, "Alarm": area_alarm },
                { "AreaId": 2, "Name": "Notte", "Armed": 4, "Alarm": false }
            ],
            "Zones": [
                { "ZoneId": 5, "Name": "Porta ingresso", "Status": 1 }
            ],
            "Scenarios": [
                { "ScenarioId": 0, "Name": "TOTALE" },
                { "ScenarioId": 1, "Name": "SPENTO" },
                { "ScenarioId": 2, "Name": "NOTTE" }
            ]
        }]
    })
}

async fn setup(config: CoordinatorConfig) -> (MockServer, Coordinator) {
    let server = MockServer::start().await;
    Mock::given(ReqMethod("RegisterClient"))
        .respond_with(ok(json!({ "Token": "tok-1", "TTL": 3600 })))
        .mount(&server)
        .await;

    let session = Session::with_transport(
        Transport::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap()),
        "inimctl-test",
        Credentials::new("user@example.com", SecretString::from("hunter2")),
    );
    (server, Coordinator::new(Arc::new(session), config))
}

async fn mount_devices_once(server: &MockServer, data: Value) {
    Mock::given(ReqMethod("GetDevicesExtended"))
        .respond_with(ok(data))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

fn with_code() -> CoordinatorConfig {
    CoordinatorConfig {
        user_code: Some(SecretString::from("97531864")),
        ..CoordinatorConfig::default()
    }
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_builds_snapshot() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    mount_devices_once(&server, panel(false, 1)).await;

    assert_eq!(coordinator.current_status(), RefreshStatus::Pending);
    assert!(!coordinator.has_data());

    let events = coordinator.refresh().await.unwrap();
    assert!(events.is_empty());
    assert!(coordinator.current_status().is_available());

    let device = coordinator.get_device(42).unwrap();
    assert_eq!(device.model.as_deref(), Some("SmartLiving 1050"));
    assert_eq!(device.firmware.as_deref(), Some("6.7"));
    assert_eq!(coordinator.get_area(42, 2).unwrap().name, "Notte");
    assert!(!coordinator.get_zone(42, 5).unwrap().is_open());
    assert_eq!(coordinator.get_scenario(42, 2).unwrap().name, "NOTTE");
    assert_eq!(coordinator.get_active_scenario(42).unwrap().name, "SPENTO");
    assert_eq!(coordinator.alarm_state(42), Some(AlarmState::Disarmed));
    assert!(coordinator.get_device(7).is_none());
    assert_eq!(coordinator.devices().len(), 1);
}

#[tokio::test]
async fn test_missing_active_scenario_is_unknown_state() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    let mut data = panel(false, 0);
    data["Devices"][0]
        .as_object_mut()
        .unwrap()
        .remove("ActiveScenario");
    mount_devices_once(&server, data).await;

    coordinator.refresh().await.unwrap();

    assert!(coordinator.get_device(42).is_some());
    assert_eq!(coordinator.alarm_state(42), None);
}

#[tokio::test]
async fn test_alarm_events_fire_on_rising_edges_only() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    for flag in [false, true, true, false, true] {
        mount_devices_once(&server, panel(flag, 0)).await;
    }
    let mut alarms = coordinator.subscribe_alarms();

    let mut returned = Vec::new();
    for _ in 0..5 {
        returned.extend(coordinator.refresh().await.unwrap());
    }

    assert_eq!(returned.len(), 2);
    for event in &returned {
        assert_eq!(event.device_id, 42);
        assert_eq!(event.device_name, "Casa");
        assert_eq!(event.area_id, 1);
        assert_eq!(event.area_name, "Giorno");
    }

    let mut broadcast = 0;
    while alarms.try_recv().is_ok() {
        broadcast += 1;
    }
    assert_eq!(broadcast, 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    mount_devices_once(&server, panel(false, 1)).await;
    Mock::given(ReqMethod("GetDevicesExtended"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "Status": 3, "ErrMsg": "busy" })),
        )
        .mount(&server)
        .await;

    coordinator.refresh().await.unwrap();
    let err = coordinator.refresh().await.unwrap_err();

    assert!(
        matches!(&err, CoreError::RefreshFailed { .. }),
        "expected RefreshFailed, got: {err:?}"
    );
    assert!(matches!(err.root(), CoreError::Api { code: 3, .. }));
    assert!(coordinator.get_device(42).is_some());
    assert!(matches!(
        coordinator.current_status(),
        RefreshStatus::Degraded { .. }
    ));
}

#[tokio::test]
async fn test_empty_device_list_is_not_an_error() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    mount_devices_once(&server, json!({ "Devices": [] })).await;

    assert!(coordinator.refresh().await.unwrap().is_empty());
    assert!(coordinator.snapshot().is_empty());
    assert!(coordinator.has_data());
    assert!(coordinator.current_status().is_available());
}

#[tokio::test]
async fn test_poll_before_refresh_polls_known_devices() {
    let config = CoordinatorConfig {
        poll_before_refresh: true,
        ..CoordinatorConfig::default()
    };
    let (server, coordinator) = setup(config).await;
    Mock::given(ReqMethod("GetDevicesExtended"))
        .respond_with(ok(panel(false, 1)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(ReqMethod("RequestPoll"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    // Nothing known yet on the first pass, one device on the second.
    coordinator.refresh().await.unwrap();
    coordinator.refresh().await.unwrap();
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unknown_scenario_is_rejected_locally() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    mount_devices_once(&server, panel(false, 1)).await;
    Mock::given(ReqMethod("ActivateScenario"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    coordinator.refresh().await.unwrap();
    let err = coordinator.activate_scenario(42, 9).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::ScenarioNotFound {
            device_id: 42,
            scenario_id: 9
        }
    ));
    assert!(matches!(
        coordinator.activate_scenario(7, 0).await.unwrap_err(),
        CoreError::DeviceNotFound { device_id: 7 }
    ));
}

#[tokio::test]
async fn test_arm_and_disarm_use_resolved_scenarios() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    mount_devices_once(&server, panel(false, 1)).await;
    Mock::given(ReqMethod("ActivateScenario"))
        .respond_with(ok(json!({})))
        .expect(3)
        .mount(&server)
        .await;

    coordinator.refresh().await.unwrap();

    assert_eq!(
        coordinator.arm_away(42).await.unwrap(),
        CommandResult::ScenarioActivated {
            device_id: 42,
            scenario_id: 0
        }
    );
    assert_eq!(
        coordinator.arm_home(42).await.unwrap(),
        CommandResult::ScenarioActivated {
            device_id: 42,
            scenario_id: 2
        }
    );
    assert_eq!(
        coordinator.disarm(42).await.unwrap(),
        CommandResult::ScenarioActivated {
            device_id: 42,
            scenario_id: 1
        }
    );

    let sent: Vec<i64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(decoded)
        .filter(|r| r["Method"] == "ActivateScenario")
        .map(|r| r["Params"]["ScenarioId"].as_i64().unwrap())
        .collect();
    assert_eq!(sent, vec![0, 2, 1]);
}

#[tokio::test]
async fn test_scenario_overrides_are_used() {
    let config = CoordinatorConfig {
        scenarios: ScenarioOverrides {
            away: Some(2),
            home: None,
            disarm: None,
        },
        ..CoordinatorConfig::default()
    };
    let (server, coordinator) = setup(config).await;
    mount_devices_once(&server, panel(false, 2)).await;

    coordinator.refresh().await.unwrap();

    assert_eq!(coordinator.scenario_selection(42).unwrap().away, 2);
    assert_eq!(coordinator.alarm_state(42), Some(AlarmState::ArmedAway));
}

#[tokio::test]
async fn test_repeated_activation_is_idempotent() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    mount_devices_once(&server, panel(false, 1)).await;
    mount_devices_once(&server, panel(false, 0)).await;
    Mock::given(ReqMethod("ActivateScenario"))
        .respond_with(ok(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    coordinator.refresh().await.unwrap();
    coordinator.activate_scenario(42, 0).await.unwrap();
    coordinator.activate_scenario(42, 0).await.unwrap();
    coordinator.refresh().await.unwrap();

    assert_eq!(coordinator.get_device(42).unwrap().active_scenario, Some(0));
    assert_eq!(coordinator.alarm_state(42), Some(AlarmState::ArmedAway));
}

#[tokio::test]
async fn test_code_protected_commands_need_a_user_code() {
    let (server, coordinator) = setup(CoordinatorConfig::default()).await;
    mount_devices_once(&server, panel(false, 1)).await;
    Mock::given(ReqMethod("InsertZone"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(ReqMethod("InsertAreas"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    coordinator.refresh().await.unwrap();

    assert!(matches!(
        coordinator.bypass_zone(42, 5, true).await.unwrap_err(),
        CoreError::Config { .. }
    ));
    assert!(matches!(
        coordinator.set_areas(42, vec![1], true).await.unwrap_err(),
        CoreError::Config { .. }
    ));
}

#[tokio::test]
async fn test_bypass_and_area_commands() {
    let (server, coordinator) = setup(with_code()).await;
    mount_devices_once(&server, panel(false, 1)).await;
    Mock::given(ReqMethod("InsertZone"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(ReqMethod("InsertAreas"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    coordinator.refresh().await.unwrap();

    coordinator.bypass_zone(42, 5, true).await.unwrap();
    coordinator.set_areas(42, vec![1, 2], false).await.unwrap();

    assert!(matches!(
        coordinator.bypass_zone(42, 99, true).await.unwrap_err(),
        CoreError::ZoneNotFound { zone_id: 99, .. }
    ));
    assert!(matches!(
        coordinator.set_areas(42, vec![1, 8], true).await.unwrap_err(),
        CoreError::AreaNotFound { area_id: 8, .. }
    ));
}

// ── Diagnostics & polling ───────────────────────────────────────────

#[tokio::test]
async fn test_diagnostics_are_redacted() {
    let (server, coordinator) = setup(with_code()).await;
    mount_devices_once(&server, panel(false, 1)).await;
    coordinator.refresh().await.unwrap();

    let diagnostics = coordinator.diagnostics().await;
    assert!(diagnostics.authenticated);
    assert_eq!(diagnostics.token_ttl, Some(3600));
    assert_eq!(diagnostics.cached_raw_devices, 1);
    assert!(diagnostics.user_code_configured);
    assert_eq!(diagnostics.devices[0].area_count, 2);

    let dump = serde_json::to_string(&diagnostics).unwrap();
    for secret in ["SN-0042-SECRET", "hunter2", "tok-1", "97531864", "inimctl-"] {
        assert!(!dump.contains(secret), "diagnostics leaked {secret}");
    }
    assert!(dump.contains("**REDACTED**"));
}

#[tokio::test]
async fn test_polling_task_stops_on_cancel() {
    let config = CoordinatorConfig {
        refresh_interval: Duration::from_secs(3600),
        ..CoordinatorConfig::default()
    };
    let (_server, coordinator) = setup(config).await;

    let cancel = CancellationToken::new();
    let handle = coordinator.spawn_polling(cancel.clone());
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
}
