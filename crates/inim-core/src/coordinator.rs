// ── Update coordinator ──
//
// Owns the session, the last good snapshot and the alarm edge tracker.
// Refreshes are sequential; a failed refresh keeps serving the previous
// snapshot and flips the published status to `Degraded`. Commands are
// validated against the snapshot and routed to the session but never
// trigger a refresh themselves.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use inim_api::Session;
use secrecy::SecretString;

use crate::alarm::{AlarmState, ScenarioSelection, device_alarm_state};
use crate::command::{Command, CommandResult};
use crate::config::CoordinatorConfig;
use crate::convert::build_snapshot;
use crate::error::CoreError;
use crate::model::{AlarmEvent, Area, Device, Scenario, Snapshot, Zone};
use crate::store::SnapshotStore;

const ALARM_CHANNEL_SIZE: usize = 64;

/// `tokio::time::interval` panics on a zero period.
const MIN_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Placeholder for redacted values in diagnostics.
pub const REDACTED: &str = "**REDACTED**";

// ── RefreshStatus ────────────────────────────────────────────────

/// Data availability as seen by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RefreshStatus {
    /// No refresh has completed yet.
    Pending,
    Available { at: DateTime<Utc> },
    /// The last refresh failed; the previous snapshot is still served.
    Degraded {
        error: String,
        since: DateTime<Utc>,
    },
}

impl RefreshStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

// ── Diagnostics ──────────────────────────────────────────────────

/// Redacted state dump for bug reports.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub authenticated: bool,
    pub token_ttl: Option<u64>,
    pub cached_raw_devices: usize,
    pub refresh_status: RefreshStatus,
    pub refresh_interval_secs: u64,
    pub user_code_configured: bool,
    pub poll_before_refresh: bool,
    pub devices: Vec<DeviceSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceSummary {
    pub device_id: i64,
    pub name: String,
    pub serial_number: Option<&'static str>,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub area_count: usize,
    pub zone_count: usize,
    pub scenario_count: usize,
    pub peripheral_count: usize,
    pub thermostat_count: usize,
    pub active_scenario: Option<i64>,
    pub network_status: Option<i64>,
    pub faults: i64,
    pub scenarios: ScenarioSelection,
    pub alarm_state: Option<AlarmState>,
}

// ── Coordinator ──────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    session: Arc<Session>,
    config: CoordinatorConfig,
    store: SnapshotStore,
    status: watch::Sender<RefreshStatus>,
    alarm_tx: broadcast::Sender<AlarmEvent>,
    refresh_lock: Mutex<()>,
}

impl Coordinator {
    /// Create a coordinator. Does not touch the network; call
    /// [`refresh()`](Self::refresh) to load the first snapshot.
    pub fn new(session: Arc<Session>, config: CoordinatorConfig) -> Self {
        let (status, _) = watch::channel(RefreshStatus::Pending);
        let (alarm_tx, _) = broadcast::channel(ALARM_CHANNEL_SIZE);
        Self {
            inner: Arc::new(CoordinatorInner {
                session,
                config,
                store: SnapshotStore::new(),
                status,
                alarm_tx,
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    // ── Refresh ──────────────────────────────────────────────────

    /// Fetch, rebuild and swap in a new snapshot.
    ///
    /// Returns the alarm events raised by this cycle (also broadcast to
    /// [`subscribe_alarms`](Self::subscribe_alarms)). On failure the
    /// previous snapshot stays in place and the status turns `Degraded`.
    pub async fn refresh(&self) -> Result<Vec<AlarmEvent>, CoreError> {
        let _guard = self.inner.refresh_lock.lock().await;

        let snapshot = match self.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let since = match &*self.inner.status.borrow() {
                    RefreshStatus::Degraded { since, .. } => *since,
                    _ => Utc::now(),
                };
                self.inner.status.send_replace(RefreshStatus::Degraded {
                    error: e.to_string(),
                    since,
                });
                return Err(CoreError::refresh_failed(e));
            }
        };

        if snapshot.is_empty() {
            warn!("no devices found in INIM Cloud");
        }
        let device_count = snapshot.devices.len();

        let events = self.inner.store.apply(snapshot);
        for event in &events {
            warn!(
                device_id = event.device_id,
                area_id = event.area_id,
                area = %event.area_name,
                "alarm triggered"
            );
            // No subscribers is fine.
            let _ = self.inner.alarm_tx.send(event.clone());
        }

        self.inner
            .status
            .send_replace(RefreshStatus::Available { at: Utc::now() });
        debug!(devices = device_count, alarms = events.len(), "refresh complete");
        Ok(events)
    }

    async fn fetch(&self) -> Result<Snapshot, CoreError> {
        let session = &self.inner.session;
        if self.inner.config.poll_before_refresh {
            let known: Vec<i64> = self.inner.store.snapshot().devices.keys().copied().collect();
            for device_id in known {
                session.request_poll(device_id).await?;
            }
        }
        let raw = session.get_devices().await?;
        Ok(build_snapshot(&raw, Utc::now()))
    }

    // ── Background polling ───────────────────────────────────────

    /// Spawn the periodic refresh loop.
    ///
    /// One refresh at a time; the next tick waits for the previous
    /// refresh to finish. Failures are logged and retried next tick.
    pub fn spawn_polling(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            let period = coordinator.inner.config.refresh_interval.max(MIN_POLL_PERIOD);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(e) = coordinator.refresh().await {
                            warn!(error = %e, auth = e.is_auth(), "periodic refresh failed");
                        }
                    }
                }
            }
            debug!("polling stopped");
        })
    }

    // ── State observation ────────────────────────────────────────

    pub fn refresh_status(&self) -> watch::Receiver<RefreshStatus> {
        self.inner.status.subscribe()
    }

    pub fn current_status(&self) -> RefreshStatus {
        self.inner.status.borrow().clone()
    }

    pub fn subscribe_alarms(&self) -> broadcast::Receiver<AlarmEvent> {
        self.inner.alarm_tx.subscribe()
    }

    // ── Lookups ──────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.store.snapshot()
    }

    /// Whether at least one refresh has succeeded.
    pub fn has_data(&self) -> bool {
        self.inner.store.is_loaded()
    }

    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.snapshot().devices().cloned().collect()
    }

    pub fn get_device(&self, device_id: i64) -> Option<Arc<Device>> {
        self.snapshot().device(device_id).cloned()
    }

    pub fn get_area(&self, device_id: i64, area_id: i64) -> Option<Area> {
        self.snapshot().area(device_id, area_id).cloned()
    }

    pub fn get_zone(&self, device_id: i64, zone_id: i64) -> Option<Zone> {
        self.snapshot().zone(device_id, zone_id).cloned()
    }

    pub fn get_scenario(&self, device_id: i64, scenario_id: i64) -> Option<Scenario> {
        self.snapshot().scenario(device_id, scenario_id).cloned()
    }

    /// The scenario matching the device's active-scenario id, if known.
    pub fn get_active_scenario(&self, device_id: i64) -> Option<Scenario> {
        self.get_device(device_id)?.active_scenario().cloned()
    }

    /// Configured or auto-detected scenario ids for a device.
    pub fn scenario_selection(&self, device_id: i64) -> Option<ScenarioSelection> {
        let device = self.get_device(device_id)?;
        Some(ScenarioSelection::for_device(
            &device,
            self.inner.config.scenarios,
        ))
    }

    /// `None` for an unknown device or one with no active scenario.
    pub fn alarm_state(&self, device_id: i64) -> Option<AlarmState> {
        let device = self.get_device(device_id)?;
        let selection = ScenarioSelection::for_device(&device, self.inner.config.scenarios);
        device_alarm_state(&device, selection)
    }

    fn require_device(&self, device_id: i64) -> Result<Arc<Device>, CoreError> {
        self.get_device(device_id)
            .ok_or(CoreError::DeviceNotFound { device_id })
    }

    fn require_user_code(&self) -> Result<&SecretString, CoreError> {
        self.inner
            .config
            .user_code
            .as_ref()
            .ok_or_else(|| CoreError::Config {
                message: "no user code configured".into(),
            })
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Validate a command against the current snapshot and run it.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let session = &self.inner.session;
        debug!(device_id = cmd.device_id(), "executing command");
        match cmd {
            Command::ActivateScenario {
                device_id,
                scenario_id,
            } => self.run_scenario(device_id, scenario_id).await,

            Command::ArmAway { device_id } => {
                let selection = self.selection_for(device_id)?;
                self.run_scenario(device_id, selection.away).await
            }
            Command::ArmHome { device_id } => {
                let selection = self.selection_for(device_id)?;
                self.run_scenario(device_id, selection.home).await
            }
            Command::Disarm { device_id } => {
                let selection = self.selection_for(device_id)?;
                self.run_scenario(device_id, selection.disarm).await
            }

            Command::BypassZone {
                device_id,
                zone_id,
                bypass,
            } => {
                let code = self.require_user_code()?;
                let device = self.require_device(device_id)?;
                if device.zone(zone_id).is_none() {
                    return Err(CoreError::ZoneNotFound { device_id, zone_id });
                }
                session.bypass_zone(device_id, zone_id, code, bypass).await?;
                Ok(CommandResult::Ok)
            }

            Command::SetAreas {
                device_id,
                area_ids,
                arm,
            } => {
                let code = self.require_user_code()?;
                if area_ids.is_empty() {
                    return Err(CoreError::Config {
                        message: "no areas given".into(),
                    });
                }
                let device = self.require_device(device_id)?;
                if let Some(&area_id) = area_ids.iter().find(|id| device.area(**id).is_none()) {
                    return Err(CoreError::AreaNotFound { device_id, area_id });
                }
                session.insert_areas(device_id, &area_ids, code, arm).await?;
                Ok(CommandResult::Ok)
            }

            Command::RequestPoll { device_id } => {
                self.require_device(device_id)?;
                session.request_poll(device_id).await?;
                Ok(CommandResult::Ok)
            }
        }
    }

    fn selection_for(&self, device_id: i64) -> Result<ScenarioSelection, CoreError> {
        self.scenario_selection(device_id)
            .ok_or(CoreError::DeviceNotFound { device_id })
    }

    async fn run_scenario(
        &self,
        device_id: i64,
        scenario_id: i64,
    ) -> Result<CommandResult, CoreError> {
        let device = self.require_device(device_id)?;
        let Some(scenario) = device.scenario(scenario_id) else {
            return Err(CoreError::ScenarioNotFound {
                device_id,
                scenario_id,
            });
        };
        debug!(device_id, scenario_id, scenario = %scenario.name, "activating scenario");
        self.inner
            .session
            .activate_scenario(device_id, scenario_id)
            .await?;
        Ok(CommandResult::ScenarioActivated {
            device_id,
            scenario_id,
        })
    }

    // ── Convenience wrappers ─────────────────────────────────────

    pub async fn activate_scenario(
        &self,
        device_id: i64,
        scenario_id: i64,
    ) -> Result<CommandResult, CoreError> {
        self.execute(Command::ActivateScenario {
            device_id,
            scenario_id,
        })
        .await
    }

    pub async fn arm_away(&self, device_id: i64) -> Result<CommandResult, CoreError> {
        self.execute(Command::ArmAway { device_id }).await
    }

    pub async fn arm_home(&self, device_id: i64) -> Result<CommandResult, CoreError> {
        self.execute(Command::ArmHome { device_id }).await
    }

    pub async fn disarm(&self, device_id: i64) -> Result<CommandResult, CoreError> {
        self.execute(Command::Disarm { device_id }).await
    }

    pub async fn bypass_zone(
        &self,
        device_id: i64,
        zone_id: i64,
        bypass: bool,
    ) -> Result<CommandResult, CoreError> {
        self.execute(Command::BypassZone {
            device_id,
            zone_id,
            bypass,
        })
        .await
    }

    pub async fn set_areas(
        &self,
        device_id: i64,
        area_ids: Vec<i64>,
        arm: bool,
    ) -> Result<CommandResult, CoreError> {
        self.execute(Command::SetAreas {
            device_id,
            area_ids,
            arm,
        })
        .await
    }

    pub async fn request_poll(&self, device_id: i64) -> Result<CommandResult, CoreError> {
        self.execute(Command::RequestPoll { device_id }).await
    }

    // ── Diagnostics ──────────────────────────────────────────────

    /// Redacted report: no credentials, tokens, codes or client id;
    /// serial numbers are masked.
    pub async fn diagnostics(&self) -> Diagnostics {
        let session = &self.inner.session;
        let config = &self.inner.config;
        let devices = self
            .devices()
            .iter()
            .map(|d| {
                let scenarios = ScenarioSelection::for_device(d, config.scenarios);
                DeviceSummary {
                    device_id: d.id,
                    name: d.name.clone(),
                    serial_number: d.serial_number.as_ref().map(|_| REDACTED),
                    model: d.model.clone(),
                    firmware: d.firmware.clone(),
                    area_count: d.areas.len(),
                    zone_count: d.zones.len(),
                    scenario_count: d.scenarios.len(),
                    peripheral_count: d.peripherals.len(),
                    thermostat_count: d.thermostats.len(),
                    active_scenario: d.active_scenario,
                    network_status: d.network_status,
                    faults: d.faults,
                    scenarios,
                    alarm_state: device_alarm_state(d, scenarios),
                }
            })
            .collect();

        Diagnostics {
            authenticated: session.is_authenticated().await,
            token_ttl: session.token_ttl().await,
            cached_raw_devices: session.cached_devices().await.len(),
            refresh_status: self.current_status(),
            refresh_interval_secs: config.refresh_interval.as_secs(),
            user_code_configured: config.user_code.is_some(),
            poll_before_refresh: config.poll_before_refresh,
            devices,
        }
    }
}
