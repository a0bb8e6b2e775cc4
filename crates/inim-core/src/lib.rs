// inim-core: Snapshot model, refresh coordinator and alarm logic for INIM panels

pub mod alarm;
pub mod command;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alarm::{AlarmState, ScenarioOverrides, ScenarioSelection, device_alarm_state};
pub use command::{Command, CommandResult};
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, DeviceSummary, Diagnostics, RefreshStatus};
pub use error::CoreError;
pub use model::{
    AlarmEvent, Area, ArmedStatus, Device, Peripheral, Scenario, ScenarioKind, Snapshot, Zone,
    ZoneKind,
};
pub use store::SnapshotStore;

// Callers build sessions through here without depending on inim-api directly.
pub use inim_api::{ClientConfig, Credentials, SecretString, Session};
