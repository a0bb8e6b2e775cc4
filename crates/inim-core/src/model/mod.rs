// ── Domain model ──
//
// Normalized panel state. Nothing outside `convert` touches raw vendor
// field names; everything here is built from `inim_api::models`.

pub mod area;
pub mod device;
pub mod event;
pub mod peripheral;
pub mod scenario;
pub mod snapshot;
pub mod zone;

pub use area::{Area, ArmedStatus};
pub use device::Device;
pub use event::AlarmEvent;
pub use peripheral::Peripheral;
pub use scenario::{Scenario, ScenarioKind};
pub use snapshot::Snapshot;
pub use zone::{ZONE_STATUS_CLOSED, Zone, ZoneKind};
