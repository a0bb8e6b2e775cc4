// ── Alarm edge tracker ──
//
// Remembers the last-seen live alarm flag per (device, area) so a refresh
// can report rising edges only. Pairs never seen before count as "was
// not alarming".

use std::collections::HashMap;

use crate::model::{AlarmEvent, Snapshot};

#[derive(Debug, Default)]
pub(crate) struct AlarmTracker {
    last: HashMap<(i64, i64), bool>,
}

impl AlarmTracker {
    /// Rising edges in `snapshot` relative to the stored flags.
    pub(crate) fn detect(&self, snapshot: &Snapshot) -> Vec<AlarmEvent> {
        let mut events = Vec::new();
        for device in snapshot.devices() {
            for area in device.areas.values() {
                let was = self
                    .last
                    .get(&(device.id, area.id))
                    .copied()
                    .unwrap_or(false);
                if area.alarm && !was {
                    events.push(AlarmEvent {
                        device_id: device.id,
                        device_name: device.name.clone(),
                        area_id: area.id,
                        area_name: area.name.clone(),
                    });
                }
            }
        }
        events
    }

    /// Store the flags of `snapshot` as the new baseline.
    pub(crate) fn commit(&mut self, snapshot: &Snapshot) {
        for device in snapshot.devices() {
            for area in device.areas.values() {
                self.last.insert((device.id, area.id), area.alarm);
            }
        }
    }

    pub(crate) fn last_seen(&self, device_id: i64, area_id: i64) -> Option<bool> {
        self.last.get(&(device_id, area_id)).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use indexmap::IndexMap;

    use super::*;
    use crate::model::{Area, ArmedStatus, Device};

    fn snapshot(flags: &[(i64, bool)]) -> Snapshot {
        let areas = flags
            .iter()
            .map(|&(id, alarm)| {
                (
                    id,
                    Area {
                        id,
                        name: format!("Area {id}"),
                        armed: ArmedStatus::Armed,
                        alarm,
                        alarm_memory: false,
                        tamper: false,
                        tamper_memory: false,
                        auto_insert: false,
                    },
                )
            })
            .collect();
        let device = Device {
            id: 1,
            name: "Casa".into(),
            serial_number: None,
            model: None,
            firmware: None,
            voltage: None,
            active_scenario: None,
            network_status: None,
            faults: 0,
            areas,
            zones: IndexMap::new(),
            scenarios: IndexMap::new(),
            peripherals: IndexMap::new(),
            thermostats: Vec::new(),
            blinds: Vec::new(),
        };
        Snapshot {
            devices: [(1, Arc::new(device))].into_iter().collect(),
            fetched_at: None,
        }
    }

    #[test]
    fn fires_once_per_rising_edge() {
        let mut tracker = AlarmTracker::default();
        let mut fired = 0;
        for flag in [false, true, true, false, true] {
            let snap = snapshot(&[(1, flag)]);
            fired += tracker.detect(&snap).len();
            tracker.commit(&snap);
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn first_sighting_of_active_alarm_fires() {
        let mut tracker = AlarmTracker::default();
        let snap = snapshot(&[(1, true), (2, false)]);
        let events = tracker.detect(&snap);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].area_id, 1);
        assert_eq!(events[0].device_name, "Casa");

        tracker.commit(&snap);
        assert_eq!(tracker.last_seen(1, 1), Some(true));
        assert_eq!(tracker.last_seen(1, 2), Some(false));
        assert!(tracker.detect(&snap).is_empty());
    }

    #[test]
    fn detect_does_not_mutate() {
        let tracker = AlarmTracker::default();
        let snap = snapshot(&[(1, true)]);
        assert_eq!(tracker.detect(&snap).len(), 1);
        assert_eq!(tracker.detect(&snap).len(), 1);
        assert_eq!(tracker.last_seen(1, 1), None);
    }
}
