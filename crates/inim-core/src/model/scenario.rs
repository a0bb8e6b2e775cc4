// ── Scenario domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// What a scenario does, guessed from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScenarioKind {
    /// Name contains `SPENTO` or `OFF`.
    Disarm,
    /// Name contains `TOTALE` or `TOTAL`.
    Total,
    Partial,
}

impl ScenarioKind {
    /// Case-insensitive; disarm keywords are checked first.
    pub fn from_name(name: &str) -> Self {
        let upper = name.to_uppercase();
        if upper.contains("SPENTO") || upper.contains("OFF") {
            Self::Disarm
        } else if upper.contains("TOTAL") {
            // Also covers TOTALE.
            Self::Total
        } else {
            Self::Partial
        }
    }
}

/// A panel-defined command mapping to a combination of area states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: i64,
    pub name: String,
}

impl Scenario {
    pub fn kind(&self) -> ScenarioKind {
        ScenarioKind::from_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_name() {
        assert_eq!(ScenarioKind::from_name("TOTALE"), ScenarioKind::Total);
        assert_eq!(ScenarioKind::from_name("Total away"), ScenarioKind::Total);
        assert_eq!(ScenarioKind::from_name("Spento"), ScenarioKind::Disarm);
        assert_eq!(ScenarioKind::from_name("All off"), ScenarioKind::Disarm);
        assert_eq!(ScenarioKind::from_name("NOTTE"), ScenarioKind::Partial);
        // Disarm is checked before total.
        assert_eq!(ScenarioKind::from_name("TOTALE OFF"), ScenarioKind::Disarm);
    }
}
