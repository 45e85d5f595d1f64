use crate::domain::snapshot::{PeriodSnapshot, SnapshotPair};
use crate::error::{PulseError, Result};
use serde::{Deserialize, Serialize};

/// Wire shape of the pipeline input. Every field is optional here so that an absent
/// field surfaces as [`PulseError::MissingField`] naming its path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPairInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<SnapshotInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yesterday: Option<SnapshotInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<u64>,
}

impl SnapshotPairInput {
    pub fn validate_and_into_pair(&self) -> Result<SnapshotPair> {
        let today = self
            .today
            .as_ref()
            .ok_or_else(|| PulseError::missing("today"))?
            .validate_and_into_snapshot("today")?;
        let yesterday = self
            .yesterday
            .as_ref()
            .ok_or_else(|| PulseError::missing("yesterday"))?
            .validate_and_into_snapshot("yesterday")?;

        Ok(SnapshotPair { today, yesterday })
    }
}

impl SnapshotInput {
    fn validate_and_into_snapshot(&self, label: &str) -> Result<PeriodSnapshot> {
        let revenue = self
            .revenue
            .ok_or_else(|| PulseError::missing(format!("{label}.revenue")))?;
        let cost = self
            .cost
            .ok_or_else(|| PulseError::missing(format!("{label}.cost")))?;
        let customers = self
            .customers
            .ok_or_else(|| PulseError::missing(format!("{label}.customers")))?;

        PeriodSnapshot::try_new(label, revenue, cost, customers)
    }
}

impl From<SnapshotPair> for SnapshotPairInput {
    fn from(pair: SnapshotPair) -> Self {
        let wire = |s: PeriodSnapshot| SnapshotInput {
            revenue: Some(s.revenue),
            cost: Some(s.cost),
            customers: Some(s.customers),
        };
        Self {
            today: Some(wire(pair.today)),
            yesterday: Some(wire(pair.yesterday)),
        }
    }
}
