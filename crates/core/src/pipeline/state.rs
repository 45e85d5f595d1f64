use crate::domain::contract::SnapshotPairInput;
use crate::domain::decision::DecisionOutput;
use crate::domain::snapshot::SnapshotPair;
use crate::error::{PulseError, Result};
use crate::metrics::MetricsRecord;
use serde::Serialize;

/// Value threaded through the pipeline. Every field past `input` is written at most once,
/// by the stage that owns it, and never replaced afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineState {
    input: SnapshotPairInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshots: Option<SnapshotPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<MetricsRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<DecisionOutput>,
}

impl PipelineState {
    pub fn new(input: SnapshotPairInput) -> Self {
        Self {
            input,
            snapshots: None,
            metrics: None,
            output: None,
        }
    }

    pub fn input(&self) -> &SnapshotPairInput {
        &self.input
    }

    pub fn snapshots(&self) -> Result<&SnapshotPair> {
        self.snapshots
            .as_ref()
            .ok_or(PulseError::FieldNotReady { field: "snapshots" })
    }

    pub fn metrics(&self) -> Result<&MetricsRecord> {
        self.metrics
            .as_ref()
            .ok_or(PulseError::FieldNotReady { field: "metrics" })
    }

    pub fn output(&self) -> Result<&DecisionOutput> {
        self.output
            .as_ref()
            .ok_or(PulseError::FieldNotReady { field: "output" })
    }

    pub fn into_output(self) -> Result<DecisionOutput> {
        self.output.ok_or(PulseError::FieldNotReady { field: "output" })
    }

    pub fn with_snapshots(mut self, snapshots: SnapshotPair) -> Result<Self> {
        write_once(&mut self.snapshots, snapshots, "snapshots")?;
        Ok(self)
    }

    pub fn with_metrics(mut self, metrics: MetricsRecord) -> Result<Self> {
        write_once(&mut self.metrics, metrics, "metrics")?;
        Ok(self)
    }

    pub fn with_output(mut self, output: DecisionOutput) -> Result<Self> {
        write_once(&mut self.output, output, "output")?;
        Ok(self)
    }
}

fn write_once<T>(slot: &mut Option<T>, value: T, field: &'static str) -> Result<()> {
    if slot.is_some() {
        return Err(PulseError::FieldAlreadyWritten { field });
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::PeriodSnapshot;
    use serde_json::json;

    fn pair() -> SnapshotPair {
        let s = PeriodSnapshot {
            revenue: 10.0,
            cost: 5.0,
            customers: 1,
        };
        SnapshotPair {
            today: s,
            yesterday: s,
        }
    }

    #[test]
    fn fresh_state_only_has_input() {
        let state = PipelineState::new(SnapshotPairInput::default());
        assert_eq!(
            state.snapshots().unwrap_err(),
            PulseError::FieldNotReady { field: "snapshots" }
        );
        assert!(state.metrics().is_err());
        assert!(state.into_output().is_err());
    }

    #[test]
    fn fields_are_write_once() {
        let state = PipelineState::new(pair().into())
            .with_snapshots(pair())
            .unwrap();
        assert_eq!(
            state.with_snapshots(pair()).unwrap_err(),
            PulseError::FieldAlreadyWritten { field: "snapshots" }
        );
    }

    #[test]
    fn serializes_only_populated_fields() {
        let state = PipelineState::new(pair().into())
            .with_snapshots(pair())
            .unwrap();
        let v = serde_json::to_value(&state).unwrap();
        assert_eq!(v["input"]["today"], json!({"revenue": 10.0, "cost": 5.0, "customers": 1}));
        assert!(v.get("snapshots").is_some());
        assert!(v.get("metrics").is_none());
        assert!(v.get("output").is_none());
    }
}
