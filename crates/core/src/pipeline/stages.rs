use super::state::PipelineState;
use super::Stage;
use crate::error::Result;
use crate::{ingest, metrics, rules};

pub const INGEST: &str = "ingest";
pub const COMPUTE: &str = "compute";
pub const EVALUATE: &str = "evaluate";

pub const STANDARD: [Stage; 3] = [
    Stage {
        name: INGEST,
        run: ingest_stage,
    },
    Stage {
        name: COMPUTE,
        run: compute_stage,
    },
    Stage {
        name: EVALUATE,
        run: evaluate_stage,
    },
];

pub fn ingest_stage(state: PipelineState) -> Result<PipelineState> {
    let snapshots = ingest::ingest(state.input())?;
    state.with_snapshots(snapshots)
}

pub fn compute_stage(state: PipelineState) -> Result<PipelineState> {
    let snapshots = state.snapshots()?;
    let metrics = metrics::compute_metrics(&snapshots.today, &snapshots.yesterday)?;
    tracing::debug!(
        profit = metrics.profit,
        percent_change_revenue = metrics.percent_change_revenue,
        cac_change_percent = metrics.cac_change_percent,
        "metrics computed"
    );
    state.with_metrics(metrics)
}

pub fn evaluate_stage(state: PipelineState) -> Result<PipelineState> {
    let metrics = state.metrics()?;
    let output = rules::evaluate_rules(metrics);
    tracing::info!(
        profit = output.profit,
        alerts_len = output.alerts.len(),
        recommendations_len = output.recommendations.len(),
        fired = ?rules::fired_rule_keys(metrics),
        "rules evaluated"
    );
    state.with_output(output)
}
