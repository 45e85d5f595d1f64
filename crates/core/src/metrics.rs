use crate::domain::snapshot::PeriodSnapshot;
use crate::error::{PulseError, Result};
use serde::Serialize;

/// Day-over-day figures derived from two snapshots. Percentages are already scaled by 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub profit: f64,
    pub prev_profit: f64,
    pub percent_change_revenue: f64,
    pub percent_change_cost: f64,
    pub today_cac: f64,
    pub yesterday_cac: f64,
    pub cac_change_percent: f64,
}

pub fn compute_metrics(today: &PeriodSnapshot, yesterday: &PeriodSnapshot) -> Result<MetricsRecord> {
    let profit = today.revenue - today.cost;
    let prev_profit = yesterday.revenue - yesterday.cost;

    let percent_change_revenue = percent_change(
        today.revenue,
        yesterday.revenue,
        "percent_change_revenue",
        "yesterday.revenue",
    )?;
    let percent_change_cost = percent_change(
        today.cost,
        yesterday.cost,
        "percent_change_cost",
        "yesterday.cost",
    )?;

    let today_cac = cac(today);
    let yesterday_cac = cac(yesterday);

    // No prior CAC to compare against: report no change.
    let cac_change_percent = if yesterday_cac != 0.0 {
        ensure_finite(
            (today_cac - yesterday_cac) / yesterday_cac * 100.0,
            "cac_change_percent",
        )?
    } else {
        0.0
    };

    Ok(MetricsRecord {
        profit,
        prev_profit,
        percent_change_revenue,
        percent_change_cost,
        today_cac,
        yesterday_cac,
        cac_change_percent,
    })
}

fn percent_change(
    current: f64,
    previous: f64,
    metric: &'static str,
    denominator: &'static str,
) -> Result<f64> {
    if previous == 0.0 {
        return Err(PulseError::DivisionByZero {
            metric,
            denominator,
        });
    }
    ensure_finite((current - previous) / previous * 100.0, metric)
}

// A tiny but non-zero denominator can still overflow the ratio.
fn ensure_finite(value: f64, metric: &'static str) -> Result<f64> {
    if !value.is_finite() {
        return Err(PulseError::NonFiniteMetric { metric });
    }
    Ok(value)
}

fn cac(snapshot: &PeriodSnapshot) -> f64 {
    if snapshot.customers != 0 {
        snapshot.cost / snapshot.customers as f64
    } else {
        0.0
    }
}
