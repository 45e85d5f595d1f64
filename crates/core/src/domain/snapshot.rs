use crate::error::{PulseError, Result};
use serde::Serialize;

/// One period's raw business figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodSnapshot {
    pub revenue: f64,
    pub cost: f64,
    pub customers: u64,
}

impl PeriodSnapshot {
    /// `label` prefixes field names in errors (e.g. `today.cost`).
    pub fn try_new(label: &str, revenue: f64, cost: f64, customers: u64) -> Result<Self> {
        ensure_amount(label, "revenue", revenue)?;
        ensure_amount(label, "cost", cost)?;
        Ok(Self {
            revenue,
            cost,
            customers,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapshotPair {
    pub today: PeriodSnapshot,
    pub yesterday: PeriodSnapshot,
}

fn ensure_amount(label: &str, name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PulseError::InvalidField {
            field: format!("{label}.{name}"),
            detail: format!("must be a finite number (got {value})"),
        });
    }
    if value < 0.0 {
        return Err(PulseError::InvalidField {
            field: format!("{label}.{name}"),
            detail: format!("must be non-negative (got {value})"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_figures() {
        let s = PeriodSnapshot::try_new("today", 0.0, 0.0, 0).unwrap();
        assert_eq!(s.customers, 0);
    }

    #[test]
    fn rejects_negative_cost() {
        let err = PeriodSnapshot::try_new("yesterday", 10.0, -1.0, 3).unwrap_err();
        match err {
            PulseError::InvalidField { field, .. } => assert_eq!(field, "yesterday.cost"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_finite_revenue() {
        assert!(PeriodSnapshot::try_new("today", f64::NAN, 1.0, 1).is_err());
        assert!(PeriodSnapshot::try_new("today", f64::INFINITY, 1.0, 1).is_err());
    }
}
