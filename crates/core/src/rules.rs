use crate::domain::decision::DecisionOutput;
use crate::metrics::MetricsRecord;

pub const CAC_INCREASE_THRESHOLD_PERCENT: f64 = 20.0;
pub const REVENUE_GROWTH_THRESHOLD_PERCENT: f64 = 10.0;

pub const NEGATIVE_PROFIT_ALERT: &str = "Warning: Negative profit.";
pub const NEGATIVE_PROFIT_RECOMMENDATION: &str = "Reduce costs if profit is negative.";
pub const CAC_INCREASE_ALERT: &str = "Warning: CAC increased more than 20%.";
pub const CAC_INCREASE_RECOMMENDATION: &str = "Review marketing campaigns.";
pub const REVENUE_GROWTH_RECOMMENDATION: &str =
    "Consider increasing advertising budget if sales are growing.";

/// A threshold check over the metrics and what it contributes when it holds.
#[derive(Clone, Copy)]
pub struct Rule {
    pub key: &'static str,
    pub applies: fn(&MetricsRecord) -> bool,
    pub alert: Option<&'static str>,
    pub recommendation: Option<&'static str>,
}

/// Evaluation order is output order.
pub const RULES: [Rule; 3] = [
    Rule {
        key: "negative_profit",
        applies: |m| m.profit < 0.0,
        alert: Some(NEGATIVE_PROFIT_ALERT),
        recommendation: Some(NEGATIVE_PROFIT_RECOMMENDATION),
    },
    Rule {
        key: "cac_increase",
        applies: |m| m.cac_change_percent > CAC_INCREASE_THRESHOLD_PERCENT,
        alert: Some(CAC_INCREASE_ALERT),
        recommendation: Some(CAC_INCREASE_RECOMMENDATION),
    },
    Rule {
        key: "revenue_growth",
        applies: |m| m.percent_change_revenue > REVENUE_GROWTH_THRESHOLD_PERCENT,
        alert: None,
        recommendation: Some(REVENUE_GROWTH_RECOMMENDATION),
    },
];

pub fn evaluate_rules(metrics: &MetricsRecord) -> DecisionOutput {
    let mut alerts = Vec::new();
    let mut recommendations = Vec::new();

    for rule in RULES.iter().filter(|rule| (rule.applies)(metrics)) {
        if let Some(alert) = rule.alert {
            alerts.push(alert.to_string());
        }
        if let Some(rec) = rule.recommendation {
            recommendations.push(rec.to_string());
        }
    }

    DecisionOutput {
        profit: metrics.profit,
        alerts,
        recommendations,
    }
}

/// Keys of the rules that hold for `metrics`, in evaluation order.
pub fn fired_rule_keys(metrics: &MetricsRecord) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(metrics))
        .map(|rule| rule.key)
        .collect()
}
