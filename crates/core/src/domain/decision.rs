use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecisionOutput {
    pub profit: f64,
    pub alerts: Vec<String>,
    pub recommendations: Vec<String>,
}
