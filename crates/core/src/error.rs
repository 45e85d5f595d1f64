use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PulseError {
    #[error("input is not valid JSON for the snapshot pair schema: {0}")]
    MalformedInput(String),

    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("invalid field `{field}`: {detail}")]
    InvalidField { field: String, detail: String },

    /// Only the revenue/cost percent changes raise this; CAC ratios fall back to zero.
    #[error("division by zero computing {metric} (`{denominator}` is 0)")]
    DivisionByZero {
        metric: &'static str,
        denominator: &'static str,
    },

    #[error("{metric} is not a finite number")]
    NonFiniteMetric { metric: &'static str },

    #[error("state field `{field}` was already written by an earlier stage")]
    FieldAlreadyWritten { field: &'static str },

    #[error("state field `{field}` has not been produced yet")]
    FieldNotReady { field: &'static str },

    #[error("duplicate pipeline stage `{name}`")]
    DuplicateStage { name: &'static str },
}

impl PulseError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PulseError>;
