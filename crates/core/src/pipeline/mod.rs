//! Linear stage runner.
//!
//! A [`Pipeline`] owns an ordered list of named [`Stage`]s. [`Pipeline::run`] hands the
//! [`PipelineState`] to each stage in turn, by value, and feeds the returned state to the
//! next one. The first failing stage aborts the run; its error is returned as a
//! [`StageError`] carrying the stage name.

pub mod stages;
pub mod state;

use crate::domain::contract::SnapshotPairInput;
use crate::domain::decision::DecisionOutput;
use crate::error::PulseError;
use std::collections::BTreeSet;
use thiserror::Error;

pub use state::PipelineState;

pub type StageFn = fn(PipelineState) -> crate::error::Result<PipelineState>;

#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub run: StageFn,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("stage `{stage}` failed: {source}")]
pub struct StageError {
    pub stage: &'static str,
    #[source]
    pub source: PulseError,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    /// ingest -> compute -> evaluate
    pub fn standard() -> Self {
        Self {
            stages: stages::STANDARD.to_vec(),
        }
    }

    pub fn new(stages: Vec<Stage>) -> Result<Self, PulseError> {
        let mut seen = BTreeSet::new();
        for stage in &stages {
            if !seen.insert(stage.name) {
                return Err(PulseError::DuplicateStage { name: stage.name });
            }
        }
        Ok(Self { stages })
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }

    pub fn run(&self, initial: PipelineState) -> Result<PipelineState, StageError> {
        let mut state = initial;
        for stage in &self.stages {
            tracing::debug!(stage = stage.name, "running pipeline stage");
            state = (stage.run)(state).map_err(|source| StageError {
                stage: stage.name,
                source,
            })?;
        }
        Ok(state)
    }
}

/// Runs the standard pipeline over `input` and returns its decision output.
pub fn evaluate_input(input: SnapshotPairInput) -> Result<DecisionOutput, StageError> {
    Pipeline::standard()
        .run(PipelineState::new(input))?
        .into_output()
        .map_err(|source| StageError {
            stage: stages::EVALUATE,
            source,
        })
}
