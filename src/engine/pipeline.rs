//! Ordered calculation stages with declared inputs and outputs
//!
//! Every stage names the fields it reads and the calculated fields it writes.
//! A pipeline is only usable once `validate` has confirmed that each
//! calculated field is produced exactly once and before any stage reads it.

use super::award::AwardStage;
use super::cost::{self, CostKeyStage, CostOutcome};
use super::need::{IncomeProtectionStage, MaximumPellStage, PovertyGuidelineStage, SaiAndPellStage};
use crate::error::PipelineError;
use crate::form::fields::{self, FieldKind, COST_FIELDS};
use crate::form::FormState;
use crate::tables::RateTables;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name recorded as the producer of the cost fields
pub const COST_FOLD: &str = "cost_fold";

/// One pure step of the calculation
pub trait Stage: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Every field the stage reads
    fn inputs(&self) -> &'static [&'static str];

    /// Every calculated field the stage writes
    fn outputs(&self) -> &'static [&'static str];

    fn apply(&self, state: &mut FormState, tables: &RateTables);
}

/// Stages in execution order
#[derive(Debug)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    /// Calculated fields written outside the stages (by the cost fold)
    seeded: Vec<&'static str>,
}

impl Pipeline {
    /// Unvalidated pipeline over the given stages
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self {
            stages,
            seeded: COST_FIELDS.to_vec(),
        }
    }

    /// The standard calculation: key, allowance, guideline, Pell indicator,
    /// SAI and Pell, awards
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(CostKeyStage),
            Box::new(IncomeProtectionStage),
            Box::new(PovertyGuidelineStage),
            Box::new(MaximumPellStage),
            Box::new(SaiAndPellStage),
            Box::new(AwardStage),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Check declared dependencies against stage order
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut producers: HashMap<&'static str, &'static str> =
            self.seeded.iter().map(|field| (*field, COST_FOLD)).collect();

        for stage in &self.stages {
            for &field in stage.inputs() {
                match fields::kind_of(field) {
                    Some(FieldKind::Input) => {}
                    Some(FieldKind::Calculated) => {
                        if !producers.contains_key(field) {
                            return Err(PipelineError::UnorderedDependency {
                                stage: stage.name(),
                                field,
                            });
                        }
                    }
                    None => {
                        return Err(PipelineError::UnknownField {
                            stage: stage.name(),
                            field,
                        })
                    }
                }
            }

            for &field in stage.outputs() {
                match fields::kind_of(field) {
                    Some(FieldKind::Calculated) => {}
                    Some(FieldKind::Input) => {
                        return Err(PipelineError::NotCalculated {
                            stage: stage.name(),
                            field,
                        })
                    }
                    None => {
                        return Err(PipelineError::UnknownField {
                            stage: stage.name(),
                            field,
                        })
                    }
                }
                if let Some(first) = producers.insert(field, stage.name()) {
                    return Err(PipelineError::DuplicateProducer {
                        field,
                        first,
                        second: stage.name(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Run every stage in order
    pub fn run(&self, state: &mut FormState, tables: &RateTables) {
        for stage in &self.stages {
            log::trace!("running stage {}", stage.name());
            stage.apply(state, tables);
        }
    }
}

/// Tables plus a validated pipeline: the synchronous half of the estimator
#[derive(Debug, Clone)]
pub struct AidEngine {
    tables: Arc<RateTables>,
    pipeline: Arc<Pipeline>,
}

impl AidEngine {
    /// Engine over the standard pipeline
    pub fn new(tables: Arc<RateTables>) -> Result<Self, PipelineError> {
        Self::with_pipeline(tables, Pipeline::standard())
    }

    pub fn with_pipeline(tables: Arc<RateTables>, pipeline: Pipeline) -> Result<Self, PipelineError> {
        pipeline.validate()?;
        Ok(Self {
            tables,
            pipeline: Arc::new(pipeline),
        })
    }

    pub fn tables(&self) -> &RateTables {
        &self.tables
    }

    /// Run the full cascade over the state
    pub fn recalculate(&self, state: &mut FormState) {
        log::debug!("recalculating {} fields", state.len());
        self.pipeline.run(state, &self.tables);
    }

    /// Fold a cost lookup outcome into the state, then run the cascade
    pub fn fold_cost(&self, state: &mut FormState, outcome: &CostOutcome) {
        cost::fold_cost(state, outcome);
        self.recalculate(state);
    }
}
