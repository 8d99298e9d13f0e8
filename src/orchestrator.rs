//! Recalculation orchestrator: the synchronous cascade plus the one async
//! dependency, the cost of attendance fetch
//!
//! Every fetch is tagged with a generation number. Only the result of the
//! latest fetch is folded into state; anything older is discarded so a slow
//! response for a superseded key can never overwrite a newer one.

use crate::cost_source::{outcome_of, CostLookup};
use crate::engine::{resolve_key, AidEngine, CostOutcome, CostRow};
use crate::error::CostLookupError;
use crate::form::fields;
use crate::form::FormState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Fields whose change alters the cost lookup key
pub const COST_KEY_INPUTS: [&str; 2] = [fields::ENTRY_TERM, fields::HOUSING_STATUS];

/// An in-flight cost fetch
#[derive(Debug)]
pub struct CostFetch {
    pub generation: u64,
    pub key: String,
    task: Option<JoinHandle<Result<Option<CostRow>, CostLookupError>>>,
}

impl CostFetch {
    /// Wait for the lookup; an empty key resolves as a miss without a request
    pub async fn wait(self) -> FetchedCost {
        let outcome = match self.task {
            Some(task) => match task.await {
                Ok(result) => outcome_of(result),
                Err(e) => outcome_of(Err(CostLookupError::Task(e.to_string()))),
            },
            None => CostOutcome::NotFound,
        };
        FetchedCost {
            generation: self.generation,
            key: self.key,
            outcome,
        }
    }
}

/// A finished fetch, ready to fold
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCost {
    pub generation: u64,
    pub key: String,
    pub outcome: CostOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Applied,
    /// A newer fetch was started; the result was dropped
    Stale,
}

pub struct Orchestrator<L> {
    engine: AidEngine,
    lookup: Arc<L>,
    latest: Arc<AtomicU64>,
}

impl<L: CostLookup + 'static> Orchestrator<L> {
    pub fn new(engine: AidEngine, lookup: Arc<L>) -> Self {
        Self {
            engine,
            lookup,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn engine(&self) -> &AidEngine {
        &self.engine
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// React to one changed field: run the cascade, and start a cost fetch
    /// when the field feeds the lookup key
    pub fn input_changed(&self, state: &mut FormState, key: &str) -> Option<CostFetch> {
        self.engine.recalculate(state);
        if COST_KEY_INPUTS.contains(&key) {
            Some(self.refresh_cost(state))
        } else {
            None
        }
    }

    /// Write the lookup key and spawn the fetch for it
    ///
    /// Must be called from within a tokio runtime when the key is non-empty.
    pub fn refresh_cost(&self, state: &mut FormState) -> CostFetch {
        let key = resolve_key(state);
        state.set(fields::COA_KEY, key.clone());
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if key.is_empty() {
            log::debug!("fetch {} skipped: empty cost key", generation);
            return CostFetch {
                generation,
                key,
                task: None,
            };
        }

        log::debug!("fetch {} started for cost key {:?}", generation, key);
        let lookup = Arc::clone(&self.lookup);
        let task_key = key.clone();
        let task = tokio::spawn(async move { lookup.fetch(&task_key).await });
        CostFetch {
            generation,
            key,
            task: Some(task),
        }
    }

    /// Fold a finished fetch unless a newer one has started since
    pub fn complete(&self, state: &mut FormState, fetched: &FetchedCost) -> FoldOutcome {
        let latest = self.latest_generation();
        if fetched.generation != latest {
            log::debug!(
                "discarding fetch {} for {:?}; latest is {}",
                fetched.generation,
                fetched.key,
                latest
            );
            return FoldOutcome::Stale;
        }
        self.engine.fold_cost(state, &fetched.outcome);
        FoldOutcome::Applied
    }

    /// Full recalculation including a fresh cost lookup
    pub async fn recalculate_all(&self, state: &mut FormState) -> FoldOutcome {
        self.engine.recalculate(state);
        let fetched = self.refresh_cost(state).wait().await;
        self.complete(state, &fetched)
    }
}
