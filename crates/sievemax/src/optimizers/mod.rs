//! Summary selection strategies.
//!
//! Every optimizer owns a budget `K`, an exclusively owned objective
//! (cloned from the caller's at construction), and the current summary.
//! Streaming optimizers consume one element at a time through
//! [`Optimizer::offer`]; batch drivers use [`Optimizer::fit`], which loops
//! `offer` over the sequence. Batch-only algorithms reject `offer` with
//! [`SelectionError::StreamingUnsupported`].

use tracing::debug;

use crate::error::SelectionError;
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

pub mod greedy;
pub mod independent_set;
pub mod reservoir;
pub mod salsa;
pub mod sieve_streaming;
pub mod sieve_streaming_pp;
pub mod three_sieves;

pub use greedy::Greedy;
pub use independent_set::IndependentSetImprovement;
pub use reservoir::ReservoirSampling;
pub use salsa::{Salsa, SalsaParams};
pub use sieve_streaming::SieveStreaming;
pub use sieve_streaming_pp::SieveStreamingPp;
pub use three_sieves::{ThreeSieves, ThresholdStrategy};

/// State every optimizer carries: the cardinality budget, the owned
/// objective, the current summary with its optional ids, and the current
/// function value.
pub struct OptimizerCore {
    pub(crate) k: usize,
    pub(crate) f: Box<dyn SubmodularFunction>,
    pub(crate) solution: Vec<Vec<Scalar>>,
    pub(crate) ids: Vec<ItemId>,
    pub(crate) fval: Scalar,
    pub(crate) is_fitted: bool,
}

impl OptimizerCore {
    /// The cardinality budget K.
    pub fn budget(&self) -> usize {
        self.k
    }

    /// Whether any data has been offered or fitted yet.
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    pub(crate) fn new(k: usize, f: &dyn SubmodularFunction) -> SelectionResult<Self> {
        if k == 0 {
            return Err(SelectionError::InvalidBudget { k });
        }
        Ok(Self {
            k,
            f: f.clone_box(),
            solution: Vec::new(),
            ids: Vec::new(),
            fval: 0.0,
            is_fitted: false,
        })
    }

    /// Commits `x` to the objective and appends it (and its id, when ids
    /// are in use) to the summary.
    pub(crate) fn append(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        let pos = self.solution.len();
        debug_assert!(pos < self.k);
        self.f.update(&self.solution, x, pos)?;
        self.solution.push(x.to_vec());
        if let Some(id) = id {
            self.ids.push(id);
        }
        Ok(())
    }

    /// Commits `x` to the objective and overwrites slot `pos`.
    pub(crate) fn replace(&mut self, pos: usize, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        debug_assert!(pos < self.solution.len());
        self.f.update(&self.solution, x, pos)?;
        self.solution[pos] = x.to_vec();
        if let Some(id) = id {
            self.ids[pos] = id;
        }
        Ok(())
    }
}

pub(crate) fn check_ids(items: usize, ids: Option<&[ItemId]>) -> SelectionResult<()> {
    match ids {
        Some(ids) if ids.len() != items => Err(SelectionError::IdsCardinalityMismatch {
            ids: ids.len(),
            items,
        }),
        _ => Ok(()),
    }
}

/// Common driver interface over all selection strategies.
pub trait Optimizer {
    fn core(&self) -> &OptimizerCore;
    fn core_mut(&mut self) -> &mut OptimizerCore;

    /// Consumes the next element of the stream, optionally labelled with an
    /// id. Either every offered element carries an id or none does.
    fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()>;

    /// Drives [`Optimizer::offer`] over the whole sequence up to
    /// `max_iterations` times, stopping after any completed pass that
    /// filled the summary.
    fn fit(
        &mut self,
        data: &[Vec<Scalar>],
        ids: Option<&[ItemId]>,
        max_iterations: usize,
    ) -> SelectionResult<()> {
        check_ids(data.len(), ids)?;
        for _ in 0..max_iterations.max(1) {
            for (i, x) in data.iter().enumerate() {
                self.offer(x, ids.map(|ids| ids[i]))?;
            }
            if self.core().solution.len() == self.core().k {
                break;
            }
        }
        debug!(
            fval = self.core().fval,
            size = self.core().solution.len(),
            "fit finished"
        );
        Ok(())
    }

    /// The selected summary. Fails before any data has been offered.
    fn solution(&self) -> SelectionResult<&[Vec<Scalar>]> {
        if !self.core().is_fitted {
            return Err(SelectionError::NotFitted);
        }
        Ok(&self.core().solution)
    }

    /// Ids of the selected summary, parallel to [`Optimizer::solution`];
    /// empty when ids were never supplied.
    fn ids(&self) -> SelectionResult<&[ItemId]> {
        if !self.core().is_fitted {
            return Err(SelectionError::NotFitted);
        }
        Ok(&self.core().ids)
    }

    /// Objective value of the current summary.
    fn value(&self) -> SelectionResult<Scalar> {
        if !self.core().is_fitted {
            return Err(SelectionError::NotFitted);
        }
        Ok(self.core().fval)
    }

    /// Number of candidate summaries maintained in parallel.
    fn num_candidate_solutions(&self) -> usize {
        1
    }

    /// Total number of elements stored across all candidate summaries.
    fn num_elements_stored(&self) -> usize {
        self.core().solution.len()
    }
}
