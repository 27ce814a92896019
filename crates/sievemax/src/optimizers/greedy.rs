//! Offline greedy maximization.
//!
//! Picks the element with the largest marginal gain, K times over. For
//! non-negative monotone submodular objectives this achieves the classic
//! `1 - 1/e` ratio (Nemhauser, Wolsey & Fisher 1978) at the cost of
//! `O(N·K)` objective queries. Not a streaming algorithm.

use super::{check_ids, Optimizer, OptimizerCore};
use crate::error::SelectionError;
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

pub struct Greedy {
    core: OptimizerCore,
}

impl Greedy {
    pub fn new(k: usize, f: &dyn SubmodularFunction) -> SelectionResult<Self> {
        Ok(Self {
            core: OptimizerCore::new(k, f)?,
        })
    }
}

impl Optimizer for Greedy {
    fn core(&self) -> &OptimizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OptimizerCore {
        &mut self.core
    }

    fn offer(&mut self, _x: &[Scalar], _id: Option<ItemId>) -> SelectionResult<()> {
        Err(SelectionError::StreamingUnsupported {
            optimizer: "Greedy",
        })
    }

    /// Repeatedly peeks every remaining element at the append slot and
    /// commits the best one. Ties go to the earliest element. Picking the
    /// largest resulting function value is equivalent to picking the
    /// largest gain, so gains are never formed explicitly.
    fn fit(
        &mut self,
        data: &[Vec<Scalar>],
        ids: Option<&[ItemId]>,
        _max_iterations: usize,
    ) -> SelectionResult<()> {
        check_ids(data.len(), ids)?;

        let mut remaining: Vec<usize> = (0..data.len()).collect();
        let mut fcur = 0.0;

        while self.core.solution.len() < self.core.k && !remaining.is_empty() {
            let pos = self.core.solution.len();

            let mut best_at = 0;
            let mut best_val = Scalar::NEG_INFINITY;
            for (at, &i) in remaining.iter().enumerate() {
                let ftmp = self.core.f.peek(&self.core.solution, &data[i], pos)?;
                if ftmp > best_val {
                    best_val = ftmp;
                    best_at = at;
                }
            }

            let chosen = remaining.remove(best_at);
            self.core
                .append(&data[chosen], ids.map(|ids| ids[chosen]))?;
            fcur = best_val;
        }

        self.core.fval = fcur;
        if !data.is_empty() {
            self.core.is_fitted = true;
        }
        Ok(())
    }
}
