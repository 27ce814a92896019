//! SieveStreaming++: adaptive sieve pruning and re-seeding.
//!
//! Like SieveStreaming, but the thresholds guess `OPT/(2K)` directly and an
//! element must beat its sieve's threshold outright. The best value seen so
//! far is a lower bound on the optimum; whenever it improves, sieves whose
//! threshold falls below `max(LB, m)/(2K)` can no longer matter and are
//! dropped, and any grid threshold newly inside the viable range is seeded
//! with a fresh, empty sieve. This brings memory down to `O(K/ε)` at the
//! same `1/2 - ε` guarantee (Kazemi, Mitrovic, Zadimoghaddam, Lattanzi &
//! Karbasi 2019).

use tracing::debug;

use super::sieve_streaming::threshold_grid;
use super::{Optimizer, OptimizerCore};
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

/// A sieve accepting on the raw threshold: gain ≥ τ.
struct GainSieve {
    core: OptimizerCore,
    threshold: Scalar,
}

impl GainSieve {
    fn new(k: usize, f: &dyn SubmodularFunction, threshold: Scalar) -> SelectionResult<Self> {
        Ok(Self {
            core: OptimizerCore::new(k, f)?,
            threshold,
        })
    }

    fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        let kcur = self.core.solution.len();
        if kcur < self.core.k {
            let fdelta = self.core.f.peek(&self.core.solution, x, kcur)? - self.core.fval;
            if fdelta >= self.threshold {
                self.core.append(x, id)?;
                self.core.fval += fdelta;
            }
        }
        Ok(())
    }
}

pub struct SieveStreamingPp {
    core: OptimizerCore,
    sieves: Vec<GainSieve>,
    lower_bound: Scalar,
    m: Scalar,
    epsilon: Scalar,
}

impl SieveStreamingPp {
    /// `m` is the caller's upper bound on the best singleton value;
    /// `epsilon` controls the grid density.
    pub fn new(
        k: usize,
        f: &dyn SubmodularFunction,
        m: Scalar,
        epsilon: Scalar,
    ) -> SelectionResult<Self> {
        let core = OptimizerCore::new(k, f)?;
        // With no lower bound yet, the viable guesses span [m/(2K), m].
        let sieves = threshold_grid(m / (2.0 * k as Scalar), m, epsilon)?
            .into_iter()
            .map(|threshold| GainSieve::new(k, f, threshold))
            .collect::<SelectionResult<Vec<_>>>()?;
        Ok(Self {
            core,
            sieves,
            lower_bound: 0.0,
            m,
            epsilon,
        })
    }

    fn prune_and_reseed(&mut self) -> SelectionResult<()> {
        let tau_min = self.lower_bound.max(self.m) / (2.0 * self.core.k as Scalar);
        let before = self.sieves.len();
        self.sieves.retain(|s| s.threshold >= tau_min);
        let pruned = before - self.sieves.len();

        if pruned > 0 && tau_min <= self.m {
            for threshold in threshold_grid(tau_min, self.m, self.epsilon)? {
                if !self.sieves.iter().any(|s| s.threshold == threshold) {
                    // Re-seeded sieves start from an empty summary.
                    self.sieves
                        .push(GainSieve::new(self.core.k, &*self.core.f, threshold)?);
                }
            }
            debug!(pruned, active = self.sieves.len(), tau_min, "re-seeded sieve grid");
        }
        Ok(())
    }
}

impl Optimizer for SieveStreamingPp {
    fn core(&self) -> &OptimizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OptimizerCore {
        &mut self.core
    }

    fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        for sieve in &mut self.sieves {
            sieve.offer(x, id)?;
            if sieve.core.fval > self.core.fval {
                self.core.fval = sieve.core.fval;
                self.core.solution = sieve.core.solution.clone();
                self.core.ids = sieve.core.ids.clone();
            }
        }
        self.core.is_fitted = true;

        if self.lower_bound < self.core.fval {
            self.lower_bound = self.core.fval;
            self.prune_and_reseed()?;
        }
        Ok(())
    }

    fn num_candidate_solutions(&self) -> usize {
        self.sieves.len()
    }

    fn num_elements_stored(&self) -> usize {
        self.sieves.iter().map(|s| s.core.solution.len()).sum()
    }
}
