//! SieveStreaming: parallel fixed-threshold sieves.
//!
//! The optimum is unknown ahead of time, so the algorithm guesses it on a
//! geometric grid `{(1+ε)^i : m ≤ (1+ε)^i ≤ K·m}`, where `m` bounds the
//! best singleton value, and runs one sieve per guess. Each sieve owns an
//! independent clone of the objective and accepts an element when its
//! marginal gain covers the remaining distance to half the guessed
//! optimum. Gives `1/2 - ε` for non-negative monotone submodular
//! objectives with `O(K·log K / ε)` memory (Badanidiyuru, Mirzasoleiman,
//! Karbasi & Krause 2014).

use super::{Optimizer, OptimizerCore};
use crate::error::SelectionError;
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

/// Geometric threshold grid `{(1+epsilon)^i}` intersected with
/// `[lower, upper]`, both ends inclusive.
pub(crate) fn threshold_grid(
    lower: Scalar,
    upper: Scalar,
    epsilon: Scalar,
) -> SelectionResult<Vec<Scalar>> {
    if epsilon <= 0.0 || !(lower > 0.0) || !(upper >= lower) {
        return Err(SelectionError::InvalidThresholdRange {
            lower,
            upper,
            epsilon,
        });
    }

    let base = 1.0 + epsilon;
    let mut i = (lower.ln() / base.ln()).ceil() as i32;
    let mut thresholds = Vec::new();
    loop {
        let val = base.powi(i);
        if val > upper {
            break;
        }
        thresholds.push(val);
        i += 1;
    }

    if thresholds.is_empty() {
        return Err(SelectionError::InvalidThresholdRange {
            lower,
            upper,
            epsilon,
        });
    }
    Ok(thresholds)
}

/// One guessed-optimum sieve: a threshold plus its own summary and
/// objective clone. Only meaningful when driven by a parent optimizer.
pub(crate) struct Sieve {
    pub(crate) core: OptimizerCore,
    pub(crate) threshold: Scalar,
}

impl Sieve {
    pub(crate) fn new(
        k: usize,
        f: &dyn SubmodularFunction,
        threshold: Scalar,
    ) -> SelectionResult<Self> {
        Ok(Self {
            core: OptimizerCore::new(k, f)?,
            threshold,
        })
    }

    /// Accepts `x` when its gain reaches
    /// `(threshold/2 - fval) / (K - |S|)`, the per-slot share of what is
    /// still missing to half the guessed optimum.
    pub(crate) fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        let kcur = self.core.solution.len();
        if kcur < self.core.k {
            let fdelta = self.core.f.peek(&self.core.solution, x, kcur)? - self.core.fval;
            let required =
                (self.threshold / 2.0 - self.core.fval) / (self.core.k - kcur) as Scalar;
            if fdelta >= required {
                self.core.append(x, id)?;
                self.core.fval += fdelta;
            }
        }
        Ok(())
    }
}

pub struct SieveStreaming {
    core: OptimizerCore,
    sieves: Vec<Sieve>,
}

impl SieveStreaming {
    /// `m` is the caller's upper bound on the best singleton value
    /// `max_x f({x})`; `epsilon` controls the grid density.
    pub fn new(
        k: usize,
        f: &dyn SubmodularFunction,
        m: Scalar,
        epsilon: Scalar,
    ) -> SelectionResult<Self> {
        let core = OptimizerCore::new(k, f)?;
        let sieves = threshold_grid(m, k as Scalar * m, epsilon)?
            .into_iter()
            .map(|threshold| Sieve::new(k, f, threshold))
            .collect::<SelectionResult<Vec<_>>>()?;
        Ok(Self { core, sieves })
    }
}

impl Optimizer for SieveStreaming {
    fn core(&self) -> &OptimizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OptimizerCore {
        &mut self.core
    }

    /// Fans the element out to every sieve (in construction order) and
    /// mirrors the best sieve's summary into the parent.
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
        Ok(())
    }

    fn num_candidate_solutions(&self) -> usize {
        self.sieves.len()
    }

    fn num_elements_stored(&self) -> usize {
        self.sieves.iter().map(|s| s.core.solution.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionFn;
    use approx::assert_abs_diff_eq;

    fn weight_sum() -> FunctionFn {
        FunctionFn::new(|s: &[Vec<Scalar>]| s.iter().map(|x| x[0]).sum())
    }

    #[test]
    fn grid_covers_the_inclusive_geometric_range() {
        let grid = threshold_grid(1.0, 3.0, 0.1).unwrap();
        assert_eq!(grid.len(), 12);
        assert_abs_diff_eq!(grid[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grid[11], 1.1_f64.powi(11), epsilon = 1e-12);
        assert!(grid[11] <= 3.0);
    }

    #[test]
    fn grid_rejects_non_positive_epsilon() {
        assert!(matches!(
            threshold_grid(1.0, 3.0, 0.0),
            Err(SelectionError::InvalidThresholdRange { .. })
        ));
        assert!(matches!(
            threshold_grid(1.0, 3.0, -0.5),
            Err(SelectionError::InvalidThresholdRange { .. })
        ));
    }

    #[test]
    fn empty_grid_is_an_error() {
        // No power of 1.1 lies in [1.05, 1.05].
        assert!(matches!(
            threshold_grid(1.05, 1.05, 0.1),
            Err(SelectionError::InvalidThresholdRange { .. })
        ));
    }

    #[test]
    fn elements_stored_sums_over_sieves() {
        let f = weight_sum();
        let mut opt = SieveStreaming::new(2, &f, 1.0, 0.5).unwrap();
        for x in [[1.0], [0.8], [0.9], [1.0]] {
            opt.offer(&x, None).unwrap();
        }
        let total: usize = opt.sieves.iter().map(|s| s.core.solution.len()).sum();
        assert_eq!(opt.num_elements_stored(), total);
        assert_eq!(opt.num_candidate_solutions(), opt.sieves.len());
        assert!(opt.solution().unwrap().len() <= 2);
    }

    #[test]
    fn parent_tracks_the_best_sieve() {
        let f = weight_sum();
        let mut opt = SieveStreaming::new(2, &f, 1.0, 0.1).unwrap();
        for x in [[0.6], [1.0], [0.9]] {
            opt.offer(&x, None).unwrap();
        }
        let best = opt
            .sieves
            .iter()
            .map(|s| s.core.fval)
            .fold(Scalar::NEG_INFINITY, Scalar::max);
        assert_abs_diff_eq!(opt.value().unwrap(), best, epsilon = 1e-12);
    }
}
