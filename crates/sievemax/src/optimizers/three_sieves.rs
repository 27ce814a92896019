//! ThreeSieves: a single sieve with a decaying threshold.
//!
//! Instead of running a grid of guesses in parallel, keep one threshold,
//! start it at the largest plausible optimum `K·m`, and lower it after `T`
//! consecutive rejections; by the Rule of Three, surviving `T` tries bounds
//! the probability that a better element was still coming. Memory is
//! `O(K)` with one objective query per element, at
//! `(1-ε)(1-1/e)·OPT` with confidence `(1-α)^K` (Buschjäger, Honysz,
//! Pfahler & Morik 2021).

use tracing::trace;

use super::{Optimizer, OptimizerCore};
use crate::error::SelectionError;
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

/// How the threshold falls after `T` consecutive rejections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdStrategy {
    /// Step down one level of the geometric grid `(1+ε)^i`.
    Geometric,
    /// Drop straight to `ε`.
    Constant,
}

pub struct ThreeSieves {
    core: OptimizerCore,
    threshold: Scalar,
    epsilon: Scalar,
    strategy: ThresholdStrategy,
    t_max: usize,
    rejections: usize,
}

impl ThreeSieves {
    /// `m` bounds the best singleton value; the threshold starts at `K·m`.
    /// `t_max` is the number of consecutive rejections tolerated before the
    /// threshold decays and must be at least 1.
    pub fn new(
        k: usize,
        f: &dyn SubmodularFunction,
        m: Scalar,
        epsilon: Scalar,
        strategy: ThresholdStrategy,
        t_max: usize,
    ) -> SelectionResult<Self> {
        let core = OptimizerCore::new(k, f)?;
        if epsilon <= 0.0 {
            return Err(SelectionError::InvalidThresholdRange {
                lower: m,
                upper: k as Scalar * m,
                epsilon,
            });
        }
        if t_max < 1 {
            return Err(SelectionError::InvalidHyperparameter {
                name: "T",
                value: t_max as Scalar,
            });
        }
        Ok(Self {
            core,
            threshold: k as Scalar * m,
            epsilon,
            strategy,
            t_max,
            rejections: 0,
        })
    }

    fn decay_threshold(&mut self) {
        match self.strategy {
            ThresholdStrategy::Geometric => {
                // Next-lower grid exponent, with a tolerance so a threshold
                // sitting (numerically) on the grid still steps down.
                let exponent = self.threshold.ln() / (1.0 + self.epsilon).ln();
                let i = if (exponent - exponent.floor()).abs() < 1e-7 {
                    exponent.floor() - 1.0
                } else {
                    exponent.floor()
                };
                self.threshold = (1.0 + self.epsilon).powf(i);
            }
            ThresholdStrategy::Constant => {
                self.threshold = self.epsilon;
            }
        }
        trace!(threshold = self.threshold, "threshold decayed");
    }
}

impl Optimizer for ThreeSieves {
    fn core(&self) -> &OptimizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OptimizerCore {
        &mut self.core
    }

    fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        let kcur = self.core.solution.len();
        if kcur < self.core.k {
            if self.rejections >= self.t_max {
                self.decay_threshold();
                self.rejections = 0;
            }

            let fdelta = self.core.f.peek(&self.core.solution, x, kcur)? - self.core.fval;
            let required =
                (self.threshold / 2.0 - self.core.fval) / (self.core.k - kcur) as Scalar;

            if fdelta >= required {
                self.core.append(x, id)?;
                self.core.fval += fdelta;
                self.rejections = 0;
            } else {
                self.rejections += 1;
            }
        }
        self.core.is_fitted = true;
        Ok(())
    }
}
