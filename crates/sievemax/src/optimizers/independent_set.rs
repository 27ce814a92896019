//! Streaming improvement over an independent set of frozen weights.
//!
//! Each accepted element is stored with the marginal gain it had at
//! insertion time. Those weights are never recomputed when other slots
//! change; a newcomer evicts the cheapest slot only if its own gain is more
//! than twice the frozen minimum. A min-heap keyed on the weights keeps the
//! eviction candidate at hand in `O(log K)`. Gives a 1/4-approximation for
//! non-negative submodular objectives (Chakrabarti & Kale 2015).

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::{Optimizer, OptimizerCore};
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

/// Min-heap entries of (insertion-time weight, summary slot).
type WeightEntry = Reverse<(OrderedFloat<Scalar>, usize)>;

pub struct IndependentSetImprovement {
    core: OptimizerCore,
    weights: BinaryHeap<WeightEntry>,
}

impl IndependentSetImprovement {
    pub fn new(k: usize, f: &dyn SubmodularFunction) -> SelectionResult<Self> {
        Ok(Self {
            core: OptimizerCore::new(k, f)?,
            weights: BinaryHeap::new(),
        })
    }
}

impl Optimizer for IndependentSetImprovement {
    fn core(&self) -> &OptimizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OptimizerCore {
        &mut self.core
    }

    fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        let kcur = self.core.solution.len();

        if kcur < self.core.k {
            let w = self.core.f.peek(&self.core.solution, x, kcur)? - self.core.fval;
            self.core.append(x, id)?;
            self.weights.push(Reverse((OrderedFloat(w), kcur)));
        } else if let Some(&Reverse((min_weight, min_slot))) = self.weights.peek() {
            // The candidate's weight is still measured at the append slot;
            // the objective keeps one spare row for exactly this peek.
            let w = self.core.f.peek(&self.core.solution, x, kcur)? - self.core.fval;
            if w > 2.0 * min_weight.0 {
                self.core.replace(min_slot, x, id)?;
                self.weights.pop();
                self.weights.push(Reverse((OrderedFloat(w), min_slot)));
            }
        }

        self.core.fval = self.core.f.value(&self.core.solution)?;
        self.core.is_fitted = true;
        Ok(())
    }
}
