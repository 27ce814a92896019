//! Uniform random selection via reservoir sampling.
//!
//! The streaming path is Vitter's Algorithm R: the first K elements fill
//! the reservoir, after which the element with 0-based count `c` replaces a
//! uniformly chosen slot with probability `K / (c + 1)`. The batch path
//! draws K indices without replacement in one shot using Floyd's
//! algorithm. There is no approximation guarantee under a cardinality
//! constraint; the unconstrained expected ratio is 1/4 (Feige, Mirrokni &
//! Vondrák 2011). Useful as a baseline.
//!
//! The generator is owned and seeded at construction; identical seeds and
//! inputs reproduce the summary bit for bit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use super::{check_ids, Optimizer, OptimizerCore};
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

pub struct ReservoirSampling {
    core: OptimizerCore,
    seen: usize,
    rng: StdRng,
}

impl ReservoirSampling {
    pub fn new(k: usize, f: &dyn SubmodularFunction, seed: u64) -> SelectionResult<Self> {
        Ok(Self {
            core: OptimizerCore::new(k, f)?,
            seen: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }
}

/// Floyd's sampling of `k` distinct indices from `[0, n)`. The returned
/// order is the draw order, so folding it into a summary is deterministic
/// for a fixed generator state.
fn sample_without_replacement(k: usize, n: usize, rng: &mut StdRng) -> Vec<usize> {
    debug_assert!(k <= n);
    let mut chosen: HashSet<usize> = HashSet::with_capacity(k);
    let mut picks = Vec::with_capacity(k);
    for r in (n - k)..n {
        let v = rng.gen_range(0..=r);
        if chosen.insert(v) {
            picks.push(v);
        } else {
            chosen.insert(r);
            picks.push(r);
        }
    }
    picks
}

impl Optimizer for ReservoirSampling {
    fn core(&self) -> &OptimizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OptimizerCore {
        &mut self.core
    }

    fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        if self.core.solution.len() < self.core.k {
            self.core.append(x, id)?;
        } else {
            let j = self.rng.gen_range(1..=self.seen + 1);
            if j <= self.core.k {
                self.core.replace(j - 1, x, id)?;
            }
        }
        self.core.fval = self.core.f.value(&self.core.solution)?;
        self.core.is_fitted = true;
        self.seen += 1;
        Ok(())
    }

    fn fit(
        &mut self,
        data: &[Vec<Scalar>],
        ids: Option<&[ItemId]>,
        _max_iterations: usize,
    ) -> SelectionResult<()> {
        check_ids(data.len(), ids)?;

        let k_eff = self.core.k.min(data.len());
        let picks = sample_without_replacement(k_eff, data.len(), &mut self.rng);
        for &i in &picks {
            self.core.append(&data[i], ids.map(|ids| ids[i]))?;
        }

        self.seen = data.len();
        self.core.fval = self.core.f.value(&self.core.solution)?;
        if !data.is_empty() {
            self.core.is_fitted = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionFn;

    fn cardinality() -> FunctionFn {
        FunctionFn::new(|s: &[Vec<Scalar>]| s.len() as Scalar)
    }

    fn stream(n: usize) -> Vec<Vec<Scalar>> {
        (0..n).map(|i| vec![i as Scalar]).collect()
    }

    #[test]
    fn identical_seeds_reproduce_the_summary() {
        let f = cardinality();
        let data = stream(12);
        let ids: Vec<ItemId> = (0..12).collect();

        let run = |seed| {
            let mut opt = ReservoirSampling::new(3, &f, seed).unwrap();
            for (x, id) in data.iter().zip(&ids) {
                opt.offer(x, Some(*id)).unwrap();
            }
            (
                opt.solution().unwrap().to_vec(),
                opt.ids().unwrap().to_vec(),
            )
        };

        assert_eq!(run(0), run(0));
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn batch_fit_is_deterministic_and_full() {
        let f = cardinality();
        let data = stream(20);

        let run = || {
            let mut opt = ReservoirSampling::new(5, &f, 42).unwrap();
            opt.fit(&data, None, 1).unwrap();
            opt.solution().unwrap().to_vec()
        };

        let first = run();
        assert_eq!(first.len(), 5);
        assert_eq!(first, run());
    }

    #[test]
    fn floyd_draws_distinct_indices() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in [5usize, 9, 30] {
            let picks = sample_without_replacement(4, n, &mut rng);
            assert_eq!(picks.len(), 4);
            let distinct: HashSet<usize> = picks.iter().copied().collect();
            assert_eq!(distinct.len(), 4);
            assert!(picks.iter().all(|&i| i < n));
        }
    }

    #[test]
    fn reservoir_never_exceeds_the_budget() {
        let f = cardinality();
        let mut opt = ReservoirSampling::new(3, &f, 9).unwrap();
        for x in stream(50) {
            opt.offer(&x, None).unwrap();
        }
        assert_eq!(opt.solution().unwrap().len(), 3);
        assert_eq!(opt.value().unwrap(), 3.0);
    }

    #[test]
    fn short_batch_keeps_everything() {
        let f = cardinality();
        let mut opt = ReservoirSampling::new(8, &f, 0).unwrap();
        opt.fit(&stream(3), None, 1).unwrap();
        assert_eq!(opt.solution().unwrap().len(), 3);
    }
}
