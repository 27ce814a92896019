//! Salsa: an ensemble of thresholding strategies.
//!
//! For every guessed optimum on the SieveStreaming grid, three members run
//! side by side: a fixed rule, a dense rule that loosens after a β-fraction
//! of the stream, and a high-low rule that tightens early and relaxes
//! late. The dense and high-low rules need the stream length N, so members
//! are created inside `fit` and standalone streaming is unsupported.
//! Together the strategies push past the 1/2 barrier of single-threshold
//! streaming (Norouzi-Fard, Tarnawski, Mitrović, Zandieh, Mousavifar &
//! Svensson 2018).

use super::sieve_streaming::threshold_grid;
use super::{check_ids, Optimizer, OptimizerCore};
use crate::error::SelectionError;
use crate::functions::SubmodularFunction;
use crate::{ItemId, Scalar, SelectionResult};

/// Hyperparameters of the three member rules, with the defaults from the
/// reference experiments.
#[derive(Clone, Copy, Debug)]
pub struct SalsaParams {
    pub hilow_epsilon: Scalar,
    pub hilow_beta: Scalar,
    pub hilow_delta: Scalar,
    pub dense_beta: Scalar,
    pub dense_c1: Scalar,
    pub dense_c2: Scalar,
    pub fixed_epsilon: Scalar,
}

impl Default for SalsaParams {
    fn default() -> Self {
        Self {
            hilow_epsilon: 0.05,
            hilow_beta: 0.1,
            hilow_delta: 0.025,
            dense_beta: 0.8,
            dense_c1: 10.0,
            dense_c2: 0.2,
            fixed_epsilon: 1.0 / 6.0,
        }
    }
}

/// Acceptance rule of one ensemble member.
enum MemberRule {
    /// Accept on `gain ≥ (τ/K)·(1/2 + ε)`.
    Fixed { epsilon: Scalar },
    /// Early phase accepts on `gain ≥ C1·τ/K`, after a β-fraction of the
    /// stream on `gain ≥ τ/(C2·K)`.
    Dense {
        beta: Scalar,
        c1: Scalar,
        c2: Scalar,
        n: usize,
    },
    /// Early phase accepts on `gain ≥ (τ/K)·(1/2 + ε)`, late phase on
    /// `gain ≥ (τ/K)·(1/2 - δ)`.
    HighLow {
        epsilon: Scalar,
        beta: Scalar,
        delta: Scalar,
        n: usize,
    },
}

struct Member {
    core: OptimizerCore,
    threshold: Scalar,
    rule: MemberRule,
    observed: usize,
}

impl Member {
    fn new(
        k: usize,
        f: &dyn SubmodularFunction,
        threshold: Scalar,
        rule: MemberRule,
    ) -> SelectionResult<Self> {
        Ok(Self {
            core: OptimizerCore::new(k, f)?,
            threshold,
            rule,
            observed: 0,
        })
    }

    fn offer(&mut self, x: &[Scalar], id: Option<ItemId>) -> SelectionResult<()> {
        let kcur = self.core.solution.len();
        if kcur < self.core.k {
            let fdelta = self.core.f.peek(&self.core.solution, x, kcur)? - self.core.fval;
            let k = self.core.k as Scalar;
            let accept = match self.rule {
                MemberRule::Fixed { epsilon } => fdelta >= (self.threshold / k) * (0.5 + epsilon),
                MemberRule::Dense { beta, c1, c2, n } => {
                    if self.observed as Scalar <= beta * n as Scalar {
                        fdelta >= c1 * self.threshold / k
                    } else {
                        fdelta >= self.threshold / (c2 * k)
                    }
                }
                MemberRule::HighLow {
                    epsilon,
                    beta,
                    delta,
                    n,
                } => {
                    if self.observed as Scalar <= beta * n as Scalar {
                        fdelta >= (self.threshold / k) * (0.5 + epsilon)
                    } else {
                        fdelta >= (self.threshold / k) * (0.5 - delta)
                    }
                }
            };
            if accept {
                self.core.append(x, id)?;
                self.core.fval += fdelta;
            }
        }
        self.observed += 1;
        Ok(())
    }
}

pub struct Salsa {
    core: OptimizerCore,
    m: Scalar,
    epsilon: Scalar,
    params: SalsaParams,
    members: Vec<Member>,
}

impl Salsa {
    /// `m` is the caller's upper bound on the best singleton value;
    /// `epsilon` controls the threshold grid shared by all strategies.
    pub fn new(
        k: usize,
        f: &dyn SubmodularFunction,
        m: Scalar,
        epsilon: Scalar,
        params: SalsaParams,
    ) -> SelectionResult<Self> {
        Ok(Self {
            core: OptimizerCore::new(k, f)?,
            m,
            epsilon,
            params,
            members: Vec::new(),
        })
    }
}

impl Optimizer for Salsa {
    fn core(&self) -> &OptimizerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut OptimizerCore {
        &mut self.core
    }

    fn offer(&mut self, _x: &[Scalar], _id: Option<ItemId>) -> SelectionResult<()> {
        Err(SelectionError::StreamingUnsupported { optimizer: "Salsa" })
    }

    /// Builds one member per (threshold, strategy) pair, then feeds the
    /// stream to all of them, keeping the parent on the best member. Once a
    /// full pass is done and the summary is full, further passes stop.
    fn fit(
        &mut self,
        data: &[Vec<Scalar>],
        ids: Option<&[ItemId]>,
        max_iterations: usize,
    ) -> SelectionResult<()> {
        check_ids(data.len(), ids)?;

        let n = data.len();
        let k = self.core.k;
        let p = self.params;

        self.members.clear();
        for threshold in threshold_grid(self.m, k as Scalar * self.m, self.epsilon)? {
            self.members.push(Member::new(
                k,
                &*self.core.f,
                threshold,
                MemberRule::Fixed {
                    epsilon: p.fixed_epsilon,
                },
            )?);
            self.members.push(Member::new(
                k,
                &*self.core.f,
                threshold,
                MemberRule::HighLow {
                    epsilon: p.hilow_epsilon,
                    beta: p.hilow_beta,
                    delta: p.hilow_delta,
                    n,
                },
            )?);
            self.members.push(Member::new(
                k,
                &*self.core.f,
                threshold,
                MemberRule::Dense {
                    beta: p.dense_beta,
                    c1: p.dense_c1,
                    c2: p.dense_c2,
                    n,
                },
            )?);
        }

        for pass in 0..max_iterations.max(1) {
            for (j, x) in data.iter().enumerate() {
                for member in &mut self.members {
                    member.offer(x, ids.map(|ids| ids[j]))?;
                    if member.core.fval > self.core.fval {
                        self.core.fval = member.core.fval;
                        self.core.solution = member.core.solution.clone();
                        self.core.ids = member.core.ids.clone();
                        self.core.is_fitted = true;
                    }
                    if pass > 0 && self.core.solution.len() == k {
                        return Ok(());
                    }
                }
            }
        }

        if !data.is_empty() {
            self.core.is_fitted = true;
        }
        Ok(())
    }

    fn num_candidate_solutions(&self) -> usize {
        self.members.len()
    }

    fn num_elements_stored(&self) -> usize {
        self.members.iter().map(|m| m.core.solution.len()).sum()
    }
}
