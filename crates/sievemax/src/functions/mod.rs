//! Submodular objectives under the peek/commit contract.
//!
//! Optimizers never evaluate an objective on an arbitrary set. They ask it
//! to [`peek`](SubmodularFunction::peek) the value of a hypothetical
//! placement, and once a candidate is accepted they
//! [`update`](SubmodularFunction::update) the same placement. The split
//! lets stateful objectives such as [`fast_ivm::FastIvm`] keep an
//! incremental factorization without the optimizer knowing how state is
//! cached.

use std::sync::Arc;

use crate::{Scalar, SelectionResult};

pub mod fast_ivm;
pub mod ivm;

/// Non-negative submodular set function over summaries.
///
/// The placement `pos` appends when `pos >= |S|` and replaces slot `pos`
/// otherwise. Optimizers call `update` at most once per accepted element.
pub trait SubmodularFunction {
    /// `f(S)` for the supplied summary.
    fn value(&self, solution: &[Vec<Scalar>]) -> SelectionResult<Scalar>;

    /// The function value if `x` were placed at `pos`. Must not change
    /// externally observable state; private caches may move.
    fn peek(
        &mut self,
        solution: &[Vec<Scalar>],
        x: &[Scalar],
        pos: usize,
    ) -> SelectionResult<Scalar>;

    /// Commits the placement previously inspected with `peek`.
    fn update(
        &mut self,
        solution: &[Vec<Scalar>],
        x: &[Scalar],
        pos: usize,
    ) -> SelectionResult<()>;

    /// Independent copy with empty state. Optimizers that run several
    /// candidate summaries in parallel clone the objective once per sieve.
    fn clone_box(&self) -> Box<dyn SubmodularFunction>;
}

impl Clone for Box<dyn SubmodularFunction> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Copy of `solution` with `x` placed at `pos`.
pub(crate) fn place_at(solution: &[Vec<Scalar>], x: &[Scalar], pos: usize) -> Vec<Vec<Scalar>> {
    let mut tmp = solution.to_vec();
    if pos >= tmp.len() {
        tmp.push(x.to_vec());
    } else {
        tmp[pos] = x.to_vec();
    }
    tmp
}

/// Adapts a pure set function into the [`SubmodularFunction`] trait.
///
/// `peek` copy-places the candidate into a scratch summary and evaluates;
/// `update` is a no-op since there is no state to maintain. Clones share
/// the wrapped function, which therefore must be stateless.
pub struct FunctionFn {
    f: Arc<dyn Fn(&[Vec<Scalar>]) -> Scalar>,
}

impl FunctionFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Vec<Scalar>]) -> Scalar + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

impl SubmodularFunction for FunctionFn {
    fn value(&self, solution: &[Vec<Scalar>]) -> SelectionResult<Scalar> {
        Ok((self.f)(solution))
    }

    fn peek(
        &mut self,
        solution: &[Vec<Scalar>],
        x: &[Scalar],
        pos: usize,
    ) -> SelectionResult<Scalar> {
        Ok((self.f)(&place_at(solution, x, pos)))
    }

    fn update(
        &mut self,
        _solution: &[Vec<Scalar>],
        _x: &[Scalar],
        _pos: usize,
    ) -> SelectionResult<()> {
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn SubmodularFunction> {
        Box::new(Self {
            f: Arc::clone(&self.f),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn cardinality() -> FunctionFn {
        FunctionFn::new(|s: &[Vec<Scalar>]| s.len() as Scalar)
    }

    #[test]
    fn peek_appends_or_replaces_without_committing() {
        let mut f = cardinality();
        let solution = vec![vec![0.0], vec![1.0]];
        assert_abs_diff_eq!(f.peek(&solution, &[2.0], 2).unwrap(), 3.0);
        assert_abs_diff_eq!(f.peek(&solution, &[2.0], 0).unwrap(), 2.0);
        assert_abs_diff_eq!(f.value(&solution).unwrap(), 2.0);
    }

    #[test]
    fn update_is_a_no_op_for_stateless_functions() {
        let mut f = cardinality();
        let solution = vec![vec![0.0]];
        f.update(&solution, &[1.0], 1).unwrap();
        assert_abs_diff_eq!(f.value(&solution).unwrap(), 1.0);
    }

    #[test]
    fn place_at_semantics() {
        let solution = vec![vec![0.0], vec![1.0]];
        let appended = place_at(&solution, &[9.0], 5);
        assert_eq!(appended.len(), 3);
        assert_eq!(appended[2], vec![9.0]);
        let replaced = place_at(&solution, &[9.0], 1);
        assert_eq!(replaced.len(), 2);
        assert_eq!(replaced[1], vec![9.0]);
    }
}
