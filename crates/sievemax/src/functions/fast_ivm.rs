//! Incremental informative vector machine objective.
//!
//! Maintains the kernel matrix `σ·I + Σ` of the committed summary together
//! with its Cholesky factor `L`. Appending a candidate extends `L` by one
//! row (a rank-1 append, `O(K²)`), so both `peek` and `update` on the
//! append path avoid the `O(K³)` refactorization. Replacing an occupied
//! slot invalidates a whole row and column of `Σ`, which forces a full
//! refactorization of the active block; a Givens-based downdate could make
//! that incremental too, but the baseline refactors.
//!
//! Storage is `(K+1)²` rather than `K²`: a candidate can be peeked into the
//! row just past the committed block even when the summary is full, without
//! disturbing committed state.

use super::SubmodularFunction;
use crate::error::{LinalgError, SelectionError};
use crate::kernels::Kernel;
use crate::linalg::{log_det_from_cholesky, Matrix};
use crate::{Scalar, SelectionResult};

pub struct FastIvm {
    k: usize,
    kernel: Box<dyn Kernel>,
    sigma: Scalar,
    /// Number of committed summary slots; the leading `added x added`
    /// blocks of `kmat` and `lfac` are the authoritative state.
    added: usize,
    kmat: Matrix,
    lfac: Matrix,
    fval: Scalar,
}

impl FastIvm {
    /// Creates the objective for summaries of at most `k` elements with the
    /// given kernel and regularizer `sigma > 0`.
    pub fn new(k: usize, kernel: &dyn Kernel, sigma: Scalar) -> SelectionResult<Self> {
        if k == 0 {
            return Err(SelectionError::InvalidBudget { k });
        }
        if sigma <= 0.0 {
            return Err(SelectionError::InvalidHyperparameter {
                name: "sigma",
                value: sigma,
            });
        }
        Ok(Self {
            k,
            kernel: kernel.clone_box(),
            sigma,
            added: 0,
            kmat: Matrix::new(k + 1),
            lfac: Matrix::new(k + 1),
            fval: 0.0,
        })
    }

    /// Writes the kernel row/column for `x` against the committed summary
    /// into row `added` of `Σ`, extends `L` by the matching row, and
    /// returns the resulting log-determinant. Committed rows are untouched,
    /// so this is safe to run speculatively.
    fn extend_factorization(
        &mut self,
        solution: &[Vec<Scalar>],
        x: &[Scalar],
    ) -> SelectionResult<Scalar> {
        let n = self.added;
        for i in 0..n {
            let kval = self.kernel.eval(&solution[i], x);
            self.kmat[(i, n)] = kval;
            self.kmat[(n, i)] = kval;
        }
        self.kmat[(n, n)] = self.sigma + self.kernel.eval(x, x);

        for j in 0..=n {
            let mut sum = 0.0;
            for t in 0..j {
                sum += self.lfac[(n, t)] * self.lfac[(j, t)];
            }
            let entry = if j == n {
                let radicand = self.kmat[(n, n)] - sum;
                if radicand <= 0.0 {
                    return Err(LinalgError::NotPositiveDefinite {
                        column: n,
                        radicand,
                    }
                    .into());
                }
                radicand.sqrt()
            } else {
                (self.kmat[(n, j)] - sum) / self.lfac[(j, j)]
            };
            self.lfac[(n, j)] = entry;
            self.lfac[(j, n)] = entry;
        }

        Ok(self.fval + 2.0 * self.lfac[(n, n)].ln())
    }

    /// Kernel row of `x` against `solution` with slot `pos` taken by `x`
    /// itself; entry `pos` holds the regularized diagonal.
    fn replacement_row(&self, solution: &[Vec<Scalar>], x: &[Scalar], pos: usize) -> Vec<Scalar> {
        (0..self.added)
            .map(|i| {
                if i == pos {
                    self.sigma + self.kernel.eval(x, x)
                } else {
                    self.kernel.eval(&solution[i], x)
                }
            })
            .collect()
    }
}

/// Writes a replacement row symmetrically into row and column `pos`.
fn write_replacement(mat: &mut Matrix, row: &[Scalar], pos: usize) {
    for (i, &v) in row.iter().enumerate() {
        if i == pos {
            mat[(pos, pos)] = v;
        } else {
            mat[(i, pos)] = v;
            mat[(pos, i)] = v;
        }
    }
}

impl SubmodularFunction for FastIvm {
    /// Returns the cached value. The argument is ignored; the peek/update
    /// discipline keeps the cache consistent with the caller's summary.
    fn value(&self, _solution: &[Vec<Scalar>]) -> SelectionResult<Scalar> {
        Ok(self.fval)
    }

    fn peek(
        &mut self,
        solution: &[Vec<Scalar>],
        x: &[Scalar],
        pos: usize,
    ) -> SelectionResult<Scalar> {
        if pos < self.added {
            // Replacement: refactor a scratch copy of the active block.
            let mut scratch = Matrix::leading(&self.kmat, self.added);
            write_replacement(&mut scratch, &self.replacement_row(solution, x, pos), pos);
            let l = scratch.cholesky(self.added)?;
            Ok(log_det_from_cholesky(&l))
        } else {
            debug_assert!(self.added <= self.k);
            self.extend_factorization(solution, x)
        }
    }

    fn update(
        &mut self,
        solution: &[Vec<Scalar>],
        x: &[Scalar],
        pos: usize,
    ) -> SelectionResult<()> {
        if pos < self.added {
            let row = self.replacement_row(solution, x, pos);
            write_replacement(&mut self.kmat, &row, pos);
            let l = self.kmat.cholesky(self.added)?;
            for i in 0..self.added {
                for j in 0..self.added {
                    self.lfac[(i, j)] = l[(i, j)];
                }
            }
            self.fval = log_det_from_cholesky(&l);
        } else {
            debug_assert!(self.added < self.k);
            self.fval = self.extend_factorization(solution, x)?;
            self.added += 1;
        }
        Ok(())
    }

    /// Fresh instance with the same budget, kernel, and regularizer but an
    /// empty factorization.
    fn clone_box(&self) -> Box<dyn SubmodularFunction> {
        Box::new(Self {
            k: self.k,
            kernel: self.kernel.clone_box(),
            sigma: self.sigma,
            added: 0,
            kmat: Matrix::new(self.k + 1),
            lfac: Matrix::new(self.k + 1),
            fval: 0.0,
        })
    }
}
