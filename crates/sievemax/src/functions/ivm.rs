//! Reference informative vector machine objective.
//!
//! `f(S) = log det(σ·I + Σ)` with `Σ[i,j] = k(s_i, s_j)`. This variant
//! recomputes the kernel matrix and its factorization from scratch on every
//! call, so a `peek` costs `O(|S|² D + |S|³)`. It exists as a slow,
//! obviously-correct baseline; use [`super::fast_ivm::FastIvm`] for real
//! workloads.

use super::{place_at, SubmodularFunction};
use crate::error::SelectionError;
use crate::kernels::Kernel;
use crate::linalg::Matrix;
use crate::{Scalar, SelectionResult};

pub struct Ivm {
    kernel: Box<dyn Kernel>,
    sigma: Scalar,
}

impl Ivm {
    /// Creates the objective with the given kernel and regularizer
    /// `sigma > 0`.
    pub fn new(kernel: &dyn Kernel, sigma: Scalar) -> SelectionResult<Self> {
        if sigma <= 0.0 {
            return Err(SelectionError::InvalidHyperparameter {
                name: "sigma",
                value: sigma,
            });
        }
        Ok(Self {
            kernel: kernel.clone_box(),
            sigma,
        })
    }

    fn kernel_matrix(&self, solution: &[Vec<Scalar>]) -> Matrix {
        let n = solution.len();
        let mut mat = Matrix::new(n);
        for i in 0..n {
            for j in i..n {
                let kval = self.kernel.eval(&solution[i], &solution[j]);
                if i == j {
                    mat[(i, i)] = self.sigma + kval;
                } else {
                    mat[(i, j)] = kval;
                    mat[(j, i)] = kval;
                }
            }
        }
        mat
    }
}

impl SubmodularFunction for Ivm {
    fn value(&self, solution: &[Vec<Scalar>]) -> SelectionResult<Scalar> {
        if solution.is_empty() {
            return Ok(0.0);
        }
        let mat = self.kernel_matrix(solution);
        Ok(mat.log_det(solution.len())?)
    }

    fn peek(
        &mut self,
        solution: &[Vec<Scalar>],
        x: &[Scalar],
        pos: usize,
    ) -> SelectionResult<Scalar> {
        self.value(&place_at(solution, x, pos))
    }

    fn update(
        &mut self,
        _solution: &[Vec<Scalar>],
        _x: &[Scalar],
        _pos: usize,
    ) -> SelectionResult<()> {
        // Stateless: value() recomputes everything.
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn SubmodularFunction> {
        Box::new(Self {
            kernel: self.kernel.clone_box(),
            sigma: self.sigma,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::RbfKernel;
    use approx::assert_abs_diff_eq;

    #[test]
    fn empty_summary_has_zero_value() {
        let kernel = RbfKernel::with_sigma(1.0).unwrap();
        let f = Ivm::new(&kernel, 1.0).unwrap();
        assert_eq!(f.value(&[]).unwrap(), 0.0);
    }

    #[test]
    fn singleton_value_is_log_of_regularized_self_similarity() {
        let kernel = RbfKernel::new(1.0, 1.0).unwrap();
        let f = Ivm::new(&kernel, 1.0).unwrap();
        let solution = vec![vec![0.3, -0.7]];
        // log det([sigma + scale]) = log 2.
        assert_abs_diff_eq!(
            f.value(&solution).unwrap(),
            2.0_f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn sigma_must_be_positive() {
        let kernel = RbfKernel::with_sigma(1.0).unwrap();
        assert!(matches!(
            Ivm::new(&kernel, 0.0),
            Err(SelectionError::InvalidHyperparameter { name: "sigma", .. })
        ));
    }
}
