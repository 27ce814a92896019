//! Dense square matrices and the small amount of linear algebra the
//! objectives need: a column-wise Cholesky factorization and the
//! log-determinant derived from it.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::LinalgError;
use crate::Scalar;

/// Square `N x N` matrix with row-major storage, initialized to zero.
///
/// Element access is unchecked in release builds; indices are guarded by
/// `debug_assert!` only.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<Scalar>,
}

impl Matrix {
    /// Creates an `n x n` matrix filled with zeros.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Copies the leading `n_sub x n_sub` block of `other` into a new
    /// matrix. Requires `n_sub <= other.size()`.
    pub fn leading(other: &Matrix, n_sub: usize) -> Self {
        debug_assert!(n_sub <= other.n);
        let mut m = Matrix::new(n_sub);
        for i in 0..n_sub {
            for j in 0..n_sub {
                m[(i, j)] = other[(i, j)];
            }
        }
        m
    }

    /// Number of rows (equivalently columns).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Overwrites row `row` with the first `N` entries of `x`.
    pub fn replace_row(&mut self, row: usize, x: &[Scalar]) {
        debug_assert!(row < self.n && x.len() >= self.n);
        for j in 0..self.n {
            self[(row, j)] = x[j];
        }
    }

    /// Overwrites column `col` with the first `N` entries of `x`.
    pub fn replace_column(&mut self, col: usize, x: &[Scalar]) {
        debug_assert!(col < self.n && x.len() >= self.n);
        for i in 0..self.n {
            self[(i, col)] = x[i];
        }
    }

    /// Adds `x` componentwise to row `j` and column `j`. The diagonal
    /// entry receives the addition exactly once.
    pub fn rank_one_update(&mut self, j: usize, x: &[Scalar]) {
        debug_assert!(j < self.n && x.len() >= self.n);
        for i in 0..self.n {
            if i == j {
                self[(i, i)] += x[i];
            } else {
                self[(i, j)] += x[i];
                self[(j, i)] += x[i];
            }
        }
    }

    /// Column-wise Cholesky factorization of the leading `n_sub x n_sub`
    /// block: returns lower-triangular `L` with `L·Lᵀ` equal to that block.
    ///
    /// For each column j, `L[j,j] = sqrt(A[j,j] - Σ_{t<j} L[j,t]²)` and for
    /// i > j, `L[i,j] = (A[i,j] - Σ_{t<j} L[i,t]·L[j,t]) / L[j,j]`. A
    /// non-positive radicand means the block is not positive definite.
    pub fn cholesky(&self, n_sub: usize) -> Result<Matrix, LinalgError> {
        debug_assert!(n_sub <= self.n);
        let mut l = Matrix::new(n_sub);

        for j in 0..n_sub {
            let mut sum = 0.0;
            for t in 0..j {
                sum += l[(j, t)] * l[(j, t)];
            }
            let radicand = self[(j, j)] - sum;
            if radicand <= 0.0 {
                return Err(LinalgError::NotPositiveDefinite {
                    column: j,
                    radicand,
                });
            }
            l[(j, j)] = radicand.sqrt();

            for i in (j + 1)..n_sub {
                let mut sum = 0.0;
                for t in 0..j {
                    sum += l[(i, t)] * l[(j, t)];
                }
                l[(i, j)] = (self[(i, j)] - sum) / l[(j, j)];
            }
        }

        Ok(l)
    }

    /// Log-determinant of the leading `n_sub x n_sub` block, computed via
    /// Cholesky factorization.
    pub fn log_det(&self, n_sub: usize) -> Result<Scalar, LinalgError> {
        Ok(log_det_from_cholesky(&self.cholesky(n_sub)?))
    }
}

/// `log det A = 2 · Σᵢ log L[i,i]` for a lower-triangular `L` obtained from
/// a Cholesky factorization of `A`.
pub fn log_det_from_cholesky(l: &Matrix) -> Scalar {
    let mut det = 0.0;
    for i in 0..l.size() {
        det += l[(i, i)].ln();
    }
    2.0 * det
}

impl Index<(usize, usize)> for Matrix {
    type Output = Scalar;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &Scalar {
        debug_assert!(i < self.n && j < self.n);
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Scalar {
        debug_assert!(i < self.n && j < self.n);
        &mut self.data[i * self.n + j]
    }
}

impl fmt::Display for Matrix {
    /// Renders the matrix as a nested list that can be pasted into an
    /// interactive numpy session for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.n {
            write!(f, "[")?;
            for j in 0..self.n {
                if j + 1 < self.n {
                    write!(f, "{},", self[(i, j)])?;
                } else {
                    write!(f, "{}", self[(i, j)])?;
                }
            }
            if i + 1 < self.n {
                writeln!(f, "],")?;
            } else {
                write!(f, "]")?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spd_3x3() -> Matrix {
        // Hand-factorable: L = [[2,0,0],[1,2,0],[1,1,2]], so det = 64.
        let mut a = Matrix::new(3);
        let rows = [[4.0, 2.0, 2.0], [2.0, 5.0, 3.0], [2.0, 3.0, 6.0]];
        for (i, row) in rows.iter().enumerate() {
            a.replace_row(i, row);
        }
        a
    }

    #[test]
    fn cholesky_matches_hand_factorization() {
        let a = spd_3x3();
        let l = a.cholesky(3).unwrap();
        let expected = [[2.0, 0.0, 0.0], [1.0, 2.0, 0.0], [1.0, 1.0, 2.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(l[(i, j)], expected[i][j], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn log_det_matches_determinant() {
        let a = spd_3x3();
        assert_abs_diff_eq!(a.log_det(3).unwrap(), 64.0_f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            log_det_from_cholesky(&a.cholesky(3).unwrap()),
            64.0_f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn cholesky_of_leading_block() {
        let a = spd_3x3();
        let l = a.cholesky(2).unwrap();
        assert_eq!(l.size(), 2);
        assert_abs_diff_eq!(l[(0, 0)], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l[(1, 0)], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l[(1, 1)], 2.0, epsilon = 1e-12);
        // det of the leading 2x2 block [[4,2],[2,5]] is 16.
        assert_abs_diff_eq!(a.log_det(2).unwrap(), 16.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn indefinite_matrix_is_rejected() {
        let mut a = Matrix::new(2);
        a.replace_row(0, &[1.0, 2.0]);
        a.replace_row(1, &[2.0, 1.0]);
        match a.cholesky(2) {
            Err(LinalgError::NotPositiveDefinite { column, radicand }) => {
                assert_eq!(column, 1);
                assert!(radicand <= 0.0);
            }
            other => panic!("expected NotPositiveDefinite, got {other:?}"),
        }
    }

    #[test]
    fn rank_one_update_is_symmetric() {
        let mut a = Matrix::new(3);
        a.rank_one_update(1, &[1.0, 2.0, 3.0]);
        assert_eq!(a[(0, 1)], 1.0);
        assert_eq!(a[(1, 0)], 1.0);
        assert_eq!(a[(1, 1)], 2.0);
        assert_eq!(a[(2, 1)], 3.0);
        assert_eq!(a[(1, 2)], 3.0);
        assert_eq!(a[(0, 0)], 0.0);
    }

    #[test]
    fn leading_copies_the_upper_left_block() {
        let a = spd_3x3();
        let b = Matrix::leading(&a, 2);
        assert_eq!(b.size(), 2);
        assert_eq!(b[(0, 0)], 4.0);
        assert_eq!(b[(0, 1)], 2.0);
        assert_eq!(b[(1, 1)], 5.0);
    }

    #[test]
    fn replace_column_overwrites_one_column() {
        let mut a = Matrix::new(2);
        a.replace_column(1, &[7.0, 8.0]);
        assert_eq!(a[(0, 1)], 7.0);
        assert_eq!(a[(1, 1)], 8.0);
        assert_eq!(a[(0, 0)], 0.0);
    }

    #[test]
    fn display_is_numpy_pasteable() {
        let mut a = Matrix::new(2);
        a.replace_row(0, &[1.0, 2.0]);
        a.replace_row(1, &[3.0, 4.0]);
        assert_eq!(format!("{a}"), "[[1,2],\n[3,4]]");
    }
}
