//! Radial basis function kernel.

use super::Kernel;
use crate::error::SelectionError;
use crate::{Scalar, SelectionResult};

/// RBF kernel `k(x, y) = scale · exp(-‖x - y‖₂² / sigma)`.
///
/// Identical points short-circuit to `scale` without touching the
/// coordinates, so self-similarity is exact even for non-finite inputs.
#[derive(Clone, Debug)]
pub struct RbfKernel {
    sigma: Scalar,
    scale: Scalar,
}

impl RbfKernel {
    /// Creates an RBF kernel with the given bandwidth and scale. Both must
    /// be strictly positive.
    pub fn new(sigma: Scalar, scale: Scalar) -> SelectionResult<Self> {
        if sigma <= 0.0 {
            return Err(SelectionError::InvalidHyperparameter {
                name: "sigma",
                value: sigma,
            });
        }
        if scale <= 0.0 {
            return Err(SelectionError::InvalidHyperparameter {
                name: "scale",
                value: scale,
            });
        }
        Ok(Self { sigma, scale })
    }

    /// Unit-scale kernel with the given bandwidth.
    pub fn with_sigma(sigma: Scalar) -> SelectionResult<Self> {
        Self::new(sigma, 1.0)
    }
}

impl Kernel for RbfKernel {
    fn eval(&self, a: &[Scalar], b: &[Scalar]) -> Scalar {
        if a == b {
            return self.scale;
        }
        let mut dist = 0.0;
        for (ai, bi) in a.iter().zip(b) {
            let d = ai - bi;
            dist += d * d;
        }
        self.scale * (-dist / self.sigma).exp()
    }

    fn clone_box(&self) -> Box<dyn Kernel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identical_points_short_circuit_to_scale() {
        let k = RbfKernel::new(1.0, 3.5).unwrap();
        assert_eq!(k.eval(&[0.25, -1.0], &[0.25, -1.0]), 3.5);
    }

    #[test]
    fn known_value_and_symmetry() {
        let k = RbfKernel::new(2.0, 1.0).unwrap();
        let (x, y) = ([0.0, 0.0], [1.0, 1.0]);
        assert_abs_diff_eq!(k.eval(&x, &y), (-1.0_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(k.eval(&x, &y), k.eval(&y, &x), epsilon = 1e-15);
    }

    #[test]
    fn non_positive_hyperparameters_are_rejected() {
        assert!(matches!(
            RbfKernel::new(0.0, 1.0),
            Err(SelectionError::InvalidHyperparameter { name: "sigma", .. })
        ));
        assert!(matches!(
            RbfKernel::new(1.0, -2.0),
            Err(SelectionError::InvalidHyperparameter { name: "scale", .. })
        ));
    }
}
