//! Pairwise similarity kernels over fixed-dimension points.

use std::sync::Arc;

use crate::Scalar;

pub mod rbf;

pub use rbf::RbfKernel;

/// Similarity function `k(x, y)` over points of equal dimension.
///
/// Implementations must be deeply cloneable: several optimizers clone the
/// objective they maximize, which in turn clones its kernel.
pub trait Kernel {
    /// Evaluates the kernel on the two given points.
    fn eval(&self, a: &[Scalar], b: &[Scalar]) -> Scalar;

    /// Returns an independent copy of this kernel.
    fn clone_box(&self) -> Box<dyn Kernel>;
}

impl Clone for Box<dyn Kernel> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Adapts a plain function into the [`Kernel`] trait.
///
/// Clones share the wrapped function, so it must be stateless; that is
/// declared, not enforced.
pub struct KernelFn {
    f: Arc<dyn Fn(&[Scalar], &[Scalar]) -> Scalar>,
}

impl KernelFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Scalar], &[Scalar]) -> Scalar + 'static,
    {
        Self { f: Arc::new(f) }
    }
}

impl Kernel for KernelFn {
    fn eval(&self, a: &[Scalar], b: &[Scalar]) -> Scalar {
        (self.f)(a, b)
    }

    fn clone_box(&self) -> Box<dyn Kernel> {
        Box::new(Self {
            f: Arc::clone(&self.f),
        })
    }
}
