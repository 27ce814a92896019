//! Bounded-size representative summaries of vector data via submodular
//! maximization under a cardinality constraint.
//!
//! The crate has three layers. [`linalg`] provides the dense square matrix
//! and Cholesky routines the objectives are built on. [`functions`] defines
//! the peek/commit objective contract together with the informative vector
//! machine (log-determinant) objectives, including an incremental variant
//! that evaluates a candidate's marginal gain in `O(K²)`. [`optimizers`]
//! hosts the selection strategies themselves, from offline greedy to the
//! threshold-sieve streaming algorithms.
//!
//! Everything runs single-threaded and synchronous. Summaries are
//! bit-reproducible given the same inputs, parameters, and seed.

pub mod error;
pub mod functions;
pub mod kernels;
pub mod linalg;
pub mod optimizers;

/// Floating-point scalar used uniformly across the crate.
pub type Scalar = f64;

/// Opaque label a caller may attach to a point to recover which original
/// items ended up in the summary.
pub type ItemId = i64;

pub use error::{LinalgError, SelectionError, SelectionResult};
pub use functions::{fast_ivm::FastIvm, ivm::Ivm, FunctionFn, SubmodularFunction};
pub use kernels::{rbf::RbfKernel, Kernel, KernelFn};
pub use linalg::{log_det_from_cholesky, Matrix};
pub use optimizers::{
    greedy::Greedy,
    independent_set::IndependentSetImprovement,
    reservoir::ReservoirSampling,
    salsa::{Salsa, SalsaParams},
    sieve_streaming::SieveStreaming,
    sieve_streaming_pp::SieveStreamingPp,
    three_sieves::{ThreeSieves, ThresholdStrategy},
    Optimizer, OptimizerCore,
};
