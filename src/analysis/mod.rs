//! Analysis options and the solved analysis

mod solution;

pub use solution::Analysis;

use serde::{Deserialize, Serialize};

/// Default cap on the number of equations; the dense stiffness matrix of
/// this many DOFs takes 800 MB
pub const DEFAULT_MAX_DOFS: usize = 10_000;

/// Options for the assemble-and-solve pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Diagonal stiffness added at each supported DOF
    pub penalty: f64,
    /// A pivot is singular when its magnitude is at most this fraction of
    /// its row's largest entry
    pub pivot_tolerance: f64,
    /// Compute element stiffness matrices on the rayon pool
    pub parallel: bool,
    /// Scaled partial pivoting during elimination
    pub pivoting: bool,
    /// Largest system accepted before anything is allocated
    pub max_dofs: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            penalty: 1e20,
            pivot_tolerance: 1e-10,
            parallel: false,
            pivoting: true,
            max_dofs: DEFAULT_MAX_DOFS,
        }
    }
}

impl AnalysisOptions {
    /// Set the support penalty
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Set the relative pivot tolerance
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Compute local matrices in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the largest accepted number of DOFs
    pub fn with_max_dofs(mut self, max_dofs: usize) -> Self {
        self.max_dofs = max_dofs;
        self
    }

    /// Eliminate in natural row order
    pub fn without_pivoting(mut self) -> Self {
        self.pivoting = false;
        self
    }
}
