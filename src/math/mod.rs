//! Mathematical utilities for FE calculations

pub mod solver;

use nalgebra::{DMatrix, DVector};

pub use solver::solve_gaussian;

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// Check symmetry of a square matrix within a relative tolerance
pub fn is_symmetric(m: &Mat, tolerance: f64) -> bool {
    if !m.is_square() {
        return false;
    }
    let scale = m.amax().max(f64::MIN_POSITIVE);
    let n = m.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if (m[(i, j)] - m[(j, i)]).abs() > tolerance * scale {
                return false;
            }
        }
    }
    true
}

/// Largest absolute diagonal entry
pub fn max_diagonal(m: &Mat) -> f64 {
    m.diagonal().amax()
}
