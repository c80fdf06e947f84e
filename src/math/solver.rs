//! Dense Gaussian elimination

use super::{Mat, Vec};
use crate::error::{FemError, FemResult};

/// Factor by which another row's scaled pivot must beat the diagonal before a
/// row swap is made. Keeps penalty rows from being mixed into free rows.
const SWAP_THRESHOLD: f64 = 10.0;

/// Solve `a x = b` by forward elimination and back-substitution
///
/// With `pivoting` enabled, rows are scaled by their largest original entry and
/// swapped only when another candidate is clearly better than the current
/// diagonal. A pivot whose magnitude is at most `tolerance` times its row scale
/// is reported as [`FemError::SingularSystem`]; the index in the error is the
/// elimination step (the global DOF when no swap happened).
pub fn solve_gaussian(a: &Mat, b: &Vec, pivoting: bool, tolerance: f64) -> FemResult<Vec> {
    let n = a.nrows();
    if !a.is_square() || b.len() != n {
        return Err(FemError::config(format!(
            "system dimensions do not match: {}x{} matrix, {} right-hand side",
            a.nrows(),
            a.ncols(),
            b.len()
        )));
    }

    let mut m = a.clone();
    let mut rhs = b.clone();
    let mut scale: std::vec::Vec<f64> = (0..n).map(|i| m.row(i).amax()).collect();

    for k in 0..n {
        if pivoting {
            let ratio = |row: usize, m: &Mat| {
                if scale[row] > 0.0 {
                    m[(row, k)].abs() / scale[row]
                } else {
                    0.0
                }
            };
            let current = ratio(k, &m);
            let mut best = k;
            let mut best_ratio = current;
            for i in (k + 1)..n {
                let r = ratio(i, &m);
                if r > best_ratio {
                    best = i;
                    best_ratio = r;
                }
            }
            if best != k && best_ratio > SWAP_THRESHOLD * current {
                m.swap_rows(k, best);
                rhs.swap_rows(k, best);
                scale.swap(k, best);
            }
        }

        let pivot = m[(k, k)];
        if scale[k] == 0.0 || pivot.abs() <= tolerance * scale[k] {
            return Err(FemError::SingularSystem { pivot: k });
        }

        for i in (k + 1)..n {
            let factor = m[(i, k)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                let mkj = m[(k, j)];
                m[(i, j)] -= factor * mkj;
            }
            let rk = rhs[k];
            rhs[i] -= factor * rk;
        }
    }

    let mut x = Vec::zeros(n);
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= m[(i, j)] * x[j];
        }
        x[i] = sum / m[(i, i)];
    }

    if let Some(i) = x.iter().position(|v| !v.is_finite()) {
        return Err(FemError::SingularSystem { pivot: i });
    }
    Ok(x)
}
