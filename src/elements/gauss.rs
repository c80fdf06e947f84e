//! Gauss-Legendre quadrature rules on the reference square and cube

/// A quadrature point in natural coordinates with its weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    /// Natural coordinates (xi, eta, zeta); unused coordinates stay at zero
    pub coords: [f64; 3],
    /// Integration weight
    pub weight: f64,
}

/// Two-point rule on [-1, 1]: abscissae at +-1/sqrt(3), unit weights
pub fn gauss_1d_2() -> [(f64, f64); 2] {
    let p = 1.0 / 3.0_f64.sqrt();
    [(-p, 1.0), (p, 1.0)]
}

/// 2x2 rule on the reference square
pub fn gauss_quad_2x2() -> Vec<GaussPoint> {
    let mut points = Vec::with_capacity(4);
    for (xi, wx) in gauss_1d_2() {
        for (eta, wy) in gauss_1d_2() {
            points.push(GaussPoint {
                coords: [xi, eta, 0.0],
                weight: wx * wy,
            });
        }
    }
    points
}

/// 2x2x2 rule on the reference cube
pub fn gauss_hex_2x2x2() -> Vec<GaussPoint> {
    let mut points = Vec::with_capacity(8);
    for (xi, wx) in gauss_1d_2() {
        for (eta, wy) in gauss_1d_2() {
            for (zeta, wz) in gauss_1d_2() {
                points.push(GaussPoint {
                    coords: [xi, eta, zeta],
                    weight: wx * wy * wz,
                });
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_reference_measure() {
        let square: f64 = gauss_quad_2x2().iter().map(|p| p.weight).sum();
        let cube: f64 = gauss_hex_2x2x2().iter().map(|p| p.weight).sum();
        assert_relative_eq!(square, 4.0);
        assert_relative_eq!(cube, 8.0);
    }

    #[test]
    fn test_two_point_rule_integrates_cubics() {
        // integral of x^3 + x^2 over [-1, 1] = 2/3
        let sum: f64 = gauss_1d_2()
            .iter()
            .map(|&(x, w)| w * (x.powi(3) + x.powi(2)))
            .sum();
        assert_relative_eq!(sum, 2.0 / 3.0, epsilon = 1e-14);
    }
}
