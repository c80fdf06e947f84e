//! Material properties and constitutive matrices

use nalgebra::{Matrix3, Matrix6};
use serde::{Deserialize, Serialize};

use crate::error::{FemError, FemResult};

/// Linear elastic isotropic material, shared read-only by every element of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus)
    pub e: f64,
    /// Poisson's ratio
    #[serde(default = "default_nu")]
    pub nu: f64,
}

fn default_nu() -> f64 {
    0.3
}

impl Material {
    /// Create a new material with given properties
    pub fn new(e: f64, nu: f64) -> Self {
        Self { e, nu }
    }

    /// Structural steel in SI units (Pa)
    pub fn steel() -> Self {
        Self::new(210e9, 0.3)
    }

    /// Shear modulus G = E / (2 (1 + nu))
    pub fn shear_modulus(&self) -> f64 {
        self.e / (2.0 * (1.0 + self.nu))
    }

    /// Reject constants that cannot describe a stable elastic solid
    pub fn validate(&self) -> FemResult<()> {
        if !(self.e.is_finite() && self.e > 0.0) {
            return Err(FemError::config(format!(
                "Young's modulus must be positive (received {})",
                self.e
            )));
        }
        if !(self.nu > -1.0 && self.nu < 0.5) {
            return Err(FemError::config(format!(
                "Poisson's ratio must lie in (-1, 0.5) (received {})",
                self.nu
            )));
        }
        Ok(())
    }

    /// Plane-stress constitutive matrix relating [ex, ey, gxy] to [sx, sy, txy]
    pub fn plane_stress(&self) -> Matrix3<f64> {
        let c = self.e / (1.0 - self.nu * self.nu);
        let nu = self.nu;

        #[rustfmt::skip]
        let d = Matrix3::new(
            c,      c * nu, 0.0,
            c * nu, c,      0.0,
            0.0,    0.0,    c * (1.0 - nu) / 2.0,
        );
        d
    }

    /// Full 3D constitutive matrix for [exx, eyy, ezz, gxy, gyz, gxz]
    pub fn solid(&self) -> Matrix6<f64> {
        let nu = self.nu;
        let factor = self.e / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let normal = factor * (1.0 - nu);
        let coupled = factor * nu;
        let shear = factor * (1.0 - 2.0 * nu) / 2.0;

        let mut d = Matrix6::zeros();
        for i in 0..3 {
            for j in 0..3 {
                d[(i, j)] = if i == j { normal } else { coupled };
            }
            d[(i + 3, i + 3)] = shear;
        }
        d
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shear_modulus() {
        let mat = Material::new(200e9, 0.3);
        assert_relative_eq!(mat.shear_modulus(), 200e9 / 2.6, max_relative = 1e-12);
    }

    #[test]
    fn test_plane_stress_matrix() {
        let d = Material::new(3e7, 0.25).plane_stress();
        let c = 3e7 / (1.0 - 0.0625);
        assert_relative_eq!(d[(0, 0)], c);
        assert_relative_eq!(d[(0, 1)], 0.25 * c);
        assert_relative_eq!(d[(2, 2)], c * 0.375);
        assert_eq!(d, d.transpose());
    }

    #[test]
    fn test_solid_matrix_shear_term_is_g() {
        let mat = Material::new(2e5, 0.3);
        let d = mat.solid();
        assert_relative_eq!(d[(3, 3)], mat.shear_modulus(), max_relative = 1e-12);
        assert_relative_eq!(d[(0, 0)] - d[(0, 1)], 2.0 * mat.shear_modulus(), max_relative = 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(Material::new(0.0, 0.3).validate().is_err());
        assert!(Material::new(1.0, 0.5).validate().is_err());
        assert!(Material::new(1.0, -1.0).validate().is_err());
        assert!(Material::steel().validate().is_ok());
    }
}
