//! Cross-section and thickness properties

use serde::{Deserialize, Serialize};

use crate::error::{FemError, FemResult};

/// Geometric constants of the element cross-section
///
/// Each family reads only what it needs: bars and trusses the area, beams the
/// second moment of area, CST and quad elements the thickness. Hexahedra read
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area
    #[serde(default = "one")]
    pub area: f64,
    /// Second moment of area about the bending axis
    #[serde(default = "one")]
    pub inertia: f64,
    /// Out-of-plane thickness for plane-stress elements
    #[serde(default = "one")]
    pub thickness: f64,
}

fn one() -> f64 {
    1.0
}

impl Section {
    /// Create a section with explicit properties
    pub fn new(area: f64, inertia: f64, thickness: f64) -> Self {
        Self {
            area,
            inertia,
            thickness,
        }
    }

    /// Section for axial members
    pub fn bar(area: f64) -> Self {
        Self {
            area,
            ..Self::default()
        }
    }

    /// Section for bending members
    pub fn beam(inertia: f64) -> Self {
        Self {
            inertia,
            ..Self::default()
        }
    }

    /// Section for plane-stress elements
    pub fn plate(thickness: f64) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    pub(crate) fn require_positive(name: &str, value: f64) -> FemResult<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(FemError::config(format!(
                "{name} must be positive (received {value})"
            )))
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert!(Section::require_positive("area", 0.01).is_ok());
        assert!(Section::require_positive("area", 0.0).is_err());
        assert!(Section::require_positive("area", f64::NAN).is_err());
    }
}
