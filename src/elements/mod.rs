//! Element families and their stiffness formulations
//!
//! Every family implements [`Element`]; [`ElementFamily`] is the closed set of
//! families an analysis can be built from and dispatches to the matching
//! formulation.

mod bar;
mod beam;
mod cst;
pub mod gauss;
mod hex;
mod material;
mod node;
mod quad;
mod section;
mod support;
mod truss;

pub use bar::AxialBar;
pub use beam::Beam;
pub use cst::Cst;
pub use hex::Hex8;
pub use material::Material;
pub use node::Node;
pub use quad::Quad4;
pub use section::Section;
pub use support::Support;
pub use truss::Truss2D;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FemResult;
use crate::math::Mat;
use crate::results::ElementResponse;

/// Relative tolerance below which lengths, areas and Jacobian determinants
/// count as zero
pub(crate) const GEOMETRY_TOL: f64 = 1e-12;

/// Element interface shared by all families
pub trait Element: Send + Sync {
    /// Number of nodes per element
    fn num_nodes(&self) -> usize;

    /// Number of degrees of freedom per node
    fn dofs_per_node(&self) -> usize;

    /// Total degrees of freedom of one element
    fn num_dofs(&self) -> usize {
        self.num_nodes() * self.dofs_per_node()
    }

    /// Check that the section carries the constants this family reads
    fn validate_section(&self, section: &Section) -> FemResult<()>;

    /// Compute the local stiffness matrix, in the DOF order of `nodes`
    ///
    /// `element` only labels degenerate-geometry errors.
    fn stiffness(
        &self,
        element: usize,
        nodes: &[Node],
        material: &Material,
        section: &Section,
    ) -> FemResult<Mat>;

    /// Recover strain and stress from the element's displacement sub-vector
    fn response(
        &self,
        element: usize,
        nodes: &[Node],
        displacements: &[f64],
        material: &Material,
        section: &Section,
    ) -> FemResult<ElementResponse>;
}

/// The element families supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementFamily {
    /// 2-node bar along x, axial displacement only
    AxialBar,
    /// 2-node Euler-Bernoulli beam, transverse displacement and rotation
    Beam,
    /// 2-node pin-jointed bar in the XY plane
    Truss,
    /// 3-node constant-strain triangle, plane stress
    Cst,
    /// 4-node isoparametric quadrilateral, plane stress
    Quad4,
    /// 8-node trilinear hexahedron
    Hex8,
}

impl ElementFamily {
    /// All families, in declaration order
    pub const ALL: [ElementFamily; 6] = [
        Self::AxialBar,
        Self::Beam,
        Self::Truss,
        Self::Cst,
        Self::Quad4,
        Self::Hex8,
    ];

    /// The formulation implementing this family
    pub fn element(&self) -> &'static dyn Element {
        match self {
            Self::AxialBar => &AxialBar,
            Self::Beam => &Beam,
            Self::Truss => &Truss2D,
            Self::Cst => &Cst,
            Self::Quad4 => &Quad4,
            Self::Hex8 => &Hex8,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.element().num_nodes()
    }

    pub fn dofs_per_node(&self) -> usize {
        self.element().dofs_per_node()
    }

    /// Labels of the per-node DOF components, in local order
    pub fn dof_labels(&self) -> &'static [&'static str] {
        match self {
            Self::AxialBar => &["u"],
            Self::Beam => &["v", "theta"],
            Self::Truss | Self::Cst | Self::Quad4 => &["u", "v"],
            Self::Hex8 => &["u", "v", "w"],
        }
    }

    /// Number of leading per-node components that are translations
    pub fn translational_dofs(&self) -> usize {
        match self {
            Self::Beam => 1,
            _ => self.dofs_per_node(),
        }
    }
}

impl fmt::Display for ElementFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AxialBar => "axial bar",
            Self::Beam => "beam",
            Self::Truss => "truss",
            Self::Cst => "CST",
            Self::Quad4 => "quad4",
            Self::Hex8 => "hex8",
        };
        f.write_str(name)
    }
}

/// True when `value` is zero relative to `scale`
pub(crate) fn is_negligible(value: f64, scale: f64) -> bool {
    value.abs() <= GEOMETRY_TOL * scale.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dofs_per_node() {
        assert_eq!(ElementFamily::AxialBar.dofs_per_node(), 1);
        assert_eq!(ElementFamily::Beam.dofs_per_node(), 2);
        assert_eq!(ElementFamily::Truss.dofs_per_node(), 2);
        assert_eq!(ElementFamily::Cst.dofs_per_node(), 2);
        assert_eq!(ElementFamily::Quad4.dofs_per_node(), 2);
        assert_eq!(ElementFamily::Hex8.dofs_per_node(), 3);
    }

    #[test]
    fn test_labels_match_dof_count() {
        for family in ElementFamily::ALL {
            assert_eq!(family.dof_labels().len(), family.dofs_per_node());
        }
    }

    #[test]
    fn test_family_serde_names() {
        let family: ElementFamily = serde_json::from_str("\"quad4\"").unwrap();
        assert_eq!(family, ElementFamily::Quad4);
        assert_eq!(serde_json::to_string(&ElementFamily::AxialBar).unwrap(), "\"axial_bar\"");
    }
}
