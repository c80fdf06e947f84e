//! Constant-strain triangle (CST) in plane stress

use nalgebra::{SMatrix, Vector3};

use super::{is_negligible, Element, Material, Node, Section};
use crate::error::{FemError, FemResult};
use crate::math::Mat;
use crate::results::ElementResponse;

type Mat3x6 = SMatrix<f64, 3, 6>;

/// Three-node triangle with DOFs `[u1, v1, u2, v2, u3, v3]`
///
/// Nodes must be ordered counter-clockwise; a clockwise or collinear triangle
/// is rejected as degenerate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cst;

impl Cst {
    /// Signed area and the constant strain-displacement matrix
    fn b_matrix(element: usize, nodes: &[Node]) -> FemResult<(f64, Mat3x6)> {
        let (x1, y1) = (nodes[0].x, nodes[0].y);
        let (x2, y2) = (nodes[1].x, nodes[1].y);
        let (x3, y3) = (nodes[2].x, nodes[2].y);

        let area = 0.5 * ((x2 - x1) * (y3 - y1) - (x3 - x1) * (y2 - y1));

        let longest_edge = nodes[0]
            .distance_to(&nodes[1])
            .max(nodes[1].distance_to(&nodes[2]))
            .max(nodes[2].distance_to(&nodes[0]));
        if area <= 0.0 || is_negligible(area, longest_edge * longest_edge) {
            return Err(FemError::degenerate(
                element,
                format!("triangle area {area:e} is not positive"),
            ));
        }

        let b = [y2 - y3, y3 - y1, y1 - y2];
        let c = [x3 - x2, x1 - x3, x2 - x1];

        let mut bm = Mat3x6::zeros();
        for i in 0..3 {
            bm[(0, 2 * i)] = b[i];
            bm[(1, 2 * i + 1)] = c[i];
            bm[(2, 2 * i)] = c[i];
            bm[(2, 2 * i + 1)] = b[i];
        }
        Ok((area, bm / (2.0 * area)))
    }
}

impl Element for Cst {
    fn num_nodes(&self) -> usize {
        3
    }

    fn dofs_per_node(&self) -> usize {
        2
    }

    fn validate_section(&self, section: &Section) -> FemResult<()> {
        Section::require_positive("thickness", section.thickness)
    }

    fn stiffness(
        &self,
        element: usize,
        nodes: &[Node],
        material: &Material,
        section: &Section,
    ) -> FemResult<Mat> {
        let (area, b) = Self::b_matrix(element, nodes)?;
        let d = material.plane_stress();
        let k = b.transpose() * d * b * (area * section.thickness);
        Ok(Mat::from_column_slice(6, 6, k.as_slice()))
    }

    fn response(
        &self,
        element: usize,
        nodes: &[Node],
        displacements: &[f64],
        material: &Material,
        _section: &Section,
    ) -> FemResult<ElementResponse> {
        let (_, b) = Self::b_matrix(element, nodes)?;
        let u = nalgebra::SVector::<f64, 6>::from_column_slice(displacements);
        let strain: Vector3<f64> = b * u;
        let stress = material.plane_stress() * strain;
        Ok(ElementResponse::Plane {
            strain: [strain[0], strain[1], strain[2]],
            stress: [stress[0], stress[1], stress[2]],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> [Node; 3] {
        [
            Node::planar(0.0, 0.0),
            Node::planar(1.0, 0.0),
            Node::planar(0.0, 1.0),
        ]
    }

    #[test]
    fn test_stiffness_is_symmetric_with_rigid_modes() {
        let k = Cst
            .stiffness(0, &unit_triangle(), &Material::new(3e7, 0.25), &Section::plate(1.0))
            .unwrap();
        for i in 0..6 {
            for j in 0..6 {
                assert_relative_eq!(k[(i, j)], k[(j, i)], max_relative = 1e-12);
            }
        }

        // Rigid translation in x produces no force
        let tx = Mat::from_column_slice(6, 1, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        let f = &k * tx;
        assert!(f.iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_constant_strain_recovery() {
        // u = 0.001 x, v = -0.0003 y
        let nodes = unit_triangle();
        let d: Vec<f64> = nodes
            .iter()
            .flat_map(|n| [0.001 * n.x, -0.0003 * n.y])
            .collect();
        let response = Cst
            .response(0, &nodes, &d, &Material::new(1e6, 0.3), &Section::plate(1.0))
            .unwrap();
        let strain = response.strain();
        assert_relative_eq!(strain[0], 0.001, epsilon = 1e-15);
        assert_relative_eq!(strain[1], -0.0003, epsilon = 1e-15);
        assert_relative_eq!(strain[2], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_clockwise_and_collinear_rejected() {
        let material = Material::steel();
        let section = Section::plate(1.0);
        let clockwise = [
            Node::planar(0.0, 0.0),
            Node::planar(0.0, 1.0),
            Node::planar(1.0, 0.0),
        ];
        let collinear = [
            Node::planar(0.0, 0.0),
            Node::planar(1.0, 1.0),
            Node::planar(2.0, 2.0),
        ];
        assert!(Cst.stiffness(0, &clockwise, &material, &section).is_err());
        assert!(Cst.stiffness(1, &collinear, &material, &section).is_err());
    }
}
