//! 8-node hexahedron (Hex8) element.
//!
//! - 8 nodes at the vertices, 3 DOFs per node (u, v, w)
//! - Trilinear shape functions `N_i = (1 + xi_i xi)(1 + eta_i eta)(1 + zeta_i zeta) / 8`
//! - 2x2x2 Gauss integration
//!
//! # Node Numbering
//!
//! ```text
//!        7-------6
//!       /|      /|
//!      / |     / |
//!     4-------5  |
//!     |  3----|--2
//!     | /     | /
//!     |/      |/
//!     0-------1
//! ```
//!
//! Nodes 0-3 form the bottom face counter-clockwise seen from above, nodes
//! 4-7 the top face in the same order.
//!
//! Strain is ordered `[exx, eyy, ezz, gxy, gyz, gxz]`.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use super::gauss::gauss_hex_2x2x2;
use super::{is_negligible, Element, Material, Node, Section};
use crate::error::{FemError, FemResult};
use crate::math::Mat;
use crate::results::ElementResponse;

type Mat6x24 = SMatrix<f64, 6, 24>;
type Mat24 = SMatrix<f64, 24, 24>;

const XI: [f64; 8] = [-1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0];
const ETA: [f64; 8] = [-1.0, -1.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0];
const ZETA: [f64; 8] = [-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0];

/// 8-node hexahedral element (trilinear brick)
#[derive(Debug, Clone, Copy, Default)]
pub struct Hex8;

impl Hex8 {
    /// Shape function derivatives (dN/dxi, dN/deta, dN/dzeta) for each node
    fn shape_derivatives(xi: f64, eta: f64, zeta: f64) -> [[f64; 8]; 3] {
        let mut dn = [[0.0; 8]; 3];
        for i in 0..8 {
            dn[0][i] = 0.125 * XI[i] * (1.0 + ETA[i] * eta) * (1.0 + ZETA[i] * zeta);
            dn[1][i] = 0.125 * (1.0 + XI[i] * xi) * ETA[i] * (1.0 + ZETA[i] * zeta);
            dn[2][i] = 0.125 * (1.0 + XI[i] * xi) * (1.0 + ETA[i] * eta) * ZETA[i];
        }
        dn
    }

    /// Jacobian with rows d(x, y, z)/dxi, d(x, y, z)/deta, d(x, y, z)/dzeta
    fn jacobian(nodes: &[Node], dn: &[[f64; 8]; 3]) -> Matrix3<f64> {
        let mut j = Matrix3::zeros();
        for (i, node) in nodes.iter().enumerate().take(8) {
            let coords = node.coords();
            for row in 0..3 {
                for col in 0..3 {
                    j[(row, col)] += dn[row][i] * coords[col];
                }
            }
        }
        j
    }

    /// 6x24 B matrix and Jacobian determinant at a natural point
    fn b_matrix(element: usize, nodes: &[Node], point: [f64; 3]) -> FemResult<(Mat6x24, f64)> {
        let dn = Self::shape_derivatives(point[0], point[1], point[2]);
        let j = Self::jacobian(nodes, &dn);

        let det_j = j.determinant();
        let scale = j.amax();
        if det_j <= 0.0 || is_negligible(det_j, scale.powi(3)) {
            return Err(FemError::degenerate(
                element,
                format!("Jacobian determinant {det_j:e} is not positive (inverted or flat element)"),
            ));
        }
        let j_inv = j
            .try_inverse()
            .ok_or_else(|| FemError::degenerate(element, "Jacobian is not invertible"))?;

        let mut b = Mat6x24::zeros();
        for i in 0..8 {
            let d = j_inv * Vector3::new(dn[0][i], dn[1][i], dn[2][i]);
            let (dx, dy, dz) = (d[0], d[1], d[2]);
            let col = 3 * i;

            b[(0, col)] = dx;
            b[(1, col + 1)] = dy;
            b[(2, col + 2)] = dz;

            b[(3, col)] = dy;
            b[(3, col + 1)] = dx;

            b[(4, col + 1)] = dz;
            b[(4, col + 2)] = dy;

            b[(5, col)] = dz;
            b[(5, col + 2)] = dx;
        }
        Ok((b, det_j))
    }
}

impl Element for Hex8 {
    fn num_nodes(&self) -> usize {
        8
    }

    fn dofs_per_node(&self) -> usize {
        3
    }

    fn validate_section(&self, _section: &Section) -> FemResult<()> {
        Ok(())
    }

    fn stiffness(
        &self,
        element: usize,
        nodes: &[Node],
        material: &Material,
        _section: &Section,
    ) -> FemResult<Mat> {
        let d = material.solid();
        let mut k = Mat24::zeros();
        for gp in gauss_hex_2x2x2() {
            let (b, det_j) = Self::b_matrix(element, nodes, gp.coords)?;
            k += b.transpose() * d * b * (det_j * gp.weight);
        }
        Ok(Mat::from_column_slice(24, 24, k.as_slice()))
    }

    fn response(
        &self,
        element: usize,
        nodes: &[Node],
        displacements: &[f64],
        material: &Material,
        _section: &Section,
    ) -> FemResult<ElementResponse> {
        let (b, _) = Self::b_matrix(element, nodes, [0.0; 3])?;
        let strain = b * SVector::<f64, 24>::from_column_slice(displacements);
        let stress = material.solid() * strain;

        let mut response_strain = [0.0; 6];
        let mut response_stress = [0.0; 6];
        response_strain.copy_from_slice(strain.as_slice());
        response_stress.copy_from_slice(stress.as_slice());
        Ok(ElementResponse::Solid {
            strain: response_strain,
            stress: response_stress,
        })
    }
}
