//! Quad element - 4-node isoparametric quadrilateral in plane stress

use nalgebra::{Matrix2, SMatrix, SVector, Vector2};

use super::gauss::gauss_quad_2x2;
use super::{is_negligible, Element, Material, Node, Section};
use crate::error::{FemError, FemResult};
use crate::math::Mat;
use crate::results::ElementResponse;

type Mat3x8 = SMatrix<f64, 3, 8>;
type Mat8 = SMatrix<f64, 8, 8>;

/// Natural coordinates of the corners: lower-left, lower-right, upper-right,
/// upper-left (counter-clockwise)
const XI: [f64; 4] = [-1.0, 1.0, 1.0, -1.0];
const ETA: [f64; 4] = [-1.0, -1.0, 1.0, 1.0];

/// Bilinear quadrilateral, DOFs `[u1, v1, ..., u4, v4]`, integrated with a
/// 2x2 Gauss rule
#[derive(Debug, Clone, Copy, Default)]
pub struct Quad4;

impl Quad4 {
    /// Shape function derivatives with respect to (xi, eta)
    fn shape_derivatives(xi: f64, eta: f64) -> ([f64; 4], [f64; 4]) {
        let mut dn_dxi = [0.0; 4];
        let mut dn_deta = [0.0; 4];
        for i in 0..4 {
            dn_dxi[i] = 0.25 * XI[i] * (1.0 + ETA[i] * eta);
            dn_deta[i] = 0.25 * (1.0 + XI[i] * xi) * ETA[i];
        }
        (dn_dxi, dn_deta)
    }

    /// B matrix and Jacobian determinant at a natural point
    fn b_matrix(element: usize, nodes: &[Node], xi: f64, eta: f64) -> FemResult<(Mat3x8, f64)> {
        let (dn_dxi, dn_deta) = Self::shape_derivatives(xi, eta);

        let mut j = Matrix2::zeros();
        for i in 0..4 {
            j[(0, 0)] += dn_dxi[i] * nodes[i].x;
            j[(0, 1)] += dn_dxi[i] * nodes[i].y;
            j[(1, 0)] += dn_deta[i] * nodes[i].x;
            j[(1, 1)] += dn_deta[i] * nodes[i].y;
        }

        let det_j = j.determinant();
        let scale = j.amax();
        if det_j <= 0.0 || is_negligible(det_j, scale * scale) {
            return Err(FemError::degenerate(
                element,
                format!("Jacobian determinant {det_j:e} at ({xi:.3}, {eta:.3}) is not positive"),
            ));
        }
        let j_inv = j
            .try_inverse()
            .ok_or_else(|| FemError::degenerate(element, "Jacobian is not invertible"))?;

        let mut b = Mat3x8::zeros();
        for i in 0..4 {
            let dn = j_inv * Vector2::new(dn_dxi[i], dn_deta[i]);
            let col = 2 * i;
            b[(0, col)] = dn[0];
            b[(1, col + 1)] = dn[1];
            b[(2, col)] = dn[1];
            b[(2, col + 1)] = dn[0];
        }
        Ok((b, det_j))
    }
}

impl Element for Quad4 {
    fn num_nodes(&self) -> usize {
        4
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
        let d = material.plane_stress();
        let mut k = Mat8::zeros();
        for gp in gauss_quad_2x2() {
            let (b, det_j) = Self::b_matrix(element, nodes, gp.coords[0], gp.coords[1])?;
            k += b.transpose() * d * b * (det_j * section.thickness * gp.weight);
        }
        Ok(Mat::from_column_slice(8, 8, k.as_slice()))
    }

    fn response(
        &self,
        element: usize,
        nodes: &[Node],
        displacements: &[f64],
        material: &Material,
        _section: &Section,
    ) -> FemResult<ElementResponse> {
        let (b, _) = Self::b_matrix(element, nodes, 0.0, 0.0)?;
        let strain = b * SVector::<f64, 8>::from_column_slice(displacements);
        let stress = material.plane_stress() * strain;
        Ok(ElementResponse::Plane {
            strain: [strain[0], strain[1], strain[2]],
            stress: [stress[0], stress[1], stress[2]],
        })
    }
}
