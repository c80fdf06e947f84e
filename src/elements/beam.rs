//! Euler-Bernoulli beam element with (v, theta) at each node

use super::{is_negligible, Element, Material, Node, Section};
use crate::error::{FemError, FemResult};
use crate::math::Mat;
use crate::results::ElementResponse;

/// Two-node Hermite beam in bending only
///
/// Local DOF order is `[v1, theta1, v2, theta2]`. The length is the distance
/// between the nodes, so the element may lie anywhere in the plane; the
/// transverse displacement is taken perpendicular to its axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Beam;

impl Beam {
    fn length(element: usize, nodes: &[Node]) -> FemResult<f64> {
        let length = nodes[0].distance_to(&nodes[1]);
        let scale = nodes
            .iter()
            .flat_map(|n| n.coords())
            .fold(0.0_f64, |acc, c| acc.max(c.abs()));
        if is_negligible(length, scale) {
            return Err(FemError::degenerate(element, "zero length"));
        }
        Ok(length)
    }

    fn local_stiffness(ei: f64, l: f64) -> Mat {
        let c = ei / l.powi(3);
        let l2 = l * l;

        #[rustfmt::skip]
        let k = Mat::from_row_slice(4, 4, &[
            12.0 * c,     6.0 * l * c, -12.0 * c,     6.0 * l * c,
            6.0 * l * c,  4.0 * l2 * c, -6.0 * l * c,  2.0 * l2 * c,
            -12.0 * c,   -6.0 * l * c,  12.0 * c,    -6.0 * l * c,
            6.0 * l * c,  2.0 * l2 * c, -6.0 * l * c,  4.0 * l2 * c,
        ]);
        k
    }
}

impl Element for Beam {
    fn num_nodes(&self) -> usize {
        2
    }

    fn dofs_per_node(&self) -> usize {
        2
    }

    fn validate_section(&self, section: &Section) -> FemResult<()> {
        Section::require_positive("second moment of area", section.inertia)
    }

    fn stiffness(
        &self,
        element: usize,
        nodes: &[Node],
        material: &Material,
        section: &Section,
    ) -> FemResult<Mat> {
        let l = Self::length(element, nodes)?;
        Ok(Self::local_stiffness(material.e * section.inertia, l))
    }

    fn response(
        &self,
        element: usize,
        nodes: &[Node],
        displacements: &[f64],
        material: &Material,
        section: &Section,
    ) -> FemResult<ElementResponse> {
        let l = Self::length(element, nodes)?;
        let ei = material.e * section.inertia;
        let (v1, t1, v2, t2) = (
            displacements[0],
            displacements[1],
            displacements[2],
            displacements[3],
        );

        // Second derivative of the Hermite interpolation at both ends
        let l2 = l * l;
        let curvature = [
            (-6.0 * v1 - 4.0 * l * t1 + 6.0 * v2 - 2.0 * l * t2) / l2,
            (6.0 * v1 + 2.0 * l * t1 - 6.0 * v2 + 4.0 * l * t2) / l2,
        ];
        let moment = [ei * curvature[0], ei * curvature[1]];

        let k = Self::local_stiffness(ei, l);
        let mut end_forces = [0.0; 4];
        for (i, force) in end_forces.iter_mut().enumerate() {
            *force = (0..4).map(|j| k[(i, j)] * displacements[j]).sum();
        }

        Ok(ElementResponse::Beam {
            curvature,
            moment,
            end_forces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_beam_stiffness_template() {
        let nodes = [Node::on_axis(0.0), Node::on_axis(2.0)];
        let k = Beam
            .stiffness(0, &nodes, &Material::new(8.0, 0.3), &Section::beam(1.0))
            .unwrap();
        // EI/L^3 = 1
        assert_relative_eq!(k[(0, 0)], 12.0);
        assert_relative_eq!(k[(0, 1)], 12.0);
        assert_relative_eq!(k[(1, 1)], 16.0);
        assert_relative_eq!(k[(1, 3)], 8.0);
        assert_relative_eq!(k[(2, 3)], -12.0);
        assert_eq!(k, k.transpose());
    }

    #[test]
    fn test_cantilever_tip_load_response() {
        // Exact cantilever displacements under a tip load P
        let (e, i, l, p): (f64, f64, f64, f64) = (2e5, 4e6, 1000.0, 1000.0);
        let v = p * l.powi(3) / (3.0 * e * i);
        let theta = p * l * l / (2.0 * e * i);
        let nodes = [Node::on_axis(0.0), Node::on_axis(l)];

        let response = Beam
            .response(0, &nodes, &[0.0, 0.0, v, theta], &Material::new(e, 0.3), &Section::beam(i))
            .unwrap();
        match response {
            ElementResponse::Beam {
                moment, end_forces, ..
            } => {
                assert_relative_eq!(moment[0], p * l, max_relative = 1e-10);
                assert_relative_eq!(moment[1], 0.0, epsilon = 1e-6);
                assert_relative_eq!(end_forces[2], p, max_relative = 1e-10);
                assert_relative_eq!(end_forces[0], -p, max_relative = 1e-10);
                assert_relative_eq!(end_forces[3], 0.0, epsilon = 1e-6);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn test_coincident_nodes_rejected() {
        let nodes = [Node::on_axis(3.0), Node::on_axis(3.0)];
        assert!(Beam
            .stiffness(0, &nodes, &Material::steel(), &Section::beam(1.0))
            .is_err());
    }
}
