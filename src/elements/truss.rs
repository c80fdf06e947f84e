//! Pin-jointed plane truss bar

use super::{is_negligible, Element, Material, Node, Section};
use crate::error::{FemError, FemResult};
use crate::math::Mat;
use crate::results::ElementResponse;

/// Two-node truss bar in the XY plane, DOFs `[u1, v1, u2, v2]`
///
/// The stiffness is the outer product of `t = [c, s, -c, -s]` scaled by
/// `EA/L`, where `c` and `s` are the direction cosines of the bar axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Truss2D;

/// Length and direction cosines of a bar
struct Orientation {
    length: f64,
    c: f64,
    s: f64,
}

impl Truss2D {
    fn orientation(element: usize, nodes: &[Node]) -> FemResult<Orientation> {
        let dx = nodes[1].x - nodes[0].x;
        let dy = nodes[1].y - nodes[0].y;
        let length = dx.hypot(dy);
        let scale = nodes
            .iter()
            .fold(0.0_f64, |acc, n| acc.max(n.x.abs()).max(n.y.abs()));
        if is_negligible(length, scale) {
            return Err(FemError::degenerate(element, "zero length"));
        }
        Ok(Orientation {
            length,
            c: dx / length,
            s: dy / length,
        })
    }
}

impl Element for Truss2D {
    fn num_nodes(&self) -> usize {
        2
    }

    fn dofs_per_node(&self) -> usize {
        2
    }

    fn validate_section(&self, section: &Section) -> FemResult<()> {
        Section::require_positive("cross-section area", section.area)
    }

    fn stiffness(
        &self,
        element: usize,
        nodes: &[Node],
        material: &Material,
        section: &Section,
    ) -> FemResult<Mat> {
        let Orientation { length, c, s } = Self::orientation(element, nodes)?;
        let t = [c, s, -c, -s];
        let ea_l = material.e * section.area / length;
        Ok(Mat::from_fn(4, 4, |i, j| ea_l * t[i] * t[j]))
    }

    fn response(
        &self,
        element: usize,
        nodes: &[Node],
        displacements: &[f64],
        material: &Material,
        section: &Section,
    ) -> FemResult<ElementResponse> {
        let Orientation { length, c, s } = Self::orientation(element, nodes)?;
        // Elongation projected on the bar axis
        let elongation = c * (displacements[2] - displacements[0])
            + s * (displacements[3] - displacements[1]);
        let strain = elongation / length;
        let stress = material.e * strain;
        Ok(ElementResponse::Axial {
            strain,
            stress,
            force: stress * section.area,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_bar() {
        let nodes = [Node::planar(0.0, 0.0), Node::planar(4.0, 0.0)];
        let k = Truss2D
            .stiffness(0, &nodes, &Material::new(100.0, 0.3), &Section::bar(2.0))
            .unwrap();
        assert_relative_eq!(k[(0, 0)], 50.0);
        assert_relative_eq!(k[(0, 2)], -50.0);
        assert_relative_eq!(k[(1, 1)], 0.0);
    }

    #[test]
    fn test_inclined_bar_is_symmetric_and_singular() {
        let nodes = [Node::planar(0.0, 0.0), Node::planar(3.0, 4.0)];
        let k = Truss2D
            .stiffness(0, &nodes, &Material::new(5.0, 0.3), &Section::bar(1.0))
            .unwrap();
        assert_eq!(k, k.transpose());
        assert_relative_eq!(k[(0, 1)], 0.6 * 0.8);
        assert_relative_eq!(k.determinant(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axial_strain_from_inclined_stretch() {
        let nodes = [Node::planar(0.0, 0.0), Node::planar(3.0, 4.0)];
        // Stretch by 0.05 along the axis
        let d = [0.0, 0.0, 0.03, 0.04];
        let response = Truss2D
            .response(0, &nodes, &d, &Material::new(1e3, 0.3), &Section::bar(2.0))
            .unwrap();
        assert_relative_eq!(response.strain()[0], 0.01);
        assert_relative_eq!(response.stress()[0], 10.0);
    }
}
