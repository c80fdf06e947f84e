//! Two-node axial bar on the x axis (1 DOF per node)

use super::{is_negligible, Element, Material, Node, Section};
use crate::error::{FemError, FemResult};
use crate::math::Mat;
use crate::results::ElementResponse;

/// Axial bar: `k = EA/L [[1, -1], [-1, 1]]`
#[derive(Debug, Clone, Copy, Default)]
pub struct AxialBar;

impl AxialBar {
    /// Signed length x2 - x1, rejecting coincident nodes
    fn length(element: usize, nodes: &[Node]) -> FemResult<f64> {
        let (x1, x2) = (nodes[0].x, nodes[1].x);
        let length = x2 - x1;
        if is_negligible(length, x1.abs().max(x2.abs())) {
            return Err(FemError::degenerate(element, "zero length"));
        }
        Ok(length)
    }
}

impl Element for AxialBar {
    fn num_nodes(&self) -> usize {
        2
    }

    fn dofs_per_node(&self) -> usize {
        1
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
        let length = Self::length(element, nodes)?.abs();
        let k = material.e * section.area / length;
        Ok(Mat::from_row_slice(2, 2, &[k, -k, -k, k]))
    }

    fn response(
        &self,
        element: usize,
        nodes: &[Node],
        displacements: &[f64],
        material: &Material,
        section: &Section,
    ) -> FemResult<ElementResponse> {
        let length = Self::length(element, nodes)?;
        let strain = (displacements[1] - displacements[0]) / length;
        let stress = material.e * strain;
        Ok(ElementResponse::Axial {
            strain,
            stress,
            force: stress * section.area,
        })
    }
}
