//! Immutable result of one analysis run, with bounds-checked queries

use crate::boundary::Constraint;
use crate::elements::ElementFamily;
use crate::error::{FemError, FemResult};
use crate::math::{Mat, Vec as FeVec};
use crate::mesh::Mesh;
use crate::results::{
    AnalysisReport, AnalysisSummary, DofInspection, ElementResponse, ElementStiffness,
    NodeDisplacement, Reaction,
};

/// A completed analysis
///
/// Built once by [`FeModel::analyze`](crate::model::FeModel::analyze) and
/// never mutated afterwards. A failed run produces an error instead, so every
/// value reachable from here is finite.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub(crate) family: ElementFamily,
    pub(crate) mesh: Mesh,
    /// Assembled stiffness before supports
    pub(crate) stiffness: Mat,
    /// Stiffness with penalty terms on the held diagonal entries
    pub(crate) constrained_stiffness: Mat,
    /// Applied nodal loads
    pub(crate) force: FeVec,
    pub(crate) displacements: FeVec,
    pub(crate) locals: Vec<ElementStiffness>,
    pub(crate) responses: Vec<ElementResponse>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) reactions: Vec<Reaction>,
}

impl Analysis {
    pub fn family(&self) -> ElementFamily {
        self.family
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn num_dofs(&self) -> usize {
        self.force.len()
    }

    /// Reject DOF indices outside `[0, num_dofs)`
    pub fn check_dof(&self, dof: usize) -> FemResult<()> {
        if dof < self.num_dofs() {
            Ok(())
        } else {
            Err(FemError::DofOutOfRange {
                index: dof,
                len: self.num_dofs(),
            })
        }
    }

    fn check_element(&self, element: usize) -> FemResult<()> {
        if element < self.locals.len() {
            Ok(())
        } else {
            Err(FemError::ElementOutOfRange {
                index: element,
                len: self.locals.len(),
            })
        }
    }

    fn check_node(&self, node: usize) -> FemResult<()> {
        self.mesh.node(node).map(|_| ())
    }

    /// Global stiffness matrix as assembled, before supports
    pub fn stiffness_matrix(&self) -> &Mat {
        &self.stiffness
    }

    /// Global stiffness matrix with the penalty terms, as solved
    pub fn constrained_stiffness(&self) -> &Mat {
        &self.constrained_stiffness
    }

    /// Applied load vector
    pub fn force_vector(&self) -> &FeVec {
        &self.force
    }

    pub fn displacement_vector(&self) -> &FeVec {
        &self.displacements
    }

    /// Entry `(row, col)` of the assembled stiffness
    pub fn stiffness_entry(&self, row: usize, col: usize) -> FemResult<f64> {
        self.check_dof(row)?;
        self.check_dof(col)?;
        Ok(self.stiffness[(row, col)])
    }

    /// Applied load at a DOF
    pub fn force(&self, dof: usize) -> FemResult<f64> {
        self.check_dof(dof)?;
        Ok(self.force[dof])
    }

    /// Solved displacement at a DOF
    pub fn displacement(&self, dof: usize) -> FemResult<f64> {
        self.check_dof(dof)?;
        Ok(self.displacements[dof])
    }

    /// Solved displacement components of a node
    pub fn node_displacement(&self, node: usize) -> FemResult<NodeDisplacement> {
        self.check_node(node)?;
        let dpn = self.family.dofs_per_node();
        let values = self.displacements.as_slice()[node * dpn..(node + 1) * dpn].to_vec();
        let magnitude = values[..self.family.translational_dofs()]
            .iter()
            .map(|v| v * v)
            .sum::<f64>()
            .sqrt();
        Ok(NodeDisplacement {
            node,
            values,
            magnitude,
        })
    }

    /// Displacements of every node, in node order
    pub fn node_displacements(&self) -> Vec<NodeDisplacement> {
        (0..self.mesh.num_nodes())
            .filter_map(|n| self.node_displacement(n).ok())
            .collect()
    }

    /// Local stiffness matrix of an element and its global DOF list
    pub fn element_stiffness(&self, element: usize) -> FemResult<&ElementStiffness> {
        self.check_element(element)?;
        Ok(&self.locals[element])
    }

    pub fn element_stiffnesses(&self) -> &[ElementStiffness] {
        &self.locals
    }

    /// Recovered strain and stress of an element
    pub fn element_response(&self, element: usize) -> FemResult<&ElementResponse> {
        self.check_element(element)?;
        Ok(&self.responses[element])
    }

    pub fn element_responses(&self) -> &[ElementResponse] {
        &self.responses
    }

    /// Elements connected to a node
    pub fn elements_at_node(&self, node: usize) -> FemResult<Vec<usize>> {
        self.check_node(node)?;
        Ok(self.mesh.elements_at_node(node))
    }

    pub fn is_constrained(&self, dof: usize) -> bool {
        self.constraints.iter().any(|c| c.dof == dof)
    }

    /// Support reactions, one per held DOF
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Everything known about one DOF, for the matrix and mesh views
    pub fn inspect_dof(&self, dof: usize) -> FemResult<DofInspection> {
        self.check_dof(dof)?;
        let dpn = self.family.dofs_per_node();
        let node = dof / dpn;
        let coupled = (0..self.num_dofs())
            .filter(|&j| self.stiffness[(dof, j)] != 0.0)
            .collect();
        Ok(DofInspection {
            dof,
            node,
            label: self.family.dof_labels()[dof % dpn].to_string(),
            coupled,
            load: self.force[dof],
            displacement: self.displacements[dof],
            constrained: self.is_constrained(dof),
            elements: self.mesh.elements_at_node(node),
        })
    }

    /// Whether matrix cell `(row, col)` lies on the row or column of `dof`
    pub fn is_highlighted(&self, dof: usize, row: usize, col: usize) -> FemResult<bool> {
        self.check_dof(dof)?;
        self.check_dof(row)?;
        self.check_dof(col)?;
        Ok(row == dof || col == dof)
    }

    pub fn summary(&self) -> AnalysisSummary {
        let mut summary = AnalysisSummary {
            num_nodes: self.mesh.num_nodes(),
            num_elements: self.mesh.num_elements(),
            total_dofs: self.num_dofs(),
            constrained_dofs: self.constraints.len(),
            ..Default::default()
        };

        for disp in self.node_displacements() {
            if disp.magnitude > summary.max_displacement {
                summary.max_displacement = disp.magnitude;
                summary.max_displacement_node = disp.node;
            }
        }

        for (e, response) in self.responses.iter().enumerate() {
            let stress = response.von_mises();
            if stress > summary.max_stress {
                summary.max_stress = stress;
                summary.max_stress_element = e;
            }
        }

        summary
    }

    /// Serializable view for the front ends
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            summary: self.summary(),
            displacements: self.node_displacements(),
            elements: self.responses.clone(),
            reactions: self.reactions.clone(),
        }
    }
}
