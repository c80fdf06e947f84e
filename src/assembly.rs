//! DOF mapping and global assembly

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::elements::{ElementFamily, Material, Section};
use crate::error::FemResult;
use crate::math::{Mat, Vec};
use crate::mesh::Mesh;
use crate::results::ElementStiffness;

/// Global index of component `component` of node `node`
pub fn global_dof(node: usize, component: usize, dofs_per_node: usize) -> usize {
    node * dofs_per_node + component
}

/// Global DOF indices of an element, one contiguous run per node in local
/// order, so that local row `i` maps to `dofs[i]`
pub fn dof_indices(connectivity: &[usize], dofs_per_node: usize) -> std::vec::Vec<usize> {
    connectivity
        .iter()
        .flat_map(|&node| (0..dofs_per_node).map(move |c| global_dof(node, c, dofs_per_node)))
        .collect()
}

/// Dense global stiffness matrix and force vector
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSystem {
    pub stiffness: Mat,
    pub force: Vec,
}

impl GlobalSystem {
    /// Zeroed system of `num_dofs` equations
    pub fn new(num_dofs: usize) -> Self {
        Self {
            stiffness: Mat::zeros(num_dofs, num_dofs),
            force: Vec::zeros(num_dofs),
        }
    }

    pub fn num_dofs(&self) -> usize {
        self.force.len()
    }

    /// Add a local matrix into the rows and columns listed in `dofs`
    pub fn scatter(&mut self, local: &Mat, dofs: &[usize]) {
        for (i, &gi) in dofs.iter().enumerate() {
            for (j, &gj) in dofs.iter().enumerate() {
                self.stiffness[(gi, gj)] += local[(i, j)];
            }
        }
    }
}

/// Compute every local stiffness matrix with its DOF list
///
/// Runs on the rayon pool when `parallel` is set and the `parallel` feature is
/// enabled. The returned order is the element order regardless.
pub fn element_stiffnesses(
    family: ElementFamily,
    mesh: &Mesh,
    material: &Material,
    section: &Section,
    parallel: bool,
) -> FemResult<std::vec::Vec<ElementStiffness>> {
    let element = family.element();
    let dpn = family.dofs_per_node();

    let compute = |e: usize| -> FemResult<ElementStiffness> {
        let nodes = mesh.element_nodes(e)?;
        let matrix = element.stiffness(e, &nodes, material, section)?;
        Ok(ElementStiffness {
            element: e,
            dofs: dof_indices(mesh.element(e)?, dpn),
            matrix,
        })
    };

    #[cfg(feature = "parallel")]
    if parallel {
        return (0..mesh.num_elements()).into_par_iter().map(compute).collect();
    }
    #[cfg(not(feature = "parallel"))]
    if parallel {
        log::debug!("parallel assembly requested without the `parallel` feature, running serially");
    }

    (0..mesh.num_elements()).map(compute).collect()
}

/// Assemble the global stiffness matrix from scratch
///
/// The scatter-add is serial; only the local matrices are computed
/// concurrently. The force vector starts at zero.
pub fn assemble(
    family: ElementFamily,
    mesh: &Mesh,
    material: &Material,
    section: &Section,
    parallel: bool,
) -> FemResult<(GlobalSystem, std::vec::Vec<ElementStiffness>)> {
    let locals = element_stiffnesses(family, mesh, material, section, parallel)?;
    let mut system = GlobalSystem::new(mesh.num_nodes() * family.dofs_per_node());
    for local in &locals {
        system.scatter(&local.matrix, &local.dofs);
    }
    log::debug!(
        "assembled {} elements into {} DOFs",
        locals.len(),
        system.num_dofs()
    );
    Ok((system, locals))
}
