//! FE Model - element family, mesh, constants and boundary conditions

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, AnalysisOptions, DEFAULT_MAX_DOFS};
use crate::assembly::{assemble, dof_indices};
use crate::boundary::{apply_loads, apply_penalty, resolve_supports};
use crate::config::AnalysisConfig;
use crate::elements::{ElementFamily, Material, Section, Support};
use crate::error::{FemError, FemResult};
use crate::loads::NodeLoad;
use crate::math::{self, solve_gaussian};
use crate::mesh::Mesh;
use crate::results::{ElementResponse, Reaction};

// wasm32-unknown-unknown has no monotonic clock; timings there log as zero
#[cfg(not(target_arch = "wasm32"))]
fn clock() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn clock() -> Option<Instant> {
    None
}

fn elapsed_ms(start: Option<Instant>) -> f64 {
    start.map_or(0.0, |s| s.elapsed().as_secs_f64() * 1e3)
}

/// Everything one analysis run needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeModel {
    pub family: ElementFamily,
    pub mesh: Mesh,
    pub material: Material,
    pub section: Section,
    pub supports: Vec<Support>,
    pub loads: Vec<NodeLoad>,
}

impl FeModel {
    /// Create a model with no supports or loads
    pub fn new(family: ElementFamily, mesh: Mesh, material: Material, section: Section) -> Self {
        Self {
            family,
            mesh,
            material,
            section,
            supports: Vec::new(),
            loads: Vec::new(),
        }
    }

    /// Generate the mesh described by a configuration
    pub fn from_config(config: &AnalysisConfig) -> FemResult<Self> {
        let mesh = config.mesh.generate()?;
        Ok(Self {
            family: config.family,
            mesh,
            material: config.material,
            section: config.section,
            supports: config.supports.clone(),
            loads: config.loads.clone(),
        })
    }

    /// Number of equations, rejected above `max_dofs` before any allocation
    pub fn checked_dofs(&self, max_dofs: usize) -> FemResult<usize> {
        let dofs = self
            .mesh
            .num_nodes()
            .checked_mul(self.family.dofs_per_node())
            .filter(|&n| n <= max_dofs)
            .ok_or_else(|| {
                FemError::config(format!(
                    "{} nodes with {} DOFs each exceed the limit of {max_dofs} DOFs",
                    self.mesh.num_nodes(),
                    self.family.dofs_per_node()
                ))
            })?;
        Ok(dofs)
    }

    fn check_node(&self, node: usize) -> FemResult<()> {
        self.mesh.node(node).map(|_| ())
    }

    /// Add a support condition
    pub fn add_support(&mut self, support: Support) -> FemResult<()> {
        self.check_node(support.node)?;
        self.supports.push(support);
        Ok(())
    }

    /// Add a concentrated load
    pub fn add_node_load(&mut self, load: NodeLoad) -> FemResult<()> {
        self.check_node(load.node)?;
        let dpn = self.family.dofs_per_node();
        if load.component >= dpn {
            return Err(FemError::config(format!(
                "load component {} out of range, {} nodes have {dpn}",
                load.component, self.family
            )));
        }
        self.loads.push(load);
        Ok(())
    }

    /// Reject invalid constants and connectivity before any assembly
    pub fn validate(&self) -> FemResult<()> {
        self.material.validate()?;
        self.family.element().validate_section(&self.section)?;
        self.mesh.validate(self.family)
    }

    // ========================
    // Analysis
    // ========================

    /// Run the full pipeline from a zeroed system
    ///
    /// Assemble, apply loads and supports, solve, then recover reactions and
    /// element responses. Any error aborts the run and nothing is returned.
    pub fn analyze(&self, options: &AnalysisOptions) -> FemResult<Analysis> {
        let start = clock();
        self.validate()?;
        self.checked_dofs(options.max_dofs)?;

        if !(options.penalty.is_finite() && options.penalty > 0.0) {
            return Err(FemError::config(format!(
                "penalty must be positive (received {})",
                options.penalty
            )));
        }

        let num_nodes = self.mesh.num_nodes();
        let (mut system, locals) = assemble(
            self.family,
            &self.mesh,
            &self.material,
            &self.section,
            options.parallel,
        )?;
        let stiffness = system.stiffness.clone();

        apply_loads(&mut system, &self.loads, num_nodes, self.family)?;
        let force = system.force.clone();

        let constraints = resolve_supports(&self.supports, num_nodes, self.family)?;
        apply_penalty(&mut system, &constraints, options.penalty);

        let solve_start = clock();
        let displacements = solve_gaussian(
            &system.stiffness,
            &system.force,
            options.pivoting,
            options.pivot_tolerance,
        )?;
        log::debug!(
            "solved {} DOFs in {:.3} ms",
            system.num_dofs(),
            elapsed_ms(solve_start)
        );

        // R = K u - F at held DOFs, with the unconstrained K
        let internal = &stiffness * &displacements;
        let dpn = self.family.dofs_per_node();
        let reactions = constraints
            .iter()
            .map(|c| Reaction {
                node: c.dof / dpn,
                component: c.dof % dpn,
                dof: c.dof,
                value: internal[c.dof] - force[c.dof],
            })
            .collect();

        let responses = self.element_responses(displacements.as_slice())?;

        log::info!(
            "{} analysis: {} nodes, {} elements, {} DOFs ({} held) in {:.3} ms",
            self.family,
            num_nodes,
            self.mesh.num_elements(),
            system.num_dofs(),
            constraints.len(),
            elapsed_ms(start)
        );

        Ok(Analysis {
            family: self.family,
            mesh: self.mesh.clone(),
            stiffness,
            constrained_stiffness: system.stiffness,
            force,
            displacements,
            locals,
            responses,
            constraints,
            reactions,
        })
    }

    /// Strain and stress of every element from the global displacements
    fn element_responses(&self, displacements: &[f64]) -> FemResult<Vec<ElementResponse>> {
        let element = self.family.element();
        let dpn = self.family.dofs_per_node();
        (0..self.mesh.num_elements())
            .map(|e| {
                let nodes = self.mesh.element_nodes(e)?;
                let local: Vec<f64> = dof_indices(self.mesh.element(e)?, dpn)
                    .into_iter()
                    .map(|dof| displacements[dof])
                    .collect();
                element.response(e, &nodes, &local, &self.material, &self.section)
            })
            .collect()
    }

    /// Assembled stiffness without supports, for inspection before a solve
    pub fn assembled_stiffness(&self, parallel: bool) -> FemResult<math::Mat> {
        self.validate()?;
        self.checked_dofs(DEFAULT_MAX_DOFS)?;
        let (system, _) = assemble(
            self.family,
            &self.mesh,
            &self.material,
            &self.section,
            parallel,
        )?;
        Ok(system.stiffness)
    }
}
