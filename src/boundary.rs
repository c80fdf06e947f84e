//! Boundary conditions: penalty supports and concentrated loads
//!
//! A support adds a large stiffness `P` on the diagonal of each held DOF and
//! `P * value` to the force entry, so the DOF solves to `value` up to a
//! residual of order `K_ii / P`. `P` has to exceed the largest physical
//! stiffness by many orders of magnitude or the constraint leaks.

use std::collections::BTreeMap;

use crate::assembly::{global_dof, GlobalSystem};
use crate::elements::{ElementFamily, Support};
use crate::error::{FemError, FemResult};
use crate::loads::{LoadMode, NodeLoad};
use crate::math::max_diagonal;

/// Smallest ratio of penalty to largest physical diagonal entry that is
/// accepted without a warning
pub const MIN_PENALTY_RATIO: f64 = 1e8;

/// A held global DOF and its prescribed displacement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub dof: usize,
    pub value: f64,
}

fn check_target(
    what: &str,
    node: usize,
    component: usize,
    num_nodes: usize,
    family: ElementFamily,
) -> FemResult<()> {
    if node >= num_nodes {
        return Err(FemError::config(format!(
            "{what} on node {node}, mesh has {num_nodes} nodes"
        )));
    }
    let dpn = family.dofs_per_node();
    if component >= dpn {
        return Err(FemError::config(format!(
            "{what} on component {component}, {family} nodes have {dpn}"
        )));
    }
    Ok(())
}

/// Expand supports into held DOFs, sorted by DOF
///
/// A DOF listed by several supports keeps the value of the last one.
pub fn resolve_supports(
    supports: &[Support],
    num_nodes: usize,
    family: ElementFamily,
) -> FemResult<Vec<Constraint>> {
    let dpn = family.dofs_per_node();
    let mut held = BTreeMap::new();
    for support in supports {
        for component in support.held_components(dpn) {
            check_target("support", support.node, component, num_nodes, family)?;
            held.insert(global_dof(support.node, component, dpn), support.value);
        }
    }
    Ok(held
        .into_iter()
        .map(|(dof, value)| Constraint { dof, value })
        .collect())
}

/// Write concentrated loads into the force vector in list order
pub fn apply_loads(
    system: &mut GlobalSystem,
    loads: &[NodeLoad],
    num_nodes: usize,
    family: ElementFamily,
) -> FemResult<()> {
    let dpn = family.dofs_per_node();
    for load in loads {
        check_target("load", load.node, load.component, num_nodes, family)?;
        let dof = global_dof(load.node, load.component, dpn);
        match load.mode {
            LoadMode::Add => system.force[dof] += load.value,
            LoadMode::Set => system.force[dof] = load.value,
        }
    }
    Ok(())
}

/// Enforce constraints with the penalty method
pub fn apply_penalty(system: &mut GlobalSystem, constraints: &[Constraint], penalty: f64) {
    let physical = max_diagonal(&system.stiffness);
    if physical > 0.0 && penalty < MIN_PENALTY_RATIO * physical {
        log::warn!(
            "penalty {penalty:e} is less than {MIN_PENALTY_RATIO:e} times the largest stiffness {physical:e}; supports will not be enforced accurately"
        );
    }
    for c in constraints {
        system.stiffness[(c.dof, c.dof)] += penalty;
        system.force[c.dof] += penalty * c.value;
    }
    log::debug!("applied {} penalty constraints", constraints.len());
}
