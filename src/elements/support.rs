//! Support conditions

use serde::{Deserialize, Serialize};

/// Prescribed displacement at a node, enforced with the penalty method
///
/// `components` lists the local DOF components held (0 = u or v, 1 = v or
/// theta, ...); `None` holds every component of the node. `value` is the
/// prescribed displacement, zero for an ordinary support.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Node index
    pub node: usize,
    /// Held components, all when absent
    #[serde(default)]
    pub components: Option<Vec<usize>>,
    /// Prescribed displacement
    #[serde(default)]
    pub value: f64,
}

impl Support {
    /// Hold every component of a node at zero
    pub fn fixed(node: usize) -> Self {
        Self {
            node,
            components: None,
            value: 0.0,
        }
    }

    /// Hold the listed components of a node at zero
    pub fn components(node: usize, components: &[usize]) -> Self {
        Self {
            node,
            components: Some(components.to_vec()),
            value: 0.0,
        }
    }

    /// Set an enforced (non-zero) displacement
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    /// Held components for a family with `dofs_per_node` components
    pub fn held_components(&self, dofs_per_node: usize) -> Vec<usize> {
        match &self.components {
            Some(components) => components.clone(),
            None => (0..dofs_per_node).collect(),
        }
    }
}
