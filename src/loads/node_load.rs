//! Node loads - concentrated forces and moments applied directly to DOFs

use serde::{Deserialize, Serialize};

/// How a load combines with the value already in the force vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Accumulate into the entry
    #[default]
    Add,
    /// Overwrite the entry
    Set,
}

/// A load on one DOF component of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Node index
    pub node: usize,
    /// Local DOF component (0 = u for bars, v for beams, ...)
    pub component: usize,
    /// Force (or moment, for the beam rotation component)
    pub value: f64,
    #[serde(default)]
    pub mode: LoadMode,
}

impl NodeLoad {
    /// Create an accumulating load
    pub fn new(node: usize, component: usize, value: f64) -> Self {
        Self {
            node,
            component,
            value,
            mode: LoadMode::Add,
        }
    }

    /// Create a load that overwrites the force entry
    pub fn set(node: usize, component: usize, value: f64) -> Self {
        Self {
            mode: LoadMode::Set,
            ..Self::new(node, component, value)
        }
    }
}
