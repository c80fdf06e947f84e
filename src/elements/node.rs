//! Node - a point of the mesh carrying the element DOFs

use serde::{Deserialize, Serialize};

/// A node of the finite element mesh
///
/// Families that live in fewer than three dimensions leave the unused
/// coordinates at zero: the axial bar and the beam only read `x`, the 2D
/// families read `x` and `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    #[serde(default)]
    pub y: f64,
    /// Z coordinate
    #[serde(default)]
    pub z: f64,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a node on the x axis
    pub fn on_axis(x: f64) -> Self {
        Self::new(x, 0.0, 0.0)
    }

    /// Create a node in the XY plane
    pub fn planar(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(1.0, 2.0, 3.0);
        assert_eq!(node.coords(), [1.0, 2.0, 3.0]);
        assert_eq!(Node::planar(4.0, 5.0).z, 0.0);
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0.0, 0.0, 0.0);
        let n2 = Node::new(3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_coordinates_default_to_zero() {
        let node: Node = serde_json::from_str(r#"{"x": 2.5}"#).unwrap();
        assert_eq!(node, Node::on_axis(2.5));
    }
}
