//! Mesh description and structured mesh generators
//!
//! Nodes are numbered in row-major order (x fastest, then y, then z) so the
//! global DOF numbering follows the geometry. Element connectivity is emitted
//! in the local order each family's formulation expects: counter-clockwise
//! for triangles and quadrilaterals, bottom face then top face for hexahedra.

use serde::{Deserialize, Serialize};

use crate::elements::{ElementFamily, Node};
use crate::error::{FemError, FemResult};

/// Nodes and element connectivity of one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub nodes: Vec<Node>,
    /// Ordered node indices of every element
    pub elements: Vec<Vec<usize>>,
}

impl Mesh {
    pub fn new(nodes: Vec<Node>, elements: Vec<Vec<usize>>) -> Self {
        Self { nodes, elements }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Bounds-checked node lookup
    pub fn node(&self, index: usize) -> FemResult<&Node> {
        self.nodes.get(index).ok_or(FemError::NodeOutOfRange {
            index,
            len: self.nodes.len(),
        })
    }

    /// Bounds-checked connectivity lookup
    pub fn element(&self, index: usize) -> FemResult<&[usize]> {
        self.elements
            .get(index)
            .map(Vec::as_slice)
            .ok_or(FemError::ElementOutOfRange {
                index,
                len: self.elements.len(),
            })
    }

    /// Coordinates of an element's nodes, in local order
    pub fn element_nodes(&self, index: usize) -> FemResult<Vec<Node>> {
        self.element(index)?
            .iter()
            .map(|&n| self.node(n).copied())
            .collect()
    }

    /// Check connectivity against the family: node count per element and
    /// node indices in range
    pub fn validate(&self, family: ElementFamily) -> FemResult<()> {
        if self.nodes.is_empty() {
            return Err(FemError::config("mesh has no nodes"));
        }
        if self.elements.is_empty() {
            return Err(FemError::config("mesh has no elements"));
        }
        let expected = family.num_nodes();
        for (e, conn) in self.elements.iter().enumerate() {
            if conn.len() != expected {
                return Err(FemError::config(format!(
                    "element {e} has {} nodes, {family} elements need {expected}",
                    conn.len()
                )));
            }
            if let Some(&n) = conn.iter().find(|&&n| n >= self.nodes.len()) {
                return Err(FemError::config(format!(
                    "element {e} references node {n}, mesh has {} nodes",
                    self.nodes.len()
                )));
            }
        }
        Ok(())
    }

    /// Indices of the nodes matching a predicate
    pub fn nodes_where<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(&Node) -> bool,
    {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| predicate(node))
            .map(|(i, _)| i)
            .collect()
    }

    /// Nodes whose coordinate `axis` (0 = x, 1 = y, 2 = z) equals `value`,
    /// within a tolerance relative to the mesh extent
    pub fn nodes_on_plane(&self, axis: usize, value: f64) -> Vec<usize> {
        let extent = self
            .nodes
            .iter()
            .flat_map(|n| n.coords())
            .fold(0.0_f64, |acc, c| acc.max(c.abs()))
            .max(value.abs());
        let tol = 1e-9 * extent.max(1.0);
        self.nodes_where(|node| {
            node.coords()
                .get(axis)
                .is_some_and(|c| (c - value).abs() <= tol)
        })
    }

    /// Index of the highest-numbered node
    pub fn last_node(&self) -> Option<usize> {
        self.nodes.len().checked_sub(1)
    }

    /// Elements whose connectivity contains `node`
    pub fn elements_at_node(&self, node: usize) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, conn)| conn.contains(&node))
            .map(|(e, _)| e)
            .collect()
    }
}

/// Topology parameters from which a [`Mesh`] is generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeshSpec {
    /// `elements + 1` equally spaced nodes on the x axis
    Line { elements: usize, length: f64 },
    /// `nodes` on the x axis at `spacing`, the first `elements` gaps joined;
    /// nodes past the last element stay unconnected
    Chain {
        nodes: usize,
        elements: usize,
        spacing: f64,
    },
    /// Two columns of nodes at x = 0 and x = `width`, alternating, rising by
    /// `bay` every second node; element `e` joins nodes `e` and `e + 1`
    /// modulo the node count
    Zigzag {
        nodes: usize,
        elements: usize,
        width: f64,
        bay: f64,
    },
    /// Rectangle split into `nx` by `ny` cells, two triangles per cell
    TriangleGrid {
        nx: usize,
        ny: usize,
        width: f64,
        height: f64,
    },
    /// Rectangle split into `nx` by `ny` quadrilaterals
    QuadGrid {
        nx: usize,
        ny: usize,
        width: f64,
        height: f64,
    },
    /// Box of `nx` by `ny` by `nz` hexahedra with extents `lx`, `ly`, `lz`
    HexGrid {
        nx: usize,
        ny: usize,
        nz: usize,
        lx: f64,
        ly: f64,
        lz: f64,
    },
    /// Caller-built mesh
    Explicit {
        nodes: Vec<Node>,
        elements: Vec<Vec<usize>>,
    },
}

impl MeshSpec {
    /// Generate nodes and connectivity, rejecting degenerate parameters
    pub fn generate(&self) -> FemResult<Mesh> {
        let mesh = match self {
            Self::Line { elements, length } => {
                require_count("elements", *elements, 1)?;
                mesh_size("nodes", &[*elements, 1], 1)?;
                require_length("length", *length)?;
                let dx = length / *elements as f64;
                let nodes = (0..=*elements).map(|i| Node::on_axis(i as f64 * dx)).collect();
                let conn = (0..*elements).map(|i| vec![i, i + 1]).collect();
                Mesh::new(nodes, conn)
            }
            Self::Chain {
                nodes,
                elements,
                spacing,
            } => {
                require_count("nodes", *nodes, 2)?;
                require_count("elements", *elements, 1)?;
                mesh_size("nodes", &[*nodes], 0)?;
                require_length("spacing", *spacing)?;
                if *elements > nodes - 1 {
                    return Err(FemError::config(format!(
                        "{elements} elements need at least {} nodes (received {nodes})",
                        elements + 1
                    )));
                }
                let coords = (0..*nodes).map(|i| Node::on_axis(i as f64 * spacing)).collect();
                let conn = (0..*elements).map(|i| vec![i, i + 1]).collect();
                Mesh::new(coords, conn)
            }
            Self::Zigzag {
                nodes,
                elements,
                width,
                bay,
            } => {
                require_count("nodes", *nodes, 2)?;
                require_count("elements", *elements, 1)?;
                mesh_size("nodes", &[*nodes], 0)?;
                mesh_size("elements", &[*elements], 0)?;
                require_length("width", *width)?;
                require_length("bay", *bay)?;
                let coords = (0..*nodes)
                    .map(|i| {
                        let x = if i % 2 == 0 { 0.0 } else { *width };
                        Node::planar(x, (i / 2) as f64 * bay)
                    })
                    .collect();
                let conn = (0..*elements)
                    .map(|e| vec![e % nodes, (e + 1) % nodes])
                    .filter(|pair| pair[0] != pair[1])
                    .collect();
                Mesh::new(coords, conn)
            }
            Self::TriangleGrid {
                nx,
                ny,
                width,
                height,
            } => {
                let nodes = grid_nodes(*nx, *ny, *width, *height)?;
                let mut conn = Vec::with_capacity(mesh_size("elements", &[2, *nx, *ny], 0)?);
                for (n0, n1, n2, n3) in grid_cells(*nx, *ny) {
                    conn.push(vec![n0, n1, n3]);
                    conn.push(vec![n0, n3, n2]);
                }
                Mesh::new(nodes, conn)
            }
            Self::QuadGrid {
                nx,
                ny,
                width,
                height,
            } => {
                let nodes = grid_nodes(*nx, *ny, *width, *height)?;
                let conn = grid_cells(*nx, *ny)
                    .map(|(n0, n1, n2, n3)| vec![n0, n1, n3, n2])
                    .collect();
                Mesh::new(nodes, conn)
            }
            Self::HexGrid {
                nx,
                ny,
                nz,
                lx,
                ly,
                lz,
            } => hex_grid(*nx, *ny, *nz, *lx, *ly, *lz)?,
            Self::Explicit { nodes, elements } => Mesh::new(nodes.clone(), elements.clone()),
        };
        log::debug!(
            "generated mesh: {} nodes, {} elements",
            mesh.num_nodes(),
            mesh.num_elements()
        );
        Ok(mesh)
    }
}

fn require_count(name: &str, value: usize, min: usize) -> FemResult<()> {
    if value < min {
        return Err(FemError::config(format!(
            "{name} must be at least {min} (received {value})"
        )));
    }
    Ok(())
}

/// Largest node or element count a generated mesh may have
///
/// Far above what the dense solver can take; the DOF limit of
/// [`AnalysisOptions`](crate::analysis::AnalysisOptions) is the tighter bound.
pub const MAX_MESH_SIZE: usize = 1_000_000;

/// Product of `factors` plus `extra`, rejecting overflow and sizes above
/// [`MAX_MESH_SIZE`]
fn mesh_size(name: &str, factors: &[usize], extra: usize) -> FemResult<usize> {
    factors
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .and_then(|n| n.checked_add(extra))
        .filter(|&n| n <= MAX_MESH_SIZE)
        .ok_or_else(|| {
            FemError::config(format!(
                "mesh would have more than {MAX_MESH_SIZE} {name}"
            ))
        })
}

fn require_length(name: &str, value: f64) -> FemResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(FemError::config(format!(
            "{name} must be a positive length (received {value})"
        )));
    }
    Ok(())
}

/// Row-major grid of `(nx + 1) * (ny + 1)` nodes
fn grid_nodes(nx: usize, ny: usize, width: f64, height: f64) -> FemResult<Vec<Node>> {
    require_count("nx", nx, 1)?;
    require_count("ny", ny, 1)?;
    require_length("width", width)?;
    require_length("height", height)?;
    mesh_size("nx", &[nx], 1)?;
    mesh_size("ny", &[ny], 1)?;
    let count = mesh_size("nodes", &[nx + 1, ny + 1], 0)?;
    let (dx, dy) = (width / nx as f64, height / ny as f64);
    let mut nodes = Vec::with_capacity(count);
    for j in 0..=ny {
        for i in 0..=nx {
            nodes.push(Node::planar(i as f64 * dx, j as f64 * dy));
        }
    }
    Ok(nodes)
}

/// Corner nodes (lower-left, lower-right, upper-left, upper-right) of every
/// grid cell
fn grid_cells(nx: usize, ny: usize) -> impl Iterator<Item = (usize, usize, usize, usize)> {
    let row = nx + 1;
    (0..ny).flat_map(move |j| {
        (0..nx).map(move |i| {
            let n0 = j * row + i;
            (n0, n0 + 1, n0 + row, n0 + row + 1)
        })
    })
}

fn hex_grid(nx: usize, ny: usize, nz: usize, lx: f64, ly: f64, lz: f64) -> FemResult<Mesh> {
    require_count("nx", nx, 1)?;
    require_count("ny", ny, 1)?;
    require_count("nz", nz, 1)?;
    require_length("lx", lx)?;
    require_length("ly", ly)?;
    require_length("lz", lz)?;
    for (name, n) in [("nx", nx), ("ny", ny), ("nz", nz)] {
        mesh_size(name, &[n], 1)?;
    }
    let count = mesh_size("nodes", &[nx + 1, ny + 1, nz + 1], 0)?;

    let (sx, sy) = (nx + 1, ny + 1);
    let (dx, dy, dz) = (lx / nx as f64, ly / ny as f64, lz / nz as f64);

    let mut nodes = Vec::with_capacity(count);
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                nodes.push(Node::new(i as f64 * dx, j as f64 * dy, k as f64 * dz));
            }
        }
    }

    let layer = sx * sy;
    let mut elements = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let n0 = k * layer + j * sx + i;
                let bottom = [n0, n0 + 1, n0 + sx + 1, n0 + sx];
                let mut conn = bottom.to_vec();
                conn.extend(bottom.iter().map(|n| n + layer));
                elements.push(conn);
            }
        }
    }
    Ok(Mesh::new(nodes, elements))
}
