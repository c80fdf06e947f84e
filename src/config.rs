//! Analysis configuration and presets
//!
//! An [`AnalysisConfig`] is the single input of a run: the element family, the
//! mesh parameters, material and section constants, supports, loads and solver
//! options. It is read from JSON or built from one of the presets below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{Analysis, AnalysisOptions};
use crate::elements::{ElementFamily, Material, Section, Support};
use crate::error::{FemError, FemResult};
use crate::loads::NodeLoad;
use crate::mesh::{Mesh, MeshSpec};
use crate::model::FeModel;

/// Complete description of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub family: ElementFamily,
    pub mesh: MeshSpec,
    pub material: Material,
    #[serde(default)]
    pub section: Section,
    #[serde(default)]
    pub supports: Vec<Support>,
    #[serde(default)]
    pub loads: Vec<NodeLoad>,
    #[serde(default)]
    pub options: AnalysisOptions,
}

impl AnalysisConfig {
    /// Parse a JSON document
    pub fn from_json_str(json: &str) -> FemResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> FemResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> FemResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the model and run the pipeline
    pub fn run(&self) -> FemResult<Analysis> {
        FeModel::from_config(self)?.analyze(&self.options)
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    // ========================
    // Presets
    // ========================

    /// Steel bar of unit length, fixed at x = 0, 1 kN at the free end
    pub fn axial_bar(elements: usize) -> FemResult<Self> {
        let mesh = MeshSpec::Line {
            elements,
            length: 1.0,
        };
        let last = last_node(&mesh.generate()?)?;
        Ok(Self {
            family: ElementFamily::AxialBar,
            mesh,
            material: Material::new(210e9, 0.3),
            section: Section::bar(0.01),
            supports: vec![Support::fixed(0)],
            loads: vec![NodeLoad::new(last, 0, 1000.0)],
            options: AnalysisOptions::default(),
        })
    }

    /// Beam of `nodes` nodes 1000 apart, the first `elements` spans joined,
    /// clamped at node 0, with a shear force and a moment on the last node
    ///
    /// Nodes past the last element are unconnected, so `elements < nodes - 1`
    /// yields a singular system.
    pub fn beam(nodes: usize, elements: usize) -> FemResult<Self> {
        let mesh = MeshSpec::Chain {
            nodes,
            elements,
            spacing: 1000.0,
        };
        let last = last_node(&mesh.generate()?)?;
        Ok(Self {
            family: ElementFamily::Beam,
            mesh,
            material: Material::new(2e5, 0.3),
            section: Section::beam(4e6),
            supports: vec![Support::fixed(0)],
            loads: vec![NodeLoad::set(last, 0, -6000.0), NodeLoad::set(last, 1, 1e6)],
            options: AnalysisOptions::default(),
        })
    }

    /// Zigzag truss 40 wide with 40 bays, pinned along x = 0, loaded at the
    /// last node
    pub fn truss(nodes: usize, elements: usize) -> FemResult<Self> {
        let mesh = MeshSpec::Zigzag {
            nodes,
            elements,
            width: 40.0,
            bay: 40.0,
        };
        let generated = mesh.generate()?;
        let last = last_node(&generated)?;
        let supports = generated
            .nodes_on_plane(0, 0.0)
            .into_iter()
            .map(Support::fixed)
            .collect();
        Ok(Self {
            family: ElementFamily::Truss,
            mesh,
            material: Material::new(2e7, 0.3),
            section: Section::bar(1.0),
            supports,
            loads: vec![NodeLoad::set(last, 0, 20000.0), NodeLoad::set(last, 1, -25000.0)],
            options: AnalysisOptions::default(),
        })
    }

    /// 400 x 400 plate of triangles, clamped along x = 0, loaded at the
    /// top-right corner
    pub fn cst(nx: usize, ny: usize) -> FemResult<Self> {
        let mesh = MeshSpec::TriangleGrid {
            nx,
            ny,
            width: 400.0,
            height: 400.0,
        };
        Self::plane_preset(
            ElementFamily::Cst,
            mesh,
            Material::new(3e7, 0.25),
            Section::plate(1.0),
            &[(0, -200.0), (1, -400.0)],
        )
    }

    /// 60 x 30 plate of quadrilaterals, clamped along x = 0, pulled back at
    /// the top-right corner
    pub fn quad(nx: usize, ny: usize) -> FemResult<Self> {
        let mesh = MeshSpec::QuadGrid {
            nx,
            ny,
            width: 60.0,
            height: 30.0,
        };
        Self::plane_preset(
            ElementFamily::Quad4,
            mesh,
            Material::new(7e4, 0.33),
            Section::plate(10.0),
            &[(0, -10000.0)],
        )
    }

    fn plane_preset(
        family: ElementFamily,
        mesh: MeshSpec,
        material: Material,
        section: Section,
        corner_load: &[(usize, f64)],
    ) -> FemResult<Self> {
        let generated = mesh.generate()?;
        let last = last_node(&generated)?;
        let supports = generated
            .nodes_on_plane(0, 0.0)
            .into_iter()
            .map(Support::fixed)
            .collect();
        let loads = corner_load
            .iter()
            .map(|&(component, value)| NodeLoad::new(last, component, value))
            .collect();
        Ok(Self {
            family,
            mesh,
            material,
            section,
            supports,
            loads,
            options: AnalysisOptions::default(),
        })
    }

    /// Block of unit cubes standing on z = 0, every node pushed down
    pub fn hex(nx: usize, ny: usize, nz: usize) -> FemResult<Self> {
        let mesh = MeshSpec::HexGrid {
            nx,
            ny,
            nz,
            lx: nx as f64,
            ly: ny as f64,
            lz: nz as f64,
        };
        let generated = mesh.generate()?;
        let supports = generated
            .nodes_on_plane(2, 0.0)
            .into_iter()
            .map(Support::fixed)
            .collect();
        let loads = (0..generated.num_nodes())
            .map(|n| NodeLoad::set(n, 2, -80000.0))
            .collect();
        Ok(Self {
            family: ElementFamily::Hex8,
            mesh,
            material: Material::new(2e5, 0.3),
            section: Section::default(),
            supports,
            loads,
            options: AnalysisOptions::default(),
        })
    }

    /// Preset by family name with default division counts
    pub fn preset(family: ElementFamily) -> FemResult<Self> {
        match family {
            ElementFamily::AxialBar => Self::axial_bar(2),
            ElementFamily::Beam => Self::beam(4, 3),
            ElementFamily::Truss => Self::truss(6, 9),
            ElementFamily::Cst => Self::cst(2, 2),
            ElementFamily::Quad4 => Self::quad(4, 2),
            ElementFamily::Hex8 => Self::hex(2, 2, 2),
        }
    }
}

fn last_node(mesh: &Mesh) -> FemResult<usize> {
    mesh.last_node()
        .ok_or_else(|| FemError::config("mesh has no nodes"))
}

/// Formatting options for the textual export
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub layout: MatrixLayout,
    /// Force entries, and stiffness entries in the sparse layout, with
    /// magnitude at or below this are omitted
    pub threshold: f64,
    /// Digits after the decimal point
    pub precision: usize,
}

/// How the global stiffness matrix is written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixLayout {
    /// Every row in full
    #[default]
    Dense,
    /// One `K[i][j] = v` line per entry above the threshold
    Sparse,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layout: MatrixLayout::Dense,
            threshold: 1e-3,
            precision: 4,
        }
    }
}

impl ExportOptions {
    pub fn sparse() -> Self {
        Self {
            layout: MatrixLayout::Sparse,
            ..Self::default()
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}
