//! FEM Engine - dense finite element assembly and solve
//!
//! One pipeline shared by six element families:
//! - 1D axial bar and 2D Euler-Bernoulli beam
//! - 2D pin-jointed truss
//! - Constant-strain triangle and 4-node isoparametric quad (plane stress)
//! - 8-node trilinear hexahedron
//!
//! A run goes mesh generation -> local stiffness -> DOF mapping -> global
//! assembly -> penalty supports and loads -> Gaussian elimination ->
//! strain/stress recovery, and returns an immutable [`analysis::Analysis`].
//!
//! ## Example
//! ```rust
//! use fem_engine::prelude::*;
//!
//! // Steel bar, 1 m long, fixed at x = 0 with 1 kN at the free end
//! let config = AnalysisConfig::axial_bar(2).unwrap();
//! let analysis = config.run().unwrap();
//!
//! let tip = analysis.displacement(2).unwrap();
//! assert!((tip - 1000.0 / (210e9 * 0.01)).abs() < 1e-12);
//! ```

pub mod analysis;
pub mod assembly;
pub mod boundary;
pub mod config;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod mesh;
pub mod model;
pub mod report;
pub mod results;
pub mod session;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{Analysis, AnalysisOptions};
    pub use crate::config::{AnalysisConfig, ExportOptions, MatrixLayout};
    pub use crate::elements::{ElementFamily, Material, Node, Section, Support};
    pub use crate::error::{ErrorKind, FemError, FemResult};
    pub use crate::loads::{LoadMode, NodeLoad};
    pub use crate::mesh::{Mesh, MeshSpec};
    pub use crate::model::FeModel;
    pub use crate::report::export;
    pub use crate::results::{
        AnalysisReport, AnalysisResponse, AnalysisSummary, DofInspection, ElementResponse,
        ElementStiffness, NodeDisplacement, Reaction,
    };
    pub use crate::session::AnalysisSession;
}

#[cfg(feature = "wasm")]
pub mod wasm;
