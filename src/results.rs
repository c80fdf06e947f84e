//! Result types for FE analysis

use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::error::{ErrorKind, FemResult};
use crate::math::Mat;

/// Strain and stress recovered for one element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementResponse {
    /// Bars and truss members (force positive in tension)
    Axial { strain: f64, stress: f64, force: f64 },
    /// Beam curvature and bending moment at both ends, plus the end forces
    /// `[V1, M1, V2, M2]` from `k d`
    Beam {
        curvature: [f64; 2],
        moment: [f64; 2],
        end_forces: [f64; 4],
    },
    /// Plane stress `[ex, ey, gxy]` / `[sx, sy, txy]`
    Plane { strain: [f64; 3], stress: [f64; 3] },
    /// `[exx, eyy, ezz, gxy, gyz, gxz]` and the matching stresses
    Solid { strain: [f64; 6], stress: [f64; 6] },
}

impl ElementResponse {
    /// Strain components; curvature for beams
    pub fn strain(&self) -> &[f64] {
        match self {
            Self::Axial { strain, .. } => std::slice::from_ref(strain),
            Self::Beam { curvature, .. } => curvature,
            Self::Plane { strain, .. } => strain,
            Self::Solid { strain, .. } => strain,
        }
    }

    /// Stress components; bending moments for beams
    pub fn stress(&self) -> &[f64] {
        match self {
            Self::Axial { stress, .. } => std::slice::from_ref(stress),
            Self::Beam { moment, .. } => moment,
            Self::Plane { stress, .. } => stress,
            Self::Solid { stress, .. } => stress,
        }
    }

    /// Equivalent scalar for ranking elements: von Mises stress for
    /// continuum elements, |stress| for bars, the larger |moment| for beams
    pub fn von_mises(&self) -> f64 {
        match self {
            Self::Axial { stress, .. } => stress.abs(),
            Self::Beam { moment, .. } => moment[0].abs().max(moment[1].abs()),
            Self::Plane { stress, .. } => {
                let [sx, sy, txy] = *stress;
                (sx * sx - sx * sy + sy * sy + 3.0 * txy * txy).sqrt()
            }
            Self::Solid { stress, .. } => {
                let [sx, sy, sz, txy, tyz, txz] = *stress;
                (0.5 * ((sx - sy).powi(2) + (sy - sz).powi(2) + (sz - sx).powi(2))
                    + 3.0 * (txy * txy + tyz * tyz + txz * txz))
                    .sqrt()
            }
        }
    }
}

/// Solved displacement of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    pub node: usize,
    /// One value per DOF component, in the family's local order
    pub values: Vec<f64>,
    /// Magnitude of the translational components
    pub magnitude: f64,
}

/// Support reaction at one constrained DOF
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub node: usize,
    pub component: usize,
    pub dof: usize,
    /// `(K u - F)` at the DOF, with the unconstrained K and the applied F
    pub value: f64,
}

/// Local stiffness of one element together with its global DOF indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStiffness {
    pub element: usize,
    /// `dofs[i]` is the global index of local row/column `i`
    pub dofs: Vec<usize>,
    pub matrix: Mat,
}

/// Everything the engine knows about one global DOF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DofInspection {
    pub dof: usize,
    pub node: usize,
    /// Component label (u, v, w, theta)
    pub label: String,
    /// DOFs with a non-zero coupling term in row `dof` of K
    pub coupled: Vec<usize>,
    pub load: f64,
    pub displacement: f64,
    pub constrained: bool,
    /// Elements whose connectivity contains the node
    pub elements: Vec<usize>,
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub num_nodes: usize,
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// DOFs held by supports
    pub constrained_dofs: usize,
    /// Maximum translational displacement
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_displacement_node: usize,
    /// Maximum equivalent stress, see [`ElementResponse::von_mises`]
    pub max_stress: f64,
    /// Element with maximum stress
    pub max_stress_element: usize,
}

/// Serializable view of a completed analysis, as returned by the HTTP and
/// WebAssembly front ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,
    pub displacements: Vec<NodeDisplacement>,
    pub elements: Vec<ElementResponse>,
    pub reactions: Vec<Reaction>,
}

/// Envelope returned by the HTTP and WebAssembly entry points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ms_elapsed: Option<f64>,
}

impl AnalysisResponse {
    pub fn from_outcome(outcome: &FemResult<Analysis>) -> Self {
        match outcome {
            Ok(analysis) => Self {
                success: true,
                error: None,
                error_kind: None,
                results: Some(analysis.report()),
                ms_elapsed: None,
            },
            Err(e) => Self::failure(e.to_string(), Some(e.kind())),
        }
    }

    pub fn failure(message: impl Into<String>, kind: Option<ErrorKind>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            error_kind: kind,
            results: None,
            ms_elapsed: None,
        }
    }

    pub fn with_elapsed(mut self, ms: f64) -> Self {
        self.ms_elapsed = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_von_mises() {
        let response = ElementResponse::Plane {
            strain: [0.0; 3],
            stress: [100.0, 0.0, 0.0],
        };
        assert_relative_eq!(response.von_mises(), 100.0);

        let shear = ElementResponse::Plane {
            strain: [0.0; 3],
            stress: [0.0, 0.0, 10.0],
        };
        assert_relative_eq!(shear.von_mises(), 10.0 * 3.0_f64.sqrt());
    }

    #[test]
    fn test_solid_von_mises_uniaxial() {
        let response = ElementResponse::Solid {
            strain: [0.0; 6],
            stress: [0.0, 0.0, -250.0, 0.0, 0.0, 0.0],
        };
        assert_relative_eq!(response.von_mises(), 250.0);
    }

    #[test]
    fn test_axial_slices() {
        let response = ElementResponse::Axial {
            strain: 1e-3,
            stress: 210e6,
            force: 2.1e6,
        };
        assert_eq!(response.strain(), &[1e-3]);
        assert_eq!(response.stress(), &[210e6]);
    }

    #[test]
    fn test_failure_response_skips_results() {
        let response = AnalysisResponse::failure("singular", Some(ErrorKind::SingularSystem));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error_kind"], "singular_system");
        assert!(json.get("results").is_none());
    }

    #[test]
    fn test_response_serializes_with_kind_tag() {
        let response = ElementResponse::Axial {
            strain: 0.5,
            stress: 1.0,
            force: 2.0,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["kind"], "axial");
    }
}
