//! WASM bindings for the FEM engine
//!
//! Runs the pipeline directly in the browser. `analyze` and `export` are
//! one-shot calls for a Web Worker; [`FemHandle`] keeps a solved analysis
//! alive so a canvas front end can query the matrix and mesh views cell by
//! cell.

use wasm_bindgen::prelude::*;

use crate::config::ExportOptions;
use crate::prelude::*;
use crate::report;

// Use wee_alloc for smaller WASM binary
#[cfg(feature = "wasm")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

fn to_js_error(err: FemError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Analyze a configuration
///
/// Takes an [`AnalysisConfig`] as JSON and returns an `AnalysisResponse` as
/// JSON. Errors are reported inside the response, never thrown.
#[wasm_bindgen]
pub fn analyze(config_json: &str) -> String {
    let start = now_ms();

    let response = match AnalysisConfig::from_json_str(config_json) {
        Ok(config) => AnalysisResponse::from_outcome(&config.run()),
        Err(e) => AnalysisResponse::failure(
            format!("Failed to parse request: {e}"),
            Some(e.kind()),
        ),
    };

    serde_json::to_string(&response.with_elapsed(now_ms() - start)).unwrap_or_else(|e| {
        format!(r#"{{"success":false,"error":"Serialization failed: {e}"}}"#)
    })
}

/// Solve a configuration and return the plain-text export
#[wasm_bindgen]
pub fn export(config_json: &str, sparse: bool) -> Result<String, JsValue> {
    let analysis = AnalysisConfig::from_json_str(config_json)
        .and_then(|config| config.run())
        .map_err(to_js_error)?;
    let options = if sparse {
        ExportOptions::sparse()
    } else {
        ExportOptions::default()
    };
    Ok(report::export(&analysis, &options))
}

/// A solved analysis held on the WASM side
#[wasm_bindgen]
pub struct FemHandle {
    analysis: Analysis,
}

#[wasm_bindgen]
impl FemHandle {
    /// Solve a configuration; throws on any failure
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<FemHandle, JsValue> {
        let analysis = AnalysisConfig::from_json_str(config_json)
            .and_then(|config| config.run())
            .map_err(to_js_error)?;
        Ok(Self { analysis })
    }

    #[wasm_bindgen(js_name = numDofs)]
    pub fn num_dofs(&self) -> usize {
        self.analysis.num_dofs()
    }

    #[wasm_bindgen(js_name = checkDof)]
    pub fn check_dof(&self, dof: usize) -> bool {
        self.analysis.check_dof(dof).is_ok()
    }

    #[wasm_bindgen(js_name = stiffnessEntry)]
    pub fn stiffness_entry(&self, row: usize, col: usize) -> Result<f64, JsValue> {
        self.analysis.stiffness_entry(row, col).map_err(to_js_error)
    }

    pub fn force(&self, dof: usize) -> Result<f64, JsValue> {
        self.analysis.force(dof).map_err(to_js_error)
    }

    pub fn displacement(&self, dof: usize) -> Result<f64, JsValue> {
        self.analysis.displacement(dof).map_err(to_js_error)
    }

    /// Whether a matrix cell is on the row or column of the inspected DOF
    #[wasm_bindgen(js_name = isHighlighted)]
    pub fn is_highlighted(&self, dof: usize, row: usize, col: usize) -> Result<bool, JsValue> {
        self.analysis.is_highlighted(dof, row, col).map_err(to_js_error)
    }

    /// `DofInspection` as JSON
    #[wasm_bindgen(js_name = inspectDof)]
    pub fn inspect_dof(&self, dof: usize) -> Result<String, JsValue> {
        let inspection = self.analysis.inspect_dof(dof).map_err(to_js_error)?;
        serde_json::to_string(&inspection).map_err(|e| to_js_error(e.into()))
    }

    /// `ElementStiffness` as JSON
    #[wasm_bindgen(js_name = elementStiffness)]
    pub fn element_stiffness(&self, element: usize) -> Result<String, JsValue> {
        let local = self.analysis.element_stiffness(element).map_err(to_js_error)?;
        serde_json::to_string(local).map_err(|e| to_js_error(e.into()))
    }

    #[wasm_bindgen(js_name = elementsAtNode)]
    pub fn elements_at_node(&self, node: usize) -> Result<Vec<usize>, JsValue> {
        self.analysis.elements_at_node(node).map_err(to_js_error)
    }

    /// Full `AnalysisReport` as JSON
    pub fn report(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.analysis.report()).map_err(|e| to_js_error(e.into()))
    }

    pub fn export(&self, sparse: bool) -> String {
        let options = if sparse {
            ExportOptions::sparse()
        } else {
            ExportOptions::default()
        };
        report::export(&self.analysis, &options)
    }
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
