//! Plain-text export of a solved analysis

use std::fmt;

use crate::analysis::Analysis;
use crate::config::{ExportOptions, MatrixLayout};
use crate::results::ElementResponse;

/// Render the solved state as text
///
/// Sections, in order: node displacements, element strain, element stress,
/// global stiffness (with supports applied), applied loads above the
/// threshold and the element-to-DOF table. Numbers are written in scientific notation with
/// `options.precision` digits after the point.
#[must_use]
pub fn export(analysis: &Analysis, options: &ExportOptions) -> String {
    Export { analysis, options }.to_string()
}

struct Export<'a> {
    analysis: &'a Analysis,
    options: &'a ExportOptions,
}

impl Export<'_> {
    fn num(&self, value: f64) -> String {
        format!("{:.*e}", self.options.precision, value)
    }

    fn join(&self, values: &[f64]) -> String {
        values
            .iter()
            .map(|&v| self.num(v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn strain_label(response: &ElementResponse) -> &'static str {
    match response {
        ElementResponse::Beam { .. } => "curvature",
        _ => "strain",
    }
}

fn stress_label(response: &ElementResponse) -> &'static str {
    match response {
        ElementResponse::Beam { .. } => "moment",
        _ => "stress",
    }
}

impl fmt::Display for Export<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.analysis;
        let labels = analysis.family().dof_labels();

        writeln!(f, "# Node displacements")?;
        for disp in analysis.node_displacements() {
            let parts: Vec<String> = labels
                .iter()
                .zip(&disp.values)
                .map(|(label, &v)| format!("{label} = {}", self.num(v)))
                .collect();
            writeln!(f, "node {}: {}", disp.node, parts.join(", "))?;
        }

        writeln!(f)?;
        writeln!(f, "# Element strain")?;
        for (e, response) in analysis.element_responses().iter().enumerate() {
            writeln!(
                f,
                "element {e}: {} = [{}]",
                strain_label(response),
                self.join(response.strain())
            )?;
        }

        writeln!(f)?;
        writeln!(f, "# Element stress")?;
        for (e, response) in analysis.element_responses().iter().enumerate() {
            writeln!(
                f,
                "element {e}: {} = [{}]",
                stress_label(response),
                self.join(response.stress())
            )?;
        }

        writeln!(f)?;
        let k = analysis.constrained_stiffness();
        match self.options.layout {
            MatrixLayout::Dense => {
                writeln!(f, "# Global stiffness ({0} x {0})", k.nrows())?;
                for row in k.row_iter() {
                    let values: Vec<String> = row.iter().map(|&v| self.num(v)).collect();
                    writeln!(f, "{}", values.join(" "))?;
                }
            }
            MatrixLayout::Sparse => {
                writeln!(
                    f,
                    "# Global stiffness ({0} x {0}, |K| > {1})",
                    k.nrows(),
                    self.num(self.options.threshold)
                )?;
                for i in 0..k.nrows() {
                    for j in 0..k.ncols() {
                        let v = k[(i, j)];
                        if v.abs() > self.options.threshold {
                            writeln!(f, "K[{i}][{j}] = {}", self.num(v))?;
                        }
                    }
                }
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "# Force vector (|F| > {})",
            self.num(self.options.threshold)
        )?;
        for (i, &v) in analysis.force_vector().iter().enumerate() {
            if v.abs() > self.options.threshold {
                writeln!(f, "F[{i}] = {}", self.num(v))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "# Element DOF connectivity")?;
        for local in analysis.element_stiffnesses() {
            let nodes = analysis
                .mesh()
                .element(local.element)
                .map_err(|_| fmt::Error)?;
            writeln!(
                f,
                "element {}: nodes {:?} -> dofs {:?}",
                local.element, nodes, local.dofs
            )?;
        }
        Ok(())
    }
}
