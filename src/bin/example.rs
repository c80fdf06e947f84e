//! FEM Engine Example - runs every preset and prints its export
//!
//! Pass a JSON config path to run that instead, and `--sparse` for the
//! non-zero matrix layout.

use anyhow::Context;
use fem_engine::prelude::*;

fn print_summary(family: ElementFamily, analysis: &Analysis) {
    let summary = analysis.summary();
    println!("=== {family} ===");
    println!(
        "{} nodes, {} elements, {} DOFs ({} held)",
        summary.num_nodes, summary.num_elements, summary.total_dofs, summary.constrained_dofs
    );
    println!(
        "max displacement {:.4e} at node {}, max stress {:.4e} in element {}",
        summary.max_displacement,
        summary.max_displacement_node,
        summary.max_stress,
        summary.max_stress_element
    );
    for reaction in analysis.reactions() {
        println!(
            "  reaction node {} [{}] = {:.4e}",
            reaction.node,
            family.dof_labels()[reaction.component],
            reaction.value
        );
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = if args.iter().any(|a| a == "--sparse") {
        ExportOptions::sparse()
    } else {
        ExportOptions::default()
    };

    if let Some(path) = args.iter().find(|a| !a.starts_with("--")) {
        let config = AnalysisConfig::from_path(path)
            .with_context(|| format!("failed to read config {path}"))?;
        let analysis = config.run().context("analysis failed")?;
        print_summary(config.family, &analysis);
        println!("{}", export(&analysis, &options));
        return Ok(());
    }

    for family in ElementFamily::ALL {
        let config = AnalysisConfig::preset(family)?;
        match config.run() {
            Ok(analysis) => {
                print_summary(family, &analysis);
                println!("{}", export(&analysis, &options));
            }
            Err(e) => println!("=== {family} ===\nanalysis failed: {e}\n"),
        }
    }

    // More nodes than the elements reach
    let detached = AnalysisConfig::beam(5, 2)?;
    if let Err(e) = detached.run() {
        println!("beam with unconnected nodes: {e} ({:?})", e.kind());
    }
    Ok(())
}
