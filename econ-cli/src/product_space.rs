//! `econci product-space`: proximity graphs exported for graph tools.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use econ_common::config::Config;
use econ_complexity::{edges_nodes_to_csv, edges_nodes_to_csv_with_attributes, ExportedGraph};
use serde::Serialize;
use tracing::info;

use crate::input::InputArgs;
use crate::output;

#[derive(Args, Debug, Clone)]
pub struct ProductSpaceArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Proximity at or above which extra edges join the tree (default from config: 0.65)
    #[arg(long)]
    pub edge_weight_thresh: Option<f64>,

    /// Output directory (default from config: "output")
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also export the complete proximity graph
    #[arg(long)]
    pub complete: bool,

    /// Attach PCI and ubiquity to the exported nodes
    #[arg(long)]
    pub with_indexes: bool,
}

/// One exported graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub name: String,
    pub nodes: usize,
    pub edges: usize,
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
}

/// Summary written to `product_space.json`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSpaceSummary {
    pub input: PathBuf,
    pub m_cp_thresh: f64,
    pub edge_weight_thresh: f64,
    pub graphs: Vec<GraphSummary>,
}

/// Build the product space and export its graphs.
pub fn run(args: &ProductSpaceArgs, config: &Config) -> Result<ProductSpaceSummary> {
    let mut thresholds = args.input.thresholds(config);
    if let Some(thresh) = args.edge_weight_thresh {
        if !(0.0..=1.0).contains(&thresh) {
            bail!("--edge-weight-thresh must be within [0, 1], got {thresh}");
        }
        thresholds = thresholds.with_edge_weight_thresh(thresh);
    }

    let mut comp = args.input.load(config, thresholds)?;
    if args.with_indexes {
        comp.calculate_indexes()?;
    } else {
        comp.calculate_rca()?;
        comp.calculate_proximity()?;
    }
    comp.create_product_space()?;

    let dir = args.output.as_ref().unwrap_or(&config.export.output_dir);
    let dir = output::ensure_dir(dir)?;

    let mut graphs = Vec::new();
    if args.complete {
        graphs.push(("complete", comp.complete_graph()?));
    }
    graphs.push(("maxst", comp.maxst()?));
    graphs.push(("product_space", comp.product_space()?));

    let mut exported = Vec::with_capacity(graphs.len());
    for (name, graph) in graphs {
        let ExportedGraph {
            nodes_path,
            edges_path,
        } = if args.with_indexes {
            edges_nodes_to_csv_with_attributes(
                graph,
                name,
                dir,
                &[("pci", comp.pci()?), ("ubiquity", comp.ubiquity()?)],
            )?
        } else {
            edges_nodes_to_csv(graph, name, dir)?
        };

        exported.push(GraphSummary {
            name: name.to_string(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            nodes_path,
            edges_path,
        });
    }

    let summary = ProductSpaceSummary {
        input: args.input.input.clone(),
        m_cp_thresh: comp.config().m_cp_thresh,
        edge_weight_thresh: comp.product_space_thresh()?,
        graphs: exported,
    };
    output::write_json(dir, "product_space.json", &summary)?;

    info!(
        dir = %dir.display(),
        graphs = summary.graphs.len(),
        edge_weight_thresh = summary.edge_weight_thresh,
        "Wrote product space"
    );
    Ok(summary)
}

pub fn print_summary(summary: &ProductSpaceSummary) {
    println!("Product space");
    println!();
    println!("Input:        {}", summary.input.display());
    println!("Mcp thresh:   {}", summary.m_cp_thresh);
    println!("Edge thresh:  {}", summary.edge_weight_thresh);
    println!();
    for graph in &summary.graphs {
        println!(
            "  {:<14} {:>6} nodes {:>8} edges  {}",
            graph.name,
            graph.nodes,
            graph.edges,
            graph.edges_path.display()
        );
    }
}
