//! `econci indexes`: RCA, diversity, ubiquity, ECI, and PCI.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use econ_common::config::Config;
use econ_complexity::{Complexity, LabeledVector};
use serde::Serialize;
use tracing::info;

use crate::input::InputArgs;
use crate::output;

#[derive(Args, Debug, Clone)]
pub struct IndexesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory (default from config: "output")
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write RCA, Mcp, proximity, and density matrices
    #[arg(long)]
    pub matrices: bool,

    /// How many top countries and products to print
    #[arg(long, default_value = "10")]
    pub top: usize,
}

/// A ranked entry in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub value: f64,
}

/// Summary written to `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexesSummary {
    pub input: PathBuf,
    pub countries: usize,
    pub products: usize,
    pub m_cp_thresh: f64,
    pub top_countries: Vec<RankedEntry>,
    pub top_products: Vec<RankedEntry>,
    pub files: Vec<PathBuf>,
}

fn top(vector: &LabeledVector, n: usize) -> Vec<RankedEntry> {
    vector
        .ranked()
        .into_iter()
        .take(n)
        .map(|e| RankedEntry {
            label: e.label.to_string(),
            value: e.value,
        })
        .collect()
}

/// Compute every index and write them to the output directory.
pub fn run(args: &IndexesArgs, config: &Config) -> Result<IndexesSummary> {
    let thresholds = args.input.thresholds(config);
    let mut comp = args.input.load(config, thresholds)?;
    comp.calculate_indexes()?;

    let dir = args.output.as_ref().unwrap_or(&config.export.output_dir);
    let dir = output::ensure_dir(dir)?;
    let columns = comp.columns().clone();

    let mut files = vec![
        output::write_vector(dir, "eci.csv", &columns.country, "eci", comp.eci()?)?,
        output::write_vector(dir, "pci.csv", &columns.product, "pci", comp.pci()?)?,
        output::write_vector(dir, "diversity.csv", &columns.country, "diversity", comp.diversity()?)?,
        output::write_vector(dir, "ubiquity.csv", &columns.product, "ubiquity", comp.ubiquity()?)?,
    ];
    if args.matrices {
        files.extend(write_matrices(&comp, dir, &columns.country, &columns.product)?);
    }

    let (countries, products) = comp.m()?.shape();
    let mut summary = IndexesSummary {
        input: args.input.input.clone(),
        countries,
        products,
        m_cp_thresh: comp.config().m_cp_thresh,
        top_countries: top(comp.eci()?, args.top),
        top_products: top(comp.pci()?, args.top),
        files,
    };
    let summary_path = dir.join("summary.json");
    summary.files.push(summary_path.clone());
    output::write_json(dir, "summary.json", &summary)?;

    info!(
        countries,
        products,
        dir = %dir.display(),
        files = summary.files.len(),
        "Wrote complexity indexes"
    );
    Ok(summary)
}

fn write_matrices(
    comp: &Complexity,
    dir: &Path,
    country: &str,
    product: &str,
) -> Result<Vec<PathBuf>> {
    Ok(vec![
        output::write_matrix(dir, "rca.csv", country, comp.rca()?)?,
        output::write_matrix(dir, "m_cp.csv", country, comp.m_cp()?)?,
        output::write_matrix(dir, "proximity.csv", product, comp.proximity()?)?,
        output::write_matrix(dir, "density.csv", country, comp.density()?)?,
    ])
}

/// Human-readable rankings for the terminal.
pub fn print_summary(summary: &IndexesSummary) {
    println!("Complexity indexes");
    println!();
    println!("Input:       {}", summary.input.display());
    println!("Countries:   {}", summary.countries);
    println!("Products:    {}", summary.products);
    println!("Mcp thresh:  {}", summary.m_cp_thresh);
    println!();

    println!("Top countries by ECI:");
    for (rank, entry) in summary.top_countries.iter().enumerate() {
        println!("  {:>3}. {:<24} {:>8.4}", rank + 1, entry.label, entry.value);
    }
    println!();
    println!("Top products by PCI:");
    for (rank, entry) in summary.top_products.iter().enumerate() {
        println!("  {:>3}. {:<24} {:>8.4}", rank + 1, entry.label, entry.value);
    }
    println!();
    println!("Files:");
    for file in &summary.files {
        println!("  {}", file.display());
    }
}
