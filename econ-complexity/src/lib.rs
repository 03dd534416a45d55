//! Econ Complexity Library
//!
//! Computes Economic Complexity measures from country×product trade values:
//! Revealed Comparative Advantage, the binary specialization matrix (Mcp),
//! diversity and ubiquity, the Economic and Product Complexity Indexes, product
//! proximity, and the product space graph.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         econ-complexity                             │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  RecordTable ──▶ value matrix ──▶ RCA ──▶ Mcp ──┬──▶ ECI / PCI      │
//! │                                                 │                   │
//! │                                                 └──▶ proximity      │
//! │                                                        │            │
//! │  complete graph ◀──────────────────────────────────────┘            │
//! │        │                                                            │
//! │        └──▶ maximum spanning tree ──▶ product space ──▶ CSV export   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## RCA and Mcp
//! - **RCA**: a country's export share of a product over the product's share of world trade
//! - **Mcp**: 1 where RCA meets the threshold (default 1.0), else 0
//!
//! ## Complexity indexes
//! - **ECI**: standardized second eigenvector of the country-country operator
//! - **PCI**: the same on the product side, oriented consistently with ECI
//!
//! ## Product space
//! - **Proximity**: minimum conditional probability of co-exporting two products
//! - **Product space**: maximum spanning tree plus every edge above a proximity threshold
//!
//! # Usage
//!
//! ```no_run
//! use econ_complexity::{Complexity, RecordTable};
//! use std::path::Path;
//!
//! # fn main() -> econ_complexity::Result<()> {
//! let table = RecordTable::from_csv_path(Path::new("trade.csv"))?;
//! let mut comp = Complexity::with_defaults(table)?;
//! comp.calculate_indexes()?;
//! comp.create_product_space()?;
//!
//! for entry in comp.eci()?.ranked().iter().take(5) {
//!     println!("{}: {:.3}", entry.label, entry.value);
//! }
//! econ_complexity::edges_nodes_to_csv(comp.product_space()?, "product_space", Path::new("out"))?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod complexity;
pub mod engine;
pub mod error;
pub mod export;
pub mod graph;
pub mod matrix;
pub mod proximity;
pub mod rca;
pub mod table;

pub use complexity::ComplexityIndexes;
pub use engine::Complexity;
pub use error::{ComplexityError, Result, ResultExt};
pub use export::{edges_nodes_to_csv, edges_nodes_to_csv_with_attributes, ExportedGraph};
pub use graph::{ProductGraph, WeightedEdge};
pub use matrix::{LabeledMatrix, LabeledValue, LabeledVector};
pub use table::{Observation, RecordTable};

pub use econ_common::config::{ColumnConfig, ComplexityConfig};
