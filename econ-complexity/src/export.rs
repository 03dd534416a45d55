//! Graph export to CSV.
//!
//! Writes `<name>_nodes.csv` (`id,name[,attributes...]`) and
//! `<name>_edges.csv` (`source,target,weight`), where edge endpoints refer to
//! node ids. This is the layout graph tools such as Gephi import directly.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{Result, ResultExt};
use crate::graph::ProductGraph;
use crate::matrix::LabeledVector;

/// Paths of the two files written for one graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedGraph {
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
}

#[derive(Serialize)]
struct EdgeRow {
    source: usize,
    target: usize,
    weight: f64,
}

/// Write node and edge CSV files for `graph` into `dir_path`.
pub fn edges_nodes_to_csv(
    graph: &ProductGraph,
    graph_name: &str,
    dir_path: &Path,
) -> Result<ExportedGraph> {
    edges_nodes_to_csv_with_attributes(graph, graph_name, dir_path, &[])
}

/// Like [`edges_nodes_to_csv`], adding one node column per named attribute.
///
/// Products missing from an attribute vector get an empty cell.
pub fn edges_nodes_to_csv_with_attributes(
    graph: &ProductGraph,
    graph_name: &str,
    dir_path: &Path,
    node_attributes: &[(&str, &LabeledVector)],
) -> Result<ExportedGraph> {
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).context(format!("creating {}", dir_path.display()))?;
    }

    let nodes_path = dir_path.join(format!("{graph_name}_nodes.csv"));
    let edges_path = dir_path.join(format!("{graph_name}_edges.csv"));

    write_nodes(graph, &nodes_path, node_attributes)
        .context(format!("writing {}", nodes_path.display()))?;
    write_edges(graph, &edges_path).context(format!("writing {}", edges_path.display()))?;

    info!(
        graph = graph_name,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        dir = %dir_path.display(),
        "Exported graph"
    );

    Ok(ExportedGraph {
        nodes_path,
        edges_path,
    })
}

fn write_nodes(
    graph: &ProductGraph,
    path: &Path,
    node_attributes: &[(&str, &LabeledVector)],
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["id", "name"];
    header.extend(node_attributes.iter().map(|(name, _)| *name));
    wtr.write_record(&header)?;

    for (id, product) in graph.nodes().enumerate() {
        let mut record = vec![id.to_string(), product.to_string()];
        for (_, values) in node_attributes {
            record.push(values.get(product).map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_edges(graph: &ProductGraph, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for (source, target, weight) in graph.indexed_edges() {
        wtr.serialize(EdgeRow {
            source,
            target,
            weight,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::LabeledMatrix;
    use nalgebra::{DMatrix, DVector};

    fn graph() -> ProductGraph {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let phi = DMatrix::from_row_slice(3, 3, &[0.0, 0.8, 0.1, 0.8, 0.0, 0.4, 0.1, 0.4, 0.0]);
        let complete = ProductGraph::complete(&LabeledMatrix::new(labels.clone(), labels, phi).unwrap());
        complete.maximum_spanning_tree()
    }

    #[test]
    fn test_edges_nodes_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let out = edges_nodes_to_csv(&graph(), "maxst", dir.path()).unwrap();

        assert_eq!(out.nodes_path, dir.path().join("maxst_nodes.csv"));
        let nodes = fs::read_to_string(&out.nodes_path).unwrap();
        assert_eq!(nodes, "id,name\n0,a\n1,b\n2,c\n");

        let edges = fs::read_to_string(&out.edges_path).unwrap();
        assert_eq!(edges, "source,target,weight\n0,1,0.8\n1,2,0.4\n");
    }

    #[test]
    fn test_node_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let pci = LabeledVector::new(
            vec!["a".into(), "c".into()],
            DVector::from_vec(vec![1.5, -0.5]),
        )
        .unwrap();

        let out =
            edges_nodes_to_csv_with_attributes(&graph(), "space", dir.path(), &[("pci", &pci)])
                .unwrap();
        let nodes = fs::read_to_string(&out.nodes_path).unwrap();
        assert_eq!(nodes, "id,name,pci\n0,a,1.5\n1,b,\n2,c,-0.5\n");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("graphs").join("2024");
        let out = edges_nodes_to_csv(&graph(), "g", &nested).unwrap();
        assert!(out.edges_path.exists());
    }
}
