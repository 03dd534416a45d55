//! Product space graphs.
//!
//! Three graphs share one node layout (products in proximity-label order):
//! the complete proximity graph, its maximum spanning tree, and the product
//! space, which is the tree plus every edge at or above a weight threshold.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::info;

use crate::matrix::LabeledMatrix;

/// An undirected edge between two products.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// Undirected weighted graph over products.
#[derive(Debug, Clone)]
pub struct ProductGraph {
    graph: UnGraph<String, f64>,
}

impl ProductGraph {
    /// Graph with the same nodes and no edges.
    fn empty_like(&self) -> Self {
        let mut graph = UnGraph::with_capacity(self.graph.node_count(), 0);
        for node in self.graph.node_weights() {
            graph.add_node(node.clone());
        }
        Self { graph }
    }

    /// Complete graph with proximity as edge weight, one edge per unordered pair.
    pub fn complete(proximity: &LabeledMatrix) -> Self {
        let labels = proximity.row_labels();
        let phi = proximity.data();
        let n = labels.len();

        let mut graph = UnGraph::with_capacity(n, n * n.saturating_sub(1) / 2);
        let nodes: Vec<NodeIndex> = labels.iter().map(|l| graph.add_node(l.clone())).collect();
        for i in 0..n {
            for j in (i + 1)..n {
                graph.add_edge(nodes[i], nodes[j], phi[(i, j)]);
            }
        }

        Self { graph }
    }

    /// Maximum-weight spanning tree (Kruskal).
    ///
    /// Edges are taken by weight descending; equal weights keep the order in
    /// which they appear in this graph, so the result is reproducible.
    pub fn maximum_spanning_tree(&self) -> Self {
        let mut candidates: Vec<(NodeIndex, NodeIndex, f64)> = self
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target(), *e.weight()))
            .collect();
        candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

        let mut tree = self.empty_like();
        let mut components = UnionFind::new(self.graph.node_count());
        for (a, b, weight) in candidates {
            if components.union(a.index(), b.index()) {
                tree.graph.add_edge(a, b, weight);
            }
        }

        tree
    }

    /// Union of `tree` and every edge of `self` with weight `>= thresh`.
    ///
    /// `tree` must share this graph's node layout, which holds for a tree
    /// produced by [`Self::maximum_spanning_tree`].
    pub fn product_space(&self, tree: &ProductGraph, thresh: f64) -> Self {
        let mut space = tree.clone();
        let mut added = 0usize;

        for e in self.graph.edge_references() {
            let weight = *e.weight();
            if weight >= thresh && space.graph.find_edge(e.source(), e.target()).is_none() {
                space.graph.add_edge(e.source(), e.target(), weight);
                added += 1;
            }
        }

        info!(
            nodes = space.node_count(),
            tree_edges = tree.edge_count(),
            extra_edges = added,
            thresh,
            "Built product space"
        );
        space
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Product identifiers in node order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> Vec<WeightedEdge> {
        self.graph
            .edge_references()
            .map(|e| WeightedEdge {
                source: self.graph[e.source()].clone(),
                target: self.graph[e.target()].clone(),
                weight: *e.weight(),
            })
            .collect()
    }

    /// Edges as (source index, target index, weight), in insertion order.
    pub fn indexed_edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }

    fn node_index(&self, product: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&i| self.graph[i] == product)
    }

    /// Weight of the edge between two products, in either direction.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let (a, b) = (self.node_index(a)?, self.node_index(b)?);
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        self.edge_weight(a, b).is_some()
    }

    /// True when every product is reachable from every other.
    pub fn is_connected(&self) -> bool {
        self.node_count() <= 1 || connected_components(&self.graph) == 1
    }

    pub fn total_weight(&self) -> f64 {
        self.graph.edge_weights().sum()
    }

    /// The underlying petgraph graph.
    pub fn inner(&self) -> &UnGraph<String, f64> {
        &self.graph
    }
}
