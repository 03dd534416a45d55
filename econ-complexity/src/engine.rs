//! The `Complexity` computation object.
//!
//! Owns the input table and configuration, and caches every derived artifact
//! as an explicit field filled by a calculate step:
//!
//! | Step                     | Artifacts                                          |
//! |--------------------------|----------------------------------------------------|
//! | `calculate_rca`          | `m`, `rca`, `m_cp`, `diversity`, `ubiquity`        |
//! | `calculate_complexity`   | `eci`, `pci`                                       |
//! | `calculate_proximity`    | `proximity`, `distance`, `density`, `country_distance` |
//! | `calculate_indexes`      | all of the above                                   |
//! | `create_product_space`   | `complete_graph`, `maxst`, `product_space`         |
//!
//! Reading an artifact before its step has run returns a state error. A
//! failing step stores nothing. Steps are pure functions of the stored
//! inputs, so repeating one reproduces the same values bit for bit.

use econ_common::config::{ColumnConfig, ComplexityConfig};
use econ_common::validation::Validate;
use tracing::info;

use crate::complexity::{self, ComplexityIndexes};
use crate::error::{ComplexityError, Result};
use crate::graph::ProductGraph;
use crate::matrix::{build_value_matrix, LabeledMatrix, LabeledVector};
use crate::proximity;
use crate::rca::{revealed_comparative_advantage, specialization_matrix};
use crate::table::RecordTable;

#[derive(Debug, Clone)]
struct Specialization {
    m: LabeledMatrix,
    rca: LabeledMatrix,
    m_cp: LabeledMatrix,
    diversity: LabeledVector,
    ubiquity: LabeledVector,
}

#[derive(Debug, Clone)]
struct Relatedness {
    proximity: LabeledMatrix,
    distance: LabeledMatrix,
    density: LabeledMatrix,
    country_distance: LabeledMatrix,
}

#[derive(Debug, Clone)]
struct ProductSpace {
    complete: ProductGraph,
    maxst: ProductGraph,
    space: ProductGraph,
    edge_weight_thresh: f64,
}

/// Calculates complexity indexes and the product space for one snapshot.
#[derive(Debug, Clone)]
pub struct Complexity {
    table: RecordTable,
    columns: ColumnConfig,
    config: ComplexityConfig,
    specialization: Option<Specialization>,
    indexes: Option<ComplexityIndexes>,
    relatedness: Option<Relatedness>,
    product_space: Option<ProductSpace>,
}

impl Complexity {
    /// Create a computation object over `table`.
    ///
    /// Fails when the configuration is invalid or a named column is absent.
    pub fn new(table: RecordTable, columns: ColumnConfig, config: ComplexityConfig) -> Result<Self> {
        config.validate()?;
        columns.validate()?;

        for name in [&columns.country, &columns.product, &columns.value] {
            table.require_column(name)?;
        }

        Ok(Self {
            table,
            columns,
            config,
            specialization: None,
            indexes: None,
            relatedness: None,
            product_space: None,
        })
    }

    /// Default column names and thresholds.
    pub fn with_defaults(table: RecordTable) -> Result<Self> {
        Self::new(table, ColumnConfig::default(), ComplexityConfig::default())
    }

    pub fn config(&self) -> &ComplexityConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    // ========================================================================
    // Stages
    // ========================================================================

    fn build_specialization(&self) -> Result<Specialization> {
        let observations = self.table.observations(&self.columns)?;
        let m = build_value_matrix(&observations)?;
        let rca = revealed_comparative_advantage(&m);
        let m_cp = specialization_matrix(&rca, self.config.m_cp_thresh);
        let diversity = complexity::diversity(&m_cp);
        let ubiquity = complexity::ubiquity(&m_cp);

        let (countries, products) = m.shape();
        info!(
            observations = observations.len(),
            countries,
            products,
            m_cp_thresh = self.config.m_cp_thresh,
            "Computed RCA and Mcp"
        );

        Ok(Specialization {
            m,
            rca,
            m_cp,
            diversity,
            ubiquity,
        })
    }

    fn build_indexes(stage: &Specialization) -> Result<ComplexityIndexes> {
        complexity::complexity_indexes(&stage.m_cp, &stage.diversity, &stage.ubiquity)
    }

    fn build_relatedness(stage: &Specialization) -> Result<Relatedness> {
        let proximity = proximity::proximity(&stage.m_cp, &stage.ubiquity)?;
        let distance = proximity::distance(&proximity);
        let density = proximity::density(&stage.m_cp, &proximity)?;
        let country_distance = proximity::country_distance(&density);

        info!(products = proximity.shape().0, "Computed proximity and density");

        Ok(Relatedness {
            proximity,
            distance,
            density,
            country_distance,
        })
    }

    fn require_specialization(&self, step: &str) -> Result<&Specialization> {
        self.specialization.as_ref().ok_or_else(|| {
            ComplexityError::Computation(format!("{step} requires calculate_rca to run first"))
        })
    }

    /// Build the value matrix, RCA, Mcp, diversity, and ubiquity.
    pub fn calculate_rca(&mut self) -> Result<()> {
        self.specialization = Some(self.build_specialization()?);
        Ok(())
    }

    /// Compute ECI and PCI. Requires [`Self::calculate_rca`].
    pub fn calculate_complexity(&mut self) -> Result<()> {
        let indexes = Self::build_indexes(self.require_specialization("calculate_complexity")?)?;
        self.indexes = Some(indexes);
        Ok(())
    }

    /// Compute proximity, distance, and density. Requires [`Self::calculate_rca`].
    pub fn calculate_proximity(&mut self) -> Result<()> {
        let relatedness =
            Self::build_relatedness(self.require_specialization("calculate_proximity")?)?;
        self.relatedness = Some(relatedness);
        Ok(())
    }

    /// Run every index step. Either all artifacts are stored or none are.
    pub fn calculate_indexes(&mut self) -> Result<()> {
        let specialization = self.build_specialization()?;
        let indexes = Self::build_indexes(&specialization)?;
        let relatedness = Self::build_relatedness(&specialization)?;

        self.specialization = Some(specialization);
        self.indexes = Some(indexes);
        self.relatedness = Some(relatedness);
        Ok(())
    }

    /// Build the product space with the configured edge threshold.
    pub fn create_product_space(&mut self) -> Result<()> {
        self.create_product_space_with(self.config.edge_weight_thresh)
    }

    /// Build the complete graph, its maximum spanning tree, and the product
    /// space keeping extra edges with proximity `>= edge_weight_thresh`.
    ///
    /// Requires proximity from [`Self::calculate_proximity`] or
    /// [`Self::calculate_indexes`]. The complete graph and tree are reused
    /// across calls.
    pub fn create_product_space_with(&mut self, edge_weight_thresh: f64) -> Result<()> {
        if !edge_weight_thresh.is_finite() {
            return Err(ComplexityError::Computation(format!(
                "edge weight threshold must be finite, got {edge_weight_thresh}"
            )));
        }

        let relatedness = self.relatedness.as_ref().ok_or_else(|| {
            ComplexityError::Computation(
                "product space requires Mcp and proximity; run calculate_indexes first".into(),
            )
        })?;

        let (complete, maxst) = match self.product_space.take() {
            Some(existing) => (existing.complete, existing.maxst),
            None => {
                let complete = ProductGraph::complete(&relatedness.proximity);
                let maxst = complete.maximum_spanning_tree();
                (complete, maxst)
            }
        };
        let space = complete.product_space(&maxst, edge_weight_thresh);

        self.product_space = Some(ProductSpace {
            complete,
            maxst,
            space,
            edge_weight_thresh,
        });
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    fn specialization(&self, name: &'static str) -> Result<&Specialization> {
        self.specialization
            .as_ref()
            .ok_or(ComplexityError::State(name))
    }

    fn indexes(&self, name: &'static str) -> Result<&ComplexityIndexes> {
        self.indexes.as_ref().ok_or(ComplexityError::State(name))
    }

    fn relatedness(&self, name: &'static str) -> Result<&Relatedness> {
        self.relatedness.as_ref().ok_or(ComplexityError::State(name))
    }

    fn graphs(&self, name: &'static str) -> Result<&ProductSpace> {
        self.product_space.as_ref().ok_or(ComplexityError::State(name))
    }

    /// Country×product value matrix.
    pub fn m(&self) -> Result<&LabeledMatrix> {
        Ok(&self.specialization("m")?.m)
    }

    pub fn rca(&self) -> Result<&LabeledMatrix> {
        Ok(&self.specialization("rca")?.rca)
    }

    pub fn m_cp(&self) -> Result<&LabeledMatrix> {
        Ok(&self.specialization("m_cp")?.m_cp)
    }

    pub fn diversity(&self) -> Result<&LabeledVector> {
        Ok(&self.specialization("diversity")?.diversity)
    }

    pub fn ubiquity(&self) -> Result<&LabeledVector> {
        Ok(&self.specialization("ubiquity")?.ubiquity)
    }

    pub fn eci(&self) -> Result<&LabeledVector> {
        Ok(&self.indexes("eci")?.eci)
    }

    pub fn pci(&self) -> Result<&LabeledVector> {
        Ok(&self.indexes("pci")?.pci)
    }

    pub fn proximity(&self) -> Result<&LabeledMatrix> {
        Ok(&self.relatedness("proximity")?.proximity)
    }

    /// Product-to-product distance, `1 − proximity`.
    pub fn distance(&self) -> Result<&LabeledMatrix> {
        Ok(&self.relatedness("distance")?.distance)
    }

    pub fn density(&self) -> Result<&LabeledMatrix> {
        Ok(&self.relatedness("density")?.density)
    }

    /// Country-to-product distance, `1 − density`.
    pub fn country_distance(&self) -> Result<&LabeledMatrix> {
        Ok(&self.relatedness("country_distance")?.country_distance)
    }

    pub fn complete_graph(&self) -> Result<&ProductGraph> {
        Ok(&self.graphs("complete_graph")?.complete)
    }

    /// Maximum spanning tree of the complete graph.
    pub fn maxst(&self) -> Result<&ProductGraph> {
        Ok(&self.graphs("maxst")?.maxst)
    }

    pub fn product_space(&self) -> Result<&ProductGraph> {
        Ok(&self.graphs("product_space")?.space)
    }

    /// Threshold used for the stored product space.
    pub fn product_space_thresh(&self) -> Result<f64> {
        Ok(self.graphs("product_space")?.edge_weight_thresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_stub() -> RecordTable {
        RecordTable::from_triples(
            &ColumnConfig::default(),
            &[
                ("A", "P1", 100.0),
                ("B", "P1", 60.0),
                ("B", "P2", 40.0),
                ("C", "P2", 40.0),
                ("C", "P3", 60.0),
            ],
        )
    }

    #[test]
    fn test_new_rejects_missing_column() {
        let table = RecordTable::new(["country", "product", "value"]);
        let err = Complexity::with_defaults(table).unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ComplexityConfig::default().with_m_cp_thresh(-1.0);
        let err = Complexity::new(data_stub(), ColumnConfig::default(), config).unwrap_err();
        assert!(matches!(err, ComplexityError::Config(_)));
    }

    #[test]
    fn test_accessors_before_calculation() {
        let comp = Complexity::with_defaults(data_stub()).unwrap();
        assert!(comp.m().unwrap_err().is_state());
        assert!(comp.eci().unwrap_err().is_state());
        assert!(comp.proximity().unwrap_err().is_state());
        assert!(comp.product_space().unwrap_err().is_state());
    }

    #[test]
    fn test_stage_order_is_enforced() {
        let mut comp = Complexity::with_defaults(data_stub()).unwrap();
        assert!(comp.calculate_complexity().unwrap_err().is_computation());
        assert!(comp.calculate_proximity().unwrap_err().is_computation());
        assert!(comp.create_product_space().unwrap_err().is_computation());

        comp.calculate_rca().unwrap();
        // Mcp alone is not enough for the product space.
        assert!(comp.create_product_space().unwrap_err().is_computation());
        comp.calculate_proximity().unwrap();
        comp.create_product_space().unwrap();
        assert!(comp.eci().unwrap_err().is_state());
    }

    #[test]
    fn test_calculate_indexes_populates_everything() {
        let mut comp = Complexity::with_defaults(data_stub()).unwrap();
        comp.calculate_indexes().unwrap();

        assert_eq!(comp.m().unwrap().get("B", "P2"), Some(40.0));
        assert_eq!(comp.m().unwrap().get("A", "P3"), Some(0.0));
        assert_eq!(comp.m_cp().unwrap().get("C", "P3"), Some(1.0));
        assert_eq!(comp.diversity().unwrap().get("B"), Some(2.0));
        assert_eq!(comp.ubiquity().unwrap().get("P3"), Some(1.0));
        assert_eq!(comp.eci().unwrap().len(), 3);
        assert_eq!(comp.pci().unwrap().len(), 3);
        assert_eq!(comp.proximity().unwrap().shape(), (3, 3));
        assert_eq!(comp.distance().unwrap().shape(), (3, 3));
        assert_eq!(comp.density().unwrap().shape(), (3, 3));
        assert_eq!(comp.country_distance().unwrap().shape(), (3, 3));
    }

    #[test]
    fn test_failed_step_stores_nothing() {
        // One country only: Mcp is fine, ECI is degenerate.
        let table = RecordTable::from_triples(
            &ColumnConfig::default(),
            &[("A", "P1", 1.0), ("A", "P2", 2.0)],
        );
        let mut comp = Complexity::with_defaults(table).unwrap();

        assert!(comp.calculate_indexes().unwrap_err().is_computation());
        assert!(comp.m_cp().unwrap_err().is_state());
        assert!(comp.proximity().unwrap_err().is_state());
    }

    #[test]
    fn test_product_space_threshold_is_recorded() {
        let mut comp = Complexity::with_defaults(data_stub()).unwrap();
        comp.calculate_indexes().unwrap();
        comp.create_product_space().unwrap();
        assert!((comp.product_space_thresh().unwrap() - 0.65).abs() < f64::EPSILON);

        comp.create_product_space_with(0.0).unwrap();
        let complete = comp.complete_graph().unwrap();
        // Every edge qualifies at threshold 0.
        assert_eq!(comp.product_space().unwrap().edge_count(), complete.edge_count());
    }

    #[test]
    fn test_non_finite_threshold() {
        let mut comp = Complexity::with_defaults(data_stub()).unwrap();
        comp.calculate_indexes().unwrap();
        assert!(comp.create_product_space_with(f64::NAN).is_err());
    }
}
