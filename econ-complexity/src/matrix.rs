//! Labeled dense matrices and the country×product value matrix builder.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use tracing::debug;

use crate::error::{ComplexityError, Result};
use crate::table::Observation;

// ============================================================================
// Labeled Vector
// ============================================================================

/// A vector of values keyed by country or product identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledVector {
    labels: Vec<String>,
    values: DVector<f64>,
}

/// One (label, value) pair, used for tabular output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue<'a> {
    pub label: &'a str,
    pub value: f64,
}

impl LabeledVector {
    pub fn new(labels: Vec<String>, values: DVector<f64>) -> Result<Self> {
        if labels.len() != values.len() {
            return Err(ComplexityError::Computation(format!(
                "{} labels for a vector of length {}",
                labels.len(),
                values.len()
            )));
        }
        Ok(Self { labels, values })
    }

    /// Build from (label, value) pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (labels, values): (Vec<String>, Vec<f64>) =
            pairs.into_iter().map(|(l, v)| (l.into(), v)).unzip();
        Self {
            labels,
            values: DVector::from_vec(values),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for a label, if present.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = LabeledValue<'_>> {
        self.labels
            .iter()
            .zip(self.values.iter())
            .map(|(label, &value)| LabeledValue { label, value })
    }

    /// Labels sorted by value, highest first.
    pub fn ranked(&self) -> Vec<LabeledValue<'_>> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
        ranked
    }
}

// ============================================================================
// Labeled Matrix
// ============================================================================

/// A dense matrix with labeled rows and columns.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    rows: Vec<String>,
    cols: Vec<String>,
    data: DMatrix<f64>,
}

impl LabeledMatrix {
    pub fn new(rows: Vec<String>, cols: Vec<String>, data: DMatrix<f64>) -> Result<Self> {
        if data.nrows() != rows.len() || data.ncols() != cols.len() {
            return Err(ComplexityError::Computation(format!(
                "labels {}x{} do not match matrix {}x{}",
                rows.len(),
                cols.len(),
                data.nrows(),
                data.ncols()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Same labels, new data of identical shape.
    pub(crate) fn with_data(&self, data: DMatrix<f64>) -> Self {
        debug_assert_eq!(data.shape(), self.data.shape());
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            data,
        }
    }

    pub fn row_labels(&self) -> &[String] {
        &self.rows
    }

    pub fn col_labels(&self) -> &[String] {
        &self.cols
    }

    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// Cell by row and column label.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.cols.iter().position(|c| c == col)?;
        Some(self.data[(i, j)])
    }

    /// Row sums keyed by row label.
    pub fn row_sums(&self) -> LabeledVector {
        let sums = DVector::from_iterator(
            self.data.nrows(),
            self.data.row_iter().map(|row| row.sum()),
        );
        LabeledVector {
            labels: self.rows.clone(),
            values: sums,
        }
    }

    /// Column sums keyed by column label.
    pub fn col_sums(&self) -> LabeledVector {
        let sums = DVector::from_iterator(
            self.data.ncols(),
            self.data.column_iter().map(|col| col.sum()),
        );
        LabeledVector {
            labels: self.cols.clone(),
            values: sums,
        }
    }
}

// ============================================================================
// Value Matrix Builder
// ============================================================================

/// Pivot observations into a country×product value matrix.
///
/// Rows and columns are the sorted unique identifiers. Duplicate
/// (country, product) pairs are summed; absent pairs are 0.
pub fn build_value_matrix(observations: &[Observation]) -> Result<LabeledMatrix> {
    if observations.is_empty() {
        return Err(ComplexityError::Data("no observations to pivot".into()));
    }

    let mut cells: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    let mut countries = BTreeSet::new();
    let mut products = BTreeSet::new();
    let mut duplicates = 0usize;

    for obs in observations {
        countries.insert(obs.country.as_str());
        products.insert(obs.product.as_str());
        let key = (obs.country.as_str(), obs.product.as_str());
        if cells.contains_key(&key) {
            duplicates += 1;
        }
        *cells.entry(key).or_insert(0.0) += obs.value;
    }

    if duplicates > 0 {
        debug!(duplicates, "Summed duplicate (country, product) observations");
    }

    let country_index: BTreeMap<&str, usize> =
        countries.iter().enumerate().map(|(i, c)| (*c, i)).collect();
    let product_index: BTreeMap<&str, usize> =
        products.iter().enumerate().map(|(j, p)| (*p, j)).collect();

    let mut data = DMatrix::zeros(countries.len(), products.len());
    for ((country, product), value) in &cells {
        data[(country_index[country], product_index[product])] = *value;
    }

    LabeledMatrix::new(
        countries.into_iter().map(String::from).collect(),
        products.into_iter().map(String::from).collect(),
        data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observations() -> Vec<Observation> {
        vec![
            Observation::new("A", "P1", 10.0),
            Observation::new("A", "P2", 20.0),
            Observation::new("A", "P3", 30.0),
            Observation::new("B", "P1", 40.0),
            Observation::new("B", "P2", 50.0),
            Observation::new("C", "P1", 60.0),
        ]
    }

    #[test]
    fn test_build_value_matrix() {
        let m = build_value_matrix(&observations()).unwrap();

        assert_eq!(m.row_labels(), &["A", "B", "C"]);
        assert_eq!(m.col_labels(), &["P1", "P2", "P3"]);
        let expected = DMatrix::from_row_slice(
            3,
            3,
            &[10.0, 20.0, 30.0, 40.0, 50.0, 0.0, 60.0, 0.0, 0.0],
        );
        assert_eq!(m.data(), &expected);
    }

    #[test]
    fn test_labels_are_sorted() {
        let obs = vec![
            Observation::new("ZAF", "b", 1.0),
            Observation::new("ARG", "a", 1.0),
        ];
        let m = build_value_matrix(&obs).unwrap();
        assert_eq!(m.row_labels(), &["ARG", "ZAF"]);
        assert_eq!(m.col_labels(), &["a", "b"]);
        assert_eq!(m.get("ARG", "b"), Some(0.0));
    }

    #[test]
    fn test_duplicates_are_summed() {
        let obs = vec![
            Observation::new("A", "P1", 1.5),
            Observation::new("A", "P1", 2.5),
            Observation::new("B", "P1", 1.0),
        ];
        let m = build_value_matrix(&obs).unwrap();
        assert_eq!(m.get("A", "P1"), Some(4.0));
    }

    #[test]
    fn test_empty_observations() {
        assert!(build_value_matrix(&[]).unwrap_err().is_data());
    }

    #[test]
    fn test_row_and_col_sums() {
        let m = build_value_matrix(&observations()).unwrap();
        assert_eq!(m.row_sums().get("A"), Some(60.0));
        assert_eq!(m.col_sums().get("P1"), Some(110.0));
        assert_eq!(m.col_sums().get("P9"), None);
    }

    #[test]
    fn test_ranked() {
        let v = LabeledVector::new(
            vec!["x".into(), "y".into(), "z".into()],
            DVector::from_vec(vec![0.5, 2.0, -1.0]),
        )
        .unwrap();
        let labels: Vec<&str> = v.ranked().iter().map(|lv| lv.label).collect();
        assert_eq!(labels, vec!["y", "x", "z"]);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = LabeledMatrix::new(vec!["a".into()], vec![], DMatrix::zeros(2, 2)).unwrap_err();
        assert!(err.is_computation());
    }
}
