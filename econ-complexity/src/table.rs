//! Named-column record table.
//!
//! The pipeline only needs "a table with named columns": this module holds
//! string cells keyed by header and turns them into typed [`Observation`]s.
//! CSV reading is a thin adapter over the `csv` crate.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use econ_common::config::ColumnConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ComplexityError, Result, ResultExt};

/// One (country, product, value) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub country: String,
    pub product: String,
    pub value: f64,
}

impl Observation {
    pub fn new(country: impl Into<String>, product: impl Into<String>, value: f64) -> Self {
        Self {
            country: country.into(),
            product: product.into(),
            value,
        }
    }
}

/// A table of string cells with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Create an empty table with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a three-column table from (country, product, value) triples.
    pub fn from_triples(columns: &ColumnConfig, triples: &[(&str, &str, f64)]) -> Self {
        let mut table = Self::new([
            columns.country.as_str(),
            columns.product.as_str(),
            columns.value.as_str(),
        ]);
        table.rows = triples
            .iter()
            .map(|(c, p, v)| vec![(*c).to_string(), (*p).to_string(), v.to_string()])
            .collect();
        table
    }

    /// Read a table from CSV with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Read a table from a CSV file.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("opening {}", path.display()))?;
        let table = Self::from_csv_reader(file).context(format!("reading {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.headers.len(),
            "Loaded record table"
        );
        Ok(table)
    }

    /// Append a row; its width must match the header.
    pub fn push_row<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.headers.len() {
            return Err(ComplexityError::Data(format!(
                "row has {} cells but the table has {} columns",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub(crate) fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            ComplexityError::Data(format!(
                "missing required column '{}' (available: {})",
                name,
                self.headers.join(", ")
            ))
        })
    }

    /// Extract typed observations using the configured column names.
    ///
    /// Fails with a data error when a column is missing or a value is not a
    /// finite, non-negative number.
    pub fn observations(&self, columns: &ColumnConfig) -> Result<Vec<Observation>> {
        let c_idx = self.require_column(&columns.country)?;
        let p_idx = self.require_column(&columns.product)?;
        let v_idx = self.require_column(&columns.value)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(line, row)| {
                let raw = row[v_idx].trim();
                let value: f64 = raw.parse().map_err(|_| {
                    ComplexityError::Data(format!(
                        "row {}: value '{}' in column '{}' is not numeric",
                        line + 1,
                        raw,
                        columns.value
                    ))
                })?;
                if !value.is_finite() || value < 0.0 {
                    return Err(ComplexityError::Data(format!(
                        "row {}: value {} in column '{}' must be finite and non-negative",
                        line + 1,
                        value,
                        columns.value
                    )));
                }
                Ok(Observation::new(row[c_idx].clone(), row[p_idx].clone(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> ColumnConfig {
        ColumnConfig::default()
    }

    #[test]
    fn test_from_triples() {
        let table = RecordTable::from_triples(&columns(), &[("A", "P1", 10.0), ("B", "P2", 2.5)]);
        assert_eq!(table.headers(), &["country", "product", "export"]);
        assert_eq!(table.len(), 2);

        let obs = table.observations(&columns()).unwrap();
        assert_eq!(obs[1], Observation::new("B", "P2", 2.5));
    }

    #[test]
    fn test_from_csv_reader() {
        let data = "country, product, export\nA, P1, 10\nB, P2, 40.5\n";
        let table = RecordTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["country", "product", "export"]);

        let obs = table.observations(&columns()).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0], Observation::new("A", "P1", 10.0));
        assert!((obs[1].value - 40.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ragged_csv_is_rejected() {
        let data = "country,product,export\nA,P1\n";
        let err = RecordTable::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ComplexityError::Csv(_)));
    }

    #[test]
    fn test_missing_column() {
        let mut table = RecordTable::new(["country", "hs4", "export"]);
        table.push_row(["A", "0101", "1"]).unwrap();

        let err = table.observations(&columns()).unwrap_err();
        assert!(err.is_data());
        assert!(err.to_string().contains("'product'"));
    }

    #[test]
    fn test_non_numeric_value() {
        let mut table = RecordTable::new(["country", "product", "export"]);
        table.push_row(["A", "P1", "ten"]).unwrap();

        let err = table.observations(&columns()).unwrap_err();
        assert!(err.is_data());
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn test_negative_value() {
        let mut table = RecordTable::new(["country", "product", "export"]);
        table.push_row(["A", "P1", "-3"]).unwrap();

        assert!(table.observations(&columns()).unwrap_err().is_data());
    }

    #[test]
    fn test_push_row_width_mismatch() {
        let mut table = RecordTable::new(["country", "product", "export"]);
        assert!(table.push_row(["A", "P1"]).unwrap_err().is_data());
    }
}
