//! CSV and JSON writers for command results.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use econ_complexity::{LabeledMatrix, LabeledVector};
use serde::Serialize;

/// Create `dir` if needed and return it.
pub fn ensure_dir(dir: &Path) -> Result<&Path> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir)
}

/// Two-column CSV: `<label_header>,<value_header>`, in label order.
pub fn write_vector(
    dir: &Path,
    file_name: &str,
    label_header: &str,
    value_header: &str,
    vector: &LabeledVector,
) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record([label_header, value_header])?;
    for entry in vector.iter() {
        wtr.write_record([entry.label.to_string(), entry.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(path)
}

/// Wide CSV: one row per row label, one column per column label.
pub fn write_matrix(
    dir: &Path,
    file_name: &str,
    corner: &str,
    matrix: &LabeledMatrix,
) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec![corner.to_string()];
    header.extend(matrix.col_labels().iter().cloned());
    wtr.write_record(&header)?;

    let data = matrix.data();
    for (i, label) in matrix.row_labels().iter().enumerate() {
        let mut record = Vec::with_capacity(data.ncols() + 1);
        record.push(label.clone());
        record.extend(data.row(i).iter().map(f64::to_string));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(path)
}

/// Pretty-printed JSON.
pub fn write_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf> {
    let path = dir.join(file_name);
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_vector() {
        let dir = tempfile::tempdir().unwrap();
        let v = LabeledVector::from_pairs([("a", 1.5), ("b", -2.0)]);
        let path = write_vector(dir.path(), "eci.csv", "country", "eci", &v).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "country,eci\na,1.5\nb,-2\n");
    }

    #[test]
    fn test_write_json_creates_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = ensure_dir(&dir.path().join("run")).unwrap().to_path_buf();
        let path = write_json(&nested, "summary.json", &serde_json::json!({"countries": 3})).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed["countries"], 3);
    }
}
