//! Economic and Product Complexity Indexes by the eigenvector method.
//!
//! The country operator `M̃ = D_c⁻¹ · M · D_p⁻¹ · Mᵀ` is not symmetric, but it
//! is similar to `S = D_c^-½ · M · D_p⁻¹ · Mᵀ · D_c^-½`, which is. Solving `S`
//! with a symmetric eigensolver gives a real, deterministic spectrum; each
//! eigenvector `u` of `S` maps back to `v = D_c^-½ · u` of `M̃`. The product
//! side swaps the roles of `D_c` and `D_p`.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use statrs::statistics::Statistics;
use tracing::{debug, info};

use crate::error::{ComplexityError, Result};
use crate::matrix::{LabeledMatrix, LabeledVector};

/// Eigenvalues closer than this are treated as tied and keep index order.
pub const EIGEN_TIE_EPSILON: f64 = 1e-10;

/// Below this standard deviation an eigenvector cannot be normalized.
const MIN_STD_DEV: f64 = 1e-12;

/// ECI and PCI computed together.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityIndexes {
    pub eci: LabeledVector,
    pub pci: LabeledVector,
}

/// Number of products each country exports with comparative advantage.
pub fn diversity(m_cp: &LabeledMatrix) -> LabeledVector {
    m_cp.row_sums()
}

/// Number of countries exporting each product with comparative advantage.
pub fn ubiquity(m_cp: &LabeledMatrix) -> LabeledVector {
    m_cp.col_sums()
}

/// Compute ECI and PCI from Mcp and its degree vectors.
///
/// ECI is oriented to correlate positively with diversity. PCI is oriented
/// to agree with the reflection of ECI onto products,
/// `Σ_c Mcp[c,p]·ECI[c] / ubiquity[p]`; if that carries no sign information
/// it is oriented against ubiquity instead.
pub fn complexity_indexes(
    m_cp: &LabeledMatrix,
    diversity: &LabeledVector,
    ubiquity: &LabeledVector,
) -> Result<ComplexityIndexes> {
    check_degenerate(m_cp)?;

    let m = m_cp.data();
    let kc = diversity.values();
    let kp = ubiquity.values();

    let mut eci = normalize(&second_eigenvector(m, kc, kp)?, "eci")?;
    if correlation(&eci, kc) < 0.0 {
        eci = -eci;
    }

    let mut pci = normalize(&second_eigenvector(&m.transpose(), kp, kc)?, "pci")?;
    let reflected = reflect(m, &eci, kp);
    let agreement = correlation(&pci, &reflected);
    let flip = if agreement.is_nan() {
        correlation(&pci, kp) > 0.0
    } else {
        agreement < 0.0
    };
    if flip {
        pci = -pci;
    }

    info!(
        countries = eci.len(),
        products = pci.len(),
        "Computed complexity indexes"
    );

    Ok(ComplexityIndexes {
        eci: LabeledVector::new(m_cp.row_labels().to_vec(), eci)?,
        pci: LabeledVector::new(m_cp.col_labels().to_vec(), pci)?,
    })
}

fn check_degenerate(m_cp: &LabeledMatrix) -> Result<()> {
    let (countries, products) = m_cp.shape();
    if countries < 2 || products < 2 {
        return Err(ComplexityError::Computation(format!(
            "need at least 2 countries and 2 products, got {countries}x{products}"
        )));
    }
    if m_cp.data().iter().all(|&v| v == 0.0) {
        return Err(ComplexityError::Computation(
            "Mcp is all zero; no country has comparative advantage in any product".into(),
        ));
    }
    Ok(())
}

fn inverse_or_zero(k: f64) -> f64 {
    if k > 0.0 {
        1.0 / k
    } else {
        0.0
    }
}

/// Eigenvector of `D_r⁻¹ · M · D_c⁻¹ · Mᵀ` for its second-largest eigenvalue.
fn second_eigenvector(
    m: &DMatrix<f64>,
    row_degree: &DVector<f64>,
    col_degree: &DVector<f64>,
) -> Result<DVector<f64>> {
    let inv_sqrt_row = row_degree.map(|k| inverse_or_zero(k).sqrt());
    let inv_col = col_degree.map(inverse_or_zero);

    let mut weighted = m.clone();
    for (j, mut column) in weighted.column_iter_mut().enumerate() {
        column *= inv_col[j];
    }
    let cooccurrence = &weighted * m.transpose();

    let n = m.nrows();
    let symmetric = DMatrix::from_fn(n, n, |i, j| {
        let s = 0.5 * (cooccurrence[(i, j)] + cooccurrence[(j, i)]);
        s * inv_sqrt_row[i] * inv_sqrt_row[j]
    });

    let eigen = SymmetricEigen::new(symmetric);
    let order = eigen_order(eigen.eigenvalues.as_slice());
    let second = *order.get(1).ok_or_else(|| {
        ComplexityError::Computation("operator has fewer than two eigenvalues".into())
    })?;

    let (largest, second_value) = (eigen.eigenvalues[order[0]], eigen.eigenvalues[second]);
    debug!(largest, second = second_value, "Selected eigenvalue");
    if second_value <= EIGEN_TIE_EPSILON {
        return Err(ComplexityError::Computation(format!(
            "second eigenvalue is {second_value:e}; Mcp carries no structure beyond the trivial vector"
        )));
    }

    let u = eigen.eigenvectors.column(second);
    Ok(u.component_mul(&inv_sqrt_row))
}

/// Indices of `values` sorted descending; near-ties keep index order.
fn eigen_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by_key(|&i| -((values[i] / EIGEN_TIE_EPSILON).round() as i64));
    order
}

/// Zero mean, unit population standard deviation.
fn normalize(v: &DVector<f64>, name: &str) -> Result<DVector<f64>> {
    let mean = v.as_slice().iter().mean();
    let std_dev = v.as_slice().iter().population_std_dev();
    if !std_dev.is_finite() || std_dev < MIN_STD_DEV {
        return Err(ComplexityError::Computation(format!(
            "{name} eigenvector has no variance; Mcp is degenerate"
        )));
    }
    Ok(v.map(|x| (x - mean) / std_dev))
}

/// Pearson correlation; NaN when either side is constant.
fn correlation(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    let cov = a.as_slice().iter().population_covariance(b.as_slice().iter());
    let sa = a.as_slice().iter().population_std_dev();
    let sb = b.as_slice().iter().population_std_dev();
    if sa == 0.0 || sb == 0.0 {
        return f64::NAN;
    }
    cov / (sa * sb)
}

/// Average ECI of each product's exporters.
fn reflect(m: &DMatrix<f64>, eci: &DVector<f64>, kp: &DVector<f64>) -> DVector<f64> {
    let sums = m.transpose() * eci;
    sums.zip_map(kp, |s, k| s * inverse_or_zero(k))
}
