//! Balassa's Revealed Comparative Advantage and the binary Mcp matrix.

use nalgebra::DMatrix;
use tracing::warn;

use crate::matrix::LabeledMatrix;

/// Compute RCA for every (country, product) cell.
///
/// `RCA[c,p] = (X[c,p] / Σ_p X[c,p]) / (Σ_c X[c,p] / Σ X)`. A country with no
/// exports, or a product nobody exports, gets RCA 0 instead of NaN.
pub fn revealed_comparative_advantage(values: &LabeledMatrix) -> LabeledMatrix {
    let x = values.data();
    let country_totals = values.row_sums();
    let product_totals = values.col_sums();
    let world_total: f64 = country_totals.values().sum();

    let zero_countries = country_totals.values().iter().filter(|&&t| t == 0.0).count();
    let zero_products = product_totals.values().iter().filter(|&&t| t == 0.0).count();
    if zero_countries > 0 || zero_products > 0 {
        warn!(
            zero_countries,
            zero_products, "Zero-total rows or columns carry no comparative advantage"
        );
    }

    let rca = DMatrix::from_fn(x.nrows(), x.ncols(), |c, p| {
        let country_total = country_totals.values()[c];
        let product_total = product_totals.values()[p];
        if country_total == 0.0 || product_total == 0.0 || world_total == 0.0 {
            return 0.0;
        }
        (x[(c, p)] / country_total) / (product_total / world_total)
    });

    values.with_data(rca)
}

/// Binarize RCA: 1 where `RCA >= thresh`, else 0.
pub fn specialization_matrix(rca: &LabeledMatrix, thresh: f64) -> LabeledMatrix {
    let m_cp = rca.data().map(|v| if v >= thresh { 1.0 } else { 0.0 });
    rca.with_data(m_cp)
}
