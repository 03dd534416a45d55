//! Product proximity, distance, and density.

use nalgebra::DMatrix;

use crate::error::Result;
use crate::matrix::{LabeledMatrix, LabeledVector};

/// Proximity between every pair of products.
///
/// `φ[p,q] = Σ_c Mcp[c,p]·Mcp[c,q] / max(ubiquity[p], ubiquity[q])`, the
/// smaller of the two conditional co-export probabilities. Pairs involving
/// only zero-ubiquity products are 0. The diagonal is excluded and stored as 0.
pub fn proximity(m_cp: &LabeledMatrix, ubiquity: &LabeledVector) -> Result<LabeledMatrix> {
    let m = m_cp.data();
    let kp = ubiquity.values();
    let cooccurrence = m.transpose() * m;

    let n = m.ncols();
    let phi = DMatrix::from_fn(n, n, |p, q| {
        let denom = kp[p].max(kp[q]);
        if p == q || denom <= 0.0 {
            0.0
        } else {
            cooccurrence[(p, q)] / denom
        }
    });

    let labels = m_cp.col_labels().to_vec();
    LabeledMatrix::new(labels.clone(), labels, phi)
}

/// `1 − φ` off the diagonal; the diagonal stays 0.
pub fn distance(proximity: &LabeledMatrix) -> LabeledMatrix {
    let phi = proximity.data();
    let n = phi.nrows();
    let d = DMatrix::from_fn(n, n, |p, q| if p == q { 0.0 } else { 1.0 - phi[(p, q)] });
    proximity.with_data(d)
}

/// Density of each product around each country's current specialization.
///
/// `density[c,p] = Σ_q Mcp[c,q]·φ[q,p] / Σ_q φ[q,p]`, 0 where a product has no
/// proximity to anything.
pub fn density(m_cp: &LabeledMatrix, proximity: &LabeledMatrix) -> Result<LabeledMatrix> {
    let phi = proximity.data();
    let mut weighted = m_cp.data() * phi;

    for (p, mut column) in weighted.column_iter_mut().enumerate() {
        let total = phi.column(p).sum();
        if total > 0.0 {
            column /= total;
        } else {
            column.fill(0.0);
        }
    }

    LabeledMatrix::new(
        m_cp.row_labels().to_vec(),
        proximity.col_labels().to_vec(),
        weighted,
    )
}

/// `1 − density`: how far a country is from each product.
pub fn country_distance(density: &LabeledMatrix) -> LabeledMatrix {
    density.with_data(density.data().map(|d| 1.0 - d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::ubiquity;

    fn m_cp(rows: usize, cols: usize, cells: &[f64]) -> LabeledMatrix {
        LabeledMatrix::new(
            (0..rows).map(|i| format!("c{i}")).collect(),
            (0..cols).map(|j| format!("p{j}")).collect(),
            DMatrix::from_row_slice(rows, cols, cells),
        )
        .unwrap()
    }

    #[test]
    fn test_proximity_known_values() {
        // p0 exported by c0,c1; p1 by c0; p2 by c1,c2
        let m = m_cp(3, 3, &[1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        let phi = proximity(&m, &ubiquity(&m)).unwrap();

        assert_eq!(phi.get("p0", "p1"), Some(0.5));
        assert_eq!(phi.get("p0", "p2"), Some(0.5));
        assert_eq!(phi.get("p1", "p2"), Some(0.0));
        assert_eq!(phi.get("p0", "p0"), Some(0.0));
    }

    #[test]
    fn test_proximity_symmetric_and_bounded() {
        let m = m_cp(
            4,
            3,
            &[1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        );
        let phi = proximity(&m, &ubiquity(&m)).unwrap();
        let data = phi.data();

        assert_eq!(data, &data.transpose());
        assert!(data.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_zero_ubiquity_product() {
        let m = m_cp(2, 3, &[1.0, 0.0, 0.0, 1.0, 1.0, 0.0]);
        let phi = proximity(&m, &ubiquity(&m)).unwrap();

        assert_eq!(phi.get("p0", "p2"), Some(0.0));
        assert_eq!(phi.get("p2", "p1"), Some(0.0));
        assert!(phi.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_distance_complements_proximity() {
        let m = m_cp(3, 3, &[1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        let phi = proximity(&m, &ubiquity(&m)).unwrap();
        let d = distance(&phi);

        assert_eq!(d.get("p0", "p1"), Some(0.5));
        assert_eq!(d.get("p1", "p2"), Some(1.0));
        assert_eq!(d.get("p2", "p2"), Some(0.0));
    }

    #[test]
    fn test_density_and_country_distance() {
        let m = m_cp(3, 3, &[1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        let phi = proximity(&m, &ubiquity(&m)).unwrap();
        let dens = density(&m, &phi).unwrap();

        // column sums of φ: p0 = 1.0, p1 = 0.5, p2 = 0.5
        // c2 only exports p2: density[c2, p0] = φ[p2,p0] / 1.0
        assert_eq!(dens.get("c2", "p0"), Some(0.5));
        // c0 exports p0 and p1: density[c0, p2] = (0.5 + 0.0) / 0.5
        assert_eq!(dens.get("c0", "p2"), Some(1.0));
        assert!(dens.data().iter().all(|&v| (0.0..=1.0).contains(&v)));

        let dist = country_distance(&dens);
        assert_eq!(dist.get("c2", "p0"), Some(0.5));
        assert_eq!(dist.get("c0", "p2"), Some(0.0));
    }

    #[test]
    fn test_density_isolated_product_is_zero() {
        let m = m_cp(2, 2, &[1.0, 0.0, 1.0, 0.0]);
        let phi = proximity(&m, &ubiquity(&m)).unwrap();
        let dens = density(&m, &phi).unwrap();
        assert!(dens.data().iter().all(|&v| v == 0.0));
    }
}
