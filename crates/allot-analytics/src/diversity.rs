//! Shannon-entropy diversity of neighborhoods (rows) and schools (columns).

use allot_core::entities::DiversityIndex;
use allot_core::enums::NodeKind;
use allot_core::AssignmentMatrix;

/// Natural-log entropy of the distribution implied by `counts`.
///
/// Zero counts do not contribute. `epsilon` is added inside the logarithm;
/// the result is clamped at 0 so a single nonzero category yields exactly 0.
#[must_use]
pub fn shannon_entropy(counts: impl IntoIterator<Item = u64> + Clone, epsilon: f64) -> f64 {
    let total: u64 = counts.clone().into_iter().sum();
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let total = total as f64;
    let entropy: f64 = counts
        .into_iter()
        .filter(|c| *c > 0)
        .map(|c| {
            #[allow(clippy::cast_precision_loss)]
            let p = c as f64 / total;
            -p * (p + epsilon).ln()
        })
        .sum();
    entropy.max(0.0)
}

/// One index per neighborhood; low values mark concentrated (segregated) assignment.
#[must_use]
pub fn neighborhood_diversity(matrix: &AssignmentMatrix, epsilon: f64) -> Vec<DiversityIndex> {
    matrix
        .neighborhoods()
        .iter()
        .zip(matrix.rows())
        .map(|(id, row)| DiversityIndex {
            node_id: id.clone(),
            node_kind: NodeKind::Neighborhood,
            entropy: shannon_entropy(row.iter().copied(), epsilon),
            nonzero_categories: row.iter().filter(|c| **c > 0).count(),
        })
        .collect()
}

/// One index per school; high values mean it draws from many neighborhoods.
#[must_use]
pub fn school_diversity(matrix: &AssignmentMatrix, epsilon: f64) -> Vec<DiversityIndex> {
    matrix
        .schools()
        .iter()
        .enumerate()
        .map(|(j, id)| DiversityIndex {
            node_id: id.clone(),
            node_kind: NodeKind::School,
            entropy: shannon_entropy(matrix.column(j), epsilon),
            nonzero_categories: matrix.column(j).filter(|c| *c > 0).count(),
        })
        .collect()
}
