//! Bipartite neighborhood/school graph analytics.

use std::convert::Infallible;

use allot_core::AssignmentMatrix;
use allot_core::entities::{CentralityReport, CentralityScore};
use allot_core::enums::{CentralityMethod, NodeKind};
use rustworkx_core::centrality::eigenvector_centrality;
use rustworkx_core::petgraph::graph::{NodeIndex, UnGraph};

use crate::error::AnalyticsError;
use crate::outcome::Outcome;

/// Node payload: which side of the bipartition and the label on that side.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub kind: NodeKind,
    pub id: String,
}

/// Undirected weighted graph with one edge per nonzero matrix cell.
///
/// Neighborhoods and schools live in separate namespaces, so equal labels on
/// both axes produce two distinct nodes. Isolated labels are left out.
pub struct AssignmentGraph {
    graph: UnGraph<GraphNode, f64>,
}

impl AssignmentGraph {
    #[must_use]
    pub fn from_matrix(matrix: &AssignmentMatrix) -> Self {
        let mut graph = UnGraph::new_undirected();

        let row_nodes: Vec<Option<NodeIndex>> = matrix
            .neighborhoods()
            .iter()
            .zip(matrix.row_sums())
            .map(|(id, sum)| {
                (sum > 0).then(|| {
                    graph.add_node(GraphNode {
                        kind: NodeKind::Neighborhood,
                        id: id.clone(),
                    })
                })
            })
            .collect();
        let col_nodes: Vec<Option<NodeIndex>> = matrix
            .schools()
            .iter()
            .zip(matrix.column_sums())
            .map(|(id, sum)| {
                (sum > 0).then(|| {
                    graph.add_node(GraphNode {
                        kind: NodeKind::School,
                        id: id.clone(),
                    })
                })
            })
            .collect();

        for (row, neighborhood) in matrix.rows().iter().zip(&row_nodes) {
            for (&count, school) in row.iter().zip(&col_nodes) {
                if count == 0 {
                    continue;
                }
                if let (Some(a), Some(b)) = (*neighborhood, *school) {
                    #[allow(clippy::cast_precision_loss)]
                    let weight = count as f64;
                    graph.add_edge(a, b, weight);
                }
            }
        }

        Self { graph }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Weighted eigenvector centrality, `None` if power iteration did not converge.
    #[must_use]
    pub fn eigenvector(&self, max_iter: usize, tolerance: f64) -> Option<Vec<f64>> {
        if self.graph.edge_count() == 0 {
            return None;
        }
        eigenvector_centrality(
            &self.graph,
            |edge| Ok::<f64, Infallible>(*edge.weight()),
            Some(max_iter),
            Some(tolerance),
        )
        .ok()
        .flatten()
    }

    /// Unweighted degree divided by `n - 1`.
    #[must_use]
    pub fn degree(&self) -> Vec<f64> {
        let n = self.graph.node_count();
        #[allow(clippy::cast_precision_loss)]
        let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };
        self.graph
            .node_indices()
            .map(|idx| {
                #[allow(clippy::cast_precision_loss)]
                let degree = self.graph.edges(idx).count() as f64;
                if n > 1 { degree / denom } else { 1.0 }
            })
            .collect()
    }

    /// Scores ranked descending; ties keep neighborhoods before schools, then label order.
    fn scores(&self, values: &[f64]) -> Vec<CentralityScore> {
        let mut scores: Vec<CentralityScore> = self
            .graph
            .node_indices()
            .map(|idx| {
                let node = &self.graph[idx];
                CentralityScore {
                    node_id: node.id.clone(),
                    node_kind: node.kind,
                    score: values.get(idx.index()).copied().unwrap_or(0.0).max(0.0),
                }
            })
            .collect();
        scores.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.node_kind.cmp(&b.node_kind))
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
        scores
    }

    fn report(&self, method: CentralityMethod, values: &[f64]) -> CentralityReport {
        CentralityReport {
            method,
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            scores: self.scores(values),
        }
    }
}

/// Eigenvector centrality over the assignment graph, degree centrality if it fails.
///
/// The fallback is reported through the outcome's warning and the report's
/// `method`, so scores from the two methods are never mistaken for each other.
#[must_use]
pub fn centrality(
    matrix: &AssignmentMatrix,
    max_iter: usize,
    tolerance: f64,
) -> Outcome<CentralityReport> {
    let graph = AssignmentGraph::from_matrix(matrix);
    if graph.edge_count() == 0 {
        return Outcome::degraded(
            graph.report(CentralityMethod::Degree, &[]),
            AnalyticsError::CentralityFallback("graph has no edges".to_string()),
        );
    }

    if let Some(values) = graph.eigenvector(max_iter, tolerance) {
        return Outcome::clean(graph.report(CentralityMethod::Eigenvector, &values));
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        max_iter,
        "eigenvector centrality did not converge"
    );
    Outcome::degraded(
        graph.report(CentralityMethod::Degree, &graph.degree()),
        AnalyticsError::CentralityFallback(format!(
            "power iteration did not converge within {max_iter} iterations"
        )),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn matrix(neighborhoods: &[&str], schools: &[&str], rows: Vec<Vec<u64>>) -> AssignmentMatrix {
        AssignmentMatrix::new(
            neighborhoods.iter().map(ToString::to_string).collect(),
            schools.iter().map(ToString::to_string).collect(),
            rows,
        )
        .unwrap()
    }

    #[test]
    fn graph_has_one_edge_per_nonzero_cell() {
        let m = matrix(&["a", "b", "c"], &["x", "y"], vec![vec![3, 0], vec![1, 2], vec![0, 0]]);
        let graph = AssignmentGraph::from_matrix(&m);
        assert_eq!(graph.edge_count(), 3);
        // "c" has no edge and is left out.
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn shared_labels_stay_distinct_nodes() {
        let m = matrix(&["same"], &["same"], vec![vec![5]]);
        let report = centrality(&m, 1000, 1e-6).value;
        assert_eq!(report.node_count, 2);
        assert!(report.score_of(NodeKind::Neighborhood, "same").is_some());
        assert!(report.score_of(NodeKind::School, "same").is_some());
    }

    #[test]
    fn hub_school_scores_highest() {
        let m = matrix(
            &["a", "b", "c"],
            &["hub", "x", "y"],
            vec![vec![10, 1, 0], vec![10, 0, 1], vec![10, 0, 0]],
        );
        let outcome = centrality(&m, 1000, 1e-6);
        assert!(outcome.warning.is_none());
        let report = outcome.value;
        assert_eq!(report.method, CentralityMethod::Eigenvector);
        assert_eq!(report.scores[0].node_id, "hub");
        assert_eq!(report.scores[0].node_kind, NodeKind::School);
        assert!(report.scores.iter().all(|s| s.score >= 0.0));
    }

    #[test]
    fn non_convergence_falls_back_to_degree() {
        let m = matrix(
            &["a", "b", "c"],
            &["x", "y"],
            vec![vec![9, 1], vec![1, 0], vec![4, 4]],
        );
        let outcome = centrality(&m, 1, 1e-12);
        let warning = outcome.warning.expect("fallback is reported");
        assert!(matches!(warning, AnalyticsError::CentralityFallback(_)));

        let report = outcome.value;
        assert_eq!(report.method, CentralityMethod::Degree);
        // 5 nodes, "x" touches all three neighborhoods.
        let x = report.score_of(NodeKind::School, "x").unwrap();
        assert!((x - 3.0 / 4.0).abs() < 1e-12);
        let b = report.score_of(NodeKind::Neighborhood, "b").unwrap();
        assert!((b - 1.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn empty_graph_is_tagged_degree_with_warning() {
        let m = matrix(&["a"], &["x"], vec![vec![0]]);
        let outcome = centrality(&m, 1000, 1e-6);
        assert!(outcome.warning.is_some());
        assert_eq!(outcome.value.method, CentralityMethod::Degree);
        assert!(outcome.value.scores.is_empty());
    }
}
