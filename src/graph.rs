//! Undirected graph store with interchangeable matrix and list representations.
//!
//! The separator search only needs two queries from the network: the degree of
//! every node (the heuristic visibility term) and neighbor traversal during
//! component analysis. Both are answered identically by either representation,
//! so the choice is purely a space/time trade-off left to the caller: the
//! matrix suits dense mid-sized networks, the list scales to sparse ones.

use std::fmt;

// ============================================================================
// Representation
// ============================================================================

/// Which adjacency structure backs a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Representation {
    /// Dense boolean adjacency matrix. O(n) neighbor scans, O(n^2) space.
    Matrix,
    /// Sorted adjacency lists. O(deg) neighbor scans, O(n + m) space.
    List,
}

/// Adjacency storage for an undirected, self-loop-free graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Adjacency {
    /// One boolean row per node; `rows[u][v]` holds iff `{u, v}` is an edge.
    Matrix(Vec<Vec<bool>>),
    /// One sorted, deduplicated neighbor sequence per node.
    List(Vec<Vec<usize>>),
}

// ============================================================================
// Graph
// ============================================================================

/// An undirected graph with cached node degrees.
///
/// Exactly one representation is held per instance; every operation produces
/// identical results regardless of which one it is.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    adjacency: Adjacency,
    degrees: Vec<usize>,
}

impl Graph {
    /// Builds a graph from a symmetric adjacency matrix.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if the matrix is not square, not symmetric, or
    /// carries a self-loop on its diagonal.
    pub fn from_matrix(rows: Vec<Vec<bool>>) -> Result<Self, GraphError> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(GraphError::NonSquare {
                    row: i,
                    expected: n,
                    got: row.len(),
                });
            }
        }
        for i in 0..n {
            if rows[i][i] {
                return Err(GraphError::SelfLoop { node: i });
            }
            for j in (i + 1)..n {
                if rows[i][j] != rows[j][i] {
                    return Err(GraphError::NotSymmetric { i, j });
                }
            }
        }
        let degrees = rows
            .iter()
            .map(|row| row.iter().filter(|&&e| e).count())
            .collect();
        Ok(Self {
            adjacency: Adjacency::Matrix(rows),
            degrees,
        })
    }

    /// Builds a graph with `n` nodes from an undirected edge list, stored in
    /// the requested representation.
    ///
    /// Self-loops are silently ignored; duplicate edges collapse to one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EndpointOutOfRange`] if an edge references a node
    /// `>= n`.
    pub fn from_edges(
        n: usize,
        edges: &[(usize, usize)],
        representation: Representation,
    ) -> Result<Self, GraphError> {
        for &(u, v) in edges {
            if u >= n || v >= n {
                return Err(GraphError::EndpointOutOfRange { u, v, n });
            }
        }
        match representation {
            Representation::Matrix => {
                let mut rows = vec![vec![false; n]; n];
                for &(u, v) in edges {
                    if u == v {
                        continue;
                    }
                    rows[u][v] = true;
                    rows[v][u] = true;
                }
                Self::from_matrix(rows)
            }
            Representation::List => {
                let mut lists = vec![Vec::new(); n];
                for &(u, v) in edges {
                    if u == v {
                        continue;
                    }
                    lists[u].push(v);
                    lists[v].push(u);
                }
                for list in &mut lists {
                    list.sort_unstable();
                    list.dedup();
                }
                let degrees = lists.iter().map(Vec::len).collect();
                Ok(Self {
                    adjacency: Adjacency::List(lists),
                    degrees,
                })
            }
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.degrees.len()
    }

    /// Degree of node `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    pub fn degree(&self, v: usize) -> usize {
        self.degrees[v]
    }

    /// All node degrees, indexed by node id.
    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    /// Which representation backs this graph.
    pub fn representation(&self) -> Representation {
        match self.adjacency {
            Adjacency::Matrix(_) => Representation::Matrix,
            Adjacency::List(_) => Representation::List,
        }
    }

    /// Whether `{u, v}` is an edge.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        match &self.adjacency {
            Adjacency::Matrix(rows) => rows[u][v],
            Adjacency::List(lists) => lists[u].binary_search(&v).is_ok(),
        }
    }

    /// Invokes `visit` for every neighbor of `v`.
    ///
    /// The matrix variant scans the full row; the list variant walks the
    /// stored neighbor sequence. Visit order may differ between the two, but
    /// the visited set is identical.
    pub fn for_neighbors(&self, v: usize, mut visit: impl FnMut(usize)) {
        match &self.adjacency {
            Adjacency::Matrix(rows) => {
                for (u, &edge) in rows[v].iter().enumerate() {
                    if edge {
                        visit(u);
                    }
                }
            }
            Adjacency::List(lists) => {
                for &u in &lists[v] {
                    visit(u);
                }
            }
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while building or validating a graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// Matrix is not square.
    NonSquare {
        /// The row index with wrong length.
        row: usize,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// Matrix disagrees with its transpose.
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
    },
    /// Diagonal entry set.
    SelfLoop {
        /// The offending node.
        node: usize,
    },
    /// An edge references a node outside `0..n`.
    EndpointOutOfRange {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
        /// Number of nodes.
        n: usize,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NonSquare { row, expected, got } => write!(
                f,
                "adjacency matrix is not square: row {row} has length {got}, expected {expected}"
            ),
            GraphError::NotSymmetric { i, j } => {
                write!(f, "adjacency matrix is not symmetric at ({i}, {j})")
            }
            GraphError::SelfLoop { node } => write!(f, "self-loop detected at node {node}"),
            GraphError::EndpointOutOfRange { u, v, n } => {
                write!(f, "edge ({u}, {v}) references a node outside 0..{n}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle4(representation: Representation) -> Graph {
        Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)], representation)
            .expect("valid 4-cycle")
    }

    #[test]
    fn from_edges_builds_both_representations() {
        for repr in [Representation::Matrix, Representation::List] {
            let g = cycle4(repr);
            assert_eq!(g.node_count(), 4);
            assert_eq!(g.representation(), repr);
            for v in 0..4 {
                assert_eq!(g.degree(v), 2);
            }
            assert!(g.has_edge(0, 1));
            assert!(g.has_edge(1, 0));
            assert!(!g.has_edge(0, 2));
        }
    }

    #[test]
    fn neighbor_sets_agree_across_representations() {
        let edges = [(0, 1), (0, 2), (1, 2), (2, 3), (4, 0)];
        let m = Graph::from_edges(5, &edges, Representation::Matrix).unwrap();
        let l = Graph::from_edges(5, &edges, Representation::List).unwrap();
        for v in 0..5 {
            let mut from_matrix = Vec::new();
            let mut from_list = Vec::new();
            m.for_neighbors(v, |u| from_matrix.push(u));
            l.for_neighbors(v, |u| from_list.push(u));
            from_matrix.sort_unstable();
            from_list.sort_unstable();
            assert_eq!(from_matrix, from_list, "neighbors of {v} differ");
        }
        assert_eq!(m.degrees(), l.degrees());
    }

    #[test]
    fn duplicate_edges_collapse() {
        let edges = [(0, 1), (1, 0), (0, 1)];
        let g = Graph::from_edges(2, &edges, Representation::List).unwrap();
        assert_eq!(g.degree(0), 1);
        assert_eq!(g.degree(1), 1);
    }

    #[test]
    fn self_loops_are_ignored_in_edge_lists() {
        let g = Graph::from_edges(3, &[(0, 0), (0, 1)], Representation::Matrix).unwrap();
        assert_eq!(g.degree(0), 1);
        assert!(!g.has_edge(0, 0));
    }

    #[test]
    fn from_matrix_rejects_non_square() {
        let rows = vec![vec![false, true], vec![true]];
        assert!(matches!(
            Graph::from_matrix(rows),
            Err(GraphError::NonSquare { row: 1, .. })
        ));
    }

    #[test]
    fn from_matrix_rejects_asymmetry() {
        let rows = vec![vec![false, true], vec![false, false]];
        assert!(matches!(
            Graph::from_matrix(rows),
            Err(GraphError::NotSymmetric { i: 0, j: 1 })
        ));
    }

    #[test]
    fn from_matrix_rejects_self_loop() {
        let rows = vec![vec![true]];
        assert!(matches!(
            Graph::from_matrix(rows),
            Err(GraphError::SelfLoop { node: 0 })
        ));
    }

    #[test]
    fn from_edges_rejects_out_of_range_endpoint() {
        let err = Graph::from_edges(3, &[(0, 3)], Representation::List).unwrap_err();
        assert_eq!(err, GraphError::EndpointOutOfRange { u: 0, v: 3, n: 3 });
    }

    #[test]
    fn empty_graph_is_valid() {
        let g = Graph::from_edges(0, &[], Representation::Matrix).unwrap();
        assert_eq!(g.node_count(), 0);
    }

    #[test]
    fn error_messages_name_the_location() {
        let err = GraphError::NotSymmetric { i: 2, j: 5 };
        assert!(err.to_string().contains("(2, 5)"));
    }
}
