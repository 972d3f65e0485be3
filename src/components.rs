//! Connected-component analysis of a network with separator nodes removed.

use crate::graph::Graph;

// ============================================================================
// Partition sizes
// ============================================================================

/// Cardinalities of the three principal parts of a separated network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionSizes {
    /// Number of separator nodes (removed from the network).
    pub separator: usize,
    /// Size of the largest surviving component.
    pub largest: usize,
    /// Size of the second-largest surviving component.
    pub second: usize,
}

/// Measures the partition induced by `separator` over `graph`.
///
/// Runs an iterative depth-first search from every unvisited non-separator
/// node. Separator nodes are never entered, so edges incident to them do not
/// connect the survivors. The two largest component sizes are tracked with
/// strict comparisons: on ties, the earlier-discovered component keeps its
/// rank. The result is independent of the graph representation.
///
/// # Panics
///
/// Panics if `separator.len()` differs from the node count.
pub fn partition_sizes(graph: &Graph, separator: &[bool]) -> PartitionSizes {
    let n = graph.node_count();
    assert_eq!(separator.len(), n, "separator flags must cover every node");

    let separator_count = separator.iter().filter(|&&s| s).count();
    let mut visited = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut largest = 0usize;
    let mut second = 0usize;

    for start in 0..n {
        if separator[start] || visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push(start);
        let mut size = 0usize;
        while let Some(v) = stack.pop() {
            size += 1;
            graph.for_neighbors(v, |u| {
                if !separator[u] && !visited[u] {
                    visited[u] = true;
                    stack.push(u);
                }
            });
        }
        if size > largest {
            second = largest;
            largest = size;
        } else if size > second {
            second = size;
        }
    }

    PartitionSizes {
        separator: separator_count,
        largest,
        second,
    }
}

// ============================================================================
// Tests
// ============================================================================
