//! Edge-list instance file loader.
//!
//! The accepted format follows the conventions of common network repository
//! dumps:
//!
//! - Lines starting with `%` are comments, except that a `%` line containing
//!   digits is the header carrying `nodes edges duplicates` (the trailing
//!   duplicate count is informational and ignored here).
//! - Every other non-empty line is a 1-based `u v` edge pair.
//! - Reading stops once the declared edge count has been consumed.
//! - Edge pairs referencing nodes outside `1..=nodes` are reported on stderr
//!   and skipped; self-loops are dropped silently.

use crate::graph::{Graph, GraphError, Representation};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// ============================================================================
// Loader
// ============================================================================

/// Loads a network instance from `path` into the requested representation.
///
/// # Errors
///
/// Returns [`InstanceError`] on I/O failure, a missing or malformed header,
/// or an edge line that does not parse as two integers.
pub fn load_instance(
    path: impl AsRef<Path>,
    representation: Representation,
) -> Result<Graph, InstanceError> {
    let file = File::open(&path).map_err(|e| InstanceError::Io(e.to_string()))?;
    let reader = BufReader::new(file);

    let mut header: Option<(usize, usize)> = None;
    let mut edges: Vec<(usize, usize)> = Vec::new();
    let mut skipped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| InstanceError::Io(e.to_string()))?;
        let text = line.trim();
        let line_number = index + 1;
        if text.is_empty() {
            continue;
        }
        if let Some(rest) = text.strip_prefix('%') {
            if rest.chars().any(|c| c.is_ascii_digit()) {
                header = Some(parse_header(rest, line_number)?);
            }
            continue;
        }

        let (nodes, declared_edges) = header.ok_or(InstanceError::MissingHeader)?;
        let (u, v) = parse_edge(text, line_number)?;
        if u == 0 || v == 0 || u > nodes || v > nodes {
            eprintln!(
                "warning: {}:{line_number}: edge ({u}, {v}) outside 1..={nodes}, skipped",
                path.as_ref().display()
            );
            skipped += 1;
        } else {
            edges.push((u - 1, v - 1));
        }
        if edges.len() + skipped == declared_edges {
            break;
        }
    }

    let (nodes, _) = header.ok_or(InstanceError::MissingHeader)?;
    Graph::from_edges(nodes, &edges, representation).map_err(InstanceError::Graph)
}

fn parse_header(rest: &str, line: usize) -> Result<(usize, usize), InstanceError> {
    let mut fields = rest.split_whitespace();
    let nodes = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or(InstanceError::MalformedHeader { line })?;
    let edges = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or(InstanceError::MalformedHeader { line })?;
    Ok((nodes, edges))
}

fn parse_edge(text: &str, line: usize) -> Result<(usize, usize), InstanceError> {
    let mut fields = text.split_whitespace();
    let u = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or(InstanceError::MalformedEdge { line })?;
    let v = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or(InstanceError::MalformedEdge { line })?;
    Ok((u, v))
}

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while loading an instance file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstanceError {
    /// Underlying I/O failure.
    Io(String),
    /// No `%`-header with node and edge counts before the first edge line.
    MissingHeader,
    /// A `%`-header that did not carry two parseable counts.
    MalformedHeader {
        /// 1-based line number.
        line: usize,
    },
    /// An edge line that did not carry two parseable endpoints.
    MalformedEdge {
        /// 1-based line number.
        line: usize,
    },
    /// The collected edges failed graph validation.
    Graph(GraphError),
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::Io(msg) => write!(f, "I/O error: {msg}"),
            InstanceError::MissingHeader => {
                write!(f, "no header line with node and edge counts found")
            }
            InstanceError::MalformedHeader { line } => {
                write!(f, "line {line}: malformed header, expected '% nodes edges'")
            }
            InstanceError::MalformedEdge { line } => {
                write!(f, "line {line}: malformed edge, expected two integers")
            }
            InstanceError::Graph(e) => write!(f, "invalid network: {e}"),
        }
    }
}

impl std::error::Error for InstanceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstanceError::Graph(e) => Some(e),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).expect("create temp instance");
        f.write_all(contents.as_bytes()).expect("write temp instance");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn loads_a_simple_instance() {
        let path = write_temp(
            "antsep_instance_simple.txt",
            "% network of four nodes\n% 4 4 0\n1 2\n2 3\n3 4\n4 1\n",
        );
        for repr in [Representation::Matrix, Representation::List] {
            let g = load_instance(&path, repr).unwrap();
            assert_eq!(g.node_count(), 4);
            assert!(g.has_edge(0, 1));
            assert!(g.has_edge(3, 0));
            assert_eq!(g.degree(2), 2);
        }
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn comment_lines_without_digits_are_skipped() {
        let path = write_temp(
            "antsep_instance_comments.txt",
            "% weighted? no\n% 3 2 0\n1 2\n2 3\n",
        );
        let g = load_instance(&path, Representation::List).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.degree(1), 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn out_of_range_edges_are_skipped() {
        let path = write_temp(
            "antsep_instance_range.txt",
            "% 3 3 0\n1 2\n9 1\n2 3\n",
        );
        let g = load_instance(&path, Representation::List).unwrap();
        assert_eq!(g.node_count(), 3);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 2));
        assert_eq!(g.degree(0), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn reading_stops_at_declared_edge_count() {
        // The declared count is 1; the second pair must be left unread.
        let path = write_temp("antsep_instance_stop.txt", "% 3 1 0\n1 2\n2 3\n");
        let g = load_instance(&path, Representation::Matrix).unwrap();
        assert!(g.has_edge(0, 1));
        assert!(!g.has_edge(1, 2));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn self_loops_are_dropped() {
        let path = write_temp("antsep_instance_loop.txt", "% 2 2 0\n1 1\n1 2\n");
        let g = load_instance(&path, Representation::List).unwrap();
        assert!(!g.has_edge(0, 0));
        assert!(g.has_edge(0, 1));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_header_is_an_error() {
        let path = write_temp("antsep_instance_nohdr.txt", "1 2\n2 3\n");
        assert_eq!(
            load_instance(&path, Representation::List),
            Err(InstanceError::MissingHeader)
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_edge_is_an_error() {
        let path = write_temp("antsep_instance_badedge.txt", "% 3 2 0\n1 two\n");
        assert_eq!(
            load_instance(&path, Representation::List),
            Err(InstanceError::MalformedEdge { line: 2 })
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_instance(
            "antsep_definitely_missing_instance.txt",
            Representation::List,
        )
        .unwrap_err();
        assert!(matches!(err, InstanceError::Io(_)));
    }
}
