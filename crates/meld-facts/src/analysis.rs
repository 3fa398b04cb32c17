//! Checks and aggregates over a parsed database, as used by the benchmark
//! post-processing tools.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::database::Database;
use crate::value::{Fact, NodeId, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("node {node}: `{predicate}` has no argument {position}")]
    MissingArgument {
        node: NodeId,
        predicate: String,
        position: usize,
    },
    #[error("node {node}: `{predicate}` argument {position} must be {expected}, found {found}")]
    BadArgument {
        node: NodeId,
        predicate: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("argument positions start at 1")]
    InvalidPosition,
    #[error("total of `{predicate}` overflows a 64-bit integer")]
    Overflow { predicate: String },
    #[error("no color was set for node {node}")]
    MissingColor { node: NodeId },
    #[error("color already set for node {node}")]
    DuplicateColor { node: NodeId },
    #[error("invalid color 0 on node {node}")]
    InvalidColor { node: NodeId },
    #[error("node {node} has same color as {neighbor} ({color})")]
    SameColor {
        node: NodeId,
        neighbor: NodeId,
        color: i64,
    },
}

/// Argument `index` (0-based) of `fact`, reported 1-based on error.
fn argument<'a>(node: NodeId, fact: &'a Fact, index: usize) -> Result<&'a Value, AnalysisError> {
    fact.arg(index).ok_or_else(|| AnalysisError::MissingArgument {
        node,
        predicate: fact.name.clone(),
        position: index + 1,
    })
}

fn bad_argument(node: NodeId, fact: &Fact, index: usize, expected: &'static str) -> AnalysisError {
    AnalysisError::BadArgument {
        node,
        predicate: fact.name.clone(),
        position: index + 1,
        expected,
        found: fact.args[index].kind(),
    }
}

// ============================================================================
// Graph coloring
// ============================================================================

/// Predicate names read by [`check_coloring`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColoringPredicates {
    /// First argument is the neighbor (`@id`).
    pub edge: String,
    /// First argument is the color (non-zero integer).
    pub color: String,
}

impl Default for ColoringPredicates {
    fn default() -> Self {
        Self {
            edge: "edge".to_string(),
            color: "color".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColoringReport {
    pub nodes: usize,
    /// Distinct undirected edges, self-loops excluded.
    pub edges: usize,
    pub colors: BTreeSet<i64>,
}

/// Verify that every node carries exactly one non-zero color and that no two
/// neighbors share a color. Edges are treated as undirected; self-loops are
/// ignored.
///
/// Nodes are visited in database order and the first violation is returned.
pub fn check_coloring(
    db: &Database,
    predicates: &ColoringPredicates,
) -> Result<ColoringReport, AnalysisError> {
    let mut neighbors: BTreeMap<NodeId, BTreeSet<NodeId>> = BTreeMap::new();
    for (node, fact) in db.facts_named(&predicates.edge) {
        let other = argument(node, fact, 0)?
            .as_node_ref()
            .ok_or_else(|| bad_argument(node, fact, 0, "a node reference"))?;
        if other == node {
            continue;
        }
        neighbors.entry(node).or_default().insert(other);
        neighbors.entry(other).or_default().insert(node);
    }
    let edges = neighbors.values().map(BTreeSet::len).sum::<usize>() / 2;

    let mut colors: BTreeMap<NodeId, i64> = BTreeMap::new();
    for (node, facts) in db {
        let mut colored = false;
        for fact in facts.iter().filter(|f| f.name == predicates.color) {
            let color = argument(node, fact, 0)?
                .as_int()
                .ok_or_else(|| bad_argument(node, fact, 0, "an integer"))?;
            if color == 0 {
                return Err(AnalysisError::InvalidColor { node });
            }
            if colored {
                return Err(AnalysisError::DuplicateColor { node });
            }
            colored = true;
            colors.insert(node, color);

            let conflict = neighbors
                .get(&node)
                .into_iter()
                .flatten()
                .find(|other| colors.get(*other) == Some(&color));
            if let Some(&neighbor) = conflict {
                return Err(AnalysisError::SameColor {
                    node,
                    neighbor,
                    color,
                });
            }
        }
        if !colored {
            return Err(AnalysisError::MissingColor { node });
        }
    }

    Ok(ColoringReport {
        nodes: db.len(),
        edges,
        colors: colors.into_values().collect(),
    })
}

// ============================================================================
// Predicate totals
// ============================================================================

/// Sum of numeric arguments. Stays integral until a float is added.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Total {
    Int(i64),
    Float(f64),
}

impl Total {
    pub fn as_f64(self) -> f64 {
        match self {
            Total::Int(v) => v as f64,
            Total::Float(v) => v,
        }
    }
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Total::Int(v) => write!(f, "{v}"),
            Total::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredicateTotal {
    /// Number of facts summed.
    pub facts: usize,
    pub total: Total,
}

/// Sum argument `position` (1-based) of every `predicate` fact in the
/// database.
pub fn sum_argument(
    db: &Database,
    predicate: &str,
    position: usize,
) -> Result<PredicateTotal, AnalysisError> {
    let index = position.checked_sub(1).ok_or(AnalysisError::InvalidPosition)?;
    let mut total = Total::Int(0);
    let mut facts = 0usize;

    for (node, fact) in db.facts_named(predicate) {
        total = match (total, argument(node, fact, index)?) {
            (Total::Int(acc), Value::Int(v)) => {
                Total::Int(acc.checked_add(*v).ok_or_else(|| AnalysisError::Overflow {
                    predicate: predicate.to_string(),
                })?)
            }
            (acc, value) => {
                let v = value
                    .as_float()
                    .ok_or_else(|| bad_argument(node, fact, index, "a number"))?;
                Total::Float(acc.as_f64() + v)
            }
        };
        facts += 1;
    }

    Ok(PredicateTotal { facts, total })
}
