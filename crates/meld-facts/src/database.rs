//! Node-keyed fact database built from a runtime dump.
//!
//! A dump is a sequence of blocks, each opened by a line holding only the node
//! id, followed by that node's facts:
//!
//! ```text
//! 3
//! edge(@1, @2).
//! color(2).
//! 4
//! edge(@3, @1).
//! ```
//!
//! The builder is a two-state machine (`AwaitingNode` → `InNodeBlock`). A fact
//! seen before the first marker has no node to attach to and aborts the parse.
//! A marker for an id that was already seen starts a fresh block that replaces
//! the earlier one, keeping its original position in iteration order.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::Index;

use crate::error::{MalformedFactError, ParseError};
use crate::grammar::parse_fact;
use crate::value::{Fact, NodeId};

/// Predicate names retained by a filtered parse.
pub type NameFilter = BTreeSet<String>;

/// The facts of one node, in dump order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeBlock {
    pub node: NodeId,
    pub facts: Vec<Fact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Database {
    blocks: Vec<NodeBlock>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Facts of `node`, or `None` if no marker for it was seen.
    pub fn get(&self, node: NodeId) -> Option<&[Fact]> {
        self.index
            .get(&node)
            .map(|&i| self.blocks[i].facts.as_slice())
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total number of facts across all nodes.
    pub fn fact_count(&self) -> usize {
        self.blocks.iter().map(|b| b.facts.len()).sum()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.blocks.iter().map(|b| b.node)
    }

    /// `(node, facts)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.blocks.iter(),
        }
    }

    pub fn blocks(&self) -> &[NodeBlock] {
        &self.blocks
    }

    /// Every fact called `name`, with the node it belongs to.
    pub fn facts_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = (NodeId, &'a Fact)> + 'a {
        self.blocks.iter().flat_map(move |block| {
            block
                .facts
                .iter()
                .filter(move |fact| fact.name == name)
                .map(move |fact| (block.node, fact))
        })
    }

    /// Store `facts` under `node`. Returns `true` if an earlier block for the
    /// same node was replaced.
    fn commit(&mut self, node: NodeId, facts: Vec<Fact>) -> bool {
        match self.index.get(&node) {
            Some(&i) => {
                self.blocks[i].facts = facts;
                true
            }
            None => {
                self.index.insert(node, self.blocks.len());
                self.blocks.push(NodeBlock { node, facts });
                false
            }
        }
    }
}

impl Index<NodeId> for Database {
    type Output = [Fact];

    /// Panics if `node` is absent; use [`Database::get`] to probe.
    fn index(&self, node: NodeId) -> &[Fact] {
        match self.get(node) {
            Some(facts) => facts,
            None => panic!("node {node} is not in the database"),
        }
    }
}

pub struct Iter<'a> {
    inner: std::slice::Iter<'a, NodeBlock>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeId, &'a [Fact]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|block| (block.node, block.facts.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Database {
    type Item = (NodeId, &'a [Fact]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Renders the database back into dump form; parsing the output yields an
/// equal database.
impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            writeln!(f, "{}", block.node)?;
            for fact in &block.facts {
                writeln!(f, "{fact}.")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

enum BuilderState {
    AwaitingNode,
    InNodeBlock {
        node: NodeId,
        marker_line: usize,
        facts: Vec<Fact>,
    },
}

/// Build a database from dump lines. Line terminators may or may not have
/// been stripped already.
///
/// With a `filter`, facts whose name is not in it are still decoded (a
/// malformed line fails the parse either way) but left out of the result.
pub fn parse<I>(lines: I, filter: Option<&NameFilter>) -> Result<Database, ParseError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut db = Database::new();
    let mut state = BuilderState::AwaitingNode;
    let mut filtered_out = 0usize;

    for (i, raw) in lines.into_iter().enumerate() {
        let line_no = i + 1;
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        if let Some(marker) = node_marker(line) {
            let node = marker.map_err(|source| ParseError::MalformedFact { line_no, source })?;
            if let BuilderState::InNodeBlock {
                node: prev,
                marker_line,
                facts,
            } = std::mem::replace(&mut state, BuilderState::AwaitingNode)
            {
                flush_block(&mut db, prev, marker_line, facts);
            }
            state = BuilderState::InNodeBlock {
                node,
                marker_line: line_no,
                facts: Vec::new(),
            };
            continue;
        }

        let fact =
            parse_fact(line).map_err(|source| ParseError::MalformedFact { line_no, source })?;
        let BuilderState::InNodeBlock { node, facts, .. } = &mut state else {
            return Err(ParseError::NoActiveNode {
                line_no,
                line: line.to_string(),
            });
        };
        if filter.is_some_and(|names| !names.contains(&fact.name)) {
            tracing::trace!(node = *node, name = %fact.name, "fact filtered out");
            filtered_out += 1;
            continue;
        }
        facts.push(fact);
    }

    if let BuilderState::InNodeBlock {
        node,
        marker_line,
        facts,
    } = state
    {
        flush_block(&mut db, node, marker_line, facts);
    }

    tracing::debug!(
        nodes = db.len(),
        facts = db.fact_count(),
        filtered_out,
        "parsed fact database"
    );
    Ok(db)
}

/// [`parse`] over the lines of one text.
pub fn parse_text(text: &str, filter: Option<&NameFilter>) -> Result<Database, ParseError> {
    parse(text.lines(), filter)
}

fn flush_block(db: &mut Database, node: NodeId, marker_line: usize, facts: Vec<Fact>) {
    if db.commit(node, facts) {
        tracing::warn!(
            node,
            line_no = marker_line,
            "node marker repeated; earlier block replaced"
        );
    }
}

/// `Some` if the trimmed line is a node marker (only ASCII digits). A signed
/// integer line is neither a marker nor a fact and comes back as an error.
fn node_marker(line: &str) -> Option<Result<NodeId, MalformedFactError>> {
    let digits = line.strip_prefix(['+', '-']).unwrap_or(line);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() != line.len() {
        return Some(Err(MalformedFactError::new(
            line,
            "node marker must be an unsigned integer",
        )));
    }
    Some(
        line.parse()
            .map_err(|_| MalformedFactError::new(line, "node id out of range")),
    )
}
