//! Writers for benchmark graph inputs.
//!
//! Generated programs describe a graph as persistent `!edge` facts between
//! `@`-addressed nodes. The id counter and optional edge weight live on the
//! writer, so independent generators never share state.

use std::io::{self, Write};

use crate::value::NodeId;

pub struct GraphWriter<W: Write> {
    out: W,
    next_id: NodeId,
    weight: Option<i64>,
}

impl<W: Write> GraphWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_id: 0,
            weight: None,
        }
    }

    /// Weight appended as a third argument to every [`GraphWriter::edge`].
    pub fn with_weight(mut self, weight: Option<i64>) -> Self {
        self.weight = weight;
        self
    }

    pub fn set_weight(&mut self, weight: Option<i64>) {
        self.weight = weight;
    }

    /// Hand out the next node id.
    pub fn fresh_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn edge(&mut self, from: NodeId, to: NodeId) -> io::Result<()> {
        match self.weight {
            Some(w) => writeln!(self.out, "!edge(@{from},@{to},{w})."),
            None => writeln!(self.out, "!edge(@{from},@{to})."),
        }
    }

    pub fn bidirectional_edge(&mut self, a: NodeId, b: NodeId) -> io::Result<()> {
        self.edge(a, b)?;
        self.edge(b, a)
    }

    /// Edge with an explicit float weight, written with six decimals.
    pub fn weighted_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> io::Result<()> {
        writeln!(self.out, "!edge(@{from},@{to},{weight:.6}).")
    }

    pub fn coord(&mut self, node: NodeId, row: i64, col: i64) -> io::Result<()> {
        writeln!(self.out, "!coord(@{node}, {row}, {col}).")
    }

    /// `0 -> 1 -> ... -> n-1`.
    pub fn chain(&mut self, nodes: usize) -> io::Result<()> {
        let mut previous = self.fresh_id();
        for _ in 1..nodes {
            let next = self.fresh_id();
            self.edge(previous, next)?;
            previous = next;
        }
        Ok(())
    }

    /// A `width` x `height` grid in row-major id order. Every cell gets a
    /// coord fact and edges in both directions to its south and east
    /// neighbors.
    pub fn grid(&mut self, width: usize, height: usize) -> io::Result<()> {
        let base = self.next_id;
        let id = |row: usize, col: usize| base + (row * width + col) as NodeId;
        for row in 0..height {
            for col in 0..width {
                let here = self.fresh_id();
                self.coord(here, row as i64, col as i64)?;
                if row + 1 < height {
                    self.bidirectional_edge(id(row + 1, col), here)?;
                }
                if col + 1 < width {
                    self.bidirectional_edge(id(row, col + 1), here)?;
                }
            }
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
