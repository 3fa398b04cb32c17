//! Meld fact databases
//!
//! The Meld runtime can dump its final database as text: one block per node,
//! opened by the node id on a line of its own, followed by the node's facts.
//! This crate parses such dumps into a [`Database`] keyed by node id and
//! provides the small tools the benchmark scripts build on top of it.
//!
//! - [`grammar`]: decoding of a single fact line into a typed [`Fact`]
//! - [`database`]: the node-keyed database and its builder
//! - [`digest`]: stable digests of parsed databases
//! - [`analysis`]: coloring checks and predicate totals
//! - [`generate`]: writers for generated graph inputs
//!
//! ```
//! use meld_facts::{parse_text, Fact, Value};
//!
//! let db = parse_text("3\nedge(@1,@2).\n", None).unwrap();
//! assert_eq!(db[3], [Fact::new("edge", vec![Value::NodeRef(1), Value::NodeRef(2)])]);
//! ```

pub mod analysis;
pub mod database;
pub mod digest;
pub mod error;
pub mod generate;
pub mod grammar;
pub mod value;

pub use database::{parse, parse_text, Database, NameFilter, NodeBlock};
pub use error::{MalformedFactError, ParseError};
pub use grammar::parse_fact;
pub use value::{Fact, NodeId, Scalar, Value};
