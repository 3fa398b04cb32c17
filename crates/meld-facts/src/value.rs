//! Typed fact arguments and their canonical textual form.
//!
//! Every value renders (`Display`) to text that [`crate::grammar::parse_fact`]
//! reads back as an equal value:
//!
//! | value            | text            |
//! |------------------|-----------------|
//! | `NodeRef(3)`     | `@3`            |
//! | `Int(-2)`        | `-2`            |
//! | `Float(0.5)`     | `0.5`           |
//! | `Float(1.0)`     | `1.0`           |
//! | `List([@1, 2])`  | `[@1, 2]`       |
//! | `Text("abc")`    | `abc`           |
//!
//! Floats use the `{:?}` rendering so they always carry a `.` or an exponent
//! and never collapse into an integer on re-parse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node, as written on marker lines and after `@`.
pub type NodeId = i64;

/// A list item. Lists hold exactly one nesting level of primitives, so there
/// is no list or text variant here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Scalar {
    NodeRef(NodeId),
    Int(i64),
    Float(f64),
}

/// One argument of a fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    NodeRef(NodeId),
    Int(i64),
    Float(f64),
    List(Vec<Scalar>),
    /// Fallback for tokens that are neither numeric nor addresses.
    Text(String),
}

impl Value {
    pub fn as_node_ref(&self) -> Option<NodeId> {
        match self {
            Value::NodeRef(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short kind label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::NodeRef(_) => "node reference",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::List(_) => "list",
            Value::Text(_) => "text",
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::NodeRef(id) => Value::NodeRef(id),
            Scalar::Int(v) => Value::Int(v),
            Scalar::Float(v) => Value::Float(v),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::NodeRef(id) => write!(f, "@{id}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::NodeRef(id) => write!(f, "@{id}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One decoded predicate occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub name: String,
    pub args: Vec<Value>,
}

impl Fact {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Argument at a 0-based position.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// The fact as a dump line, including the terminating `.`.
    pub fn to_line(&self) -> String {
        format!("{self}.")
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}
