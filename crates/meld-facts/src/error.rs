use thiserror::Error;

/// A line that does not follow the fact grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed fact `{line}`: {message}")]
pub struct MalformedFactError {
    pub line: String,
    pub message: String,
}

impl MalformedFactError {
    pub(crate) fn new(line: &str, message: impl Into<String>) -> Self {
        Self {
            line: line.to_string(),
            message: message.into(),
        }
    }
}

/// Failure of a whole-dump parse. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line_no}: {source}")]
    MalformedFact {
        line_no: usize,
        #[source]
        source: MalformedFactError,
    },
    #[error("line {line_no}: fact `{line}` appears before any node marker")]
    NoActiveNode { line_no: usize, line: String },
}

impl ParseError {
    pub fn line_no(&self) -> usize {
        match self {
            ParseError::MalformedFact { line_no, .. } | ParseError::NoActiveNode { line_no, .. } => {
                *line_no
            }
        }
    }
}
