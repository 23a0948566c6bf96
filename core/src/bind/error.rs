use std::fmt;

use crate::token::{ParseError, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindErrorKind {
    /// Malformed token stream or a construct the grammar does not allow
    Syntax,
    UnknownMethod,
    UnknownVariable,
    /// A variable or literal does not match the declared group of its slot
    WrongGroup,
    UnexpectedKeyword,
    /// Wrong number of generic variables, or a missing keyword
    WrongArity,
    UnexpectedEnd,
    Io,
}

impl fmt::Display for BindErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BindErrorKind::Syntax => "syntax error",
            BindErrorKind::UnknownMethod => "unknown method",
            BindErrorKind::UnknownVariable => "unknown variable",
            BindErrorKind::WrongGroup => "wrong group",
            BindErrorKind::UnexpectedKeyword => "unexpected keyword",
            BindErrorKind::WrongArity => "wrong arity",
            BindErrorKind::UnexpectedEnd => "unexpected end of input",
            BindErrorKind::Io => "io error",
        };
        f.write_str(s)
    }
}

/// First error found while turning control-file text into a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BindError {
    pub kind: BindErrorKind,
    pub message: String,
    pub position: Option<Position>,
    pub file: Option<String>,
}

impl BindError {
    pub fn new(kind: BindErrorKind, message: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
            file: None,
        }
    }

    pub fn in_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }
}

impl From<ParseError> for BindError {
    fn from(e: ParseError) -> Self {
        BindError::new(BindErrorKind::Syntax, e.message, Some(e.position))
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.position) {
            (Some(file), Some(at)) => write!(f, "{}:{}: {}", file, at, self.message),
            (Some(file), None) => write!(f, "{}: {}", file, self.message),
            (None, Some(at)) => write!(f, "{} at {}", self.message, at),
            (None, None) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for BindError {}
