use std::fmt;

use super::{Matrix, Value};
use crate::pipeline::Pipeline;

/// Declared value group of a workspace variable, generic slot or keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Index,
    Numeric,
    String,
    Vector,
    ArrayOfIndex,
    ArrayOfString,
    Matrix,
    Pipeline,

    /// Wildcard accepted only in method slot declarations
    Any,
}

impl Group {
    pub const ALL: [Group; 9] = [
        Group::Index,
        Group::Numeric,
        Group::String,
        Group::Vector,
        Group::ArrayOfIndex,
        Group::ArrayOfString,
        Group::Matrix,
        Group::Pipeline,
        Group::Any,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Group::Index => "Index",
            Group::Numeric => "Numeric",
            Group::String => "String",
            Group::Vector => "Vector",
            Group::ArrayOfIndex => "ArrayOfIndex",
            Group::ArrayOfString => "ArrayOfString",
            Group::Matrix => "Matrix",
            Group::Pipeline => "Pipeline",
            Group::Any => "Any",
        }
    }

    pub fn parse(s: &str) -> Option<Group> {
        let s = s.trim();
        Group::ALL.iter().copied().find(|g| g.name() == s)
    }

    /// Whether a value of group `other` may occupy a slot declared as `self`.
    pub fn accepts(self, other: Group) -> bool {
        self == Group::Any || self == other
    }

    /// Default-constructed value for a fresh workspace slot.
    ///
    /// `Any` is not a concrete group and has no default.
    pub fn default_value(self) -> Option<Value> {
        let v = match self {
            Group::Index => Value::Index(0),
            Group::Numeric => Value::Numeric(0.0),
            Group::String => Value::String(String::new()),
            Group::Vector => Value::Vector(Vec::new()),
            Group::ArrayOfIndex => Value::ArrayOfIndex(Vec::new()),
            Group::ArrayOfString => Value::ArrayOfString(Vec::new()),
            Group::Matrix => Value::Matrix(Matrix::default()),
            Group::Pipeline => Value::Pipeline(Pipeline::default()),
            Group::Any => return None,
        };
        Some(v)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
