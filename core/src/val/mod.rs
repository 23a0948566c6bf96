use std::fmt;

use anyhow::{Result, anyhow};

use crate::pipeline::Pipeline;

mod types;

pub use types::Group;

/// Dense row-major matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build from a flat row-major buffer; `data.len()` must equal `rows * cols`.
    pub fn from_flat(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(anyhow!(
                "matrix of {}x{} needs {} elements, got {}",
                rows,
                cols,
                rows * cols,
                data.len()
            ));
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(anyhow!("row {} has {} columns, expected {}", i, row.len(), cols));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, r: usize, c: usize) -> Option<f64> {
        if r < self.rows && c < self.cols {
            self.data.get(r * self.cols + c).copied()
        } else {
            None
        }
    }

    pub fn set(&mut self, r: usize, c: usize, v: f64) -> Result<()> {
        if r >= self.rows || c >= self.cols {
            return Err(anyhow!(
                "index ({}, {}) out of bounds for {}x{} matrix",
                r,
                c,
                self.rows,
                self.cols
            ));
        }
        self.data[r * self.cols + c] = v;
        Ok(())
    }

    pub fn row(&self, r: usize) -> Option<&[f64]> {
        if r < self.rows {
            Some(&self.data[r * self.cols..(r + 1) * self.cols])
        } else {
            None
        }
    }
}

/// Runtime value of a workspace slot or keyword parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Index(i64),
    Numeric(f64),
    String(String),
    Vector(Vec<f64>),
    ArrayOfIndex(Vec<i64>),
    ArrayOfString(Vec<String>),
    Matrix(Matrix),
    Pipeline(Pipeline),
}

impl Value {
    pub fn group(&self) -> Group {
        match self {
            Value::Index(_) => Group::Index,
            Value::Numeric(_) => Group::Numeric,
            Value::String(_) => Group::String,
            Value::Vector(_) => Group::Vector,
            Value::ArrayOfIndex(_) => Group::ArrayOfIndex,
            Value::ArrayOfString(_) => Group::ArrayOfString,
            Value::Matrix(_) => Group::Matrix,
            Value::Pipeline(_) => Group::Pipeline,
        }
    }

    fn mismatch(&self, expected: Group) -> anyhow::Error {
        anyhow!("expected {} value, found {}", expected, self.group())
    }

    pub fn as_index(&self) -> Result<i64> {
        match self {
            Value::Index(i) => Ok(*i),
            other => Err(other.mismatch(Group::Index)),
        }
    }

    /// Numeric view; Index values widen.
    pub fn as_numeric(&self) -> Result<f64> {
        match self {
            Value::Numeric(x) => Ok(*x),
            Value::Index(i) => Ok(*i as f64),
            other => Err(other.mismatch(Group::Numeric)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(Group::String)),
        }
    }

    pub fn as_vector(&self) -> Result<&[f64]> {
        match self {
            Value::Vector(v) => Ok(v),
            other => Err(other.mismatch(Group::Vector)),
        }
    }

    pub fn as_index_array(&self) -> Result<&[i64]> {
        match self {
            Value::ArrayOfIndex(v) => Ok(v),
            other => Err(other.mismatch(Group::ArrayOfIndex)),
        }
    }

    pub fn as_string_array(&self) -> Result<&[String]> {
        match self {
            Value::ArrayOfString(v) => Ok(v),
            other => Err(other.mismatch(Group::ArrayOfString)),
        }
    }

    pub fn as_matrix(&self) -> Result<&Matrix> {
        match self {
            Value::Matrix(m) => Ok(m),
            other => Err(other.mismatch(Group::Matrix)),
        }
    }

    pub fn as_pipeline(&self) -> Result<&Pipeline> {
        match self {
            Value::Pipeline(p) => Ok(p),
            other => Err(other.mismatch(Group::Pipeline)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Index(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::ArrayOfIndex(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::ArrayOfString(v)
    }
}

impl From<Matrix> for Value {
    fn from(v: Matrix) -> Self {
        Value::Matrix(v)
    }
}

impl From<Pipeline> for Value {
    fn from(v: Pipeline) -> Self {
        Value::Pipeline(v)
    }
}

fn write_list<T, F>(f: &mut fmt::Formatter<'_>, items: &[T], mut each: F) -> fmt::Result
where
    F: FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
{
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        each(f, item)?;
    }
    f.write_str("]")
}

// Floats always keep a decimal point so the literal re-binds as Numeric.
fn write_numeric(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x.is_finite() && x.fract() == 0.0 {
        if x.abs() < 1e15 {
            write!(f, "{:.1}", x)
        } else {
            write!(f, "{:e}", x)
        }
    } else {
        write!(f, "{}", x)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Index(i) => write!(f, "{}", i),
            Value::Numeric(x) => write_numeric(f, *x),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Vector(v) => write_list(f, v, |f, x| write_numeric(f, *x)),
            Value::ArrayOfIndex(v) => write_list(f, v, |f, i| write!(f, "{}", i)),
            Value::ArrayOfString(v) => write_list(f, v, |f, s| write!(f, "\"{}\"", s)),
            Value::Matrix(m) => {
                f.write_str("[")?;
                for r in 0..m.rows() {
                    if r > 0 {
                        f.write_str(", ")?;
                    }
                    write_list(f, m.row(r).unwrap_or(&[]), |f, x| write_numeric(f, *x))?;
                }
                f.write_str("]")
            }
            Value::Pipeline(p) => write!(f, "<pipeline {}: {} tasks>", p.name(), p.len()),
        }
    }
}
