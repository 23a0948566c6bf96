//! Control-file binder.
//!
//! Resolves method and variable names against a [`Registry`] and checks every
//! generic variable and keyword literal against its declared group, producing
//! a pipeline the executor can run without further validation.
//!
//! ```text
//! program  := task*
//! task     := NAME [ '(' var (',' var)* ')' ] '{' keyword* task* '}'
//! keyword  := [ NAME '=' ] literal
//! literal  := STRING | INT | FLOAT | '[' [ literal (',' literal)* ] ']'
//! ```

use std::path::Path;

use tracing::debug;

use crate::pipeline::Pipeline;
use crate::registry::Registry;
use crate::token::Tokenizer;

mod error;
mod parser;

pub use error::{BindError, BindErrorKind};

#[cfg(test)]
mod bind_test;

pub struct Binder<'r> {
    registry: &'r Registry,
}

impl<'r> Binder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Bind `source` into a pipeline called `name`.
    pub fn bind_str(&self, name: &str, source: &str) -> Result<Pipeline, BindError> {
        let (tokens, positions) = Tokenizer::tokenize_with_positions(source)?;
        let pipeline = parser::Parser::new(self.registry, tokens, positions).parse_program(name)?;
        debug!(target: "pipex::bind", pipeline = name, tasks = pipeline.len(), "bound");
        Ok(pipeline)
    }

    pub fn bind_file(&self, path: &Path) -> Result<Pipeline, BindError> {
        let file = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|e| {
            BindError::new(BindErrorKind::Io, format!("Cannot read control file: {}", e), None).in_file(&file)
        })?;
        self.bind_str(&file, &source).map_err(|e| e.in_file(&file))
    }

    /// Bind several files in order into one pipeline named `main`.
    pub fn bind_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Pipeline, BindError> {
        let mut main = Pipeline::new("main");
        for path in paths {
            let part = self.bind_file(path.as_ref())?;
            for task in part.tasks() {
                main.append(task.clone());
            }
        }
        Ok(main)
    }
}
