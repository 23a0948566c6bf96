//! Sequential pipeline interpreter.
//!
//! Each task is checked for unset inputs, dispatched to its native method,
//! and then has its outputs marked occupied. The first failure ends the run;
//! nothing is rolled back. Sub-pipelines run through [`MethodCall`] on the
//! same call stack.

use tracing::{debug, info, trace};

use crate::pipeline::Pipeline;
use crate::registry::Registry;
use crate::workspace::Workspace;

mod call;
mod error;

pub use call::MethodCall;
pub use error::ExecutionError;


/// Native method implementation.
pub type Getaway = fn(&mut MethodCall<'_>) -> anyhow::Result<()>;

#[derive(Debug, Clone, Copy)]
pub struct Executor<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl<'r> Executor<'r> {
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit on sub-pipeline nesting; the top-level pipeline is depth 0.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn run(&self, pipeline: &Pipeline, ws: &mut Workspace) -> Result<(), ExecutionError> {
        self.execute(pipeline, ws, 0, false)
    }

    /// Run with task announcements demoted to debug level.
    pub fn run_silent(&self, pipeline: &Pipeline, ws: &mut Workspace) -> Result<(), ExecutionError> {
        self.execute(pipeline, ws, 0, true)
    }

    pub(crate) fn execute(
        &self,
        pipeline: &Pipeline,
        ws: &mut Workspace,
        depth: usize,
        silent: bool,
    ) -> Result<(), ExecutionError> {
        if depth > self.max_depth {
            return Err(ExecutionError::DepthExceeded {
                pipeline: pipeline.name().to_string(),
                depth: self.max_depth,
            });
        }
        trace!(
            target: "pipex::exec",
            pipeline = pipeline.name(),
            depth,
            tasks = pipeline.len(),
            "pipeline.enter"
        );

        for (i, task) in pipeline.tasks().iter().enumerate() {
            let def = self.registry.method(task.method());
            let indent = "  ".repeat(depth);
            if silent {
                debug!(target: "pipex::exec", "{}- {}", indent, def.name);
            } else {
                info!(target: "pipex::exec", "{}- {}", indent, def.name);
            }

            if let Some(missing) = task.inputs(self.registry).find(|v| !ws.is_occupied(*v)) {
                return Err(ExecutionError::MissingInput {
                    method: def.name.clone(),
                    variable: self.registry.variable(missing).name.clone(),
                    task: i,
                });
            }

            let mut call = MethodCall::new(self, task, ws, depth, silent);
            if let Err(err) = (def.getaway)(&mut call) {
                // A failure inside a sub-pipeline is reported as-is.
                return Err(match err.downcast::<ExecutionError>() {
                    Ok(inner) => inner,
                    Err(cause) => ExecutionError::MethodFailed {
                        method: def.name.clone(),
                        task: i,
                        cause,
                    },
                });
            }

            for v in task.outputs(self.registry) {
                ws.mark_occupied(v);
            }
        }

        trace!(target: "pipex::exec", pipeline = pipeline.name(), depth, "pipeline.exit");
        Ok(())
    }
}
