use std::fmt;

/// Fatal outcome of a pipeline run. The first failure aborts the whole run.
#[derive(Debug)]
pub enum ExecutionError {
    /// A task's input was never written by an earlier task.
    MissingInput {
        method: String,
        variable: String,
        task: usize,
    },
    /// The native implementation reported an error.
    MethodFailed {
        method: String,
        task: usize,
        cause: anyhow::Error,
    },
    /// Nested pipelines went deeper than the executor allows.
    DepthExceeded { pipeline: String, depth: usize },
}

impl ExecutionError {
    /// Name of the failing method, if a task failed.
    pub fn method(&self) -> Option<&str> {
        match self {
            ExecutionError::MissingInput { method, .. } | ExecutionError::MethodFailed { method, .. } => Some(method),
            ExecutionError::DepthExceeded { .. } => None,
        }
    }

    /// Index of the failing task within the pipeline that ran it.
    pub fn task(&self) -> Option<usize> {
        match self {
            ExecutionError::MissingInput { task, .. } | ExecutionError::MethodFailed { task, .. } => Some(*task),
            ExecutionError::DepthExceeded { .. } => None,
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::MissingInput { method, variable, task } => write!(
                f,
                "Method {} (task {}) needs input {}, which has not been set",
                method, task, variable
            ),
            ExecutionError::MethodFailed { method, task, cause } => {
                write!(f, "Method {} (task {}) failed: {:#}", method, task, cause)
            }
            ExecutionError::DepthExceeded { pipeline, depth } => write!(
                f,
                "Pipeline {} exceeds the maximum nesting depth ({})",
                pipeline, depth
            ),
        }
    }
}

impl std::error::Error for ExecutionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecutionError::MethodFailed { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}
