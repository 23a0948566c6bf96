//! Bound method invocations and the ordered pipelines that hold them.

use crate::exec::ExecutionError;
use crate::registry::{MethodId, Registry, VarId};
use crate::val::Value;

mod display;

pub use display::PipelineDisplay;

#[cfg(test)]
mod pipeline_test;

/// One resolved, type-checked method invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    method: MethodId,
    keywords: Vec<Value>,
    generic_outputs: Vec<VarId>,
    generic_inputs: Vec<VarId>,
    embedded: Option<Pipeline>,
}

impl TaskRecord {
    pub fn new(
        method: MethodId,
        keywords: Vec<Value>,
        generic_outputs: Vec<VarId>,
        generic_inputs: Vec<VarId>,
        embedded: Option<Pipeline>,
    ) -> Self {
        Self {
            method,
            keywords,
            generic_outputs,
            generic_inputs,
            embedded,
        }
    }

    /// A task with no keywords, generics or embedded pipeline.
    pub fn simple(method: MethodId) -> Self {
        Self::new(method, Vec::new(), Vec::new(), Vec::new(), None)
    }

    pub fn method(&self) -> MethodId {
        self.method
    }

    pub fn keywords(&self) -> &[Value] {
        &self.keywords
    }

    pub fn generic_outputs(&self) -> &[VarId] {
        &self.generic_outputs
    }

    pub fn generic_inputs(&self) -> &[VarId] {
        &self.generic_inputs
    }

    pub fn embedded(&self) -> Option<&Pipeline> {
        self.embedded.as_ref()
    }

    /// Fixed inputs followed by generic inputs.
    pub fn inputs<'a>(&'a self, registry: &'a Registry) -> impl Iterator<Item = VarId> + 'a {
        let def = registry.method(self.method);
        def.fixed_inputs.iter().chain(&self.generic_inputs).copied()
    }

    /// Fixed outputs followed by generic outputs.
    pub fn outputs<'a>(&'a self, registry: &'a Registry) -> impl Iterator<Item = VarId> + 'a {
        let def = registry.method(self.method);
        def.fixed_outputs.iter().chain(&self.generic_outputs).copied()
    }
}

/// Named, ordered list of tasks. Cloning deep-copies the task list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    name: String,
    tasks: Vec<TaskRecord>,
}

impl Pipeline {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(name: &str, tasks: Vec<TaskRecord>) -> Self {
        Self {
            name: name.to_string(),
            tasks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn append(&mut self, task: TaskRecord) {
        self.tasks.push(task);
    }

    /// Truncate to `n` tasks, or grow with clones of `filler`.
    pub fn resize(&mut self, n: usize, filler: TaskRecord) {
        self.tasks.resize(n, filler);
    }

    pub fn truncate(&mut self, n: usize) {
        self.tasks.truncate(n);
    }

    /// Whether any task, at any nesting level, reads `var`.
    pub fn is_input(&self, registry: &Registry, var: VarId) -> bool {
        self.tasks.iter().any(|t| {
            t.inputs(registry).any(|v| v == var) || t.embedded().is_some_and(|p| p.is_input(registry, var))
        })
    }

    /// Whether any task, at any nesting level, writes `var`.
    pub fn is_output(&self, registry: &Registry, var: VarId) -> bool {
        self.tasks.iter().any(|t| {
            t.outputs(registry).any(|v| v == var) || t.embedded().is_some_and(|p| p.is_output(registry, var))
        })
    }

    /// Replay the executor's occupancy rules over the top-level tasks without
    /// dispatching anything. Embedded pipelines are not inspected.
    pub fn check(&self, registry: &Registry, already_occupied: &[VarId]) -> Result<(), ExecutionError> {
        let mut occupied = vec![false; registry.variable_count()];
        for v in already_occupied {
            occupied[v.index()] = true;
        }
        for (i, task) in self.tasks.iter().enumerate() {
            if let Some(missing) = task.inputs(registry).find(|v| !occupied[v.index()]) {
                return Err(ExecutionError::MissingInput {
                    method: registry.method(task.method).name.clone(),
                    variable: registry.variable(missing).name.clone(),
                    task: i,
                });
            }
            for v in task.outputs(registry) {
                occupied[v.index()] = true;
            }
        }
        Ok(())
    }

    pub fn display<'a>(&'a self, registry: &'a Registry) -> PipelineDisplay<'a> {
        PipelineDisplay::new(self, registry)
    }
}
