use anyhow::{Result, anyhow};

use super::Executor;
use crate::pipeline::{Pipeline, TaskRecord};
use crate::registry::{MethodDef, Registry, VarId};
use crate::val::Value;
use crate::workspace::Workspace;

/// Everything a native method sees while it runs: its task record, the
/// workspace, and a handle to run sub-pipelines one level deeper.
pub struct MethodCall<'a> {
    executor: &'a Executor<'a>,
    task: &'a TaskRecord,
    ws: &'a mut Workspace,
    depth: usize,
    silent: bool,
}

impl<'a> MethodCall<'a> {
    pub(super) fn new(
        executor: &'a Executor<'a>,
        task: &'a TaskRecord,
        ws: &'a mut Workspace,
        depth: usize,
        silent: bool,
    ) -> Self {
        Self {
            executor,
            task,
            ws,
            depth,
            silent,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.executor.registry()
    }

    pub fn method(&self) -> &'a MethodDef {
        self.registry().method(self.task.method())
    }

    pub fn task(&self) -> &'a TaskRecord {
        self.task
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn keyword(&self, i: usize) -> Result<&'a Value> {
        let task = self.task;
        task.keywords()
            .get(i)
            .ok_or_else(|| anyhow!("{} has no keyword #{}", self.method().name, i))
    }

    /// Id of input `i`, counting fixed inputs first.
    pub fn input_id(&self, i: usize) -> Result<VarId> {
        self.task
            .inputs(self.registry())
            .nth(i)
            .ok_or_else(|| anyhow!("{} has no input #{}", self.method().name, i))
    }

    pub fn input(&self, i: usize) -> Result<&Value> {
        let id = self.input_id(i)?;
        Ok(self.ws.read(id))
    }

    pub fn input_name(&self, i: usize) -> Result<&'a str> {
        let id = self.input_id(i)?;
        Ok(&self.registry().variable(id).name)
    }

    /// Fixed outputs followed by generic outputs.
    pub fn output_ids(&self) -> Vec<VarId> {
        self.task.outputs(self.registry()).collect()
    }

    pub fn output_id(&self, i: usize) -> Result<VarId> {
        self.task
            .outputs(self.registry())
            .nth(i)
            .ok_or_else(|| anyhow!("{} has no output #{}", self.method().name, i))
    }

    /// Store `value` in output `i`. The value must match the variable's group.
    pub fn write_output(&mut self, i: usize, value: Value) -> Result<()> {
        let id = self.output_id(i)?;
        let def = self.registry().variable(id);
        if value.group() != def.group {
            return Err(anyhow!(
                "cannot store a {} value in {} ({})",
                value.group(),
                def.name,
                def.group
            ));
        }
        self.ws.write(id, value);
        Ok(())
    }

    /// In-place access to output `i`; the executor marks it occupied afterwards.
    pub fn output_mut(&mut self, i: usize) -> Result<&mut Value> {
        let id = self.output_id(i)?;
        Ok(self.ws.slot_mut(id))
    }

    pub fn workspace(&self) -> &Workspace {
        &*self.ws
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut *self.ws
    }

    pub fn embedded(&self) -> Option<&'a Pipeline> {
        let task = self.task;
        task.embedded()
    }

    pub fn run_embedded(&mut self) -> Result<()> {
        let pipeline = self
            .embedded()
            .ok_or_else(|| anyhow!("{} carries no embedded pipeline", self.method().name))?;
        self.run(pipeline)
    }

    /// Run `pipeline` on the same workspace, one level deeper.
    pub fn run(&mut self, pipeline: &Pipeline) -> Result<()> {
        self.executor
            .execute(pipeline, self.ws, self.depth + 1, self.silent)
            .map_err(anyhow::Error::from)
    }

    /// Like [`MethodCall::run`], without announcing each task at info level.
    pub fn run_silent(&mut self, pipeline: &Pipeline) -> Result<()> {
        self.executor
            .execute(pipeline, self.ws, self.depth + 1, true)
            .map_err(anyhow::Error::from)
    }

    /// Run `pipeline` on a private copy of the workspace, then copy back only
    /// the `keep` variables it produced.
    pub fn run_scoped(&mut self, pipeline: &Pipeline, keep: &[VarId]) -> Result<()> {
        let mut private = self.ws.clone();
        self.executor
            .execute(pipeline, &mut private, self.depth + 1, self.silent)?;
        self.ws.merge_from(&private, keep);
        Ok(())
    }
}
