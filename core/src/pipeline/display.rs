use std::fmt::{self, Display};

use super::{Pipeline, TaskRecord};
use crate::registry::Registry;

/// Renders a pipeline in control-file syntax. A pipeline produced by the
/// binder binds back to an equal pipeline; keyword values set in code must be
/// finite for that to hold.
pub struct PipelineDisplay<'a> {
    pipeline: &'a Pipeline,
    registry: &'a Registry,
}

impl<'a> PipelineDisplay<'a> {
    pub(super) fn new(pipeline: &'a Pipeline, registry: &'a Registry) -> Self {
        Self { pipeline, registry }
    }

    fn write_tasks(&self, f: &mut fmt::Formatter<'_>, tasks: &[TaskRecord], depth: usize) -> fmt::Result {
        for task in tasks {
            self.write_task(f, task, depth)?;
        }
        Ok(())
    }

    fn write_task(&self, f: &mut fmt::Formatter<'_>, task: &TaskRecord, depth: usize) -> fmt::Result {
        let def = self.registry.method(task.method());
        let pad = "  ".repeat(depth);
        write!(f, "{}{}", pad, def.name)?;

        let generics: Vec<&str> = task
            .generic_outputs()
            .iter()
            .chain(task.generic_inputs())
            .map(|v| self.registry.variable(*v).name.as_str())
            .collect();
        if !generics.is_empty() {
            write!(f, "({})", generics.join(", "))?;
        }

        let nested = task.embedded().filter(|p| !p.is_empty());
        if task.keywords().is_empty() && nested.is_none() {
            return writeln!(f, " {{}}");
        }

        writeln!(f, " {{")?;
        for (name, value) in def.keyword_names.iter().zip(task.keywords()) {
            writeln!(f, "{}  {} = {}", pad, name, value)?;
        }
        if let Some(p) = nested {
            self.write_tasks(f, p.tasks(), depth + 1)?;
        }
        writeln!(f, "{}}}", pad)
    }
}

impl Display for PipelineDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tasks(f, self.pipeline.tasks(), 0)
    }
}
