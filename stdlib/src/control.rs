use anyhow::{Result, anyhow, bail};
use pipex_core::exec::MethodCall;
use pipex_core::pipeline::Pipeline;
use pipex_core::registry::{MethodSet, MethodSpec, RegistryBuilder, VarId};
use pipex_core::val::{Group, Value};

/// Agenda handling and flow control.
#[derive(Debug, Default)]
pub struct ControlMethods;

impl ControlMethods {
    pub fn new() -> Self {
        Self
    }

    fn output_name<'a>(call: &MethodCall<'a>) -> Result<&'a str> {
        let id = call.output_id(0)?;
        Ok(&call.registry().variable(id).name)
    }

    fn embedded(call: &MethodCall<'_>) -> Pipeline {
        call.embedded().cloned().unwrap_or_default()
    }

    fn agenda_set(call: &mut MethodCall<'_>) -> Result<()> {
        let mut agenda = Self::embedded(call);
        agenda.set_name(Self::output_name(call)?);
        call.write_output(0, Value::Pipeline(agenda))
    }

    fn agenda_append(call: &mut MethodCall<'_>) -> Result<()> {
        let mut agenda = call.input(0)?.as_pipeline()?.clone();
        for task in Self::embedded(call).tasks() {
            agenda.append(task.clone());
        }
        agenda.set_name(Self::output_name(call)?);
        call.write_output(0, Value::Pipeline(agenda))
    }

    fn agenda_execute(call: &mut MethodCall<'_>) -> Result<()> {
        let agenda = call.input(0)?.as_pipeline()?.clone();
        call.run(&agenda)
    }

    fn agenda_execute_exclusive(call: &mut MethodCall<'_>) -> Result<()> {
        let agenda = call.input(0)?.as_pipeline()?.clone();
        let keep = call
            .keyword(0)?
            .as_string_array()?
            .iter()
            .map(|name| {
                call.registry()
                    .variable_id(name)
                    .ok_or_else(|| anyhow!("AgendaExecuteExclusive: unknown variable '{}' in keep", name))
            })
            .collect::<Result<Vec<VarId>>>()?;
        call.run_scoped(&agenda, &keep)
    }

    /// Run forloop_agenda once per index in start..=stop; iterations after the
    /// first are silent.
    fn for_loop(call: &mut MethodCall<'_>) -> Result<()> {
        let agenda = call.input(0)?.as_pipeline()?.clone();
        let start = call.keyword(0)?.as_index()?;
        let stop = call.keyword(1)?.as_index()?;
        let step = call.keyword(2)?.as_index()?;
        if step == 0 {
            bail!("ForLoop: step must not be zero");
        }
        let index = call.output_id(0)?;

        let mut i = start;
        let mut first = true;
        while (step > 0 && i <= stop) || (step < 0 && i >= stop) {
            call.workspace_mut().write(index, Value::Index(i));
            if first {
                call.run(&agenda)?;
                first = false;
            } else {
                call.run_silent(&agenda)?;
            }
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(())
    }

    fn error(call: &mut MethodCall<'_>) -> Result<()> {
        bail!("{}", call.keyword(0)?.as_str()?)
    }
}

impl MethodSet for ControlMethods {
    fn name(&self) -> &str {
        "control"
    }

    fn description(&self) -> &str {
        "Agenda handling and flow control"
    }

    fn register(&self, b: &mut RegistryBuilder) -> Result<()> {
        b.method(
            MethodSpec::new("AgendaSet", Self::agenda_set)
                .describe("Stores the enclosed methods as an agenda.")
                .gout(Group::Pipeline)
                .embeds_pipeline(),
        )?;
        b.method(
            MethodSpec::new("AgendaAppend", Self::agenda_append)
                .describe("Appends the enclosed methods to an agenda.")
                .gout(Group::Pipeline)
                .gin(Group::Pipeline)
                .embeds_pipeline(),
        )?;
        b.method(
            MethodSpec::new("AgendaExecute", Self::agenda_execute)
                .describe("Executes an agenda on the workspace.")
                .gin(Group::Pipeline),
        )?;
        b.method(
            MethodSpec::new("AgendaExecuteExclusive", Self::agenda_execute_exclusive)
                .describe("Executes an agenda on a private copy of the workspace, keeping only the listed variables.")
                .gin(Group::Pipeline)
                .keyword("keep", Group::ArrayOfString),
        )?;
        b.method(
            MethodSpec::new("ForLoop", Self::for_loop)
                .describe("Executes forloop_agenda once for each index from start to stop.")
                .output("forloop_index")
                .input("forloop_agenda")
                .keyword("start", Group::Index)
                .keyword("stop", Group::Index)
                .keyword("step", Group::Index),
        )?;
        b.method(
            MethodSpec::new("Error", Self::error)
                .describe("Aborts the run with the given message.")
                .keyword("message", Group::String),
        )?;
        Ok(())
    }
}
