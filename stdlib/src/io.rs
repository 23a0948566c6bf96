use anyhow::{Result, bail};
use pipex_core::exec::MethodCall;
use pipex_core::registry::{MethodSet, MethodSpec, RegistryBuilder};
use pipex_core::val::{Group, Value};

#[derive(Debug, Default)]
pub struct IoMethods;

impl IoMethods {
    pub fn new() -> Self {
        Self
    }

    fn render(value: &Value) -> String {
        match value {
            Value::Matrix(m) => {
                let mut out = format!("{}x{} matrix", m.rows(), m.cols());
                for r in 0..m.rows() {
                    let row: Vec<String> = m.row(r).unwrap_or(&[]).iter().map(|x| x.to_string()).collect();
                    out.push_str("\n  ");
                    out.push_str(&row.join(" "));
                }
                out
            }
            other => other.to_string(),
        }
    }

    /// Log `name = value`; level 0 is info, 1 debug, 2 and above trace
    fn print(call: &mut MethodCall<'_>) -> Result<()> {
        let level = call.keyword(0)?.as_index()?;
        if level < 0 {
            bail!("Print: level must be non-negative, got {}", level);
        }
        let name = call.input_name(0)?;
        let text = Self::render(call.input(0)?);
        match level {
            0 => tracing::info!(target: "pipex::print", "{} = {}", name, text),
            1 => tracing::debug!(target: "pipex::print", "{} = {}", name, text),
            _ => tracing::trace!(target: "pipex::print", "{} = {}", name, text),
        }
        Ok(())
    }
}

impl MethodSet for IoMethods {
    fn name(&self) -> &str {
        "io"
    }

    fn description(&self) -> &str {
        "Reporting of workspace values"
    }

    fn register(&self, b: &mut RegistryBuilder) -> Result<()> {
        b.method(
            MethodSpec::new("Print", Self::print)
                .describe("Prints a workspace variable to the report at the given verbosity level.")
                .gin(Group::Any)
                .keyword("level", Group::Index),
        )?;
        Ok(())
    }
}
