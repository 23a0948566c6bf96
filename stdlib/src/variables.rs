use anyhow::Result;
use pipex_core::registry::{MethodSet, RegistryBuilder};
use pipex_core::val::Group;

/// Built-in workspace variables: scratch slots per group plus the named
/// grids, measurement quantities and agendas the other sets refer to.
#[derive(Debug, Default)]
pub struct WorkspaceVariables;

impl WorkspaceVariables {
    pub fn new() -> Self {
        Self
    }
}

const VARIABLES: &[(&str, Group, &str)] = &[
    ("index_1", Group::Index, "Scratch index."),
    ("index_2", Group::Index, "Scratch index."),
    ("numeric_1", Group::Numeric, "Scratch numeric."),
    ("numeric_2", Group::Numeric, "Scratch numeric."),
    ("string_1", Group::String, "Scratch string."),
    ("vector_1", Group::Vector, "Scratch vector."),
    ("vector_2", Group::Vector, "Scratch vector."),
    ("array_of_index_1", Group::ArrayOfIndex, "Scratch index array."),
    ("array_of_string_1", Group::ArrayOfString, "Scratch string array."),
    ("matrix_1", Group::Matrix, "Scratch matrix."),
    ("agenda_1", Group::Pipeline, "Scratch agenda."),
    ("f_grid", Group::Vector, "The frequency grid [Hz]."),
    ("p_grid", Group::Vector, "The pressure grid [Pa], decreasing."),
    ("stokes_dim", Group::Index, "Number of Stokes components to consider (1-4)."),
    ("y", Group::Vector, "The measurement vector."),
    ("jacobian", Group::Matrix, "The Jacobian of the measurement vector."),
    ("forloop_index", Group::Index, "Current index of ForLoop."),
    ("forloop_agenda", Group::Pipeline, "Agenda executed once per ForLoop iteration."),
    ("main_agenda", Group::Pipeline, "The top-level agenda of a control file."),
    ("jacobian_agenda", Group::Pipeline, "Agenda computing the Jacobian."),
];

impl MethodSet for WorkspaceVariables {
    fn name(&self) -> &str {
        "variables"
    }

    fn description(&self) -> &str {
        "Built-in workspace variables"
    }

    fn register(&self, builder: &mut RegistryBuilder) -> Result<()> {
        for (name, group, description) in VARIABLES {
            builder.variable(name, *group, description)?;
        }
        Ok(())
    }
}
