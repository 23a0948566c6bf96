use std::fmt::Write as _;

use anyhow::{Result, bail};
use pipex_core::Registry;

/// `--describe NAME`: a method's or variable's definition.
pub fn describe(reg: &Registry, name: &str) -> Result<String> {
    if let Some(id) = reg.method_id(name) {
        return Ok(reg.describe_method(id));
    }
    if let Some(id) = reg.variable_id(name) {
        let mut out = reg.describe_variable(id);
        let producers: Vec<&str> = reg.methods_producing(id).map(|m| m.name.as_str()).collect();
        if !producers.is_empty() {
            let _ = writeln!(out, "  Produced by: {}", producers.join(", "));
        }
        return Ok(out);
    }
    bail!("No method or workspace variable named '{}'", name)
}

/// `--methods all|VAR`: all method names, or those with VAR as a fixed output.
pub fn methods(reg: &Registry, which: &str) -> Result<String> {
    let mut out = String::new();
    if which == "all" {
        for (_, def) in reg.methods() {
            let _ = writeln!(out, "{}", def.name);
        }
        return Ok(out);
    }
    let Some(var) = reg.variable_id(which) else {
        bail!("Unknown workspace variable '{}'", which);
    };
    for def in reg.methods_producing(var) {
        let _ = writeln!(out, "{}", def.name);
    }
    Ok(out)
}

/// `--workspacevariables all|METHOD`: all variables, or those METHOD reads.
pub fn variables(reg: &Registry, which: &str) -> Result<String> {
    let mut out = String::new();
    if which == "all" {
        for (_, def) in reg.variables() {
            let _ = writeln!(out, "{} ({})", def.name, def.group);
        }
        return Ok(out);
    }
    let Some(id) = reg.method_id(which) else {
        bail!("Unknown method '{}'", which);
    };
    let def = reg.method(id);
    for v in &def.fixed_inputs {
        let var = reg.variable(*v);
        let _ = writeln!(out, "{} ({})", var.name, var.group);
    }
    for group in &def.generic_input_groups {
        let _ = writeln!(out, "<generic {}>", group);
    }
    Ok(out)
}
