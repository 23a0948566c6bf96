//! Static catalogs of workspace variables and methods.
//!
//! Both catalogs are assembled once through [`RegistryBuilder`] and are
//! immutable afterwards. Everything downstream refers to definitions by
//! [`VarId`] / [`MethodId`]; names are looked up only while binding.

use std::fmt::{self, Write as _};

use anyhow::{Result, anyhow};
use rustc_hash::FxHashMap;

use crate::exec::Getaway;
use crate::val::Group;

#[cfg(test)]
mod registry_test;

/// Stable index of a workspace variable definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn from_index(i: usize) -> Self {
        Self(i)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wsv#{}", self.0)
    }
}

/// Stable index of a method definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(usize);

impl MethodId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "md#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub group: Group,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub name: String,
    pub description: String,
    pub fixed_outputs: Vec<VarId>,
    pub fixed_inputs: Vec<VarId>,
    pub generic_output_groups: Vec<Group>,
    pub generic_input_groups: Vec<Group>,
    pub keyword_names: Vec<String>,
    pub keyword_groups: Vec<Group>,
    /// Invocations carry an embedded pipeline in their body.
    pub takes_pipeline: bool,
    pub getaway: Getaway,
}

impl MethodDef {
    pub fn generic_count(&self) -> usize {
        self.generic_output_groups.len() + self.generic_input_groups.len()
    }

    pub fn keyword_index(&self, name: &str) -> Option<usize> {
        self.keyword_names.iter().position(|k| k == name)
    }
}

/// Declaration of a method by variable names, resolved when the registry is built.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    name: String,
    description: String,
    outputs: Vec<String>,
    inputs: Vec<String>,
    gout: Vec<Group>,
    gin: Vec<Group>,
    keywords: Vec<(String, Group)>,
    takes_pipeline: bool,
    getaway: Getaway,
}

impl MethodSpec {
    pub fn new(name: &str, getaway: Getaway) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            outputs: Vec::new(),
            inputs: Vec::new(),
            gout: Vec::new(),
            gin: Vec::new(),
            keywords: Vec::new(),
            takes_pipeline: false,
            getaway,
        }
    }

    pub fn describe(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    /// Fixed output variable
    pub fn output(mut self, var: &str) -> Self {
        self.outputs.push(var.to_string());
        self
    }

    /// Fixed input variable
    pub fn input(mut self, var: &str) -> Self {
        self.inputs.push(var.to_string());
        self
    }

    /// Generic output slot
    pub fn gout(mut self, group: Group) -> Self {
        self.gout.push(group);
        self
    }

    /// Generic input slot
    pub fn gin(mut self, group: Group) -> Self {
        self.gin.push(group);
        self
    }

    pub fn keyword(mut self, name: &str, group: Group) -> Self {
        self.keywords.push((name.to_string(), group));
        self
    }

    pub fn embeds_pipeline(mut self) -> Self {
        self.takes_pipeline = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named bundle of variables and methods that installs itself into a builder.
pub trait MethodSet: fmt::Debug {
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn register(&self, builder: &mut RegistryBuilder) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    variables: Vec<VariableDef>,
    var_index: FxHashMap<String, VarId>,
    methods: Vec<MethodSpec>,
    method_index: FxHashMap<String, MethodId>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(&mut self, name: &str, group: Group, description: &str) -> Result<VarId> {
        if group == Group::Any {
            return Err(anyhow!("Variable '{}' must have a concrete group, not Any", name));
        }
        if self.var_index.contains_key(name) {
            return Err(anyhow!("Variable '{}' is already registered", name));
        }
        let id = VarId(self.variables.len());
        self.variables.push(VariableDef {
            name: name.to_string(),
            group,
            description: description.to_string(),
        });
        self.var_index.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn method(&mut self, spec: MethodSpec) -> Result<MethodId> {
        if self.method_index.contains_key(&spec.name) {
            return Err(anyhow!("Method '{}' is already registered", spec.name));
        }
        if let Some((kw, _)) = spec.keywords.iter().find(|(_, g)| *g == Group::Pipeline) {
            return Err(anyhow!(
                "Method '{}': keyword '{}' cannot be a Pipeline, embed the pipeline instead",
                spec.name,
                kw
            ));
        }
        let id = MethodId(self.methods.len());
        self.method_index.insert(spec.name.clone(), id);
        self.methods.push(spec);
        Ok(id)
    }

    pub fn register(&mut self, set: &dyn MethodSet) -> Result<()> {
        set.register(self)
            .map_err(|e| anyhow!("Failed to register method set '{}': {}", set.name(), e))
    }

    fn resolve(&self, method: &str, names: &[String]) -> Result<Vec<VarId>> {
        names
            .iter()
            .map(|n| {
                self.var_index
                    .get(n)
                    .copied()
                    .ok_or_else(|| anyhow!("Method '{}' refers to unknown variable '{}'", method, n))
            })
            .collect()
    }

    /// Resolve every fixed variable reference and freeze the catalogs.
    pub fn build(self) -> Result<Registry> {
        let mut methods = Vec::with_capacity(self.methods.len());
        for spec in &self.methods {
            let fixed_outputs = self.resolve(&spec.name, &spec.outputs)?;
            let fixed_inputs = self.resolve(&spec.name, &spec.inputs)?;
            let (keyword_names, keyword_groups) = spec.keywords.iter().cloned().unzip();
            methods.push(MethodDef {
                name: spec.name.clone(),
                description: spec.description.clone(),
                fixed_outputs,
                fixed_inputs,
                generic_output_groups: spec.gout.clone(),
                generic_input_groups: spec.gin.clone(),
                keyword_names,
                keyword_groups,
                takes_pipeline: spec.takes_pipeline,
                getaway: spec.getaway,
            });
        }
        Ok(Registry {
            variables: self.variables,
            var_index: self.var_index,
            methods,
            method_index: self.method_index,
        })
    }
}

/// Immutable variable and method catalogs.
#[derive(Debug)]
pub struct Registry {
    variables: Vec<VariableDef>,
    var_index: FxHashMap<String, VarId>,
    methods: Vec<MethodDef>,
    method_index: FxHashMap<String, MethodId>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Panics if `id` did not come from this registry.
    pub fn variable(&self, id: VarId) -> &VariableDef {
        &self.variables[id.0]
    }

    /// Panics if `id` did not come from this registry.
    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.0]
    }

    pub fn variable_id(&self, name: &str) -> Option<VarId> {
        self.var_index.get(name).copied()
    }

    pub fn method_id(&self, name: &str) -> Option<MethodId> {
        self.method_index.get(name).copied()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = (VarId, &VariableDef)> {
        self.variables.iter().enumerate().map(|(i, d)| (VarId(i), d))
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &MethodDef)> {
        self.methods.iter().enumerate().map(|(i, d)| (MethodId(i), d))
    }

    /// Methods listing `var` among their fixed outputs.
    pub fn methods_producing(&self, var: VarId) -> impl Iterator<Item = &MethodDef> {
        self.methods.iter().filter(move |m| m.fixed_outputs.contains(&var))
    }

    /// Methods listing `var` among their fixed inputs.
    pub fn methods_consuming(&self, var: VarId) -> impl Iterator<Item = &MethodDef> {
        self.methods.iter().filter(move |m| m.fixed_inputs.contains(&var))
    }

    pub fn describe_variable(&self, id: VarId) -> String {
        let def = self.variable(id);
        let mut out = format!("Workspace variable: {}\n  Group: {}\n", def.name, def.group);
        if !def.description.is_empty() {
            let _ = writeln!(out, "  {}", def.description);
        }
        out
    }

    pub fn describe_method(&self, id: MethodId) -> String {
        let def = self.method(id);
        let names = |ids: &[VarId]| -> String {
            ids.iter()
                .map(|v| self.variable(*v).name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let groups = |gs: &[Group]| -> String { gs.iter().map(|g| g.name()).collect::<Vec<_>>().join(", ") };

        let mut out = format!("Method: {}\n", def.name);
        if !def.description.is_empty() {
            let _ = writeln!(out, "  {}", def.description);
        }
        if !def.fixed_outputs.is_empty() {
            let _ = writeln!(out, "  Output: {}", names(&def.fixed_outputs));
        }
        if !def.fixed_inputs.is_empty() {
            let _ = writeln!(out, "  Input: {}", names(&def.fixed_inputs));
        }
        if !def.generic_output_groups.is_empty() {
            let _ = writeln!(out, "  Generic output: {}", groups(&def.generic_output_groups));
        }
        if !def.generic_input_groups.is_empty() {
            let _ = writeln!(out, "  Generic input: {}", groups(&def.generic_input_groups));
        }
        for (name, group) in def.keyword_names.iter().zip(&def.keyword_groups) {
            let _ = writeln!(out, "  Keyword: {} ({})", name, group);
        }
        if def.takes_pipeline {
            out.push_str("  Embeds a pipeline\n");
        }
        out
    }
}
