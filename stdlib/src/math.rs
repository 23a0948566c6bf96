use anyhow::{Result, anyhow};
use pipex_core::exec::MethodCall;
use pipex_core::registry::{MethodSet, MethodSpec, RegistryBuilder};
use pipex_core::val::{Group, Value};

#[derive(Debug, Default)]
pub struct MathMethods;

impl MathMethods {
    pub fn new() -> Self {
        Self
    }

    fn index_add(call: &mut MethodCall<'_>) -> Result<()> {
        let a = call.input(0)?.as_index()?;
        let b = call.keyword(0)?.as_index()?;
        let sum = a
            .checked_add(b)
            .ok_or_else(|| anyhow!("IndexAdd: {} + {} overflows", a, b))?;
        call.write_output(0, Value::Index(sum))
    }

    fn numeric_add(call: &mut MethodCall<'_>) -> Result<()> {
        let a = call.input(0)?.as_numeric()?;
        let b = call.keyword(0)?.as_numeric()?;
        call.write_output(0, Value::Numeric(a + b))
    }

    fn numeric_scale(call: &mut MethodCall<'_>) -> Result<()> {
        let a = call.input(0)?.as_numeric()?;
        let b = call.keyword(0)?.as_numeric()?;
        call.write_output(0, Value::Numeric(a * b))
    }

    fn vector_scale(call: &mut MethodCall<'_>) -> Result<()> {
        let factor = call.keyword(0)?.as_numeric()?;
        let out: Vec<f64> = call.input(0)?.as_vector()?.iter().map(|x| x * factor).collect();
        call.write_output(0, Value::Vector(out))
    }

    fn vector_add_scalar(call: &mut MethodCall<'_>) -> Result<()> {
        let offset = call.keyword(0)?.as_numeric()?;
        let out: Vec<f64> = call.input(0)?.as_vector()?.iter().map(|x| x + offset).collect();
        call.write_output(0, Value::Vector(out))
    }

    fn vector_sum(call: &mut MethodCall<'_>) -> Result<()> {
        let sum: f64 = call.input(0)?.as_vector()?.iter().sum();
        call.write_output(0, Value::Numeric(sum))
    }

    /// out = in with one element appended; out and in may be the same variable
    fn vector_extend(call: &mut MethodCall<'_>) -> Result<()> {
        let mut out = call.input(0)?.as_vector()?.to_vec();
        out.push(call.input(1)?.as_numeric()?);
        call.write_output(0, Value::Vector(out))
    }
}

impl MethodSet for MathMethods {
    fn name(&self) -> &str {
        "math"
    }

    fn description(&self) -> &str {
        "Scalar and vector arithmetic"
    }

    fn register(&self, b: &mut RegistryBuilder) -> Result<()> {
        b.method(
            MethodSpec::new("IndexAdd", Self::index_add)
                .describe("Adds a constant to an index.")
                .gout(Group::Index)
                .gin(Group::Index)
                .keyword("value", Group::Index),
        )?;
        b.method(
            MethodSpec::new("NumericAdd", Self::numeric_add)
                .describe("Adds a constant to a numeric.")
                .gout(Group::Numeric)
                .gin(Group::Numeric)
                .keyword("value", Group::Numeric),
        )?;
        b.method(
            MethodSpec::new("NumericScale", Self::numeric_scale)
                .describe("Multiplies a numeric by a constant.")
                .gout(Group::Numeric)
                .gin(Group::Numeric)
                .keyword("value", Group::Numeric),
        )?;
        b.method(
            MethodSpec::new("VectorScale", Self::vector_scale)
                .describe("Multiplies every element of a vector by a constant.")
                .gout(Group::Vector)
                .gin(Group::Vector)
                .keyword("value", Group::Numeric),
        )?;
        b.method(
            MethodSpec::new("VectorAddScalar", Self::vector_add_scalar)
                .describe("Adds a constant to every element of a vector.")
                .gout(Group::Vector)
                .gin(Group::Vector)
                .keyword("value", Group::Numeric),
        )?;
        b.method(
            MethodSpec::new("VectorSum", Self::vector_sum)
                .describe("Sum of all elements of a vector.")
                .gout(Group::Numeric)
                .gin(Group::Vector),
        )?;
        b.method(
            MethodSpec::new("VectorExtend", Self::vector_extend)
                .describe("Appends a numeric to a vector.")
                .gout(Group::Vector)
                .gin(Group::Vector)
                .gin(Group::Numeric),
        )?;
        Ok(())
    }
}
