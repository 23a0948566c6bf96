use anyhow::{Result, anyhow};
use pipex_core::exec::MethodCall;
use pipex_core::registry::{MethodSet, MethodSpec, RegistryBuilder};
use pipex_core::val::{Group, Matrix, Value};

/// Longest vector the grid generators will build.
pub const MAX_GRID_LEN: usize = 1 << 24;

/// Setters, grid generators and generic copy/touch.
#[derive(Debug, Default)]
pub struct BasicMethods;

impl BasicMethods {
    pub fn new() -> Self {
        Self
    }

    /// Store the single keyword value in the single generic output
    fn set_from_keyword(call: &mut MethodCall<'_>) -> Result<()> {
        let value = call.keyword(0)?.clone();
        call.write_output(0, value)
    }

    fn matrix_set(call: &mut MethodCall<'_>) -> Result<()> {
        let values = call.keyword(0)?.as_vector()?.to_vec();
        let ncols = call.keyword(1)?.as_index()?;
        if ncols <= 0 {
            return Err(anyhow!("MatrixSet: ncols must be positive, got {}", ncols));
        }
        let ncols = ncols as usize;
        if values.len() % ncols != 0 {
            return Err(anyhow!(
                "MatrixSet: {} values do not fill rows of {} columns",
                values.len(),
                ncols
            ));
        }
        let m = Matrix::from_flat(values.len() / ncols, ncols, values)?;
        call.write_output(0, Value::Matrix(m))
    }

    /// Values from `start` in increments of `step`, not passing `stop`
    fn vector_lin_space(call: &mut MethodCall<'_>) -> Result<()> {
        let start = call.keyword(0)?.as_numeric()?;
        let stop = call.keyword(1)?.as_numeric()?;
        let step = call.keyword(2)?.as_numeric()?;
        if step == 0.0 {
            return Err(anyhow!("VectorLinSpace: step must not be zero"));
        }
        let steps = ((stop - start) / step).floor();
        if !steps.is_finite() {
            return Err(anyhow!(
                "VectorLinSpace: cannot step from {} to {} by {}",
                start,
                stop,
                step
            ));
        }
        if steps < 0.0 {
            return Err(anyhow!(
                "VectorLinSpace: step {} never reaches from {} to {}",
                step,
                start,
                stop
            ));
        }
        if steps >= MAX_GRID_LEN as f64 {
            return Err(anyhow!(
                "VectorLinSpace: grid from {} to {} by {} exceeds {} elements",
                start,
                stop,
                step,
                MAX_GRID_LEN
            ));
        }
        let n = steps as usize + 1;
        let grid = (0..n).map(|i| start + i as f64 * step).collect();
        call.write_output(0, Value::Vector(grid))
    }

    /// `nelem` equally spaced values, both end points included
    fn vector_n_lin_space(call: &mut MethodCall<'_>) -> Result<()> {
        let nelem = call.keyword(0)?.as_index()?;
        let start = call.keyword(1)?.as_numeric()?;
        let stop = call.keyword(2)?.as_numeric()?;
        if nelem < 2 {
            return Err(anyhow!("VectorNLinSpace: nelem must be at least 2, got {}", nelem));
        }
        if usize::try_from(nelem).map_or(true, |n| n > MAX_GRID_LEN) {
            return Err(anyhow!("VectorNLinSpace: nelem {} exceeds {}", nelem, MAX_GRID_LEN));
        }
        let step = (stop - start) / (nelem - 1) as f64;
        let mut grid: Vec<f64> = (0..nelem).map(|i| start + i as f64 * step).collect();
        // Pin the last point against rounding.
        if let Some(last) = grid.last_mut() {
            *last = stop;
        }
        call.write_output(0, Value::Vector(grid))
    }

    fn copy(call: &mut MethodCall<'_>) -> Result<()> {
        let value = call.input(0)?.clone();
        let out = call.output_id(0)?;
        let target = call.registry().variable(out);
        if value.group() != target.group {
            return Err(anyhow!(
                "Copy: cannot copy {} ({}) to {} ({})",
                call.input_name(0)?,
                value.group(),
                target.name,
                target.group
            ));
        }
        call.write_output(0, value)
    }

    /// Leave the output as is; the executor marks it set.
    fn touch(_call: &mut MethodCall<'_>) -> Result<()> {
        Ok(())
    }
}

impl MethodSet for BasicMethods {
    fn name(&self) -> &str {
        "basic"
    }

    fn description(&self) -> &str {
        "Setters, grid generators, Copy and Touch"
    }

    fn register(&self, b: &mut RegistryBuilder) -> Result<()> {
        let setters = [
            ("IndexSet", Group::Index, "value"),
            ("NumericSet", Group::Numeric, "value"),
            ("StringSet", Group::String, "text"),
            ("VectorSet", Group::Vector, "values"),
            ("ArrayOfIndexSet", Group::ArrayOfIndex, "values"),
            ("ArrayOfStringSet", Group::ArrayOfString, "values"),
        ];
        for (name, group, kw) in setters {
            b.method(
                MethodSpec::new(name, Self::set_from_keyword)
                    .describe(&format!("Sets a {} variable to the given value.", group))
                    .gout(group)
                    .keyword(kw, group),
            )?;
        }

        b.method(
            MethodSpec::new("MatrixSet", Self::matrix_set)
                .describe("Fills a matrix row by row from a flat vector.")
                .gout(Group::Matrix)
                .keyword("values", Group::Vector)
                .keyword("ncols", Group::Index),
        )?;
        b.method(
            MethodSpec::new("VectorLinSpace", Self::vector_lin_space)
                .describe("Creates a linearly spaced vector with a given step.")
                .gout(Group::Vector)
                .keyword("start", Group::Numeric)
                .keyword("stop", Group::Numeric)
                .keyword("step", Group::Numeric),
        )?;
        b.method(
            MethodSpec::new("VectorNLinSpace", Self::vector_n_lin_space)
                .describe("Creates a linearly spaced vector with a given length.")
                .gout(Group::Vector)
                .keyword("nelem", Group::Index)
                .keyword("start", Group::Numeric)
                .keyword("stop", Group::Numeric),
        )?;
        b.method(
            MethodSpec::new("Copy", Self::copy)
                .describe("Copies a variable to another of the same group.")
                .gout(Group::Any)
                .gin(Group::Any),
        )?;
        b.method(
            MethodSpec::new("Touch", Self::touch)
                .describe("Marks a variable as set without changing it.")
                .gout(Group::Any),
        )?;
        Ok(())
    }
}
