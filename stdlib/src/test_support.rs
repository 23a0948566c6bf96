use anyhow::Result;
use pipex_core::{Binder, Executor, Value, Workspace};

use crate::default_registry;

/// Bind and run `source` on a fresh workspace with the default registry.
pub fn run(source: &str) -> Result<Workspace> {
    let reg = default_registry()?;
    let pipeline = Binder::new(reg).bind_str("main", source)?;
    let mut ws = Workspace::new(reg);
    Executor::new(reg).run(&pipeline, &mut ws)?;
    Ok(ws)
}

pub fn read<'w>(ws: &'w Workspace, name: &str) -> &'w Value {
    let reg = default_registry().unwrap();
    ws.read(reg.variable_id(name).unwrap())
}

pub fn is_set(ws: &Workspace, name: &str) -> bool {
    let reg = default_registry().unwrap();
    ws.is_occupied(reg.variable_id(name).unwrap())
}
