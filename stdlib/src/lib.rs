pub mod basic;
pub mod control;
pub mod io;
pub mod math;
pub mod variables;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use once_cell::sync::OnceCell;
use pipex_core::registry::{Registry, RegistryBuilder};

/// Register the built-in variables and every stdlib method set
pub fn register_stdlib(builder: &mut RegistryBuilder) -> Result<()> {
    builder.register(&variables::WorkspaceVariables::new())?;
    builder.register(&basic::BasicMethods::new())?;
    builder.register(&math::MathMethods::new())?;
    builder.register(&control::ControlMethods::new())?;
    builder.register(&io::IoMethods::new())?;
    Ok(())
}

static DEFAULT_REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Shared registry holding the full stdlib catalog, built on first use.
pub fn default_registry() -> Result<&'static Registry> {
    DEFAULT_REGISTRY.get_or_try_init(|| {
        let mut builder = Registry::builder();
        register_stdlib(&mut builder)?;
        builder.build()
    })
}
