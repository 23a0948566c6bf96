use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pipex_core::{Binder, Executor, Workspace};
use tracing::info;

mod config;
mod listing;
mod report;

use config::{FileConfig, Settings};
use report::ReportLevels;

#[derive(Debug, Parser)]
#[command(
    name = "pipex",
    author,
    version,
    about = "Bind and execute pipeline control files",
    long_about = None
)]
struct CliArgs {
    /// Control files, bound in order into one pipeline
    #[arg(
        value_name = "CONTROLFILES",
        required_unless_present_any = ["describe", "methods", "workspacevariables"]
    )]
    controlfiles: Vec<PathBuf>,

    /// Two digits: screen level then report-file level, each 0-3
    #[arg(short = 'r', long = "reporting", value_name = "NN", value_parser = ReportLevels::parse)]
    reporting: Option<ReportLevels>,

    /// Report file basename; the report is written to NAME.rep
    #[arg(short = 'b', long = "basename", value_name = "NAME")]
    basename: Option<PathBuf>,

    /// Print the definition of a method or workspace variable
    #[arg(short = 'd', long = "describe", value_name = "NAME")]
    describe: Option<String>,

    /// List all methods, or the methods producing VAR
    #[arg(short = 'm', long = "methods", value_name = "all|VAR")]
    methods: Option<String>,

    /// List all workspace variables, or the inputs of METHOD
    #[arg(short = 'w', long = "workspacevariables", value_name = "all|METHOD")]
    workspacevariables: Option<String>,

    /// Bind and check the control files without executing them
    #[arg(long)]
    check: bool,

    /// TOML file with reporting, basename and max_depth
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Output of a listing option, if one was given.
fn listing_output(args: &CliArgs, reg: &pipex_core::Registry) -> anyhow::Result<Option<String>> {
    if let Some(name) = &args.describe {
        return listing::describe(reg, name).map(Some);
    }
    if let Some(which) = &args.methods {
        return listing::methods(reg, which).map(Some);
    }
    if let Some(which) = &args.workspacevariables {
        return listing::variables(reg, which).map(Some);
    }
    Ok(None)
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let registry = pipex_stdlib::default_registry()?;

    if let Some(text) = listing_output(&args, registry)? {
        print!("{}", text);
        return Ok(());
    }

    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(args.reporting, args.basename, &file_config, &args.controlfiles)?;
    let report_path = settings.report_path();
    report::init_logging(settings.levels, report_path.as_deref())?;

    let pipeline = Binder::new(registry)
        .bind_files(&args.controlfiles)
        .context("Binding control files failed")?;
    info!(target: "pipex", "Bound {} task(s) from {} control file(s)", pipeline.len(), args.controlfiles.len());

    if args.check {
        pipeline.check(registry, &[])?;
        info!(target: "pipex", "Control files are consistent");
        return Ok(());
    }

    let mut ws = Workspace::new(registry);
    Executor::new(registry)
        .with_max_depth(settings.max_depth)
        .run(&pipeline, &mut ws)?;
    info!(target: "pipex", "Everything seems fine. Goodbye.");
    Ok(())
}

fn main() {
    let args = CliArgs::parse();
    if let Err(err) = run(args) {
        tracing::error!(target: report::FATAL_TARGET, "{:#}", err);
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
