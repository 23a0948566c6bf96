use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, Once};

use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

static LOGGING_INIT: Once = Once::new();

/// Errors already printed by `main` are logged under this target for the
/// report file only.
pub const FATAL_TARGET: &str = "pipex::fatal";

/// Verbosity of screen and report file, each 0 (errors only) to 3 (trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLevels {
    pub screen: u8,
    pub file: u8,
}

impl Default for ReportLevels {
    fn default() -> Self {
        Self { screen: 1, file: 3 }
    }
}

impl ReportLevels {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let digits: Vec<u8> = raw
            .trim()
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<_>>()
            .unwrap_or_default();
        match digits.as_slice() {
            [screen @ 0..=3, file @ 0..=3] => Ok(Self {
                screen: *screen,
                file: *file,
            }),
            _ => Err(format!(
                "Invalid reporting level '{}': expected two digits, the first for the screen and \
                 the second for the report file, each between 0 (errors only) and 3 (everything)",
                raw
            )),
        }
    }

    pub fn level_filter(level: u8) -> LevelFilter {
        match level {
            0 => LevelFilter::ERROR,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

/// A bare switch (`1`, `true`, `on`, any case) means everything; anything
/// else is taken as a filter expression.
fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("1") || trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("on") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Stderr filter: `PIPEX_TRACE` holds an `EnvFilter` expression overriding the
/// screen level; fatal errors are always left to `main`.
pub fn screen_filter(screen: u8, trace_env: Option<&str>) -> EnvFilter {
    let base = match trace_env {
        Some(raw) if env_toggle_enabled(raw) => filter_expr_from(raw).unwrap_or_else(|| "trace".to_string()),
        _ => ReportLevels::level_filter(screen).to_string().to_lowercase(),
    };
    EnvFilter::try_new(format!("{},{}=off", base, FATAL_TARGET))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{}=off", FATAL_TARGET)))
}

fn write_header(file: &mut File) -> Result<()> {
    writeln!(
        file,
        "pipex {} report, started {}",
        env!("CARGO_PKG_VERSION"),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    Ok(())
}

/// Install the stderr layer and, if `report` is given, the report-file layer.
pub fn init_logging(levels: ReportLevels, report: Option<&Path>) -> Result<()> {
    let file = match report {
        Some(path) => {
            let mut f = File::create(path).with_context(|| format!("Cannot create report file '{}'", path.display()))?;
            write_header(&mut f)?;
            Some(f)
        }
        None => None,
    };

    LOGGING_INIT.call_once(|| {
        let trace_env = std::env::var("PIPEX_TRACE").ok();
        let screen = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(screen_filter(levels.screen, trace_env.as_deref()));

        let report = file.map(|f| {
            fmt::layer()
                .with_writer(Mutex::new(f))
                .with_ansi(false)
                .with_filter(ReportLevels::level_filter(levels.file))
        });

        let _ = tracing_subscriber::registry().with(screen).with(report).try_init();
    });
    Ok(())
}
