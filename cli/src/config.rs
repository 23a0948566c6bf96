use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::report::ReportLevels;

/// Optional settings file; command-line flags take precedence.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub reporting: Option<String>,
    pub basename: Option<String>,
    pub max_depth: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Settings after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub levels: ReportLevels,
    pub basename: Option<PathBuf>,
    pub max_depth: usize,
}

impl Settings {
    pub fn resolve(
        cli_levels: Option<ReportLevels>,
        cli_basename: Option<PathBuf>,
        file: &FileConfig,
        controlfiles: &[PathBuf],
    ) -> Result<Self> {
        let levels = match (cli_levels, &file.reporting) {
            (Some(levels), _) => levels,
            (None, Some(raw)) => ReportLevels::parse(raw).map_err(anyhow::Error::msg)?,
            (None, None) => ReportLevels::default(),
        };
        let basename = cli_basename
            .or_else(|| file.basename.as_ref().map(PathBuf::from))
            .or_else(|| controlfiles.first().map(|p| p.with_extension("")));
        Ok(Self {
            levels,
            basename,
            max_depth: file.max_depth.unwrap_or(pipex_core::Executor::DEFAULT_MAX_DEPTH),
        })
    }

    /// `<basename>.rep`, if there is a basename.
    pub fn report_path(&self) -> Option<PathBuf> {
        self.basename.as_ref().map(|b| {
            let mut name = b.clone().into_os_string();
            name.push(".rep");
            PathBuf::from(name)
        })
    }
}
