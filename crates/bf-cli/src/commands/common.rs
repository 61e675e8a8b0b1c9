//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use bf_core::{Config, DatabaseConfig, DbType, Stage, StagingLayout};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and connections are released.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command has already reported the failure
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Resolved project directory and configuration
#[derive(Debug, Clone)]
pub(crate) struct PipelineContext {
    pub(crate) project_dir: PathBuf,
    pub(crate) config: Config,
}

impl PipelineContext {
    pub(crate) fn staging_root(&self) -> PathBuf {
        self.config.staging_root(&self.project_dir)
    }

    pub(crate) fn transformed_root(&self) -> PathBuf {
        self.config.transformed_root(&self.project_dir)
    }

    pub(crate) fn layout(&self) -> StagingLayout {
        StagingLayout::new(self.staging_root())
    }

    /// Database config with a relative DuckDB path resolved against the
    /// project directory
    pub(crate) fn database(&self, config: &DatabaseConfig) -> DatabaseConfig {
        let mut resolved = config.clone();
        if resolved.db_type == DbType::DuckDb {
            if let Some(path) = resolved.path.as_deref().filter(|p| *p != ":memory:") {
                resolved.path = Some(self.project_dir.join(path).display().to_string());
            }
        }
        resolved
    }
}

/// Load configuration for the project and apply command-line overrides
pub(crate) fn load_context(global: &GlobalArgs) -> Result<PipelineContext> {
    let project_dir = global.project_dir.clone();
    let mut config = Config::resolve(&project_dir, global.config.as_deref())
        .with_context(|| format!("Failed to load config for {}", project_dir.display()))?;

    if let Some(root) = &global.staging_root {
        config.storage.staging_root = root.clone();
    }
    if let Some(root) = &global.transformed_root {
        config.storage.transformed_root = root.clone();
    }

    Ok(PipelineContext {
        project_dir,
        config,
    })
}

/// Load the context and validate what `stages` need
pub(crate) fn load_context_for(global: &GlobalArgs, stages: &[Stage]) -> Result<PipelineContext> {
    let ctx = load_context(global)?;
    ctx.config
        .validate_for(stages)
        .context("Configuration is incomplete")?;
    Ok(ctx)
}

/// Display a path relative to the project directory when possible
pub(crate) fn display_path(project_dir: &Path, path: &Path) -> String {
    path.strip_prefix(project_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
