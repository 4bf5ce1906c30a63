//! Validated build configuration.

use crate::cli::{Arch, Cli};
use anyhow::{Context, Result, bail};
use std::fmt;
use std::path::{Path, PathBuf};

/// A validation failure that should be followed by the usage text.
#[derive(Debug)]
pub struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub directory: PathBuf,
    pub arch: Arch,
    pub cflags: String,
    pub ldflags: String,
    pub name: String,
    pub maxprocs: u32,
    pub outdir: PathBuf,
    pub go: PathBuf,
}

impl BuildConfig {
    /// Checks the parsed arguments. No filesystem changes happen here.
    ///
    /// A `--go` value with a directory part is made absolute against the
    /// current directory, so it still resolves after `-C` is entered.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.name.trim().is_empty() {
            return Err(UsageError("Output name cannot be empty.".to_string()).into());
        }
        if !cli.directory.is_dir() {
            bail!("Directory '{}' does not exist.", cli.directory.display());
        }

        Ok(Self {
            directory: cli.directory.clone(),
            arch: cli.arch,
            cflags: cli.cflags.clone(),
            ldflags: cli.ldflags.clone(),
            name: cli.name.clone(),
            maxprocs: cli.maxprocs,
            outdir: cli.outdir.clone(),
            go: absolute_tool(&cli.go)?,
        })
    }
}

/// Bare program names stay as they are and are searched in `PATH`.
fn absolute_tool(tool: &Path) -> Result<PathBuf> {
    if tool.components().count() < 2 {
        return Ok(tool.to_path_buf());
    }
    std::path::absolute(tool)
        .with_context(|| format!("Failed to resolve build tool path '{}'", tool.display()))
}
