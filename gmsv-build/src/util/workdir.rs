//! Scoped change of the process working directory.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Holds the directory that was current before [`WorkdirGuard::enter`].
///
/// Call [`WorkdirGuard::restore`] to get restoration errors back. If the guard
/// is dropped without that, the old directory is still restored and a failure
/// is only logged.
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: Option<PathBuf>,
}

impl WorkdirGuard {
    pub fn enter(dir: &Path) -> Result<Self> {
        let previous = env::current_dir().context("Failed to read current directory")?;
        env::set_current_dir(dir)
            .with_context(|| format!("Failed to change directory to '{}'", dir.display()))?;
        log::debug!("entered {} (from {})", dir.display(), previous.display());
        Ok(Self {
            previous: Some(previous),
        })
    }

    pub fn restore(mut self) -> Result<()> {
        match self.previous.take() {
            Some(previous) => change_back(&previous),
            None => Ok(()),
        }
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(e) = change_back(&previous) {
                log::error!("{e:#}");
            }
        }
    }
}

fn change_back(previous: &Path) -> Result<()> {
    env::set_current_dir(previous).with_context(|| {
        format!(
            "Failed to change directory back to '{}'",
            previous.display()
        )
    })?;
    log::debug!("restored working directory {}", previous.display());
    Ok(())
}

/// Serializes tests that touch the process-wide working directory.
#[cfg(test)]
pub(crate) static CWD_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
