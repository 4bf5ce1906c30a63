use crate::config::BuildConfig;
use crate::plan::BuildPlan;
use anyhow::{Context, Result, bail};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Build the module from the current working directory.
pub fn run(cfg: &BuildConfig, plan: &BuildPlan) -> Result<()> {
    ensure_dir(&cfg.outdir)?;

    print!("{}", plan.summary(cfg));
    println!();

    ensure_dir(Path::new("bin"))?;

    let go = resolve_tool(&cfg.go, plan)?;
    log::info!("using build tool {}", go.display());
    for (k, v) in &plan.env {
        log::debug!("env {k}={}", v.to_string_lossy());
    }

    let args = plan.args();
    println!("Running build command: {}", command_line(&cfg.go, &args));

    let status = Command::new(&go)
        .args(&args)
        .envs(plan.env.iter().map(|(k, v)| (*k, v)))
        .status()
        .with_context(|| format!("Failed to start {}", go.display()))?;

    if !status.success() {
        bail!("Compilation failed. ({} {status})", cfg.go.display());
    }

    println!("Compilation succeeded. Output: {}", plan.output.display());
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create '{}'", dir.display()))
}

/// Looks the tool up in the search path the child will get.
fn resolve_tool(tool: &Path, plan: &BuildPlan) -> Result<PathBuf> {
    let search: Option<OsString> = plan
        .var("PATH")
        .map(ToOwned::to_owned)
        .or_else(|| env::var_os("PATH"));
    let cwd = env::current_dir().context("Failed to read current directory")?;

    which::which_in(tool, search, cwd)
        .with_context(|| format!("Build tool '{}' not found in PATH", tool.display()))
}

fn command_line(tool: &Path, args: &[OsString]) -> String {
    std::iter::once(tool.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
