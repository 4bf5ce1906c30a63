use crate::cli::{Cli, EnvFormat};
use crate::config::BuildConfig;
use crate::plan::BuildPlan;
use crate::util::host::HostOs;
use crate::util::workdir::WorkdirGuard;
use anyhow::{Context, Result};
use std::env;

pub fn run(cli: &Cli) -> Result<()> {
    let cfg = BuildConfig::from_cli(cli)?;
    let host = HostOs::current();
    let inherited_path = env::var_os("PATH");
    let plan = BuildPlan::derive(&cfg, host, inherited_path.as_deref());
    log::info!(
        "host {:?}, arch {}-bit, output {}",
        host,
        cfg.arch.bits(),
        plan.output.display()
    );

    if let Some(format) = cli.print_env {
        return print_env(&cfg, &plan, format);
    }

    let guard = WorkdirGuard::enter(&cfg.directory)?;
    let built = crate::tasks::build::run(&cfg, &plan);
    combine(built, guard.restore())
}

/// A restore failure wins, but a build failure is kept in its context.
fn combine(built: Result<()>, restored: Result<()>) -> Result<()> {
    match (built, restored) {
        (built, Ok(())) => built,
        (Ok(()), Err(restore)) => Err(restore),
        (Err(build), Err(restore)) => Err(restore.context(format!("{build:#}"))),
    }
}

fn print_env(cfg: &BuildConfig, plan: &BuildPlan, format: EnvFormat) -> Result<()> {
    match format {
        EnvFormat::Sh => print!("{}", plan.shell_exports()),
        EnvFormat::Json => {
            let json = serde_json::to_string_pretty(&plan.report(cfg))
                .context("Failed to serialize build plan")?;
            println!("{json}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod combine_tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_build_result_passes_through() {
        assert!(combine(Ok(()), Ok(())).is_ok());
        let err = combine(Err(anyhow!("Compilation failed.")), Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "Compilation failed.");
    }

    #[test]
    fn test_restore_error_after_success() {
        let err = combine(Ok(()), Err(anyhow!("Failed to change directory back"))).unwrap_err();
        assert_eq!(err.to_string(), "Failed to change directory back");
    }

    #[test]
    fn test_both_errors_are_reported() {
        let err = combine(
            Err(anyhow!("Compilation failed.")),
            Err(anyhow!("Failed to change directory back")),
        )
        .unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("Compilation failed."));
        assert!(text.contains("Failed to change directory back"));
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::util::workdir::CWD_LOCK;
    use clap::Parser;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn fake_go(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("fake-go");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn cli(src: &Path, go: &Path) -> Cli {
        Cli::try_parse_from([
            "gmsv-build",
            "-C",
            src.to_str().unwrap(),
            "-n",
            "test",
            "--go",
            go.to_str().unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_restores_cwd_after_success() {
        let _l = CWD_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let tools = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let go = fake_go(tools.path(), "exit 0");
        let before = env::current_dir().unwrap();

        run(&cli(src.path(), &go)).unwrap();

        assert_eq!(env::current_dir().unwrap(), before);
        assert!(src.path().join("bin").is_dir());
    }

    #[test]
    fn test_restores_cwd_after_failed_build() {
        let _l = CWD_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let tools = TempDir::new().unwrap();
        let src = TempDir::new().unwrap();
        let go = fake_go(tools.path(), "exit 3");
        let before = env::current_dir().unwrap();

        let err = run(&cli(src.path(), &go)).unwrap_err();

        assert!(err.to_string().starts_with("Compilation failed."));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_print_env_does_not_touch_filesystem() {
        let _l = CWD_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let src = TempDir::new().unwrap();
        let before = env::current_dir().unwrap();
        let cli = Cli::try_parse_from([
            "gmsv-build",
            "-C",
            src.path().to_str().unwrap(),
            "-n",
            "test",
            "--print-env",
            "sh",
        ])
        .unwrap();

        run(&cli).unwrap();

        assert_eq!(env::current_dir().unwrap(), before);
        assert!(!src.path().join("bin").exists());
    }
}
