//! # gmsv-build
//!
//! Builds a Go (cgo) package into a Garry's Mod binary module named
//! `gmsv_<name>_<platform>.dll`, wiring up the toolchain environment first.
//!
//! ```bash
//! gmsv-build -n mymodule -a 64            # bin/gmsv_mymodule_linux64.dll
//! gmsv-build -C module/ -n mymodule -p 8  # build from module/
//! gmsv-build -n mymodule --print-env sh   # show the environment only
//! ```

use clap::{CommandFactory, Parser};
use std::process::ExitCode;

mod app;
mod cli;
mod config;
mod plan;
mod tasks;
mod util;

fn main() -> ExitCode {
    let cli = crate::cli::Cli::parse();
    crate::util::logger::init(crate::util::logger::level_for(cli.verbose));

    match crate::app::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e:#}");
            if e.downcast_ref::<crate::config::UsageError>().is_some() {
                print_usage(&mut std::io::stdout());
            }
            ExitCode::FAILURE
        }
    }
}

fn print_usage(out: &mut impl std::io::Write) {
    if let Err(e) = crate::cli::Cli::command().write_help(out) {
        log::warn!("Failed to print usage: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct ClosedPipe;

    impl io::Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_print_usage_writes_help() {
        let mut out = Vec::new();
        print_usage(&mut out);
        assert!(String::from_utf8(out).unwrap().contains("Usage:"));
    }

    #[test]
    fn test_print_usage_survives_write_error() {
        print_usage(&mut ClosedPipe);
    }
}
