use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Target architecture of the produced module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Arch {
    #[value(name = "32")]
    X86,
    #[value(name = "64")]
    Amd64,
}

impl Arch {
    pub fn bits(self) -> u8 {
        match self {
            Self::X86 => 32,
            Self::Amd64 => 64,
        }
    }

    /// `GOARCH` value understood by the Go toolchain.
    pub fn goarch(self) -> &'static str {
        match self {
            Self::X86 => "386",
            Self::Amd64 => "amd64",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EnvFormat {
    /// `export KEY="VALUE"` lines, suitable for `eval`.
    Sh,
    /// A JSON document describing the whole build plan.
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "gmsv-build")]
#[command(about = "Build a Go shared library (gmsv_<name>_<platform>.dll) with configurable flags.")]
pub struct Cli {
    /// Change to directory before executing commands (default: current directory)
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Architecture (32 or 64)
    #[arg(short, long, value_enum, default_value_t = Arch::X86)]
    pub arch: Arch,

    /// Extra C compiler flags, appended after the built-in optimization flags
    #[arg(short = 'f', long, default_value = "", allow_hyphen_values = true)]
    pub cflags: String,

    /// Extra linker flags, appended inside `-extldflags`
    #[arg(short = 'l', long, default_value = "", allow_hyphen_values = true)]
    pub ldflags: String,

    /// Output DLL name (required)
    #[arg(short, long)]
    pub name: String,

    /// Maximum parallel processes, forwarded to the toolchain as GOMAXPROCS
    #[arg(
        short = 'p',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub maxprocs: u32,

    /// Output directory for the built DLL
    #[arg(short = 'o', long, value_name = "DIR", default_value = "bin")]
    pub outdir: PathBuf,

    /// Go toolchain binary used for the build
    #[arg(long = "go", value_name = "PROGRAM", default_value = "go")]
    pub go: PathBuf,

    /// Print the derived build environment and exit without building
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub print_env: Option<EnvFormat>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
