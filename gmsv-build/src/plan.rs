//! Derivation of the toolchain environment, output path and command line.
//!
//! Everything here is a pure function of the [`BuildConfig`], the host OS and the
//! inherited search path, so it can be checked for every host on any host.

use crate::cli::Arch;
use crate::config::BuildConfig;
use crate::util::host::HostOs;
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Optimization, visibility and LTO flags always passed to cgo and the external linker.
pub const BASE_NATIVE_FLAGS: &str = "-Ofast -fvisibility=hidden -flto";

/// Instruction-set level for amd64 code.
pub const GOAMD64_LEVEL: &str = "v3";

#[derive(Clone, Debug)]
pub struct BuildPlan {
    pub env: Vec<(&'static str, OsString)>,
    pub output: PathBuf,
    pub cflags: String,
    pub ldflags: String,
}

/// Filename suffix for a host/arch pair.
pub fn platform_tag(host: HostOs, arch: Arch) -> &'static str {
    match (host, arch) {
        (HostOs::Windows, Arch::X86) => "win32",
        (HostOs::Other, Arch::X86) => "linux",
        (HostOs::Windows, Arch::Amd64) => "win64",
        (HostOs::Other, Arch::Amd64) => "linux64",
    }
}

/// MinGW directory prepended to `PATH` on Windows hosts.
pub fn mingw_bin(arch: Arch) -> &'static str {
    match arch {
        Arch::X86 => "C:/mingw32/bin",
        Arch::Amd64 => "C:/mingw64/bin",
    }
}

pub fn output_file_name(name: &str, host: HostOs, arch: Arch) -> String {
    format!("gmsv_{name}_{}.dll", platform_tag(host, arch))
}

pub fn compiler_flags(extra: &str) -> String {
    format!("{BASE_NATIVE_FLAGS} {extra}")
}

pub fn linker_flags(extra: &str) -> String {
    format!("-s -w -extldflags '{BASE_NATIVE_FLAGS} {extra}'")
}

/// Single-quotes `value` for POSIX sh; nothing inside is expanded.
pub fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

impl BuildPlan {
    pub fn derive(cfg: &BuildConfig, host: HostOs, inherited_path: Option<&OsStr>) -> Self {
        let cflags = compiler_flags(&cfg.cflags);
        let ldflags = linker_flags(&cfg.ldflags);

        let mut env: Vec<(&'static str, OsString)> = vec![
            ("GOOS", host.goos().into()),
            ("CGO_ENABLED", "1".into()),
            ("GOAMD64", GOAMD64_LEVEL.into()),
            ("GOMAXPROCS", cfg.maxprocs.to_string().into()),
            ("CGO_CFLAGS", cflags.clone().into()),
            ("GOARCH", cfg.arch.goarch().into()),
        ];

        if host == HostOs::Windows {
            let mut path = OsString::from(mingw_bin(cfg.arch));
            path.push(host.path_separator().to_string());
            if let Some(inherited) = inherited_path {
                path.push(inherited);
            }
            env.push(("PATH", path));
        }

        Self {
            env,
            output: cfg.outdir.join(output_file_name(&cfg.name, host, cfg.arch)),
            cflags,
            ldflags,
        }
    }

    pub fn var(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Arguments passed to the Go tool, without the program itself.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "build".into(),
            "-buildmode=c-shared".into(),
            "-o".into(),
            self.output.clone().into_os_string(),
            "-ldflags".into(),
            self.ldflags.clone().into(),
        ]
    }

    pub fn summary(&self, cfg: &BuildConfig) -> String {
        let rule = "=".repeat(40);
        format!(
            "{rule}\n\
             Build Configuration:\n\
             {}\n\
             Architecture  : {}-bit\n\
             CFLAGS        : {}\n\
             LDFLAGS       : {}\n\
             DLL File      : {}\n\
             Max Procs     : {}\n\
             {rule}\n",
            "-".repeat(40),
            cfg.arch.bits(),
            self.cflags,
            self.ldflags,
            self.output.display(),
            cfg.maxprocs,
        )
    }

    /// Shell `export` lines for the derived environment, safe to `eval`.
    pub fn shell_exports(&self) -> String {
        self.env
            .iter()
            .map(|(k, v)| format!("export {k}={}\n", sh_quote(&v.to_string_lossy())))
            .collect()
    }

    pub fn report(&self, cfg: &BuildConfig) -> PlanReport {
        let mut command = vec![cfg.go.to_string_lossy().into_owned()];
        command.extend(self.args().iter().map(|a| a.to_string_lossy().into_owned()));
        PlanReport {
            arch: cfg.arch.bits(),
            output: self.output.to_string_lossy().into_owned(),
            cflags: self.cflags.clone(),
            ldflags: self.ldflags.clone(),
            maxprocs: cfg.maxprocs,
            env: self
                .env
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.to_string_lossy().into_owned()))
                .collect(),
            command,
        }
    }
}

/// Serializable view of a plan for `--print-env json`.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub arch: u8,
    pub output: String,
    pub cflags: String,
    pub ldflags: String,
    pub maxprocs: u32,
    pub env: std::collections::BTreeMap<String, String>,
    pub command: Vec<String>,
}
