//! Host platform detection.
//!
//! The output naming and toolchain wiring depend on the OS this binary runs on,
//! not on a cross-compilation target.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Other,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }

    /// `GOOS` value for this host.
    pub fn goos(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Other => "linux",
        }
    }

    pub fn path_separator(self) -> char {
        match self {
            Self::Windows => ';',
            Self::Other => ':',
        }
    }
}
