pub mod host;
pub mod logger;
pub mod workdir;
