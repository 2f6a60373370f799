pub mod config;
pub mod fs;
pub mod logger;
pub mod path;
pub mod semver;
pub mod signature;
pub mod spinner;
pub mod version;
