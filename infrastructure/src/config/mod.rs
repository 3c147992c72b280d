//! Configuration file support.

pub mod file_config;
pub mod loader;

pub use file_config::{default_config_toml, FileConfig, ProviderKind, ReviewSection, ReviewerEntry};
pub use loader::ConfigLoader;
