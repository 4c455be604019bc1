//! Client configuration (TOML).

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ClientSettings, Config};
