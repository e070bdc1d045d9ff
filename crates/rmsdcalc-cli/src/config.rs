//! Layered configuration for the CLI.
//!
//! Values are resolved with the precedence: command-line flags, then `-S/--set` overrides,
//! then the TOML file given with `-c/--config`, then [`defaults::DefaultsConfig`].

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
pub use models::AppConfig;
