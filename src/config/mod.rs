//! Configuration resolution and persistence.
//!
//! [`Store`] layers defaults, the YAML config file, `INIQ_*` environment
//! variables and CLI overrides; [`Config::from_store`] materializes the
//! merged view into typed settings and [`save_config`] writes them back.

pub mod error;
pub mod settings;
pub mod store;
pub mod value;

pub use error::ConfigError;
pub use settings::{Config, Key, Kind, display, register_defaults, save_config};
pub use store::Store;
pub use value::Value;
