// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs`: the TOML-backed data model with site defaults.
//! - `loader.rs`: reading a config file (or falling back to defaults).
//! - `validate.rs`: checks run while turning `RawConfigFile` into
//!   `ConfigFile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_for_cli, load_from_path};
pub use model::{
    AutoprefixerSection, CleanSection, ConfigFile, CriticalSection, CssSection, ImagesSection,
    JsSection, PathsSection, PerfSection, RawConfigFile, SassSection, ToolCommand, UncssSection,
    WatchBindingConfig,
};
