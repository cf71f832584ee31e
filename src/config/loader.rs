// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, validate it, and resolve the project
/// root relative to the file's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)?.with_base_dir(config_dir(path));
    Ok(config)
}

/// Resolve the configuration for a CLI run.
///
/// - An explicit path must exist.
/// - Without one, `Sitebuild.toml` in the working directory is used if
///   present; otherwise the built-in defaults apply.
pub fn load_for_cli(explicit: Option<&Path>) -> Result<ConfigFile> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    let path = default_config_path();
    if path.is_file() {
        return load_and_validate(&path);
    }

    debug!(path = ?path, "no config file found; using built-in defaults");
    ConfigFile::try_from(RawConfigFile::default())
}

/// Default config location: `Sitebuild.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Sitebuild.toml")
}

/// - If the config path has a non-empty parent (e.g. "site/Sitebuild.toml"),
///   paths are resolved against that directory.
/// - A bare filename resolves against the current directory ".".
fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
