// src/config/loader.rs

use std::path::Path;

use tracing::info;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// File name looked up in the current directory when `--config` isn't given.
pub const DEFAULT_CONFIG_FILE: &str = "Rewatch.toml";

/// Read and deserialize a config file without semantic validation.
pub fn load_from_fs(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path)?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// [`load_from_fs`] against the real filesystem.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_from_fs(&RealFileSystem, path.as_ref())
}

/// Like [`load_from_fs`], but a missing file yields the defaults.
///
/// A file that exists but can't be read or parsed is still an error.
pub fn load_or_default(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    if !fs.exists(path) {
        info!(?path, "no config file found; using defaults");
        return Ok(RawConfigFile::default());
    }
    info!(?path, "reading options");
    load_from_fs(fs, path)
}

/// Load a config file from disk and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(path)?;
    ConfigFile::try_from(raw)
}

/// Write `raw` to `path` as TOML.
pub fn save_to_path(fs: &dyn FileSystem, path: &Path, raw: &RawConfigFile) -> Result<()> {
    let text = toml::to_string_pretty(raw)?;
    fs.write(path, text.as_bytes())?;
    info!(?path, "saved options");
    Ok(())
}
