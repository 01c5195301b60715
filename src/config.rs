// used to read keeper settings from a separate config file
use config::{Config, Environment, File};
use serde::Deserialize;

use std::path::Path;

use crate::error::Result;

/// How the keeper lays out and writes its document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    /// Spaces per nesting level in the written file.
    pub indent: usize,
    /// Whether to start the file with an XML declaration.
    pub declaration: bool,
    /// Whether saving may create missing parent directories.
    pub create_parent_dirs: bool,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self { indent: 4, declaration: true, create_parent_dirs: false }
    }
}

impl KeeperConfig {
    /// Reads a config file (format taken from its extension), with
    /// `FIELDKEEPER_*` environment variables taking precedence.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("FIELDKEEPER"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
