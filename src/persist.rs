// used for the backing file
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::KeeperConfig;
use crate::document::{self, Element};
use crate::error::{KeeperError, Result};

/// What was found at the backing path.
#[derive(Debug)]
pub enum Opened {
    Loaded(Element),
    /// No path, no file, or a file holding nothing but whitespace.
    Fresh,
}

/// Reads and writes the document file behind a keeper.
#[derive(Debug, Clone)]
pub struct Persistor {
    source: Option<PathBuf>,
    config: KeeperConfig,
}

impl Persistor {
    pub fn new(source: Option<PathBuf>, config: KeeperConfig) -> Self {
        Persistor { source, config }
    }
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }
    pub fn rebind(&mut self, source: PathBuf) {
        self.source = Some(source);
    }
    pub fn describe(&self) -> String {
        self.source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    pub fn open(&self) -> Result<Opened> {
        let Some(path) = &self.source else {
            return Ok(Opened::Fresh);
        };
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no document yet");
                return Ok(Opened::Fresh);
            }
            Err(source) => return Err(KeeperError::Open { path: path.clone(), source }),
        };
        if content.trim().is_empty() {
            debug!(path = %path.display(), "empty document");
            return Ok(Opened::Fresh);
        }
        document::parse(&content)
            .map(Opened::Loaded)
            .map_err(|source| KeeperError::Document { path: path.clone(), source })
    }

    pub fn flush(&self, root: &Element) -> Result<()> {
        let path = self.source.as_ref().ok_or(KeeperError::NoSource)?;
        let write_error = |source: std::io::Error| KeeperError::Write { path: path.clone(), source };
        if self.config.create_parent_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(write_error)?;
            }
        }
        let xml = document::to_xml(root, self.config.indent, self.config.declaration);
        fs::write(path, xml).map_err(write_error)
    }

    /// Moves the backing file to `target` and rebinds to it. Returns false
    /// when `target` already exists or the file could not be moved; fails
    /// only when the move left both files behind.
    pub fn move_to(&mut self, target: &Path) -> Result<bool> {
        if target.exists() {
            return Ok(false);
        }
        if let Some(current) = self.source.clone().filter(|p| p.exists()) {
            if let Err(e) = fs::copy(&current, target) {
                warn!(error = %e, from = %current.display(), to = %target.display(), "copy failed");
                return Ok(false);
            }
            if let Err(e) = fs::remove_file(&current) {
                warn!(error = %e, path = %current.display(), "cannot remove moved file");
                return match fs::remove_file(target) {
                    Ok(()) => Ok(false),
                    Err(_) => Err(KeeperError::Move { from: current, to: target.to_path_buf() }),
                };
            }
        }
        self.source = Some(target.to_path_buf());
        Ok(true)
    }

    /// Removes the backing file. True when no file remains at the path.
    pub fn delete(&self) -> bool {
        let Some(path) = &self.source else {
            return true;
        };
        match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "cannot delete document");
                !path.exists()
            }
        }
    }
}
