use thiserror::Error;

// used for file paths in error messages
use std::io;
use std::path::PathBuf;

use crate::document::DocumentError;

/// Why a single node could not be turned into a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("node '{0}' not found")]
    NodeMissing(String),
    #[error("node has no text content")]
    NoTextContent,
    #[error("cannot read '{text}' as {expected}")]
    Malformed { expected: &'static str, text: String },
}

impl ReadError {
    /// Soft failures keep the in-memory value and are never reported.
    pub fn is_soft(&self) -> bool {
        matches!(self, ReadError::NoTextContent)
    }
    pub(crate) fn malformed(expected: &'static str, text: &str) -> Self {
        ReadError::Malformed { expected, text: text.to_string() }
    }
}

/// One field that failed during a bulk reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub name: String,
    pub cause: ReadError,
}

#[derive(Error, Debug)]
pub enum KeeperError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Cannot open '{}': {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("Cannot parse '{}': {source}", .path.display())]
    Document { path: PathBuf, source: DocumentError },
    #[error("Cannot read field '{field}' from '{path}': {cause}")]
    Parse { path: String, field: String, cause: ReadError },
    #[error("Unreadable fields in '{path}': {}", list_names(.failures))]
    Unreadable { path: String, failures: Vec<FieldFailure> },
    #[error("Cannot write '{}': {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("No file is bound to the keeper")]
    NoSource,
    #[error("Moving '{}' to '{}' left both files in place", .from.display(), .to.display())]
    Move { from: PathBuf, to: PathBuf },
}

impl KeeperError {
    /// Names of the fields reported by a bulk reload, empty for any other error.
    pub fn unreadable_fields(&self) -> Vec<&str> {
        match self {
            KeeperError::Unreadable { failures, .. } => {
                failures.iter().map(|f| f.name.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

fn list_names(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, KeeperError>;

impl From<config::ConfigError> for KeeperError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
