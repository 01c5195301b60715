#![allow(dead_code)]

use std::path::PathBuf;

use fieldkeeper::document::{self, Element};
use tempfile::TempDir;
use tracing_subscriber::{fmt, EnvFilter};

/// Routes keeper logs to the test output; set `RUST_LOG=fieldkeeper=debug` to see them.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// A scratch directory and a settings path inside it.
pub fn scratch(file: &str) -> (TempDir, PathBuf) {
    init_tracing();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(file);
    (dir, path)
}

pub fn read_root(path: &PathBuf) -> Element {
    let xml = std::fs::read_to_string(path).expect("settings file");
    document::parse(&xml).expect("well formed settings")
}

pub fn text_of<'a>(root: &'a Element, name: &str) -> Option<&'a str> {
    root.child(name).and_then(Element::text)
}
