// used to hold fields in name order
use std::collections::BTreeMap;
// used for the backing file
use std::path::{Path, PathBuf};

// used to validate field names
use regex::Regex;
use lazy_static::lazy_static;
use tracing::{debug, info, warn};

use crate::config::KeeperConfig;
use crate::datatype::DataType;
use crate::document::{self, Element};
use crate::error::{FieldFailure, KeeperError, ReadError, Result};
use crate::field::Field;
use crate::persist::{Opened, Persistor};
use crate::sanitize::Sanitizer;

/// Name of the root element of every document the keeper creates.
pub const ROOT_NAME: &str = "Settings";

lazy_static! {
    static ref FIELD_NAME: Regex = Regex::new(r"^[\p{L}_][\p{L}\p{N}_.\-]*$").unwrap();
}

/// Whether `name` can be used for a kept field.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(' ') && FIELD_NAME.is_match(name)
}

// ------------- Bindings -------------

/// A typed field seen through its type-erased persistence operations.
trait Binding {
    fn data_type(&self) -> String;
    fn arity(&self) -> usize;
    fn load(&self, node: &Element) -> std::result::Result<(), ReadError>;
    fn store(&self, node: &mut Element);
    fn sanitize(&self);
    fn is_sanitized(&self) -> bool;
}

struct Bound<T> {
    field: Field<T>,
    sanitizer: Option<Box<dyn Fn()>>,
}

impl<T: DataType> Binding for Bound<T> {
    fn data_type(&self) -> String {
        T::data_type()
    }
    fn arity(&self) -> usize {
        T::ARITY
    }
    // decodes into a copy so a failure leaves the field untouched
    fn load(&self, node: &Element) -> std::result::Result<(), ReadError> {
        let mut staged = self.field.get();
        staged.read(node)?;
        self.field.set(staged);
        self.sanitize();
        Ok(())
    }
    fn store(&self, node: &mut Element) {
        self.field.borrow().write(node);
    }
    fn sanitize(&self) {
        if let Some(sanitize) = &self.sanitizer {
            sanitize();
        }
    }
    fn is_sanitized(&self) -> bool {
        self.sanitizer.is_some()
    }
}

struct Entry {
    binding: Box<dyn Binding>,
    ignore_read_error: bool,
}

/// Describes one kept field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub data_type: String,
    pub arity: usize,
    pub sanitized: bool,
    pub ignore_read_error: bool,
}

/// Decides whether a read failure is reported. Missing text is never
/// reported, other failures only when the field does not ignore them.
fn reportable(name: &str, ignore_read_error: bool, cause: ReadError) -> Option<ReadError> {
    if cause.is_soft() {
        debug!(field = name, "no text content, value kept");
        None
    } else if ignore_read_error {
        warn!(field = name, error = %cause, "read error ignored, value kept");
        None
    } else {
        Some(cause)
    }
}

// ------------- Keeper -------------

/// Keeps a set of named fields in sync with a settings document.
///
/// Every field is registered once with [`FieldKeeper::keep`]. Registration
/// loads the field from the document if it is there, and otherwise writes
/// the field's current value into the document. After that the fields and
/// the document only meet again on [`FieldKeeper::reload_all`] and
/// [`FieldKeeper::save`].
pub struct FieldKeeper {
    persistor: Persistor,
    root: Element,
    fields: BTreeMap<String, Entry>,
}

impl FieldKeeper {
    /// A keeper without a backing file.
    pub fn in_memory() -> Self {
        FieldKeeper {
            persistor: Persistor::new(None, KeeperConfig::default()),
            root: Element::new(ROOT_NAME),
            fields: BTreeMap::new(),
        }
    }
    /// A keeper backed by `path`, which need not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(Some(path.into()), KeeperConfig::default())
    }
    pub fn with_config(source: Option<PathBuf>, config: KeeperConfig) -> Result<Self> {
        let persistor = Persistor::new(source, config);
        let root = match persistor.open()? {
            Opened::Loaded(root) => root,
            Opened::Fresh => Element::new(ROOT_NAME),
        };
        debug!(path = %persistor.describe(), root = root.name(), "keeper opened");
        Ok(FieldKeeper { persistor, root, fields: BTreeMap::new() })
    }

    pub fn keep<T: DataType + 'static>(&mut self, name: &str, field: &Field<T>, ignore_read_error: bool) -> Result<()> {
        self.register(name, field, ignore_read_error, None)
    }

    /// Like [`FieldKeeper::keep`], with `sanitizer` applied now, after
    /// every successful load and before every save.
    pub fn keep_sanitized<T: DataType + 'static>(
        &mut self,
        name: &str,
        field: &Field<T>,
        ignore_read_error: bool,
        sanitizer: Sanitizer<T>,
    ) -> Result<()> {
        self.register(name, field, ignore_read_error, Some(sanitizer))
    }

    fn register<T: DataType + 'static>(
        &mut self,
        name: &str,
        field: &Field<T>,
        ignore_read_error: bool,
        sanitizer: Option<Sanitizer<T>>,
    ) -> Result<()> {
        assert!(!name.is_empty(), "field name must not be empty");
        assert!(!name.contains(' '), "field name '{name}' must not contain a space");
        assert!(is_valid_name(name), "field name '{name}' is not a valid element name");
        assert!(!self.fields.contains_key(name), "field '{name}' is already kept");
        assert!(T::ARITY >= 1, "field '{name}' has no elements to keep");

        let bound = Bound {
            field: field.clone(),
            sanitizer: sanitizer.map(|s| s.bind(field.clone())),
        };
        let entry = Entry { binding: Box::new(bound), ignore_read_error };
        entry.binding.sanitize();
        let entry = self.fields.entry(name.to_string()).or_insert(entry);

        let Some(node) = self.root.child(name) else {
            entry.binding.store(self.root.child_or_insert(name));
            debug!(field = name, data_type = %entry.binding.data_type(), "seeded");
            return Ok(());
        };
        match entry.binding.load(node) {
            Ok(()) => {
                debug!(field = name, data_type = %entry.binding.data_type(), "loaded");
                Ok(())
            }
            Err(cause) => match reportable(name, entry.ignore_read_error, cause) {
                None => Ok(()),
                Some(cause) => Err(KeeperError::Parse {
                    path: self.persistor.describe(),
                    field: name.to_string(),
                    cause,
                }),
            },
        }
    }

    /// Reads the document again and loads every field from it. All fields
    /// that could not be loaded are reported together; their values are
    /// left as they were.
    pub fn reload_all(&mut self) -> Result<()> {
        let mut failures = Vec::new();
        match self.persistor.open()? {
            Opened::Fresh => {
                self.root = Element::new(ROOT_NAME);
                failures.extend(self.fields.keys().map(|name| FieldFailure {
                    name: name.clone(),
                    cause: ReadError::NodeMissing(name.clone()),
                }));
            }
            Opened::Loaded(root) => {
                self.root = root;
                for (name, entry) in &self.fields {
                    let cause = match self.root.child(name) {
                        None => Some(ReadError::NodeMissing(name.clone())),
                        Some(node) => entry
                            .binding
                            .load(node)
                            .err()
                            .and_then(|cause| reportable(name, entry.ignore_read_error, cause)),
                    };
                    if let Some(cause) = cause {
                        failures.push(FieldFailure { name: name.clone(), cause });
                    }
                }
            }
        }
        let path = self.persistor.describe();
        if failures.is_empty() {
            info!(path = %path, fields = self.fields.len(), "reload complete");
            Ok(())
        } else {
            warn!(path = %path, unreadable = failures.len(), fields = self.fields.len(), "reload incomplete");
            Err(KeeperError::Unreadable { path, failures })
        }
    }

    /// Binds the keeper to `path` and reloads from it.
    pub fn reload_all_from(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.persistor.rebind(path.into());
        self.reload_all()
    }

    /// Sanitizes and stores every field in name order, then writes the file.
    pub fn save(&mut self) -> Result<()> {
        for (name, entry) in &self.fields {
            entry.binding.sanitize();
            entry.binding.store(self.root.child_or_insert(name));
        }
        self.persistor.flush(&self.root)?;
        info!(path = %self.persistor.describe(), fields = self.fields.len(), "save complete");
        Ok(())
    }

    /// Binds the keeper to `path` and saves there.
    pub fn save_to(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.persistor.rebind(path.into());
        self.save()
    }

    /// Moves the backing file to `path`; see [`Persistor::move_to`].
    pub fn move_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let moved = self.persistor.move_to(path.as_ref())?;
        if moved {
            info!(path = %self.persistor.describe(), "document moved");
        }
        Ok(moved)
    }

    /// Deletes the backing file. A later save creates it again.
    pub fn delete_file(&mut self) -> bool {
        self.persistor.delete()
    }

    pub fn path(&self) -> Option<&Path> {
        self.persistor.source()
    }
    pub fn config(&self) -> &KeeperConfig {
        self.persistor.config()
    }
    pub fn root(&self) -> &Element {
        &self.root
    }
    /// The document as it would be written by the next flush.
    pub fn to_xml(&self) -> String {
        let config = self.persistor.config();
        document::to_xml(&self.root, config.indent, config.declaration)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
    /// The kept fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = FieldInfo> + '_ {
        self.fields.iter().map(|(name, entry)| FieldInfo {
            name: name.clone(),
            data_type: entry.binding.data_type(),
            arity: entry.binding.arity(),
            sanitized: entry.binding.is_sanitized(),
            ignore_read_error: entry.ignore_read_error,
        })
    }
}
