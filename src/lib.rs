//! Fieldkeeper – member variables that persist themselves to an XML settings file.
//!
//! An object hands the keeper shared handles to its own fields, each under a
//! unique name. The keeper keeps those fields in step with one document:
//! * Registering a field loads it from the document when the document already
//!   holds it, and otherwise seeds the document with the field's value.
//! * [`keeper::FieldKeeper::reload_all`] reads the whole file again and
//!   reports every field that could not be loaded.
//! * [`keeper::FieldKeeper::save`] writes every field back in name order.
//!
//! ## Modules
//! * [`keeper`] – The [`keeper::FieldKeeper`] registry and document session.
//! * [`field`] – [`field::Field`], the handle shared by owner and keeper.
//! * [`datatype`] – The [`datatype::DataType`] and [`datatype::Scalar`] traits
//!   with the provided scalar types and fixed-size arrays.
//! * [`container`] – Sequences, sets, maps, multi-sets, multi-maps and pairs.
//! * [`sanitize`] – [`sanitize::Sanitizer`] and the stock sanitizers.
//! * [`document`] – The element tree and its XML reader and writer.
//! * [`persist`] – The [`persist::Persistor`] that owns the backing file.
//! * [`config`] – [`config::KeeperConfig`] for the written layout.
//!
//! ## Document layout
//! The root element `Settings` holds one child per field. Scalars are stored
//! as text. Anything with several items stores them in children named
//! `_0, _1, ...`; a map key child keeps its value in a nested `_0`, and a pair
//! keeps its members in `_0` and `_1`:
//! ```xml
//! <Settings>
//!     <limits><_0>low<_0>1</_0></_0><_1>high<_0>9</_0></_1></limits>
//!     <volume>7</volume>
//! </Settings>
//! ```
//!
//! ## Quick Start
//! ```
//! use fieldkeeper::{keeper::FieldKeeper, field::Field, sanitize::{clamp, Sanitizer}};
//! let volume = Field::new(42);
//! let mut keeper = FieldKeeper::in_memory();
//! keeper.keep_sanitized("volume", &volume, false, Sanitizer::new(clamp, (0, 10))).unwrap();
//! assert_eq!(volume.get(), 10);
//! assert_eq!(keeper.root().child("volume").and_then(|n| n.text()), Some("10"));
//! ```
//!
//! ## Errors
//! Registering an invalid or duplicate name is a programming error and
//! panics. Everything else is reported through [`error::KeeperError`].

pub mod config;
pub mod container;
pub mod datatype;
pub mod document;
pub mod error;
pub mod field;
pub mod keeper;
pub mod persist;
pub mod sanitize;

pub use crate::config::KeeperConfig;
pub use crate::container::{MultiMap, MultiSet};
pub use crate::datatype::{DataType, NarrowChar, Scalar, WideString};
pub use crate::error::{FieldFailure, KeeperError, ReadError, Result};
pub use crate::field::Field;
pub use crate::keeper::{FieldInfo, FieldKeeper};
pub use crate::sanitize::Sanitizer;
