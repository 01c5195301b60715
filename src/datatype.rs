// used to print out readable forms of a data type
use std::fmt;
// used when reading integers and floats
use std::str::FromStr;

use tracing::debug;

use crate::document::{index_name, Element};
use crate::error::ReadError;

/// A value that lives in the text of a single node.
pub trait Scalar: Sized {
    const DATA_TYPE: &'static str;
    fn to_text(&self) -> String;
    fn from_text(text: &str) -> Result<Self, ReadError>;
    /// Value of a node without text, if the type has one.
    fn from_empty() -> Option<Self> {
        None
    }
}

/// Anything that can be kept in a settings document.
///
/// `read` decodes the node into `self`, `write` replaces the node's content
/// with the encoded value. `ARITY` is the number of independently stored
/// elements, which is only ever above one for fixed-size arrays.
pub trait DataType: Clone {
    const ARITY: usize = 1;
    fn data_type() -> String;
    fn read(&mut self, node: &Element) -> Result<(), ReadError>;
    fn write(&self, node: &mut Element);
}

pub(crate) fn read_scalar<T: Scalar>(node: &Element) -> Result<T, ReadError> {
    match node.text() {
        Some(text) => T::from_text(text),
        None => T::from_empty().ok_or(ReadError::NoTextContent),
    }
}

pub(crate) fn write_scalar<T: Scalar>(value: &T, node: &mut Element) {
    node.clear_children();
    node.set_text(value.to_text());
}

macro_rules! scalar_data_type {
    ($($t:ty),* $(,)?) => {$(
        impl DataType for $t {
            fn data_type() -> String {
                <$t as Scalar>::DATA_TYPE.to_string()
            }
            fn read(&mut self, node: &Element) -> Result<(), ReadError> {
                *self = read_scalar::<$t>(node)?;
                Ok(())
            }
            fn write(&self, node: &mut Element) {
                write_scalar(self, node);
            }
        }
    )*};
}

// ------------- Numbers -------------

fn parse_integer<T>(text: &str, radix_parse: fn(&str, u32) -> Result<T, std::num::ParseIntError>, expected: &'static str) -> Result<T, ReadError>
where
    T: FromStr,
{
    let trimmed = text.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"));
    let parsed = match hex {
        Some(digits) => radix_parse(digits, 16).ok(),
        None => trimmed.parse::<T>().ok(),
    };
    parsed.ok_or_else(|| ReadError::malformed(expected, text))
}

macro_rules! integer_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const DATA_TYPE: &'static str = stringify!($t);
            fn to_text(&self) -> String {
                self.to_string()
            }
            fn from_text(text: &str) -> Result<Self, ReadError> {
                parse_integer(text, <$t>::from_str_radix, Self::DATA_TYPE)
            }
        }
    )*};
}
integer_scalar!(i32, u32, i64, u64);

macro_rules! float_scalar {
    ($($t:ty),* $(,)?) => {$(
        impl Scalar for $t {
            const DATA_TYPE: &'static str = stringify!($t);
            fn to_text(&self) -> String {
                self.to_string()
            }
            fn from_text(text: &str) -> Result<Self, ReadError> {
                text.trim().parse::<$t>().map_err(|_| ReadError::malformed(Self::DATA_TYPE, text))
            }
        }
    )*};
}
float_scalar!(f32, f64);

impl Scalar for bool {
    const DATA_TYPE: &'static str = "bool";
    fn to_text(&self) -> String {
        self.to_string()
    }
    fn from_text(text: &str) -> Result<Self, ReadError> {
        match text.trim() {
            "true" | "True" | "TRUE" => Ok(true),
            "false" | "False" | "FALSE" => Ok(false),
            other => i64::from_text(other)
                .map(|n| n != 0)
                .map_err(|_| ReadError::malformed(Self::DATA_TYPE, text)),
        }
    }
}

// ------------- Text -------------

impl Scalar for String {
    const DATA_TYPE: &'static str = "String";
    fn to_text(&self) -> String {
        self.clone()
    }
    fn from_text(text: &str) -> Result<Self, ReadError> {
        Ok(text.to_string())
    }
    fn from_empty() -> Option<Self> {
        Some(String::new())
    }
}

/// A UTF-16 string, transcoded to UTF-8 in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WideString(pub Vec<u16>);

impl WideString {
    pub fn as_units(&self) -> &[u16] {
        &self.0
    }
}
impl From<&str> for WideString {
    fn from(s: &str) -> Self {
        WideString(s.encode_utf16().collect())
    }
}
impl fmt::Display for WideString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf16_lossy(&self.0))
    }
}
impl Scalar for WideString {
    const DATA_TYPE: &'static str = "WideString";
    fn to_text(&self) -> String {
        self.to_string()
    }
    fn from_text(text: &str) -> Result<Self, ReadError> {
        Ok(WideString::from(text))
    }
    fn from_empty() -> Option<Self> {
        Some(WideString::default())
    }
}

/// A single byte character, stored as the code point of the same value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NarrowChar(pub u8);

impl Scalar for NarrowChar {
    const DATA_TYPE: &'static str = "NarrowChar";
    fn to_text(&self) -> String {
        char::from(self.0).to_string()
    }
    fn from_text(text: &str) -> Result<Self, ReadError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => u8::try_from(c)
                .map(NarrowChar)
                .map_err(|_| ReadError::malformed(Self::DATA_TYPE, text)),
            _ => Err(ReadError::malformed(Self::DATA_TYPE, text)),
        }
    }
}

impl Scalar for char {
    const DATA_TYPE: &'static str = "char";
    fn to_text(&self) -> String {
        self.to_string()
    }
    fn from_text(text: &str) -> Result<Self, ReadError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ReadError::malformed(Self::DATA_TYPE, text)),
        }
    }
}

scalar_data_type!(bool, i32, u32, i64, u64, f32, f64, String, WideString, NarrowChar, char);

// ------------- Fixed arrays -------------

/// `[T; 1]` is stored exactly like `T`. Longer arrays keep element `i` in
/// child `_i`; a missing child leaves that element as it was.
impl<T: DataType, const N: usize> DataType for [T; N] {
    const ARITY: usize = N;
    fn data_type() -> String {
        format!("[{}; {}]", T::data_type(), N)
    }
    fn read(&mut self, node: &Element) -> Result<(), ReadError> {
        if N == 1 {
            return self[0].read(node);
        }
        for (i, item) in self.iter_mut().enumerate() {
            match node.indexed(i) {
                Some(child) => item.read(child)?,
                None => debug!(node = node.name(), index = i, "array element missing, kept"),
            }
        }
        Ok(())
    }
    fn write(&self, node: &mut Element) {
        if N == 1 {
            return self[0].write(node);
        }
        node.clear_children();
        node.clear_text();
        for (i, item) in self.iter().enumerate() {
            item.write(node.push_child(Element::new(index_name(i))));
        }
    }
}
