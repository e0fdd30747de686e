//! # serde_ini_tree
//!
//! A Serde-compatible mapper between typed Rust structs and INI-style section trees.
//!
//! ## How values map to sections
//!
//! - The root struct is written to a section named after its type
//! - Scalar fields (strings, chars, bools, integers, floats, unit-only enums) become
//!   `key = value` pairs in the section of the struct that owns them
//! - A nested struct field becomes its own section, named `<parent>.<field>`
//! - Fields marked `#[serde(skip)]` are never written and never read
//! - Missing keys and sections leave fields at their type default; text that does not
//!   fit a field's type is an error
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_ini_tree = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_ini_tree::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct SubConfig {
//!     #[serde(rename = "Enabled")]
//!     enabled: bool,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Config {
//!     #[serde(rename = "Name")]
//!     name: String,
//!     #[serde(rename = "Threshold")]
//!     threshold: f64,
//!     #[serde(rename = "Sub")]
//!     sub: SubConfig,
//! }
//!
//! let config = Config {
//!     name: "prod".to_string(),
//!     threshold: 0.75,
//!     sub: SubConfig { enabled: true },
//! };
//!
//! let ini = to_string(&config).unwrap();
//! assert_eq!(ini, "[Config]\nName = prod\nThreshold = 0.75\n\n[Config.Sub]\nEnabled = True\n");
//!
//! let config_back: Config = from_str(&ini).unwrap();
//! assert_eq!(config, config_back);
//! ```
//!
//! ### Working with the Section Tree
//!
//! The text layer is optional. [`to_sections`] and [`from_sections`] work on the
//! in-memory [`SectionTree`] directly:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_ini_tree::{from_sections, sections};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Window { width: u32, height: u32, title: Option<String> }
//!
//! let tree = sections! { "Window" => { "width" => 800, "title" => null } };
//! let window: Window = from_sections(&tree).unwrap();
//! assert_eq!(window, Window { width: 800, height: 0, title: None });
//! ```
//!
//! ## Supported Field Types
//!
//! | Category | Rust types |
//! |----------|------------|
//! | string | `String`, `char` |
//! | bool | `bool` |
//! | integers | `i8`..`i128`, `u8`..`u128` |
//! | floats | `f32`, `f64` |
//! | enumerated | enums with only unit variants |
//! | nested | structs (including behind `Box`) |
//!
//! Any of these may be wrapped in `Option` or a newtype struct. Sequences, maps, tuples
//! and enums carrying data are rejected with [`Error::UnsupportedType`].

pub mod de;
pub mod error;
pub mod ini;
pub mod macros;
pub mod options;
pub mod section;
pub mod ser;
pub mod shape;

mod coerce;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use ini::{parse_sections, write_sections};
pub use options::{BoolStyle, IniOptions, NullScalars};
pub use section::{Section, SectionTree};
pub use ser::Serializer;
pub use shape::{FieldDescriptor, Shape, TypeCategory};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serialize any struct into a [`SectionTree`].
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::to_sections;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Point { x: i32, y: i32 }
///
/// let tree = to_sections(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(tree.value("Point", "x"), Some("1"));
/// ```
///
/// # Errors
///
/// Returns an error if `T` is not a struct, its shape is cyclic, or a field has an
/// unsupported type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_sections<T>(value: &T) -> Result<SectionTree>
where
    T: Serialize + DeserializeOwned,
{
    to_sections_with_options(value, &IniOptions::default())
}

/// Serialize any struct into a [`SectionTree`] with custom options.
///
/// # Errors
///
/// Returns an error if `T` is not a struct, its shape is cyclic, or a field has an
/// unsupported type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_sections_with_options<T>(value: &T, options: &IniOptions) -> Result<SectionTree>
where
    T: Serialize + DeserializeOwned,
{
    let shape = Shape::of::<T>()?;
    let mut tree = SectionTree::new();
    value.serialize(Serializer::new(&mut tree, &shape, options))?;
    tracing::debug!(
        root = shape.type_name(),
        sections = tree.len(),
        "serialized to sections"
    );
    Ok(tree)
}

/// Deserialize an instance of `T` from a [`SectionTree`].
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::{from_sections, sections};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let tree = sections! { "Point" => { "x" => 1, "y" => 2 } };
/// let point: Point = from_sections(&tree).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if `T` cannot be constructed by the mapper (checked before any
/// field is read), or [`Error::Coercion`] for the first value that does not fit its
/// field's type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_sections<T>(tree: &SectionTree) -> Result<T>
where
    T: DeserializeOwned,
{
    let shape = Shape::of::<T>()?;
    let value = T::deserialize(Deserializer::new(tree, &shape))?;
    tracing::debug!(root = shape.type_name(), "deserialized from sections");
    Ok(value)
}

/// Serialize any struct to an INI string.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::to_string;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Point { x: i32, y: i32 }
///
/// assert_eq!(to_string(&Point { x: 1, y: 2 }).unwrap(), "[Point]\nx = 1\ny = 2\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be mapped to sections.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: Serialize + DeserializeOwned,
{
    to_string_with_options(value, &IniOptions::default())
}

/// Serialize any struct to an INI string with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be mapped to sections.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &IniOptions) -> Result<String>
where
    T: Serialize + DeserializeOwned,
{
    let tree = to_sections_with_options(value, options)?;
    write_sections(&tree, options)
}

/// Serialize any struct to a writer as INI text.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::to_writer;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert!(buffer.starts_with(b"[Point]"));
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: Serialize + DeserializeOwned,
{
    to_writer_with_options(writer, value, &IniOptions::default())
}

/// Serialize any struct to a writer as INI text with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &IniOptions) -> Result<()>
where
    W: io::Write,
    T: Serialize + DeserializeOwned,
{
    let ini = to_string_with_options(value, options)?;
    writer
        .write_all(ini.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of `T` from INI text.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("[Point]\nx = 1\ny = 2\n").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is not valid INI, or if the sections cannot be
/// deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let tree = parse_sections(s)?;
    from_sections(&tree)
}

/// Deserialize an instance of `T` from an I/O stream of INI text.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"[Point]\nx = 1\ny = 2\n")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid INI, or the sections
/// cannot be deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserialize an instance of `T` from bytes of INI text.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid INI, or cannot be
/// deserialized to `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::custom(e.to_string()))?;
    from_str(s)
}
