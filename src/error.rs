//! Error types for section-tree mapping and INI text handling.
//!
//! ## Error Categories
//!
//! - **Coercion Failures**: a key is present but its text does not fit the field's type
//! - **Shape Errors**: the target type cannot be mapped (not a struct, cyclic, unconstructible)
//! - **Syntax Errors**: malformed INI text, with line/column information
//! - **I/O Errors**: reading or writing failures
//!
//! Missing keys and missing sections are never errors; the field keeps its default.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_ini_tree::{from_str, Error};
//!
//! #[derive(Deserialize, Debug)]
//! struct Server { port: u16 }
//!
//! let result: Result<Server, Error> = from_str("[Server]\nport = 99999");
//! match result {
//!     Err(Error::Coercion { key, .. }) => assert_eq!(key, "port"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while mapping objects to sections and back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed INI text
    #[error("Syntax error at line {line}, column {col}: {msg}\n{context}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
    },

    /// Stored text could not be converted to the field's declared type
    #[error("Cannot coerce {raw:?} to {expected} for key `{key}` in section [{section}]")]
    Coercion {
        section: String,
        key: String,
        expected: String,
        raw: String,
    },

    /// The target type cannot be freshly instantiated by the mapper
    #[error("Type `{type_name}` cannot be constructed: {reason}")]
    Unconstructible { type_name: String, reason: String },

    /// A struct contains itself, directly or through other structs
    #[error("Cyclic shape: `{type_name}` is nested inside itself ({path})")]
    CyclicShape { type_name: String, path: String },

    /// Field type outside the supported scalar/nested categories
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Section name or key that the INI text format cannot represent
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error for the given 1-based line and column.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Error;
    ///
    /// let err = Error::syntax(3, 1, "expected `key = value`", "just text");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str, context: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates a coercion failure for a key whose text does not match its type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Error;
    ///
    /// let err = Error::coercion("Config", "Threshold", "f64", "high");
    /// assert!(err.to_string().contains("[Config]"));
    /// ```
    pub fn coercion(section: &str, key: &str, expected: &str, raw: &str) -> Self {
        Error::Coercion {
            section: section.to_string(),
            key: key.to_string(),
            expected: expected.to_string(),
            raw: raw.to_string(),
        }
    }

    pub fn unconstructible<T: fmt::Display>(type_name: &str, reason: T) -> Self {
        Error::Unconstructible {
            type_name: type_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a cycle error; `path` lists the struct names from the root down.
    pub fn cyclic_shape(type_name: &str, path: &[&str]) -> Self {
        let mut chain = path.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(type_name);
        Error::CyclicShape {
            type_name: type_name.to_string(),
            path: chain,
        }
    }

    pub fn unsupported_type<T: fmt::Display>(msg: T) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    pub fn invalid_name<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidName(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_ini_tree::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors raised while deriving a type's shape.
    #[must_use]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Error::Unconstructible { .. } | Error::CyclicShape { .. } | Error::UnsupportedType(_)
        )
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_shape_path() {
        let err = Error::cyclic_shape("Node", &["Tree", "Node"]);
        assert_eq!(
            err,
            Error::CyclicShape {
                type_name: "Node".to_string(),
                path: "Tree -> Node -> Node".to_string(),
            }
        );
    }

    #[test]
    fn test_coercion_message_names_everything() {
        let msg = Error::coercion("Config.Sub", "Enabled", "bool", "maybe").to_string();
        assert!(msg.contains("Config.Sub"));
        assert!(msg.contains("Enabled"));
        assert!(msg.contains("bool"));
        assert!(msg.contains("\"maybe\""));
    }

    #[test]
    fn test_shape_error_classification() {
        assert!(Error::unconstructible("u32", "not a struct").is_shape_error());
        assert!(Error::unsupported_type("sequence").is_shape_error());
        assert!(!Error::coercion("A", "b", "i8", "x").is_shape_error());
    }
}
