//! Configuration options for section-tree mapping and INI output.
//!
//! This module provides types to customize the written form:
//!
//! - [`IniOptions`]: Main configuration struct
//! - [`BoolStyle`]: Spelling of boolean literals
//! - [`NullScalars`]: What an absent scalar field writes
//!
//! Options only affect writing. Reading accepts every form any option can produce.
//!
//! ## Examples
//!
//! ```rust
//! use serde_ini_tree::{to_string_with_options, BoolStyle, IniOptions};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Flags { verbose: bool }
//!
//! let options = IniOptions::new()
//!     .with_bool_style(BoolStyle::Lowercase)
//!     .with_spaced_assignment(false);
//! let ini = to_string_with_options(&Flags { verbose: true }, &options).unwrap();
//! assert_eq!(ini, "[Flags]\nverbose=true\n");
//! ```

/// Spelling used when writing boolean values.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::BoolStyle;
///
/// assert_eq!(BoolStyle::Capitalized.literal(true), "True");
/// assert_eq!(BoolStyle::Lowercase.literal(false), "false");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoolStyle {
    /// `True` / `False`
    #[default]
    Capitalized,
    /// `true` / `false`
    Lowercase,
}

impl BoolStyle {
    /// Returns the literal written for `value`.
    #[must_use]
    pub const fn literal(self, value: bool) -> &'static str {
        match (self, value) {
            (BoolStyle::Capitalized, true) => "True",
            (BoolStyle::Capitalized, false) => "False",
            (BoolStyle::Lowercase, true) => "true",
            (BoolStyle::Lowercase, false) => "false",
        }
    }
}

/// Policy for scalar fields whose value is absent (`None`).
///
/// Absent nested objects never write anything, whatever this policy says.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NullScalars {
    /// Write the key with a null payload (`Key =`).
    #[default]
    Placeholder,
    /// Leave the key out.
    Omit,
}

/// Configuration options for mapping and writing.
///
/// # Examples
///
/// ```rust
/// use serde_ini_tree::{IniOptions, NullScalars};
///
/// let options = IniOptions::new().with_null_scalars(NullScalars::Omit);
/// assert_eq!(options.null_scalars, NullScalars::Omit);
/// assert!(options.spaced_assignment);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IniOptions {
    pub bool_style: BoolStyle,
    pub null_scalars: NullScalars,
    pub spaced_assignment: bool,
}

impl Default for IniOptions {
    fn default() -> Self {
        IniOptions {
            bool_style: BoolStyle::default(),
            null_scalars: NullScalars::default(),
            spaced_assignment: true,
        }
    }
}

impl IniOptions {
    /// Creates default options (`True`/`False`, null placeholders, `key = value`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spelling of boolean literals.
    #[must_use]
    pub fn with_bool_style(mut self, bool_style: BoolStyle) -> Self {
        self.bool_style = bool_style;
        self
    }

    /// Sets what absent scalar fields write.
    #[must_use]
    pub fn with_null_scalars(mut self, null_scalars: NullScalars) -> Self {
        self.null_scalars = null_scalars;
        self
    }

    /// Chooses between `key = value` (`true`) and `key=value` (`false`).
    #[must_use]
    pub fn with_spaced_assignment(mut self, spaced: bool) -> Self {
        self.spaced_assignment = spaced;
        self
    }

    pub(crate) fn assignment(&self) -> &'static str {
        if self.spaced_assignment {
            " = "
        } else {
            "="
        }
    }
}
