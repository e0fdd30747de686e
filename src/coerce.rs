//! Text conversions for scalar values.
//!
//! | Category | Written as | Read from |
//! |----------|------------|-----------|
//! | string | the text itself | the text itself |
//! | char | the character | exactly one character |
//! | bool | `True`/`False` or `true`/`false` | either spelling, ASCII case-insensitive |
//! | integers | base-10 digits | base-10 digits, range-checked for the target width |
//! | floats | shortest round-trip decimal with `.` | Rust float syntax, plus `Infinity`/`NaN` |
//! | enum | unit variant name | case-sensitive variant name |
//!
//! Float text never depends on the host locale: Rust's formatting and parsing always
//! use `.` and no digit grouping.

use crate::BoolStyle;
use std::str::FromStr;

pub(crate) fn encode_bool(value: bool, style: BoolStyle) -> String {
    style.literal(value).to_string()
}

pub(crate) fn decode_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn encode_f64(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

pub(crate) fn encode_f32(value: f32) -> String {
    // f32 has its own shortest representation; widening first would print extra digits.
    if value.is_finite() {
        value.to_string()
    } else {
        encode_f64(f64::from(value))
    }
}

/// Integers and floats; `FromStr` enforces width and accepts `Infinity`/`NaN` for floats.
pub(crate) fn decode_number<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

pub(crate) fn decode_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

/// Finds `text` among the declared variant names.
pub(crate) fn decode_variant(text: &str, variants: &'static [&'static str]) -> Option<&'static str> {
    variants.iter().copied().find(|variant| *variant == text)
}
