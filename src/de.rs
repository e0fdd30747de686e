//! Section-tree to object deserialization.
//!
//! This module provides the [`Deserializer`] that rebuilds a value implementing
//! `Deserialize` from a [`SectionTree`], guided by the value's [`Shape`]:
//!
//! - Every field of the shape is offered to the visitor, in declaration order
//! - **Scalar fields** are read from their key and coerced to the declared type
//! - **Nested structs** are read from the child section `<section>.<field>`
//! - **Missing keys and sections** leave the field at its type default; an
//!   `Option` nested struct stays `None` rather than becoming an empty object
//! - **Text that does not fit** the field's type aborts with [`Error::Coercion`]
//!
//! Keys present in the tree but unknown to the shape are ignored.
//!
//! ## Usage
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_ini_tree::{from_sections, sections};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Limits { max: u32, min: u32 }
//!
//! let tree = sections! { "Limits" => { "max" => "10" } };
//! let limits: Limits = from_sections(&tree).unwrap();
//! assert_eq!(limits, Limits { max: 10, min: 0 });
//! ```

use crate::coerce;
use crate::shape::{FieldDescriptor, Shape, TypeCategory};
use crate::{Error, Result, SectionTree};
use serde::de::value::StrDeserializer;
use serde::de::{self, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// Reads a root struct out of a [`SectionTree`].
///
/// Created via [`Deserializer::new`] with a shape obtained from [`Shape::of`].
pub struct Deserializer<'a> {
    tree: &'a SectionTree,
    shape: &'a Shape,
}

impl<'a> Deserializer<'a> {
    pub fn new(tree: &'a SectionTree, shape: &'a Shape) -> Self {
        Deserializer { tree, shape }
    }
}

fn key_deserializer(name: &str) -> StrDeserializer<'_, Error> {
    name.into_deserializer()
}

impl<'de, 'a> de::Deserializer<'de> for Deserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let section = self.shape.type_name().to_string();
        if !self.tree.contains_section(&section) {
            tracing::debug!(section = %section, "root section missing; using defaults");
        }
        visitor.visit_map(FieldAccess::new(self.tree, section, self.shape))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// Offers each field of a shape, in order, to a struct visitor.
struct FieldAccess<'a> {
    tree: &'a SectionTree,
    section: String,
    fields: std::slice::Iter<'a, FieldDescriptor>,
    current: Option<&'a FieldDescriptor>,
}

impl<'a> FieldAccess<'a> {
    fn new(tree: &'a SectionTree, section: String, shape: &'a Shape) -> Self {
        FieldAccess {
            tree,
            section,
            fields: shape.fields().iter(),
            current: None,
        }
    }
}

impl<'de, 'a> de::MapAccess<'de> for FieldAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(field) => {
                self.current = Some(field);
                seed.deserialize(key_deserializer(field.name)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.current.take() {
            Some(field) => seed.deserialize(FieldDeserializer {
                tree: self.tree,
                section: &self.section,
                field,
            }),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Deserializes one field of the struct stored in `section`.
struct FieldDeserializer<'a> {
    tree: &'a SectionTree,
    section: &'a str,
    field: &'a FieldDescriptor,
}

impl<'a> FieldDeserializer<'a> {
    /// Stored text; a missing key and a null payload both read as `None`.
    fn text(&self) -> Option<&'a str> {
        let text = self.tree.value(self.section, self.field.name);
        if text.is_none() {
            tracing::trace!(
                section = self.section,
                key = self.field.name,
                "no value; leaving default"
            );
        }
        text
    }

    fn child_section(&self) -> String {
        format!("{}.{}", self.section, self.field.name)
    }

    fn coercion_error(&self, expected: &str, raw: &str) -> Error {
        Error::coercion(self.section, self.field.name, expected, raw)
    }

    fn coerce<T>(&self, expected: &str, decode: impl FnOnce(&str) -> Option<T>) -> Result<Option<T>> {
        match self.text() {
            Some(raw) => decode(raw)
                .map(Some)
                .ok_or_else(|| self.coercion_error(expected, raw)),
            None => Ok(None),
        }
    }

    fn nested_shape(&self) -> Result<&'a Shape> {
        let field = self.field;
        field.category.shape().ok_or_else(|| {
            Error::custom(format!(
                "field `{}` deserializes as a struct but its shape is {}",
                field.name, field.category
            ))
        })
    }

    fn unsupported(&self, what: &str) -> Error {
        Error::unsupported_type(format!(
            "{} value in field `{}` of section [{}]",
            what, self.field.name, self.section
        ))
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                let value = self.coerce(stringify!($ty), coerce::decode_number::<$ty>)?;
                visitor.$visit(value.unwrap_or_default())
            }
        )*
    };
}

macro_rules! deserialize_unsupported {
    ($($method:ident($($arg:ident: $ty:ty),*) => $what:literal),* $(,)?) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* _visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                Err(self.unsupported($what))
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for FieldDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let field = self.field;
        match &field.category {
            TypeCategory::String => self.deserialize_string(visitor),
            TypeCategory::Char => self.deserialize_char(visitor),
            TypeCategory::Bool => self.deserialize_bool(visitor),
            TypeCategory::Signed(8) => self.deserialize_i8(visitor),
            TypeCategory::Signed(16) => self.deserialize_i16(visitor),
            TypeCategory::Signed(32) => self.deserialize_i32(visitor),
            TypeCategory::Signed(128) => self.deserialize_i128(visitor),
            TypeCategory::Signed(_) => self.deserialize_i64(visitor),
            TypeCategory::Unsigned(8) => self.deserialize_u8(visitor),
            TypeCategory::Unsigned(16) => self.deserialize_u16(visitor),
            TypeCategory::Unsigned(32) => self.deserialize_u32(visitor),
            TypeCategory::Unsigned(128) => self.deserialize_u128(visitor),
            TypeCategory::Unsigned(_) => self.deserialize_u64(visitor),
            TypeCategory::Float32 => self.deserialize_f32(visitor),
            TypeCategory::Float64 => self.deserialize_f64(visitor),
            TypeCategory::Enumerated { name, variants } => {
                self.deserialize_enum(*name, *variants, visitor)
            }
            TypeCategory::Nested(shape) => self.deserialize_struct(shape.type_name(), &[], visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let value = self.coerce("bool", coerce::decode_bool)?;
        visitor.visit_bool(value.unwrap_or_default())
    }

    deserialize_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let value = self.coerce("char", coerce::decode_char)?;
        visitor.visit_char(value.unwrap_or_default())
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_str(self.text().unwrap_or_default())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let present = if self.field.category.is_nested() {
            self.tree.contains_section(&self.child_section())
        } else {
            self.text().is_some()
        };

        if present {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let shape = self.nested_shape()?;
        let child = self.child_section();
        if !self.tree.contains_section(&child) {
            tracing::trace!(section = %child, "nested section missing; using defaults");
        }
        visitor.visit_map(FieldAccess::new(self.tree, child, shape))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let expected = format!("enum {}", name);
        let variant = self
            .coerce(&expected, |raw| coerce::decode_variant(raw, variants))?
            .or_else(|| variants.first().copied())
            .ok_or_else(|| Error::unconstructible(name, "enum has no variants"))?;
        visitor.visit_enum(key_deserializer(variant))
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    deserialize_unsupported! {
        deserialize_bytes() => "byte string",
        deserialize_byte_buf() => "byte string",
        deserialize_unit() => "unit",
        deserialize_unit_struct(_name: &'static str) => "unit struct",
        deserialize_seq() => "sequence",
        deserialize_tuple(_len: usize) => "tuple",
        deserialize_tuple_struct(_name: &'static str, _len: usize) => "tuple struct",
        deserialize_map() => "map",
        deserialize_identifier() => "identifier",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    enum Mode {
        Fast,
        Safe,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Limits {
        max: u8,
        mode: Mode,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Job {
        name: String,
        note: Option<String>,
        limits: Limits,
        fallback: Option<Limits>,
    }

    fn read<T: de::DeserializeOwned>(tree: &SectionTree) -> Result<T> {
        let shape = Shape::of::<T>()?;
        T::deserialize(Deserializer::new(tree, &shape))
    }

    #[test]
    fn test_missing_everything_gives_defaults() {
        let job: Job = read(&SectionTree::new()).unwrap();
        assert_eq!(
            job,
            Job {
                name: String::new(),
                note: None,
                limits: Limits {
                    max: 0,
                    mode: Mode::Fast
                },
                fallback: None,
            }
        );
    }

    #[test]
    fn test_null_payload_reads_as_absent() {
        let tree = sections! {
            "Job" => { "name" => null, "note" => null },
        };
        let job: Job = read(&tree).unwrap();
        assert_eq!(job.name, "");
        assert_eq!(job.note, None);
    }

    #[test]
    fn test_empty_string_is_present() {
        let tree = sections! {
            "Job" => { "note" => "" },
        };
        let job: Job = read(&tree).unwrap();
        assert_eq!(job.note, Some(String::new()));
    }

    #[test]
    fn test_optional_nested_needs_section() {
        let tree = sections! {
            "Job" => { "name" => "nightly" },
            "Job.fallback" => { "mode" => "Safe" },
        };
        let job: Job = read(&tree).unwrap();
        assert_eq!(
            job.fallback,
            Some(Limits {
                max: 0,
                mode: Mode::Safe
            })
        );
    }

    #[test]
    fn test_out_of_range_is_coercion_failure() {
        let tree = sections! {
            "Job.limits" => { "max" => "300" },
        };
        let err = read::<Job>(&tree).unwrap_err();
        assert_eq!(err, Error::coercion("Job.limits", "max", "u8", "300"));
    }

    #[test]
    fn test_unknown_variant_is_coercion_failure() {
        let tree = sections! {
            "Job.limits" => { "mode" => "fast" },
        };
        let err = read::<Job>(&tree).unwrap_err();
        assert_eq!(err, Error::coercion("Job.limits", "mode", "enum Mode", "fast"));
    }

    #[test]
    fn test_first_failure_wins() {
        let tree = sections! {
            "Job.limits" => { "max" => "x", "mode" => "y" },
        };
        match read::<Job>(&tree) {
            Err(Error::Coercion { key, .. }) => assert_eq!(key, "max"),
            other => panic!("Expected coercion failure, got {:?}", other),
        }
    }
}
