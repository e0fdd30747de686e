//! Field model: the static shape of a mappable type.
//!
//! A [`Shape`] lists, in declaration order, the fields of a struct that take part in
//! mapping, each with its [`TypeCategory`]. Shapes are derived from the type's
//! `Deserialize` implementation (normally `#[derive(Deserialize)]`) by driving it with
//! a recording deserializer, so the field table comes from compile-time generated code
//! rather than from runtime reflection.
//!
//! Fields marked `#[serde(skip)]` are excluded: serde never reports them, so they are
//! absent from the shape and ignored in both directions.
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_ini_tree::{Shape, TypeCategory};
//!
//! #[derive(Deserialize)]
//! struct SubConfig { enabled: bool }
//!
//! #[derive(Deserialize)]
//! struct Config {
//!     name: String,
//!     threshold: f64,
//!     sub: SubConfig,
//!     #[serde(skip)]
//!     cache: Vec<u8>,
//! }
//!
//! let shape = Shape::of::<Config>().unwrap();
//! assert_eq!(shape.type_name(), "Config");
//! let names: Vec<_> = shape.fields().iter().map(|f| f.name).collect();
//! assert_eq!(names, vec!["name", "threshold", "sub"]);
//! assert_eq!(shape.field("threshold").unwrap().category, TypeCategory::Float64);
//! assert!(shape.field("sub").unwrap().category.is_nested());
//! ```

use crate::{Error, Result};
use serde::de::value::StrDeserializer;
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use std::fmt;

/// The field schema of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

/// One mappable field of a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Serde name of the field; used verbatim as key or section-name suffix.
    pub name: &'static str,
    pub category: TypeCategory,
    /// The field is an `Option`, so it can be absent.
    pub nullable: bool,
}

/// How a field maps onto the section tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeCategory {
    String,
    Char,
    Bool,
    /// Signed integer of the given bit width.
    Signed(u8),
    /// Unsigned integer of the given bit width.
    Unsigned(u8),
    Float32,
    Float64,
    /// Unit-only enum, written by variant name.
    Enumerated {
        name: &'static str,
        variants: &'static [&'static str],
    },
    /// A struct written to its own child section.
    Nested(Shape),
}

impl Shape {
    /// Derives the shape of `T`.
    ///
    /// # Errors
    ///
    /// - [`Error::Unconstructible`] if `T` is not a struct, contains an enum without
    ///   variants, or has a field whose `Deserialize` rejects that field's default value
    /// - [`Error::CyclicShape`] if a struct is nested inside itself
    /// - [`Error::UnsupportedType`] for sequences, maps, tuples, bytes and other
    ///   non-scalar fields
    pub fn of<T: DeserializeOwned>() -> Result<Shape> {
        let type_name = std::any::type_name::<T>();
        let mut path = Vec::new();
        let mut traced = Traced::default();

        T::deserialize(Tracer {
            path: &mut path,
            traced: &mut traced,
        })
        .map_err(|e| match e {
            Error::Custom(reason) => Error::unconstructible(type_name, reason),
            other => other,
        })?;

        match traced {
            Traced {
                category: Some(TypeCategory::Nested(shape)),
                nullable: false,
            } => {
                tracing::trace!(
                    type_name = shape.type_name,
                    fields = shape.fields.len(),
                    "traced shape"
                );
                Ok(shape)
            }
            Traced {
                category: Some(category),
                nullable,
            } => {
                let found = if nullable {
                    format!("optional {}", category)
                } else {
                    category.to_string()
                };
                Err(Error::unconstructible(
                    type_name,
                    format!("the root must be a struct, found {}", found),
                ))
            }
            Traced { category: None, .. } => Err(Error::unconstructible(
                type_name,
                "the root must be a struct",
            )),
        }
    }

    /// The serde container name; the root section of a serialized value uses it.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Mappable fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by serde name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TypeCategory {
    #[inline]
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(self, TypeCategory::Nested(_))
    }

    /// The nested shape, if this is a nested-object category.
    #[must_use]
    pub fn shape(&self) -> Option<&Shape> {
        match self {
            TypeCategory::Nested(shape) => Some(shape),
            _ => None,
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCategory::String => write!(f, "string"),
            TypeCategory::Char => write!(f, "char"),
            TypeCategory::Bool => write!(f, "bool"),
            TypeCategory::Signed(bits) => write!(f, "i{}", bits),
            TypeCategory::Unsigned(bits) => write!(f, "u{}", bits),
            TypeCategory::Float32 => write!(f, "f32"),
            TypeCategory::Float64 => write!(f, "f64"),
            TypeCategory::Enumerated { name, .. } => write!(f, "enum {}", name),
            TypeCategory::Nested(shape) => write!(f, "struct {}", shape.type_name),
        }
    }
}

#[derive(Default)]
struct Traced {
    category: Option<TypeCategory>,
    nullable: bool,
}

/// A struct on the path from the root down to the value being traced.
struct Frame {
    /// Serde container name.
    name: &'static str,
    /// Type name of the derived visitor; carries the module path and generic arguments,
    /// so two structs sharing a serde name, or one generic struct at two instantiations,
    /// never collide.
    visitor: &'static str,
}

/// Records the category a `Deserialize` impl asks for and hands back its default.
struct Tracer<'t> {
    path: &'t mut Vec<Frame>,
    traced: &'t mut Traced,
}

impl<'t> Tracer<'t> {
    fn record(self, category: TypeCategory) {
        self.traced.category = Some(category);
    }
}

fn key_deserializer(name: &str) -> StrDeserializer<'_, Error> {
    name.into_deserializer()
}

macro_rules! trace_scalar {
    ($($method:ident => $visit:ident($default:expr): $category:expr),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                self.record($category);
                visitor.$visit($default)
            }
        )*
    };
}

macro_rules! trace_unsupported {
    ($($method:ident($($arg:ident: $ty:ty),*) => $what:literal),* $(,)?) => {
        $(
            fn $method<V>(self, $($arg: $ty,)* _visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                Err(Error::unsupported_type(concat!($what, " fields cannot be mapped to sections")))
            }
        )*
    };
}

impl<'de, 't> de::Deserializer<'de> for Tracer<'t> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::unsupported_type(
            "self-describing (untyped) fields cannot be mapped to sections",
        ))
    }

    trace_scalar! {
        deserialize_bool => visit_bool(false): TypeCategory::Bool,
        deserialize_i8 => visit_i8(0): TypeCategory::Signed(8),
        deserialize_i16 => visit_i16(0): TypeCategory::Signed(16),
        deserialize_i32 => visit_i32(0): TypeCategory::Signed(32),
        deserialize_i64 => visit_i64(0): TypeCategory::Signed(64),
        deserialize_i128 => visit_i128(0): TypeCategory::Signed(128),
        deserialize_u8 => visit_u8(0): TypeCategory::Unsigned(8),
        deserialize_u16 => visit_u16(0): TypeCategory::Unsigned(16),
        deserialize_u32 => visit_u32(0): TypeCategory::Unsigned(32),
        deserialize_u64 => visit_u64(0): TypeCategory::Unsigned(64),
        deserialize_u128 => visit_u128(0): TypeCategory::Unsigned(128),
        deserialize_f32 => visit_f32(0.0): TypeCategory::Float32,
        deserialize_f64 => visit_f64(0.0): TypeCategory::Float64,
        deserialize_char => visit_char('\0'): TypeCategory::Char,
        deserialize_str => visit_str(""): TypeCategory::String,
        deserialize_string => visit_str(""): TypeCategory::String,
    }

    trace_unsupported! {
        deserialize_bytes() => "byte string",
        deserialize_byte_buf() => "byte string",
        deserialize_unit() => "unit",
        deserialize_unit_struct(_name: &'static str) => "unit struct",
        deserialize_seq() => "sequence",
        deserialize_tuple(_len: usize) => "tuple",
        deserialize_tuple_struct(_name: &'static str, _len: usize) => "tuple struct",
        deserialize_map() => "map",
        deserialize_identifier() => "identifier",
        deserialize_ignored_any() => "ignored",
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.traced.nullable = true;
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let visitor_type = std::any::type_name::<V>();
        if self.path.iter().any(|frame| frame.visitor == visitor_type) {
            let names: Vec<&str> = self.path.iter().map(|frame| frame.name).collect();
            return Err(Error::cyclic_shape(name, &names));
        }

        self.path.push(Frame {
            name,
            visitor: visitor_type,
        });
        let mut access = TraceFields {
            path: &mut *self.path,
            fields: fields.iter(),
            current: None,
            traced: Vec::with_capacity(fields.len()),
        };
        let value = visitor.visit_map(&mut access);
        let fields = access.traced;
        self.path.pop();

        let value = value?;
        self.traced.category = Some(TypeCategory::Nested(Shape {
            type_name: name,
            fields,
        }));
        Ok(value)
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
        let first = variants
            .first()
            .ok_or_else(|| Error::unconstructible(name, "enum has no variants"))?;
        self.traced.category = Some(TypeCategory::Enumerated { name, variants });
        visitor
            .visit_enum(key_deserializer(first))
            .map_err(|_| {
                Error::unsupported_type(format!(
                    "enum `{}` must have only unit variants to be mapped by name",
                    name
                ))
            })
    }
}

/// Feeds every declared field of a struct to its visitor, tracing each value.
struct TraceFields<'t> {
    path: &'t mut Vec<Frame>,
    fields: std::slice::Iter<'static, &'static str>,
    current: Option<&'static str>,
    traced: Vec<FieldDescriptor>,
}

impl<'de, 't> de::MapAccess<'de> for TraceFields<'t> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(&name) => {
                self.current = Some(name);
                seed.deserialize(key_deserializer(name)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name = self
            .current
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;

        let owner = self.path.last().map_or("", |frame| frame.name);
        let mut traced = Traced::default();
        let value = seed
            .deserialize(Tracer {
                path: &mut *self.path,
                traced: &mut traced,
            })
            .map_err(|e| match e {
                Error::UnsupportedType(msg) => {
                    Error::UnsupportedType(format!("field `{}`: {}", name, msg))
                }
                Error::Custom(reason) => Error::unconstructible(
                    owner,
                    format!("field `{}` rejects its default value: {}", name, reason),
                ),
                other => other,
            })?;

        let category = traced.category.ok_or_else(|| {
            Error::unsupported_type(format!("field `{}` has no mappable type", name))
        })?;
        self.traced.push(FieldDescriptor {
            name,
            category,
            nullable: traced.nullable,
        });
        Ok(value)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}
