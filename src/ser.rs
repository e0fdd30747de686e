//! Object to section-tree serialization.
//!
//! This module provides the [`Serializer`] that walks a value implementing `Serialize`
//! and writes it into a [`SectionTree`]:
//!
//! - **Scalar fields** become `key = text` pairs in the section of their owning struct
//! - **Nested structs** become a child section named `<parent>.<field>`
//! - **Absent scalars** (`None`) write the key with a null payload, unless
//!   [`NullScalars::Omit`](crate::NullScalars::Omit) is set
//! - **Absent nested structs** write nothing at all
//! - **Excluded fields** (unknown to the type's [`Shape`]) are skipped
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_ini_tree::to_sections;
//!
//! #[derive(Serialize, Deserialize)]
//! struct SubConfig { enabled: bool }
//!
//! #[derive(Serialize, Deserialize)]
//! struct Config { name: String, sub: SubConfig }
//!
//! let config = Config { name: "prod".to_string(), sub: SubConfig { enabled: true } };
//! let tree = to_sections(&config).unwrap();
//!
//! assert_eq!(tree.value("Config", "name"), Some("prod"));
//! assert_eq!(tree.value("Config.sub", "enabled"), Some("True"));
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_ini_tree::{IniOptions, SectionTree, Serializer, Shape};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let shape = Shape::of::<Point>().unwrap();
//! let options = IniOptions::new();
//! let mut tree = SectionTree::new();
//! Point { x: 1, y: 2 }
//!     .serialize(Serializer::new(&mut tree, &shape, &options))
//!     .unwrap();
//!
//! assert_eq!(tree.value("Point", "y"), Some("2"));
//! ```

use crate::coerce;
use crate::shape::{FieldDescriptor, Shape};
use crate::{Error, IniOptions, NullScalars, Result, SectionTree};
use serde::{ser, Serialize};

/// Writes a root struct into a [`SectionTree`].
///
/// The root section is named after the shape's type name.
pub struct Serializer<'a> {
    tree: &'a mut SectionTree,
    shape: &'a Shape,
    options: &'a IniOptions,
}

impl<'a> Serializer<'a> {
    pub fn new(tree: &'a mut SectionTree, shape: &'a Shape, options: &'a IniOptions) -> Self {
        Serializer {
            tree,
            shape,
            options,
        }
    }

    fn unsupported(&self, what: &str) -> Error {
        Error::unsupported_type(format!("the root value must be a struct, found {}", what))
    }
}

/// Serializes one field of the struct whose section is `section`.
struct FieldSerializer<'a> {
    tree: &'a mut SectionTree,
    section: &'a str,
    field: &'a FieldDescriptor,
    options: &'a IniOptions,
}

impl<'a> FieldSerializer<'a> {
    fn write(self, text: String) -> Result<()> {
        self.tree
            .section_mut(self.section)
            .insert(self.field.name, Some(text));
        Ok(())
    }

    fn unsupported(&self, what: &str) -> Error {
        Error::unsupported_type(format!(
            "{} value in field `{}` of section [{}]",
            what, self.field.name, self.section
        ))
    }
}

/// Writes the fields of one struct into its section.
pub struct StructSerializer<'a> {
    tree: &'a mut SectionTree,
    section: String,
    shape: &'a Shape,
    options: &'a IniOptions,
}

impl<'a> StructSerializer<'a> {
    fn open(
        tree: &'a mut SectionTree,
        section: String,
        shape: &'a Shape,
        options: &'a IniOptions,
    ) -> Self {
        // The section exists even when the struct has no fields to write.
        tree.section_mut(&section);
        StructSerializer {
            tree,
            section,
            shape,
            options,
        }
    }
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let Some(field) = self.shape.field(key) else {
            tracing::trace!(section = %self.section, key = key, "skipping excluded field");
            return Ok(());
        };

        value.serialize(FieldSerializer {
            tree: &mut *self.tree,
            section: &self.section,
            field,
            options: self.options,
        })
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

macro_rules! serialize_display {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<()> {
                self.write(v.to_string())
            }
        )*
    };
}

macro_rules! reject_compound {
    () => {
        type SerializeSeq = ser::Impossible<(), Error>;
        type SerializeTuple = ser::Impossible<(), Error>;
        type SerializeTupleStruct = ser::Impossible<(), Error>;
        type SerializeTupleVariant = ser::Impossible<(), Error>;
        type SerializeMap = ser::Impossible<(), Error>;
        type SerializeStructVariant = ser::Impossible<(), Error>;

        fn serialize_bytes(self, _v: &[u8]) -> Result<()> {
            Err(self.unsupported("byte string"))
        }

        fn serialize_unit(self) -> Result<()> {
            Err(self.unsupported("unit"))
        }

        fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
            Err(self.unsupported("unit struct"))
        }

        fn serialize_newtype_variant<T>(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _value: &T,
        ) -> Result<()>
        where
            T: ?Sized + Serialize,
        {
            Err(self.unsupported("enum data variant"))
        }

        fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
            Err(self.unsupported("sequence"))
        }

        fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
            Err(self.unsupported("tuple"))
        }

        fn serialize_tuple_struct(
            self,
            _name: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleStruct> {
            Err(self.unsupported("tuple struct"))
        }

        fn serialize_tuple_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeTupleVariant> {
            Err(self.unsupported("enum data variant"))
        }

        fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
            Err(self.unsupported("map"))
        }

        fn serialize_struct_variant(
            self,
            _name: &'static str,
            _variant_index: u32,
            _variant: &'static str,
            _len: usize,
        ) -> Result<Self::SerializeStructVariant> {
            Err(self.unsupported("enum data variant"))
        }
    };
}

impl<'a> ser::Serializer for FieldSerializer<'a> {
    type Ok = ();
    type Error = Error;
    type SerializeStruct = StructSerializer<'a>;

    reject_compound!();

    fn serialize_bool(self, v: bool) -> Result<()> {
        let text = coerce::encode_bool(v, self.options.bool_style);
        self.write(text)
    }

    serialize_display! {
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.write(coerce::encode_f32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<()> {
        self.write(coerce::encode_f64(v))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        self.write(v.to_string())
    }

    fn serialize_none(self) -> Result<()> {
        if self.field.category.is_nested() {
            tracing::trace!(section = self.section, key = self.field.name, "absent nested object");
            return Ok(());
        }
        match self.options.null_scalars {
            NullScalars::Placeholder => {
                self.tree
                    .section_mut(self.section)
                    .insert(self.field.name, None);
            }
            NullScalars::Omit => {
                tracing::trace!(section = self.section, key = self.field.name, "omitting absent scalar");
            }
        }
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<()> {
        self.write(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        let field = self.field;
        let shape = field.category.shape().ok_or_else(|| {
            Error::custom(format!(
                "field `{}` serializes as a struct but its shape is {}",
                field.name, field.category
            ))
        })?;
        let child = format!("{}.{}", self.section, field.name);
        Ok(StructSerializer::open(self.tree, child, shape, self.options))
    }
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = ();
    type Error = Error;
    type SerializeStruct = StructSerializer<'a>;

    reject_compound!();

    fn serialize_bool(self, _v: bool) -> Result<()> {
        Err(self.unsupported("bool"))
    }

    fn serialize_i64(self, _v: i64) -> Result<()> {
        Err(self.unsupported("integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<()> {
        Err(self.unsupported("integer"))
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_f32(self, _v: f32) -> Result<()> {
        Err(self.unsupported("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(self.unsupported("float"))
    }

    fn serialize_char(self, _v: char) -> Result<()> {
        Err(self.unsupported("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<()> {
        Err(self.unsupported("string"))
    }

    fn serialize_none(self) -> Result<()> {
        Err(self.unsupported("absent value"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported("optional value"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<()> {
        Err(self.unsupported("enum"))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        let section = self.shape.type_name().to_string();
        Ok(StructSerializer::open(
            self.tree,
            section,
            self.shape,
            self.options,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize)]
    struct Inner {
        level: u8,
    }

    #[derive(Serialize, Deserialize)]
    struct Outer {
        label: Option<String>,
        inner: Option<Inner>,
    }

    fn serialize<T>(value: &T, options: &IniOptions) -> Result<SectionTree>
    where
        T: Serialize + for<'de> Deserialize<'de>,
    {
        let shape = Shape::of::<T>()?;
        let mut tree = SectionTree::new();
        value.serialize(Serializer::new(&mut tree, &shape, options))?;
        Ok(tree)
    }

    #[test]
    fn test_absent_scalar_writes_placeholder() {
        let outer = Outer {
            label: None,
            inner: None,
        };
        let tree = serialize(&outer, &IniOptions::new()).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.section("Outer").unwrap().get("label"), Some(None));
        assert!(!tree.section("Outer").unwrap().contains_key("inner"));
        assert!(!tree.contains_section("Outer.inner"));
    }

    #[test]
    fn test_absent_scalar_omitted() {
        let outer = Outer {
            label: None,
            inner: Some(Inner { level: 3 }),
        };
        let options = IniOptions::new().with_null_scalars(NullScalars::Omit);
        let tree = serialize(&outer, &options).unwrap();
        assert!(tree.section("Outer").unwrap().is_empty());
        assert_eq!(tree.value("Outer.inner", "level"), Some("3"));
    }

    #[test]
    fn test_root_section_precedes_children() {
        let outer = Outer {
            label: Some("x".to_string()),
            inner: Some(Inner { level: 1 }),
        };
        let tree = serialize(&outer, &IniOptions::new()).unwrap();
        let names: Vec<_> = tree.names().cloned().collect();
        assert_eq!(names, vec!["Outer", "Outer.inner"]);
    }

    #[test]
    fn test_root_must_be_struct() {
        let shape = Shape::of::<Outer>().unwrap();
        let options = IniOptions::new();
        let mut tree = SectionTree::new();
        let err = 42u32
            .serialize(Serializer::new(&mut tree, &shape, &options))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }
}
