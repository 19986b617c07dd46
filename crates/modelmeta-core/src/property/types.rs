use crate::{
    class::{Class, Native},
    property::PropertyError,
    value::Value,
};
use derive_more::Display;
use std::str::FromStr;

///
/// TypeTag
///
/// The property types a model may declare. Each maps onto a native class.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum TypeTag {
    #[display("text")]
    Text,
    #[display("boolean")]
    Boolean,
    #[display("date")]
    Date,
    #[display("number")]
    Number,
}

impl TypeTag {
    pub const ALL: [Self; 4] = [Self::Text, Self::Boolean, Self::Date, Self::Number];

    #[must_use]
    pub fn from_class(class: &Class) -> Option<Self> {
        match class.native_kind()? {
            Native::Text => Some(Self::Text),
            Native::Boolean => Some(Self::Boolean),
            Native::Date => Some(Self::Date),
            Native::Number => Some(Self::Number),
            Native::Object => None,
        }
    }

    #[must_use]
    pub fn class(self) -> &'static Class {
        match self {
            Self::Text => Class::text(),
            Self::Boolean => Class::boolean(),
            Self::Date => Class::date(),
            Self::Number => Class::number(),
        }
    }
}

impl FromStr for TypeTag {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "string" => Ok(Self::Text),
            "boolean" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            "number" => Ok(Self::Number),
            _ => Err(PropertyError::UnsupportedType {
                name: s.to_string(),
            }),
        }
    }
}

///
/// TypeSpec
///
/// Argument accepted by `type_of`: a tag, a class, or an arbitrary value
/// (text values are read as tags).
///

#[derive(Clone, Copy, Debug)]
pub enum TypeSpec<'a> {
    Tag(&'a str),
    Known(TypeTag),
    Class(&'a Class),
    Value(&'a Value),
}

impl TypeSpec<'_> {
    pub fn resolve(self) -> Result<TypeTag, PropertyError> {
        match self {
            Self::Tag(tag) => tag.parse(),
            Self::Known(tag) => Ok(tag),
            Self::Class(class) => {
                TypeTag::from_class(class).ok_or_else(|| PropertyError::UnsupportedType {
                    name: class.name().to_string(),
                })
            }
            Self::Value(Value::Text(tag)) => tag.parse(),
            Self::Value(value) => Err(PropertyError::InvalidType {
                found: value.type_name(),
            }),
        }
    }
}

impl<'a> From<&'a str> for TypeSpec<'a> {
    fn from(tag: &'a str) -> Self {
        Self::Tag(tag)
    }
}

impl<'a> From<&'a String> for TypeSpec<'a> {
    fn from(tag: &'a String) -> Self {
        Self::Tag(tag)
    }
}

impl From<TypeTag> for TypeSpec<'_> {
    fn from(tag: TypeTag) -> Self {
        Self::Known(tag)
    }
}

impl<'a> From<&'a Class> for TypeSpec<'a> {
    fn from(class: &'a Class) -> Self {
        Self::Class(class)
    }
}

impl<'a> From<&'a Value> for TypeSpec<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Value(value)
    }
}

///
/// TESTS
///
