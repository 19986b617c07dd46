//! Property descriptors: type, default, enum values, required and read-only.
//!
//! Each descriptor is a property-site annotation; the `Property` accessor
//! reads them back through the class, its instances and subclasses.

pub mod types;

pub use types::{TypeSpec, TypeTag};

use crate::{
    class::{Class, Target},
    meta::{Annotation, Attach, Meta},
    store::{MetadataStore, StoreError},
    value::Value,
};
use thiserror::Error as ThisError;

pub const TYPE_KEY: &str = "model:property:type";
pub const DEFAULT_KEY: &str = "model:property:default";
pub const ENUM_KEY: &str = "model:property:enum_values";
pub const REQUIRED_KEY: &str = "model:property:required";
pub const READ_ONLY_KEY: &str = "model:property:read_only";

///
/// PropertyError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum PropertyError {
    #[error("a property type must be a type tag or a class, found a {found} value")]
    InvalidType { found: &'static str },

    #[error("type '{name}' is not supported; expected one of text, boolean, date, number")]
    UnsupportedType { name: String },
}

///
/// DESCRIPTORS
///

/// Declare a property's type. The native class is what gets stored.
pub fn type_of<'a>(spec: impl Into<TypeSpec<'a>>) -> Result<Attach<Class>, PropertyError> {
    let tag = spec.into().resolve()?;

    Ok(Annotation::from_static(TYPE_KEY).value(tag.class().clone()))
}

#[must_use]
pub fn default_value(value: impl Into<Value>) -> Attach<Value> {
    Annotation::from_static(DEFAULT_KEY).value(value.into())
}

#[must_use]
pub fn enum_values<I>(values: I) -> Attach<Vec<Value>>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Annotation::from_static(ENUM_KEY).value(values.into_iter().map(Into::into).collect())
}

/// Mark a property as required; `message` is reported when it is missing.
#[must_use]
pub fn required(message: impl Into<String>) -> Attach<String> {
    Annotation::from_static(REQUIRED_KEY).value(message.into())
}

#[must_use]
pub fn read_only() -> Attach<bool> {
    Annotation::from_static(READ_ONLY_KEY).value(true)
}

///
/// Property
///

#[derive(Clone, Copy, Debug)]
pub struct Property<'s> {
    store: &'s MetadataStore,
}

impl<'s> Property<'s> {
    #[must_use]
    pub const fn new(store: &'s MetadataStore) -> Self {
        Self { store }
    }

    /// Every property that received any metadata.
    pub fn properties<'a>(&self, target: impl Into<Target<'a>>) -> Result<Vec<String>, StoreError> {
        self.store.properties(target)
    }

    // type

    pub fn get_type<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<Option<Class>, StoreError> {
        self.types().get_property_meta(target, property)
    }

    pub fn get_type_tag<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<Option<TypeTag>, StoreError> {
        Ok(self
            .get_type(target, property)?
            .as_ref()
            .and_then(TypeTag::from_class))
    }

    pub fn has_type<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<bool, StoreError> {
        self.types().has_property_meta(target, property)
    }

    pub fn type_properties<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Vec<String>, StoreError> {
        self.types().properties(target)
    }

    // default

    pub fn get_default<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<Option<Value>, StoreError> {
        self.defaults().get_property_meta(target, property)
    }

    pub fn has_default<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<bool, StoreError> {
        self.defaults().has_property_meta(target, property)
    }

    pub fn default_properties<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Vec<String>, StoreError> {
        self.defaults().properties(target)
    }

    // enum

    pub fn get_enum<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<Option<Vec<Value>>, StoreError> {
        self.enums().get_property_meta(target, property)
    }

    pub fn has_enum<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<bool, StoreError> {
        self.enums().has_property_meta(target, property)
    }

    pub fn enum_properties<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Vec<String>, StoreError> {
        self.enums().properties(target)
    }

    // required

    pub fn get_required_error_message<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<Option<String>, StoreError> {
        self.required().get_property_meta(target, property)
    }

    pub fn is_required<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<bool, StoreError> {
        self.required().has_property_meta(target, property)
    }

    pub fn required_properties<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Vec<String>, StoreError> {
        self.required().properties(target)
    }

    // read only

    pub fn is_read_only<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<bool, StoreError> {
        self.read_only().has_property_meta(target, property)
    }

    pub fn read_only_properties<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Vec<String>, StoreError> {
        self.read_only().properties(target)
    }

    fn types(&self) -> Meta<'s, Class> {
        Meta::from_static(self.store, TYPE_KEY)
    }

    fn defaults(&self) -> Meta<'s, Value> {
        Meta::from_static(self.store, DEFAULT_KEY)
    }

    fn enums(&self) -> Meta<'s, Vec<Value>> {
        Meta::from_static(self.store, ENUM_KEY)
    }

    fn required(&self) -> Meta<'s, String> {
        Meta::from_static(self.store, REQUIRED_KEY)
    }

    fn read_only(&self) -> Meta<'s, bool> {
        Meta::from_static(self.store, READ_ONLY_KEY)
    }
}

///
/// TESTS
///
