use crate::{
    class::Target,
    config::RegistryConfig,
    meta::{Meta, MetaError},
    model::{CollectionRegistry, Model},
    property::Property,
    store::MetadataStore,
    validate::{Validation, ValidateError, ValidatorRegistry},
};
use std::any::Any;

///
/// Registry
///
/// Everything declarations write into: the metadata store, the validator
/// registry and the collection claims, plus the config steering them.
/// Hosts own one explicitly; the facade crate also keeps a process-wide one.
///

#[derive(Debug, Default)]
pub struct Registry {
    config: RegistryConfig,
    store: MetadataStore,
    validators: ValidatorRegistry,
    collections: CollectionRegistry,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &MetadataStore {
        &self.store
    }

    #[must_use]
    pub const fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    #[must_use]
    pub const fn collections(&self) -> &CollectionRegistry {
        &self.collections
    }

    pub fn meta<T: Any + Clone>(&self, key: impl Into<String>) -> Result<Meta<'_, T>, MetaError> {
        Meta::new(&self.store, key)
    }

    #[must_use]
    pub const fn model(&self) -> Model<'_> {
        Model::new(&self.store)
    }

    #[must_use]
    pub const fn property(&self) -> Property<'_> {
        Property::new(&self.store)
    }

    pub fn validation<'a>(
        &'a self,
        target: impl Into<Target<'a>>,
    ) -> Result<Validation<'a>, ValidateError> {
        Validation::new(self, target)
    }
}
