//! Model naming: collection, namespace and route.
//!
//! Namespace and route are plain class metadata on the annotated class.
//! A collection always belongs to the root of the annotated class's chain,
//! so every class in a hierarchy reports the same collection.

use crate::{
    Error,
    class::{Class, ClassId, Target, constructor_chain},
    meta::{Annotation, Attach, Meta},
    registry::Registry,
    store::{MetadataStore, Site, StoreError},
};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard},
};
use thiserror::Error as ThisError;

pub const COLLECTION_KEY: &str = "model:collection";
pub const NAMESPACE_KEY: &str = "model:namespace";
pub const ROUTE_KEY: &str = "model:route";

///
/// ModelError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ModelError {
    #[error("class '{root}' is already named '{existing}', cannot rename it to '{requested}'")]
    CollectionConflict {
        root: String,
        existing: String,
        requested: String,
    },

    #[error("collection '{name}' is already claimed by class '{owner}'")]
    DuplicateCollection { name: String, owner: String },
}

///
/// CollectionRegistry
///
/// Which root class owns which collection name. Both directions are kept
/// under one lock so a claim is a single check-then-insert.
///

#[derive(Debug, Default)]
pub struct CollectionRegistry {
    claims: RwLock<Claims>,
}

#[derive(Debug, Default)]
struct Claims {
    by_name: HashMap<String, Class>,
    by_root: HashMap<ClassId, String>,
}

impl CollectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for `root`. Returns false when the same root already
    /// holds that name.
    pub fn claim(&self, name: &str, root: &Class) -> Result<bool, ModelError> {
        let mut claims = self.claims.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(owner) = claims.by_name.get(name) {
            if owner == root {
                return Ok(false);
            }

            return Err(ModelError::DuplicateCollection {
                name: name.to_string(),
                owner: owner.to_string(),
            });
        }
        if let Some(existing) = claims.by_root.get(&root.id()) {
            return Err(ModelError::CollectionConflict {
                root: root.to_string(),
                existing: existing.clone(),
                requested: name.to_string(),
            });
        }

        claims.by_name.insert(name.to_string(), root.clone());
        claims.by_root.insert(root.id(), name.to_string());

        tracing::debug!(collection = name, root = %root, "collection claimed");

        Ok(true)
    }

    #[must_use]
    pub fn owner(&self, name: &str) -> Option<Class> {
        self.read().by_name.get(name).cloned()
    }

    #[must_use]
    pub fn name_of(&self, root: &Class) -> Option<String> {
        self.read().by_root.get(&root.id()).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().by_name.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Claims> {
        self.claims.read().unwrap_or_else(PoisonError::into_inner)
    }
}

///
/// Collection
///

#[derive(Clone, Debug)]
pub struct Collection {
    name: String,
}

pub fn collection(name: impl Into<String>) -> Collection {
    Collection { name: name.into() }
}

impl Collection {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name the root of the target's chain. Plain objects have no chain and
    /// are left alone.
    pub fn to_class<'a>(
        &self,
        registry: &Registry,
        target: impl Into<Target<'a>>,
    ) -> Result<(), Error> {
        let target = target.into();
        if target.is_missing() {
            return Err(StoreError::MissingTarget.into());
        }
        let Some(root) = constructor_chain(target).pop() else {
            return Ok(());
        };

        // an already-held claim has already been written
        if registry.config().unique_collections
            && !registry.collections().claim(&self.name, &root)?
        {
            return Ok(());
        }

        registry
            .store()
            .set(COLLECTION_KEY, self.name.clone(), &root, Site::Class)?;

        Ok(())
    }
}

/// Class-level namespace; the last write wins.
#[must_use]
pub fn namespace(name: impl Into<String>) -> Attach<String> {
    Annotation::from_static(NAMESPACE_KEY).value(name.into())
}

/// Class-level route; the last write wins.
#[must_use]
pub fn route(route: impl Into<String>) -> Attach<String> {
    Annotation::from_static(ROUTE_KEY).value(route.into())
}

///
/// Model
///
/// Inheritance-aware reads of the model names.
///

#[derive(Clone, Copy, Debug)]
pub struct Model<'s> {
    store: &'s MetadataStore,
}

impl<'s> Model<'s> {
    #[must_use]
    pub const fn new(store: &'s MetadataStore) -> Self {
        Self { store }
    }

    fn meta(&self, key: &'static str) -> Meta<'s, String> {
        Meta::from_static(self.store, key)
    }

    pub fn get_collection<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Option<String>, StoreError> {
        self.meta(COLLECTION_KEY).get_class_meta(target)
    }

    pub fn has_collection<'a>(&self, target: impl Into<Target<'a>>) -> Result<bool, StoreError> {
        self.meta(COLLECTION_KEY).has_class_meta(target)
    }

    pub fn get_namespace<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Option<String>, StoreError> {
        self.meta(NAMESPACE_KEY).get_class_meta(target)
    }

    pub fn has_namespace<'a>(&self, target: impl Into<Target<'a>>) -> Result<bool, StoreError> {
        self.meta(NAMESPACE_KEY).has_class_meta(target)
    }

    pub fn get_route<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Option<String>, StoreError> {
        self.meta(ROUTE_KEY).get_class_meta(target)
    }

    pub fn has_route<'a>(&self, target: impl Into<Target<'a>>) -> Result<bool, StoreError> {
        self.meta(ROUTE_KEY).has_class_meta(target)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{class::Object, config::RegistryConfig};

    #[test]
    fn collection_lands_on_the_root() {
        let registry = Registry::new();
        let root = Class::new("Root");
        let leaf = Class::extends("Leaf", &Class::extends("Mid", &root));

        collection("things").to_class(&registry, &leaf).unwrap();

        let model = registry.model();
        assert_eq!(
            model.get_collection(&root).unwrap().as_deref(),
            Some("things")
        );
        assert_eq!(
            model.get_collection(&leaf.instantiate()).unwrap().as_deref(),
            Some("things")
        );
        assert_eq!(registry.collections().owner("things"), Some(root));
    }

    #[test]
    fn same_name_on_same_root_is_a_no_op() {
        let registry = Registry::new();
        let root = Class::new("Root");
        let child = Class::extends("Child", &root);

        collection("things").to_class(&registry, &root).unwrap();
        collection("things").to_class(&registry, &child).unwrap();

        assert_eq!(registry.collections().len(), 1);
    }

    #[test]
    fn name_cannot_move_to_another_root() {
        let registry = Registry::new();
        let a = Class::new("A");
        let b = Class::new("B");

        collection("things").to_class(&registry, &a).unwrap();
        let err = collection("things").to_class(&registry, &b).unwrap_err();

        assert!(matches!(
            err,
            Error::ModelError(ModelError::DuplicateCollection { .. })
        ));
        assert!(!registry.model().has_collection(&b).unwrap());
    }

    #[test]
    fn named_root_cannot_be_renamed() {
        let registry = Registry::new();
        let root = Class::new("Root");

        collection("first").to_class(&registry, &root).unwrap();
        let err = collection("second").to_class(&registry, &root).unwrap_err();

        assert!(matches!(
            err,
            Error::ModelError(ModelError::CollectionConflict { .. })
        ));
        assert_eq!(
            registry.model().get_collection(&root).unwrap().as_deref(),
            Some("first")
        );
    }

    #[test]
    fn plain_objects_are_ignored_and_missing_targets_fail() {
        let registry = Registry::new();

        collection("things")
            .to_class(&registry, &Object::plain())
            .unwrap();
        assert!(registry.collections().is_empty());

        let err = collection("things")
            .to_class(&registry, Target::Missing)
            .unwrap_err();
        assert!(matches!(err, Error::StoreError(StoreError::MissingTarget)));
    }

    #[test]
    fn uniqueness_can_be_switched_off() {
        let registry = Registry::with_config(RegistryConfig {
            unique_collections: false,
        });
        let a = Class::new("A");
        let b = Class::new("B");

        collection("things").to_class(&registry, &a).unwrap();
        collection("things").to_class(&registry, &b).unwrap();
        collection("renamed").to_class(&registry, &a).unwrap();

        let model = registry.model();
        assert_eq!(
            model.get_collection(&a).unwrap().as_deref(),
            Some("renamed")
        );
        assert_eq!(model.get_collection(&b).unwrap().as_deref(), Some("things"));
        assert!(registry.collections().is_empty());
    }

    #[test]
    fn namespace_and_route_stay_on_the_literal_class() {
        let registry = Registry::new();
        let parent = Class::new("Parent");
        let child = Class::extends("Child", &parent);

        namespace("api").to_class(registry.store(), &child).unwrap();
        route("/items").to_class(registry.store(), &parent).unwrap();
        route("/children").to_class(registry.store(), &child).unwrap();

        let model = registry.model();
        assert!(!model.has_namespace(&parent).unwrap());
        assert_eq!(model.get_namespace(&child).unwrap().as_deref(), Some("api"));
        assert_eq!(model.get_route(&parent).unwrap().as_deref(), Some("/items"));
        assert_eq!(
            model.get_route(&child.instantiate()).unwrap().as_deref(),
            Some("/children")
        );
        assert!(!model.has_collection(&child).unwrap());
    }
}
