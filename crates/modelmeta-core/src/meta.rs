//! Annotation builders and typed accessors over the metadata store.
//!
//! ```text
//! let title = Annotation::<String>::with_assert("title", |v| !v.is_empty())?;
//! title.value("Users".into()).to_class(&store, &class)?;
//!
//! let meta = Meta::<String>::new(&store, "title")?;
//! meta.get_class_meta(&instance)?;     // Some("Users")
//! ```

use crate::{
    Error,
    class::Target,
    store::{MetadataStore, Site, StoreError},
};
use std::{any::Any, fmt, marker::PhantomData, sync::Arc};
use thiserror::Error as ThisError;

///
/// MetaError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum MetaError {
    #[error("the value for '{key}' was rejected by its assertion")]
    AssertionFailed { key: String },

    #[error("a non-empty key is required to store metadata")]
    EmptyKey,
}

/// Value check run before an annotation is attached.
pub type Assertion<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

fn accept_all<T>() -> Assertion<T> {
    Arc::new(|_| true)
}

fn require_key(key: impl Into<String>) -> Result<String, MetaError> {
    let key = key.into();
    if key.is_empty() {
        return Err(MetaError::EmptyKey);
    }

    Ok(key)
}

///
/// Annotation
///
/// A keyed factory for attachment steps. One annotation serves class,
/// property and argument sites; the site picks the meta kind.
///

pub struct Annotation<T> {
    key: String,
    assert: Assertion<T>,
}

impl<T> Annotation<T>
where
    T: Any + Clone + Send + Sync,
{
    pub fn new(key: impl Into<String>) -> Result<Self, MetaError> {
        Ok(Self {
            key: require_key(key)?,
            assert: accept_all(),
        })
    }

    pub fn with_assert<F>(key: impl Into<String>, assert: F) -> Result<Self, MetaError>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Ok(Self {
            key: require_key(key)?,
            assert: Arc::new(assert),
        })
    }

    // keys owned by this crate are never empty
    pub(crate) fn from_static(key: &'static str) -> Self {
        Self {
            key: key.to_string(),
            assert: accept_all(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bind a value, producing the step that attaches it.
    #[must_use]
    pub fn value(&self, value: T) -> Attach<T> {
        Attach {
            key: self.key.clone(),
            value,
            assert: self.assert.clone(),
        }
    }
}

impl<T> Clone for Annotation<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            assert: self.assert.clone(),
        }
    }
}

impl<T> fmt::Debug for Annotation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotation").field("key", &self.key).finish()
    }
}

///
/// Attach
///
/// A bound value waiting for its target.
///

pub struct Attach<T> {
    key: String,
    value: T,
    assert: Assertion<T>,
}

impl<T> Attach<T>
where
    T: Any + Clone + Send + Sync,
{
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Check the value, index the property (property sites only), then write.
    pub fn attach<'a>(
        &self,
        store: &MetadataStore,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
    ) -> Result<(), Error> {
        let target = target.into();
        if target.is_missing() {
            return Err(StoreError::MissingTarget.into());
        }
        if !(self.assert)(&self.value) {
            return Err(MetaError::AssertionFailed {
                key: self.key.clone(),
            }
            .into());
        }
        if let Site::Property(property) = site {
            site.check()?;
            store.record_property(target, property)?;
        }

        store.set(&self.key, self.value.clone(), target, site)?;

        Ok(())
    }

    pub fn to_class<'a>(
        &self,
        store: &MetadataStore,
        target: impl Into<Target<'a>>,
    ) -> Result<(), Error> {
        self.attach(store, target, Site::Class)
    }

    pub fn to_property<'a>(
        &self,
        store: &MetadataStore,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<(), Error> {
        self.attach(store, target, Site::Property(property))
    }

    pub fn to_argument<'a>(
        &self,
        store: &MetadataStore,
        target: impl Into<Target<'a>>,
        method: &str,
        position: usize,
    ) -> Result<(), Error> {
        self.attach(store, target, Site::argument(method, position))
    }
}

impl<T: fmt::Debug> fmt::Debug for Attach<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attach")
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

///
/// Meta
///
/// Typed read interface for one key. Instances are normalised to their
/// class, so class metadata is visible through the class and every instance.
///

pub struct Meta<'s, T> {
    store: &'s MetadataStore,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<'s, T> Meta<'s, T>
where
    T: Any + Clone,
{
    pub fn new(store: &'s MetadataStore, key: impl Into<String>) -> Result<Self, MetaError> {
        Ok(Self {
            store,
            key: require_key(key)?,
            _marker: PhantomData,
        })
    }

    pub(crate) fn from_static(store: &'s MetadataStore, key: &'static str) -> Self {
        Self {
            store,
            key: key.to_string(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn has<'a>(
        &self,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
    ) -> Result<bool, StoreError> {
        self.store.has(&self.key, target, site)
    }

    pub fn get<'a>(
        &self,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
    ) -> Result<Option<T>, StoreError> {
        self.store.get(&self.key, target, site)
    }

    pub fn has_class_meta<'a>(&self, target: impl Into<Target<'a>>) -> Result<bool, StoreError> {
        self.has(target, Site::Class)
    }

    pub fn get_class_meta<'a>(
        &self,
        target: impl Into<Target<'a>>,
    ) -> Result<Option<T>, StoreError> {
        self.get(target, Site::Class)
    }

    pub fn has_property_meta<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<bool, StoreError> {
        self.has(target, Site::Property(property))
    }

    pub fn get_property_meta<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<Option<T>, StoreError> {
        self.get(target, Site::Property(property))
    }

    pub fn has_argument_meta<'a>(
        &self,
        target: impl Into<Target<'a>>,
        method: &str,
        position: usize,
    ) -> Result<bool, StoreError> {
        self.has(target, Site::argument(method, position))
    }

    pub fn get_argument_meta<'a>(
        &self,
        target: impl Into<Target<'a>>,
        method: &str,
        position: usize,
    ) -> Result<Option<T>, StoreError> {
        self.get(target, Site::argument(method, position))
    }

    /// Indexed property names that carry this key.
    pub fn properties<'a>(&self, target: impl Into<Target<'a>>) -> Result<Vec<String>, StoreError> {
        let target = target.into();
        let mut out = Vec::new();

        for property in self.store.properties(target)? {
            if self.has_property_meta(target, &property)? {
                out.push(property);
            }
        }

        Ok(out)
    }
}

impl<T> fmt::Debug for Meta<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Meta").field("key", &self.key).finish()
    }
}

///
/// TESTS
///
