//! Metadata store: typed values keyed by (meta key, owning class, member).
//!
//! Targets normalise to their owning class before any access. Class entries
//! live on the class itself; property and argument entries live on its
//! prototype facet, which shares the class id because the meta kind already
//! separates the two. Reads walk the owner's lineage nearest-first so
//! subclasses see inherited entries; writes always land on the owner.
//! Entries on the universal base (plain objects, lists) are never inherited.

pub mod index;
pub mod key;

#[cfg(test)]
mod tests;

pub use index::PropertyIndex;
pub use key::{MetaKey, MetaKind, Site};

use crate::class::{Class, ClassId, Target};
use std::{
    any::{Any, type_name},
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use thiserror::Error as ThisError;

type Payload = Arc<dyn Any + Send + Sync>;

///
/// StoreError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("a target is required to access metadata")]
    MissingTarget,

    #[error("metadata under '{key}' is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl StoreError {
    fn type_mismatch<T>(key: &MetaKey) -> Self {
        Self::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<T>(),
        }
    }
}

///
/// Entry
///
/// Argument entries are sparse: only written positions are held, which keeps
/// "absent" apart from a stored empty value.
///

#[derive(Clone)]
enum Entry {
    Value(Payload),
    Arguments(BTreeMap<usize, Payload>),
}

impl Entry {
    fn payload(&self, position: Option<usize>) -> Option<Payload> {
        match (self, position) {
            (Self::Value(payload), None) => Some(payload.clone()),
            (Self::Arguments(slots), Some(position)) => slots.get(&position).cloned(),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct SlotKey {
    key: MetaKey,
    owner: ClassId,
    member: Option<String>,
}

impl SlotKey {
    fn new(base: &str, owner: &Class, site: Site<'_>) -> Self {
        Self {
            key: MetaKey::new(site.kind(), base),
            owner: owner.id(),
            member: site.member().map(str::to_string),
        }
    }
}

///
/// MetadataStore
///

#[derive(Default)]
pub struct MetadataStore {
    entries: RwLock<HashMap<SlotKey, Entry>>,
    properties: PropertyIndex,
}

impl MetadataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the class a target's entries live on.
    pub fn owner<'a>(target: Target<'a>, site: Site<'_>) -> Result<&'a Class, StoreError> {
        let owner = target.constructor().ok_or(StoreError::MissingTarget)?;
        site.check()?;

        Ok(owner)
    }

    /// Write `value`, replacing whatever the owner held at this site.
    pub fn set<'a, T>(
        &self,
        base: &str,
        value: T,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
    ) -> Result<(), StoreError>
    where
        T: Any + Send + Sync,
    {
        let owner = Self::owner(target.into(), site)?;
        let slot = SlotKey::new(base, owner, site);

        tracing::debug!(key = %slot.key, owner = %owner, %site, "metadata set");

        Self::write_slot(&mut self.write(), slot, site, Arc::new(value));

        Ok(())
    }

    /// Read-modify-write of the owner's own entry under a single write lock.
    /// `f` sees the owner's current value, never an inherited one.
    pub fn update<'a, T, F>(
        &self,
        base: &str,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
        f: F,
    ) -> Result<(), StoreError>
    where
        T: Any + Send + Sync,
        F: FnOnce(Option<&T>) -> T,
    {
        let owner = Self::owner(target.into(), site)?;
        let slot = SlotKey::new(base, owner, site);
        let mut entries = self.write();

        let current = entries
            .get(&slot)
            .and_then(|entry| entry.payload(site.position()));
        let next = match current.as_deref() {
            None => f(None),
            Some(payload) => f(Some(
                payload
                    .downcast_ref::<T>()
                    .ok_or_else(|| StoreError::type_mismatch::<T>(&slot.key))?,
            )),
        };

        tracing::debug!(key = %slot.key, owner = %owner, %site, "metadata updated");

        Self::write_slot(&mut entries, slot, site, Arc::new(next));

        Ok(())
    }

    /// Nearest value along the target's lineage.
    pub fn get<'a, T>(
        &self,
        base: &str,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
    ) -> Result<Option<T>, StoreError>
    where
        T: Any + Clone,
    {
        let target = target.into();

        match self.lookup(base, target, site)? {
            None => Ok(None),
            Some(payload) => payload
                .downcast_ref::<T>()
                .cloned()
                .map(Some)
                .ok_or_else(|| StoreError::type_mismatch::<T>(&MetaKey::new(site.kind(), base))),
        }
    }

    /// True if the target or any ancestor holds an entry at this site.
    pub fn has<'a>(
        &self,
        base: &str,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
    ) -> Result<bool, StoreError> {
        Ok(self.lookup(base, target.into(), site)?.is_some())
    }

    /// Every value held along the lineage, root-most class first.
    pub fn get_all<'a, T>(
        &self,
        base: &str,
        target: impl Into<Target<'a>>,
        site: Site<'_>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: Any + Clone,
    {
        let class = Self::owner(target.into(), site)?;
        let mut slot = SlotKey::new(base, class, site);
        let lineage: Vec<&Class> = class.metadata_lineage().collect();
        let entries = self.read();
        let mut out = Vec::new();

        for owner in lineage.into_iter().rev() {
            slot.owner = owner.id();

            let Some(payload) = entries
                .get(&slot)
                .and_then(|entry| entry.payload(site.position()))
            else {
                continue;
            };
            let value = payload
                .downcast_ref::<T>()
                .ok_or_else(|| StoreError::type_mismatch::<T>(&slot.key))?;

            out.push(value.clone());
        }

        Ok(out)
    }

    /// Note that `property` received metadata on the target's class.
    pub fn record_property<'a>(
        &self,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<bool, StoreError> {
        let owner = Self::owner(target.into(), Site::Property(property))?;

        Ok(self.properties.record(owner, property))
    }

    /// Every property name recorded on the target's lineage, whatever the key.
    pub fn properties<'a>(&self, target: impl Into<Target<'a>>) -> Result<Vec<String>, StoreError> {
        let owner = Self::owner(target.into(), Site::Class)?;

        Ok(self.properties.names(owner))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn lookup(
        &self,
        base: &str,
        target: Target<'_>,
        site: Site<'_>,
    ) -> Result<Option<Payload>, StoreError> {
        let class = Self::owner(target, site)?;
        let mut slot = SlotKey::new(base, class, site);
        let entries = self.read();

        for owner in class.metadata_lineage() {
            slot.owner = owner.id();

            // the nearest entry decides, even when its argument slot is empty
            if let Some(entry) = entries.get(&slot) {
                tracing::trace!(key = %slot.key, owner = %owner, %site, "metadata hit");

                return Ok(entry.payload(site.position()));
            }
        }

        Ok(None)
    }

    fn write_slot(
        entries: &mut HashMap<SlotKey, Entry>,
        slot: SlotKey,
        site: Site<'_>,
        payload: Payload,
    ) {
        let Some(position) = site.position() else {
            entries.insert(slot, Entry::Value(payload));
            return;
        };

        let entry = entries
            .entry(slot)
            .or_insert_with(|| Entry::Arguments(BTreeMap::new()));

        if let Entry::Arguments(slots) = entry {
            slots.insert(position, payload);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SlotKey, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SlotKey, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataStore")
            .field("entries", &self.len())
            .field("properties", &self.properties)
            .finish()
    }
}
