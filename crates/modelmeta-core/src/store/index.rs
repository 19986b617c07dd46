use crate::class::{Class, ClassId};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

///
/// PropertyIndex
///
/// Per-class ordered set of property names that received at least one
/// metadata write, whatever the key.
///

#[derive(Debug, Default)]
pub struct PropertyIndex {
    names: RwLock<HashMap<ClassId, Vec<String>>>,
}

impl PropertyIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` against `owner`; returns false if it was already known.
    pub fn record(&self, owner: &Class, name: &str) -> bool {
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        let list = names.entry(owner.id()).or_default();

        if list.iter().any(|known| known == name) {
            return false;
        }
        list.push(name.to_string());

        true
    }

    /// Names recorded on `class` and its ancestors, root-most class first,
    /// each name once.
    #[must_use]
    pub fn names(&self, class: &Class) -> Vec<String> {
        let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
        let lineage: Vec<&Class> = class.metadata_lineage().collect();
        let mut out: Vec<String> = Vec::new();

        for owner in lineage.into_iter().rev() {
            for name in names.get(&owner.id()).into_iter().flatten() {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
        }

        out
    }
}

///
/// TESTS
///
