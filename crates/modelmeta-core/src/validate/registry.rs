use crate::{class::Object, validate::ValidateError, value::Value};
use std::{
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

/// `(instance, value, base)`: checks a property value against a fixed base.
pub type ValidatorFn = Arc<dyn Fn(&Object, &Value, &Value) -> bool + Send + Sync>;

/// `(value, other, instance, property, other_property)`: checks a property
/// value against a sibling property read from the same instance.
pub type AgainstPropertyFn =
    Arc<dyn Fn(&Value, &Value, &Object, &str, &str) -> bool + Send + Sync>;

///
/// Predicate
///

#[derive(Clone)]
pub enum Predicate {
    Value(ValidatorFn),
    AgainstProperty(AgainstPropertyFn),
}

///
/// ValidatorObject
///
/// A registered validator: its unique name and predicate.
///

#[derive(Clone)]
pub struct ValidatorObject {
    name: String,
    predicate: Predicate,
}

impl ValidatorObject {
    pub(crate) fn new(name: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    #[must_use]
    pub const fn is_against_property(&self) -> bool {
        matches!(self.predicate, Predicate::AgainstProperty(_))
    }
}

impl fmt::Debug for ValidatorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorObject")
            .field("name", &self.name)
            .field("against_property", &self.is_against_property())
            .finish()
    }
}

///
/// ValidatorRegistry
///
/// Append-only list of validators in registration order; names are unique.
///

#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    validators: RwLock<Vec<ValidatorObject>>,
}

impl ValidatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, validator: ValidatorObject) -> Result<(), ValidateError> {
        if validator.name.is_empty() {
            return Err(ValidateError::EmptyValidatorName);
        }

        let mut validators = self
            .validators
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if validators.iter().any(|known| known.name == validator.name) {
            return Err(ValidateError::DuplicateValidatorName {
                name: validator.name,
            });
        }

        tracing::debug!(validator = %validator.name, "validator registered");
        validators.push(validator);

        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ValidatorObject> {
        self.read(|validators| validators.iter().find(|v| v.name == name).cloned())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.read(|validators| validators.iter().any(|v| v.name == name))
    }

    /// Every registered validator, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<ValidatorObject> {
        self.read(<[ValidatorObject]>::to_vec)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read(<[ValidatorObject]>::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read<R>(&self, f: impl FnOnce(&[ValidatorObject]) -> R) -> R {
        let validators = self
            .validators
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        f(&validators)
    }
}

///
/// TESTS
///
