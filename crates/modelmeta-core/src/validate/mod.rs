//! Property validation.
//!
//! Validators are named predicates registered once per registry. A rule binds
//! a validator to a base value (or a sibling property) and a notice, and is
//! attached to a property of a class. Evaluation always reads the instance's
//! current field values, ancestor rules first.

pub mod builtin;
pub mod record;
pub mod registry;


pub use record::{Operand, ValidationRecord};
pub use registry::{AgainstPropertyFn, Predicate, ValidatorFn, ValidatorObject, ValidatorRegistry};

use crate::{
    Error,
    class::{Object, Target},
    registry::Registry,
    store::{MetadataStore, Site, StoreError},
    value::Value,
};
use std::sync::Arc;
use thiserror::Error as ThisError;

pub const VALIDATION_KEY: &str = "model:property:validation";

///
/// ValidateError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ValidateError {
    #[error("a validator named '{name}' already exists")]
    DuplicateValidatorName { name: String },

    #[error("a validator must be named")]
    EmptyValidatorName,

    #[error("validation needs an object instance, found {found}")]
    ValidationTarget { found: String },
}

///
/// create_validator
///
/// Register `predicate(instance, value, base)` under `name`.
///

pub fn create_validator<F>(
    registry: &ValidatorRegistry,
    name: impl Into<String>,
    predicate: F,
) -> Result<Validator, ValidateError>
where
    F: Fn(&Object, &Value, &Value) -> bool + Send + Sync + 'static,
{
    let object = ValidatorObject::new(name, Predicate::Value(Arc::new(predicate)));
    registry.register(object.clone())?;

    Ok(Validator { object })
}

///
/// create_against_property_validator
///
/// Register `predicate(value, other, instance, property, other_property)`
/// under `name`; rules built from it name the sibling property to read.
///

pub fn create_against_property_validator<F>(
    registry: &ValidatorRegistry,
    name: impl Into<String>,
    predicate: F,
) -> Result<AgainstPropertyValidator, ValidateError>
where
    F: Fn(&Value, &Value, &Object, &str, &str) -> bool + Send + Sync + 'static,
{
    let object = ValidatorObject::new(name, Predicate::AgainstProperty(Arc::new(predicate)));
    registry.register(object.clone())?;

    Ok(AgainstPropertyValidator { object })
}

///
/// Validator
///

#[derive(Clone, Debug)]
pub struct Validator {
    object: ValidatorObject,
}

impl Validator {
    #[must_use]
    pub fn name(&self) -> &str {
        self.object.name()
    }

    #[must_use]
    pub const fn object(&self) -> &ValidatorObject {
        &self.object
    }

    #[must_use]
    pub fn rule(&self, base: impl Into<Value>, notice: impl Into<String>) -> Rule {
        Rule {
            validator: self.object.clone(),
            operand: Operand::Value(base.into()),
            notice: notice.into(),
        }
    }
}

///
/// AgainstPropertyValidator
///

#[derive(Clone, Debug)]
pub struct AgainstPropertyValidator {
    object: ValidatorObject,
}

impl AgainstPropertyValidator {
    #[must_use]
    pub fn name(&self) -> &str {
        self.object.name()
    }

    #[must_use]
    pub const fn object(&self) -> &ValidatorObject {
        &self.object
    }

    #[must_use]
    pub fn rule(&self, other_property: impl Into<String>, notice: impl Into<String>) -> Rule {
        Rule {
            validator: self.object.clone(),
            operand: Operand::Property(other_property.into()),
            notice: notice.into(),
        }
    }
}

///
/// Rule
///
/// A validator bound to its operand and notice, ready to attach.
///

#[derive(Clone, Debug)]
pub struct Rule {
    validator: ValidatorObject,
    operand: Operand,
    notice: String,
}

impl Rule {
    #[must_use]
    pub const fn operand(&self) -> &Operand {
        &self.operand
    }

    #[must_use]
    pub fn notice(&self) -> &str {
        &self.notice
    }

    /// Append a record for `property` to the target's class.
    pub fn to_property<'a>(
        &self,
        store: &MetadataStore,
        target: impl Into<Target<'a>>,
        property: &str,
    ) -> Result<(), Error> {
        let target = target.into();
        let owner = MetadataStore::owner(target, Site::Property(property))?;
        if let Operand::Property(other) = &self.operand {
            Site::Property(other).check()?;
        }

        let record = ValidationRecord::new(
            self.validator.clone(),
            self.operand.clone(),
            self.notice.clone(),
            property,
        );
        store.update::<Vec<ValidationRecord>, _>(VALIDATION_KEY, target, Site::Class, |current| {
            let mut records = current.cloned().unwrap_or_default();
            records.push(record);
            records
        })?;

        tracing::debug!(
            validator = self.validator.name(),
            owner = %owner,
            property,
            "validation rule attached"
        );

        Ok(())
    }
}

///
/// Validation
///
/// Validation view over one instance. Nothing is cached: every call
/// re-reads the declared records and the instance's field values.
///

#[derive(Clone, Copy, Debug)]
pub struct Validation<'r> {
    store: &'r MetadataStore,
    instance: &'r Object,
}

impl<'r> Validation<'r> {
    pub fn new(
        registry: &'r Registry,
        target: impl Into<Target<'r>>,
    ) -> Result<Self, ValidateError> {
        match target.into() {
            Target::Instance(instance) => Ok(Self {
                store: registry.store(),
                instance,
            }),
            other => Err(ValidateError::ValidationTarget {
                found: other.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn instance(&self) -> &'r Object {
        self.instance
    }

    /// Every record that applies, ancestors' first, in declaration order.
    pub fn records(&self) -> Result<Vec<ValidationRecord>, StoreError> {
        let per_class = self.store.get_all::<Vec<ValidationRecord>>(
            VALIDATION_KEY,
            self.instance,
            Site::Class,
        )?;

        Ok(per_class.into_iter().flatten().collect())
    }

    pub fn is_valid(&self) -> Result<bool, StoreError> {
        Ok(self
            .records()?
            .iter()
            .all(|record| record.evaluate(self.instance)))
    }

    pub fn is_valid_property(&self, property: &str) -> Result<bool, StoreError> {
        Ok(self
            .records()?
            .iter()
            .filter(|record| record.property() == property)
            .all(|record| record.evaluate(self.instance)))
    }

    pub fn errors(&self) -> Result<Vec<ValidationRecord>, StoreError> {
        self.failing(None)
    }

    pub fn property_errors(&self, property: &str) -> Result<Vec<ValidationRecord>, StoreError> {
        self.failing(Some(property))
    }

    /// Distinct validators used anywhere on the instance, first-seen order.
    pub fn validation_on_object(&self) -> Result<Vec<ValidatorObject>, StoreError> {
        self.validators(None)
    }

    pub fn validation_on_property(
        &self,
        property: &str,
    ) -> Result<Vec<ValidatorObject>, StoreError> {
        self.validators(Some(property))
    }

    fn failing(&self, property: Option<&str>) -> Result<Vec<ValidationRecord>, StoreError> {
        let failed: Vec<ValidationRecord> = self
            .records()?
            .into_iter()
            .filter(|record| property.is_none_or(|p| record.property() == p))
            .filter(|record| !record.evaluate(self.instance))
            .collect();

        if !failed.is_empty() {
            tracing::trace!(
                class = %self.instance.class(),
                failed = failed.len(),
                "validation failed"
            );
        }

        Ok(failed)
    }

    fn validators(&self, property: Option<&str>) -> Result<Vec<ValidatorObject>, StoreError> {
        let mut out: Vec<ValidatorObject> = Vec::new();

        for record in self.records()? {
            if property.is_some_and(|p| record.property() != p) {
                continue;
            }
            if !out.iter().any(|v| v.name() == record.validator_name()) {
                out.push(record.validator().clone());
            }
        }

        Ok(out)
    }
}
