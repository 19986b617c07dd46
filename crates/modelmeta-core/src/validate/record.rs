use crate::{
    class::Object,
    validate::registry::{Predicate, ValidatorObject},
    value::Value,
};
use std::fmt;

///
/// Operand
///
/// What a property value is checked against: a fixed base value, or the
/// name of a sibling property read at evaluation time.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Value(Value),
    Property(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Property(name) => write!(f, "@{name}"),
        }
    }
}

///
/// ValidationRecord
///
/// One declared check on one property. Records keep declaration order,
/// which is also the order failures are reported in.
///

#[derive(Clone, Debug)]
pub struct ValidationRecord {
    validator: ValidatorObject,
    operand: Operand,
    notice: String,
    property: String,
}

impl ValidationRecord {
    pub(crate) fn new(
        validator: ValidatorObject,
        operand: Operand,
        notice: String,
        property: impl Into<String>,
    ) -> Self {
        Self {
            validator,
            operand,
            notice,
            property: property.into(),
        }
    }

    #[must_use]
    pub const fn validator(&self) -> &ValidatorObject {
        &self.validator
    }

    #[must_use]
    pub fn validator_name(&self) -> &str {
        self.validator.name()
    }

    #[must_use]
    pub const fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Fixed base value, for value validators.
    #[must_use]
    pub const fn base(&self) -> Option<&Value> {
        match &self.operand {
            Operand::Value(value) => Some(value),
            Operand::Property(_) => None,
        }
    }

    /// Referenced sibling property, for cross-property validators.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match &self.operand {
            Operand::Property(name) => Some(name),
            Operand::Value(_) => None,
        }
    }

    #[must_use]
    pub fn notice(&self) -> &str {
        &self.notice
    }

    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Run the check against the instance's current field values.
    #[must_use]
    pub fn evaluate(&self, instance: &Object) -> bool {
        let value = instance.get(&self.property);

        match (self.validator.predicate(), &self.operand) {
            (Predicate::Value(check), Operand::Value(base)) => check(instance, value, base),
            (Predicate::AgainstProperty(check), Operand::Property(other)) => {
                check(value, instance.get(other), instance, &self.property, other)
            }
            // rules always pair a predicate with its own operand shape
            _ => false,
        }
    }
}

impl fmt::Display for ValidationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) on '{}': {}",
            self.validator.name(),
            self.operand,
            self.property,
            self.notice
        )
    }
}

///
/// TESTS
///
