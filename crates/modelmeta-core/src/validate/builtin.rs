//! Comparison validators every registry can opt into.
//!
//! Values only compare within the same kind, so a missing field or a field of
//! a different kind fails every ordering check.

use crate::{
    class::Object,
    validate::{
        AgainstPropertyValidator, ValidateError, Validator, ValidatorRegistry,
        create_against_property_validator, create_validator,
    },
    value::Value,
};

pub const LT: &str = "lt";
pub const GT: &str = "gt";
pub const LTE: &str = "lte";
pub const GTE: &str = "gte";
pub const EQ: &str = "eq";
pub const NE: &str = "ne";
pub const LT_PROPERTY: &str = "lt_property";
pub const GT_PROPERTY: &str = "gt_property";

macro_rules! cmp_validator {
    ($registry:expr, $name:expr, $op:tt) => {
        create_validator($registry, $name, |_: &Object, value: &Value, base: &Value| {
            value $op base
        })?
    };
}

macro_rules! cmp_property_validator {
    ($registry:expr, $name:expr, $op:tt) => {
        create_against_property_validator(
            $registry,
            $name,
            |value: &Value, other: &Value, _: &Object, _: &str, _: &str| value $op other,
        )?
    };
}

///
/// Builtins
///
/// Handles to the registered comparison validators.
///

#[derive(Clone, Debug)]
pub struct Builtins {
    pub lt: Validator,
    pub gt: Validator,
    pub lte: Validator,
    pub gte: Validator,
    pub eq: Validator,
    pub ne: Validator,
    pub lt_property: AgainstPropertyValidator,
    pub gt_property: AgainstPropertyValidator,
}

/// Register the comparison validators. Fails if any of their names is taken.
pub fn register(registry: &ValidatorRegistry) -> Result<Builtins, ValidateError> {
    Ok(Builtins {
        lt: cmp_validator!(registry, LT, <),
        gt: cmp_validator!(registry, GT, >),
        lte: cmp_validator!(registry, LTE, <=),
        gte: cmp_validator!(registry, GTE, >=),
        eq: cmp_validator!(registry, EQ, ==),
        ne: cmp_validator!(registry, NE, !=),
        lt_property: cmp_property_validator!(registry, LT_PROPERTY, <),
        gt_property: cmp_property_validator!(registry, GT_PROPERTY, >),
    })
}

///
/// TESTS
///
