//! Core runtime for modelmeta: the class/instance object model, the metadata
//! store, annotation builders and typed accessors, model naming, property
//! descriptors, and the validation engine.

pub mod class;
pub mod config;
pub mod meta;
pub mod model;
pub mod property;
pub mod registry;
pub mod store;
pub mod validate;
pub mod value;

use crate::{
    config::ConfigError, meta::MetaError, model::ModelError, property::PropertyError,
    store::StoreError, validate::ValidateError,
};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Name reported by the implicit universal base class.
pub const BASE_CLASS_NAME: &str = "Object";

///
/// Prelude
///
/// Domain vocabulary only; errors and registries stay one module down.
///

pub mod prelude {
    pub use crate::{
        class::{Class, Object, Target, constructor_chain},
        meta::{Annotation, Attach, Meta},
        registry::Registry,
        store::Site,
        value::Value,
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum Error {
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    #[error(transparent)]
    MetaError(#[from] MetaError),

    #[error(transparent)]
    ModelError(#[from] ModelError),

    #[error(transparent)]
    PropertyError(#[from] PropertyError),

    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    ValidateError(#[from] ValidateError),
}
