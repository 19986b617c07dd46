use derive_more::Display;
use modelmeta_core::{
    Error as CoreError, config::ConfigError, meta::MetaError, model::ModelError,
    property::PropertyError, store::StoreError, validate::ValidateError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<CoreError> for Error {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigError(err) => err.into(),
            CoreError::MetaError(err) => err.into(),
            CoreError::ModelError(err) => err.into(),
            CoreError::PropertyError(err) => err.into(),
            CoreError::StoreError(err) => err.into(),
            CoreError::ValidateError(err) => err.into(),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

impl From<MetaError> for Error {
    fn from(err: MetaError) -> Self {
        let kind = match err {
            MetaError::AssertionFailed { .. } => ErrorKind::Rejected,
            MetaError::EmptyKey => ErrorKind::EmptyName,
        };

        Self::new(kind, ErrorOrigin::Meta, err.to_string())
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        let kind = match err {
            ModelError::CollectionConflict { .. } => ErrorKind::Conflict,
            ModelError::DuplicateCollection { .. } => ErrorKind::Duplicate,
        };

        Self::new(kind, ErrorOrigin::Model, err.to_string())
    }
}

impl From<PropertyError> for Error {
    fn from(err: PropertyError) -> Self {
        let kind = match err {
            PropertyError::InvalidType { .. } => ErrorKind::InvalidType,
            PropertyError::UnsupportedType { .. } => ErrorKind::Unsupported,
        };

        Self::new(kind, ErrorOrigin::Property, err.to_string())
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            StoreError::MissingTarget => ErrorKind::MissingTarget,
            StoreError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        };

        Self::new(kind, ErrorOrigin::Store, err.to_string())
    }
}

impl From<ValidateError> for Error {
    fn from(err: ValidateError) -> Self {
        let kind = match err {
            ValidateError::DuplicateValidatorName { .. } => ErrorKind::Duplicate,
            ValidateError::EmptyValidatorName => ErrorKind::EmptyName,
            ValidateError::ValidationTarget { .. } => ErrorKind::ValidationTarget,
        };

        Self::new(kind, ErrorOrigin::Validate, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// The process-wide registry was configured after first use.
    AlreadyInitialized,

    Config,

    /// A name is already bound to something else.
    Conflict,

    Duplicate,

    /// A metadata key or validator name was empty.
    EmptyName,

    /// A member name or position was missing for the metadata site.
    InvalidArgument,

    /// A property type was neither a type tag nor a class.
    InvalidType,

    /// The target was absent (null, missing).
    MissingTarget,

    /// An annotation's own assertion refused the value.
    Rejected,

    TypeMismatch,
    Unsupported,

    /// Validation was asked of something other than an instance.
    ValidationTarget,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Meta,
    Model,
    Property,
    Registry,
    Store,
    Validate,
}

///
/// TESTS
///
