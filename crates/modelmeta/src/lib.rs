//! ## Crate layout
//! - `core`: object model, metadata store, annotations, model naming,
//!   property descriptors and validation.
//! - `error`: public error type with a stable kind/origin taxonomy.
//!
//! Hosts that want isolation build their own `Registry`. Everything else can
//! share the process-wide one returned by [`registry`].

pub use modelmeta_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

use crate::core::{config::RegistryConfig, registry::Registry};
use std::sync::OnceLock;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Global registry
//

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry, built with the default config on first use.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        tracing::debug!("process registry created with default config");
        Registry::new()
    })
}

/// Build the process-wide registry with `config`. Fails once the registry
/// exists, whether from an earlier `init` or a call to [`registry`].
pub fn init(config: RegistryConfig) -> Result<&'static Registry, Error> {
    let mut fresh = Some(config);
    let registry = REGISTRY.get_or_init(|| {
        let config = fresh.take().unwrap_or_default();
        tracing::debug!(?config, "process registry created");
        Registry::with_config(config)
    });

    if fresh.is_some() {
        return Err(Error::new(
            ErrorKind::AlreadyInitialized,
            ErrorOrigin::Registry,
            "the process registry is already initialised",
        ));
    }

    Ok(registry)
}

/// [`init`] from a TOML document.
pub fn init_from_toml(source: &str) -> Result<&'static Registry, Error> {
    let config = RegistryConfig::from_toml_str(source)?;

    init(config)
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::{
        class::{Class, Object, Target, constructor_chain},
        config::RegistryConfig,
        meta::{Annotation, Attach, Meta},
        model::{Model, collection, namespace, route},
        property::{
            Property, TypeTag, default_value, enum_values, read_only, required, type_of,
        },
        registry::Registry,
        store::Site,
        validate::{
            Validation, ValidationRecord, create_against_property_validator, create_validator,
        },
        value::Value,
    };
    pub use crate::registry;
}
