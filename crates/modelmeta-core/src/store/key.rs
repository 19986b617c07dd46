use crate::store::StoreError;
use derive_more::{Deref, Display};
use std::fmt;

///
/// MetaKind
///
/// Granularity of a metadata entry. Decided only by the call-site shape, so
/// one base key can be used at every granularity without colliding.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MetaKind {
    Class,
    Property,
    Argument,
}

impl MetaKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Property => "property",
            Self::Argument => "argument",
        }
    }
}

impl fmt::Display for MetaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// MetaKey
///
/// Storage key in the form `meta:{kind}:{base}`.
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MetaKey(String);

impl MetaKey {
    pub const PREFIX: &'static str = "meta";

    #[must_use]
    pub fn new(kind: MetaKind, base: &str) -> Self {
        Self([Self::PREFIX, kind.as_str(), base].join(":"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

///
/// Site
///
/// Where on a target an entry lives: the class itself, a named property, or
/// a positional parameter of a named method.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Site<'a> {
    Class,
    Property(&'a str),
    Argument { method: &'a str, position: usize },
}

impl<'a> Site<'a> {
    #[must_use]
    pub const fn property(name: &'a str) -> Self {
        Self::Property(name)
    }

    #[must_use]
    pub const fn argument(method: &'a str, position: usize) -> Self {
        Self::Argument { method, position }
    }

    #[must_use]
    pub const fn kind(self) -> MetaKind {
        match self {
            Self::Class => MetaKind::Class,
            Self::Property(_) => MetaKind::Property,
            Self::Argument { .. } => MetaKind::Argument,
        }
    }

    /// Member name the entry hangs off, if any.
    #[must_use]
    pub const fn member(self) -> Option<&'a str> {
        match self {
            Self::Class => None,
            Self::Property(name) | Self::Argument { method: name, .. } => Some(name),
        }
    }

    #[must_use]
    pub const fn position(self) -> Option<usize> {
        match self {
            Self::Argument { position, .. } => Some(position),
            _ => None,
        }
    }

    /// Reject property and argument sites without a member name.
    pub fn check(self) -> Result<(), StoreError> {
        match self {
            Self::Class => Ok(()),
            Self::Property(name) if name.is_empty() => Err(StoreError::InvalidArgument(
                "a property entry needs a property name".to_string(),
            )),
            Self::Argument { method, .. } if method.is_empty() => {
                Err(StoreError::InvalidArgument(
                    "an argument entry needs a method name and a parameter position".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Site<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class"),
            Self::Property(name) => write!(f, "property '{name}'"),
            Self::Argument { method, position } => {
                write!(f, "argument {position} of '{method}'")
            }
        }
    }
}

///
/// TESTS
///
