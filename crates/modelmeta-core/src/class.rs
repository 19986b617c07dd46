//! Runtime class descriptors, instances, and the targets metadata is attached
//! to or read from.
//!
//! Every class descends from the implicit universal base. Ancestor walks
//! include the base; constructor chains and metadata reads never do.

use crate::{BASE_CLASS_NAME, value::Value};
use derive_more::Display;
use std::{
    collections::BTreeMap,
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc, LazyLock,
        atomic::{AtomicU64, Ordering},
    },
};

// ids below this are reserved for the native classes
const FIRST_USER_CLASS_ID: u64 = 16;

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(FIRST_USER_CLASS_ID);

static BASE: LazyLock<Class> = LazyLock::new(|| Class::native(Native::Object, None));
static TEXT: LazyLock<Class> = LazyLock::new(|| Class::native(Native::Text, Some(&*BASE)));
static BOOLEAN: LazyLock<Class> = LazyLock::new(|| Class::native(Native::Boolean, Some(&*BASE)));
static DATE: LazyLock<Class> = LazyLock::new(|| Class::native(Native::Date, Some(&*BASE)));
static NUMBER: LazyLock<Class> = LazyLock::new(|| Class::native(Native::Number, Some(&*BASE)));

static NULL: Value = Value::Null;

///
/// ClassId
///
/// Process-unique class identity. Storage slots are keyed by it.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("#{_0}")]
pub struct ClassId(u64);

///
/// Native
///
/// The built-in classes: the universal base plus the four value classes.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Native {
    Object,
    Text,
    Boolean,
    Date,
    Number,
}

impl Native {
    const fn id(self) -> ClassId {
        ClassId(self as u64)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => BASE_CLASS_NAME,
            Self::Text => "Text",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::Number => "Number",
        }
    }
}

impl fmt::Display for Native {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// Class
///
/// Cheap shared handle; equality and hashing follow the class identity.
///

#[derive(Clone)]
pub struct Class(Arc<ClassDef>);

struct ClassDef {
    id: ClassId,
    name: String,
    parent: Option<Class>,
    native: Option<Native>,
}

impl Class {
    /// Declare a class deriving directly from the universal base.
    pub fn new(name: impl Into<String>) -> Self {
        Self::extends(name, &BASE)
    }

    /// Declare a class deriving from `parent`.
    pub fn extends(name: impl Into<String>, parent: &Self) -> Self {
        let id = ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed));

        Self(Arc::new(ClassDef {
            id,
            name: name.into(),
            parent: Some(parent.clone()),
            native: None,
        }))
    }

    fn native(native: Native, parent: Option<&Self>) -> Self {
        Self(Arc::new(ClassDef {
            id: native.id(),
            name: native.name().to_string(),
            parent: parent.cloned(),
            native: Some(native),
        }))
    }

    /// The implicit universal base every class derives from.
    #[must_use]
    pub fn base() -> &'static Self {
        &BASE
    }

    #[must_use]
    pub fn text() -> &'static Self {
        &TEXT
    }

    #[must_use]
    pub fn boolean() -> &'static Self {
        &BOOLEAN
    }

    #[must_use]
    pub fn date() -> &'static Self {
        &DATE
    }

    #[must_use]
    pub fn number() -> &'static Self {
        &NUMBER
    }

    #[must_use]
    pub fn id(&self) -> ClassId {
        self.0.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Direct parent; `None` only for the universal base.
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref()
    }

    #[must_use]
    pub fn native_kind(&self) -> Option<Native> {
        self.0.native
    }

    #[must_use]
    pub fn is_base(&self) -> bool {
        self.0.native == Some(Native::Object)
    }

    /// This class followed by every ancestor, ending with the universal base.
    #[must_use]
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }

    /// The classes whose metadata this class sees: itself, then each ancestor
    /// short of the universal base. The base only sees its own entries.
    pub fn metadata_lineage(&self) -> impl Iterator<Item = &Self> {
        let ancestors = self.lineage().skip(1).take_while(|class| !class.is_base());

        std::iter::once(self).chain(ancestors)
    }

    /// True if `other` appears anywhere in this class's lineage.
    #[must_use]
    pub fn is_a(&self, other: &Self) -> bool {
        self.lineage().any(|class| class == other)
    }

    /// Create an instance with no fields set.
    #[must_use]
    pub fn instantiate(&self) -> Object {
        Object::new(self)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({}{})", self.0.name, self.0.id)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

///
/// Lineage
///

pub struct Lineage<'a> {
    next: Option<&'a Class>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a Class;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();

        Some(current)
    }
}

///
/// Object
///
/// An instance: its class plus live field values. Reading a field that was
/// never set yields `Value::Null`.
///

#[derive(Clone, Debug)]
pub struct Object {
    class: Class,
    fields: BTreeMap<String, Value>,
}

impl Object {
    #[must_use]
    pub fn new(class: &Class) -> Self {
        Self {
            class: class.clone(),
            fields: BTreeMap::new(),
        }
    }

    /// An instance of the universal base.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(&BASE)
    }

    #[must_use]
    pub const fn class(&self) -> &Class {
        &self.class
    }

    #[must_use]
    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&NULL)
    }

    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Set a field, returning the previous value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

///
/// Target
///
/// Whatever an operation addresses. `Missing` stands in for an absent
/// host value (null / undefined).
///

#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    Missing,
    Class(&'a Class),
    Instance(&'a Object),
    Primitive(&'a Value),
}

impl<'a> Target<'a> {
    /// The class owning this target: the class itself, an instance's class,
    /// or a primitive's native class.
    #[must_use]
    pub fn constructor(self) -> Option<&'a Class> {
        match self {
            Self::Missing => None,
            Self::Class(class) => Some(class),
            Self::Instance(object) => Some(object.class()),
            Self::Primitive(value) => value.native_class(),
        }
    }

    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }

    #[must_use]
    pub const fn is_class(self) -> bool {
        matches!(self, Self::Class(_))
    }

    #[must_use]
    pub const fn is_instance(self) -> bool {
        matches!(self, Self::Instance(_))
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing target"),
            Self::Class(class) => write!(f, "class '{class}'"),
            Self::Instance(object) => write!(f, "instance of '{}'", object.class()),
            Self::Primitive(value) => write!(f, "{} value", value.type_name()),
        }
    }
}

impl<'a> From<&'a Class> for Target<'a> {
    fn from(class: &'a Class) -> Self {
        Self::Class(class)
    }
}

impl<'a> From<&'a Object> for Target<'a> {
    fn from(object: &'a Object) -> Self {
        Self::Instance(object)
    }
}

impl<'a> From<&'a mut Object> for Target<'a> {
    fn from(object: &'a mut Object) -> Self {
        Self::Instance(object)
    }
}

impl<'a> From<&'a Value> for Target<'a> {
    fn from(value: &'a Value) -> Self {
        if value.is_null() {
            Self::Missing
        } else {
            Self::Primitive(value)
        }
    }
}

impl<'a, T: Into<Self>> From<Option<T>> for Target<'a> {
    fn from(target: Option<T>) -> Self {
        target.map_or(Self::Missing, Into::into)
    }
}

///
/// constructor_chain
///
/// Ancestor classes of a target, immediate class first and root-most last,
/// excluding the universal base. Missing targets, nulls and plain objects
/// yield an empty chain.
///

pub fn constructor_chain<'a>(target: impl Into<Target<'a>>) -> Vec<Class> {
    target.into().constructor().map_or_else(Vec::new, |class| {
        class
            .lineage()
            .take_while(|class| !class.is_base())
            .cloned()
            .collect()
    })
}

///
/// TESTS
///
