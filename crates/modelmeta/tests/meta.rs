use modelmeta::{
    core::{Error as CoreError, meta::MetaError, store::StoreError},
    prelude::*,
};

// ---- helpers ----------------------------------------------------------

/// A `title` annotation on the class, a property, and two parameters.
fn titled(registry: &Registry, title: &Annotation<String>) -> Class {
    let class = Class::new("Model");
    let store = registry.store();

    title.value("class or object title".into()).to_class(store, &class).unwrap();
    title.value("property title".into()).to_property(store, &class, "test").unwrap();
    title.value("parameter title".into()).to_argument(store, &class, "test1", 0).unwrap();
    title.value("param2 title".into()).to_argument(store, &class, "test1", 1).unwrap();

    class
}

#[test]
fn every_site_reads_back_through_class_and_instance() {
    let registry = Registry::new();
    let title = Annotation::with_assert("title", |v: &String| !v.is_empty()).unwrap();
    let class = titled(&registry, &title);
    let meta = registry.meta::<String>("title").unwrap();

    for target in [Target::from(&class), Target::from(&class.instantiate())] {
        assert!(meta.has_class_meta(target).unwrap());
        assert!(meta.has_property_meta(target, "test").unwrap());
        assert!(meta.has_argument_meta(target, "test1", 0).unwrap());
        assert!(meta.has_argument_meta(target, "test1", 1).unwrap());
        assert!(!meta.has_argument_meta(target, "test1", 2).unwrap());

        assert_eq!(
            meta.get_class_meta(target).unwrap().as_deref(),
            Some("class or object title")
        );
        assert_eq!(
            meta.get_property_meta(target, "test").unwrap().as_deref(),
            Some("property title")
        );
        assert_eq!(
            meta.get_argument_meta(target, "test1", 0).unwrap().as_deref(),
            Some("parameter title")
        );
        assert_eq!(
            meta.get_argument_meta(target, "test1", 1).unwrap().as_deref(),
            Some("param2 title")
        );
        assert_eq!(meta.get_argument_meta(target, "test1", 2).unwrap(), None);
    }
}

#[test]
fn annotations_without_assertion_accept_anything() {
    let registry = Registry::new();
    let noop = Annotation::<String>::new("noop").unwrap();
    let class = titled(&registry, &noop);
    let meta = registry.meta::<String>("noop").unwrap();

    assert!(meta.has_class_meta(&class.instantiate()).unwrap());
    assert!(!registry.meta::<String>("title").unwrap().has_class_meta(&class).unwrap());
}

#[test]
fn failed_assertion_rejects_the_annotation() {
    let registry = Registry::new();
    let min = Annotation::with_assert("test", |v: &Value| {
        v.as_number().is_some_and(|n| n >= 20.0)
    })
    .unwrap();

    for rejected in [Value::from(10), Value::from("Hello World"), Value::Null] {
        let class = Class::new("Rejected");
        let err = min.value(rejected).to_class(registry.store(), &class).unwrap_err();
        assert!(matches!(err, CoreError::MetaError(MetaError::AssertionFailed { .. })));
    }

    let class = Class::new("Accepted");
    min.value(Value::from(20)).to_class(registry.store(), &class).unwrap();

    let meta = registry.meta::<Value>("test").unwrap();
    assert_eq!(
        meta.get_class_meta(&class.instantiate()).unwrap(),
        Some(Value::from(20))
    );
}

#[test]
fn keys_must_be_non_empty() {
    let registry = Registry::new();

    assert!(matches!(Annotation::<String>::new(""), Err(MetaError::EmptyKey)));
    assert!(matches!(registry.meta::<String>(""), Err(MetaError::EmptyKey)));
}

#[test]
fn destructive_reads() {
    let registry = Registry::new();
    let meta = registry.meta::<String>("key").unwrap();
    let plain = Object::plain();

    assert!(matches!(
        meta.has_class_meta(Target::Missing),
        Err(StoreError::MissingTarget)
    ));
    assert!(matches!(
        meta.get_class_meta(&Value::Null),
        Err(StoreError::MissingTarget)
    ));
    assert!(matches!(
        meta.has_argument_meta(&plain, "", 1),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        meta.get_property_meta(&plain, ""),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(!meta.has_argument_meta(&plain, "test", 1).unwrap());
    assert_eq!(meta.get_argument_meta(&plain, "test", 1).unwrap(), None);
}

#[test]
fn properties_are_listed_per_key() {
    let registry = Registry::new();
    let prop = Annotation::<Value>::new("Prop").unwrap();
    let prop2 = Annotation::<Value>::new("Prop2").unwrap();
    let class = Class::new("Model");
    let store = registry.store();

    prop.value(Value::Null).to_property(store, &class, "tag1").unwrap();
    prop.value(Value::Null).to_property(store, &class, "tag2").unwrap();
    prop2.value(Value::Null).to_property(store, &class, "tag3").unwrap();

    let get_prop = registry.meta::<Value>("Prop").unwrap();
    let get_prop2 = registry.meta::<Value>("Prop2").unwrap();

    assert_eq!(get_prop.properties(&class).unwrap(), vec!["tag1", "tag2"]);
    assert_eq!(get_prop2.properties(&class).unwrap(), vec!["tag3"]);
    assert!(get_prop.properties(&Object::plain()).unwrap().is_empty());
}

#[test]
fn attaching_needs_a_target() {
    let registry = Registry::new();
    let prop = Annotation::<String>::new("prop").unwrap();
    let err = prop
        .value(String::new())
        .to_class(registry.store(), Target::Missing)
        .unwrap_err();

    assert!(matches!(err, CoreError::StoreError(StoreError::MissingTarget)));
}

#[test]
fn subclasses_inherit_until_they_override() {
    let registry = Registry::new();
    let title = Annotation::<String>::new("title").unwrap();
    let parent = titled(&registry, &title);
    let child = Class::extends("Child", &parent);
    let meta = registry.meta::<String>("title").unwrap();

    assert_eq!(
        meta.get_property_meta(&child, "test").unwrap().as_deref(),
        Some("property title")
    );

    title.value("child title".into()).to_property(registry.store(), &child, "test").unwrap();
    assert_eq!(
        meta.get_property_meta(&child.instantiate(), "test").unwrap().as_deref(),
        Some("child title")
    );
    assert_eq!(
        meta.get_property_meta(&parent, "test").unwrap().as_deref(),
        Some("property title")
    );
}
