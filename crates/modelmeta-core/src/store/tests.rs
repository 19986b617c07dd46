use crate::{
    class::{Class, Object, Target},
    store::{MetadataStore, Site, StoreError},
    value::Value,
};
use proptest::prelude::*;

// ---- helpers -----------------------------------------------------------

fn model() -> (MetadataStore, Class) {
    (MetadataStore::new(), Class::new("Model"))
}

// ---- class / property entries ------------------------------------------

#[test]
fn class_entry_is_visible_through_class_and_instance() {
    let (store, class) = model();
    store.set("title", "Users".to_string(), &class, Site::Class).unwrap();

    let instance = class.instantiate();
    assert!(store.has("title", &class, Site::Class).unwrap());
    assert!(store.has("title", &instance, Site::Class).unwrap());
    assert_eq!(
        store.get::<String>("title", &instance, Site::Class).unwrap(),
        Some("Users".to_string())
    );
}

#[test]
fn property_entry_written_through_instance_lands_on_class() {
    let (store, class) = model();
    let instance = class.instantiate();
    store
        .set("label", 7_u32, &instance, Site::property("age"))
        .unwrap();

    assert_eq!(
        store.get::<u32>("label", &class, Site::property("age")).unwrap(),
        Some(7)
    );
}

#[test]
fn same_base_key_does_not_collide_across_kinds() {
    let (store, class) = model();
    store.set("k", 1_u8, &class, Site::Class).unwrap();

    assert!(!store.has("k", &class, Site::property("k")).unwrap());
    assert!(!store.has("k", &class, Site::argument("k", 0)).unwrap());
}

#[test]
fn last_write_wins() {
    let (store, class) = model();
    store.set("k", 1_u8, &class, Site::Class).unwrap();
    store.set("k", 2_u8, &class, Site::Class).unwrap();

    assert_eq!(store.get::<u8>("k", &class, Site::Class).unwrap(), Some(2));
}

#[test]
fn subclass_inherits_until_it_overrides() {
    let (store, parent) = model();
    let child = Class::extends("Child", &parent);
    store.set("k", 1_u8, &parent, Site::property("p")).unwrap();

    assert_eq!(
        store.get::<u8>("k", &child.instantiate(), Site::property("p")).unwrap(),
        Some(1)
    );

    store.set("k", 2_u8, &child, Site::property("p")).unwrap();
    assert_eq!(
        store.get::<u8>("k", &child, Site::property("p")).unwrap(),
        Some(2)
    );
    assert_eq!(
        store.get::<u8>("k", &parent, Site::property("p")).unwrap(),
        Some(1)
    );
}

#[test]
fn get_all_lists_root_most_first() {
    let (store, parent) = model();
    let child = Class::extends("Child", &parent);
    store.set("k", "child", &child, Site::Class).unwrap();
    store.set("k", "parent", &parent, Site::Class).unwrap();

    assert_eq!(
        store.get_all::<&str>("k", &child, Site::Class).unwrap(),
        vec!["parent", "child"]
    );
}

#[test]
fn update_sees_only_own_value() {
    let (store, parent) = model();
    let child = Class::extends("Child", &parent);
    store.set("list", vec![1_u8], &parent, Site::Class).unwrap();

    store
        .update::<Vec<u8>, _>("list", &child, Site::Class, |current| {
            assert!(current.is_none());
            vec![2]
        })
        .unwrap();
    store
        .update::<Vec<u8>, _>("list", &child, Site::Class, |current| {
            let mut next = current.cloned().unwrap_or_default();
            next.push(3);
            next
        })
        .unwrap();

    assert_eq!(
        store.get_all::<Vec<u8>>("list", &child, Site::Class).unwrap(),
        vec![vec![1], vec![2, 3]]
    );
}

// ---- arguments ------------------------------------------------------------

#[test]
fn argument_positions_are_sparse() {
    let (store, class) = model();
    store.set("arg", "first", &class, Site::argument("run", 0)).unwrap();
    store.set("arg", "second", &class, Site::argument("run", 1)).unwrap();

    assert!(store.has("arg", &class, Site::argument("run", 0)).unwrap());
    assert!(store.has("arg", &class, Site::argument("run", 1)).unwrap());
    assert!(!store.has("arg", &class, Site::argument("run", 2)).unwrap());
    assert_eq!(
        store.get::<&str>("arg", &class, Site::argument("run", 2)).unwrap(),
        None
    );
}

#[test]
fn empty_argument_value_still_counts_as_present() {
    let (store, class) = model();
    store
        .set("arg", Value::Null, &class, Site::argument("run", 3))
        .unwrap();

    assert!(store.has("arg", &class, Site::argument("run", 3)).unwrap());
    assert!(!store.has("arg", &class, Site::argument("run", 0)).unwrap());
}

#[test]
fn extreme_argument_positions_are_stored_sparsely() {
    let (store, class) = model();
    store
        .set("arg", "last", &class, Site::argument("run", usize::MAX))
        .unwrap();
    store
        .set("arg", "far", &class, Site::argument("run", 1 << 40))
        .unwrap();

    assert_eq!(
        store
            .get::<&str>("arg", &class, Site::argument("run", usize::MAX))
            .unwrap(),
        Some("last")
    );
    assert!(store.has("arg", &class, Site::argument("run", 1 << 40)).unwrap());
    assert!(!store.has("arg", &class, Site::argument("run", 0)).unwrap());
}

// ---- universal base ---------------------------------------------------------

#[test]
fn plain_object_entries_stay_off_other_classes() {
    let (store, class) = model();
    let plain = Object::plain();
    store.set("title", "plain", &plain, Site::Class).unwrap();
    store.set("label", 1_u8, &plain, Site::property("x")).unwrap();
    store.record_property(&plain, "x").unwrap();

    assert_eq!(
        store.get::<&str>("title", &plain, Site::Class).unwrap(),
        Some("plain")
    );
    assert!(!store.has("title", &class, Site::Class).unwrap());
    assert!(!store.has("title", &class.instantiate(), Site::Class).unwrap());
    assert!(!store.has("label", &class, Site::property("x")).unwrap());
    assert!(store.get_all::<&str>("title", &class, Site::Class).unwrap().is_empty());
    assert!(store.properties(&class).unwrap().is_empty());
    assert_eq!(store.properties(&plain).unwrap(), vec!["x"]);
}

// ---- failures ---------------------------------------------------------------

#[test]
fn missing_target_is_rejected() {
    let store = MetadataStore::new();

    assert!(matches!(
        store.set("k", 1_u8, Target::Missing, Site::Class),
        Err(StoreError::MissingTarget)
    ));
    assert!(matches!(
        store.has("k", &Value::Null, Site::Class),
        Err(StoreError::MissingTarget)
    ));
}

#[test]
fn empty_member_names_are_invalid() {
    let (store, class) = model();

    assert!(matches!(
        store.get::<u8>("k", &class, Site::property("")),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.set("k", 1_u8, &class, Site::argument("", 0)),
        Err(StoreError::InvalidArgument(_))
    ));
}

#[test]
fn reading_with_the_wrong_type_is_a_mismatch() {
    let (store, class) = model();
    store.set("k", 1_u8, &class, Site::Class).unwrap();

    assert!(matches!(
        store.get::<String>("k", &class, Site::Class),
        Err(StoreError::TypeMismatch { .. })
    ));
}

#[test]
fn primitives_share_their_native_class_slot() {
    let store = MetadataStore::new();
    store.set("unit", "si", Class::number(), Site::Class).unwrap();

    assert!(store.has("unit", &Value::from(4), Site::Class).unwrap());
    assert!(!store.has("unit", &Value::from("4"), Site::Class).unwrap());
}

#[test]
fn properties_come_from_the_index() {
    let (store, class) = model();
    store.record_property(&class, "a").unwrap();
    store.record_property(&class.instantiate(), "b").unwrap();

    assert_eq!(store.properties(&class).unwrap(), vec!["a", "b"]);
    assert!(store.properties(&Object::plain()).unwrap().is_empty());
}

// ---- properties -------------------------------------------------------------

proptest! {
    #[test]
    fn set_is_visible_through_every_alias(value in any::<i64>(), depth in 0usize..4) {
        let store = MetadataStore::new();
        let root = Class::new("Root");
        let mut leaf = root.clone();
        for i in 0..depth {
            leaf = Class::extends(format!("Level{i}"), &leaf);
        }

        store.set("k", value, &root, Site::Class).unwrap();
        store.set("k", value, &root, Site::property("p")).unwrap();

        let instance = leaf.instantiate();
        prop_assert_eq!(
            store.get::<i64>("k", &leaf, Site::Class).unwrap(),
            Some(value)
        );
        prop_assert_eq!(
            store.get::<i64>("k", &instance, Site::Class).unwrap(),
            Some(value)
        );
        prop_assert!(store.has("k", &instance, Site::property("p")).unwrap());
    }

    #[test]
    fn only_written_positions_are_present(
        positions in proptest::collection::btree_set(0usize..16, 0..6),
        asked in 0usize..16,
    ) {
        let (store, class) = model();
        for &position in &positions {
            store.set("arg", position, &class, Site::argument("run", position)).unwrap();
        }

        let present = store.has("arg", &class, Site::argument("run", asked)).unwrap();
        prop_assert_eq!(present, positions.contains(&asked));
        if present {
            prop_assert_eq!(
                store.get::<usize>("arg", &class, Site::argument("run", asked)).unwrap(),
                Some(asked)
            );
        }
    }
}
