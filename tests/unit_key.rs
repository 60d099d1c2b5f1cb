/// Unit tests for Key type methods

use ferrous_ioc::{key_of_type, Key};
use std::any::TypeId;
use std::collections::HashMap;

trait Plugin {}
struct Database;

#[test]
fn test_key_display_name() {
    assert_eq!(Key::named("database").display_name(), "database");
    assert_eq!(Key::of::<String>().display_name(), "alloc::string::String");
    assert!(Key::of_trait::<dyn Plugin>().display_name().ends_with("Plugin"));
}

#[test]
fn test_key_kinds() {
    let named = Key::named("auth");
    let ty = Key::of::<Database>();
    let tr = Key::of_trait::<dyn Plugin>();

    assert!(named.is_named() && !named.is_interface());
    assert!(!ty.is_named() && !ty.is_interface());
    assert!(tr.is_interface() && !tr.is_named());

    assert_eq!(named.type_id(), None);
    assert_eq!(ty.type_id(), Some(TypeId::of::<Database>()));
    assert_eq!(tr.type_id(), Some(TypeId::of::<dyn Plugin>()));
}

#[test]
fn test_type_keys_compare_by_type_id() {
    // The recorded name is diagnostic only.
    let a = Key::Type(TypeId::of::<Database>(), "Database");
    let b = Key::Type(TypeId::of::<Database>(), "app::Database");
    assert_eq!(a, b);
    assert_eq!(a, key_of_type::<Database>());

    // A type key and an interface key never match, even for the same id.
    let id = TypeId::of::<Database>();
    assert_ne!(Key::Type(id, "x"), Key::Trait(id, "x"));
}

#[test]
fn test_named_keys_from_strings() {
    let mut map = HashMap::new();
    map.insert(Key::from("mailer"), 1);
    map.insert(Key::from(String::from("mailer")), 2);
    map.insert(Key::named(std::borrow::Cow::Borrowed("template")), 3);

    assert_eq!(map.len(), 2);
    assert_eq!(map[&Key::named("mailer")], 2);
    assert_eq!(Key::from(&Key::named("template")), Key::named("template"));
}
