//! Caller-supplied overrides for a single resolution.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::key::Key;
use crate::registration::{erase_trait, AnyArc};

/// Values that bypass the registry and cache for one `make` call.
///
/// A key override short-circuits resolution of that key entirely. A
/// parameter override supplies a constructor parameter of the type being
/// built, matched by parameter name. Overrides apply to the requested
/// build only, not to dependencies resolved below it, and a value built
/// with overrides is never cached.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Overrides, Parameter};
///
/// struct Database { host: String, port: u16 }
///
/// impl Injectable for Database {
///     fn parameters() -> Vec<Parameter> {
///         vec![
///             Parameter::value("host"),
///             Parameter::value("port").with_default(5432u16),
///         ]
///     }
///
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Database { host: args.next_value()?, port: args.next_value()? })
///     }
/// }
///
/// let container = Container::new();
/// let overrides = Overrides::new().with_parameter("host", String::from("db.internal"));
/// let db = container.make_type_with::<Database>(&overrides).unwrap();
/// assert_eq!(db.host, "db.internal");
/// assert_eq!(db.port, 5432);
/// ```
#[derive(Clone, Default)]
pub struct Overrides {
    by_key: HashMap<Key, AnyArc, ahash::RandomState>,
    by_parameter: HashMap<Cow<'static, str>, AnyArc, ahash::RandomState>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the value of `key`.
    pub fn with_key<T: Send + Sync + 'static>(self, key: impl Into<Key>, value: T) -> Self {
        self.with_key_arc(key, Arc::new(value))
    }

    /// Overrides the value of `key` with an existing `Arc`.
    pub fn with_key_arc<T: Send + Sync + 'static>(mut self, key: impl Into<Key>, value: Arc<T>) -> Self {
        self.by_key.insert(key.into(), value);
        self
    }

    /// Overrides the interface key of `I`.
    pub fn with_trait<I: ?Sized + Send + Sync + 'static>(mut self, value: Arc<I>) -> Self {
        self.by_key.insert(Key::of_trait::<I>(), erase_trait(value));
        self
    }

    /// Supplies the constructor parameter called `name`.
    pub fn with_parameter<T: Send + Sync + 'static>(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: T,
    ) -> Self {
        self.by_parameter.insert(name.into(), Arc::new(value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty() && self.by_parameter.is_empty()
    }

    pub(crate) fn for_key(&self, key: &Key) -> Option<&AnyArc> {
        self.by_key.get(key)
    }

    pub(crate) fn for_parameter(&self, name: &str) -> Option<&AnyArc> {
        self.by_parameter.get(name)
    }
}

impl std::fmt::Debug for Overrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overrides")
            .field("keys", &self.by_key.keys().collect::<Vec<_>>())
            .field("parameters", &self.by_parameter.keys().collect::<Vec<_>>())
            .finish()
    }
}
