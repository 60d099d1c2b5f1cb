//! Binding lifetime definitions.

/// Binding lifetimes controlling instance caching behavior
///
/// Every binding is either shared or transient. Instance bindings are
/// always shared: the provided value is handed out as-is and never rebuilt.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, Lifetime, Producer};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// let container = Container::new();
/// container.singleton("database", Producer::factory(|_| {
///     Ok(Database { url: "postgres://localhost".to_string() })
/// }));
/// container.bind("request", Producer::factory(|_| Ok(0u64)));
///
/// let db1 = container.make_as::<Database>("database").unwrap();
/// let db2 = container.make_as::<Database>("database").unwrap();
/// assert!(Arc::ptr_eq(&db1, &db2)); // Same instance
///
/// let r1 = container.make_as::<u64>("request").unwrap();
/// let r2 = container.make_as::<u64>("request").unwrap();
/// assert!(!Arc::ptr_eq(&r1, &r2)); // Always different
///
/// assert!(Lifetime::Singleton.is_shared());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Built once on first resolution, then served from the instance cache
    /// until the key is rebound.
    Singleton,
    /// Built on every resolution, never cached.
    Transient,
}

impl Lifetime {
    /// Whether values of this lifetime are cached.
    #[inline]
    pub fn is_shared(self) -> bool {
        matches!(self, Lifetime::Singleton)
    }

    pub(crate) fn from_shared(shared: bool) -> Self {
        if shared {
            Lifetime::Singleton
        } else {
            Lifetime::Transient
        }
    }
}
