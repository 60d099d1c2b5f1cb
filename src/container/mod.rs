//! The container: binding registration and bookkeeping.
//!
//! Resolution lives in [`resolve`], caller overrides in [`overrides`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::InstanceCache;
use crate::config::ContainerOptions;
use crate::descriptors::{BindingDescriptor, ConstructorDescriptor};
use crate::error::DiResult;
use crate::internal::InFlight;
use crate::introspection::{TypeInfo, TypeIntrospector};
use crate::key::Key;
use crate::observer::{DiObserver, Observers};
use crate::registration::{Binding, Producer, Registry};
use crate::traits::Injectable;

pub mod overrides;
mod resolve;

pub use overrides::Overrides;

static NEXT_CONTAINER_ID: AtomicUsize = AtomicUsize::new(1);

/// Inversion-of-control container.
///
/// The container owns the binding registry and the instance cache. It is
/// created explicitly, configured during a bootstrap phase, and then handed
/// to whatever needs services, typically behind an `Arc`. Every method takes
/// `&self`, and the container is `Send + Sync`.
///
/// Registration is expected to finish before concurrent resolution starts;
/// rebinding while other threads resolve the same key is memory safe but
/// its outcome is unspecified.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, Producer};
/// use std::sync::Arc;
///
/// struct Mailer { from: String }
///
/// let container = Container::new();
/// container.bind("mailer", Producer::factory(|_| {
///     Ok(Mailer { from: "foo@bar.com".to_string() })
/// }));
///
/// let a = container.make_as::<Mailer>("mailer").unwrap();
/// let b = container.make_as::<Mailer>("mailer").unwrap();
/// assert_eq!(a.from, "foo@bar.com");
/// assert!(!Arc::ptr_eq(&a, &b));
/// ```
pub struct Container {
    id: usize,
    options: ContainerOptions,
    pub(crate) registry: Registry,
    pub(crate) cache: InstanceCache,
    pub(crate) introspector: TypeIntrospector,
    in_flight: InFlight,
    observers: Observers,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Creates an empty container.
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            id: NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed),
            options,
            registry: Registry::default(),
            cache: InstanceCache::new(),
            introspector: TypeIntrospector::default(),
            in_flight: InFlight::default(),
            observers: Observers::default(),
        }
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    // --- Registration ---

    /// Registers a transient binding.
    ///
    /// Overwrites any prior binding for `key` and evicts its cached
    /// instance. Last write wins.
    pub fn bind(&self, key: impl Into<Key>, producer: Producer) -> &Self {
        self.bind_shared(key, producer, false)
    }

    /// Registers a shared binding: the first built value is reused.
    pub fn singleton(&self, key: impl Into<Key>, producer: Producer) -> &Self {
        self.bind_shared(key, producer, true)
    }

    /// Registers a binding with an explicit sharing policy.
    ///
    /// Instance producers are shared regardless of `shared`.
    pub fn bind_shared(&self, key: impl Into<Key>, producer: Producer, shared: bool) -> &Self {
        let key = key.into();
        if let Some(info) = producer.type_info() {
            self.introspector.register(info.clone());
        }

        let binding = Binding::new(producer, shared);
        let kind = binding.kind();
        let lifetime = binding.lifetime;
        let replaced = self.registry.insert(key.clone(), binding);
        let evicted = self.cache.evict(&key);

        tracing::debug!(
            key = %key,
            kind = ?kind,
            lifetime = ?lifetime,
            replaced,
            evicted,
            "binding registered"
        );
        self
    }

    /// Registers a pre-built value.
    pub fn instance<T: Send + Sync + 'static>(&self, key: impl Into<Key>, value: T) -> &Self {
        self.bind_shared(key, Producer::instance(value), true)
    }

    /// Registers a pre-built value the caller keeps a handle to.
    pub fn instance_arc<T: Send + Sync + 'static>(&self, key: impl Into<Key>, value: Arc<T>) -> &Self {
        self.bind_shared(key, Producer::instance_arc(value), true)
    }

    /// Transient binding under the interface key of `I`.
    pub fn bind_trait<I: ?Sized + 'static>(&self, producer: Producer) -> &Self {
        self.bind(Key::of_trait::<I>(), producer)
    }

    /// Shared binding under the interface key of `I`.
    pub fn singleton_trait<I: ?Sized + 'static>(&self, producer: Producer) -> &Self {
        self.singleton(Key::of_trait::<I>(), producer)
    }

    /// Registers a pre-built interface value under the interface key of `I`.
    pub fn instance_trait<I: ?Sized + Send + Sync + 'static>(&self, value: Arc<I>) -> &Self {
        self.bind_shared(Key::of_trait::<I>(), Producer::instance_trait(value), true)
    }

    /// Records the constructor metadata of `T` without binding anything.
    pub fn register<T: Injectable>(&self) -> &Self {
        self.introspector.ensure(&Key::of::<T>(), TypeInfo::of::<T>);
        self
    }

    /// Adds a resolution observer.
    pub fn add_observer(&self, observer: Arc<dyn DiObserver>) -> &Self {
        self.observers.add(observer);
        self
    }

    // --- Queries ---

    /// Whether an explicit binding exists for `key`.
    ///
    /// Distinguishes bound keys from types that are merely auto-wirable.
    pub fn has_binding(&self, key: impl Into<Key>) -> bool {
        self.registry.contains_key(&key.into())
    }

    /// Whether a built value for `key` sits in the instance cache.
    pub fn is_cached(&self, key: impl Into<Key>) -> bool {
        self.cache.contains(&key.into())
    }

    /// Evicts the cached instance of `key`, keeping its binding.
    ///
    /// The next resolution of a shared factory or concrete binding builds
    /// a fresh value. Returns whether anything was cached.
    pub fn forget_instance(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let evicted = self.cache.evict(&key);
        tracing::debug!(key = %key, evicted, "instance forgotten");
        evicted
    }

    /// The constructor descriptor the introspector holds for a type key.
    pub fn describe(&self, key: impl Into<Key>) -> DiResult<Arc<ConstructorDescriptor>> {
        let info = self.introspector.describe_constructor(&key.into())?;
        Ok(Arc::clone(info.descriptor()))
    }

    /// Snapshot of every binding.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.registry
            .snapshot()
            .into_iter()
            .map(|(key, binding)| BindingDescriptor {
                cached: self.cache.contains(&key),
                kind: binding.kind(),
                lifetime: binding.lifetime,
                key,
            })
            .collect()
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        s.push_str("Bindings:\n");
        for d in self.descriptors() {
            s.push_str(&format!(
                "  {}: {:?} {:?}{}\n",
                d.key,
                d.kind,
                d.lifetime,
                if d.cached { " (cached)" } else { "" }
            ));
        }
        s
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("bindings", &self.registry.snapshot().len())
            .finish()
    }
}
