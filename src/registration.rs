//! Binding registry: producers, bindings and their storage.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::container::Container;
use crate::descriptors::BindingKind;
use crate::error::{DiError, DiResult};
use crate::introspection::TypeInfo;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::traits::Injectable;

/// Type-erased shared value, the currency of the resolution engine.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type FactoryFn = Arc<dyn Fn(&Container) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type UpcastFn = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

// Interface values travel as `Arc<Arc<dyn Trait>>` so they can be erased.
pub(crate) fn erase_trait<I: ?Sized + Send + Sync + 'static>(value: Arc<I>) -> AnyArc {
    Arc::new(value)
}

pub(crate) fn downcast_trait<I: ?Sized + Send + Sync + 'static>(value: AnyArc) -> Option<Arc<I>> {
    value.downcast::<Arc<I>>().ok().map(|inner| Arc::clone(&*inner))
}

#[derive(Clone)]
pub(crate) enum ProducerKind {
    Concrete {
        target: Key,
        info: Option<TypeInfo>,
        upcast: Option<UpcastFn>,
    },
    Factory(FactoryFn),
    Instance(AnyArc),
}

/// How a binding produces its value.
///
/// One of three shapes: a concrete target to construct, a factory callback
/// receiving the container, or a pre-built instance.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Parameter, Producer};
/// use std::sync::Arc;
///
/// trait NotifyUser: Send + Sync {
///     fn channel(&self) -> &'static str;
/// }
///
/// struct TextMessage;
/// impl NotifyUser for TextMessage {
///     fn channel(&self) -> &'static str { "sms" }
/// }
/// impl Injectable for TextMessage {
///     fn parameters() -> Vec<Parameter> { Vec::new() }
///     fn construct(_: &mut Arguments) -> DiResult<Self> { Ok(TextMessage) }
/// }
///
/// let container = Container::new();
/// container.bind_trait::<dyn NotifyUser>(Producer::implementation::<dyn NotifyUser, TextMessage, _>(|t| t));
/// container.bind("greeting", Producer::factory(|_| Ok(String::from("hello"))));
///
/// let notifier = container.resolve_trait::<dyn NotifyUser>().unwrap();
/// assert_eq!(notifier.channel(), "sms");
/// assert_eq!(*container.make_as::<String>("greeting").unwrap(), "hello");
/// ```
#[derive(Clone)]
pub struct Producer(pub(crate) ProducerKind);

impl Producer {
    /// Constructs the injectable type `C` by auto-wiring.
    pub fn concrete<C: Injectable>() -> Self {
        Producer(ProducerKind::Concrete {
            target: Key::of::<C>(),
            info: Some(TypeInfo::of::<C>()),
            upcast: None,
        })
    }

    /// Constructs `C` and hands it out as the interface `I`.
    ///
    /// `upcast` is normally the identity closure `|c| c`; the unsized
    /// coercion from `Arc<C>` to `Arc<I>` happens at its return.
    pub fn implementation<I, C, F>(upcast: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Injectable,
        F: Fn(Arc<C>) -> Arc<I> + Send + Sync + 'static,
    {
        let erased: UpcastFn = Arc::new(move |value: AnyArc| {
            let concrete = value.downcast::<C>().map_err(|_| DiError::TypeMismatch {
                key: type_name::<I>().to_string(),
                expected: type_name::<C>(),
            })?;
            Ok(erase_trait::<I>(upcast(concrete)))
        });
        Producer(ProducerKind::Concrete {
            target: Key::of::<C>(),
            info: Some(TypeInfo::of::<C>()),
            upcast: Some(erased),
        })
    }

    /// Resolves another key in place of the bound one.
    ///
    /// The target may be a type key or a key that is itself bound; a chain
    /// that never reaches a constructible type is not instantiable.
    pub fn alias(target: impl Into<Key>) -> Self {
        Producer(ProducerKind::Concrete {
            target: target.into(),
            info: None,
            upcast: None,
        })
    }

    /// Invokes `factory` with the container on each build.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Container) -> DiResult<T> + Send + Sync + 'static,
    {
        Producer(ProducerKind::Factory(Arc::new(move |container: &Container| {
            factory(container).map(|value| Arc::new(value) as AnyArc)
        })))
    }

    /// Invokes `factory` to build an interface value.
    pub fn trait_factory<I, F>(factory: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> DiResult<Arc<I>> + Send + Sync + 'static,
    {
        Producer(ProducerKind::Factory(Arc::new(move |container: &Container| {
            factory(container).map(erase_trait::<I>)
        })))
    }

    /// Hands out `value` as-is. Instance bindings are always shared.
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Producer(ProducerKind::Instance(Arc::new(value)))
    }

    /// Hands out an existing `Arc`, preserving its identity.
    pub fn instance_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Producer(ProducerKind::Instance(value))
    }

    /// Hands out an existing interface value.
    pub fn instance_trait<I: ?Sized + Send + Sync + 'static>(value: Arc<I>) -> Self {
        Producer(ProducerKind::Instance(erase_trait(value)))
    }

    pub(crate) fn type_info(&self) -> Option<&TypeInfo> {
        match &self.0 {
            ProducerKind::Concrete { info, .. } => info.as_ref(),
            _ => None,
        }
    }
}

/// Binding with its producer and lifetime
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) producer: ProducerKind,
    pub(crate) lifetime: Lifetime,
}

impl Binding {
    pub(crate) fn new(producer: Producer, shared: bool) -> Self {
        let shared = shared || matches!(producer.0, ProducerKind::Instance(_));
        Self {
            producer: producer.0,
            lifetime: Lifetime::from_shared(shared),
        }
    }

    pub(crate) fn kind(&self) -> BindingKind {
        match &self.producer {
            ProducerKind::Concrete { target, .. } => BindingKind::Concrete {
                target: target.clone(),
            },
            ProducerKind::Factory(_) => BindingKind::Factory,
            ProducerKind::Instance(_) => BindingKind::Instance,
        }
    }
}

/// Binding registry holding at most one binding per key
#[derive(Default)]
pub(crate) struct Registry {
    bindings: RwLock<HashMap<Key, Binding, ahash::RandomState>>,
}

impl Registry {
    /// Inserts a binding, returning whether one was replaced.
    pub(crate) fn insert(&self, key: Key, binding: Binding) -> bool {
        self.bindings.write().insert(key, binding).is_some()
    }

    /// Clones the binding out so no lock is held while it runs.
    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<Binding> {
        self.bindings.read().get(key).cloned()
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.bindings.read().contains_key(key)
    }

    pub(crate) fn snapshot(&self) -> Vec<(Key, Binding)> {
        self.bindings
            .read()
            .iter()
            .map(|(key, binding)| (key.clone(), binding.clone()))
            .collect()
    }
}
