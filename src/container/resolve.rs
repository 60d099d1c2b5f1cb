//! The resolution engine.
//!
//! Precedence for a requested key: caller override, instance cache hit,
//! registered binding (instance, factory, concrete), bare auto-wiring of a
//! concrete type. Interface and string keys are never auto-wired.

use std::any::type_name;
use std::sync::Arc;
use std::time::Instant;

use smallvec::SmallVec;

use super::{Container, Overrides};
use crate::descriptors::Parameter;
use crate::error::{DiError, DiResult};
use crate::internal::StackGuard;
use crate::introspection::TypeInfo;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{downcast_trait, AnyArc, Binding, ProducerKind};
use crate::traits::{Arguments, Injectable};

impl Container {
    /// Resolves `key` to a built value.
    ///
    /// # Errors
    ///
    /// - [`DiError::NotInstantiable`] when the target has no constructor metadata
    /// - [`DiError::Unresolvable`] when a key or parameter has no source
    /// - [`DiError::Circular`] when construction revisits a key in progress
    pub fn make(&self, key: impl Into<Key>) -> DiResult<AnyArc> {
        self.make_with(key, &Overrides::default())
    }

    /// Resolves `key`, consulting caller overrides first.
    pub fn make_with(&self, key: impl Into<Key>, overrides: &Overrides) -> DiResult<AnyArc> {
        let key = key.into();
        if let Some(value) = overrides.for_key(&key) {
            tracing::trace!(key = %key, "override supplied");
            return Ok(Arc::clone(value));
        }
        let overrides = (!overrides.is_empty()).then_some(overrides);
        self.resolve_observed(&key, overrides).map_err(|err| {
            tracing::debug!(key = %key, error = %err, "make failed");
            err
        })
    }

    /// Resolves `key` and downcasts the value to `T`.
    pub fn make_as<T: Send + Sync + 'static>(&self, key: impl Into<Key>) -> DiResult<Arc<T>> {
        self.make_as_with(key, &Overrides::default())
    }

    /// [`make_as`](Self::make_as) with caller overrides.
    pub fn make_as_with<T: Send + Sync + 'static>(
        &self,
        key: impl Into<Key>,
        overrides: &Overrides,
    ) -> DiResult<Arc<T>> {
        let key = key.into();
        self.make_with(&key, overrides)?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Resolves the injectable type `T` by its type key.
    ///
    /// Records the constructor metadata of `T` first, so an unbound `T` is
    /// auto-wired.
    pub fn make_type<T: Injectable>(&self) -> DiResult<Arc<T>> {
        self.make_type_with(&Overrides::default())
    }

    /// [`make_type`](Self::make_type) with caller overrides.
    pub fn make_type_with<T: Injectable>(&self, overrides: &Overrides) -> DiResult<Arc<T>> {
        let key = Key::of::<T>();
        self.introspector.ensure(&key, TypeInfo::of::<T>);
        self.make_as_with::<T>(key, overrides)
    }

    /// Resolves `key` and downcasts the value to the interface `I`.
    pub fn make_trait<I: ?Sized + Send + Sync + 'static>(&self, key: impl Into<Key>) -> DiResult<Arc<I>> {
        let key = key.into();
        let value = self.make(&key)?;
        downcast_trait::<I>(value).ok_or_else(|| DiError::TypeMismatch {
            key: key.to_string(),
            expected: type_name::<I>(),
        })
    }

    /// Resolves the interface `I` by its interface key.
    pub fn resolve_trait<I: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<I>> {
        self.make_trait::<I>(Key::of_trait::<I>())
    }

    // --- Engine ---

    fn resolve_observed(&self, key: &Key, overrides: Option<&Overrides>) -> DiResult<AnyArc> {
        if !self.observers.has_observers() {
            return self.resolve(key, overrides);
        }

        let start = Instant::now();
        self.observers.resolving(key);
        let result = self.resolve(key, overrides);
        match &result {
            Ok(_) => self.observers.resolved(key, start.elapsed()),
            Err(err) => self.observers.failed(key, err),
        }
        result
    }

    fn resolve(&self, key: &Key, overrides: Option<&Overrides>) -> DiResult<AnyArc> {
        // A cached value was built without these overrides.
        if overrides.is_none() {
            if let Some(hit) = self.cache.get(key) {
                tracing::trace!(key = %key, "instance cache hit");
                return Ok(hit);
            }
        }

        let _frame = StackGuard::enter(self.id, key, self.options.max_depth)?;
        match self.registry.get(key) {
            Some(binding) => self.resolve_binding(key, binding, overrides),
            None => self.auto_wire(key, overrides),
        }
    }

    fn resolve_binding(
        &self,
        key: &Key,
        binding: Binding,
        overrides: Option<&Overrides>,
    ) -> DiResult<AnyArc> {
        // A value built with caller overrides is specific to this call.
        let lifetime = match overrides {
            Some(_) => Lifetime::Transient,
            None => binding.lifetime,
        };

        match binding.producer {
            ProducerKind::Instance(value) => {
                // Idempotent: every caller stores the same value.
                self.cache.put(key.clone(), Arc::clone(&value));
                Ok(value)
            }
            ProducerKind::Factory(factory) => self.share(key, lifetime, || {
                tracing::trace!(key = %key, "invoking factory");
                factory(self)
            }),
            ProducerKind::Concrete { target, upcast, .. } => self.share(key, lifetime, || {
                let built = self.build_target(key, &target, overrides)?;
                match &upcast {
                    Some(upcast) => upcast(built),
                    None => Ok(built),
                }
            }),
        }
    }

    /// Runs `build`, caching the result under `key` when shared.
    fn share<F>(&self, key: &Key, lifetime: Lifetime, build: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        if !lifetime.is_shared() {
            return build();
        }

        if self.options.single_flight {
            let slot = self.cache.slot(key);
            if let Some(value) = slot.get() {
                return Ok(Arc::clone(value));
            }
            // Refuse to block on a build that is itself waiting on this thread.
            let _waiting = self.in_flight.wait_for(key)?;
            return slot
                .get_or_try_init(|| {
                    let _owner = self.in_flight.own(key);
                    build()
                })
                .map(Arc::clone);
        }

        let value = build()?;
        Ok(self.cache.publish(key, value))
    }

    fn build_target(&self, key: &Key, target: &Key, overrides: Option<&Overrides>) -> DiResult<AnyArc> {
        if target == key {
            return self.construct(target, overrides);
        }
        // Follow a binding chain; the caller caches under the requested key.
        if self.registry.contains_key(target) {
            return self.resolve_observed(target, overrides);
        }
        let _frame = StackGuard::enter(self.id, target, self.options.max_depth)?;
        self.construct(target, overrides)
    }

    fn auto_wire(&self, key: &Key, overrides: Option<&Overrides>) -> DiResult<AnyArc> {
        match key {
            Key::Type(..) if self.options.auto_wiring => {
                tracing::trace!(key = %key, "auto-wiring unbound type");
                self.construct(key, overrides)
            }
            _ => Err(DiError::unresolvable(key, None)),
        }
    }

    fn construct(&self, target: &Key, overrides: Option<&Overrides>) -> DiResult<AnyArc> {
        let info = self.introspector.describe_constructor(target)?;
        let descriptor = info.descriptor();

        let mut values: SmallVec<[(&'static str, AnyArc); 4]> =
            SmallVec::with_capacity(descriptor.parameters().len());
        for parameter in descriptor.parameters() {
            let value = self.resolve_parameter(descriptor.type_name(), parameter, overrides)?;
            values.push((parameter.name(), value));
        }

        tracing::trace!(key = %target, arguments = values.len(), "constructing");
        let mut args = Arguments::new(descriptor.type_name(), values);
        info.construct(&mut args)
    }

    fn resolve_parameter(
        &self,
        owner: &'static str,
        parameter: &Parameter,
        overrides: Option<&Overrides>,
    ) -> DiResult<AnyArc> {
        if let Some(overrides) = overrides {
            let supplied = overrides
                .for_parameter(parameter.name())
                .or_else(|| parameter.declared_key().and_then(|key| overrides.for_key(key)));
            if let Some(value) = supplied {
                return Ok(Arc::clone(value));
            }
        }

        if let Some(declared) = parameter.declared_key() {
            if let Some(introspect) = parameter.introspector() {
                self.introspector.ensure(declared, introspect);
            }
            if self.is_resolvable(declared) {
                return self.resolve_observed(declared, None);
            }
        }

        match (parameter.default_value(), parameter.declared_key()) {
            (Some(default), _) => Ok(Arc::clone(default)),
            (None, Some(interface @ Key::Trait(..))) => {
                Err(DiError::unbound_interface(interface, owner))
            }
            (None, _) => Err(DiError::unresolvable(owner, Some(parameter.name()))),
        }
    }

    pub(crate) fn is_resolvable(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
            || self.cache.contains(key)
            || (self.options.auto_wiring
                && matches!(key, Key::Type(..))
                && self.introspector.is_constructible(key))
    }
}
