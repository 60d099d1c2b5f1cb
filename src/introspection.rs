//! Type introspector: constructor metadata for constructible types.
//!
//! Descriptors are produced by explicit registration through the
//! [`Injectable`] trait rather than by runtime inspection. The introspector
//! only answers queries; it never constructs anything.

use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::descriptors::ConstructorDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;
use crate::traits::{Arguments, Injectable};

pub(crate) type Constructor = fn(&mut Arguments) -> DiResult<AnyArc>;

/// Constructor metadata of one injectable type.
#[derive(Clone)]
pub struct TypeInfo {
    key: Key,
    descriptor: Arc<ConstructorDescriptor>,
    construct: Constructor,
}

impl TypeInfo {
    /// Captures the constructor of `T`.
    pub fn of<T: Injectable>() -> Self {
        Self {
            key: Key::of::<T>(),
            descriptor: Arc::new(ConstructorDescriptor::new(type_name::<T>(), T::parameters())),
            construct: construct_erased::<T>,
        }
    }

    /// The type key this metadata describes.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The dependency descriptor.
    pub fn descriptor(&self) -> &Arc<ConstructorDescriptor> {
        &self.descriptor
    }

    pub(crate) fn construct(&self, args: &mut Arguments) -> DiResult<AnyArc> {
        (self.construct)(args)
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("key", &self.key)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

fn construct_erased<T: Injectable>(args: &mut Arguments) -> DiResult<AnyArc> {
    Ok(Arc::new(T::construct(args)?))
}

#[derive(Default)]
pub(crate) struct TypeIntrospector {
    types: RwLock<HashMap<Key, TypeInfo, ahash::RandomState>>,
}

impl TypeIntrospector {
    pub(crate) fn register(&self, info: TypeInfo) {
        self.types.write().entry(info.key.clone()).or_insert(info);
    }

    /// Records metadata for `key` unless it is already known.
    pub(crate) fn ensure(&self, key: &Key, introspect: fn() -> TypeInfo) {
        if !self.types.read().contains_key(key) {
            self.register(introspect());
        }
    }

    pub(crate) fn is_constructible(&self, key: &Key) -> bool {
        self.types.read().contains_key(key)
    }

    pub(crate) fn describe_constructor(&self, key: &Key) -> DiResult<TypeInfo> {
        match key {
            Key::Trait(..) => Err(DiError::not_instantiable(
                key,
                "interfaces cannot be constructed without a concrete binding",
            )),
            Key::Named(_) => Err(DiError::not_instantiable(
                key,
                "a string key does not name a constructible type",
            )),
            Key::Type(..) => self.types.read().get(key).cloned().ok_or_else(|| {
                DiError::not_instantiable(key, "no constructor metadata is registered for it")
            }),
        }
    }
}
