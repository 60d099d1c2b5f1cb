//! Constructor and binding descriptors for introspection and diagnostics.

use std::any::Any;
use std::sync::Arc;

use crate::introspection::TypeInfo;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::AnyArc;
use crate::traits::Injectable;

/// One constructor parameter of an [`Injectable`] type.
///
/// A parameter carries its name, an optional declared type key and an
/// optional default value. The resolution engine sources each parameter
/// from, in order: a caller override, a recursive resolution of the
/// declared key, the default value. A parameter with none of these is
/// unresolvable.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Key, Parameter};
///
/// trait Notifier: Send + Sync {}
///
/// let port = Parameter::value("port").with_default(5432u16);
/// assert!(port.declared_key().is_none());
/// assert!(port.has_default());
///
/// let notifier = Parameter::interface::<dyn Notifier>("notifier");
/// assert_eq!(notifier.declared_key(), Some(&Key::of_trait::<dyn Notifier>()));
/// assert!(!notifier.has_default());
/// ```
#[derive(Clone)]
pub struct Parameter {
    name: &'static str,
    declared: Option<Key>,
    default: Option<AnyArc>,
    introspect: Option<fn() -> TypeInfo>,
}

impl Parameter {
    /// A parameter of an injectable concrete type.
    ///
    /// The type's constructor metadata travels with the parameter, so the
    /// dependency is auto-wired without registering it first.
    pub fn service<T: Injectable>(name: &'static str) -> Self {
        Self {
            name,
            declared: Some(Key::of::<T>()),
            default: None,
            introspect: Some(TypeInfo::of::<T> as fn() -> TypeInfo),
        }
    }

    /// A parameter of a concrete type that must be bound explicitly,
    /// typically through a factory.
    pub fn bound<T: 'static>(name: &'static str) -> Self {
        Self::key(name, Key::of::<T>())
    }

    /// An optional dependency on a concrete type: the bound value when one
    /// is available, otherwise `None`. Read it with
    /// [`Arguments::next_optional`](crate::Arguments::next_optional).
    pub fn optional<T: Send + Sync + 'static>(name: &'static str) -> Self {
        Self::bound::<T>(name).with_default(None::<Arc<T>>)
    }

    /// A parameter declared as an interface, resolved through its binding.
    pub fn interface<I: ?Sized + 'static>(name: &'static str) -> Self {
        Self::key(name, Key::of_trait::<I>())
    }

    /// A parameter declared with an arbitrary key, e.g. `Key::named("database")`.
    pub fn key(name: &'static str, key: impl Into<Key>) -> Self {
        Self {
            name,
            declared: Some(key.into()),
            default: None,
            introspect: None,
        }
    }

    /// A parameter with no declared type (a primitive).
    ///
    /// Only an override or a default can supply it.
    pub fn value(name: &'static str) -> Self {
        Self {
            name,
            declared: None,
            default: None,
            introspect: None,
        }
    }

    /// Attaches a default value.
    pub fn with_default<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.default = Some(Arc::new(value));
        self
    }

    /// The parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type key, if the parameter has one.
    pub fn declared_key(&self) -> Option<&Key> {
        self.declared.as_ref()
    }

    /// Whether a default value is attached.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The default value.
    pub fn default_value(&self) -> Option<&AnyArc> {
        self.default.as_ref()
    }

    pub(crate) fn introspector(&self) -> Option<fn() -> TypeInfo> {
        self.introspect
    }
}

impl std::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

/// Dependency descriptor of a constructible type
///
/// The ordered constructor parameter list reported by the type
/// introspector. The resolution engine reads it but never mutates it.
#[derive(Debug, Clone)]
pub struct ConstructorDescriptor {
    type_name: &'static str,
    parameters: Vec<Parameter>,
}

impl ConstructorDescriptor {
    pub(crate) fn new(type_name: &'static str, parameters: Vec<Parameter>) -> Self {
        Self {
            type_name,
            parameters,
        }
    }

    /// Name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }
}

/// What kind of producer a binding holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingKind {
    /// Constructs the target key (a type, or another bound key)
    Concrete {
        /// The key constructed in place of the bound one
        target: Key,
    },
    /// Invokes a factory callback
    Factory,
    /// Hands out a pre-built value
    Instance,
}

/// Binding descriptor for introspection and diagnostics
///
/// A snapshot of one registry entry, as returned by
/// [`Container::descriptors`](crate::Container::descriptors).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{BindingKind, Container, Key, Lifetime, Producer};
///
/// let container = Container::new();
/// container.instance("auth", 7u8);
/// container.bind("mailer", Producer::factory(|_| Ok(String::from("smtp"))));
///
/// let descriptors = container.descriptors();
/// let auth = descriptors.iter().find(|d| d.key == Key::named("auth")).unwrap();
/// assert_eq!(auth.kind, BindingKind::Instance);
/// assert_eq!(auth.lifetime, Lifetime::Singleton);
///
/// let mailer = descriptors.iter().find(|d| d.key == Key::named("mailer")).unwrap();
/// assert_eq!(mailer.kind, BindingKind::Factory);
/// assert!(!mailer.cached);
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    /// The bound key
    pub key: Key,
    /// Producer kind
    pub kind: BindingKind,
    /// Binding lifetime
    pub lifetime: Lifetime,
    /// Whether a built value currently sits in the instance cache
    pub cached: bool,
}

impl BindingDescriptor {
    /// Whether the binding is shared.
    pub fn is_shared(&self) -> bool {
        self.lifetime.is_shared()
    }
}
