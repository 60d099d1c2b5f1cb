//! Abstract key types for the container.

use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key for binding storage and lookup.
///
/// An abstract key names a requested capability. It is either a plain
/// string name or a type identifier. Keys are compared by exact identity:
/// type keys by `TypeId`, named keys by string equality. There is no
/// aliasing beyond explicit bindings.
///
/// # Key Types
///
/// - **Named**: string keys such as `"database"`
/// - **Type**: concrete (sized) types, eligible for auto-wiring
/// - **Trait**: interfaces (`dyn Trait`), never auto-wired
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Key;
///
/// trait Notifier: Send + Sync {}
/// struct Mailer;
///
/// let by_name = Key::named("mailer");
/// let by_type = Key::of::<Mailer>();
/// let by_trait = Key::of_trait::<dyn Notifier>();
///
/// assert_eq!(by_name, Key::from("mailer"));
/// assert!(by_type.display_name().ends_with("Mailer"));
/// assert!(by_trait.is_interface());
/// assert!(!by_type.is_interface());
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// String key, compared by value
    Named(Cow<'static, str>),
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Interface key with the TypeId of `dyn Trait` and its name
    Trait(TypeId, &'static str),
}

impl Key {
    /// Creates a string key.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Key::Named(name.into())
    }

    /// Creates a key for the concrete type `T`.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Key::Type(TypeId::of::<T>(), type_name::<T>())
    }

    /// Creates a key for the interface `I`, usually a `dyn Trait`.
    #[inline]
    pub fn of_trait<I: ?Sized + 'static>() -> Self {
        Key::Trait(TypeId::of::<I>(), type_name::<I>())
    }

    /// Get the name for display
    ///
    /// The string itself for named keys, `std::any::type_name` otherwise.
    pub fn display_name(&self) -> &str {
        match self {
            Key::Named(name) => name,
            Key::Type(_, name) | Key::Trait(_, name) => name,
        }
    }

    /// Whether this key denotes an interface.
    pub fn is_interface(&self) -> bool {
        matches!(self, Key::Trait(..))
    }

    /// Whether this key is a plain string name.
    pub fn is_named(&self) -> bool {
        matches!(self, Key::Named(_))
    }

    /// The TypeId behind a type or interface key.
    pub fn type_id(&self) -> Option<TypeId> {
        match self {
            Key::Named(_) => None,
            Key::Type(id, _) | Key::Trait(id, _) => Some(*id),
        }
    }
}

// Type names are diagnostics only; identity is the TypeId
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Named(a), Key::Named(b)) => a == b,
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a, _), Key::Trait(b, _)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Key::Named(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            Key::Type(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
            Key::Trait(id, _) => {
                2u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key::Named(Cow::Borrowed(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Named(Cow::Owned(name))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Shorthand for [`Key::of`].
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::of::<T>()
}
