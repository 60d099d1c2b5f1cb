//! The introspection seam: types that describe their own constructor.

use std::any::type_name;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::descriptors::Parameter;
use crate::error::{DiError, DiResult};
use crate::registration::{downcast_trait, AnyArc};

/// A type the container can construct by auto-wiring.
///
/// Rust has no runtime reflection, so a constructible type reports its
/// constructor itself: [`parameters`](Injectable::parameters) is the
/// ordered parameter list, and [`construct`](Injectable::construct)
/// receives the resolved values in that same order.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Parameter};
/// use std::sync::Arc;
///
/// struct Template;
///
/// impl Injectable for Template {
///     fn parameters() -> Vec<Parameter> {
///         Vec::new()
///     }
///
///     fn construct(_args: &mut Arguments) -> DiResult<Self> {
///         Ok(Template)
///     }
/// }
///
/// struct Controller {
///     template: Arc<Template>,
///     page_size: usize,
/// }
///
/// impl Injectable for Controller {
///     fn parameters() -> Vec<Parameter> {
///         vec![
///             Parameter::service::<Template>("template"),
///             Parameter::value("page_size").with_default(20usize),
///         ]
///     }
///
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Controller {
///             template: args.next()?,
///             page_size: args.next_value()?,
///         })
///     }
/// }
///
/// let container = Container::new();
/// let controller = container.make_type::<Controller>().unwrap();
/// assert_eq!(controller.page_size, 20);
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Ordered constructor parameters.
    fn parameters() -> Vec<Parameter>;

    /// Builds the value from the resolved parameters.
    fn construct(args: &mut Arguments) -> DiResult<Self>;
}

/// Resolved constructor arguments, consumed in declaration order.
pub struct Arguments {
    owner: &'static str,
    values: SmallVec<[(&'static str, AnyArc); 4]>,
    cursor: usize,
}

impl Arguments {
    pub(crate) fn new(owner: &'static str, values: SmallVec<[(&'static str, AnyArc); 4]>) -> Self {
        Self {
            owner,
            values,
            cursor: 0,
        }
    }

    /// Takes the next argument as a concrete type.
    pub fn next<T: Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        let (name, value) = self.advance()?;
        value.downcast::<T>().map_err(|_| self.mismatch(name, type_name::<T>()))
    }

    /// Takes the next argument as an interface.
    pub fn next_trait<I: ?Sized + Send + Sync + 'static>(&mut self) -> DiResult<Arc<I>> {
        let (name, value) = self.advance()?;
        downcast_trait::<I>(value).ok_or_else(|| self.mismatch(name, type_name::<I>()))
    }

    /// Takes the next argument of a [`Parameter::optional`] dependency.
    pub fn next_optional<T: Send + Sync + 'static>(&mut self) -> DiResult<Option<Arc<T>>> {
        let (name, value) = self.advance()?;
        match value.downcast::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(value) => value
                .downcast::<Option<Arc<T>>>()
                .map(|absent| (*absent).clone())
                .map_err(|_| self.mismatch(name, type_name::<T>())),
        }
    }

    /// Takes the next argument by value, cloning it out of its `Arc`.
    pub fn next_value<T: Clone + Send + Sync + 'static>(&mut self) -> DiResult<T> {
        self.next::<T>().map(|value| (*value).clone())
    }

    /// Number of arguments not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }

    fn advance(&mut self) -> DiResult<(&'static str, AnyArc)> {
        let (name, value) = self.values.get(self.cursor).cloned().ok_or_else(|| {
            DiError::not_instantiable(
                self.owner,
                format!("constructor read more than {} declared arguments", self.values.len()),
            )
        })?;
        self.cursor += 1;
        Ok((name, value))
    }

    fn mismatch(&self, parameter: &'static str, expected: &'static str) -> DiError {
        DiError::TypeMismatch {
            key: format!("{}::{}", self.owner, parameter),
            expected,
        }
    }
}
