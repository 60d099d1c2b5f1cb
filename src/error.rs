//! Error types for the inversion-of-control container.

use thiserror::Error;

use crate::key::Key;

/// Container errors
///
/// Every failure surfaced by [`Container::make`](crate::Container::make) and
/// its typed variants. Resolution fails fast: none of these are retried and
/// no partially built object graph is ever returned.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Container, DiError, Key};
///
/// let container = Container::new();
/// match container.make("mailer") {
///     Err(DiError::Unresolvable { target, parameter }) => {
///         assert_eq!(target, "mailer");
///         assert_eq!(parameter, None);
///     }
///     _ => unreachable!(),
/// }
///
/// let circular = DiError::Circular(vec!["A".into(), "B".into(), "A".into()]);
/// assert_eq!(circular.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// The requested (or bound-to) target has no usable constructor metadata
    #[error("Target [{target}] is not instantiable: {reason}")]
    NotInstantiable {
        /// Display name of the key that could not be constructed
        target: String,
        /// Why construction was impossible
        reason: String,
    },
    /// A key or a constructor parameter has no source for its value
    #[error("{}", unresolvable_message(.target, .parameter.as_deref()))]
    Unresolvable {
        /// The key being resolved, or the type owning the parameter
        target: String,
        /// The offending constructor parameter, if any
        parameter: Option<String>,
    },
    /// Circular dependency detected (includes the cycle path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A resolved value did not have the requested type
    #[error("Type mismatch for {key}: expected {expected}")]
    TypeMismatch {
        /// Key whose value failed to downcast
        key: String,
        /// The type the caller asked for
        expected: &'static str,
    },
    /// A factory or constructor failed with its own error
    #[error("Service construction failed: {0}")]
    Construction(#[source] Box<dyn std::error::Error + Send + Sync>),
}

fn unresolvable_message(target: &str, parameter: Option<&str>) -> String {
    match parameter {
        Some(parameter) => format!(
            "Unresolvable dependency resolving [{}] in {}",
            parameter, target
        ),
        None => format!("Target [{}] is unresolvable: nothing is bound to it", target),
    }
}

impl DiError {
    /// Wraps an arbitrary error raised while building a service.
    ///
    /// ```rust
    /// use ferrous_ioc::DiError;
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::Other, "connection refused");
    /// let err = DiError::construction(io);
    /// assert!(err.to_string().contains("connection refused"));
    /// ```
    pub fn construction<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        DiError::Construction(error.into())
    }

    /// Returns true for [`DiError::NotInstantiable`].
    pub fn is_not_instantiable(&self) -> bool {
        matches!(self, DiError::NotInstantiable { .. })
    }

    /// Returns true for [`DiError::Unresolvable`].
    pub fn is_unresolvable(&self) -> bool {
        matches!(self, DiError::Unresolvable { .. })
    }

    /// Returns true for [`DiError::Circular`].
    pub fn is_circular(&self) -> bool {
        matches!(self, DiError::Circular(_))
    }

    pub(crate) fn not_instantiable(target: impl ToString, reason: impl Into<String>) -> Self {
        DiError::NotInstantiable {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// An interface parameter with no binding, reached while building `owner`.
    pub(crate) fn unbound_interface(interface: &Key, owner: &str) -> Self {
        Self::not_instantiable(interface, format!("nothing is bound to it while building [{owner}]"))
    }

    pub(crate) fn unresolvable(target: impl ToString, parameter: Option<&str>) -> Self {
        DiError::Unresolvable {
            target: target.to_string(),
            parameter: parameter.map(str::to_owned),
        }
    }
}

/// Result type for container operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate,
/// including as the return type of factories and constructors.
///
/// ```rust
/// use ferrous_ioc::{DiResult, DiError};
///
/// fn open() -> DiResult<String> {
///     Ok("connected".to_string())
/// }
///
/// fn failing() -> DiResult<()> {
///     Err(DiError::DepthExceeded(8))
/// }
/// ```
pub type DiResult<T> = Result<T, DiError>;
