//! Registration validation.
//!
//! Walks the binding graph the way the resolution engine would, without
//! constructing anything, so configuration errors surface at bootstrap
//! instead of on the first `make` that reaches them. Factory and instance
//! bindings are opaque to the walk.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::descriptors::Parameter;
use crate::error::DiError;
use crate::key::Key;
use crate::registration::ProducerKind;

/// Outcome of [`Container::validate`].
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Problems that make `make` fail for some bound key.
    pub errors: Vec<DiError>,
    /// Configurations that resolve but probably do not do what was meant.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts the report into a `Result`, keeping warnings on success.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<DiError>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

/// A configuration that resolves but is likely a mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A shared binding's constructor takes a transient binding, so the
    /// shared value keeps the first transient value forever.
    SharedDependsOnTransient {
        shared: String,
        transient: String,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::SharedDependsOnTransient { shared, transient } => write!(
                f,
                "Shared [{shared}] captures transient [{transient}] for its whole lifetime"
            ),
        }
    }
}

impl Container {
    /// Checks every binding without building anything.
    ///
    /// Reports unresolvable parameters, non-instantiable targets and
    /// cycles. Each key is reported at most once. Constructor metadata
    /// reachable through parameters is recorded as a side effect, exactly
    /// as resolution would.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_ioc::{Container, Producer};
    ///
    /// let container = Container::new();
    /// container.bind("auth", Producer::alias("session"));
    ///
    /// let report = container.validate();
    /// assert!(!report.is_valid());
    /// assert!(report.errors[0].is_not_instantiable());
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let mut keys: Vec<Key> = self
            .registry
            .snapshot()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        keys.sort_by_cached_key(Key::to_string);

        let mut walker = Walker {
            container: self,
            stack: Vec::new(),
            done: HashSet::default(),
            report: ValidationReport::default(),
        };
        for key in &keys {
            walker.visit(key);
        }

        let report = walker.report;
        tracing::debug!(
            bindings = keys.len(),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validation finished"
        );
        report
    }
}

struct Walker<'a> {
    container: &'a Container,
    stack: Vec<Key>,
    done: HashSet<Key, ahash::RandomState>,
    report: ValidationReport,
}

impl Walker<'_> {
    fn visit(&mut self, key: &Key) {
        if self.done.contains(key) || self.container.cache.contains(key) {
            return;
        }
        if !self.enter(key) {
            return;
        }

        match self.container.registry.get(key) {
            Some(binding) => {
                if let ProducerKind::Concrete { target, .. } = &binding.producer {
                    self.visit_target(key, target, binding.lifetime.is_shared());
                }
            }
            None => match key {
                Key::Type(..) if self.container.options().auto_wiring => {
                    self.visit_constructor(key, false)
                }
                _ => self.report.errors.push(DiError::unresolvable(key, None)),
            },
        }

        self.leave();
    }

    fn visit_target(&mut self, key: &Key, target: &Key, shared: bool) {
        if target == key {
            self.visit_constructor(target, shared);
        } else if self.container.registry.contains_key(target) {
            self.visit(target);
        } else if !self.done.contains(target) && self.enter(target) {
            self.visit_constructor(target, shared);
            self.leave();
        }
    }

    fn visit_constructor(&mut self, target: &Key, shared: bool) {
        let info = match self.container.introspector.describe_constructor(target) {
            Ok(info) => info,
            Err(err) => {
                self.report.errors.push(err);
                return;
            }
        };

        let descriptor = Arc::clone(info.descriptor());
        for parameter in descriptor.parameters() {
            self.visit_parameter(descriptor.type_name(), parameter, shared);
        }
    }

    fn visit_parameter(&mut self, owner: &'static str, parameter: &Parameter, shared: bool) {
        if let Some(declared) = parameter.declared_key() {
            if let Some(introspect) = parameter.introspector() {
                self.container.introspector.ensure(declared, introspect);
            }
            if self.container.is_resolvable(declared) {
                if shared {
                    self.check_captured(owner, declared);
                }
                self.visit(declared);
                return;
            }
        }

        if !parameter.has_default() {
            let error = match parameter.declared_key() {
                Some(interface @ Key::Trait(..)) => DiError::unbound_interface(interface, owner),
                _ => DiError::unresolvable(owner, Some(parameter.name())),
            };
            self.report.errors.push(error);
        }
    }

    fn check_captured(&mut self, owner: &'static str, dependency: &Key) {
        let transient = self
            .container
            .registry
            .get(dependency)
            .map_or(false, |binding| !binding.lifetime.is_shared());
        if transient {
            self.report
                .warnings
                .push(ValidationWarning::SharedDependsOnTransient {
                    shared: owner.to_string(),
                    transient: dependency.to_string(),
                });
        }
    }

    /// Pushes `key`, or records the cycle it closes and returns `false`.
    fn enter(&mut self, key: &Key) -> bool {
        if let Some(start) = self.stack.iter().position(|k| k == key) {
            let mut path: Vec<String> = self.stack[start..].iter().map(Key::to_string).collect();
            path.push(key.to_string());
            self.report.errors.push(DiError::Circular(path));
            return false;
        }
        self.stack.push(key.clone());
        true
    }

    fn leave(&mut self) {
        if let Some(key) = self.stack.pop() {
            self.done.insert(key);
        }
    }
}
