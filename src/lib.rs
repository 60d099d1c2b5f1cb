//! # ferrous-ioc
//!
//! An inversion-of-control container with constructor auto-wiring.
//!
//! ## Features
//!
//! - **String, type and interface keys**: bind by name, by concrete type or by `dyn Trait`
//! - **Three producers**: concrete targets, factory callbacks and pre-built instances
//! - **Shared or transient**: shared bindings build once and are cached per container
//! - **Auto-wiring**: unbound types are constructed from their declared parameters
//! - **Circular dependency detection**: cycles fail with the full key path
//! - **Thread-safe**: every operation takes `&self`; the container is `Send + Sync`
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{Arguments, Container, DiResult, Injectable, Parameter, Producer};
//! use std::sync::Arc;
//!
//! struct Database {
//!     dsn: String,
//! }
//!
//! struct UserRepository {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserRepository {
//!     fn parameters() -> Vec<Parameter> {
//!         vec![Parameter::bound::<Database>("db")]
//!     }
//!
//!     fn construct(args: &mut Arguments) -> DiResult<Self> {
//!         Ok(UserRepository { db: args.next()? })
//!     }
//! }
//!
//! let container = Container::new();
//! container.singleton(
//!     ferrous_ioc::Key::of::<Database>(),
//!     Producer::factory(|_| Ok(Database { dsn: "postgres://localhost".to_string() })),
//! );
//!
//! let repo = container.make_type::<UserRepository>().unwrap();
//! assert_eq!(repo.db.dsn, "postgres://localhost");
//!
//! // Shared bindings hand out the same instance every time.
//! let again = container.make_type::<UserRepository>().unwrap();
//! assert!(Arc::ptr_eq(&repo.db, &again.db));
//! ```
//!
//! ## Interfaces
//!
//! ```rust
//! use ferrous_ioc::{Container, Producer};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str) -> String;
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) -> String {
//!         format!("[LOG] {message}")
//!     }
//! }
//!
//! let container = Container::new();
//! container.instance_trait::<dyn Logger>(Arc::new(ConsoleLogger));
//!
//! let logger = container.resolve_trait::<dyn Logger>().unwrap();
//! assert_eq!(logger.log("hello"), "[LOG] hello");
//! ```
//!
//! ## Lifetimes
//!
//! - **Shared**: built on first resolution, then served from the instance cache
//! - **Transient**: built fresh on every resolution, never cached
//!
//! Instance bindings are always shared. Auto-wired types are transient.

mod cache;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
mod internal;
pub mod introspection;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod registration;
pub mod traits;
pub mod validation;

pub use config::{ContainerOptions, DEFAULT_MAX_DEPTH};
pub use container::{Container, Overrides};
pub use descriptors::{BindingDescriptor, BindingKind, ConstructorDescriptor, Parameter};
pub use error::{DiError, DiResult};
pub use introspection::TypeInfo;
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, TracingObserver};
pub use registration::{AnyArc, Producer};
pub use traits::{Arguments, Injectable};
pub use validation::{ValidationReport, ValidationWarning};
