//! # layered-di
//!
//! Named-entry dependency injection with ordered providers, override chains
//! and decorating extensions.
//!
//! ## Features
//!
//! - **Ordered providers**: every provider contributes `identifier -> factory`
//!   definitions; a later provider overrides the entries it shares with an
//!   earlier one
//! - **Extension chains**: an overriding factory can call through to the
//!   definition it replaced, lazily and at most once per resolution
//! - **Resolve once**: each entry is built at most once per container and
//!   shared as an `Arc`
//! - **Circular dependency detection**: cycles fail with the full path instead
//!   of recursing
//! - **Thread-safe**: concurrent requests for the same entry run its factories
//!   once; cycle tracking is per call tree
//!
//! ## Quick Start
//!
//! ```rust
//! use layered_di::{ContainerBuilder, Definitions, DiResult, ResolverContext};
//! use std::sync::{Arc, Mutex};
//!
//! struct Logger {
//!     handlers: Mutex<Vec<&'static str>>,
//! }
//!
//! // First provider: a plain logger
//! let mut core = Definitions::named("core");
//! core.factory("logger", |_| Ok(Logger { handlers: Mutex::new(Vec::new()) }));
//!
//! // Second provider: extends the logger defined above
//! let mut syslog = Definitions::named("syslog");
//! syslog.decorate::<Logger, _>(
//!     "logger",
//!     |logger: Arc<Logger>, _: &ResolverContext<'_>| -> DiResult<Arc<Logger>> {
//!         logger.handlers.lock().unwrap().push("syslog");
//!         Ok(logger)
//!     },
//! );
//!
//! let mut builder = ContainerBuilder::new();
//! builder.add_provider(core)?.add_provider(syslog)?;
//! let container = builder.build();
//!
//! let logger = container.get_as::<Logger>("logger")?;
//! assert_eq!(*logger.handlers.lock().unwrap(), vec!["syslog"]);
//! assert!(Arc::ptr_eq(&logger, &container.get_as::<Logger>("logger")?));
//! # Ok::<(), layered_di::DiError>(())
//! ```
//!
//! ## Resolution Rules
//!
//! - `get` runs the most recently registered definition of an entry. That
//!   factory decides whether to call [`Previous`] at all.
//! - Factories resolve their dependencies through the [`ResolverContext`] they
//!   receive, which shares cycle tracking with the outer `get`.
//! - A successful value is cached for the lifetime of the container; a
//!   failure is not, and is returned to the caller unchanged.

// Module declarations
pub mod collection;
pub mod container;
pub mod decoration;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod observer;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::{ContainerBuilder, ContainerBuilderExt, Definitions, Provider};
pub use container::{Container, Previous, ResolverContext};
pub use decoration::{decorators, Decorator};
pub use descriptors::{DefinitionInfo, EntryDescriptor};
pub use error::{DiError, DiResult, FactoryError};
pub use key::EntryId;
pub use observer::{DiObserver, TracingObserver};
pub use registration::{AnyArc, Factory, ProviderOrdinal};
pub use traits::{Resolver, ResolverCore};
