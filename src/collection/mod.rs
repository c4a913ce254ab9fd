//! Container builder for provider registration.
//!
//! This module contains the ContainerBuilder type and related functionality
//! for registering providers and building containers.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::EntryId;
use crate::observer::{DiObserver, Observers};
use crate::registration::{Factory, Registry};
use crate::Container;

pub mod provider_system;
pub use provider_system::*;

/// Collects providers in order and freezes them into a [`Container`].
///
/// Registration and resolution are separate phases: definitions can only be
/// added here, and entries can only be resolved once [`build`](Self::build)
/// has consumed the builder.
///
/// # Examples
///
/// ```rust
/// use layered_di::{ContainerBuilder, Definitions};
/// use std::sync::{Arc, Mutex};
///
/// struct Logger { handlers: Mutex<Vec<String>> }
///
/// let mut core = Definitions::named("core");
/// core.value("logger", Logger { handlers: Mutex::new(vec!["stderr".to_string()]) });
///
/// let mut syslog = Definitions::named("syslog");
/// syslog.raw("logger", |_ctx, previous| {
///     let logger = previous.get()?;
///     if let Some(l) = logger.downcast_ref::<Logger>() {
///         l.handlers.lock().unwrap().push("syslog".to_string());
///     }
///     Ok(logger)
/// });
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(core)?.add_provider(syslog)?;
/// let container = builder.build();
///
/// let logger = container.get_as::<Logger>("logger")?;
/// assert_eq!(*logger.handlers.lock().unwrap(), vec!["stderr", "syslog"]);
/// # Ok::<(), layered_di::DiError>(())
/// ```
pub struct ContainerBuilder {
    registry: Registry,
    observers: Observers,
}

impl ContainerBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observers: Observers::new(),
        }
    }

    /// Registers every definition of `provider` after all earlier providers.
    ///
    /// The provider's definitions share one ordinal, so they are all ordered
    /// after every previously added provider and before every later one. If
    /// the provider fails to enumerate its definitions, or names the same
    /// entry twice, nothing from it is registered and the error is returned.
    pub fn add_provider<P: Provider>(&mut self, provider: P) -> DiResult<&mut Self> {
        let name = provider.name().into_owned();
        let definitions = provider.definitions()?;

        if let Some(entry) = definitions.first_duplicate() {
            return Err(DiError::DuplicateContribution {
                provider: name,
                entry: entry.clone(),
            });
        }

        let count = definitions.len();
        let ordinal = self.registry.next_ordinal(name.as_str());
        for (id, factory) in definitions.into_entries() {
            self.registry.register(id, ordinal, factory);
        }

        tracing::debug!(provider = %name, ordinal, definitions = count, "provider registered");
        Ok(self)
    }

    /// Registers a provider chosen at runtime, e.g. from a plugin list.
    pub fn add_boxed_provider(&mut self, provider: Box<dyn Provider>) -> DiResult<&mut Self> {
        self.add_provider(provider)
    }

    /// Adds providers in iteration order, stopping at the first failure.
    ///
    /// Providers before the failing one stay registered.
    pub fn add_providers<I>(&mut self, providers: I) -> DiResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: Provider,
    {
        for provider in providers {
            self.add_provider(provider)?;
        }
        Ok(self)
    }

    /// Registers a single definition as its own anonymous provider.
    pub fn register(&mut self, id: impl Into<EntryId>, factory: Factory) -> &mut Self {
        let id = id.into();
        let ordinal = self.registry.next_ordinal(format!("<register {}>", id));
        self.registry.register(id, ordinal, factory);
        self
    }

    /// Adds an observer notified of resolution events.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// True if `id` has at least one definition so far.
    pub fn has(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    /// Number of definitions registered for `id` so far.
    pub fn definition_count(&self, id: &str) -> usize {
        self.registry.chain_for(id).map_or(0, |chain| chain.len())
    }

    /// Number of providers added so far.
    pub fn provider_count(&self) -> usize {
        self.registry.provider_count()
    }

    /// Freezes all definition chains into a container.
    pub fn build(self) -> Container {
        tracing::debug!(
            entries = self.registry.len(),
            providers = self.registry.provider_count(),
            "container built"
        );
        Container::new(self.registry, self.observers)
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
