//! Container facade for resolving entries.
//!
//! This module contains the Container type and related functionality
//! for resolving registered entries from frozen definition chains.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;

use crate::descriptors::{DefinitionInfo, EntryDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::{engine, with_ambient_stack, ResolutionStack};
use crate::key::EntryId;
use crate::observer::Observers;
use crate::registration::{AnyArc, Map, Registry};
use crate::traits::ResolverCore;

pub mod context;
pub mod previous;
pub use context::ResolverContext;
pub use previous::Previous;

/// The resolution surface built from a [`ContainerBuilder`](crate::ContainerBuilder).
///
/// Definition chains are frozen once the container exists. Each entry is
/// resolved at most once per container: the first successful `get` caches the
/// value and every later `get` returns the same `Arc` without running any
/// factory. A failed resolution caches nothing, so a later `get` starts from
/// scratch.
///
/// # Thread Safety
///
/// `Container` is `Send + Sync` and cheap to clone (it shares an `Arc`
/// internally). When several threads ask for the same unresolved entry, one
/// of them runs the factories and the others wait for its result. Cycle
/// tracking is per call tree, so unrelated concurrent resolutions never see
/// each other as cycles.
///
/// A call tree never leaves the thread it started on, so a cycle split across
/// threads is not detected: if one thread builds `a` (which needs `b`) while
/// another builds `b` (which needs `a`), each waits on the other's entry and
/// neither returns. The same cycle reached from a single thread always fails
/// with [`DiError::CycleDetected`].
///
/// # Examples
///
/// ```
/// use layered_di::{ContainerBuilder, Definitions};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
///
/// let mut defs = Definitions::new();
/// defs.value("config", Config { port: 8080 });
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(defs)?;
/// let container = builder.build();
///
/// assert!(container.has("config"));
/// let a = container.get_as::<Config>("config")?;
/// let b = container.get_as::<Config>("config")?;
/// assert_eq!(a.port, 8080);
/// assert!(Arc::ptr_eq(&a, &b));
/// # Ok::<(), layered_di::DiError>(())
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: Registry,
    cache: Map<EntryId, OnceCell<AnyArc>>,
    observers: Observers,
}

impl Container {
    pub(crate) fn new(registry: Registry, observers: Observers) -> Self {
        let cache = registry
            .iter()
            .map(|(id, _)| (id.clone(), OnceCell::new()))
            .collect();
        Self {
            inner: Arc::new(ContainerInner {
                registry,
                cache,
                observers,
            }),
        }
    }

    /// True if `id` is registered. Never resolves anything and never fails.
    pub fn has(&self, id: &str) -> bool {
        self.inner.has(id)
    }

    /// Resolves `id`.
    ///
    /// Called from inside a factory running on this container (through a
    /// captured handle rather than the [`ResolverContext`]), it joins the
    /// running call tree; otherwise it starts a fresh one.
    ///
    /// Fails with [`DiError::NotFound`] for unknown entries,
    /// [`DiError::CycleDetected`] when resolution loops back onto itself, or
    /// whatever error a factory returned.
    pub fn get(&self, id: &str) -> DiResult<AnyArc> {
        let owner = Arc::as_ptr(&self.inner) as usize;
        with_ambient_stack(owner, |stack| self.inner.resolve(id, stack))
    }

    /// Resolves `id` and downcasts it to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Arc<T>> {
        let value = self.get(id)?;
        downcast(id, value)
    }

    /// Resolves `id`, returning `None` if it was never registered.
    ///
    /// `NotFound` raised for some other entry deeper in the call tree is still
    /// an error.
    pub fn try_get(&self, id: &str) -> DiResult<Option<AnyArc>> {
        if !self.has(id) {
            return Ok(None);
        }
        self.get(id).map(Some)
    }

    /// True if `id` has already been resolved and cached.
    pub fn is_resolved(&self, id: &str) -> bool {
        self.inner
            .cache
            .get(id)
            .map_or(false, |slot| slot.get().is_some())
    }

    /// Every registered identifier, sorted.
    pub fn ids(&self) -> BTreeSet<EntryId> {
        self.inner.registry.known_identifiers()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    /// True if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.len() == 0
    }

    /// Describes every entry and the providers contributing to it, sorted by id.
    pub fn descriptors(&self) -> Vec<EntryDescriptor> {
        let registry = &self.inner.registry;
        let mut descriptors: Vec<EntryDescriptor> = registry
            .iter()
            .map(|(id, chain)| EntryDescriptor {
                id: id.clone(),
                definitions: chain
                    .ordinals()
                    .map(|ordinal| DefinitionInfo {
                        ordinal,
                        provider: registry.provider_name(ordinal).to_string(),
                    })
                    .collect(),
            })
            .collect();
        descriptors.sort_by(|a, b| a.id.cmp(&b.id));
        descriptors
    }
}

impl ContainerInner {
    #[inline]
    pub(crate) fn has(&self, id: &str) -> bool {
        self.registry.contains(id)
    }

    /// Resolves `id` inside the call tree tracked by `stack`.
    pub(crate) fn resolve(&self, id: &str, stack: &ResolutionStack) -> DiResult<AnyArc> {
        let slot = match self.cache.get(id) {
            Some(slot) => slot,
            None => return Err(DiError::NotFound(EntryId::new(id))),
        };

        // Fast path: already resolved
        if let Some(value) = slot.get() {
            tracing::trace!(entry = id, "cache hit");
            return Ok(value.clone());
        }

        let (entry, chain) = self
            .registry
            .chain_entry(id)
            .ok_or_else(|| DiError::NotFound(EntryId::new(id)))?;

        // Cycle check happens before touching the slot so a re-entrant request
        // for an entry still being built fails instead of blocking on itself.
        let _frame = stack.enter(entry)?;

        slot.get_or_try_init(|| {
            tracing::debug!(
                entry = %entry,
                definitions = chain.len(),
                depth = stack.depth(),
                "resolving entry"
            );
            let ctx = ResolverContext::new(self, stack);

            if !self.observers.has_observers() {
                return engine::resolve_top(entry, chain, ctx);
            }

            self.observers.resolving(entry);
            let started = Instant::now();
            let result = engine::resolve_top(entry, chain, ctx);
            match &result {
                Ok(_) => self.observers.resolved(entry, started.elapsed()),
                Err(err) => self.observers.resolution_failed(entry, err),
            }
            result
        })
        .map(Arc::clone)
    }
}

impl ResolverCore for Container {
    fn has(&self, id: &str) -> bool {
        Container::has(self, id)
    }

    fn resolve_any(&self, id: &str) -> DiResult<AnyArc> {
        self.get(id)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("entries", &self.inner.registry.len())
            .field("providers", &self.inner.registry.provider_count())
            .finish()
    }
}

/// Downcasts a type-erased entry value.
pub(crate) fn downcast<T: Any + Send + Sync>(entry: &str, value: AnyArc) -> DiResult<Arc<T>> {
    value.downcast::<T>().map_err(|_| DiError::TypeMismatch {
        entry: EntryId::new(entry),
        expected: std::any::type_name::<T>(),
    })
}
