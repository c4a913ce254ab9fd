//! Resolver context for factory functions.
//!
//! This module contains the ResolverContext type which provides
//! the interface for factory functions to resolve dependencies.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::{downcast, ContainerInner};
use crate::error::DiResult;
use crate::internal::ResolutionStack;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// Context passed to factory functions for resolving dependencies.
///
/// Exposes exactly the container's `has`/`get` surface. Every `get` made
/// through the context joins the resolution stack of the call that invoked
/// the factory, so a cycle spanning several entries is still detected.
///
/// # Examples
///
/// ```
/// use layered_di::{ContainerBuilder, Definitions};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut defs = Definitions::new();
/// defs.value("db", Database { url: "postgres://localhost".to_string() });
/// defs.factory("users", |ctx| {
///     // ctx is a ResolverContext that provides access to other entries
///     Ok(UserService { db: ctx.get_as::<Database>("db")? })
/// });
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(defs)?;
/// let users = builder.build().get_as::<UserService>("users")?;
/// assert_eq!(users.db.url, "postgres://localhost");
/// # Ok::<(), layered_di::DiError>(())
/// ```
#[derive(Clone, Copy)]
pub struct ResolverContext<'a> {
    container: &'a ContainerInner,
    stack: &'a ResolutionStack,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(container: &'a ContainerInner, stack: &'a ResolutionStack) -> Self {
        Self { container, stack }
    }

    /// True if `id` is registered. Never resolves anything.
    pub fn has(&self, id: &str) -> bool {
        self.container.has(id)
    }

    /// Resolves `id` within the current call tree.
    pub fn get(&self, id: &str) -> DiResult<AnyArc> {
        self.container.resolve(id, self.stack)
    }

    /// Resolves `id` and downcasts it to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Arc<T>> {
        let value = self.get(id)?;
        downcast(id, value)
    }

    /// Resolves `id`, mapping `NotFound` for `id` itself to `None`.
    pub fn try_get(&self, id: &str) -> DiResult<Option<AnyArc>> {
        if !self.has(id) {
            return Ok(None);
        }
        self.get(id).map(Some)
    }

    /// Number of entries currently being resolved in this call tree.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn has(&self, id: &str) -> bool {
        ResolverContext::has(self, id)
    }

    fn resolve_any(&self, id: &str) -> DiResult<AnyArc> {
        self.get(id)
    }
}

impl fmt::Debug for ResolverContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("depth", &self.stack.depth())
            .finish()
    }
}
