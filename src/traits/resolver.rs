//! Resolver traits for entry resolution.

use std::any::Any;
use std::sync::Arc;

use crate::container::downcast;
use crate::error::DiResult;
use crate::registration::AnyArc;

/// Core resolver trait for object-safe entry resolution.
///
/// This is exactly the surface a factory sees of the container: ask whether an
/// entry exists, and resolve it. Both [`Container`](crate::Container) and
/// [`ResolverContext`](crate::ResolverContext) implement it, so helpers can be
/// written once against `&dyn ResolverCore`.
///
/// Most users should use the [`Resolver`] trait instead, which provides typed
/// methods built on top of this trait.
pub trait ResolverCore {
    /// True if `id` is registered. Never triggers resolution.
    fn has(&self, id: &str) -> bool;

    /// Resolves `id` to its type-erased value.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The resolved entry wrapped in `Arc<dyn Any>`
    /// * `Err(DiError)` - Resolution error (not found, cycle, factory failure)
    fn resolve_any(&self, id: &str) -> DiResult<AnyArc>;
}

/// Typed resolution on top of [`ResolverCore`].
///
/// Implemented for every `ResolverCore`, including `dyn ResolverCore`.
///
/// # Examples
///
/// ```
/// use layered_di::{ContainerBuilder, Definitions, Resolver, ResolverCore, DiResult};
/// use std::sync::Arc;
///
/// fn port(resolver: &dyn ResolverCore) -> DiResult<u16> {
///     Ok(*resolver.resolve_as::<u16>("port")?)
/// }
///
/// let mut defs = Definitions::new();
/// defs.value("port", 8080u16);
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(defs)?;
/// let container = builder.build();
///
/// assert_eq!(port(&container)?, 8080);
/// assert!(container.resolve_optional_as::<String>("name")?.is_none());
/// # Ok::<(), layered_di::DiError>(())
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves `id` and downcasts it to `T`.
    fn resolve_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Arc<T>> {
        downcast(id, self.resolve_any(id)?)
    }

    /// Resolves `id` if it is registered, `None` otherwise.
    fn resolve_optional(&self, id: &str) -> DiResult<Option<AnyArc>> {
        if !self.has(id) {
            return Ok(None);
        }
        self.resolve_any(id).map(Some)
    }

    /// Typed variant of [`resolve_optional`](Self::resolve_optional).
    fn resolve_optional_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Option<Arc<T>>> {
        match self.resolve_optional(id)? {
            Some(value) => downcast(id, value).map(Some),
            None => Ok(None),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
