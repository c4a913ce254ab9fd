//! Accessor for the definition registered before the running one.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use crate::container::{downcast, ResolverContext};
use crate::error::{DiError, DiResult};
use crate::internal::engine;
use crate::key::EntryId;
use crate::registration::{AnyArc, DefinitionChain};

/// Deferred access to the previous definition of the entry being resolved.
///
/// Handed to every factory alongside the [`ResolverContext`]. Nothing runs
/// until the factory asks for the previous value; the result (value or error)
/// is then memoized, so asking twice executes the previous factory once and
/// returns the same outcome both times.
///
/// On the first definition of a chain there is nothing before it: `get`
/// fails with [`DiError::NoPrevious`] and `try_get` returns `Ok(None)`.
///
/// # Examples
///
/// ```
/// use layered_di::{ContainerBuilder, Definitions};
/// use std::sync::Arc;
///
/// let mut base = Definitions::new();
/// base.value("greeting", "hello".to_string());
///
/// let mut loud = Definitions::new();
/// loud.extend("greeting", |_ctx, previous| {
///     let inner = previous.get_as::<String>()?;
///     Ok(inner.to_uppercase())
/// });
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(base)?.add_provider(loud)?;
/// let container = builder.build();
///
/// assert_eq!(*container.get_as::<String>("greeting")?, "HELLO");
/// # Ok::<(), layered_di::DiError>(())
/// ```
pub struct Previous<'a> {
    entry: &'a EntryId,
    chain: &'a DefinitionChain,
    position: Option<usize>,
    ctx: ResolverContext<'a>,
    memo: OnceCell<DiResult<AnyArc>>,
}

impl<'a> Previous<'a> {
    pub(crate) fn new(
        entry: &'a EntryId,
        chain: &'a DefinitionChain,
        position: Option<usize>,
        ctx: ResolverContext<'a>,
    ) -> Self {
        Self {
            entry,
            chain,
            position,
            ctx,
            memo: OnceCell::new(),
        }
    }

    /// The entry this accessor belongs to.
    pub fn entry(&self) -> &EntryId {
        self.entry
    }

    /// Whether an earlier definition exists.
    pub fn exists(&self) -> bool {
        self.position.is_some()
    }

    /// Resolves the previous definition, running it at most once.
    pub fn get(&self) -> DiResult<AnyArc> {
        self.memo.get_or_init(|| self.compute()).clone()
    }

    /// Like [`get`](Self::get) but maps "no previous definition" to `None`.
    pub fn try_get(&self) -> DiResult<Option<AnyArc>> {
        if !self.exists() {
            return Ok(None);
        }
        self.get().map(Some)
    }

    /// Resolves the previous value as `T`.
    pub fn get_as<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        downcast(self.entry.as_str(), self.get()?)
    }

    /// Resolves the previous value as `T`, or `None` on the first definition.
    pub fn try_get_as<T: Any + Send + Sync>(&self) -> DiResult<Option<Arc<T>>> {
        match self.try_get()? {
            Some(value) => downcast(self.entry.as_str(), value).map(Some),
            None => Ok(None),
        }
    }

    fn compute(&self) -> DiResult<AnyArc> {
        match self.position {
            Some(position) => {
                tracing::trace!(entry = %self.entry, position, "resolving previous definition");
                engine::resolve_at(self.entry, self.chain, position, self.ctx)
            }
            None => Err(DiError::NoPrevious(self.entry.clone())),
        }
    }
}

impl fmt::Debug for Previous<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Previous")
            .field("entry", self.entry)
            .field("position", &self.position)
            .field("resolved", &self.memo.get().is_some())
            .finish()
    }
}
