//! Typed extension helpers built on the previous-definition accessor.
//!
//! Extension is not a separate engine primitive: every helper here is an
//! ordinary factory that calls [`Previous`](crate::Previous) and combines the
//! result. They cover the two shapes that come up most: wrapping the previous
//! value of an entry, and appending to a list entry.

use std::any::Any;
use std::sync::Arc;

use crate::collection::Definitions;
use crate::container::ResolverContext;
use crate::error::DiResult;
use crate::key::EntryId;
use crate::registration::AnyArc;

/// A decorator that receives the previous value of an entry and returns the
/// value to expose instead.
///
/// It can wrap, mutate (through interior mutability) or completely replace
/// the original. Closures with the matching signature implement it.
///
/// # Examples
///
/// ```
/// use layered_di::{ContainerBuilder, Decorator, Definitions, DiResult, ResolverContext};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct Plain;
/// impl Greeter for Plain {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
///
/// struct Shouting(Arc<dyn Greeter>);
/// impl Greeter for Shouting {
///     fn greet(&self) -> String { self.0.greet().to_uppercase() }
/// }
///
/// struct ShoutDecorator;
/// impl Decorator<Arc<dyn Greeter>> for ShoutDecorator {
///     fn decorate(
///         &self,
///         previous: Arc<Arc<dyn Greeter>>,
///         _ctx: &ResolverContext<'_>,
///     ) -> DiResult<Arc<Arc<dyn Greeter>>> {
///         let inner: Arc<dyn Greeter> = (*previous).clone();
///         Ok(Arc::new(Arc::new(Shouting(inner)) as Arc<dyn Greeter>))
///     }
/// }
///
/// let mut base = Definitions::new();
/// base.value("greeter", Arc::new(Plain) as Arc<dyn Greeter>);
///
/// let mut loud = Definitions::new();
/// loud.decorate("greeter", ShoutDecorator);
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(base)?.add_provider(loud)?;
/// let greeter = builder.build().get_as::<Arc<dyn Greeter>>("greeter")?;
/// assert_eq!(greeter.greet(), "HELLO");
/// # Ok::<(), layered_di::DiError>(())
/// ```
pub trait Decorator<T: Any + Send + Sync>: Send + Sync {
    /// Produces the new value from the previous one.
    fn decorate(&self, previous: Arc<T>, ctx: &ResolverContext<'_>) -> DiResult<Arc<T>>;
}

impl<T, F> Decorator<T> for F
where
    T: Any + Send + Sync,
    F: Fn(Arc<T>, &ResolverContext<'_>) -> DiResult<Arc<T>> + Send + Sync,
{
    fn decorate(&self, previous: Arc<T>, ctx: &ResolverContext<'_>) -> DiResult<Arc<T>> {
        self(previous, ctx)
    }
}

impl Definitions {
    /// Defines `id` as a decoration of its previous definition.
    ///
    /// Fails with [`DiError::NoPrevious`](crate::DiError::NoPrevious) if no
    /// earlier provider defines `id`, and with
    /// [`DiError::TypeMismatch`](crate::DiError::TypeMismatch) if the previous
    /// value is not a `T`.
    pub fn decorate<T, D>(&mut self, id: impl Into<EntryId>, decorator: D) -> &mut Self
    where
        T: Any + Send + Sync,
        D: Decorator<T> + 'static,
    {
        self.raw(id, move |ctx, previous| {
            let original = previous.get_as::<T>()?;
            decorator
                .decorate(original, ctx)
                .map(|decorated| decorated as AnyArc)
        })
    }

    /// Defines `id` as a `Vec<T>` made of the previous list (if any) followed
    /// by `items`.
    ///
    /// The first provider to contribute a list simply starts it.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_di::{ContainerBuilder, Definitions};
    ///
    /// let mut core = Definitions::new();
    /// core.extend_list("middleware", vec!["auth"]);
    /// let mut extra = Definitions::new();
    /// extra.extend_list("middleware", vec!["gzip", "metrics"]);
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.add_provider(core)?.add_provider(extra)?;
    /// let list = builder.build().get_as::<Vec<&'static str>>("middleware")?;
    /// assert_eq!(*list, vec!["auth", "gzip", "metrics"]);
    /// # Ok::<(), layered_di::DiError>(())
    /// ```
    pub fn extend_list<T>(&mut self, id: impl Into<EntryId>, items: Vec<T>) -> &mut Self
    where
        T: Any + Clone + Send + Sync,
    {
        self.extend(id, move |_ctx, previous| {
            let mut merged = match previous.try_get_as::<Vec<T>>()? {
                Some(existing) => existing.as_ref().clone(),
                None => Vec::with_capacity(items.len()),
            };
            merged.extend(items.iter().cloned());
            Ok(merged)
        })
    }
}

/// Built-in decorators.
pub mod decorators {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Passes the previous value through unchanged while counting how many
    /// times it was asked to decorate. Clones share one counter.
    ///
    /// # Examples
    ///
    /// ```
    /// use layered_di::{ContainerBuilder, Definitions, decorators::CountingDecorator};
    ///
    /// let counter = CountingDecorator::new();
    ///
    /// let mut base = Definitions::new();
    /// base.value("n", 7u32);
    /// let mut counted = Definitions::new();
    /// counted.decorate::<u32, _>("n", counter.clone());
    ///
    /// let mut builder = ContainerBuilder::new();
    /// builder.add_provider(base)?.add_provider(counted)?;
    /// let container = builder.build();
    ///
    /// container.get("n")?;
    /// container.get("n")?;
    /// assert_eq!(counter.count(), 1);
    /// # Ok::<(), layered_di::DiError>(())
    /// ```
    #[derive(Debug, Default, Clone)]
    pub struct CountingDecorator {
        count: Arc<AtomicU64>,
    }

    impl CountingDecorator {
        /// Creates a decorator with its counter at zero.
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of decorations performed so far, across all clones.
        pub fn count(&self) -> u64 {
            self.count.load(Ordering::Relaxed)
        }
    }

    impl<T: Any + Send + Sync> Decorator<T> for CountingDecorator {
        fn decorate(&self, previous: Arc<T>, _ctx: &ResolverContext<'_>) -> DiResult<Arc<T>> {
            self.count.fetch_add(1, Ordering::Relaxed);
            Ok(previous)
        }
    }
}
