//! Provider system for ordered, modular registration.
//!
//! This module provides the [`Provider`] trait, the [`Definitions`] a
//! provider contributes, and extension traits for chaining providers onto a
//! [`ContainerBuilder`].

use std::any::Any;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::container::{Previous, ResolverContext};
use crate::error::DiResult;
use crate::key::EntryId;
use crate::registration::{into_factory, AnyArc, Factory};
use crate::ContainerBuilder;

/// A source of entry definitions.
///
/// A provider enumerates `identifier -> factory` pairs. Providers are applied
/// in the order they are added to the builder; a provider added later
/// overrides (or extends, through [`Previous`]) every entry it shares with an
/// earlier one.
///
/// # Example
///
/// ```rust
/// use layered_di::{ContainerBuilder, Definitions, Provider, DiResult};
///
/// struct Config { dsn: String }
/// struct Database { dsn: String }
///
/// struct DatabaseProvider;
///
/// impl Provider for DatabaseProvider {
///     fn definitions(&self) -> DiResult<Definitions> {
///         let mut defs = Definitions::new();
///         defs.value("config", Config { dsn: "postgres://localhost".to_string() });
///         defs.factory("db", |ctx| {
///             let config = ctx.get_as::<Config>("config")?;
///             Ok(Database { dsn: config.dsn.clone() })
///         });
///         Ok(defs)
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(DatabaseProvider)?;
/// let db = builder.build().get_as::<Database>("db")?;
/// assert_eq!(db.dsn, "postgres://localhost");
/// # Ok::<(), layered_di::DiError>(())
/// ```
pub trait Provider {
    /// Enumerates this provider's definitions.
    ///
    /// An error aborts registration of the whole provider.
    fn definitions(&self) -> DiResult<Definitions>;

    /// Name used in diagnostics. Defaults to the type name.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

impl<P: Provider + ?Sized> Provider for &P {
    fn definitions(&self) -> DiResult<Definitions> {
        (**self).definitions()
    }

    fn name(&self) -> Cow<'_, str> {
        (**self).name()
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn definitions(&self) -> DiResult<Definitions> {
        (**self).definitions()
    }

    fn name(&self) -> Cow<'_, str> {
        (**self).name()
    }
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn definitions(&self) -> DiResult<Definitions> {
        (**self).definitions()
    }

    fn name(&self) -> Cow<'_, str> {
        (**self).name()
    }
}

impl<P: Provider + ?Sized> Provider for Rc<P> {
    fn definitions(&self) -> DiResult<Definitions> {
        (**self).definitions()
    }

    fn name(&self) -> Cow<'_, str> {
        (**self).name()
    }
}

/// One provider's contribution: an ordered list of `identifier -> factory`.
///
/// Each identifier may appear at most once; a repeat is reported as
/// [`DiError::DuplicateContribution`](crate::DiError::DuplicateContribution)
/// when the contribution is added to a builder.
///
/// A `Definitions` value is itself a [`Provider`], so ad-hoc contributions
/// can be added without declaring a type.
#[derive(Clone, Default)]
pub struct Definitions {
    entries: Vec<(EntryId, Factory)>,
    name: Option<String>,
}

impl Definitions {
    /// Creates an empty contribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty contribution reported under `name` in diagnostics.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            name: Some(name.into()),
        }
    }

    /// Defines `id` as a ready-made value.
    pub fn value<T>(&mut self, id: impl Into<EntryId>, value: T) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        let value: AnyArc = Arc::new(value);
        self.raw(id, move |_, _| Ok(value.clone()))
    }

    /// Defines `id` with a factory that may resolve other entries.
    pub fn factory<T, F>(&mut self, id: impl Into<EntryId>, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&ResolverContext<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.raw(id, move |ctx, _| factory(ctx).map(|v| Arc::new(v) as AnyArc))
    }

    /// Defines `id` with a factory that can call through to the previous
    /// definition of the same entry.
    pub fn extend<T, F>(&mut self, id: impl Into<EntryId>, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&ResolverContext<'_>, &Previous<'_>) -> DiResult<T> + Send + Sync + 'static,
    {
        self.raw(id, move |ctx, previous| {
            factory(ctx, previous).map(|v| Arc::new(v) as AnyArc)
        })
    }

    /// Defines `id` with an untyped factory returning the erased value itself.
    ///
    /// Returning the previous value unchanged (`previous.get()`) keeps the
    /// exact same instance.
    pub fn raw<F>(&mut self, id: impl Into<EntryId>, factory: F) -> &mut Self
    where
        F: for<'a> Fn(&ResolverContext<'a>, &Previous<'a>) -> DiResult<AnyArc> + Send + Sync + 'static,
    {
        self.definition(id, into_factory(factory))
    }

    /// Adds an already erased [`Factory`].
    pub fn definition(&mut self, id: impl Into<EntryId>, factory: Factory) -> &mut Self {
        self.entries.push((id.into(), factory));
        self
    }

    /// Identifiers in contribution order.
    pub fn ids(&self) -> impl Iterator<Item = &EntryId> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First identifier that appears more than once.
    pub(crate) fn first_duplicate(&self) -> Option<&EntryId> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .iter()
            .map(|(id, _)| id)
            .find(|id| !seen.insert(id.as_str()))
    }

    pub(crate) fn into_entries(self) -> Vec<(EntryId, Factory)> {
        self.entries
    }
}

impl Provider for Definitions {
    fn definitions(&self) -> DiResult<Definitions> {
        Ok(self.clone())
    }

    fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Borrowed("<definitions>"),
        }
    }
}

impl fmt::Debug for Definitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definitions")
            .field("name", &self.name)
            .field("ids", &self.ids().collect::<Vec<_>>())
            .finish()
    }
}

/// Extension trait for by-value provider chaining.
///
/// # Example
///
/// ```rust
/// use layered_di::{ContainerBuilder, ContainerBuilderExt, Definitions, Provider, DiResult};
///
/// struct Logging;
/// impl Provider for Logging {
///     fn definitions(&self) -> DiResult<Definitions> {
///         let mut defs = Definitions::new();
///         defs.value("log.level", "info".to_string());
///         Ok(defs)
///     }
/// }
///
/// struct Verbose;
/// impl Provider for Verbose {
///     fn definitions(&self) -> DiResult<Definitions> {
///         let mut defs = Definitions::new();
///         defs.value("log.level", "trace".to_string());
///         Ok(defs)
///     }
/// }
///
/// let container = ContainerBuilder::new()
///     .with_provider(Logging)?
///     .with_provider(Verbose)?
///     .build();
/// assert_eq!(*container.get_as::<String>("log.level")?, "trace");
/// # Ok::<(), layered_di::DiError>(())
/// ```
pub trait ContainerBuilderExt {
    /// Adds a provider, consuming and returning the builder.
    fn with_provider<P: Provider>(self, provider: P) -> DiResult<Self>
    where
        Self: Sized;
}

impl ContainerBuilderExt for ContainerBuilder {
    fn with_provider<P: Provider>(mut self, provider: P) -> DiResult<Self> {
        self.add_provider(provider)?;
        Ok(self)
    }
}
