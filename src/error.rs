//! Error types for the dependency injection container.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::key::EntryId;

/// Dependency injection errors
///
/// Represents the error conditions that can occur while registering providers
/// or resolving entries. Every error is returned to the caller of the
/// triggering `add_provider`/`get` call; the container never logs and drops
/// an error, never retries and never substitutes a default.
///
/// # Examples
///
/// ```rust
/// use layered_di::{ContainerBuilder, DiError};
///
/// let container = ContainerBuilder::new().build();
/// match container.get("missing") {
///     Err(DiError::NotFound(id)) => assert_eq!(id, "missing"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use layered_di::{DiError, EntryId};
///
/// let cycle = DiError::CycleDetected(vec!["a".into(), "b".into(), "a".into()]);
/// assert_eq!(cycle.to_string(), "Circular dependency: a -> b -> a");
///
/// let failure = DiError::message("option `dsn` is required; set it in the db provider");
/// assert!(failure.to_string().contains("dsn"));
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Entry was never registered
    #[error("Entry not found: {0}")]
    NotFound(EntryId),
    /// The previous accessor was invoked on the first definition of a chain
    #[error("No previous definition for: {0}")]
    NoPrevious(EntryId),
    /// Resolution revisited an entry that is still being resolved (includes path)
    #[error("Circular dependency: {}", join_path(.0))]
    CycleDetected(Vec<EntryId>),
    /// A factory failed while constructing its entry
    #[error(transparent)]
    Factory(FactoryError),
    /// A provider contributed the same entry twice in one contribution
    #[error("Provider '{provider}' contributed entry '{entry}' more than once")]
    DuplicateContribution {
        /// Name of the offending provider
        provider: String,
        /// The repeated identifier
        entry: EntryId,
    },
    /// The resolved value is not of the requested type
    #[error("Type mismatch for '{entry}': expected {expected}")]
    TypeMismatch {
        /// Entry whose value was requested
        entry: EntryId,
        /// Requested type name
        expected: &'static str,
    },
}

fn join_path(path: &[EntryId]) -> String {
    path.iter()
        .map(EntryId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl DiError {
    /// Wraps an arbitrary error raised by a factory.
    pub fn factory<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        DiError::Factory(FactoryError::new(err))
    }

    /// Builds a factory failure from a descriptive message.
    ///
    /// Providers are expected to say what is missing and how to supply it.
    pub fn message(msg: impl Into<String>) -> Self {
        DiError::Factory(FactoryError::new(FactoryMessage(msg.into())))
    }

    /// True for both `NotFound` and `NoPrevious`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DiError::NotFound(_) | DiError::NoPrevious(_))
    }

    /// The cycle path, if this is a `CycleDetected` error.
    pub fn cycle_path(&self) -> Option<&[EntryId]> {
        match self {
            DiError::CycleDetected(path) => Some(path),
            _ => None,
        }
    }

    // Stamps the failing entry on a factory error that doesn't name one yet.
    pub(crate) fn with_entry(self, id: &EntryId) -> Self {
        match self {
            DiError::Factory(mut err) if err.entry.is_none() => {
                err.entry = Some(id.clone());
                DiError::Factory(err)
            }
            other => other,
        }
    }
}

/// Failure raised by a factory during construction.
///
/// Carries the underlying error verbatim; it is reachable through
/// [`std::error::Error::source`] or [`FactoryError::downcast_ref`].
#[derive(Debug, Clone)]
pub struct FactoryError {
    entry: Option<EntryId>,
    source: Arc<dyn StdError + Send + Sync>,
}

impl FactoryError {
    pub(crate) fn new<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            entry: None,
            source: Arc::new(err),
        }
    }

    /// The entry whose factory failed.
    pub fn entry(&self) -> Option<&EntryId> {
        self.entry.as_ref()
    }

    /// The underlying error.
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.source
    }

    /// Attempts to view the underlying error as a concrete type.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entry {
            Some(entry) => write!(f, "Factory for '{}' failed: {}", entry, self.source),
            None => write!(f, "Factory failed: {}", self.source),
        }
    }
}

impl StdError for FactoryError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.source)
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct FactoryMessage(String);

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout the crate
/// and by factory closures.
///
/// # Examples
///
/// ```rust
/// use layered_di::{DiResult, DiError};
///
/// fn port_from(raw: &str) -> DiResult<u16> {
///     raw.parse().map_err(DiError::factory)
/// }
///
/// assert_eq!(port_from("8080").unwrap(), 8080);
/// assert!(port_from("http").is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
