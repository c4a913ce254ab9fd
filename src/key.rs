//! Entry identifier type for the dependency injection container.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identifier for an entry in the container.
///
/// Identifiers are opaque strings, unique within one container. Registering
/// the same identifier from two providers is not an error: it is how a later
/// provider overrides or extends an earlier one.
///
/// `EntryId` is backed by an `Arc<str>` so cloning it onto the resolution
/// stack or into error paths never copies the string.
///
/// # Examples
///
/// ```rust
/// use layered_di::EntryId;
///
/// let id = EntryId::from("logger");
/// assert_eq!(id.as_str(), "logger");
/// assert_eq!(id, "logger");
/// assert_eq!(id.to_string(), "logger");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Arc<str>);

impl EntryId {
    /// Creates an identifier from anything string-like.
    pub fn new(id: impl AsRef<str>) -> Self {
        EntryId(Arc::from(id.as_ref()))
    }

    /// The identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({:?})", &*self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Lets maps keyed by EntryId be queried with a plain &str.
impl Borrow<str> for EntryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        EntryId(Arc::from(id))
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        EntryId(Arc::from(id))
    }
}

impl From<&String> for EntryId {
    fn from(id: &String) -> Self {
        EntryId::new(id)
    }
}

impl From<&EntryId> for EntryId {
    fn from(id: &EntryId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for EntryId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for EntryId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
