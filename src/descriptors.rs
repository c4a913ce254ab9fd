//! Entry descriptors for introspection and diagnostics.

use crate::key::EntryId;
use crate::registration::ProviderOrdinal;

/// Entry descriptor for introspection and diagnostics
///
/// Describes one registered entry and every definition in its chain, in
/// registration order. Useful for checking at start-up which provider ended
/// up owning an entry and which providers extend it.
///
/// # Examples
///
/// ```rust
/// use layered_di::{ContainerBuilder, Definitions, Provider, DiResult};
///
/// struct Base;
/// impl Provider for Base {
///     fn definitions(&self) -> DiResult<Definitions> {
///         let mut defs = Definitions::new();
///         defs.value("greeting", "hello".to_string());
///         defs.value("port", 8080u16);
///         Ok(defs)
///     }
///     fn name(&self) -> std::borrow::Cow<'_, str> {
///         "base".into()
///     }
/// }
///
/// struct Overrides;
/// impl Provider for Overrides {
///     fn definitions(&self) -> DiResult<Definitions> {
///         let mut defs = Definitions::new();
///         defs.value("port", 9090u16);
///         Ok(defs)
///     }
///     fn name(&self) -> std::borrow::Cow<'_, str> {
///         "overrides".into()
///     }
/// }
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_provider(Base)?.add_provider(Overrides)?;
/// let descriptors = builder.build().descriptors();
///
/// let port = descriptors.iter().find(|d| d.id == "port").unwrap();
/// assert_eq!(port.providers().collect::<Vec<_>>(), vec!["base", "overrides"]);
/// assert_eq!(port.active_provider(), "overrides");
/// assert!(port.is_overridden());
///
/// let greeting = descriptors.iter().find(|d| d.id == "greeting").unwrap();
/// assert!(!greeting.is_overridden());
/// # Ok::<(), layered_di::DiError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDescriptor {
    /// The entry identifier
    pub id: EntryId,
    /// Definitions in chain order; the last one is active
    pub definitions: Vec<DefinitionInfo>,
}

/// One definition in an entry's chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfo {
    /// Registration ordinal of the contributing provider
    pub ordinal: ProviderOrdinal,
    /// Name of the contributing provider
    pub provider: String,
}

impl EntryDescriptor {
    /// Name of the provider whose definition answers `get`.
    pub fn active_provider(&self) -> &str {
        self.definitions
            .last()
            .map(|d| d.provider.as_str())
            .unwrap_or_default()
    }

    /// Contributing provider names, earliest first.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.definitions.iter().map(|d| d.provider.as_str())
    }

    /// True when more than one provider defines this entry.
    pub fn is_overridden(&self) -> bool {
        self.definitions.len() > 1
    }
}
