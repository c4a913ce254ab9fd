//! Factory definitions and the entry descriptor store.

use std::any::Any;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::container::{Previous, ResolverContext};
use crate::error::DiResult;
use crate::key::EntryId;

/// Type-erased, shareable entry value.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Construction function backing one definition.
///
/// Receives the resolver context (`has`/`get` against the container) and the
/// accessor for the definition registered before this one.
pub type Factory =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>, &Previous<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Erases a factory closure into a [`Factory`].
pub(crate) fn into_factory<F>(f: F) -> Factory
where
    F: for<'a> Fn(&ResolverContext<'a>, &Previous<'a>) -> DiResult<AnyArc> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// Registration ordinal of a provider. Later providers get larger ordinals.
pub type ProviderOrdinal = u64;

/// One unit of construction logic bound to an entry.
pub(crate) struct FactoryDefinition {
    pub(crate) ordinal: ProviderOrdinal,
    pub(crate) ctor: Factory,
}

impl FactoryDefinition {
    #[inline]
    pub(crate) fn invoke<'a>(&self, ctx: &ResolverContext<'a>, previous: &Previous<'a>) -> DiResult<AnyArc> {
        (self.ctor)(ctx, previous)
    }
}

/// All definitions for one entry, ordered by provider ordinal.
///
/// Never empty. The last definition is the active one; earlier ones are only
/// reachable through the previous accessor of the definition after them.
pub(crate) struct DefinitionChain {
    definitions: Vec<FactoryDefinition>,
}

impl DefinitionChain {
    fn new(first: FactoryDefinition) -> Self {
        Self {
            definitions: vec![first],
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub(crate) fn get(&self, position: usize) -> Option<&FactoryDefinition> {
        self.definitions.get(position)
    }

    /// Position of the active (most recently registered) definition.
    #[inline]
    pub(crate) fn top(&self) -> usize {
        self.definitions.len() - 1
    }

    pub(crate) fn ordinals(&self) -> impl Iterator<Item = ProviderOrdinal> + '_ {
        self.definitions.iter().map(|d| d.ordinal)
    }

    fn push(&mut self, definition: FactoryDefinition) {
        debug_assert!(self
            .definitions
            .last()
            .map_or(true, |last| last.ordinal <= definition.ordinal));
        self.definitions.push(definition);
    }
}

/// Entry descriptor store: identifier -> definition chain.
///
/// Append-only while the builder owns it, read-only once the container is
/// built.
pub(crate) struct Registry {
    chains: Map<EntryId, DefinitionChain>,
    /// Provider names indexed by ordinal
    providers: Vec<String>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            chains: Map::default(),
            providers: Vec::new(),
        }
    }

    /// Reserves the next ordinal for a provider.
    pub(crate) fn next_ordinal(&mut self, provider_name: impl Into<String>) -> ProviderOrdinal {
        let ordinal = self.providers.len() as ProviderOrdinal;
        self.providers.push(provider_name.into());
        ordinal
    }

    /// Appends `ctor` to the chain for `id`, creating the chain if absent.
    pub(crate) fn register(&mut self, id: EntryId, ordinal: ProviderOrdinal, ctor: Factory) {
        let definition = FactoryDefinition { ordinal, ctor };
        match self.chains.get_mut(id.as_str()) {
            Some(chain) => chain.push(definition),
            None => {
                self.chains.insert(id, DefinitionChain::new(definition));
            }
        }
    }

    #[inline]
    pub(crate) fn chain_for(&self, id: &str) -> Option<&DefinitionChain> {
        self.chains.get(id)
    }

    /// Returns the stored key so callers can reuse its allocation.
    #[inline]
    pub(crate) fn chain_entry(&self, id: &str) -> Option<(&EntryId, &DefinitionChain)> {
        self.chains.get_key_value(id)
    }

    #[inline]
    pub(crate) fn contains(&self, id: &str) -> bool {
        self.chains.contains_key(id)
    }

    /// Every registered identifier, sorted.
    pub(crate) fn known_identifiers(&self) -> BTreeSet<EntryId> {
        self.chains.keys().cloned().collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&EntryId, &DefinitionChain)> {
        self.chains.iter()
    }

    pub(crate) fn provider_name(&self, ordinal: ProviderOrdinal) -> &str {
        self.providers
            .get(ordinal as usize)
            .map(String::as_str)
            .unwrap_or("<unknown>")
    }

    pub(crate) fn provider_count(&self) -> usize {
        self.providers.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.chains.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(n: u32) -> Factory {
        into_factory(move |_, _| Ok(Arc::new(n) as AnyArc))
    }

    #[test]
    fn register_appends_in_ordinal_order() {
        let mut reg = Registry::new();
        let p1 = reg.next_ordinal("p1");
        let p2 = reg.next_ordinal("p2");
        reg.register("a".into(), p1, constant(1));
        reg.register("a".into(), p2, constant(2));
        reg.register("b".into(), p2, constant(3));

        let chain = reg.chain_for("a").unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.top(), 1);
        assert_eq!(chain.ordinals().collect::<Vec<_>>(), vec![p1, p2]);
        assert_eq!(reg.provider_name(p2), "p2");
        assert_eq!(reg.provider_count(), 2);
    }

    #[test]
    fn known_identifiers_is_union() {
        let mut reg = Registry::new();
        let p = reg.next_ordinal("p");
        reg.register("z".into(), p, constant(0));
        reg.register("a".into(), p, constant(0));
        let ids: Vec<_> = reg.known_identifiers().into_iter().collect();
        assert_eq!(ids, vec![EntryId::from("a"), EntryId::from("z")]);
        assert!(reg.contains("a"));
        assert!(!reg.contains("missing"));
        assert!(reg.chain_for("missing").is_none());
    }
}
