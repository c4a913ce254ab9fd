//! Resolution engine: runs one definition of a chain.

use crate::container::{Previous, ResolverContext};
use crate::error::{DiError, DiResult};
use crate::key::EntryId;
use crate::registration::{AnyArc, DefinitionChain};

/// Invokes `chain[position]`, handing it an accessor for `chain[position - 1]`.
///
/// Cycle frames are managed by the caller: walking backward through the same
/// chain stays inside the frame pushed for `entry`.
pub(crate) fn resolve_at<'a>(
    entry: &'a EntryId,
    chain: &'a DefinitionChain,
    position: usize,
    ctx: ResolverContext<'a>,
) -> DiResult<AnyArc> {
    let definition = chain
        .get(position)
        .ok_or_else(|| DiError::NoPrevious(entry.clone()))?;
    let previous = Previous::new(entry, chain, position.checked_sub(1), ctx);

    tracing::trace!(
        entry = %entry,
        position,
        ordinal = definition.ordinal,
        "invoking factory"
    );

    definition
        .invoke(&ctx, &previous)
        .map_err(|err| err.with_entry(entry))
}

/// Resolves the active (most recently registered) definition.
#[inline]
pub(crate) fn resolve_top<'a>(
    entry: &'a EntryId,
    chain: &'a DefinitionChain,
    ctx: ResolverContext<'a>,
) -> DiResult<AnyArc> {
    resolve_at(entry, chain, chain.top(), ctx)
}
