//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod engine;

pub(crate) use circular::{with_ambient_stack, ResolutionStack};
