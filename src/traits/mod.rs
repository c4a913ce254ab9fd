//! Core traits for the dependency injection container.

pub mod resolver;

pub use resolver::{Resolver, ResolverCore};
