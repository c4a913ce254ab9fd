//! Diagnostic observers for resolution traceability.
//!
//! This module provides hooks for observing resolution events, enabling
//! structured tracing, performance monitoring and debugging of container
//! start-up.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::EntryId;

/// Observer trait for resolution events.
///
/// Observers are notified whenever the container actually runs the factory
/// chain for an entry; cache hits are not reported. Events for nested
/// resolutions (an entry requested by another entry's factory) are reported
/// too, so `resolving`/`resolved` pairs nest like the call tree.
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use layered_di::{ContainerBuilder, Definitions, DiError, DiObserver, EntryId};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     events: Mutex<Vec<String>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, entry: &EntryId) {
///         self.events.lock().unwrap().push(format!("start {}", entry));
///     }
///
///     fn resolved(&self, entry: &EntryId, _duration: Duration) {
///         self.events.lock().unwrap().push(format!("done {}", entry));
///     }
///
///     fn resolution_failed(&self, entry: &EntryId, error: &DiError) {
///         self.events.lock().unwrap().push(format!("fail {}: {}", entry, error));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut defs = Definitions::new();
/// defs.value("answer", 42u32);
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_observer(recorder.clone());
/// builder.add_provider(defs)?;
/// let container = builder.build();
///
/// container.get("answer")?;
/// container.get("answer")?; // cached: no events
/// assert_eq!(*recorder.events.lock().unwrap(), vec!["start answer", "done answer"]);
/// # Ok::<(), DiError>(())
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before the active factory of `entry` is invoked.
    fn resolving(&self, entry: &EntryId);

    /// Called after the factory chain of `entry` produced a value.
    ///
    /// # Arguments
    ///
    /// * `entry` - The entry that was resolved
    /// * `duration` - Time elapsed from `resolving` to `resolved`, nested
    ///   resolutions included
    fn resolved(&self, entry: &EntryId, duration: Duration);

    /// Called when resolving `entry` failed. The error is still returned to
    /// the caller after this call.
    fn resolution_failed(&self, entry: &EntryId, error: &DiError) {
        let _ = (entry, error);
    }
}

/// Container for registered observers.
///
/// Designed to have minimal overhead when no observers are registered.
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    /// Returns true if any observers are registered.
    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, entry: &EntryId) {
        for observer in &self.observers {
            observer.resolving(entry);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, entry: &EntryId, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(entry, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, entry: &EntryId, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(entry, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Successful resolutions are emitted at `DEBUG`, failures at `WARN`. Install
/// a subscriber (for example `tracing_subscriber::fmt`) to see them.
///
/// # Examples
///
/// ```
/// use layered_di::{ContainerBuilder, TracingObserver};
/// use std::sync::Arc;
///
/// let mut builder = ContainerBuilder::new();
/// builder.add_observer(Arc::new(TracingObserver::with_label("bootstrap")));
/// let container = builder.build();
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    /// Creates a tracing observer with the default label.
    pub fn new() -> Self {
        Self {
            label: "layered-di".to_string(),
        }
    }

    /// Creates a tracing observer whose events carry a custom label.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The label attached to every event.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for TracingObserver {
    fn resolving(&self, entry: &EntryId) {
        tracing::debug!(label = %self.label, entry = %entry, "resolving");
    }

    fn resolved(&self, entry: &EntryId, duration: Duration) {
        tracing::debug!(
            label = %self.label,
            entry = %entry,
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn resolution_failed(&self, entry: &EntryId, error: &DiError) {
        tracing::warn!(label = %self.label, entry = %entry, error = %error, "resolution failed");
    }
}
