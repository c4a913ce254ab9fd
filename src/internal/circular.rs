//! Circular dependency detection infrastructure.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{DiError, DiResult};
use crate::key::EntryId;

#[cfg(feature = "smallvec")]
type Frames = smallvec::SmallVec<[EntryId; 8]>;
#[cfg(not(feature = "smallvec"))]
type Frames = Vec<EntryId>;

/// Entries currently being resolved by one call tree.
///
/// A fresh stack is created by every top-level `Container::get` and threaded
/// by reference through the resolver context, so concurrent call trees never
/// see each other's frames.
#[derive(Default)]
pub(crate) struct ResolutionStack {
    frames: RefCell<Frames>,
}

impl ResolutionStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pushes `id`, failing with the cycle path if it is already on the stack.
    pub(crate) fn enter(&self, id: &EntryId) -> DiResult<StackGuard<'_>> {
        let mut frames = self.frames.borrow_mut();

        // Circular detection BEFORE pushing the new frame
        if let Some(start) = frames.iter().position(|frame| frame == id) {
            let mut path: Vec<EntryId> = frames[start..].to_vec();
            path.push(id.clone());
            tracing::debug!(entry = %id, depth = frames.len(), "circular dependency detected");
            return Err(DiError::CycleDetected(path));
        }

        frames.push(id.clone());
        Ok(StackGuard { stack: self })
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.borrow().len()
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Vec<EntryId> {
        self.frames.borrow().to_vec()
    }
}

thread_local! {
    /// Call trees running on this thread, keyed by the container that owns them.
    static ACTIVE: RefCell<Vec<(usize, Rc<ResolutionStack>)>> = RefCell::new(Vec::new());
}

/// Runs `f` with the resolution stack of the call tree `owner` is already
/// running on this thread, or with a fresh one installed for the duration.
///
/// A factory holding its own handle to the container joins the stack of the
/// resolution that invoked it, so re-entering an entry under construction is
/// reported as a cycle.
pub(crate) fn with_ambient_stack<R>(owner: usize, f: impl FnOnce(&ResolutionStack) -> R) -> R {
    let running = ACTIVE.with(|active| {
        active
            .borrow()
            .iter()
            .rev()
            .find(|(id, _)| *id == owner)
            .map(|(_, stack)| Rc::clone(stack))
    });
    if let Some(stack) = running {
        return f(&stack);
    }

    let stack = Rc::new(ResolutionStack::new());
    ACTIVE.with(|active| active.borrow_mut().push((owner, Rc::clone(&stack))));
    let _installed = AmbientGuard;
    f(&stack)
}

struct AmbientGuard;

impl Drop for AmbientGuard {
    fn drop(&mut self) {
        // Call trees nest, so the innermost one is always last
        let _ = ACTIVE.try_with(|active| active.borrow_mut().pop());
    }
}

/// Pops its frame on every exit path, including unwinding out of a factory.
pub(crate) struct StackGuard<'s> {
    stack: &'s ResolutionStack,
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        self.stack.frames.borrow_mut().pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_pops_on_drop() {
        let stack = ResolutionStack::new();
        {
            let _a = stack.enter(&"a".into()).unwrap();
            let _b = stack.enter(&"b".into()).unwrap();
            assert_eq!(stack.snapshot(), vec![EntryId::from("a"), EntryId::from("b")]);
        }
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn reentry_reports_only_the_cycle() {
        let stack = ResolutionStack::new();
        let _root = stack.enter(&"root".into()).unwrap();
        let _a = stack.enter(&"a".into()).unwrap();
        let _b = stack.enter(&"b".into()).unwrap();

        let err = stack.enter(&"a".into()).err().unwrap();
        let path: Vec<&str> = err.cycle_path().unwrap().iter().map(EntryId::as_str).collect();
        assert_eq!(path, vec!["a", "b", "a"]);
        // The failed enter must not leave a frame behind
        assert_eq!(stack.depth(), 3);
    }

    #[test]
    fn ambient_stack_is_shared_per_owner() {
        with_ambient_stack(1, |outer| {
            let _a = outer.enter(&"a".into()).unwrap();

            with_ambient_stack(1, |same| {
                assert_eq!(same.snapshot(), vec![EntryId::from("a")]);
                assert!(same.enter(&"a".into()).is_err());
            });
            with_ambient_stack(2, |other| {
                assert_eq!(other.depth(), 0);
                let _a = other.enter(&"a".into()).unwrap();
            });
        });

        // Nothing stays installed once the outermost call returns
        ACTIVE.with(|active| assert!(active.borrow().is_empty()));
    }
}
