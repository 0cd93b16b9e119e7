#![forbid(unsafe_code)]

//! Lazy computed values that auto-update from [`Observable`] dependencies.
//!
//! # Design
//!
//! [`Computed<T>`] wraps a compute function and its cached result in shared,
//! reference-counted storage. When any dependency changes, the cached value is
//! invalidated (marked dirty). The next read recomputes and caches the result.
//!
//! Typical uses here: the decoded query state of the current page URL, and
//! a resource's `revalidating` flag derived from its in-flight count.
//!
//! # Invariants
//!
//! 1. A read always returns a value consistent with the current state of all
//!    dependencies.
//! 2. The compute function is called at most once per dependency change cycle.
//! 3. Version increments by exactly 1 per recomputation.
//!
//! # Failure Modes
//!
//! - **Compute function panics**: The previous cached value is lost and the
//!   next read retries.
//! - **Dependency dropped**: The subscription becomes inert. The computed value
//!   keeps its last cached result.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::observable::{Observable, Subscription};

struct ComputedInner<T> {
    compute: Box<dyn Fn() -> T>,
    cached: Option<T>,
    dirty: Cell<bool>,
    version: u64,
    _subscriptions: Vec<Subscription>,
}

/// A lazily-evaluated, memoized value derived from [`Observable`]s.
///
/// Cloning a `Computed` creates a new handle to the **same** inner state.
pub struct Computed<T> {
    inner: Rc<RefCell<ComputedInner<T>>>,
}

impl<T> Clone for Computed<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Computed")
            .field("cached", &inner.cached)
            .field("dirty", &inner.dirty.get())
            .field("version", &inner.version)
            .finish()
    }
}

fn mark_dirty<T, S>(weak: Weak<RefCell<ComputedInner<T>>>) -> impl Fn(&S) + 'static
where
    T: 'static,
    S: 'static,
{
    move |_| {
        if let Some(strong) = weak.upgrade() {
            // Busy means mid-recompute, which reads the new state anyway.
            if let Ok(inner) = strong.try_borrow() {
                inner.dirty.set(true);
            }
        }
    }
}

impl<T: Clone + 'static> Computed<T> {
    fn with_compute(compute: Box<dyn Fn() -> T>) -> Rc<RefCell<ComputedInner<T>>> {
        Rc::new(RefCell::new(ComputedInner {
            compute,
            cached: None,
            dirty: Cell::new(true),
            version: 0,
            _subscriptions: Vec::new(),
        }))
    }

    /// Derive from `source`, recomputing lazily after it changes.
    pub fn from_observable<S: Clone + 'static>(
        source: &Observable<S>,
        map: impl Fn(&S) -> T + 'static,
    ) -> Self {
        let source_clone = source.clone();
        let inner = Self::with_compute(Box::new(move || source_clone.with(|v| map(v))));
        let sub = source.subscribe(mark_dirty::<_, S>(Rc::downgrade(&inner)));
        inner.borrow_mut()._subscriptions.push(sub);
        Self { inner }
    }

    /// Current value, recomputed first if any dependency changed.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Borrow the current value, recomputing first if needed.
    ///
    /// # Panics
    ///
    /// Panics if the closure reads this same `Computed` (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut guard = self.inner.borrow_mut();
        let inner = &mut *guard;
        let value = match inner.cached.take() {
            Some(value) if !inner.dirty.get() => value,
            _ => {
                let value = (inner.compute)();
                inner.dirty.set(false);
                inner.version += 1;
                value
            }
        };
        f(inner.cached.insert(value))
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        let inner = self.inner.borrow();
        inner.dirty.get() || inner.cached.is_none()
    }

    /// Force the next read to recompute.
    pub fn invalidate(&self) {
        self.inner.borrow().dirty.set(true);
    }

    /// Number of recomputations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_dep_computed() {
        let source = Observable::new(10);
        let computed = Computed::from_observable(&source, |v| v * 2);

        assert_eq!(computed.get(), 20);
        assert_eq!(computed.version(), 1);

        source.set(5);
        assert!(computed.is_dirty());
        assert_eq!(computed.get(), 10);
        assert_eq!(computed.version(), 2);
    }

    #[test]
    fn memoization() {
        let compute_count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&compute_count);

        let source = Observable::new(10);
        let computed = Computed::from_observable(&source, move |v| {
            count_clone.set(count_clone.get() + 1);
            v * 2
        });

        assert_eq!(compute_count.get(), 0);
        assert_eq!(computed.get(), 20);
        assert_eq!(computed.get(), 20);
        assert_eq!(compute_count.get(), 1);

        source.set(20);
        assert_eq!(computed.get(), 40);
        assert_eq!(compute_count.get(), 2);
    }

    #[test]
    fn equal_set_keeps_cache() {
        let source = Observable::new(42);
        let computed = Computed::from_observable(&source, |v| *v);
        let _ = computed.get();

        source.set(42);
        assert!(!computed.is_dirty());
        assert_eq!(computed.version(), 1);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let source = Observable::new(5);
        let computed = Computed::from_observable(&source, |v| v * 3);
        assert_eq!(computed.get(), 15);
        assert!(!computed.is_dirty());

        computed.invalidate();
        assert!(computed.is_dirty());
        assert_eq!(computed.get(), 15);
        assert_eq!(computed.version(), 2);
    }

    #[test]
    fn with_access_and_clone_sharing() {
        let source = Observable::new(vec![1, 2, 3]);
        let sum = Computed::from_observable(&source, |v| v.iter().sum::<i32>());
        let other = sum.clone();
        assert_eq!(sum.with(|s| *s), 6);

        source.update(|v| v.push(4));
        assert_eq!(other.get(), 10);
        assert_eq!(sum.version(), 2);
    }

    #[test]
    fn survives_source_drop() {
        let computed;
        {
            let source = Observable::new(42);
            computed = Computed::from_observable(&source, |v| *v);
            let _ = computed.get();
        }
        assert_eq!(computed.get(), 42);
        assert!(!computed.is_dirty());
    }

    #[test]
    fn debug_format() {
        let source = Observable::new(42);
        let computed = Computed::from_observable(&source, |v| *v);
        let _ = computed.get();
        let dbg = format!("{computed:?}");
        assert!(dbg.contains("Computed"));
        assert!(dbg.contains("42"));
    }
}
