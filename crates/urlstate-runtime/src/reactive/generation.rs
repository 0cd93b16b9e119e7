#![forbid(unsafe_code)]

//! Identity tokens for resource invocations.
//!
//! Every trigger of a [`Resource`](super::Resource) mints a fresh
//! [`Generation`]. Only the result of the invocation whose token is still the
//! resource's current one is committed; everything else is discarded.
//!
//! Comparison is by identity (`Rc::ptr_eq`), never by id, so two resources
//! can never confuse each other's tokens.
//!
//! Supersession is advisory: a producer may poll
//! [`is_superseded`](Generation::is_superseded) to stop early, but the
//! resource is correct whether or not it does.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct GenerationInner {
    id: u64,
    superseded: Cell<bool>,
}

/// Opaque marker for one producer invocation.
///
/// Cheaply cloneable; clones share identity.
#[derive(Clone)]
pub struct Generation {
    inner: Rc<GenerationInner>,
}

impl Generation {
    pub(crate) fn mint(id: u64) -> Self {
        Self {
            inner: Rc::new(GenerationInner {
                id,
                superseded: Cell::new(false),
            }),
        }
    }

    /// Sequence number within the owning resource, for logging.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Whether a newer invocation has started or the resource was dropped.
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        self.inner.superseded.get()
    }

    /// Whether `other` is this very token.
    #[must_use]
    pub fn same(&self, other: &Generation) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn supersede(&self) {
        self.inner.superseded.set(true);
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generation")
            .field("id", &self.inner.id)
            .field("superseded", &self.inner.superseded.get())
            .finish()
    }
}
