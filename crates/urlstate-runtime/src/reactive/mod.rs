#![forbid(unsafe_code)]

//! Reactive data bindings and async resources.
//!
//! - [`Observable`]: A shared, version-tracked value wrapper with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`Computed`]: A lazily-evaluated, memoized value derived from an
//!   `Observable`.
//! - [`Resource`]: Observable state driven by an async producer, re-invoked
//!   on demand or whenever a tracked `Observable` changes.
//! - [`Generation`]: Identity token for one producer invocation.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! Subscribers are stored as `Weak` function pointers and cleaned up lazily
//! during notification. No borrow is held while callbacks run, so a callback
//! may read or write the observable it is subscribed to.
//!
//! `Resource` keeps its state in an `Observable` and its in-flight count in
//! another; spawned producer tasks hold only a `Weak` handle to it.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that notifies.
//! 2. Subscribers are notified in registration order.
//! 3. `Observable::set` with a value equal to the current value is a no-op.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. `Computed::get()` never returns a stale value.
//! 6. A `Resource` commits only the result of its newest generation.

pub mod computed;
pub mod generation;
pub mod observable;
pub mod resource;
pub mod spawn;

pub use computed::Computed;
pub use generation::Generation;
pub use observable::{Observable, Subscription};
pub use resource::{Resource, ResourceState, Status};
pub use spawn::Spawner;
