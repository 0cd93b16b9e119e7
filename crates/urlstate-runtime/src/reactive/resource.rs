#![forbid(unsafe_code)]

//! Async resources with stale-while-revalidate semantics.
//!
//! A [`Resource`] owns an async producer and exposes its latest outcome as
//! observable [`ResourceState`]. Each trigger (construction, an explicit
//! [`revalidate`](Resource::revalidate), or a change of a tracked
//! [`Observable`]) mints a fresh [`Generation`], bumps the in-flight count
//! and spawns the producer.
//!
//! # Invariants
//!
//! 1. Only the newest generation commits. Results of superseded invocations
//!    are discarded without touching state, whatever order they finish in.
//! 2. Every finished invocation, stale or current, decrements the in-flight
//!    count; `revalidating()` is `in_flight > 0`.
//! 3. A trigger never changes the visible state: the last success or error
//!    stays readable until the new result commits.
//! 4. Exactly one of data/error is present outside `Loading`.
//! 5. No `RefCell` borrow is held while subscribers run, so a subscriber may
//!    call back into the resource.
//!
//! # Failure Modes
//!
//! - **Producer rejects**: state becomes `Error` and the previous data is
//!   cleared. Never panics or propagates.
//! - **Producer never resolves**: the in-flight count stays raised for that
//!   generation. There is no built-in timeout; the producer must enforce
//!   its own.
//! - **Executor shut down**: the spawn failure is logged at `warn` and the
//!   in-flight count is rolled back.
//! - **Resource dropped mid-flight**: the current generation is marked
//!   superseded and late results are ignored.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use tracing::{debug, trace, warn};

use super::computed::Computed;
use super::generation::Generation;
use super::observable::{Observable, Subscription};
use super::spawn::Spawner;
use crate::error::ProducerError;

type Producer<T, E> = Box<dyn Fn(Generation) -> LocalBoxFuture<'static, Result<T, E>>>;

// ── State ───────────────────────────────────────────────────────────────

/// Coarse status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Loading,
    Success,
    Error,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest committed outcome of a resource.
pub enum ResourceState<T, E> {
    /// Nothing committed yet. `data` is the initial value, if any.
    Loading { data: Option<Rc<T>> },
    Success { data: Rc<T> },
    Error { error: Rc<E> },
}

impl<T, E> Clone for ResourceState<T, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Loading { data } => Self::Loading { data: data.clone() },
            Self::Success { data } => Self::Success {
                data: Rc::clone(data),
            },
            Self::Error { error } => Self::Error {
                error: Rc::clone(error),
            },
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for ResourceState<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading { data } => f.debug_struct("Loading").field("data", data).finish(),
            Self::Success { data } => f.debug_struct("Success").field("data", data).finish(),
            Self::Error { error } => f.debug_struct("Error").field("error", error).finish(),
        }
    }
}

impl<T, E> ResourceState<T, E> {
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Loading { .. } => Status::Loading,
            Self::Success { .. } => Status::Success,
            Self::Error { .. } => Status::Error,
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&Rc<T>> {
        match self {
            Self::Loading { data } => data.as_ref(),
            Self::Success { data } => Some(data),
            Self::Error { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&Rc<E>> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}

// ── Resource ────────────────────────────────────────────────────────────

struct ResourceInner<T, E> {
    producer: Producer<T, E>,
    spawner: Box<dyn Spawner>,
    state: Observable<ResourceState<T, E>>,
    in_flight: Observable<usize>,
    revalidating: Computed<bool>,
    current: RefCell<Option<Generation>>,
    next_id: Cell<u64>,
    tracked: RefCell<Vec<Subscription>>,
}

impl<T, E> Drop for ResourceInner<T, E> {
    fn drop(&mut self) {
        if let Some(generation) = self.current.get_mut().take() {
            generation.supersede();
        }
    }
}

/// Observable state driven by an async producer.
///
/// Cloning a `Resource` creates a new handle to the **same** resource. The
/// producer and its in-flight tasks never keep the resource alive.
pub struct Resource<T, E = ProducerError> {
    inner: Rc<ResourceInner<T, E>>,
}

impl<T, E> Clone for Resource<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static, E: 'static> fmt::Debug for Resource<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("status", &self.status())
            .field("in_flight", &self.inner.in_flight.get())
            .finish_non_exhaustive()
    }
}

impl<T: 'static, E: 'static> Resource<T, E> {
    /// Mount a resource and invoke `producer` once.
    pub fn new<F, Fut>(spawner: impl Spawner + 'static, producer: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self::mount(spawner, Box::new(move |_| producer().boxed_local()), None)
    }

    /// Like [`new`](Self::new), with `initial` readable while loading.
    pub fn with_initial<F, Fut>(spawner: impl Spawner + 'static, producer: F, initial: T) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self::mount(
            spawner,
            Box::new(move |_| producer().boxed_local()),
            Some(initial),
        )
    }

    /// Mount a resource whose producer receives its [`Generation`], so it can
    /// stop early once superseded.
    pub fn with_generation<F, Fut>(
        spawner: impl Spawner + 'static,
        producer: F,
        initial: Option<T>,
    ) -> Self
    where
        F: Fn(Generation) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self::mount(
            spawner,
            Box::new(move |generation| producer(generation).boxed_local()),
            initial,
        )
    }

    /// Mount a resource that re-runs whenever `source` changes. The producer
    /// receives the source's value at invocation time.
    pub fn derived<D, F, Fut>(spawner: impl Spawner + 'static, source: &Observable<D>, f: F) -> Self
    where
        D: Clone + 'static,
        F: Fn(D) -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        let input = source.clone();
        let resource = Self::mount(
            spawner,
            Box::new(move |_| f(input.get()).boxed_local()),
            None,
        );
        resource.track(source);
        resource
    }

    fn mount(spawner: impl Spawner + 'static, producer: Producer<T, E>, initial: Option<T>) -> Self {
        let in_flight = Observable::new(0usize);
        let revalidating = Computed::from_observable(&in_flight, |n| *n > 0);
        let inner = Rc::new(ResourceInner {
            producer,
            spawner: Box::new(spawner),
            state: Observable::new(ResourceState::Loading {
                data: initial.map(Rc::new),
            }),
            in_flight,
            revalidating,
            current: RefCell::new(None),
            next_id: Cell::new(0),
            tracked: RefCell::new(Vec::new()),
        });
        trigger(&inner);
        Self { inner }
    }

    /// Invoke the producer again. The current state stays visible until the
    /// new result commits.
    pub fn revalidate(&self) {
        trigger(&self.inner);
    }

    /// Re-run the producer every time `dependency` changes, for as long as
    /// this resource lives.
    pub fn track<D: Clone + 'static>(&self, dependency: &Observable<D>) {
        let weak = Rc::downgrade(&self.inner);
        let sub = dependency.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                trigger(&inner);
            }
        });
        self.inner.tracked.borrow_mut().push(sub);
    }

    #[must_use]
    pub fn state(&self) -> ResourceState<T, E> {
        self.inner.state.get()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.inner.state.with(ResourceState::status)
    }

    /// Current data: the committed value, or the initial value while loading.
    #[must_use]
    pub fn data(&self) -> Option<Rc<T>> {
        self.inner.state.with(|s| s.data().cloned())
    }

    #[must_use]
    pub fn error(&self) -> Option<Rc<E>> {
        self.inner.state.with(|s| s.error().cloned())
    }

    /// Whether any invocation, current or stale, is still running.
    #[must_use]
    pub fn revalidating(&self) -> bool {
        self.inner.revalidating.get()
    }

    /// Derived `revalidating` flag, for wiring into other computed values.
    #[must_use]
    pub fn revalidating_signal(&self) -> Computed<bool> {
        self.inner.revalidating.clone()
    }

    /// Be told about every committed state.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&ResourceState<T, E>) + 'static) -> Subscription {
        self.inner.state.subscribe(callback)
    }

    /// Be told whenever the in-flight count changes.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe_in_flight(&self, callback: impl Fn(&usize) + 'static) -> Subscription {
        self.inner.in_flight.subscribe(callback)
    }
}

fn trigger<T: 'static, E: 'static>(inner: &Rc<ResourceInner<T, E>>) {
    let id = inner.next_id.get() + 1;
    inner.next_id.set(id);
    let generation = Generation::mint(id);
    let previous = inner.current.replace(Some(generation.clone()));
    if let Some(previous) = previous {
        previous.supersede();
    }

    inner.in_flight.update(|n| *n += 1);
    trace!(generation = id, "resource triggered");

    let future = (inner.producer)(generation.clone());
    let weak: Weak<ResourceInner<T, E>> = Rc::downgrade(inner);
    let task = async move {
        let result = future.await;
        if let Some(inner) = weak.upgrade() {
            settle(&inner, &generation, result);
        }
    }
    .boxed_local();

    if let Err(err) = inner.spawner.spawn_local(task) {
        warn!(generation = id, error = %err, "resource producer could not be spawned");
        inner.in_flight.update(|n| *n = n.saturating_sub(1));
    }
}

fn settle<T, E>(inner: &ResourceInner<T, E>, generation: &Generation, result: Result<T, E>)
where
    T: 'static,
    E: 'static,
{
    let is_current = inner
        .current
        .borrow()
        .as_ref()
        .is_some_and(|current| current.same(generation));

    if is_current {
        let next = match result {
            Ok(data) => {
                debug!(generation = generation.id(), "resource committed");
                ResourceState::Success {
                    data: Rc::new(data),
                }
            }
            Err(error) => {
                debug!(generation = generation.id(), "resource failed");
                ResourceState::Error {
                    error: Rc::new(error),
                }
            }
        };
        inner.state.replace(next);
    } else {
        trace!(generation = generation.id(), "stale result discarded");
    }

    inner.in_flight.update(|n| *n = n.saturating_sub(1));
}
