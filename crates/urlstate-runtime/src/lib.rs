#![forbid(unsafe_code)]

//! Runtime: single-threaded reactive values and async resources.
//!
//! - [`Observable`], [`Subscription`], [`Computed`]: explicit change
//!   tracking. Dependencies are registered by subscribing, never inferred.
//! - [`Resource`]: turns an async producer into observable state with
//!   stale-while-revalidate semantics. Results are committed by generation
//!   identity, so a slow, superseded invocation can never overwrite a newer
//!   one.
//!
//! Everything here is `!Send`. Producers run on a [`Spawner`], which is
//! implemented for [`futures::executor::LocalSpawner`].

pub mod error;
pub mod reactive;

pub use error::ProducerError;
pub use reactive::{
    Computed, Generation, Observable, Resource, ResourceState, Spawner, Status, Subscription,
};
