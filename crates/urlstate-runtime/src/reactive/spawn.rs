#![forbid(unsafe_code)]

//! Executor seam for resource producers.

use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, SpawnError};

/// Runs `!Send` futures to completion on the current thread.
///
/// Implemented for [`LocalSpawner`]; a browser host would implement it on
/// top of its microtask queue.
pub trait Spawner {
    /// Schedule `task`. Fails when the executor has shut down.
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), SpawnError>;
}

impl Spawner for LocalSpawner {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), SpawnError> {
        self.spawn_local_obj(task.into())
    }
}

impl<S: Spawner + ?Sized> Spawner for Rc<S> {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), SpawnError> {
        (**self).spawn_local(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use futures::executor::LocalPool;
    use std::cell::Cell;

    #[test]
    fn local_spawner_runs_tasks() {
        let mut pool = LocalPool::new();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        Spawner::spawn_local(&pool.spawner(), async move { flag.set(true) }.boxed_local())
            .unwrap();
        pool.run();
        assert!(ran.get());
    }

    #[test]
    fn shut_down_pool_rejects() {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        drop(pool);
        let result = Spawner::spawn_local(&spawner, async {}.boxed_local());
        assert!(result.is_err_and(|e| e.is_shutdown()));
    }
}
