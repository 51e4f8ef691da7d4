//! Tracking for cache writes that outlive the request that started them.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::warn;

/// A `JoinSet` whose tasks keep running when it is dropped.
#[derive(Default)]
struct WriteSet(JoinSet<()>);

impl Drop for WriteSet {
    fn drop(&mut self) {
        self.0.detach_all();
    }
}

/// Background cache writes not yet known to have finished.
///
/// Finished tasks are reaped on every spawn so the set stays small under a
/// steady request load. Dropping the tracker detaches outstanding writes
/// instead of aborting them.
pub(crate) struct PendingWrites {
    tasks: Mutex<WriteSet>,
}

impl PendingWrites {
    pub(crate) fn new() -> Self {
        Self {
            tasks: Mutex::new(WriteSet::default()),
        }
    }

    /// Spawn `write` on the current tokio runtime.
    pub(crate) async fn spawn<F>(&self, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        while tasks.0.try_join_next().is_some() {}
        tasks.0.spawn(write);
    }

    /// Wait for every write spawned so far. Returns how many were awaited.
    ///
    /// If this future is cancelled, writes it had taken over are detached
    /// and still complete.
    pub(crate) async fn flush(&self) -> usize {
        let mut tasks = std::mem::take(&mut *self.tasks.lock().await);
        let mut flushed = 0;
        while let Some(joined) = tasks.0.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "background cache write panicked");
            }
            flushed += 1;
        }
        flushed
    }
}
