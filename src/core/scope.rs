//! Task scope owned by a state holder.
//!
//! Jobs launched on a scope run one after another on a dedicated worker
//! task, in the order they were launched. That worker is the only place a
//! holder mutates its observable state. Persistence calls leave the worker
//! through [`on_io`] and are awaited there.
//!
//! Disposing the scope cancels its token, which stops the worker and aborts
//! every auxiliary task. A blocking call that already started keeps running
//! to completion; jobs must check their [`ScopeGuard`] after each await and
//! drop the result once the scope is cancelled.

use crate::errors::{PersistenceError, PersistenceResult};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Clone, Debug)]
pub struct ScopeGuard {
    token: CancellationToken,
}

impl ScopeGuard {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the owning scope is disposed.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

/// Cloneable handle that queues jobs on a scope's worker, for tasks that
/// outlive a single call (e.g. change forwarders).
#[derive(Clone)]
pub struct Launcher {
    name: &'static str,
    jobs: mpsc::UnboundedSender<Job>,
    guard: ScopeGuard,
}

impl Launcher {
    /// Queue a job behind every job launched before it.
    pub fn launch<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.guard.is_cancelled() {
            tracing::debug!(scope = self.name, "job launched after dispose, ignored");
            return;
        }
        if self.jobs.send(Box::pin(job)).is_err() {
            tracing::warn!(scope = self.name, "worker is gone, job dropped");
        }
    }
}

pub struct TaskScope {
    name: &'static str,
    launcher: Launcher,
    worker: JoinHandle<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    guard: ScopeGuard,
}

impl TaskScope {
    /// Must be called from within a tokio runtime.
    pub fn new(name: &'static str) -> Self {
        let (jobs, mut rx) = mpsc::unbounded_channel::<Job>();
        let token = CancellationToken::new();
        let stop = token.clone();
        let worker = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    next = rx.recv() => match next {
                        Some(job) => tokio::select! {
                            _ = stop.cancelled() => break,
                            _ = job => {}
                        },
                        None => break,
                    },
                }
            }
            tracing::trace!(scope = name, "worker finished");
        });

        let guard = ScopeGuard { token };

        Self {
            name,
            launcher: Launcher {
                name,
                jobs,
                guard: guard.clone(),
            },
            worker,
            tasks: Mutex::new(Vec::new()),
            guard,
        }
    }

    pub fn guard(&self) -> ScopeGuard {
        self.guard.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.guard.is_cancelled()
    }

    pub fn launcher(&self) -> Launcher {
        self.launcher.clone()
    }

    /// Queue a job behind every job launched before it.
    pub fn launch<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.launcher.launch(job);
    }

    /// Run a long-lived task next to the worker; it is aborted on dispose.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_disposed() {
            return;
        }
        let handle = tokio::spawn(task);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Wait until every job launched so far has finished.
    /// Returns immediately on a disposed scope.
    pub async fn settled(&self) {
        let (tx, rx) = oneshot::channel();
        self.launch(async move {
            let _ = tx.send(());
        });
        let _ = rx.await;
    }

    pub fn dispose(&self) {
        if self.guard.is_cancelled() {
            return;
        }
        self.guard.token.cancel();
        self.worker.abort();
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
        tracing::debug!(scope = self.name, "scope disposed");
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Run a synchronous persistence call on the blocking pool.
pub async fn on_io<T, F>(operation: &'static str, call: F) -> PersistenceResult<T>
where
    F: FnOnce() -> PersistenceResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(result) => result,
        Err(e) => Err(PersistenceError::new(operation, e)),
    }
}
