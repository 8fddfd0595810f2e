//! List adapter: projects nights off the render context and publishes the
//! result, with its diff, on the render context.
//!
//! Submitting is the compute phase and never blocks the caller. Publishing is
//! a separate call made from whatever context owns the renderer; it only ever
//! shows the newest finished projection, so a late, older result is dropped.

use crate::core::projection::{DisplayItem, ListUpdate, SleepNightDiffCallback, diff, project};
use crate::models::SleepNight;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The rendering collaborator. Always called from the publishing context.
pub trait ListRenderer {
    fn submit(&self, items: &[DisplayItem], updates: &[ListUpdate]);
}

struct Computed {
    generation: u64,
    items: Vec<DisplayItem>,
}

#[derive(Default)]
struct Displayed {
    generation: u64,
    items: Vec<DisplayItem>,
}

pub struct NightListAdapter {
    generation: AtomicU64,
    computed_tx: mpsc::UnboundedSender<Computed>,
    computed_rx: Mutex<mpsc::UnboundedReceiver<Computed>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
    displayed: Mutex<Displayed>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for NightListAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl NightListAdapter {
    pub fn new() -> Self {
        let (computed_tx, computed_rx) = mpsc::unbounded_channel();
        Self {
            generation: AtomicU64::new(0),
            computed_tx,
            computed_rx: Mutex::new(computed_rx),
            pending: Mutex::new(Vec::new()),
            displayed: Mutex::new(Displayed::default()),
        }
    }

    /// Compute phase: project `nights` on the blocking pool.
    /// Must be called from within a tokio runtime.
    pub fn add_header_and_submit_list(&self, nights: Option<Vec<SleepNight>>) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let tx = self.computed_tx.clone();

        let handle = tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || project(nights.as_deref())).await {
                Ok(items) => {
                    let _ = tx.send(Computed { generation, items });
                }
                Err(e) => tracing::warn!(error = %e, generation, "projection failed"),
            }
        });

        let mut pending = lock(&self.pending);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for every projection submitted so far.
    pub async fn settle(&self) {
        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *lock(&self.pending));
        for handle in handles {
            let _ = handle.await;
        }
    }

    /// Publish phase: hand the newest finished projection to `renderer`.
    /// Returns false when there was nothing newer than what is displayed.
    pub fn publish(&self, renderer: &dyn ListRenderer) -> bool {
        let mut newest: Option<Computed> = None;
        {
            let mut rx = lock(&self.computed_rx);
            while let Ok(computed) = rx.try_recv() {
                if newest
                    .as_ref()
                    .is_none_or(|n| computed.generation > n.generation)
                {
                    newest = Some(computed);
                }
            }
        }

        let Some(computed) = newest else {
            return false;
        };

        let (items, updates) = {
            let mut displayed = lock(&self.displayed);
            if computed.generation <= displayed.generation {
                tracing::trace!(generation = computed.generation, "stale projection dropped");
                return false;
            }
            let updates = diff(&displayed.items, &computed.items, &SleepNightDiffCallback);
            displayed.generation = computed.generation;
            displayed.items = computed.items;
            (displayed.items.clone(), updates)
        };

        renderer.submit(&items, &updates);
        true
    }

    /// What the renderer currently shows.
    pub fn current_list(&self) -> Vec<DisplayItem> {
        lock(&self.displayed).items.clone()
    }

    pub fn item_count(&self) -> usize {
        lock(&self.displayed).items.len()
    }

    pub fn get_item(&self, position: usize) -> Option<DisplayItem> {
        lock(&self.displayed).items.get(position).cloned()
    }
}

impl Drop for NightListAdapter {
    fn drop(&mut self) {
        for handle in lock(&self.pending).drain(..) {
            handle.abort();
        }
    }
}
