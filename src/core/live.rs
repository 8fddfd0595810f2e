//! Observable values.
//!
//! A `LiveValue` holds the latest value and a list of observers. New
//! observers receive the current value immediately; every `set` notifies all
//! observers. Observers are invoked outside the internal lock, so they may
//! freely read or write the value they are observing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    next_id: u64,
    observers: Vec<(u64, Observer<T>)>,
    // keeps the sources of a derived value subscribed
    sources: Vec<Subscription>,
}

pub struct LiveValue<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for LiveValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone + Send + Sync + 'static> LiveValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                next_id: 0,
                observers: Vec::new(),
                sources: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        lock(&self.inner).value.clone()
    }

    /// Read without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.inner).value)
    }

    pub fn set(&self, value: T) {
        Self::set_inner(&self.inner, value);
    }

    fn set_inner(inner: &Mutex<Inner<T>>, value: T) {
        let observers: Vec<Observer<T>> = {
            let mut guard = lock(inner);
            guard.value = value.clone();
            guard.observers.iter().map(|(_, o)| Arc::clone(o)).collect()
        };
        for observer in observers {
            observer(&value);
        }
    }

    /// Mutate in place under the lock. Observers are notified only when `f`
    /// returns true.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let (value, observers) = {
            let mut guard = lock(&self.inner);
            if !f(&mut guard.value) {
                return false;
            }
            let observers: Vec<Observer<T>> =
                guard.observers.iter().map(|(_, o)| Arc::clone(o)).collect();
            (guard.value.clone(), observers)
        };
        for observer in observers {
            observer(&value);
        }
        true
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.inner).observers.len()
    }

    /// Register an observer. It is called right away with the current value,
    /// then after every change, until the returned subscription is dropped.
    pub fn observe(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let observer: Observer<T> = Arc::new(f);
        let (id, current) = {
            let mut guard = lock(&self.inner);
            let id = guard.next_id;
            guard.next_id += 1;
            guard.observers.push((id, Arc::clone(&observer)));
            (id, guard.value.clone())
        };
        observer(&current);

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).observers.retain(|(oid, _)| *oid != id);
            }
        })
    }

    /// Like [`observe`](Self::observe), but every call reads the value as it
    /// is when the observer runs. An earlier observer that changed the value
    /// during the same notification is seen by the later ones.
    pub fn observe_latest(&self, f: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let source = Arc::downgrade(&self.inner);
        self.observe(move |_| {
            if let Some(inner) = source.upgrade() {
                let current = lock(&inner).value.clone();
                f(&current);
            }
        })
    }

    /// A value recomputed from this one on every change.
    pub fn map<U>(&self, f: impl Fn(&T) -> U + Send + Sync + 'static) -> LiveValue<U>
    where
        U: Clone + Send + Sync + 'static,
    {
        let derived = LiveValue::new(self.with(&f));
        let target = Arc::downgrade(&derived.inner);
        let subscription = self.observe(move |value| {
            if let Some(inner) = target.upgrade() {
                LiveValue::set_inner(&inner, f(value));
            }
        });
        lock(&derived.inner).sources.push(subscription);
        derived
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> LiveValue<T> {
    /// Set and notify only when the value actually changes.
    /// Returns whether observers were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        if lock(&self.inner).value == value {
            return false;
        }
        self.set(value);
        true
    }
}

/// Keeps an observer registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
