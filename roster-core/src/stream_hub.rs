// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multicast registry for student records.
//!
//! A [`StreamHub`] remembers every record it has broadcast and fans each new
//! record or error out to all registered subscriptions.
//!
//! ## Characteristics
//!
//! - **Replaying**: A new subscription is seeded with every record seen so far.
//! - **Demand-driven**: Nothing reaches a subscriber before it requests it; the
//!   rest waits in that subscription's buffer.
//! - **Thread-safe**: Cheap to clone; all clones share the same registry.
//! - **Error**: An error terminates every subscription registered at the time.
//!   The hub itself stays usable.
//!
//! ## Example
//!
//! ```
//! use roster_core::{Sex, StreamHub, Student};
//! use std::sync::{Arc, Mutex};
//!
//! let hub = StreamHub::new();
//! hub.broadcast(Student::new("Ana", Sex::Male, vec![7.0]));
//!
//! let received = Arc::new(Mutex::new(Vec::new()));
//! let sink = received.clone();
//! let _subscription = hub.sink(move |s| sink.lock().unwrap().push(s), |_| {});
//!
//! hub.broadcast(Student::new("Bia", Sex::Female, vec![8.5]));
//!
//! let names: Vec<_> = received.lock().unwrap().iter().map(|s| s.name().to_string()).collect();
//! assert_eq!(names, ["Ana", "Bia"]);
//! ```

use crate::subscription::{SubscriptionId, SubscriptionInner};
use crate::{Completion, Demand, HubStream, SinkSubscriber, Student, StudentSubscriber, Subscription};
use parking_lot::Mutex;
use roster_error::RosterError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct HubState {
    known: Vec<Student>,
    subscriptions: Vec<Arc<SubscriptionInner>>,
}

pub(crate) struct HubShared {
    state: Mutex<HubState>,
    next_id: AtomicU64,
}

impl HubShared {
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscriptions.len();
        state.subscriptions.retain(|s| s.id() != id);
        let removed = state.subscriptions.len() != before;
        if removed {
            debug!(
                "hub: removed subscription {id}, {} remaining",
                state.subscriptions.len()
            );
        }
        removed
    }
}

/// Replaying, demand-driven multicast hub.
///
/// See the [module documentation](self) for details.
#[derive(Clone)]
pub struct StreamHub {
    shared: Arc<HubShared>,
}

impl StreamHub {
    /// Creates an empty hub with no known records and no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(HubShared {
                state: Mutex::new(HubState {
                    known: Vec::new(),
                    subscriptions: Vec::new(),
                }),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers a subscriber.
    ///
    /// The subscription starts with every known record buffered and no
    /// demand; call [`Subscription::request`] to start receiving.
    pub fn subscribe<S>(&self, subscriber: S) -> Subscription
    where
        S: StudentSubscriber,
    {
        self.subscribe_shared(Arc::new(subscriber))
    }

    /// Registers a subscriber that is already behind an `Arc`.
    pub fn subscribe_shared(&self, subscriber: Arc<dyn StudentSubscriber>) -> Subscription {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let mut state = self.shared.state.lock();

        let inner = Arc::new(SubscriptionInner::new(
            id,
            state.known.clone(),
            subscriber,
            Arc::downgrade(&self.shared),
        ));
        state.subscriptions.push(inner.clone());
        debug!(
            "hub: subscription {id} registered with {} replayed records",
            state.known.len()
        );

        Subscription::from_inner(inner)
    }

    /// Registers closures and immediately requests unbounded demand.
    pub fn sink<V, C>(&self, on_value: V, on_completion: C) -> Subscription
    where
        V: Fn(Student) + Send + Sync + 'static,
        C: Fn(Completion) + Send + Sync + 'static,
    {
        let subscription = self.subscribe(SinkSubscriber::new(on_value, on_completion));
        subscription.request(Demand::Unbounded);
        subscription
    }

    /// Subscribes and exposes the records as a pull-based `Stream`.
    ///
    /// See [`HubStream`].
    #[must_use]
    pub fn stream(&self) -> HubStream {
        HubStream::subscribe(self)
    }

    /// Removes a subscription without signalling it.
    ///
    /// Returns `false` if it was not registered. Prefer
    /// [`Subscription::cancel`], which also completes the consumer.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.shared.remove(subscription.id())
    }

    /// Records a new student and delivers it to every subscription.
    pub fn broadcast(&self, student: Student) {
        self.broadcast_all(vec![student]);
    }

    /// Records a batch of students and delivers it, in order, to every subscription.
    pub fn broadcast_all(&self, students: Vec<Student>) {
        if students.is_empty() {
            return;
        }

        let targets: Vec<Arc<SubscriptionInner>> = {
            let mut state = self.shared.state.lock();
            state.known.extend(students.iter().cloned());
            state
                .subscriptions
                .iter()
                .filter(|s| s.enqueue(students.iter().cloned()))
                .cloned()
                .collect()
        };
        debug!(
            "hub: {} records fanned out to {} subscriptions",
            students.len(),
            targets.len()
        );

        for target in targets {
            target.drain();
        }
    }

    /// Terminates every current subscription with `error` and deregisters them.
    pub fn broadcast_error(&self, error: RosterError) {
        let targets: Vec<Arc<SubscriptionInner>> = {
            let mut state = self.shared.state.lock();
            std::mem::take(&mut state.subscriptions)
                .into_iter()
                .filter(|s| s.enqueue_failure(error.clone()))
                .collect()
        };
        debug!(
            "hub: error ({}) sent to {} subscriptions",
            error.kind(),
            targets.len()
        );

        for target in targets {
            target.drain();
        }
    }

    /// Number of registered subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.state.lock().subscriptions.len()
    }

    /// Number of records seen so far.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.shared.state.lock().known.len()
    }

    /// Snapshot of every record seen so far, in arrival order.
    #[must_use]
    pub fn known_students(&self) -> Vec<Student> {
        self.shared.state.lock().known.clone()
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new()
    }
}
