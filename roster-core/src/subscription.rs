// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-consumer subscription state machine.
//!
//! A [`Subscription`] owns the consumer's outstanding [`Demand`] and a FIFO
//! buffer of records the hub delivered but the consumer has not asked for
//! yet. Records leave the buffer only while demand is available, one unit of
//! demand per record.
//!
//! ## Delivery
//!
//! Only one thread at a time runs the delivery loop for a subscription (the
//! "drainer"). Anyone who changes the state while a drainer is active leaves
//! the work to it. This keeps delivery strictly FIFO, keeps callbacks from
//! overlapping, and lets callbacks re-enter `request`/`cancel` freely because
//! no lock is held while the subscriber runs.
//!
//! ## Termination
//!
//! `cancel()` and an upstream failure both flip `terminated` under the lock.
//! Whichever gets there first queues the single terminal signal; the other is
//! a no-op.

use crate::stream_hub::HubShared;
use crate::{Completion, Demand, Student, StudentSubscriber};
use parking_lot::Mutex;
use roster_error::RosterError;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};

/// Identifier of a subscription within its hub.
pub type SubscriptionId = u64;

struct SubscriptionState {
    demand: Demand,
    ready: VecDeque<Student>,
    terminated: bool,
    completion: Option<Completion>,
    draining: bool,
}

enum Step {
    Next(Student),
    Complete(Completion),
}

impl SubscriptionState {
    fn next_step(&mut self) -> Option<Step> {
        if let Some(completion) = self.completion.take() {
            return Some(Step::Complete(completion));
        }
        if self.terminated || self.demand.is_none() {
            return None;
        }

        let student = self.ready.pop_front()?;
        self.demand.consume_one();
        Some(Step::Next(student))
    }

    fn terminate(&mut self, completion: Completion) -> bool {
        if self.terminated {
            return false;
        }
        self.terminated = true;
        self.ready.clear();
        self.completion = Some(completion);
        true
    }
}

pub(crate) struct SubscriptionInner {
    id: SubscriptionId,
    state: Mutex<SubscriptionState>,
    subscriber: Arc<dyn StudentSubscriber>,
    hub: Weak<HubShared>,
}

impl SubscriptionInner {
    pub(crate) fn new(
        id: SubscriptionId,
        seed: Vec<Student>,
        subscriber: Arc<dyn StudentSubscriber>,
        hub: Weak<HubShared>,
    ) -> Self {
        Self {
            id,
            state: Mutex::new(SubscriptionState {
                demand: Demand::NONE,
                ready: seed.into(),
                terminated: false,
                completion: None,
                draining: false,
            }),
            subscriber,
            hub,
        }
    }

    pub(crate) const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Appends records without delivering them. Returns `false` once terminated.
    pub(crate) fn enqueue<I>(&self, students: I) -> bool
    where
        I: IntoIterator<Item = Student>,
    {
        let mut state = self.state.lock();
        if state.terminated {
            return false;
        }
        state.ready.extend(students);
        true
    }

    /// Queues the failure as the terminal signal. Returns `false` if already terminated.
    pub(crate) fn enqueue_failure(&self, error: RosterError) -> bool {
        self.state.lock().terminate(Completion::Failed(error))
    }

    fn request(&self, demand: Demand) {
        {
            let mut state = self.state.lock();
            if state.terminated {
                return;
            }
            if demand.is_none() {
                warn!("subscription {}: ignoring request for zero records", self.id);
                return;
            }
            state.demand += demand;
        }
        self.drain();
    }

    fn cancel(&self) {
        if !self.state.lock().terminate(Completion::Finished) {
            return;
        }
        debug!("subscription {}: cancelled", self.id);

        // The handle lock is released before the hub lock is taken.
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
        self.drain();
    }

    /// Runs the delivery loop unless another thread already does.
    pub(crate) fn drain(&self) {
        {
            let mut state = self.state.lock();
            if state.draining {
                return;
            }
            state.draining = true;
        }

        loop {
            let step = {
                let mut state = self.state.lock();
                let step = state.next_step();
                if step.is_none() {
                    state.draining = false;
                }
                step
            };

            match step {
                Some(Step::Next(student)) => self.subscriber.on_next(student),
                Some(Step::Complete(completion)) => self.subscriber.on_complete(completion),
                None => return,
            }
        }
    }
}

/// Consumer handle for one registration with a [`StreamHub`](crate::StreamHub).
///
/// Cloning the handle does not create a new subscription; all clones control
/// the same state.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    pub(crate) const fn from_inner(inner: Arc<SubscriptionInner>) -> Self {
        Self { inner }
    }

    /// Grants additional demand and delivers whatever is buffered up to it.
    ///
    /// Bounded grants accumulate; an unbounded grant stays in effect. A
    /// zero grant and any request after termination are ignored.
    pub fn request(&self, demand: impl Into<Demand>) {
        self.inner.request(demand.into());
    }

    /// Ends the subscription with [`Completion::Finished`] and deregisters it.
    ///
    /// Only the first call, and only if no failure arrived earlier, produces
    /// a terminal signal.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.state.lock().terminated
    }

    /// Demand granted but not yet consumed.
    #[must_use]
    pub fn pending_demand(&self) -> Demand {
        self.inner.state.lock().demand
    }

    /// Records waiting for demand.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.inner.state.lock().ready.len()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Subscription")
            .field("id", &self.inner.id)
            .field("demand", &state.demand)
            .field("buffered", &state.ready.len())
            .field("terminated", &state.terminated)
            .finish()
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Subscription {}
