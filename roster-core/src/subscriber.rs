// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Consumer side of the hub protocol.
//!
//! A consumer implements [`StudentSubscriber`] and registers it with
//! [`StreamHub::subscribe`](crate::StreamHub::subscribe). Records arrive
//! through `on_next` only after demand has been granted on the returned
//! [`Subscription`](crate::Subscription); the terminal signal arrives exactly
//! once through `on_complete`.

use crate::Student;
use roster_error::RosterError;

/// How a subscription ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The consumer cancelled.
    Finished,
    /// A fetch path failed upstream.
    Failed(RosterError),
}

impl Completion {
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The error carried by a failed completion.
    #[must_use]
    pub fn error(&self) -> Option<&RosterError> {
        match self {
            Self::Finished => None,
            Self::Failed(error) => Some(error),
        }
    }
}

/// Receiver of records and of the terminal signal.
///
/// Callbacks for one subscription never overlap and never run while the hub
/// or the subscription holds its lock, so implementations may call
/// [`Subscription::request`](crate::Subscription::request) or
/// [`Subscription::cancel`](crate::Subscription::cancel) from inside them.
pub trait StudentSubscriber: Send + Sync + 'static {
    /// Called once per delivered record, never more often than demand allows.
    fn on_next(&self, student: Student);

    /// Called exactly once when the subscription ends.
    fn on_complete(&self, completion: Completion);
}

/// Closure-backed subscriber used by [`StreamHub::sink`](crate::StreamHub::sink).
pub struct SinkSubscriber<V, C> {
    on_value: V,
    on_completion: C,
}

impl<V, C> SinkSubscriber<V, C>
where
    V: Fn(Student) + Send + Sync + 'static,
    C: Fn(Completion) + Send + Sync + 'static,
{
    pub const fn new(on_value: V, on_completion: C) -> Self {
        Self {
            on_value,
            on_completion,
        }
    }
}

impl<V, C> StudentSubscriber for SinkSubscriber<V, C>
where
    V: Fn(Student) + Send + Sync + 'static,
    C: Fn(Completion) + Send + Sync + 'static,
{
    fn on_next(&self, student: Student) {
        (self.on_value)(student);
    }

    fn on_complete(&self, completion: Completion) {
        (self.on_completion)(completion);
    }
}
