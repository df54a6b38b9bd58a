// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use roster_core::{Completion, Student, StudentSubscriber};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

/// A callback observed by a [`RecordingSubscriber`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Next(Student),
    Complete(Completion),
}

/// Subscriber that logs every callback and lets tests await them.
///
/// Clones share the same log, so one clone can be registered with the hub
/// while the test keeps another.
#[derive(Clone)]
pub struct RecordingSubscriber {
    events: Arc<Mutex<Vec<Event>>>,
    count: Arc<watch::Sender<usize>>,
}

impl RecordingSubscriber {
    #[must_use]
    pub fn new() -> Self {
        let (count, _) = watch::channel(0);
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            count: Arc::new(count),
        }
    }

    fn record(&self, event: Event) {
        let len = {
            let mut events = self.events.lock();
            events.push(event);
            events.len()
        };
        self.count.send_replace(len);
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Delivered records, in delivery order.
    #[must_use]
    pub fn students(&self) -> Vec<Student> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Next(student) => Some(student.clone()),
                Event::Complete(_) => None,
            })
            .collect()
    }

    /// Names of the delivered records, in delivery order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.students()
            .iter()
            .map(|student| student.name().to_string())
            .collect()
    }

    #[must_use]
    pub fn completions(&self) -> Vec<Completion> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::Complete(completion) => Some(completion.clone()),
                Event::Next(_) => None,
            })
            .collect()
    }

    /// Waits until at least `count` callbacks were recorded.
    ///
    /// Returns `false` if `limit` elapsed first.
    pub async fn wait_for_events(&self, count: usize, limit: Duration) -> bool {
        let mut receiver = self.count.subscribe();
        timeout(limit, receiver.wait_for(|len| *len >= count))
            .await
            .is_ok_and(|changed| changed.is_ok())
    }

    /// Waits until at least `count` records were delivered.
    ///
    /// Returns `false` if `limit` elapsed first.
    pub async fn wait_for_students(&self, count: usize, limit: Duration) -> bool {
        let mut receiver = self.count.subscribe();
        let events = self.events.clone();
        let delivered = move || {
            events
                .lock()
                .iter()
                .filter(|event| matches!(event, Event::Next(_)))
                .count()
        };
        timeout(limit, receiver.wait_for(|_| delivered() >= count))
            .await
            .is_ok_and(|changed| changed.is_ok())
    }

    /// Waits for the terminal signal.
    pub async fn wait_for_completion(&self, limit: Duration) -> Option<Completion> {
        let mut receiver = self.count.subscribe();
        let events = self.events.clone();
        let completed = move || {
            events
                .lock()
                .iter()
                .any(|event| matches!(event, Event::Complete(_)))
        };
        let _ = timeout(limit, receiver.wait_for(|_| completed())).await;
        self.completions().into_iter().next()
    }
}

impl Default for RecordingSubscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentSubscriber for RecordingSubscriber {
    fn on_next(&self, student: Student) {
        self.record(Event::Next(student));
    }

    fn on_complete(&self, completion: Completion) {
        self.record(Event::Complete(completion));
    }
}
