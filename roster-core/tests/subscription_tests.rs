// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use roster_core::{
    Completion, Demand, RosterError, StreamHub, Student, StudentSubscriber, Subscription,
};
use roster_test_utils::fixtures::{
    numbered_students, student_ana, student_bia, student_carla, student_davi,
};
use roster_test_utils::{Event, RecordingSubscriber};
use std::sync::Arc;

#[test]
fn test_nothing_is_delivered_without_demand() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());

    // Act
    hub.broadcast(student_ana());
    hub.broadcast(student_bia());

    // Assert
    assert!(recorder.events().is_empty());
    assert_eq!(subscription.buffered(), 2);
    assert_eq!(subscription.pending_demand(), Demand::NONE);
}

#[test]
fn test_request_delivers_at_most_the_granted_amount() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());
    hub.broadcast_all(numbered_students(5));

    // Act
    subscription.request(Demand::max(2));

    // Assert
    assert_eq!(recorder.names(), ["S0", "S1"]);
    assert_eq!(subscription.buffered(), 3);
    assert_eq!(subscription.pending_demand(), Demand::NONE);

    // Act
    subscription.request(Demand::max(2));

    // Assert
    assert_eq!(recorder.names(), ["S0", "S1", "S2", "S3"]);
    assert_eq!(subscription.buffered(), 1);
}

#[test]
fn test_unspent_demand_is_kept_for_later_records() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());

    // Act
    subscription.request(Demand::max(3));
    hub.broadcast(student_ana());

    // Assert
    assert_eq!(recorder.students(), [student_ana()]);
    assert_eq!(subscription.pending_demand(), Demand::max(2));

    // Act
    hub.broadcast_all(vec![student_bia(), student_carla(), student_davi()]);

    // Assert
    assert_eq!(recorder.names(), ["Ana", "Bia", "Carla"]);
    assert_eq!(subscription.pending_demand(), Demand::NONE);
    assert_eq!(subscription.buffered(), 1);
}

#[test]
fn test_grants_accumulate_instead_of_replacing() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());

    // Act
    subscription.request(Demand::max(1));
    subscription.request(Demand::max(1));
    hub.broadcast_all(numbered_students(3));

    // Assert
    assert_eq!(recorder.names(), ["S0", "S1"]);
}

#[test]
fn test_unbounded_demand_delivers_everything() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());

    // Act
    subscription.request(Demand::Unbounded);
    hub.broadcast_all(numbered_students(100));

    // Assert
    assert_eq!(recorder.students(), numbered_students(100));
    assert_eq!(subscription.buffered(), 0);
    assert!(subscription.pending_demand().is_unbounded());
}

#[test]
fn test_zero_demand_is_ignored() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());
    hub.broadcast(student_ana());

    // Act
    subscription.request(Demand::max(0));

    // Assert
    assert!(recorder.events().is_empty());
    assert_eq!(subscription.buffered(), 1);
}

#[test]
fn test_delivery_is_fifo_regardless_of_demand_schedule() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());
    let expected = numbered_students(20);

    // Act
    for (i, student) in expected.iter().enumerate() {
        hub.broadcast(student.clone());
        if i % 3 == 0 {
            subscription.request(Demand::max(2));
        }
    }
    subscription.request(Demand::Unbounded);

    // Assert
    assert_eq!(recorder.students(), expected);
}

#[test]
fn test_cancel_signals_finished_once_and_deregisters() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());
    assert_eq!(hub.subscriber_count(), 1);

    // Act
    subscription.cancel();
    subscription.cancel();

    // Assert
    assert_eq!(recorder.completions(), [Completion::Finished]);
    assert!(subscription.is_terminated());
    assert_eq!(hub.subscriber_count(), 0);
}

#[test]
fn test_cancel_discards_buffer_and_ignores_later_operations() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());
    hub.broadcast_all(numbered_students(3));

    // Act
    subscription.cancel();
    subscription.request(Demand::Unbounded);
    hub.broadcast(student_ana());

    // Assert
    assert_eq!(recorder.events(), [Event::Complete(Completion::Finished)]);
    assert_eq!(subscription.buffered(), 0);
}

#[test]
fn test_cancel_from_clone_affects_all_clones() {
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());
    let clone = subscription.clone();

    clone.cancel();

    assert!(subscription.is_terminated());
    assert_eq!(subscription, clone);
    assert_eq!(recorder.completions().len(), 1);
}

#[test]
fn test_error_is_delivered_without_demand() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let _subscription = hub.subscribe(recorder.clone());
    hub.broadcast(student_ana());

    // Act
    hub.broadcast_error(RosterError::missing_data());

    // Assert
    assert_eq!(
        recorder.events(),
        [Event::Complete(Completion::Failed(RosterError::missing_data()))]
    );
}

#[test]
fn test_cancel_after_error_produces_no_second_signal() {
    // Arrange
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());
    subscription.request(Demand::Unbounded);

    // Act
    hub.broadcast_error(RosterError::bad_url("x/novos"));
    subscription.cancel();

    // Assert
    let completions = recorder.completions();
    assert_eq!(completions.len(), 1);
    assert!(completions[0].is_failure());
}

#[test]
fn test_error_after_cancel_produces_no_second_signal() {
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    let subscription = hub.subscribe(recorder.clone());

    subscription.cancel();
    hub.broadcast_error(RosterError::missing_data());

    assert_eq!(recorder.completions(), [Completion::Finished]);
}

/// Re-enters the subscription from inside its own callbacks.
struct OneAtATime {
    subscription: Mutex<Option<Subscription>>,
    received: Mutex<Vec<Student>>,
    cancel_after: usize,
    completions: Mutex<Vec<Completion>>,
}

impl StudentSubscriber for OneAtATime {
    fn on_next(&self, student: Student) {
        let received = {
            let mut received = self.received.lock();
            received.push(student);
            received.len()
        };
        let subscription = self.subscription.lock().clone();
        if let Some(subscription) = subscription {
            if received == self.cancel_after {
                subscription.cancel();
            } else {
                subscription.request(Demand::max(1));
            }
        }
    }

    fn on_complete(&self, completion: Completion) {
        self.completions.lock().push(completion);
    }
}

#[test]
fn test_callbacks_may_request_and_cancel_reentrantly() {
    // Arrange
    let hub = StreamHub::new();
    hub.broadcast_all(numbered_students(10));
    let consumer = Arc::new(OneAtATime {
        subscription: Mutex::new(None),
        received: Mutex::new(Vec::new()),
        cancel_after: 4,
        completions: Mutex::new(Vec::new()),
    });
    let subscription = hub.subscribe_shared(consumer.clone());
    *consumer.subscription.lock() = Some(subscription.clone());

    // Act
    subscription.request(Demand::max(1));

    // Assert
    let names: Vec<String> = consumer
        .received
        .lock()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(names, ["S0", "S1", "S2", "S3"]);
    assert_eq!(*consumer.completions.lock(), [Completion::Finished]);
    assert_eq!(hub.subscriber_count(), 0);
}
