// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use roster_core::{Completion, Demand, RosterError, Sex, StreamHub, Student};
use roster_test_utils::RecordingSubscriber;
use std::time::Duration;

const PRODUCERS: usize = 4;
const PER_PRODUCER: usize = 250;

fn student(producer: usize, index: usize) -> Student {
    Student::new(format!("P{producer}-{index}"), Sex::Female, vec![index as f32])
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_broadcasts_keep_every_subscriber_in_hub_order() -> anyhow::Result<()> {
    // Arrange
    let hub = StreamHub::new();
    let recorders: Vec<RecordingSubscriber> = (0..3).map(|_| RecordingSubscriber::new()).collect();
    let subscriptions: Vec<_> = recorders
        .iter()
        .map(|recorder| hub.subscribe(recorder.clone()))
        .collect();

    // Act
    let mut tasks = Vec::new();
    for producer in 0..PRODUCERS {
        let hub = hub.clone();
        tasks.push(tokio::spawn(async move {
            for index in 0..PER_PRODUCER {
                hub.broadcast(student(producer, index));
                if index % 50 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }
    for subscription in subscriptions.clone() {
        tasks.push(tokio::spawn(async move {
            for _ in 0..PRODUCERS * PER_PRODUCER / 10 {
                subscription.request(Demand::max(10));
                tokio::task::yield_now().await;
            }
        }));
    }
    for task in tasks {
        task.await?;
    }

    // Assert
    let total = PRODUCERS * PER_PRODUCER;
    let known = hub.known_students();
    assert_eq!(known.len(), total);
    for recorder in &recorders {
        assert!(recorder.wait_for_students(total, Duration::from_secs(5)).await);
        assert_eq!(recorder.students(), known);
    }
    for subscription in &subscriptions {
        assert_eq!(subscription.pending_demand(), Demand::NONE);
        assert_eq!(subscription.buffered(), 0);
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_cancel_and_error_signal_exactly_once() -> anyhow::Result<()> {
    for round in 0..50 {
        // Arrange
        let hub = StreamHub::new();
        let recorder = RecordingSubscriber::new();
        let subscription = hub.subscribe(recorder.clone());
        subscription.request(Demand::Unbounded);

        // Act
        let canceller = {
            let subscription = subscription.clone();
            tokio::spawn(async move { subscription.cancel() })
        };
        let failer = {
            let hub = hub.clone();
            tokio::spawn(async move { hub.broadcast_error(RosterError::missing_data()) })
        };
        let producer = {
            let hub = hub.clone();
            tokio::spawn(async move {
                for index in 0..20 {
                    hub.broadcast(student(round, index));
                }
            })
        };
        canceller.await?;
        failer.await?;
        producer.await?;

        // Assert
        let completions = recorder.completions();
        assert_eq!(completions.len(), 1, "round {round}: {completions:?}");
        assert!(matches!(
            completions[0],
            Completion::Finished | Completion::Failed(_)
        ));
        assert!(matches!(
            recorder.events().last(),
            Some(roster_test_utils::Event::Complete(_))
        ));
        assert_eq!(hub.subscriber_count(), 0);
    }

    Ok(())
}
