// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use roster::prelude::*;
use roster::FetchOutcome;
use roster_test_utils::fixtures::{student_ana, student_bia, student_carla, student_davi};
use roster_test_utils::{
    assert_no_element_emitted, expect_next_student, names, take_students, RecordingSubscriber,
    ScriptedProvider,
};
use std::sync::Arc;
use std::time::Duration;

const SERVER: &str = "http://teste";
const WAIT: Duration = Duration::from_secs(2);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn feed(provider: ScriptedProvider) -> StudentFeed {
    init_tracing();
    StudentFeed::with_provider(RosterConfig::new(SERVER), Arc::new(provider))
}

#[tokio::test]
async fn test_existing_only_scenario() -> anyhow::Result<()> {
    // Arrange
    let feed = feed(ScriptedProvider::existing_only());

    // Act
    let mut stream = feed.stream();

    // Assert
    expect_next_student(&mut stream, student_ana()).await;
    expect_next_student(&mut stream, student_bia()).await;
    assert_no_element_emitted(&mut stream, 100).await;
    assert!(feed.is_running());

    Ok(())
}

#[tokio::test]
async fn test_new_only_scenario() -> anyhow::Result<()> {
    // Arrange
    let feed = feed(ScriptedProvider::new_only());
    let received = Arc::new(Mutex::new(Vec::new()));

    // Act
    let sink = received.clone();
    let _subscription = feed.sink(move |student| sink.lock().push(student), |_| {});
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Assert
    assert_eq!(*received.lock(), [student_carla(), student_davi()]);

    Ok(())
}

#[tokio::test]
async fn test_mixed_scenario() -> anyhow::Result<()> {
    // Arrange
    let feed = feed(ScriptedProvider::both());
    let mut stream = feed.stream();

    // Act
    let students = take_students(&mut stream, 4).await;

    // Assert
    let mut received = names(&students);
    received.sort_unstable();
    assert_eq!(received, ["Ana", "Bia", "Carla", "Davi"]);

    Ok(())
}

#[tokio::test]
async fn test_error_scenario() -> anyhow::Result<()> {
    // Arrange
    init_tracing();
    let recorder = RecordingSubscriber::new();

    // Act
    let feed = StudentFeed::with_provider(
        RosterConfig::new("not an address"),
        Arc::new(ScriptedProvider::both()),
    );
    let subscription = feed.subscribe(recorder.clone());
    subscription.request(Demand::Unbounded);

    // Assert
    let report = feed.shutdown().await;
    assert!(matches!(report.new, FetchOutcome::Failed(ref e) if e.is_bad_url()));
    assert!(matches!(report.existing, FetchOutcome::Failed(ref e) if e.is_bad_url()));
    let completions = recorder.completions();
    assert_eq!(completions.len(), 1);
    assert!(completions[0].error().is_some_and(RosterError::is_bad_url));

    Ok(())
}

#[tokio::test]
async fn test_bad_url_reaches_current_consumers() -> anyhow::Result<()> {
    // Arrange
    init_tracing();
    let provider =
        Arc::new(ScriptedProvider::existing_only().with_delay(Duration::from_millis(50)));
    let config = RosterConfig::new("not an address");
    let hub = StreamHub::new();
    let recorder = RecordingSubscriber::new();
    hub.subscribe(recorder.clone()).request(Demand::Unbounded);

    // Act
    let (fetched, (outcome, existing_in_flight)) = tokio::join!(
        roster_fetch::fetch_existing(&hub, SERVER, provider.as_ref()),
        async {
            let outcome =
                roster_fetch::poll_new(&hub, &config.server_address, provider.as_ref()).await;
            let in_flight =
                provider.calls(roster_fetch::Endpoint::Existing) == 1 && hub.known_count() == 0;
            (outcome, in_flight)
        }
    );

    // Assert
    assert!(existing_in_flight);
    assert_eq!(
        outcome,
        FetchOutcome::Failed(RosterError::bad_url("not an address/novos"))
    );
    assert_eq!(
        recorder.wait_for_completion(WAIT).await,
        Some(Completion::Failed(RosterError::bad_url("not an address/novos")))
    );
    assert!(recorder.students().is_empty());
    assert_eq!(provider.calls(roster_fetch::Endpoint::New), 0);

    // The in-flight existing fetch still lands in the hub.
    assert_eq!(fetched, FetchOutcome::Completed { received: 2 });
    assert_eq!(hub.known_students(), [student_ana(), student_bia()]);

    let late = RecordingSubscriber::new();
    hub.subscribe(late.clone()).request(Demand::Unbounded);
    assert_eq!(late.students(), [student_ana(), student_bia()]);
    assert!(late.completions().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_slow_consumer_does_not_hold_back_fast_one() -> anyhow::Result<()> {
    // Arrange
    let feed = feed(ScriptedProvider::both());
    let fast = RecordingSubscriber::new();
    let slow = RecordingSubscriber::new();
    feed.subscribe(fast.clone()).request(Demand::Unbounded);
    let slow_subscription = feed.subscribe(slow.clone());
    slow_subscription.request(Demand::max(1));

    // Act
    assert!(fast.wait_for_students(4, WAIT).await);

    // Assert
    assert_eq!(slow.students().len(), 1);
    assert_eq!(slow_subscription.buffered(), 3);

    slow_subscription.request(Demand::Unbounded);
    assert_eq!(slow.students(), fast.students());

    Ok(())
}

#[tokio::test]
async fn test_shutdown_stops_fetching_and_keeps_records() -> anyhow::Result<()> {
    // Arrange
    let feed = feed(ScriptedProvider::existing_only());
    let hub = feed.hub().clone();
    let mut stream = feed.stream();
    expect_next_student(&mut stream, student_ana()).await;

    // Act
    let report = feed.shutdown().await;

    // Assert
    assert_eq!(report.existing, FetchOutcome::Completed { received: 2 });
    assert_eq!(report.new, FetchOutcome::Cancelled);
    assert_eq!(hub.known_count(), 2);
    expect_next_student(&mut stream, student_bia()).await;

    Ok(())
}

#[tokio::test]
async fn test_config_is_kept() -> anyhow::Result<()> {
    let feed = feed(ScriptedProvider::silent());

    assert_eq!(feed.config().server_address, SERVER);
    assert_eq!(feed.hub().subscriber_count(), 0);

    Ok(())
}
