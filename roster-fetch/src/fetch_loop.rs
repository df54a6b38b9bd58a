// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background retrieval of student records.
//!
//! Two independent paths feed the same [`StreamHub`]:
//!
//! - [`fetch_existing`]: one `GET /existentes`, broadcast as a batch.
//! - [`poll_new`]: `GET /novos` in a loop, one record per response, re-issued
//!   as soon as a record arrives.
//!
//! Neither path retries. On the first failure the error is broadcast to every
//! current subscription and the path stops; the other path is unaffected.

use crate::{decode_response, Endpoint, RosterConfig, StudentProvider};
use roster_core::{StreamHub, Student};
use roster_error::RosterError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// How a fetch path ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Every record the path was going to produce has been broadcast.
    Completed { received: usize },
    /// The path broadcast this error and stopped.
    Failed(RosterError),
    /// Shutdown was requested before the path ended on its own.
    Cancelled,
}

fn fail(hub: &StreamHub, endpoint: Endpoint, error: RosterError) -> FetchOutcome {
    warn!("fetch /{endpoint}: stopping after {} error: {error}", error.kind());
    hub.broadcast_error(error.clone());
    FetchOutcome::Failed(error)
}

/// Retrieves the records the server already has and broadcasts them once.
pub async fn fetch_existing<P>(hub: &StreamHub, server_address: &str, provider: &P) -> FetchOutcome
where
    P: StudentProvider + ?Sized,
{
    let url = match Endpoint::Existing.url(server_address) {
        Ok(url) => url,
        Err(error) => return fail(hub, Endpoint::Existing, error),
    };

    match decode_response::<Vec<Student>>(provider.fetch(url).await) {
        Ok(students) => {
            let received = students.len();
            info!("fetch /existentes: {received} records");
            hub.broadcast_all(students);
            FetchOutcome::Completed { received }
        }
        Err(error) => fail(hub, Endpoint::Existing, error),
    }
}

/// Long-polls for new records until the first failure.
///
/// Each response carries exactly one record; the next request is issued as
/// soon as it has been broadcast.
pub async fn poll_new<P>(hub: &StreamHub, server_address: &str, provider: &P) -> FetchOutcome
where
    P: StudentProvider + ?Sized,
{
    let url = match Endpoint::New.url(server_address) {
        Ok(url) => url,
        Err(error) => return fail(hub, Endpoint::New, error),
    };

    let mut received = 0usize;
    loop {
        match decode_response::<Student>(provider.fetch(url.clone()).await) {
            Ok(student) => {
                received += 1;
                debug!("fetch /novos: record #{received} {student}");
                hub.broadcast(student);
            }
            Err(error) => return fail(hub, Endpoint::New, error),
        }
    }
}

/// Outcomes of both paths after [`FetchTasks::join`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub existing: FetchOutcome,
    pub new: FetchOutcome,
}

/// Owns the two background fetch tasks of one hub.
///
/// Dropping it, or calling [`shutdown`](Self::shutdown), stops both paths
/// without broadcasting anything.
#[derive(Debug)]
pub struct FetchTasks {
    cancel: CancellationToken,
    new: Option<JoinHandle<FetchOutcome>>,
    existing: Option<JoinHandle<FetchOutcome>>,
}

impl FetchTasks {
    /// Starts both paths on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(hub: &StreamHub, config: &RosterConfig, provider: Arc<dyn StudentProvider>) -> Self {
        let cancel = CancellationToken::new();
        let new = spawn_path(Endpoint::New, hub, config, provider.clone(), cancel.clone());
        let existing = spawn_path(Endpoint::Existing, hub, config, provider, cancel.clone());

        Self {
            cancel,
            new: Some(new),
            existing: Some(existing),
        }
    }

    /// Stops both paths. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// `true` once both paths have ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        [&self.new, &self.existing]
            .into_iter()
            .all(|handle| handle.as_ref().is_none_or(JoinHandle::is_finished))
    }

    /// Waits for both paths to end.
    ///
    /// The new-records path only ends on failure or shutdown, so this
    /// usually follows [`shutdown`](Self::shutdown).
    pub async fn join(mut self) -> FetchReport {
        let existing = wait(self.existing.take()).await;
        let new = wait(self.new.take()).await;
        FetchReport { existing, new }
    }
}

impl Drop for FetchTasks {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn spawn_path(
    endpoint: Endpoint,
    hub: &StreamHub,
    config: &RosterConfig,
    provider: Arc<dyn StudentProvider>,
    cancel: CancellationToken,
) -> JoinHandle<FetchOutcome> {
    let hub = hub.clone();
    let server_address = config.server_address.clone();

    tokio::spawn(async move {
        info!("fetch /{endpoint}: started");
        let run = async {
            match endpoint {
                Endpoint::Existing => fetch_existing(&hub, &server_address, provider.as_ref()).await,
                Endpoint::New => poll_new(&hub, &server_address, provider.as_ref()).await,
            }
        };

        tokio::select! {
            outcome = run => outcome,
            () = cancel.cancelled() => {
                debug!("fetch /{endpoint}: cancelled");
                FetchOutcome::Cancelled
            }
        }
    })
}

async fn wait(handle: Option<JoinHandle<FetchOutcome>>) -> FetchOutcome {
    let Some(handle) = handle else {
        return FetchOutcome::Cancelled;
    };
    match handle.await {
        Ok(outcome) => outcome,
        Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
        Err(_) => FetchOutcome::Cancelled,
    }
}
