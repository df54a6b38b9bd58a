// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Roster
//!
//! A continuously updated collection of student records, fetched from a
//! remote HTTP source and multicast to any number of consumers with
//! per-consumer backpressure.
//!
//! ## Overview
//!
//! The server has no push channel. Two background paths fill a shared
//! [`StreamHub`]:
//!
//! - `GET /existentes`, once, for the records the server already has
//! - `GET /novos`, long-polled, one new record per response
//!
//! Every consumer is seeded with the records seen so far and then receives
//! new ones, but only as many as it has requested. A failure on either path
//! ends every subscription registered at that moment with the error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use roster::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ConfigError> {
//!     let feed = StudentFeed::connect(RosterConfig::new("http://localhost:8080"))?;
//!
//!     let mut students = feed.stream();
//!     while let Some(item) = students.next().await {
//!         match item {
//!             StreamItem::Value(student) => println!("{student}"),
//!             StreamItem::Error(error) => eprintln!("feed stopped: {error}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub use roster_core::{
    Completion, Demand, HubStream, Sex, SinkSubscriber, StreamHub, StreamItem, Student,
    StudentSubscriber, Subscription, SubscriptionId,
};
pub use roster_error::{Result, RosterError};
pub use roster_fetch::{
    ConfigError, FetchOutcome, FetchReport, FetchTasks, HttpProvider, ProviderError,
    RosterConfig, StudentProvider,
};

/// A hub together with the fetch paths that feed it.
///
/// Both paths start on construction. Dropping the feed stops them; existing
/// subscriptions stay registered with the hub but receive nothing further.
pub struct StudentFeed {
    config: RosterConfig,
    hub: StreamHub,
    tasks: FetchTasks,
}

impl StudentFeed {
    /// Starts fetching from `config.server_address` over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the HTTP client cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn connect(config: RosterConfig) -> std::result::Result<Self, ConfigError> {
        let provider = HttpProvider::new(&config)?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Loads the configuration from the environment, then connects.
    ///
    /// # Errors
    ///
    /// See [`RosterConfig::from_env`] and [`StudentFeed::connect`].
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::connect(RosterConfig::from_env()?)
    }

    /// Starts fetching through a caller-supplied provider.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn with_provider(config: RosterConfig, provider: Arc<dyn StudentProvider>) -> Self {
        let hub = StreamHub::new();
        let tasks = FetchTasks::spawn(&hub, &config, provider);
        Self { config, hub, tasks }
    }

    #[must_use]
    pub const fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// The hub fed by this feed. Clones share its state.
    #[must_use]
    pub const fn hub(&self) -> &StreamHub {
        &self.hub
    }

    /// See [`StreamHub::subscribe`].
    pub fn subscribe<S>(&self, subscriber: S) -> Subscription
    where
        S: StudentSubscriber,
    {
        self.hub.subscribe(subscriber)
    }

    /// See [`StreamHub::sink`].
    pub fn sink<V, C>(&self, on_value: V, on_completion: C) -> Subscription
    where
        V: Fn(Student) + Send + Sync + 'static,
        C: Fn(Completion) + Send + Sync + 'static,
    {
        self.hub.sink(on_value, on_completion)
    }

    /// See [`StreamHub::stream`].
    #[must_use]
    pub fn stream(&self) -> HubStream {
        self.hub.stream()
    }

    /// `false` once both fetch paths have ended.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.tasks.is_finished()
    }

    /// Stops both fetch paths and reports how each ended.
    pub async fn shutdown(self) -> FetchReport {
        let Self { tasks, .. } = self;
        tasks.shutdown();
        tasks.join().await
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::StudentFeed;
    pub use roster_core::{Completion, Demand, StreamHub, StreamItem, Student, Subscription};
    pub use roster_error::RosterError;
    pub use roster_fetch::{ConfigError, RosterConfig, StudentProvider};
}
