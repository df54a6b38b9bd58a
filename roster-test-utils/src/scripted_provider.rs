// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-memory stand-in for the remote server.
//!
//! Each endpoint answers from a script after a short delay. Once a script is
//! exhausted, or for an endpoint that has no script, the request never
//! completes, which is what a long-poll server with nothing new does.

use crate::fixtures::{existing_students, new_students};
use async_trait::async_trait;
use parking_lot::Mutex;
use roster_core::Student;
use roster_fetch::{Endpoint, ProviderError, StudentProvider};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(Vec<u8>),
    Fail(ProviderError),
}

impl Reply {
    /// JSON body for any serializable value.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be serialized.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        Self::Body(serde_json::to_vec(value).expect("fixture serializes"))
    }
}

#[derive(Debug)]
pub struct ScriptedProvider {
    existing: Mutex<Option<Reply>>,
    new: Mutex<VecDeque<Reply>>,
    delay: Duration,
    existing_calls: AtomicUsize,
    new_calls: AtomicUsize,
    urls: Mutex<Vec<Url>>,
}

impl ScriptedProvider {
    /// A server that never answers.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            existing: Mutex::new(None),
            new: Mutex::new(VecDeque::new()),
            delay: Duration::from_millis(10),
            existing_calls: AtomicUsize::new(0),
            new_calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// Serves Ana and Bia from `/existentes`; `/novos` hangs.
    #[must_use]
    pub fn existing_only() -> Self {
        Self::silent().with_existing(existing_students())
    }

    /// Serves Carla then Davi from `/novos`; `/existentes` hangs.
    #[must_use]
    pub fn new_only() -> Self {
        Self::silent().with_new(new_students())
    }

    /// Serves both fixtures.
    #[must_use]
    pub fn both() -> Self {
        Self::silent()
            .with_existing(existing_students())
            .with_new(new_students())
    }

    #[must_use]
    pub fn with_existing(self, students: Vec<Student>) -> Self {
        self.with_existing_reply(Reply::json(&students))
    }

    #[must_use]
    pub fn with_existing_reply(self, reply: Reply) -> Self {
        *self.existing.lock() = Some(reply);
        self
    }

    /// Appends one `/novos` answer per student.
    #[must_use]
    pub fn with_new(self, students: Vec<Student>) -> Self {
        self.new.lock().extend(students.iter().map(Reply::json));
        self
    }

    /// Appends a raw `/novos` answer.
    #[must_use]
    pub fn with_new_reply(self, reply: Reply) -> Self {
        self.new.lock().push_back(reply);
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Requests received so far on `endpoint`.
    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        match endpoint {
            Endpoint::Existing => self.existing_calls.load(Ordering::SeqCst),
            Endpoint::New => self.new_calls.load(Ordering::SeqCst),
        }
    }

    /// Every URL requested, in order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<Url> {
        self.urls.lock().clone()
    }

    fn next_reply(&self, endpoint: Endpoint) -> Option<Reply> {
        match endpoint {
            Endpoint::Existing => {
                self.existing_calls.fetch_add(1, Ordering::SeqCst);
                self.existing.lock().take()
            }
            Endpoint::New => {
                self.new_calls.fetch_add(1, Ordering::SeqCst);
                self.new.lock().pop_front()
            }
        }
    }
}

fn endpoint_of(url: &Url) -> Option<Endpoint> {
    let last = url.path_segments()?.last()?;
    [Endpoint::Existing, Endpoint::New]
        .into_iter()
        .find(|endpoint| endpoint.path() == last)
}

#[async_trait]
impl StudentProvider for ScriptedProvider {
    async fn fetch(&self, url: Url) -> Result<Vec<u8>, ProviderError> {
        self.urls.lock().push(url.clone());
        let reply = endpoint_of(&url).and_then(|endpoint| self.next_reply(endpoint));

        let Some(reply) = reply else {
            return std::future::pending().await;
        };

        sleep(self.delay).await;
        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Fail(error) => Err(error),
        }
    }
}
