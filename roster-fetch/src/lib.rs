// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fetch loops feeding a [`StreamHub`](roster_core::StreamHub) from a remote server.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod config;
pub mod decode;
pub mod endpoint;
pub mod fetch_loop;
pub mod http_provider;
pub mod provider;

// Re-export commonly used types
pub use config::{ConfigError, RosterConfig};
pub use decode::decode_response;
pub use endpoint::Endpoint;
pub use fetch_loop::{fetch_existing, poll_new, FetchOutcome, FetchReport, FetchTasks};
pub use http_provider::HttpProvider;
pub use provider::{ProviderError, StudentProvider};
