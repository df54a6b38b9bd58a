// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types of the Roster student stream.
//!
//! - [`Student`]: the immutable record carried by the stream
//! - [`StreamHub`]: replaying multicast registry fed by the fetch loops
//! - [`Subscription`]: per-consumer demand and buffer state machine
//! - [`StudentSubscriber`]: callback interface a consumer implements
//! - [`HubStream`]: `futures::Stream` adapter pulling one record at a time

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

#[macro_use]
mod logging;

pub mod demand;
pub mod hub_stream;
pub mod stream_hub;
pub mod stream_item;
pub mod student;
pub mod subscriber;
pub mod subscription;

pub use self::demand::Demand;
pub use self::hub_stream::HubStream;
pub use self::stream_hub::StreamHub;
pub use self::stream_item::StreamItem;
pub use self::student::{Sex, Student};
pub use self::subscriber::{Completion, SinkSubscriber, StudentSubscriber};
pub use self::subscription::{Subscription, SubscriptionId};
pub use roster_error::{Result, RosterError};
